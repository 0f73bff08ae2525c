use crate::kind::ScalarKind;

/// How one entity attribute is stored and resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldDescriptor {
    /// A stored scalar column
    Scalar(ScalarKind),

    /// Single link to `target`, stored as an integer id column
    Reference {
        target: String,
        reverse: Option<String>,
    },

    /// Many-to-many link to `target`, stored in an implicit join table
    Collection {
        target: String,
        reverse: Option<String>,
    },

    /// Inverse of `source.source_field` (a reference); resolved by query
    ReverseOf { source: String, source_field: String },

    /// Inverse of `owner.owner_field` (a collection); resolved through the join table
    ReverseJoinOf { owner: String, owner_field: String },
}

impl FieldDescriptor {
    /// Whether the field has a column on the entity's own table
    #[must_use]
    pub const fn has_column(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Reference { .. })
    }

    /// Whether the field resolves to other records
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    /// Whether the field is derived from another entity's field
    #[must_use]
    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::ReverseOf { .. } | Self::ReverseJoinOf { .. })
    }

    /// The entity this field's records belong to, for relation fields
    #[must_use]
    pub fn related_entity(&self) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::Reference { target, .. } | Self::Collection { target, .. } => Some(target),
            Self::ReverseOf { source, .. } => Some(source),
            Self::ReverseJoinOf { owner, .. } => Some(owner),
        }
    }

    /// The scalar kind, if this is a scalar field
    #[must_use]
    pub const fn scalar_kind(&self) -> Option<&ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(kind),
            _ => None,
        }
    }
}

impl From<ScalarKind> for FieldDescriptor {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}
