use tether_core::Result;
use tether_types::{FieldDescriptor, ScalarKind};

use super::Registry;
use super::binder;

/// One entity declaration, before binding.
///
/// Declarations may name entities that are declared later; targets are only
/// resolved when the schema is built.
///
/// ```
/// use tether::{Entity, ScalarKind};
///
/// let shift = Entity::new("shift")
///     .scalar("title", ScalarKind::text())
///     .reference_as("employer", "person", "jobs")
///     .collection_as("workers", "person", "shifts_worked");
/// assert_eq!(shift.name(), "shift");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub(crate) name: String,
    pub(crate) fields: Vec<(String, FieldDescriptor)>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field with any descriptor.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDescriptor>) -> Self {
        self.fields.push((name.into(), field.into()));
        self
    }

    pub fn scalar(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field(name, kind)
    }

    /// A single reference to `target`
    pub fn reference(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.field(
            name,
            FieldDescriptor::Reference {
                target: target.into(),
                reverse: None,
            },
        )
    }

    /// A single reference to `target`, exposed on the target as `reverse`
    pub fn reference_as(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        reverse: impl Into<String>,
    ) -> Self {
        self.field(
            name,
            FieldDescriptor::Reference {
                target: target.into(),
                reverse: Some(reverse.into()),
            },
        )
    }

    /// A many-to-many collection of `target`
    pub fn collection(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.field(
            name,
            FieldDescriptor::Collection {
                target: target.into(),
                reverse: None,
            },
        )
    }

    /// A many-to-many collection of `target`, exposed on the target as `reverse`
    pub fn collection_as(
        self,
        name: impl Into<String>,
        target: impl Into<String>,
        reverse: impl Into<String>,
    ) -> Self {
        self.field(
            name,
            FieldDescriptor::Collection {
                target: target.into(),
                reverse: Some(reverse.into()),
            },
        )
    }
}

/// Collects entity declarations and builds them into a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entities: Vec<Entity>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Validates the declarations, attaches reverse fields and freezes them.
    pub fn build(self) -> Result<Registry> {
        binder::bind(self.entities)
    }
}

impl FromIterator<Entity> for Schema {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().collect(),
        }
    }
}
