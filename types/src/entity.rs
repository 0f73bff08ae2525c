use crate::field::FieldDescriptor;

/// A named record type: ordered field names mapped to descriptors.
///
/// The `id` column is implicit and never listed among the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescription {
    name: String,
    fields: Vec<(String, FieldDescriptor)>,
}

impl EntityDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field, keeping declaration order.
    ///
    /// Returns `false` and leaves the description unchanged when a field of
    /// that name already exists.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldDescriptor) -> bool {
        let name = name.into();
        if self.field(&name).is_some() {
            return false;
        }
        self.fields.push((name, field));
        true
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find_map(|(n, f)| (n == name).then_some(f))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
