use std::collections::HashMap;
use std::sync::Arc;

use tether_types::EntityDescription;

/// Frozen entity descriptions, with reverse fields attached.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: Vec<Arc<EntityDescription>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub(crate) fn from_descriptions(entities: Vec<EntityDescription>) -> Self {
        let index = entities
            .iter()
            .enumerate()
            .map(|(i, desc)| (desc.name().to_string(), i))
            .collect();
        Self {
            entities: entities.into_iter().map(Arc::new).collect(),
            index,
        }
    }

    pub fn get(&self, entity: &str) -> Option<&Arc<EntityDescription>> {
        self.index.get(entity).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.index.contains_key(entity)
    }

    /// Descriptions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityDescription>> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
