//! In-memory creature catalog.

use std::collections::HashMap;

use chimera_core::{Entity, EntityId};

use crate::repository::{EntityRepository, Result};

/// Catalog loaded once at boot and never mutated.
#[derive(Debug, Default)]
pub struct InMemoryEntityRepo {
    entities: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl InMemoryEntityRepo {
    pub fn new(entities: Vec<Entity>) -> Self {
        let index = entities
            .iter()
            .enumerate()
            .map(|(position, entity)| (entity.id, position))
            .collect();
        Self { entities, index }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityRepository for InMemoryEntityRepo {
    fn entities_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Entity>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.index.get(id))
            .map(|position| self.entities[*position].clone())
            .collect())
    }

    fn all_entities(&self) -> Result<Vec<Entity>> {
        Ok(self.entities.clone())
    }
}
