use std::collections::HashMap;

use log::error;

use verdant_shared::{EntityId, EntityTypeId};

use super::plantable::PlantableEntity;
use super::pool::Pool;

/// Maps a type id to its pool and fans claim/return out by identifier.
/// Explicitly constructed and passed by reference — there is no ambient
/// global instance.
#[derive(Default)]
pub struct PoolManager {
    pools: HashMap<EntityTypeId, Pool>,
}

impl PoolManager {
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
        }
    }

    pub fn ensure_pool(&mut self, type_id: &EntityTypeId) -> &mut Pool {
        self.pools
            .entry(type_id.clone())
            .or_insert_with(|| Pool::new(type_id.clone()))
    }

    pub fn pool(&self, type_id: &EntityTypeId) -> Option<&Pool> {
        self.pools.get(type_id)
    }

    pub fn available(&self, type_id: &EntityTypeId) -> usize {
        self.pools
            .get(type_id)
            .map(Pool::available)
            .unwrap_or_default()
    }

    pub fn claim(&mut self, type_id: &EntityTypeId) -> Option<PlantableEntity> {
        let Some(pool) = self.pools.get_mut(type_id) else {
            error!("claim for unknown type id '{type_id}'");
            return None;
        };
        pool.claim()
    }

    /// Pulls a specific entity out of whichever pool still holds it.
    pub fn claim_by_id(&mut self, entity_id: EntityId) -> Option<PlantableEntity> {
        self.pools
            .values_mut()
            .find_map(|pool| pool.claim_specific(entity_id))
    }

    /// In-place access to an entity still pooled on this peer.
    pub fn pooled_entity_mut(&mut self, entity_id: EntityId) -> Option<&mut PlantableEntity> {
        self.pools
            .values_mut()
            .find_map(|pool| pool.entity_mut(entity_id))
    }

    pub fn return_entity(&mut self, type_id: &EntityTypeId, entity: PlantableEntity) {
        let Some(pool) = self.pools.get_mut(type_id) else {
            error!(
                "return for unknown type id '{type_id}', entity {:?} not returned",
                entity.id
            );
            return;
        };
        pool.return_entity(entity);
    }
}
