use std::collections::VecDeque;

use log::{info, warn};

use verdant_shared::{EntityId, EntityTypeId, Phase};

use super::plantable::PlantableEntity;

/// An ordered free-list of pooled entities sharing one type id.
///
/// Every entity held here is in phase Pooled; claiming moves an entity out
/// and into the Seed phase, returning restores it through the same reset
/// used at initialization. Pools are peer-local and never replicated —
/// peers stay consistent purely through the lifecycle broadcasts.
pub struct Pool {
    type_id: EntityTypeId,
    entries: VecDeque<PlantableEntity>,
}

impl Pool {
    pub fn new(type_id: EntityTypeId) -> Self {
        Self {
            type_id,
            entries: VecDeque::new(),
        }
    }

    pub fn type_id(&self) -> &EntityTypeId {
        &self.type_id
    }

    pub fn available(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entries.iter().any(|entry| entry.id == entity_id)
    }

    /// In-place access to a pooled entity, for substrate updates (ownership
    /// changes) that arrive while the entity is still pooled here.
    pub fn entity_mut(&mut self, entity_id: EntityId) -> Option<&mut PlantableEntity> {
        self.entries.iter_mut().find(|entry| entry.id == entity_id)
    }

    /// Session-start population from static placement. Runs the canonical
    /// restore so initialization and return are the same code path.
    pub fn insert(&mut self, mut entity: PlantableEntity) {
        if entity.type_id != self.type_id {
            warn!(
                "entity {:?} of type '{}' inserted into pool '{}'",
                entity.id, entity.type_id, self.type_id
            );
        }
        entity.restore();
        self.entries.push_back(entity);
    }

    /// Removes and returns one pooled entity, transitioned to Seed.
    ///
    /// An empty pool yields `None` — an expected, recoverable condition,
    /// not a fault.
    pub fn claim(&mut self) -> Option<PlantableEntity> {
        let Some(mut entity) = self.entries.pop_front() else {
            warn!("claim on empty pool '{}'", self.type_id);
            return None;
        };
        entity.on_claimed();
        info!(
            "claimed entity {:?} from pool '{}', {} remaining",
            entity.id,
            self.type_id,
            self.entries.len()
        );
        Some(entity)
    }

    /// Removes a specific entity by id. Used when a lifecycle broadcast
    /// proves an entity this peer still held pooled is active elsewhere.
    pub fn claim_specific(&mut self, entity_id: EntityId) -> Option<PlantableEntity> {
        let index = self.entries.iter().position(|entry| entry.id == entity_id)?;
        let mut entity = self.entries.remove(index)?;
        entity.on_claimed();
        Some(entity)
    }

    /// Forces the entity back to phase Pooled, restores canonical defaults,
    /// and re-inserts it. Works from any phase; returning an entity whose
    /// id is already pooled just re-applies defaults.
    pub fn return_entity(&mut self, mut entity: PlantableEntity) {
        if entity.phase != Phase::Pooled {
            info!(
                "returning entity {:?} to pool '{}' from phase {:?}",
                entity.id, self.type_id, entity.phase
            );
        }
        entity.restore();
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == entity.id)
        {
            warn!(
                "entity {:?} returned to pool '{}' twice",
                entity.id, self.type_id
            );
            *existing = entity;
            return;
        }
        self.entries.push_back(entity);
    }
}
