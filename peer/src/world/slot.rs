use log::{info, warn};

use verdant_shared::{EntityId, EntityTypeId, PlantConfig, SlotId};

/// A bounded container holding at most one plantable entity.
///
/// Occupancy knowledge arrives from two independent directions: a local
/// proximity observation (the physical entity entering the slot's region)
/// and the owner's `Planted` broadcast carrying the full configuration.
/// Either can arrive first; `pending_config` caches a message that beat
/// its entity, and whichever side arrives second completes the merge,
/// exactly once. At most one of {occupant applied, pending_config held}
/// is true at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub id: SlotId,
    pub position: [f32; 3],
    /// Authoritative occupancy flag, replicated independently of the
    /// occupant so either can arrive first.
    pub occupied: bool,
    pub occupant: Option<EntityId>,
    pub pending_config: Option<PlantConfig>,
}

/// What a reconciliation step decided: apply a now-complete configuration
/// to an entity, or keep waiting for the other half.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotMerge {
    Deferred,
    Apply {
        entity: EntityId,
        config: PlantConfig,
    },
}

impl Slot {
    pub fn new(id: SlotId, position: [f32; 3]) -> Self {
        Self {
            id,
            position,
            occupied: false,
            occupant: None,
            pending_config: None,
        }
    }

    /// Marks the slot taken by a locally-planted entity. Used on the
    /// authoritative side, where observation and configuration are one
    /// event and no merge is needed.
    pub fn occupy_with(&mut self, entity: EntityId) {
        self.occupied = true;
        self.occupant = Some(entity);
        self.pending_config = None;
    }

    /// A `Planted` broadcast arrived. If the physical occupant has already
    /// been observed the merge completes now; otherwise the configuration
    /// waits for it.
    pub fn on_planted_message(&mut self, config: PlantConfig) -> SlotMerge {
        self.occupied = true;
        match self.occupant {
            Some(entity) => {
                self.pending_config = None;
                SlotMerge::Apply { entity, config }
            }
            None => {
                info!(
                    "slot {:?} caching planted config for '{}' until its entity is observed",
                    self.id, config.type_id
                );
                self.pending_config = Some(config);
                SlotMerge::Deferred
            }
        }
    }

    /// The physical entity was observed inside the slot's region. If a
    /// configuration is already waiting the merge completes now.
    pub fn on_occupant_observed(&mut self, entity: EntityId) -> SlotMerge {
        if let Some(existing) = self.occupant {
            if existing != entity {
                warn!(
                    "slot {:?} observed entity {:?} but already holds {:?}",
                    self.id, entity, existing
                );
            }
            return SlotMerge::Deferred;
        }
        self.occupant = Some(entity);
        match self.pending_config.take() {
            Some(config) => SlotMerge::Apply { entity, config },
            None => SlotMerge::Deferred,
        }
    }

    /// Releases the slot. Driven locally by the owner and on every other
    /// peer by the occupancy-cleared broadcast, so all peers release in
    /// lockstep.
    pub fn clear(&mut self) {
        self.occupied = false;
        self.occupant = None;
        self.pending_config = None;
    }
}

/// Plain persistence record for one occupied slot; storage of these is an
/// external concern.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRecord {
    pub slot_id: SlotId,
    pub type_id: EntityTypeId,
    pub planted_epoch_seconds: i64,
    /// 0 means the definition's max scale applies.
    pub scale_override: f32,
}
