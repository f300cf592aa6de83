use log::{error, info, warn};

use verdant_shared::{EntityId, EntityTypeId, GardenMessage, PeerId, PeerRole, Phase, SlotId};

use crate::definition::PlantDefinition;

/// A pooled, replicated plant/seed entity.
///
/// Authoritative fields (`phase`, `planted_epoch_seconds`) may only be
/// mutated by the peer that currently holds authority; every other peer
/// applies received broadcasts verbatim. Growth completion is always
/// recomputed from the stored epoch, never accumulated, so a peer that
/// observes the entity at any point in its life computes the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantableEntity {
    pub id: EntityId,
    pub type_id: EntityTypeId,
    pub phase: Phase,
    /// Unix seconds at the moment Growing began; the sole source of truth
    /// for growth completion. Replicated verbatim.
    pub planted_epoch_seconds: i64,
    pub grow_duration_seconds: f32,
    pub max_scale: f32,
    pub scale_multiplier: f32,
    /// Per-spawn override; > 0 replaces `max_scale` at planting time.
    pub scale_override: f32,
    // definition copies, so restore can undo overrides and merged configs
    base_grow_duration_seconds: f32,
    base_max_scale: f32,
    base_scale_multiplier: f32,
    /// None means the controller peer holds authority by default.
    pub owner_peer: Option<PeerId>,

    // local presentation state, mirrored by the engine
    pub seed_visible: bool,
    pub plant_visible: bool,
    pub interactable: bool,
    pub kinematic: bool,
    pub scale: f32,
    pub position: [f32; 3],
    pub parent_slot: Option<SlotId>,
}

impl PlantableEntity {
    /// Builds an entity in canonical pooled state, copying the numeric
    /// growth parameters from its type definition.
    pub fn new(id: EntityId, definition: &PlantDefinition) -> Self {
        let mut entity = Self {
            id,
            type_id: definition.type_id.clone(),
            phase: Phase::Pooled,
            planted_epoch_seconds: 0,
            grow_duration_seconds: definition.grow_duration_seconds,
            max_scale: definition.max_scale,
            scale_multiplier: definition.scale_multiplier,
            scale_override: 0.0,
            base_grow_duration_seconds: definition.grow_duration_seconds,
            base_max_scale: definition.max_scale,
            base_scale_multiplier: definition.scale_multiplier,
            owner_peer: None,
            seed_visible: true,
            plant_visible: false,
            interactable: true,
            kinematic: true,
            scale: 0.0,
            position: [0.0; 3],
            parent_slot: None,
        };
        entity.restore();
        entity
    }

    /// Resets every transient field to canonical pooled defaults. Pool
    /// initialization and every later return run this same reset, so a
    /// fresh pool and a pool after N claim/return cycles are
    /// indistinguishable.
    pub fn restore(&mut self) {
        self.phase = Phase::Pooled;
        self.planted_epoch_seconds = 0;
        self.grow_duration_seconds = self.base_grow_duration_seconds;
        self.max_scale = self.base_max_scale;
        self.scale_multiplier = self.base_scale_multiplier;
        self.scale_override = 0.0;
        self.scale = 0.0;
        self.parent_slot = None;
        self.interactable = true;
        self.kinematic = true;
        self.set_seed_state(true);
    }

    /// Flips the seed/plant model and collider pair. Pure local state, no
    /// broadcast.
    pub fn set_seed_state(&mut self, is_seed: bool) {
        self.seed_visible = is_seed;
        self.plant_visible = !is_seed;
    }

    /// Claim transition: Pooled -> Seed. Seed model and collider active,
    /// no timer running.
    pub fn on_claimed(&mut self) {
        self.phase = Phase::Seed;
        self.set_seed_state(true);
    }

    pub fn is_locally_authoritative(&self, local_peer: PeerId, role: PeerRole) -> bool {
        match self.owner_peer {
            Some(owner) => owner == local_peer,
            None => role.is_controller(),
        }
    }

    /// Planting transition: Seed -> Growing, stamped with the caller's
    /// clock. Only the authoritative peer calls this; everyone else learns
    /// of it through the `Planted` broadcast.
    pub fn plant(&mut self, now_epoch_seconds: i64) {
        if self.phase != Phase::Seed {
            warn!(
                "plant() on entity {:?} in phase {:?}, ignoring",
                self.id, self.phase
            );
            return;
        }
        if self.scale_override > 0.0 {
            self.max_scale = self.scale_override;
        }
        self.phase = Phase::Growing;
        self.planted_epoch_seconds = now_epoch_seconds;
        self.set_seed_state(false);
        self.interactable = false;
        self.scale = 0.0;
        info!(
            "entity {:?} planted at epoch {}, duration {}s",
            self.id, self.planted_epoch_seconds, self.grow_duration_seconds
        );
        self.log_config_defects();
    }

    /// Restores a mid-growth plant from a persisted or replicated epoch
    /// timestamp. Recomputing completion from the epoch makes the visual
    /// state exact no matter how much time passed while unobserved.
    pub fn load(&mut self, saved_epoch_seconds: i64, now_epoch_seconds: i64) {
        self.phase = Phase::Growing;
        self.planted_epoch_seconds = saved_epoch_seconds;
        self.set_seed_state(false);
        let completion = self.growth_completion(now_epoch_seconds);
        self.interactable = false;
        self.scale = completion * self.max_scale * self.scale_multiplier;
        info!(
            "entity {:?} loaded with epoch {}, completion {:.3}",
            self.id, saved_epoch_seconds, completion
        );
        self.log_config_defects();
    }

    /// Fraction of growth completed at `now`, clamped to [0, 1].
    ///
    /// A non-positive duration is an accepted misconfiguration: completion
    /// stays 0.0 and the entity never leaves Growing.
    pub fn growth_completion(&self, now_epoch_seconds: i64) -> f32 {
        if self.grow_duration_seconds <= 0.0 {
            return 0.0;
        }
        let raw =
            (now_epoch_seconds - self.planted_epoch_seconds) as f32 / self.grow_duration_seconds;
        raw.clamp(0.0, 1.0)
    }

    pub fn is_ready_to_harvest(&self, now_epoch_seconds: i64) -> bool {
        self.growth_completion(now_epoch_seconds) >= 1.0
    }

    /// Per-tick update. Returns true on the single tick where the entity
    /// becomes harvestable, so the authoritative caller can emit the
    /// `Enable` broadcast exactly once.
    pub fn tick(&mut self, now_epoch_seconds: i64) -> bool {
        if self.phase != Phase::Growing {
            return false;
        }
        let completion = self.growth_completion(now_epoch_seconds);
        self.scale = completion * self.max_scale * self.scale_multiplier;
        if completion >= 1.0 && !self.interactable {
            self.phase = Phase::Harvestable;
            self.interactable = true;
            info!("entity {:?} fully grown, now harvestable", self.id);
            return true;
        }
        false
    }

    /// Applies a received `Enable` broadcast. No-op if already harvestable.
    pub fn apply_enable(&mut self) {
        self.interactable = true;
        if self.phase == Phase::Growing {
            self.phase = Phase::Harvestable;
        }
    }

    /// Applies a received `Disable` broadcast: the entity was just planted
    /// by its owner; show plant visuals and stop interaction until grown.
    pub fn apply_disable(&mut self) {
        self.set_seed_state(false);
        self.interactable = false;
    }

    /// Applies a received `Sold` broadcast: revert to seed-idle visuals.
    /// The owner additionally relocates the entity and returns it to its
    /// pool. No-op when already sold.
    pub fn apply_sold(&mut self) {
        if self.phase == Phase::Sold {
            return;
        }
        self.phase = Phase::Sold;
        self.set_seed_state(true);
        self.interactable = false;
    }

    /// The point-to-point message an owner sends to a late joiner in place
    /// of the original `Planted` broadcast that peer never saw.
    pub fn state_sync(&self) -> GardenMessage {
        GardenMessage::StateSync {
            phase: self.phase,
            planted_epoch_seconds: self.planted_epoch_seconds,
        }
    }

    /// Applies a received `StateSync`. Growth parameters come from the
    /// local type definition (static placement gives every peer the same
    /// ones); only phase and epoch need replicating.
    pub fn apply_state_sync(&mut self, phase: Phase, epoch_seconds: i64, now_epoch_seconds: i64) {
        self.planted_epoch_seconds = epoch_seconds;
        match phase {
            Phase::Pooled => self.restore(),
            Phase::Seed => {
                self.phase = Phase::Seed;
                self.set_seed_state(true);
                self.interactable = true;
            }
            Phase::Growing | Phase::Harvestable => {
                let ready = self.is_ready_to_harvest(now_epoch_seconds);
                self.phase = if ready { Phase::Harvestable } else { Phase::Growing };
                self.set_seed_state(false);
                self.interactable = ready;
                self.scale =
                    self.growth_completion(now_epoch_seconds) * self.max_scale * self.scale_multiplier;
            }
            Phase::Sold => {
                self.phase = Phase::Sold;
                self.set_seed_state(true);
                self.interactable = false;
            }
        }
    }

    fn log_config_defects(&self) {
        if self.grow_duration_seconds <= 0.0 {
            error!(
                "entity {:?} has grow duration {}, it will never finish growing",
                self.id, self.grow_duration_seconds
            );
        }
        if self.max_scale <= 0.0 {
            warn!(
                "entity {:?} has max scale {}, it will be invisible",
                self.id, self.max_scale
            );
        }
        if self.scale_multiplier <= 0.0 {
            warn!(
                "entity {:?} has scale multiplier {}, it will be invisible",
                self.id, self.scale_multiplier
            );
        }
    }
}
