use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{error, info, warn};
use thiserror::Error;

use verdant_shared::{
    EntityId, EntityTypeId, Envelope, GardenMessage, MessageTarget, PeerId, PeerRole, Phase,
    PlantConfig, Recipient, SlotId,
};

use crate::definition::DefinitionSet;
use crate::economy::EconomyLedger;
use crate::trigger::{TriggerEvent, TriggerKind, TriggerRegion};
use crate::world::delegation::{AuthorityCoordinator, AuthorityEvent, AuthorityOutcome, AuthoritySignal, OwnershipView};
use crate::world::plantable::PlantableEntity;
use crate::world::pool_manager::PoolManager;
use crate::world::slot::{Slot, SlotMerge, SlotRecord};

/// How long a pool return will wait for authority before abandoning.
const RETURN_AUTHORITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Vertical offset applied by the owner when pooling a sold plant, so the
/// entity leaves the sell volume before teleporting home.
const SOLD_RAISE: f32 = 3.0;

/// A persisted slot record that could not be restored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldLoadError {
    #[error("No slot registered with id {slot_id:?}")]
    UnknownSlot { slot_id: SlotId },

    #[error("Slot {slot_id:?} is already occupied")]
    SlotOccupied { slot_id: SlotId },

    #[error("No plant definition for type id '{type_id}'")]
    UnknownDefinition { type_id: EntityTypeId },

    #[error("Pool for type id '{type_id}' is empty")]
    PoolExhausted { type_id: EntityTypeId },
}

/// One peer's view of the replicated garden.
///
/// Everything here runs on a single cooperative tick loop; concurrency is
/// between peers, never within one. The embedder feeds in trigger events,
/// received messages, ownership updates, and the clock, then drains the
/// queued outgoing envelopes and authority signals for its transport.
pub struct GardenPeer {
    local_peer: PeerId,
    role: PeerRole,
    definitions: DefinitionSet,
    pools: PoolManager,
    entities: HashMap<EntityId, PlantableEntity>,
    slots: HashMap<SlotId, Slot>,
    authority: AuthorityCoordinator,
    economy: EconomyLedger,
    players: HashMap<PeerId, String>,
    pending_returns: HashMap<EntityId, EntityTypeId>,
    outgoing: Vec<(Recipient, Envelope)>,
}

impl GardenPeer {
    pub fn new(
        local_peer: PeerId,
        role: PeerRole,
        definitions: DefinitionSet,
        starting_balance: i32,
    ) -> Self {
        Self {
            local_peer,
            role,
            definitions,
            pools: PoolManager::new(),
            entities: HashMap::new(),
            slots: HashMap::new(),
            authority: AuthorityCoordinator::new(),
            economy: EconomyLedger::new(starting_balance),
            players: HashMap::new(),
            pending_returns: HashMap::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    pub fn economy(&self) -> &EconomyLedger {
        &self.economy
    }

    pub fn entity(&self, entity_id: EntityId) -> Option<&PlantableEntity> {
        self.entities.get(&entity_id)
    }

    pub fn slot(&self, slot_id: SlotId) -> Option<&Slot> {
        self.slots.get(&slot_id)
    }

    pub fn pool_available(&self, type_id: &EntityTypeId) -> usize {
        self.pools.available(type_id)
    }

    pub fn is_return_pending(&self, entity_id: EntityId) -> bool {
        self.pending_returns.contains_key(&entity_id)
    }

    // Session setup

    pub fn register_slot(&mut self, slot_id: SlotId, position: [f32; 3]) {
        if self.slots.insert(slot_id, Slot::new(slot_id, position)).is_some() {
            warn!("slot {:?} registered twice", slot_id);
        }
    }

    /// Creates one pooled entity from static placement. Every peer runs the
    /// same placement at session start, so all pools begin identical.
    pub fn spawn_pool_entity(&mut self, type_id: &EntityTypeId, entity_id: EntityId) -> bool {
        let Some(definition) = self.definitions.get(type_id) else {
            error!("no plant definition for type id '{type_id}', entity not spawned");
            return false;
        };
        let entity = PlantableEntity::new(entity_id, definition);
        self.pools.ensure_pool(type_id).insert(entity);
        true
    }

    // Pool operations

    /// Claims a pooled entity of the given type for the local peer.
    /// Returns `None` when the pool is empty — callers treat that as an
    /// expected out-of-stock condition.
    pub fn claim(&mut self, type_id: &EntityTypeId) -> Option<EntityId> {
        let mut entity = self.pools.claim(type_id)?;
        entity.owner_peer = Some(self.local_peer);
        let entity_id = entity.id;
        self.entities.insert(entity_id, entity);
        Some(entity_id)
    }

    /// Returns an active entity to its pool.
    ///
    /// If the local peer lacks authority the return is parked while the
    /// coordinator requests a transfer; it completes on `Granted` and is
    /// abandoned, with the entity untouched, on `TimedOut`.
    pub fn return_entity(&mut self, entity_id: EntityId, now: Instant) {
        let Some(entity) = self.entities.get(&entity_id) else {
            warn!("return for unknown entity {:?}", entity_id);
            return;
        };
        if entity.is_locally_authoritative(self.local_peer, self.role) {
            self.finish_return(entity_id);
            return;
        }
        if self.authority.is_pending(&entity_id) {
            info!(
                "return of entity {:?} already waiting on authority",
                entity_id
            );
            return;
        }
        let current_owner = entity.owner_peer;
        let type_id = entity.type_id.clone();
        self.pending_returns.insert(entity_id, type_id);
        self.authority.request(
            entity_id,
            current_owner,
            false,
            RETURN_AUTHORITY_TIMEOUT,
            now,
        );
    }

    fn finish_return(&mut self, entity_id: EntityId) {
        self.pending_returns.remove(&entity_id);
        let Some(entity) = self.entities.remove(&entity_id) else {
            return;
        };
        let type_id = entity.type_id.clone();
        self.pools.return_entity(&type_id, entity);
    }

    // Authority

    /// Requests write-authority over an active entity. `Granted` comes back
    /// immediately when the local peer already holds it; otherwise the
    /// resolution arrives as an `AuthorityEvent` on a later tick.
    pub fn request_authority(
        &mut self,
        entity_id: EntityId,
        timeout: Duration,
        now: Instant,
    ) -> Option<AuthorityOutcome> {
        let Some(entity) = self.entities.get(&entity_id) else {
            warn!("authority request for unknown entity {:?}", entity_id);
            return None;
        };
        let locally_owned = entity.is_locally_authoritative(self.local_peer, self.role);
        let current_owner = entity.owner_peer;
        Some(
            self.authority
                .request(entity_id, current_owner, locally_owned, timeout, now),
        )
    }

    /// Applies an ownership change reported by the replication substrate.
    /// Reaches entities still pooled on this peer too — another peer's
    /// claim changes ownership before any lifecycle broadcast arrives.
    pub fn set_entity_owner(&mut self, entity_id: EntityId, owner: Option<PeerId>) {
        if let Some(entity) = self.entities.get_mut(&entity_id) {
            entity.owner_peer = owner;
            return;
        }
        if let Some(entity) = self.pools.pooled_entity_mut(entity_id) {
            entity.owner_peer = owner;
            return;
        }
        warn!("ownership update for unknown entity {:?}", entity_id);
    }

    // Queries

    /// Growth completion in [0, 1] for an active entity, recomputed from
    /// its stored epoch.
    pub fn growth_completion(&self, entity_id: EntityId, now_epoch_seconds: i64) -> Option<f32> {
        self.entities
            .get(&entity_id)
            .map(|entity| entity.growth_completion(now_epoch_seconds))
    }

    // Engine events

    pub fn handle_trigger(&mut self, event: TriggerEvent, now_epoch_seconds: i64) {
        match (event.region, event.kind) {
            (TriggerRegion::Slot(slot_id), TriggerKind::Enter) => {
                self.handle_slot_enter(slot_id, event.entity, now_epoch_seconds);
            }
            (TriggerRegion::Slot(slot_id), TriggerKind::Exit) => {
                self.handle_slot_exit(slot_id, event.entity);
            }
            (TriggerRegion::SellPoint, TriggerKind::Enter) => {
                self.handle_sell_point_enter(event.entity);
            }
            (TriggerRegion::SellPoint, TriggerKind::Exit) => {}
        }
    }

    fn handle_slot_enter(&mut self, slot_id: SlotId, entity_id: EntityId, now_epoch_seconds: i64) {
        let local_peer = self.local_peer;
        let role = self.role;
        let Some(slot) = self.slots.get_mut(&slot_id) else {
            warn!("trigger enter for unregistered slot {:?}", slot_id);
            return;
        };
        let authoritative_seed = self
            .entities
            .get(&entity_id)
            .map(|entity| {
                entity.phase == Phase::Seed && entity.is_locally_authoritative(local_peer, role)
            })
            .unwrap_or(false);

        if authoritative_seed {
            if slot.occupied {
                return;
            }
            let Some(entity) = self.entities.get_mut(&entity_id) else {
                return;
            };
            entity.position = slot.position;
            entity.parent_slot = Some(slot_id);
            entity.plant(now_epoch_seconds);
            slot.occupy_with(entity_id);
            let config = PlantConfig {
                type_id: entity.type_id.clone(),
                planted_epoch_seconds: entity.planted_epoch_seconds,
                grow_duration_seconds: entity.grow_duration_seconds,
                max_scale: entity.max_scale,
                scale_multiplier: entity.scale_multiplier,
            };
            self.outgoing.push((
                Recipient::All,
                Envelope::new(MessageTarget::Slot(slot_id), GardenMessage::Planted(config)),
            ));
            self.outgoing.push((
                Recipient::All,
                Envelope::new(MessageTarget::Entity(entity_id), GardenMessage::Disable),
            ));
        } else {
            // someone else's planting; record what we saw and merge with
            // the broadcast whenever both halves are in
            match slot.on_occupant_observed(entity_id) {
                SlotMerge::Apply { entity, config } => {
                    self.apply_plant_config(entity, slot_id, &config, now_epoch_seconds);
                }
                SlotMerge::Deferred => {}
            }
        }
    }

    fn handle_slot_exit(&mut self, slot_id: SlotId, entity_id: EntityId) {
        let Some(slot) = self.slots.get(&slot_id) else {
            return;
        };
        if slot.occupant != Some(entity_id) {
            return;
        }
        let authoritative = self
            .entities
            .get(&entity_id)
            .map(|entity| entity.is_locally_authoritative(self.local_peer, self.role))
            .unwrap_or(false);
        if !authoritative {
            return;
        }
        if let Some(slot) = self.slots.get_mut(&slot_id) {
            slot.clear();
        }
        if let Some(entity) = self.entities.get_mut(&entity_id) {
            entity.parent_slot = None;
        }
        self.outgoing.push((
            Recipient::All,
            Envelope::new(MessageTarget::Slot(slot_id), GardenMessage::Harvested),
        ));
    }

    fn handle_sell_point_enter(&mut self, entity_id: EntityId) {
        // the controller arbitrates every sale
        if !self.role.is_controller() {
            return;
        }
        let Some(entity) = self.entities.get(&entity_id) else {
            return;
        };
        if entity.phase != Phase::Harvestable {
            return;
        }
        let seller_peer = entity.owner_peer.unwrap_or(self.local_peer);
        let type_id = entity.type_id.clone();

        self.outgoing.push((
            Recipient::All,
            Envelope::new(MessageTarget::Entity(entity_id), GardenMessage::Sold),
        ));
        self.apply_sold(entity_id);

        let Some(sell_value) = self
            .definitions
            .get(&type_id)
            .map(|definition| definition.sell_value)
        else {
            error!("sold entity of unknown type '{type_id}', no credit issued");
            return;
        };
        let Some(player_id) = self.players.get(&seller_peer).cloned() else {
            warn!(
                "no player known for peer {:?}, sale of '{type_id}' not credited",
                seller_peer
            );
            return;
        };
        if self.economy.add(&player_id, sell_value) {
            self.broadcast_balances();
        }
    }

    // Harvesting

    /// A harvest action on a slot's occupant: release the slot in lockstep
    /// and return the plant to its pool.
    pub fn harvest(&mut self, slot_id: SlotId, now: Instant) {
        let Some(slot) = self.slots.get_mut(&slot_id) else {
            warn!("harvest on unregistered slot {:?}", slot_id);
            return;
        };
        if !slot.occupied {
            return;
        }
        let Some(entity_id) = slot.occupant else {
            // occupancy announced but the occupant was never observed here
            return;
        };
        let harvestable = self
            .entities
            .get(&entity_id)
            .map(|entity| entity.phase == Phase::Harvestable)
            .unwrap_or(false);
        if !harvestable {
            warn!(
                "harvest on slot {:?} whose occupant {:?} is not harvestable",
                slot_id, entity_id
            );
            return;
        }
        slot.clear();
        if let Some(entity) = self.entities.get_mut(&entity_id) {
            entity.parent_slot = None;
        }
        self.outgoing.push((
            Recipient::All,
            Envelope::new(MessageTarget::Slot(slot_id), GardenMessage::Harvested),
        ));
        self.return_entity(entity_id, now);
    }

    // Received messages

    /// Decodes and dispatches a raw payload from the transport. Unknown
    /// discriminants and truncated payloads are logged and dropped here;
    /// neither is fatal.
    pub fn handle_raw_message(
        &mut self,
        sender: PeerId,
        target: MessageTarget,
        kind: u8,
        payload: &[u8],
        now_epoch_seconds: i64,
    ) {
        match GardenMessage::decode(kind, payload) {
            Ok(message) => {
                self.handle_message(sender, Envelope::new(target, message), now_epoch_seconds);
            }
            Err(decode_error) => {
                warn!("dropping message from {:?}: {decode_error}", sender);
            }
        }
    }

    /// Applies a received, already-decoded message. All handlers are
    /// idempotent: a broadcast for state this peer already reached is a
    /// no-op.
    pub fn handle_message(&mut self, sender: PeerId, envelope: Envelope, now_epoch_seconds: i64) {
        match (envelope.target, envelope.message) {
            (MessageTarget::Slot(slot_id), GardenMessage::Planted(config)) => {
                let Some(slot) = self.slots.get_mut(&slot_id) else {
                    warn!("planted message for unregistered slot {:?}", slot_id);
                    return;
                };
                match slot.on_planted_message(config) {
                    SlotMerge::Apply { entity, config } => {
                        self.apply_plant_config(entity, slot_id, &config, now_epoch_seconds);
                    }
                    SlotMerge::Deferred => {}
                }
            }
            (MessageTarget::Slot(slot_id), GardenMessage::Harvested) => {
                let Some(slot) = self.slots.get_mut(&slot_id) else {
                    warn!("harvested message for unregistered slot {:?}", slot_id);
                    return;
                };
                slot.clear();
            }
            (MessageTarget::Entity(entity_id), GardenMessage::Enable) => {
                if self.activate_entity(entity_id) {
                    if let Some(entity) = self.entities.get_mut(&entity_id) {
                        entity.apply_enable();
                    }
                } else {
                    warn!("enable message for unknown entity {:?}", entity_id);
                }
            }
            (MessageTarget::Entity(entity_id), GardenMessage::Disable) => {
                if self.activate_entity(entity_id) {
                    if let Some(entity) = self.entities.get_mut(&entity_id) {
                        entity.apply_disable();
                    }
                } else {
                    warn!("disable message for unknown entity {:?}", entity_id);
                }
            }
            (MessageTarget::Entity(entity_id), GardenMessage::Sold) => {
                if !self.activate_entity(entity_id) {
                    warn!("sold message for unknown entity {:?}", entity_id);
                    return;
                }
                self.apply_sold(entity_id);
            }
            (
                MessageTarget::Entity(entity_id),
                GardenMessage::StateSync {
                    phase,
                    planted_epoch_seconds,
                },
            ) => {
                if phase == Phase::Pooled {
                    if self.entities.contains_key(&entity_id) {
                        self.finish_return(entity_id);
                    }
                    return;
                }
                if !self.activate_entity(entity_id) {
                    warn!("state sync for unknown entity {:?}", entity_id);
                    return;
                }
                if let Some(entity) = self.entities.get_mut(&entity_id) {
                    entity.apply_state_sync(phase, planted_epoch_seconds, now_epoch_seconds);
                }
            }
            (MessageTarget::Economy, GardenMessage::BalanceSnapshot { entries }) => {
                self.economy.apply_snapshot(entries);
            }
            (target, message) => {
                warn!(
                    "{:?} message from {:?} not valid for target {:?}, ignoring",
                    message.kind(),
                    sender,
                    target
                );
            }
        }
    }

    // Session membership

    /// The local player connected. Seeds the ledger with the first entry,
    /// mirroring how the controller discovers itself.
    pub fn on_local_player_joined(&mut self, player_id: &str, display_name: &str) {
        self.players.insert(self.local_peer, player_id.to_string());
        if !self.economy.is_empty() {
            return;
        }
        self.economy.register_player(player_id, display_name);
        if self.role.is_controller() {
            self.broadcast_balances();
        }
    }

    /// Another peer connected. The controller starts tracking its balance;
    /// every peer sends state-sync for the entities it owns, point-to-point,
    /// in place of the broadcasts the late joiner never saw.
    pub fn on_peer_joined(&mut self, peer: PeerId, player_id: &str, display_name: &str) {
        self.players.insert(peer, player_id.to_string());
        if self.role.is_controller() && self.economy.register_player(player_id, display_name) {
            self.broadcast_balances();
        }

        let mut syncs: Vec<(EntityId, GardenMessage)> = self
            .entities
            .values()
            .filter(|entity| entity.is_locally_authoritative(self.local_peer, self.role))
            .map(|entity| (entity.id, entity.state_sync()))
            .collect();
        syncs.sort_by_key(|(entity_id, _)| *entity_id);
        for (entity_id, message) in syncs {
            self.outgoing.push((
                Recipient::Peer(peer),
                Envelope::new(MessageTarget::Entity(entity_id), message),
            ));
        }
    }

    /// The local peer was promoted to controller. Rebroadcasts the ledger
    /// so every peer converges on the new arbiter's table.
    pub fn on_become_controller(&mut self) {
        self.role = PeerRole::Controller;
        if !self.economy.is_empty() {
            self.broadcast_balances();
        }
    }

    // Tick

    /// Advances every active entity and resolves pending authority
    /// requests. `now_epoch_seconds` drives growth math; `now` drives
    /// deadline timers.
    pub fn tick(&mut self, now_epoch_seconds: i64, now: Instant) {
        let mut newly_ready: Vec<EntityId> = Vec::new();
        for entity in self.entities.values_mut() {
            if entity.tick(now_epoch_seconds)
                && entity.is_locally_authoritative(self.local_peer, self.role)
            {
                newly_ready.push(entity.id);
            }
        }
        newly_ready.sort();
        for entity_id in newly_ready {
            self.outgoing.push((
                Recipient::All,
                Envelope::new(MessageTarget::Entity(entity_id), GardenMessage::Enable),
            ));
        }

        let events = {
            let ownership = LocalOwnership {
                entities: &self.entities,
                local_peer: self.local_peer,
                role: self.role,
            };
            self.authority.poll(now, &ownership)
        };
        for event in events {
            match event {
                AuthorityEvent::Granted(entity_id) => {
                    if self.pending_returns.contains_key(&entity_id) {
                        info!(
                            "gained authority over entity {:?}, finishing pool return",
                            entity_id
                        );
                        self.finish_return(entity_id);
                    }
                }
                AuthorityEvent::TimedOut(entity_id) => {
                    if self.pending_returns.remove(&entity_id).is_some() {
                        error!(
                            "failed to gain authority over entity {:?}, not returned to pool",
                            entity_id
                        );
                    }
                }
            }
        }
    }

    // World persistence

    /// Restores one persisted slot. The claim is rolled back by never
    /// occupying the slot when any step fails.
    pub fn load_record(
        &mut self,
        record: &SlotRecord,
        now_epoch_seconds: i64,
    ) -> Result<(), WorldLoadError> {
        let Some(slot) = self.slots.get(&record.slot_id) else {
            return Err(WorldLoadError::UnknownSlot {
                slot_id: record.slot_id,
            });
        };
        if slot.occupied {
            return Err(WorldLoadError::SlotOccupied {
                slot_id: record.slot_id,
            });
        }
        let position = slot.position;
        if self.definitions.get(&record.type_id).is_none() {
            return Err(WorldLoadError::UnknownDefinition {
                type_id: record.type_id.clone(),
            });
        }
        let Some(mut entity) = self.pools.claim(&record.type_id) else {
            return Err(WorldLoadError::PoolExhausted {
                type_id: record.type_id.clone(),
            });
        };
        let entity_id = entity.id;
        entity.position = position;
        entity.parent_slot = Some(record.slot_id);
        if record.scale_override > 0.0 {
            entity.scale_override = record.scale_override;
            entity.max_scale = record.scale_override;
        }
        entity.load(record.planted_epoch_seconds, now_epoch_seconds);
        self.entities.insert(entity_id, entity);
        if let Some(slot) = self.slots.get_mut(&record.slot_id) {
            slot.occupy_with(entity_id);
        }
        Ok(())
    }

    /// Restores a saved world, skipping records that fail. Returns how many
    /// loaded.
    pub fn load_world(&mut self, records: &[SlotRecord], now_epoch_seconds: i64) -> usize {
        let mut loaded = 0;
        for record in records {
            match self.load_record(record, now_epoch_seconds) {
                Ok(()) => loaded += 1,
                Err(load_error) => {
                    error!("failed to load slot {:?}: {load_error}", record.slot_id);
                }
            }
        }
        loaded
    }

    /// Plain records for every occupied, growing-or-ready slot, ordered by
    /// slot id.
    pub fn save_world(&self) -> Vec<SlotRecord> {
        let mut records: Vec<SlotRecord> = self
            .slots
            .values()
            .filter(|slot| slot.occupied)
            .filter_map(|slot| {
                let entity = self.entities.get(&slot.occupant?)?;
                if !matches!(entity.phase, Phase::Growing | Phase::Harvestable) {
                    return None;
                }
                Some(SlotRecord {
                    slot_id: slot.id,
                    type_id: entity.type_id.clone(),
                    planted_epoch_seconds: entity.planted_epoch_seconds,
                    scale_override: entity.scale_override,
                })
            })
            .collect();
        records.sort_by_key(|record| record.slot_id);
        records
    }

    // Outputs

    /// Queued messages for the transport's send-to-all / send-to-one
    /// primitives. Senders never receive their own broadcasts back; local
    /// effects are applied at send time.
    pub fn drain_outgoing(&mut self) -> Vec<(Recipient, Envelope)> {
        std::mem::take(&mut self.outgoing)
    }

    /// Queued authority-transfer signals for the replication substrate.
    pub fn drain_authority_signals(&mut self) -> Vec<AuthoritySignal> {
        self.authority.drain_signals()
    }

    // Internals

    /// Moves an entity out of this peer's pool when a lifecycle broadcast
    /// proves it is active. True if the entity is active afterwards.
    fn activate_entity(&mut self, entity_id: EntityId) -> bool {
        if self.entities.contains_key(&entity_id) {
            return true;
        }
        match self.pools.claim_by_id(entity_id) {
            Some(entity) => {
                self.entities.insert(entity_id, entity);
                true
            }
            None => false,
        }
    }

    /// Completes a two-sided slot merge: the observed occupant takes the
    /// broadcast configuration, exactly once.
    fn apply_plant_config(
        &mut self,
        entity_id: EntityId,
        slot_id: SlotId,
        config: &PlantConfig,
        now_epoch_seconds: i64,
    ) {
        if !self.activate_entity(entity_id) {
            error!(
                "planted config for entity {:?} this peer never observed, dropping",
                entity_id
            );
            return;
        }
        let Some(position) = self.slots.get(&slot_id).map(|slot| slot.position) else {
            return;
        };
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            return;
        };
        entity.position = position;
        entity.parent_slot = Some(slot_id);
        entity.grow_duration_seconds = config.grow_duration_seconds;
        entity.max_scale = config.max_scale;
        entity.scale_multiplier = config.scale_multiplier;
        entity.load(config.planted_epoch_seconds, now_epoch_seconds);
    }

    /// Shared sold handling: revert to seed-idle visuals everywhere; the
    /// authoritative peer also lifts the entity clear before pooling it.
    /// Every peer returns its local copy so pool membership stays
    /// consistent through the broadcast alone.
    fn apply_sold(&mut self, entity_id: EntityId) {
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            warn!("sold for unknown entity {:?}", entity_id);
            return;
        };
        entity.apply_sold();
        if entity.is_locally_authoritative(self.local_peer, self.role) {
            entity.position[1] += SOLD_RAISE;
        }
        if let Some(slot_id) = entity.parent_slot.take() {
            if let Some(slot) = self.slots.get_mut(&slot_id) {
                if slot.occupant == Some(entity_id) {
                    slot.clear();
                }
            }
        }
        self.finish_return(entity_id);
    }

    fn broadcast_balances(&mut self) {
        self.outgoing.push((
            Recipient::All,
            Envelope::new(MessageTarget::Economy, self.economy.snapshot()),
        ));
    }
}

/// Ownership lens over active entity storage for the coordinator's poll.
struct LocalOwnership<'a> {
    entities: &'a HashMap<EntityId, PlantableEntity>,
    local_peer: PeerId,
    role: PeerRole,
}

impl OwnershipView for LocalOwnership<'_> {
    fn locally_owned(&self, entity: &EntityId) -> bool {
        self.entities
            .get(entity)
            .map(|entity| entity.is_locally_authoritative(self.local_peer, self.role))
            .unwrap_or(false)
    }
}
