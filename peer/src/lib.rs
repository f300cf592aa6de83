//! # Verdant Peer
//! The per-peer simulation core for replicated plantables: entity pooling,
//! the plant lifecycle state machine, authority delegation, slot
//! reconciliation, and the economy ledger, driven by a single tick loop.
//!
//! Rendering, physics, transport, and storage stay outside: the embedder
//! feeds in trigger events, received messages, and the clock, and drains
//! queued outgoing messages for its transport.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use verdant_shared::{
        BalanceEntry, ByteReader, ByteWriter, EntityId, EntityTypeId, Envelope, GardenMessage,
        MessageError, MessageKind, MessageTarget, PeerId, PeerRole, Phase, PlantConfig, Recipient,
        SlotId, TimeError, Timer, Timestamp,
    };
}

mod definition;
mod economy;
mod garden_peer;
mod trigger;
mod world;

pub use definition::{DefinitionSet, PlantDefinition};
pub use economy::EconomyLedger;
pub use garden_peer::{GardenPeer, WorldLoadError};
pub use trigger::{TriggerEvent, TriggerKind, TriggerRegion};
pub use world::{
    delegation::{
        AuthorityCoordinator, AuthorityEvent, AuthorityOutcome, AuthoritySignal, OwnershipView,
    },
    plantable::PlantableEntity,
    pool::Pool,
    pool_manager::PoolManager,
    slot::{Slot, SlotMerge, SlotRecord},
};
