//! # Verdant Shared
//! Common functionality shared between verdant peers: the wire codec,
//! the typed message set, identifier types, and time backends.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use verdant_serde::{
    ByteReader, ByteWriter, BYTE_SIZE, FLOAT_SIZE, INT_SIZE, LONG_SIZE, MAX_STRING_BYTES,
    SHORT_SIZE,
};

mod backends;
mod messages;
mod types;

pub use backends::{TimeError, Timer, Timestamp};
pub use messages::{
    envelope::{Envelope, MessageTarget, Recipient},
    error::MessageError,
    message::{BalanceEntry, GardenMessage, MessageKind, PlantConfig},
};
pub use types::{EntityId, EntityTypeId, PeerId, PeerRole, Phase, SlotId};
