use crate::types::{EntityId, PeerId, SlotId};

use super::message::GardenMessage;

/// The scope a message applies to. The transport routes by target; this
/// crate only defines the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTarget {
    Entity(EntityId),
    Slot(SlotId),
    Economy,
}

/// Who a queued outgoing message should be delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    All,
    Peer(PeerId),
}

/// A typed message bound to its scope, as queued for the transport or
/// handed to a peer on receive.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub target: MessageTarget,
    pub message: GardenMessage,
}

impl Envelope {
    pub fn new(target: MessageTarget, message: GardenMessage) -> Self {
        Self { target, message }
    }
}
