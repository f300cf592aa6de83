use std::fmt;

/// Stable identity of a replicated entity, assigned by the replication
/// substrate. Opaque to this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Identity of a bounded planting slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

/// Identity of a connected peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(pub u64);

/// Groups interchangeable pooled entities, one id per plant species.
/// Stable across the session; used as the pool and registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTypeId(String);

impl EntityTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityTypeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityTypeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The controller peer holds session-wide arbitration for spawn and
/// world-state decisions; every other peer is a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerRole {
    Controller,
    Participant,
}

impl PeerRole {
    pub fn is_controller(self) -> bool {
        self == PeerRole::Controller
    }
}

/// Lifecycle phase of a plantable entity. Crosses the wire as a single
/// byte in state-sync payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pooled,
    Seed,
    Growing,
    Harvestable,
    Sold,
}

impl Phase {
    pub fn to_u8(self) -> u8 {
        match self {
            Phase::Pooled => 0,
            Phase::Seed => 1,
            Phase::Growing => 2,
            Phase::Harvestable => 3,
            Phase::Sold => 4,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Phase::Pooled),
            1 => Some(Phase::Seed),
            2 => Some(Phase::Growing),
            3 => Some(Phase::Harvestable),
            4 => Some(Phase::Sold),
            _ => None,
        }
    }
}
