use verdant_shared::{EntityId, SlotId};

/// A trigger volume the engine reports enter/exit events for. The engine
/// side of this seam is entirely external; the core only consumes events
/// keyed by region and entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerRegion {
    Slot(SlotId),
    SellPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Enter,
    Exit,
}

/// One proximity observation from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub region: TriggerRegion,
    pub entity: EntityId,
    pub kind: TriggerKind,
}
