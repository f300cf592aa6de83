use verdant_shared::EntityId;

/// Read-only view of which entities the local peer currently holds
/// authority over. The coordinator polls through this seam instead of
/// holding a reference into entity storage.
pub trait OwnershipView {
    fn locally_owned(&self, entity: &EntityId) -> bool;
}
