mod auth_coordinator;
mod ownership;

pub use auth_coordinator::{
    AuthorityCoordinator, AuthorityEvent, AuthorityOutcome, AuthoritySignal,
};
pub use ownership::OwnershipView;
