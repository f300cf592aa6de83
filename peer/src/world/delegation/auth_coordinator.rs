use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{info, warn};

use verdant_shared::{EntityId, PeerId, Timer};

use super::ownership::OwnershipView;

/// Immediate result of an authority request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityOutcome {
    /// The local peer already holds authority; no wait needed.
    Granted,
    /// A transfer signal went out (or was already outstanding); resolution
    /// arrives through `poll`.
    Pending,
}

/// Resolution of a pending request, delivered from `poll` on the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityEvent {
    Granted(EntityId),
    /// The deadline passed without an ownership change. The entity is
    /// untouched; the caller abandons its in-flight operation.
    TimedOut(EntityId),
}

/// A transfer request bound for the entity's current owner, carried by the
/// external replication substrate rather than this system's message set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthoritySignal {
    pub entity: EntityId,
    /// None addresses the controller peer, the default authority holder.
    pub current_owner: Option<PeerId>,
}

/// Requests and awaits write-authority over entities.
///
/// Transfer is never assumed: mutating an entity another peer owns starts
/// here, and the dependent operation resumes only on `Granted`. The wait is
/// bounded — each request carries a deadline timer checked once per tick —
/// and never blocks the tick loop or unrelated entities.
pub struct AuthorityCoordinator {
    pending: HashMap<EntityId, Timer>,
    signals: Vec<AuthoritySignal>,
}

impl AuthorityCoordinator {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            signals: Vec::new(),
        }
    }

    /// Requests authority over an entity.
    ///
    /// Returns `Granted` with zero wait when `locally_owned` is already
    /// true. Otherwise queues a transfer signal for the current owner and
    /// starts the deadline timer. A request for an entity that already has
    /// one outstanding is redundant — callers should suppress it — and
    /// leaves the original deadline running.
    pub fn request(
        &mut self,
        entity: EntityId,
        current_owner: Option<PeerId>,
        locally_owned: bool,
        timeout: Duration,
        now: Instant,
    ) -> AuthorityOutcome {
        if locally_owned {
            return AuthorityOutcome::Granted;
        }
        if self.pending.contains_key(&entity) {
            warn!(
                "authority request for entity {:?} already outstanding, suppressing",
                entity
            );
            return AuthorityOutcome::Pending;
        }
        info!(
            "requesting authority over entity {:?} from {:?}, will wait up to {:?}",
            entity, current_owner, timeout
        );
        self.pending.insert(entity, Timer::new(timeout, now));
        self.signals.push(AuthoritySignal {
            entity,
            current_owner,
        });
        AuthorityOutcome::Pending
    }

    pub fn is_pending(&self, entity: &EntityId) -> bool {
        self.pending.contains_key(entity)
    }

    /// Drops a pending request without resolving it.
    pub fn cancel(&mut self, entity: &EntityId) {
        self.pending.remove(entity);
    }

    /// Checks every pending request once: resolved as `Granted` when
    /// ownership has transferred to the local peer, `TimedOut` when the
    /// deadline passed first. Called once per tick.
    pub fn poll(&mut self, now: Instant, ownership: &dyn OwnershipView) -> Vec<AuthorityEvent> {
        let mut events = Vec::new();
        self.pending.retain(|entity, timer| {
            if ownership.locally_owned(entity) {
                events.push(AuthorityEvent::Granted(*entity));
                return false;
            }
            if timer.ringing(now) {
                warn!(
                    "authority request for entity {:?} timed out after {:?}",
                    entity,
                    timer.elapsed(now)
                );
                events.push(AuthorityEvent::TimedOut(*entity));
                return false;
            }
            true
        });
        events
    }

    /// Drains queued transfer signals for the replication substrate.
    pub fn drain_signals(&mut self) -> Vec<AuthoritySignal> {
        std::mem::take(&mut self.signals)
    }
}

impl Default for AuthorityCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
