use thiserror::Error;

use super::message::MessageKind;

/// Errors surfaced while decoding a received payload.
///
/// Both cases are handled at the component boundary: the message is logged
/// and ignored, never treated as fatal. A truncated payload has already
/// degraded to zero values inside the reader by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The single-byte discriminant does not name any known message kind
    #[error("Unknown message kind {kind}")]
    UnknownKind { kind: u8 },

    /// The payload ran out of bytes before the final field was read
    #[error("Truncated payload for {kind:?} message")]
    Truncated { kind: MessageKind },

    /// The state-sync phase flag does not name a known lifecycle phase
    #[error("Unknown phase flag {value} in state-sync payload")]
    UnknownPhase { value: u8 },
}
