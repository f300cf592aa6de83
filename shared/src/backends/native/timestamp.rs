use std::time::SystemTime;

use thiserror::Error;

/// Error type for timestamp operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeError {
    /// System time is before UNIX epoch
    #[error("System time is before UNIX epoch")]
    SystemTimeBeforeEpoch,
}

pub struct Timestamp;

impl Timestamp {
    /// Returns the current timestamp in seconds since UNIX epoch.
    ///
    /// The simulation core itself never calls this: epoch seconds are
    /// passed into `tick` by the embedder so that every growth computation
    /// is reproducible. This is the production source for that argument.
    ///
    /// # Errors
    /// Returns `TimeError::SystemTimeBeforeEpoch` if system time is before
    /// UNIX epoch.
    pub fn try_now() -> Result<i64, TimeError> {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .map_err(|_| TimeError::SystemTimeBeforeEpoch)
    }
}
