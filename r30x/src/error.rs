//! High-level error types

use std::time::Duration;

use r30x_types::PasswordOutcome;

pub type Result<T> = std::result::Result<T, Error>;

/// Communication failure of a single exchange
///
/// Sensor-reported conditions such as "no finger" are not errors; they come
/// back as `Ok` outcomes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Frame error: {0}")]
    Frame(#[from] r30x_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] r30x_transport::Error),

    #[error("Malformed acknowledgement: {0}")]
    Types(#[from] r30x_types::Error),

    #[error("No complete acknowledgement to {command} within {waited:?}")]
    Timeout {
        command: &'static str,
        waited: Duration,
    },

    #[error("Handshake rejected: {0:?}")]
    HandshakeRejected(PasswordOutcome),
}

impl Error {
    /// Check if the exchange ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if a retry might succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Frame(_) | Self::Types(_)
        )
    }
}
