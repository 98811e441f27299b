//! Error types for r30x-core

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Frame codec errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Not enough bytes yet to hold a complete frame
    #[error("Frame truncated: expected at least {expected} bytes, got {actual} bytes")]
    Truncated {
        expected: usize,
        actual: usize,
    },

    /// Start code found but the address does not belong to this module
    #[error("Header mismatch: expected address 0x{expected:08X}, got 0x{actual:08X}")]
    HeaderMismatch {
        expected: u32,
        actual: u32,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Packet identifier outside the protocol's set
    #[error("Unknown packet identifier: 0x{0:02X}")]
    UnknownPacketKind(u8),

    /// Valid frame of the wrong kind for the context
    #[error("Unexpected packet kind: expected {expected}, got {actual}")]
    UnexpectedPacketKind {
        expected: crate::frame::PacketKind,
        actual: crate::frame::PacketKind,
    },

    /// Length field too small to cover the checksum
    #[error("Invalid length field: {0}")]
    InvalidLength(u16),

    /// Payload too large
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Acknowledgement without a confirmation code
    #[error("Acknowledgement carries no confirmation code")]
    EmptyPayload,
}

impl Error {
    /// Check if more input could still turn this into a complete frame
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
