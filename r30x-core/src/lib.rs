//! # r30x-core
//!
//! Core protocol implementation for R30x fingerprint sensor modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Command definitions and the fixed command tables
//! - Protocol constants
//!
//! Nothing in here performs I/O.

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod response;

pub use command::{CharBuffer, Command};
pub use error::{Error, Result};
pub use frame::{Frame, PacketKind, encode};
pub use response::Response;

/// Frame header size: start code, address, identifier and length
pub const HEADER_SIZE: usize = 9;

/// Size of the trailing checksum
pub const CHECKSUM_SIZE: usize = 2;

/// Largest payload a frame may carry (the module's biggest data packet size)
pub const MAX_PAYLOAD_SIZE: usize = 256;
