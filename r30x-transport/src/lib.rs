//! Transport layer for the R30x protocol
//!
//! Provides the byte-stream abstraction the driver talks through, and its
//! serial port implementation.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::SerialTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-stream transport to a sensor module
///
/// The link is half-duplex: one command goes out, one acknowledgement comes
/// back. Implementations only move bytes; framing belongs to the caller.
#[async_trait]
pub trait Transport: Send {
    /// Open the link
    async fn connect(&mut self) -> Result<()>;

    /// Close the link
    async fn disconnect(&mut self) -> Result<()>;

    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Send raw bytes
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Append whatever arrives next to `buf`
    ///
    /// Waits at most `timeout` for at least one byte and returns how many
    /// bytes were appended. Fails with [`Error::ReadTimeout`] when nothing
    /// arrived in time.
    async fn receive(&mut self, buf: &mut BytesMut, timeout: Duration) -> Result<usize>;

    /// Discard inbound bytes that have not been read yet
    async fn clear(&mut self) -> Result<()>;

    /// Get a printable name of the link
    fn port_name(&self) -> String;
}
