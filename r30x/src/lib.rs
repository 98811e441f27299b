//! # r30x
//!
//! Rust driver for R30x (R305, R307, R308 and compatible) fingerprint sensor
//! modules.
//!
//! ## Features
//!
//! - Bit-exact implementation of the module's serial framing
//! - Async/await API using Tokio
//! - Per-command response budgets
//! - Typed per-command outcomes, separate from communication failures
//!
//! ## Quick Start
//!
//! ```no_run
//! use r30x::{CharBuffer, SaveOutcome, Sensor};
//!
//! #[tokio::main]
//! async fn main() -> r30x::Result<()> {
//!     let mut sensor = Sensor::serial("/dev/ttyUSB0");
//!     sensor.initialize().await?;
//!
//!     // Store whatever sits in buffer 1 at page 2
//!     match sensor.save_template(CharBuffer::One, 2).await? {
//!         SaveOutcome::Success => println!("Saved"),
//!         other => println!("Not saved: {:?}", other),
//!     }
//!
//!     sensor.close().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod sensor;
pub mod timeouts;

// Re-exports
pub use error::{Error, Result};
pub use sensor::Sensor;
pub use timeouts::Timeouts;

/// Uniform failure of a command exchange
pub type CommunicationFailure = Error;

// Re-export protocol types
pub use r30x_core::{CharBuffer, Command, Error as FrameError, Frame, PacketKind, Response};
pub use r30x_transport::{SerialTransport, Transport};
pub use r30x_types::{
    DeleteOutcome, EraseOutcome, ExtractOutcome, ImageOutcome, MergeOutcome, Outcome,
    PasswordOutcome, SaveOutcome, SearchMatch, SearchOutcome, TemplateCountOutcome,
};
