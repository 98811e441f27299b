//! Command driver for R30x sensor modules

use std::fmt;
use std::time::Duration;

use bytes::BytesMut;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use r30x_core::{CharBuffer, Command, Response, constants};
use r30x_transport::{SerialTransport, Transport};
use r30x_types::{
    DeleteOutcome, EraseOutcome, ExtractOutcome, ImageOutcome, MergeOutcome, Outcome,
    PasswordOutcome, SaveOutcome, SearchOutcome, TemplateCountOutcome,
};

use crate::error::{Error, Result};
use crate::timeouts::Timeouts;

/// Fingerprint sensor module
///
/// Drives one command at a time over an exclusively owned transport. Every
/// operation runs the same exchange: flush stale input, send the command
/// frame, wait for the acknowledgement within the command's budget, then map
/// its confirmation code to the command's outcome type. A failed exchange
/// drains late bytes from the link before the error is returned.
///
/// # Examples
///
/// ```no_run
/// use r30x::{CharBuffer, ImageOutcome, Sensor};
///
/// #[tokio::main]
/// async fn main() -> r30x::Result<()> {
///     let mut sensor = Sensor::serial("/dev/ttyUSB0");
///     sensor.initialize().await?;
///
///     if sensor.capture_image().await? == ImageOutcome::Success {
///         sensor.image_to_buffer(CharBuffer::One).await?;
///         let outcome = sensor.search(CharBuffer::One, 0, 500).await?;
///         println!("Search: {:?}", outcome);
///     }
///
///     sensor.close().await?;
///     Ok(())
/// }
/// ```
pub struct Sensor {
    transport: Box<dyn Transport>,
    address: u32,
    password: u32,
    timeouts: Timeouts,
    received: BytesMut,
}

impl Sensor {
    /// Receive buffer capacity; acknowledgements are a dozen bytes or so
    const RECEIVE_CAPACITY: usize = 64;

    /// Create a sensor talking through `transport`
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            address: constants::DEFAULT_ADDRESS,
            password: constants::DEFAULT_PASSWORD,
            timeouts: Timeouts::default(),
            received: BytesMut::with_capacity(Self::RECEIVE_CAPACITY),
        }
    }

    /// Create a sensor on the serial port at `path` (57600 baud)
    pub fn serial(path: impl Into<String>) -> Self {
        Self::new(SerialTransport::new(path))
    }

    /// Set module address (default: 0xFFFFFFFF)
    pub fn with_address(mut self, address: u32) -> Self {
        self.address = address;
        self
    }

    /// Set handshake password (default: 0)
    pub fn with_password(mut self, password: u32) -> Self {
        self.password = password;
        self
    }

    /// Set command budgets
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Get command budgets
    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Open the link if needed and perform the password handshake
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandshakeRejected`] if the module answers with
    /// anything but a correct-password acknowledgement.
    pub async fn initialize(&mut self) -> Result<()> {
        if !self.transport.is_connected() {
            info!("Connecting to {}...", self.transport.port_name());
            self.transport.connect().await?;
        }

        match self.verify_password().await? {
            PasswordOutcome::Correct => {
                info!("Sensor on {} ready", self.transport.port_name());
                Ok(())
            }
            outcome => {
                warn!("Handshake rejected: {:?}", outcome);
                Err(Error::HandshakeRejected(outcome))
            }
        }
    }

    /// Close the link
    pub async fn close(&mut self) -> Result<()> {
        if self.transport.is_connected() {
            info!("Disconnecting from {}...", self.transport.port_name());
            self.transport.disconnect().await?;
        }
        Ok(())
    }

    /// Verify the configured password
    pub async fn verify_password(&mut self) -> Result<PasswordOutcome> {
        self.execute(Command::VerifyPassword {
            password: self.password,
        })
        .await
    }

    /// Detect a finger and capture its image
    pub async fn capture_image(&mut self) -> Result<ImageOutcome> {
        self.execute(Command::CaptureImage).await
    }

    /// Extract features of the captured image into `buffer`
    pub async fn image_to_buffer(&mut self, buffer: CharBuffer) -> Result<ExtractOutcome> {
        self.execute(Command::ImageToBuffer(buffer)).await
    }

    /// Merge both char buffers into a template
    pub async fn merge_buffers_to_model(&mut self) -> Result<MergeOutcome> {
        self.execute(Command::RegisterModel).await
    }

    /// Store the template in `buffer` at library page `page`
    pub async fn save_template(&mut self, buffer: CharBuffer, page: u16) -> Result<SaveOutcome> {
        self.execute(Command::SaveTemplate { buffer, page }).await
    }

    /// Search `page_count` library pages from `start_page` for `buffer`
    pub async fn search(
        &mut self,
        buffer: CharBuffer,
        start_page: u16,
        page_count: u16,
    ) -> Result<SearchOutcome> {
        self.execute(Command::Search {
            buffer,
            start_page,
            page_count,
        })
        .await
    }

    /// Delete `count` templates from `start_page` on
    pub async fn delete_templates(&mut self, start_page: u16, count: u16) -> Result<DeleteOutcome> {
        self.execute(Command::DeleteTemplates { start_page, count })
            .await
    }

    /// Erase every template in the library
    pub async fn erase_library(&mut self) -> Result<EraseOutcome> {
        self.execute(Command::EmptyLibrary).await
    }

    /// Read the number of stored templates
    pub async fn template_count(&mut self) -> Result<TemplateCountOutcome> {
        self.execute(Command::TemplateCount).await
    }

    // Exchange

    async fn execute<O>(&mut self, command: Command) -> Result<O>
    where
        O: Outcome + fmt::Debug,
    {
        let budget = self.timeouts.for_command(command);

        debug!("Executing {} (budget {:?})...", command, budget);

        let result = match self.exchange(command, budget).await {
            Ok(response) => O::from_reply(response.confirmation_code, &response.data)
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                debug!("{} -> {:?}", command, outcome);
                Ok(outcome)
            }
            Err(e) => {
                warn!("{} failed: {}", command, e);
                self.drain().await;
                Err(e)
            }
        }
    }

    async fn exchange(&mut self, command: Command, budget: Duration) -> Result<Response> {
        self.flush().await?;

        let frame = r30x_core::encode(self.address, command);
        trace!("Sending {}: {:02X?}", command, &frame[..]);
        self.transport.send(&frame).await?;

        let started = Instant::now();
        let deadline = started + budget;

        loop {
            match Response::decode(&self.received, self.address) {
                Ok((response, consumed)) => {
                    if consumed < self.received.len() {
                        trace!(
                            "Ignoring {} bytes after acknowledgement",
                            self.received.len() - consumed
                        );
                    }
                    trace!("Received {:?} after {:?}", response, started.elapsed());
                    return Ok(response);
                }
                Err(e) if e.is_incomplete() => {}
                Err(e) => return Err(e.into()),
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Self::timeout(command, started));
            }

            match self.transport.receive(&mut self.received, remaining).await {
                Ok(_) => {}
                Err(r30x_transport::Error::ReadTimeout) => {
                    return Err(Self::timeout(command, started));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Discard everything left over from earlier exchanges
    async fn flush(&mut self) -> Result<()> {
        self.transport.clear().await?;
        self.received.clear();
        Ok(())
    }

    /// Read and discard until the link has been quiet for `drain_quiet`
    async fn drain(&mut self) {
        let started = Instant::now();
        let limit = self.timeouts.drain_limit;
        let mut discarded = 0;

        self.received.clear();

        loop {
            let left = limit.saturating_sub(started.elapsed());
            if left.is_zero() {
                warn!("Link still busy after draining for {:?}", limit);
                break;
            }

            let quiet = self.timeouts.drain_quiet.min(left);
            match self.transport.receive(&mut self.received, quiet).await {
                Ok(n) => {
                    discarded += n;
                    self.received.clear();
                }
                Err(_) => break,
            }
        }

        if discarded > 0 {
            debug!("Drained {} late bytes", discarded);
        }
    }

    fn timeout(command: Command, started: Instant) -> Error {
        Error::Timeout {
            command: command.name(),
            waited: started.elapsed(),
        }
    }
}

impl fmt::Debug for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sensor")
            .field("port", &self.transport.port_name())
            .field("address", &format!("0x{:08X}", self.address))
            .field("connected", &self.transport.is_connected())
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
