//! Serial transport for R30x modules
//!
//! The modules speak 8N1 UART, 57600 baud out of the box.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{
    ClearBuffer, DataBits, FlowControl, Parity, SerialPort, SerialPortBuilderExt, SerialStream,
    StopBits,
};
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// Default baud rate of the module
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Serial port transport
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Create new serial transport for the device at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            stream: None,
        }
    }

    /// Set baud rate (must match the module's configured rate)
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Get configured baud rate
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!("Opening {} at {} baud...", self.path, self.baud_rate);

        let stream = tokio_serial::new(&self.path, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .open_native_async()?;

        debug!("Opened {}", self.path);

        self.stream = Some(stream);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.stream.take().is_some() {
            debug!("Closed {}", self.path);
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {}", data.len(), hex::encode(data));

        stream.write_all(data).await?;
        stream.flush().await?;

        Ok(())
    }

    async fn receive(&mut self, buf: &mut BytesMut, timeout_duration: Duration) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let start = buf.len();

        let n = timeout(timeout_duration, stream.read_buf(buf))
            .await
            .map_err(|_| Error::ReadTimeout)?
            .map_err(|e| {
                warn!("Read error on {}: {}", self.path, e);
                Error::Io(e)
            })?;

        if n == 0 {
            warn!("{} reported end of stream", self.path);
            return Err(Error::ConnectionClosed);
        }

        trace!("Received {} bytes: {}", n, hex::encode(&buf[start..]));

        Ok(n)
    }

    async fn clear(&mut self) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;
        stream.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn port_name(&self) -> String {
        self.path.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("Serial transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serial_transport_create() {
        let transport = SerialTransport::new("/dev/ttyUSB0").with_baud_rate(115_200);

        assert!(!transport.is_connected());
        assert_eq!(transport.baud_rate(), 115_200);
        assert_eq!(transport.port_name(), "/dev/ttyUSB0");
    }

    #[tokio::test]
    async fn test_serial_transport_requires_connection() {
        let mut transport = SerialTransport::new("/dev/ttyUSB0");
        let mut buf = BytesMut::new();

        assert!(matches!(transport.send(&[0xEF, 0x01]).await, Err(Error::NotConnected)));
        assert!(matches!(
            transport.receive(&mut buf, Duration::from_millis(10)).await,
            Err(Error::NotConnected)
        ));
        assert!(matches!(transport.clear().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_serial_transport_missing_port() {
        let mut transport = SerialTransport::new("/dev/r30x-does-not-exist");

        let result = transport.connect().await;
        assert!(result.is_err());
        assert!(!transport.is_connected());
    }
}
