//! Scripted in-memory transport for driver tests
//!
//! Replies are queued up front; each `send` schedules the next one on the
//! tokio clock, so tests run under `start_paused` and stay deterministic.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use parking_lot::Mutex;
use tokio::time::{Instant, sleep_until};

use r30x::{Frame, PacketKind, Sensor, Transport};
use r30x_core::constants::DEFAULT_ADDRESS;
use r30x_transport::{Error, Result};

/// Acknowledgement frame from the default address
pub fn ack(code: u8, data: &[u8]) -> Vec<u8> {
    ack_from(DEFAULT_ADDRESS, code, data)
}

/// Acknowledgement frame from `address`
pub fn ack_from(address: u32, code: u8, data: &[u8]) -> Vec<u8> {
    let mut payload = vec![code];
    payload.extend_from_slice(data);
    Frame::new(address, PacketKind::Ack, payload)
        .expect("acknowledgement fits in a frame")
        .encode()
        .to_vec()
}

struct Chunk {
    ready_at: Instant,
    bytes: Vec<u8>,
}

struct Reply {
    delay: Duration,
    chunks: Vec<Vec<u8>>,
}

#[derive(Default)]
struct LinkState {
    connected: bool,
    inbound: VecDeque<Chunk>,
    replies: VecDeque<Reply>,
    sent: Vec<Vec<u8>>,
    clears: usize,
}

/// Test-side handle on a [`ScriptedTransport`]
#[derive(Clone, Default)]
pub struct Link {
    state: Arc<Mutex<LinkState>>,
}

impl Link {
    /// Answer the next command immediately
    pub fn reply(&self, bytes: Vec<u8>) {
        self.reply_after(Duration::ZERO, bytes);
    }

    /// Answer the next command after `delay`
    pub fn reply_after(&self, delay: Duration, bytes: Vec<u8>) {
        self.reply_in_chunks(delay, vec![bytes]);
    }

    /// Answer the next command in pieces, 1 ms apart, starting after `delay`
    pub fn reply_in_chunks(&self, delay: Duration, chunks: Vec<Vec<u8>>) {
        self.state.lock().replies.push_back(Reply { delay, chunks });
    }

    /// Leave the next command unanswered
    pub fn silence(&self) {
        self.reply_in_chunks(Duration::ZERO, Vec::new());
    }

    /// Bytes already waiting on the link before any command
    pub fn preload(&self, bytes: Vec<u8>) {
        self.state.lock().inbound.push_back(Chunk {
            ready_at: Instant::now(),
            bytes,
        });
    }

    /// Frames written by the driver so far
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    /// Inbound chunks not read or cleared yet
    pub fn pending(&self) -> usize {
        self.state.lock().inbound.len()
    }

    /// Number of input flushes requested
    pub fn clears(&self) -> usize {
        self.state.lock().clears
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }
}

/// In-memory [`Transport`] driven by a [`Link`]
pub struct ScriptedTransport {
    link: Link,
}

impl ScriptedTransport {
    pub fn new() -> (Self, Link) {
        let link = Link::default();
        (Self { link: link.clone() }, link)
    }

    pub fn connected() -> (Self, Link) {
        let (transport, link) = Self::new();
        link.state.lock().connected = true;
        (transport, link)
    }
}

/// Sensor on a connected scripted link
pub fn sensor() -> (Sensor, Link) {
    let (transport, link) = ScriptedTransport::connected();
    (Sensor::new(transport), link)
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<()> {
        let mut state = self.link.state.lock();
        if state.connected {
            return Err(Error::AlreadyConnected);
        }
        state.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.link.state.lock().connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.link.state.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }

        state.sent.push(data.to_vec());

        if let Some(reply) = state.replies.pop_front() {
            let now = Instant::now();
            for (i, bytes) in reply.chunks.into_iter().enumerate() {
                let ready_at = now + reply.delay + Duration::from_millis(i as u64);
                state.inbound.push_back(Chunk { ready_at, bytes });
            }
        }

        Ok(())
    }

    async fn receive(&mut self, buf: &mut BytesMut, timeout: Duration) -> Result<usize> {
        let deadline = Instant::now() + timeout;

        loop {
            let wake = {
                let mut state = self.link.state.lock();
                if !state.connected {
                    return Err(Error::NotConnected);
                }

                let now = Instant::now();
                let front_ready = state.inbound.front().map(|chunk| chunk.ready_at);
                match front_ready {
                    Some(ready_at) if ready_at <= now => {
                        let chunk = state.inbound.pop_front().expect("front chunk");
                        buf.extend_from_slice(&chunk.bytes);
                        return Ok(chunk.bytes.len());
                    }
                    _ if now >= deadline => return Err(Error::ReadTimeout),
                    Some(ready_at) => ready_at.min(deadline),
                    None => deadline,
                }
            };

            sleep_until(wake).await;
        }
    }

    async fn clear(&mut self) -> Result<()> {
        let mut state = self.link.state.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }

        let now = Instant::now();
        state.inbound.retain(|chunk| chunk.ready_at > now);
        state.clears += 1;
        Ok(())
    }

    fn port_name(&self) -> String {
        "scripted".to_string()
    }
}
