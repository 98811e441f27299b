//! R30x frame structure and encoding/decoding

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::{
    CHECKSUM_SIZE, HEADER_SIZE, MAX_PAYLOAD_SIZE, checksum,
    command::Command,
    constants::START_CODE,
    error::{Error, Result},
};

/// Packet identifier carried in byte 6 of every frame
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketKind {
    /// Host to module command
    Command = 0x01,
    /// Data packet with more to follow
    Data = 0x02,
    /// Module acknowledgement
    Ack = 0x07,
    /// Last data packet
    EndData = 0x08,
}

impl From<PacketKind> for u8 {
    fn from(kind: PacketKind) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for PacketKind {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Data),
            0x07 => Ok(Self::Ack),
            0x08 => Ok(Self::EndData),
            _ => Err(Error::UnknownPacketKind(value)),
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Command => "command",
            Self::Data => "data",
            Self::Ack => "ack",
            Self::EndData => "end-of-data",
        };
        write!(f, "{}(0x{:02X})", name, *self as u8)
    }
}

/// R30x protocol frame
///
/// # Frame Structure
///
/// ```text
/// ┌────────────┬────────────┬────────────┬────────────┬────────────┬────────────┐
/// │ Start code │  Address   │ Identifier │   Length   │  Payload   │  Checksum  │
/// │  2 bytes   │  4 bytes   │   1 byte   │  2 bytes   │  N bytes   │  2 bytes   │
/// │ 0xEF 0x01  │  (BE u32)  │            │ (BE, N+2)  │            │  (BE u16)  │
/// └────────────┴────────────┴────────────┴────────────┴────────────┴────────────┘
/// ```
///
/// All multi-byte values are big-endian. The checksum covers identifier,
/// length and payload.
///
/// # Examples
///
/// ```
/// use r30x_core::{Frame, PacketKind};
///
/// let frame = Frame::new(0xFFFF_FFFF, PacketKind::Ack, vec![0x00]).unwrap();
/// let encoded = frame.encode();
///
/// let (decoded, consumed) = Frame::decode(&encoded, 0xFFFF_FFFF).unwrap();
/// assert_eq!(frame, decoded);
/// assert_eq!(consumed, encoded.len());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    address: u32,
    kind: PacketKind,
    payload: Bytes,
}

impl Frame {
    /// Create a frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn new(address: u32, kind: PacketKind, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self {
            address,
            kind,
            payload,
        })
    }

    /// Module address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Packet identifier
    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    /// Frame payload (instruction or confirmation code first)
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Build the command frame for `command`
    pub fn command(address: u32, command: Command) -> Self {
        let mut payload = BytesMut::with_capacity(6);
        payload.put_u8(command.instruction());
        command.put_parameters(&mut payload);

        Self {
            address,
            kind: PacketKind::Command,
            payload: payload.freeze(),
        }
    }

    /// Value of the length field: payload plus checksum
    pub fn length(&self) -> u16 {
        // payload is capped at MAX_PAYLOAD_SIZE on construction
        (self.payload.len() + CHECKSUM_SIZE) as u16
    }

    /// Calculate checksum for this frame
    pub fn checksum(&self) -> u16 {
        checksum::calculate(self.kind.into(), self.length(), &self.payload)
    }

    /// Get total frame size
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + CHECKSUM_SIZE
    }

    /// Encode frame to bytes
    ///
    /// The checksum is always recomputed.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_slice(&START_CODE);
        buf.put_u32(self.address);
        buf.put_u8(self.kind.into());
        buf.put_u16(self.length());
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum());

        buf
    }

    /// Decode the first frame found in `raw`
    ///
    /// Bytes before the start code are noise and are skipped. A start code
    /// that does not lead to a valid frame is treated as noise too, as long
    /// as a later one does. On success the decoded frame is returned with the
    /// number of bytes consumed from `raw`, noise included.
    ///
    /// # Errors
    ///
    /// When no candidate decodes, the error of the earliest one is returned:
    /// - No complete frame is available yet ([`Error::Truncated`])
    /// - The address is not `address` ([`Error::HeaderMismatch`])
    /// - The identifier or length field is invalid
    /// - Checksum verification fails ([`Error::ChecksumMismatch`])
    pub fn decode(raw: &[u8], address: u32) -> Result<(Self, usize)> {
        let mut candidates = raw
            .windows(START_CODE.len())
            .enumerate()
            .filter(|(_, w)| *w == START_CODE)
            .map(|(start, _)| start);

        let Some(first) = candidates.next() else {
            return Err(Error::Truncated {
                expected: HEADER_SIZE,
                actual: raw.len(),
            });
        };

        let first_error = match Self::decode_at(&raw[first..], address) {
            Ok((frame, total)) => return Ok(Self::skipped(raw, first, frame, total)),
            Err(e) => e,
        };

        for start in candidates {
            if let Ok((frame, total)) = Self::decode_at(&raw[start..], address) {
                trace!("Start code at {} was noise: {}", first, first_error);
                return Ok(Self::skipped(raw, start, frame, total));
            }
        }

        Err(first_error)
    }

    fn skipped(raw: &[u8], start: usize, frame: Self, total: usize) -> (Self, usize) {
        if start > 0 {
            trace!("Skipping {} noise bytes: {}", start, hex::encode(&raw[..start]));
        }
        trace!("Decoded {:?}", frame);
        (frame, start + total)
    }

    /// Decode a frame starting exactly at the start code
    fn decode_at(frame: &[u8], address: u32) -> Result<(Self, usize)> {
        if frame.len() < HEADER_SIZE {
            return Err(Error::Truncated {
                expected: HEADER_SIZE,
                actual: frame.len(),
            });
        }

        let mut header = &frame[START_CODE.len()..HEADER_SIZE];
        let actual_address = header.get_u32();
        if actual_address != address {
            return Err(Error::HeaderMismatch {
                expected: address,
                actual: actual_address,
            });
        }

        let kind = PacketKind::try_from(header.get_u8())?;

        let length = header.get_u16();
        if usize::from(length) < CHECKSUM_SIZE {
            return Err(Error::InvalidLength(length));
        }

        let payload_len = usize::from(length) - CHECKSUM_SIZE;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let total = HEADER_SIZE + usize::from(length);
        if frame.len() < total {
            return Err(Error::Truncated {
                expected: total,
                actual: frame.len(),
            });
        }

        let payload = &frame[HEADER_SIZE..HEADER_SIZE + payload_len];
        let checksum_received = (&frame[HEADER_SIZE + payload_len..total]).get_u16();

        let checksum_calculated = checksum::calculate(kind.into(), length, payload);
        if checksum_calculated != checksum_received {
            return Err(Error::ChecksumMismatch {
                expected: checksum_calculated,
                received: checksum_received,
            });
        }

        let frame = Self {
            address,
            kind,
            payload: Bytes::copy_from_slice(payload),
        };

        Ok((frame, total))
    }
}

/// Encode `command` for the module at `address`
///
/// Commands with a fixed body reuse the precomputed table; the rest are
/// built and checksummed on the fly.
pub fn encode(address: u32, command: Command) -> BytesMut {
    match command.fixed_body() {
        Some(body) => {
            let mut buf = BytesMut::with_capacity(START_CODE.len() + 4 + body.len());
            buf.put_slice(&START_CODE);
            buf.put_u32(address);
            buf.put_slice(body);
            buf
        }
        None => Frame::command(address, command).encode(),
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("address", &format!("0x{:08X}", self.address))
            .field("kind", &self.kind)
            .field("checksum", &format!("0x{:04X}", self.checksum()))
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](address=0x{:08X}, len={})",
            self.kind,
            self.address,
            self.payload.len()
        )
    }
}
