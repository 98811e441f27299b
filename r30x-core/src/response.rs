//! Module acknowledgements

use bytes::Bytes;

use crate::{
    error::{Error, Result},
    frame::{Frame, PacketKind},
};

/// Decoded acknowledgement of a single command
///
/// The confirmation code means different things for different commands;
/// interpreting it is left to the caller that knows which command was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// First payload byte
    pub confirmation_code: u8,

    /// Remaining payload bytes (page index, match score, template count...)
    pub data: Bytes,
}

impl Response {
    /// Extract a response from an acknowledgement frame
    pub fn from_frame(frame: Frame) -> Result<Self> {
        if frame.kind() != PacketKind::Ack {
            return Err(Error::UnexpectedPacketKind {
                expected: PacketKind::Ack,
                actual: frame.kind(),
            });
        }

        let Some(&confirmation_code) = frame.payload().first() else {
            return Err(Error::EmptyPayload);
        };

        Ok(Self {
            confirmation_code,
            data: frame.payload().slice(1..),
        })
    }

    /// Decode the first acknowledgement in `raw`
    ///
    /// Same contract as [`Frame::decode`], plus the frame must be an
    /// acknowledgement carrying a confirmation code.
    ///
    /// # Examples
    ///
    /// ```
    /// use r30x_core::Response;
    ///
    /// let raw = [0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x02, 0x00, 0x0C];
    /// let (response, _) = Response::decode(&raw, 0xFFFF_FFFF).unwrap();
    /// assert_eq!(response.confirmation_code, 0x02);
    /// ```
    pub fn decode(raw: &[u8], address: u32) -> Result<(Self, usize)> {
        let (frame, consumed) = Frame::decode(raw, address)?;
        Ok((Self::from_frame(frame)?, consumed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_ADDRESS;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_with_data() {
        let frame = Frame::new(DEFAULT_ADDRESS, PacketKind::Ack, vec![0x00, 0x00, 0x2A]).unwrap();
        let response = Response::from_frame(frame).unwrap();

        assert_eq!(response.confirmation_code, 0x00);
        assert_eq!(response.data.as_ref(), &[0x00, 0x2A]);
    }

    #[test]
    fn test_response_rejects_command_frames() {
        let frame = Frame::new(DEFAULT_ADDRESS, PacketKind::Command, vec![0x01]).unwrap();
        let result = Response::from_frame(frame);

        assert_eq!(
            result,
            Err(Error::UnexpectedPacketKind {
                expected: PacketKind::Ack,
                actual: PacketKind::Command,
            })
        );
    }

    #[test]
    fn test_response_rejects_empty_ack() {
        let frame = Frame::new(DEFAULT_ADDRESS, PacketKind::Ack, Bytes::new()).unwrap();
        assert_eq!(Response::from_frame(frame), Err(Error::EmptyPayload));
    }

    #[test]
    fn test_response_decode_after_noise() {
        let mut raw = vec![0x00];
        let frame = Frame::new(DEFAULT_ADDRESS, PacketKind::Ack, vec![0x0B]).unwrap();
        raw.extend_from_slice(&frame.encode());

        let (response, consumed) = Response::decode(&raw, DEFAULT_ADDRESS).unwrap();
        assert_eq!(response.confirmation_code, 0x0B);
        assert!(response.data.is_empty());
        assert_eq!(consumed, raw.len());
    }
}
