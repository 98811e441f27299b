//! R30x checksum algorithm
//!
//! The checksum is the arithmetic sum of every byte from the packet
//! identifier through the end of the payload, including both length bytes,
//! truncated to 16 bits. Start code and address are not covered.

use tracing::trace;

/// Calculate a frame checksum
///
/// `length` is the value of the frame's length field, i.e. the payload length
/// plus the two checksum bytes.
///
/// # Examples
///
/// ```
/// use r30x_core::checksum;
///
/// // GenImg: identifier 0x01, length 3, instruction 0x01
/// assert_eq!(checksum::calculate(0x01, 3, &[0x01]), 0x0005);
/// ```
pub fn calculate(identifier: u8, length: u16, payload: &[u8]) -> u16 {
    let [length_hi, length_lo] = length.to_be_bytes();

    let checksum = payload
        .iter()
        .chain(&[identifier, length_hi, length_lo])
        .fold(0u16, |sum, byte| sum.wrapping_add(u16::from(*byte)));

    trace!(
        identifier = identifier,
        length = length,
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify checksum
pub fn verify(identifier: u8, length: u16, payload: &[u8], expected: u16) -> bool {
    calculate(identifier, length, payload) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty_payload() {
        assert_eq!(calculate(0x07, 2, &[]), 0x0009);
    }

    #[test]
    fn test_checksum_handshake() {
        // VfyPwd with the default password
        let checksum = calculate(0x01, 7, &[0x13, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(checksum, 0x001B);
    }

    #[test]
    fn test_checksum_search() {
        let checksum = calculate(0x01, 8, &[0x04, 0x01, 0x00, 0x00, 0x01, 0xF4]);
        assert_eq!(checksum, 0x0103);
    }

    #[test]
    fn test_checksum_verify() {
        let payload = [0x06, 0x01, 0x00, 0x02];
        let checksum = calculate(0x01, 6, &payload);

        assert!(verify(0x01, 6, &payload, checksum));
        assert!(!verify(0x01, 6, &payload, checksum.wrapping_add(1)));
    }

    #[test]
    fn test_checksum_wraps_at_16_bits() {
        // 0x07 + 0x01 + 0x02 + 256 * 0xFF = 0xFF0A
        let payload = vec![0xFF; 256];
        assert_eq!(calculate(0x07, 0x0102, &payload), 0xFF0A);

        // one more 0xFF byte pushes past 0xFFFF
        let payload = vec![0xFF; 257];
        assert_eq!(calculate(0x07, 0x0103, &payload), 0x000A);
    }

    #[test]
    fn test_checksum_length_bytes_matter() {
        assert_ne!(calculate(0x01, 3, &[0x01]), calculate(0x01, 4, &[0x01]));
    }
}
