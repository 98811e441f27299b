//! Business outcomes of sensor commands
//!
//! Each command has its own confirmation-code table; the same byte value
//! means different things for different commands. An outcome is a valid,
//! successfully exchanged answer even when it reports that the operation
//! did not succeed (no finger, no match, ...).

use crate::error::{Error, Result};

/// Interpretation of a confirmation code for one specific command
pub trait Outcome: Sized {
    /// Map the confirmation code and trailing data of an acknowledgement
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the code promises data the
    /// acknowledgement does not carry.
    fn from_reply(code: u8, data: &[u8]) -> Result<Self>;

    /// Check if the sensor reported success
    fn is_success(&self) -> bool;
}

/// Result of the password handshake (VfyPwd)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordOutcome {
    Correct,
    PacketError,
    Incorrect,
    Unrecognized(u8),
}

impl Outcome for PasswordOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Correct,
            0x01 => Self::PacketError,
            0x13 => Self::Incorrect,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Correct)
    }
}

/// Result of capturing a finger image (GenImg)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Success,
    PacketError,
    /// No finger on the sensor
    NoFinger,
    /// Finger detected but the image could not be taken
    CaptureFailed,
    Unrecognized(u8),
}

impl Outcome for ImageOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x02 => Self::NoFinger,
            0x03 => Self::CaptureFailed,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of extracting features into a char buffer (Img2Tz)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    Success,
    PacketError,
    /// Image too disordered to extract features from
    DisorderedImage,
    /// Too few minutiae in the image
    TooFewFeatures,
    /// No valid image in the image buffer
    NoImage,
    Unrecognized(u8),
}

impl Outcome for ExtractOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x06 => Self::DisorderedImage,
            0x07 => Self::TooFewFeatures,
            0x15 => Self::NoImage,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of merging both char buffers into a template (RegModel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Success,
    PacketError,
    /// The buffers hold different fingers
    FingerMismatch,
    Unrecognized(u8),
}

impl Outcome for MergeOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x0A => Self::FingerMismatch,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of storing a template (Store)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Success,
    PacketError,
    /// Page index beyond the library
    PageOutOfRange,
    /// Writing the template to flash failed
    FlashError,
    Unrecognized(u8),
}

impl Outcome for SaveOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x0B => Self::PageOutOfRange,
            0x18 => Self::FlashError,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Library page matched by a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Page index of the matching template
    pub page: u16,

    /// Match score reported by the module
    pub score: u16,
}

/// Result of searching the library (Search)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(SearchMatch),
    PacketError,
    NotFound,
    Unrecognized(u8),
}

impl SearchOutcome {
    /// Matched page, if any
    pub fn page(&self) -> Option<u16> {
        match self {
            Self::Found(found) => Some(found.page),
            _ => None,
        }
    }
}

impl Outcome for SearchOutcome {
    fn from_reply(code: u8, data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => {
                let &[page_hi, page_lo, score_hi, score_lo, ..] = data else {
                    return Err(Error::Parse(format!(
                        "search match needs 4 data bytes, got {}",
                        data.len()
                    )));
                };
                Self::Found(SearchMatch {
                    page: u16::from_be_bytes([page_hi, page_lo]),
                    score: u16::from_be_bytes([score_hi, score_lo]),
                })
            }
            0x01 => Self::PacketError,
            0x09 => Self::NotFound,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Result of deleting a range of templates (DeletChar)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Success,
    PacketError,
    DeleteFailed,
    Unrecognized(u8),
}

impl Outcome for DeleteOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x10 => Self::DeleteFailed,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of erasing the library (Empty)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseOutcome {
    Success,
    PacketError,
    EraseFailed,
    Unrecognized(u8),
}

impl Outcome for EraseOutcome {
    fn from_reply(code: u8, _data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Success,
            0x01 => Self::PacketError,
            0x11 => Self::EraseFailed,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Result of reading the template count (TempleteNum)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateCountOutcome {
    Count(u16),
    PacketError,
    Unrecognized(u8),
}

impl Outcome for TemplateCountOutcome {
    fn from_reply(code: u8, data: &[u8]) -> Result<Self> {
        Ok(match code {
            0x00 => {
                let &[count_hi, count_lo, ..] = data else {
                    return Err(Error::Parse(format!(
                        "template count needs 2 data bytes, got {}",
                        data.len()
                    )));
                };
                Self::Count(u16::from_be_bytes([count_hi, count_lo]))
            }
            0x01 => Self::PacketError,
            other => Self::Unrecognized(other),
        })
    }

    fn is_success(&self) -> bool {
        matches!(self, Self::Count(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_outcome_codes() {
        assert_eq!(SaveOutcome::from_reply(0x00, &[]), Ok(SaveOutcome::Success));
        assert_eq!(SaveOutcome::from_reply(0x0B, &[]), Ok(SaveOutcome::PageOutOfRange));
        assert_eq!(SaveOutcome::from_reply(0x18, &[]), Ok(SaveOutcome::FlashError));
    }

    #[test]
    fn test_same_code_differs_per_command() {
        // 0x0B is a range error for Store but unknown to GenImg
        assert_eq!(SaveOutcome::from_reply(0x0B, &[]), Ok(SaveOutcome::PageOutOfRange));
        assert_eq!(ImageOutcome::from_reply(0x0B, &[]), Ok(ImageOutcome::Unrecognized(0x0B)));

        // 0x02 means no finger for GenImg only
        assert_eq!(ImageOutcome::from_reply(0x02, &[]), Ok(ImageOutcome::NoFinger));
        assert_eq!(MergeOutcome::from_reply(0x02, &[]), Ok(MergeOutcome::Unrecognized(0x02)));
    }

    #[test]
    fn test_extract_outcome_codes() {
        assert_eq!(ExtractOutcome::from_reply(0x06, &[]), Ok(ExtractOutcome::DisorderedImage));
        assert_eq!(ExtractOutcome::from_reply(0x07, &[]), Ok(ExtractOutcome::TooFewFeatures));
        assert_eq!(ExtractOutcome::from_reply(0x15, &[]), Ok(ExtractOutcome::NoImage));
    }

    #[test]
    fn test_search_found() {
        let outcome = SearchOutcome::from_reply(0x00, &[0x00, 0x07, 0x00, 0x63]).unwrap();

        assert_eq!(outcome, SearchOutcome::Found(SearchMatch { page: 7, score: 99 }));
        assert_eq!(outcome.page(), Some(7));
        assert!(outcome.is_success());
    }

    #[test]
    fn test_search_not_found() {
        let outcome = SearchOutcome::from_reply(0x09, &[0x00, 0x00, 0x00, 0x00]).unwrap();

        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(outcome.page(), None);
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_search_found_without_data() {
        let result = SearchOutcome::from_reply(0x00, &[0x00]);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_template_count() {
        assert_eq!(
            TemplateCountOutcome::from_reply(0x00, &[0x01, 0x2C]),
            Ok(TemplateCountOutcome::Count(300))
        );
        assert!(TemplateCountOutcome::from_reply(0x00, &[]).is_err());
        assert_eq!(
            TemplateCountOutcome::from_reply(0x01, &[]),
            Ok(TemplateCountOutcome::PacketError)
        );
    }

    #[test]
    fn test_password_outcome() {
        assert!(PasswordOutcome::from_reply(0x00, &[]).unwrap().is_success());
        assert_eq!(PasswordOutcome::from_reply(0x13, &[]), Ok(PasswordOutcome::Incorrect));
    }

    #[test]
    fn test_erase_and_delete_failures() {
        assert_eq!(EraseOutcome::from_reply(0x11, &[]), Ok(EraseOutcome::EraseFailed));
        assert_eq!(DeleteOutcome::from_reply(0x10, &[]), Ok(DeleteOutcome::DeleteFailed));
        assert_eq!(DeleteOutcome::from_reply(0xFE, &[]), Ok(DeleteOutcome::Unrecognized(0xFE)));
    }
}
