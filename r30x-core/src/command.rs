//! R30x command definitions

use std::fmt;

use bytes::BufMut;

use crate::constants::{DEFAULT_PASSWORD, instruction};

/// Feature buffers on the module
///
/// Extracted features land in one of the two char buffers before they are
/// merged into a template or searched for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CharBuffer {
    One = 1,
    Two = 2,
}

impl From<CharBuffer> for u8 {
    fn from(buffer: CharBuffer) -> u8 {
        buffer as u8
    }
}

impl TryFrom<u8> for CharBuffer {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(other),
        }
    }
}

/// Commands understood by the module
///
/// Page indices and counts are sent as-is. The library size (typically
/// pages 0 to 929) is enforced by the module, which answers out-of-range
/// pages with its own confirmation code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Handshake: verify the module password
    VerifyPassword { password: u32 },

    /// Detect a finger and capture its image
    CaptureImage,

    /// Extract the captured image into a char buffer
    ImageToBuffer(CharBuffer),

    /// Merge char buffers 1 and 2 into a template
    RegisterModel,

    /// Store the template in `buffer` at library page `page`
    SaveTemplate { buffer: CharBuffer, page: u16 },

    /// Search `page_count` pages starting at `start_page` for `buffer`
    Search {
        buffer: CharBuffer,
        start_page: u16,
        page_count: u16,
    },

    /// Delete `count` templates starting at `start_page`
    DeleteTemplates { start_page: u16, count: u16 },

    /// Erase every template in the library
    EmptyLibrary,

    /// Read the number of stored templates
    TemplateCount,
}

// Fixed command bodies: identifier, length, instruction, parameters, checksum.
const VERIFY_DEFAULT_PASSWORD: [u8; 10] = [0x01, 0x00, 0x07, 0x13, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1B];
const CAPTURE_IMAGE: [u8; 6] = [0x01, 0x00, 0x03, 0x01, 0x00, 0x05];
const IMAGE_TO_BUFFER_1: [u8; 7] = [0x01, 0x00, 0x04, 0x02, 0x01, 0x00, 0x08];
const IMAGE_TO_BUFFER_2: [u8; 7] = [0x01, 0x00, 0x04, 0x02, 0x02, 0x00, 0x09];
const REGISTER_MODEL: [u8; 6] = [0x01, 0x00, 0x03, 0x05, 0x00, 0x09];
const EMPTY_LIBRARY: [u8; 6] = [0x01, 0x00, 0x03, 0x0D, 0x00, 0x11];
const TEMPLATE_COUNT: [u8; 6] = [0x01, 0x00, 0x03, 0x1D, 0x00, 0x21];

impl Command {
    /// Instruction code sent as the first payload byte
    pub fn instruction(self) -> u8 {
        match self {
            Self::VerifyPassword { .. } => instruction::VFY_PWD,
            Self::CaptureImage => instruction::GEN_IMG,
            Self::ImageToBuffer(_) => instruction::IMG_2_TZ,
            Self::RegisterModel => instruction::REG_MODEL,
            Self::SaveTemplate { .. } => instruction::STORE,
            Self::Search { .. } => instruction::SEARCH,
            Self::DeleteTemplates { .. } => instruction::DELET_CHAR,
            Self::EmptyLibrary => instruction::EMPTY,
            Self::TemplateCount => instruction::TEMPLATE_NUM,
        }
    }

    /// Get command name, as used in the datasheet
    pub fn name(self) -> &'static str {
        match self {
            Self::VerifyPassword { .. } => "VfyPwd",
            Self::CaptureImage => "GenImg",
            Self::ImageToBuffer(_) => "Img2Tz",
            Self::RegisterModel => "RegModel",
            Self::SaveTemplate { .. } => "Store",
            Self::Search { .. } => "Search",
            Self::DeleteTemplates { .. } => "DeletChar",
            Self::EmptyLibrary => "Empty",
            Self::TemplateCount => "TempleteNum",
        }
    }

    /// Append the parameter bytes that follow the instruction code
    pub fn put_parameters(self, buf: &mut impl BufMut) {
        match self {
            Self::VerifyPassword { password } => buf.put_u32(password),
            Self::ImageToBuffer(buffer) => buf.put_u8(buffer.into()),
            Self::SaveTemplate { buffer, page } => {
                buf.put_u8(buffer.into());
                buf.put_u16(page);
            }
            Self::Search {
                buffer,
                start_page,
                page_count,
            } => {
                buf.put_u8(buffer.into());
                buf.put_u16(start_page);
                buf.put_u16(page_count);
            }
            Self::DeleteTemplates { start_page, count } => {
                buf.put_u16(start_page);
                buf.put_u16(count);
            }
            Self::CaptureImage | Self::RegisterModel | Self::EmptyLibrary | Self::TemplateCount => {}
        }
    }

    /// Parameter bytes that follow the instruction code
    pub fn parameters(self) -> Vec<u8> {
        let mut params = Vec::with_capacity(5);
        self.put_parameters(&mut params);
        params
    }

    /// Precomputed frame body for commands without variable parameters
    ///
    /// The body spans identifier, length, instruction, parameters and
    /// checksum; it does not depend on the module address.
    pub fn fixed_body(self) -> Option<&'static [u8]> {
        match self {
            Self::VerifyPassword {
                password: DEFAULT_PASSWORD,
            } => Some(&VERIFY_DEFAULT_PASSWORD),
            Self::CaptureImage => Some(&CAPTURE_IMAGE),
            Self::ImageToBuffer(CharBuffer::One) => Some(&IMAGE_TO_BUFFER_1),
            Self::ImageToBuffer(CharBuffer::Two) => Some(&IMAGE_TO_BUFFER_2),
            Self::RegisterModel => Some(&REGISTER_MODEL),
            Self::EmptyLibrary => Some(&EMPTY_LIBRARY),
            Self::TemplateCount => Some(&TEMPLATE_COUNT),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.instruction())
    }
}
