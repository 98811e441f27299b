//! Protocol constants

/// Start code opening every frame, high byte first
pub const START_CODE: [u8; 2] = [0xEF, 0x01];

/// Factory default module address
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;

/// Factory default handshake password
pub const DEFAULT_PASSWORD: u32 = 0x0000_0000;

/// Instruction codes, named after the module datasheet
pub mod instruction {
    /// Capture a finger image into the image buffer
    pub const GEN_IMG: u8 = 0x01;

    /// Extract features from the image into a char buffer
    pub const IMG_2_TZ: u8 = 0x02;

    /// Search the library for the features in a char buffer
    pub const SEARCH: u8 = 0x04;

    /// Merge both char buffers into a template
    pub const REG_MODEL: u8 = 0x05;

    /// Store a char buffer into a library page
    pub const STORE: u8 = 0x06;

    /// Delete a range of library pages
    pub const DELET_CHAR: u8 = 0x0C;

    /// Erase the whole library
    pub const EMPTY: u8 = 0x0D;

    /// Verify the handshake password
    pub const VFY_PWD: u8 = 0x13;

    /// Read the number of stored templates
    pub const TEMPLATE_NUM: u8 = 0x1D;
}
