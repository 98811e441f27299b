//! Per-command response budgets

use std::time::Duration;

use r30x_core::Command;

/// How long each command may take to be acknowledged
///
/// The sensor's operations differ by orders of magnitude (merging two
/// buffers takes a few milliseconds, erasing flash takes most of a second),
/// so every command has its own budget. The budget is also the only way to
/// abandon an exchange, so keep it tight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Password handshake
    pub handshake: Duration,

    /// Finger detection and image capture
    pub capture_image: Duration,

    /// Feature extraction into a char buffer
    pub image_to_buffer: Duration,

    /// Merging both buffers into a template
    pub register_model: Duration,

    /// Store, search, delete and template count
    pub library: Duration,

    /// Erasing the whole library
    pub erase_library: Duration,

    /// Quiet period that ends a drain after a failed exchange
    pub drain_quiet: Duration,

    /// Upper bound on a single drain
    pub drain_limit: Duration,
}

impl Timeouts {
    /// Budget for `command`
    pub fn for_command(&self, command: Command) -> Duration {
        match command {
            Command::VerifyPassword { .. } => self.handshake,
            Command::CaptureImage => self.capture_image,
            Command::ImageToBuffer(_) => self.image_to_buffer,
            Command::RegisterModel => self.register_model,
            Command::SaveTemplate { .. }
            | Command::Search { .. }
            | Command::DeleteTemplates { .. }
            | Command::TemplateCount => self.library,
            Command::EmptyLibrary => self.erase_library,
        }
    }

    /// Scale every command budget by `factor`, e.g. for slow USB adapters
    pub fn scaled(self, factor: u32) -> Self {
        Self {
            handshake: self.handshake * factor,
            capture_image: self.capture_image * factor,
            image_to_buffer: self.image_to_buffer * factor,
            register_model: self.register_model * factor,
            library: self.library * factor,
            erase_library: self.erase_library * factor,
            ..self
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            handshake: Duration::from_millis(100),
            capture_image: Duration::from_millis(300),
            image_to_buffer: Duration::from_millis(500),
            register_model: Duration::from_millis(50),
            library: Duration::from_millis(100),
            erase_library: Duration::from_millis(1000),
            drain_quiet: Duration::from_millis(20),
            drain_limit: Duration::from_millis(1000),
        }
    }
}
