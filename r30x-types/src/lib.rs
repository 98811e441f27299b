//! Type definitions for r30x

pub mod error;
pub mod outcome;

pub use error::{Error, Result};
pub use outcome::{
    DeleteOutcome, EraseOutcome, ExtractOutcome, ImageOutcome, MergeOutcome, Outcome,
    PasswordOutcome, SaveOutcome, SearchMatch, SearchOutcome, TemplateCountOutcome,
};
