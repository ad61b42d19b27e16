//! Error types for save file wrappers.

use thiserror::Error;
use tqsave_record::{DescriptorError, GameVersion};

/// Errors that can occur when working with save files.
#[derive(Debug, Error)]
pub enum Error {
    /// Record codec or storage error.
    #[error("{0}")]
    Record(#[from] tqsave_record::Error),

    /// Defective descriptor table.
    #[error("descriptor table: {0}")]
    Descriptor(#[from] DescriptorError),

    /// A well-known field is absent from the file.
    #[error("field {name:?} not found")]
    MissingField { name: &'static str },

    /// No descriptor of the key applies to the game version.
    #[error("{key} is not a field in {version}")]
    UnknownField { key: String, version: GameVersion },
}

/// Result type for save file operations.
pub type Result<T> = std::result::Result<T, Error>;
