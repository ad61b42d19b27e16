//! Error types for record parsing and serialization.

use thiserror::Error;

use crate::{DataType, GameVersion};

/// Errors that can occur when working with records.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] tqsave_common::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Typed access did not match the stored data type.
    #[error("variable {name:?} holds {actual}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: DataType,
        actual: DataType,
    },

    /// Value index past the end of the variable.
    #[error("index {index} out of range for variable {name:?} with {count} values")]
    IndexOutOfRange {
        name: String,
        index: usize,
        count: usize,
    },

    /// A variable must hold at least one value.
    #[error("variable {name:?} has no values")]
    EmptyVariable { name: String },

    /// Text line could not be split into name and values.
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// Text value could not be parsed as the expected type.
    #[error("variable {name:?}: {value:?} is not a valid {data_type}")]
    InvalidTextValue {
        name: String,
        data_type: DataType,
        value: String,
    },

    /// Binary form stores exactly one value per key.
    #[error("variable {name:?} has {count} values; the binary form holds one per key")]
    UnsupportedArity { name: String, count: usize },

    /// Bytes at a key position do not form a key.
    #[error("malformed key at offset {offset:#x}")]
    MalformedKey { offset: usize },

    /// Value of an unknown key could not be delimited.
    #[error("cannot determine the value of {name:?} at offset {offset:#x}")]
    UndecodableValue { name: String, offset: usize },

    /// Boolean field holding something other than 0 or 1.
    #[error("variable {name:?}: {value} is not a boolean")]
    InvalidBoolean { name: String, value: u32 },

    /// Value cannot be represented in the target format.
    #[error("variable {name:?} cannot be encoded: {reason}")]
    Unencodable { name: String, reason: String },

    /// Collection cannot be written under the requested name.
    #[error("invalid destination {name:?}: {reason}")]
    InvalidDestination { name: String, reason: &'static str },

    /// `begin_block`/`end_block` markers do not nest.
    #[error("unbalanced block marker at variable {index}")]
    UnbalancedBlock { index: usize },

    /// Descriptor table defect.
    #[error("{0}")]
    Descriptor(#[from] DescriptorError),
}

/// Defects in a descriptor table, detected when the table is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Two descriptors tie as the most specific match.
    #[error("{subject} resolves ambiguously for {version}")]
    Ambiguous {
        subject: String,
        version: GameVersion,
    },

    /// A descriptor that applies to no edition.
    #[error("descriptor {name:?} applies to no game version")]
    EmptyVersion { name: String },
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, Error>;
