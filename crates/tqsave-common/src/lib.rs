//! Common utilities for tqsave.
//!
//! This crate provides the foundational types used across all tqsave crates:
//!
//! - [`BinaryReader`] - Cursor-style reading from byte slices
//! - [`BinaryWriter`] - Little-endian writer producing the game's byte layout
//! - [`UniqueId`] - The 16-byte identifier stored in character and item records
//! - [`latin1`] - Lossless single-byte string encoding used by save files

mod error;
mod reader;
mod unique_id;
mod writer;

pub mod latin1;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use unique_id::UniqueId;
pub use writer::BinaryWriter;
