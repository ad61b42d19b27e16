//! tqsave - Titan Quest save file library.
//!
//! This crate provides a unified interface to the tqsave crates for reading,
//! editing and writing Titan Quest character, stash and vault files.
//!
//! # Crates
//!
//! - [`tqsave_common`] - Binary reading and writing, unique identifiers
//! - [`tqsave_record`] - Variables, record collections, text and binary codecs
//! - [`tqsave_files`] - Character, stash and vault wrappers
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tqsave::prelude::*;
//!
//! let provider = RecordCollectionProvider::new(BinaryCodec);
//! let stash = StashFile::load(&provider, Path::new("SaveData/Sys"), StashKind::Transfer, GameVersion::TQAE)?;
//! println!("{} items", stash.item_count()?);
//!
//! // Dump the stash as text
//! let text = TextCodec.encode(stash.collection())?;
//! std::fs::write("winsys.txt", text)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use tqsave_common as common;
pub use tqsave_files as files;
pub use tqsave_record as record;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tqsave_common::{BinaryReader, BinaryWriter, UniqueId};
    pub use tqsave_files::{PlayerFile, PlayerSummary, StashFile, StashKind, VaultFile};
    pub use tqsave_record::{
        BinaryCodec, DataType, Format, GameVersion, NoHints, RecordCodec, RecordCollection, RecordCollectionProvider,
        RecordId, TextCodec, TypeHints, Value, Variable,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
