//! Titan Quest save file wrappers.
//!
//! Typed views over the record collections stored in:
//! - `Player.chr` - one character ([`PlayerFile`])
//! - `winsys.dxb` / `miscsys.dxb` - the shared stashes ([`StashFile`])
//! - `<name>.vault` - user vaults ([`VaultFile`])
//!
//! All three are binary record files. Well-known fields are read through the
//! descriptor tables in [`keys`] for the selected [`GameVersion`]; anything
//! else is kept as decoded and written back unchanged.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tqsave_files::PlayerFile;
//! use tqsave_record::{BinaryCodec, GameVersion, RecordCollectionProvider};
//!
//! let provider = RecordCollectionProvider::new(BinaryCodec);
//! let folder = Path::new("SaveData/Main/_Ajax");
//!
//! let mut player = PlayerFile::load(&provider, folder, GameVersion::TQAE)?;
//! println!("{}", player.summary());
//!
//! player.set_money(100_000)?;
//! player.save(&provider, folder)?;
//! # Ok::<(), tqsave_files::Error>(())
//! ```
//!
//! [`GameVersion`]: tqsave_record::GameVersion

mod error;
pub mod keys;
mod player;
mod stash;
mod vault;

pub use error::{Error, Result};
pub use keys::validate_descriptor_tables;
pub use player::{PlayerFile, PlayerSummary};
pub use stash::{StashFile, StashKind};
pub use vault::VaultFile;
