//! Typed record codec for Titan Quest save files.
//!
//! Character files (`Player.chr`), stash files (`winsys.dxb`,
//! `miscsys.dxb`) and vault files are sequences of named, typed fields.
//! This crate parses them into a [`RecordCollection`] of [`Variable`]s and
//! writes them back so that anything left unmodified, including fields no
//! descriptor knows about, comes out byte for byte.
//!
//! # Layers
//!
//! - [`Variable`] / [`Value`] / [`DataType`] - one field and its values
//! - [`RecordCollection`] - ordered variables plus a [`RecordId`]
//! - [`TextCodec`] / [`BinaryCodec`] - the two on-disk forms
//! - [`DescriptorTable`] - well-known fields per [`GameVersion`], exposed to
//!   codecs as [`TypeHints`]
//! - [`RecordCollectionProvider`] - reads and writes files through the
//!   [`io`] capability traits
//!
//! # Example
//!
//! ```
//! use tqsave_record::{BinaryCodec, NoHints, RecordCodec, RecordCollection, RecordId, Variable};
//!
//! let mut record = RecordCollection::new("Player.chr");
//! record.push(Variable::integer("playerLevel", 12));
//! record.push(Variable::string("playerClassTag", "tagCClass01"));
//!
//! let bytes = BinaryCodec.encode(&record)?;
//! let back = BinaryCodec.decode(RecordId::new("Player.chr"), &bytes, &NoHints)?;
//! assert_eq!(back, record);
//! # Ok::<(), tqsave_record::Error>(())
//! ```

mod collection;
mod data_type;
mod descriptor;
mod error;
mod hints;
mod record_id;
mod value;
mod variable;
mod version;

pub mod codec;
pub mod io;
pub mod provider;

pub use codec::{BinaryCodec, Format, RecordCodec, TextCodec};
pub use collection::{RecordCollection, BEGIN_BLOCK, BEGIN_BLOCK_MAGIC, END_BLOCK, END_BLOCK_MAGIC};
pub use data_type::DataType;
pub use descriptor::{DescriptorTable, RecordKeyDescriptor, VersionHints};
pub use error::{DescriptorError, Error, Result};
pub use hints::{NoHints, TypeHints};
pub use provider::RecordCollectionProvider;
pub use record_id::RecordId;
pub use value::Value;
pub use variable::Variable;
pub use version::GameVersion;
