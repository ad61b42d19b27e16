//! Well-known fields of save files.
//!
//! Each file family has a key enum and a static descriptor table built on
//! first use. Tables are validated when built; a defect surfaces as a
//! [`DescriptorError`] from the accessor instead of a panic.

mod player;
mod stash;

use std::fmt;
use std::hash::Hash;

use tqsave_record::{DescriptorError, DescriptorTable, GameVersion, RecordCollection, Variable};

use crate::{Error, Result};

pub use player::{player_table, PlayerKey, PLAYER_DESCRIPTORS};
pub use stash::{stash_table, TransferStashKey, STASH_DESCRIPTORS};

/// Build every descriptor table, reporting the first defect.
pub fn validate_descriptor_tables() -> std::result::Result<(), DescriptorError> {
    player_table()?;
    stash_table()?;
    Ok(())
}

/// First variable of `collection` for `key` in `version`.
pub(crate) fn field<'a, K>(
    collection: &'a RecordCollection,
    table: &DescriptorTable<K>,
    key: K,
    version: GameVersion,
) -> Result<&'a Variable>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    let name = field_name(table, key, version)?;
    collection.get(name).ok_or(Error::MissingField { name })
}

/// Mutable counterpart of [`field`].
pub(crate) fn field_mut<'a, K>(
    collection: &'a mut RecordCollection,
    table: &DescriptorTable<K>,
    key: K,
    version: GameVersion,
) -> Result<&'a mut Variable>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    let name = field_name(table, key, version)?;
    collection.get_mut(name).ok_or(Error::MissingField { name })
}

fn field_name<K>(table: &DescriptorTable<K>, key: K, version: GameVersion) -> Result<&'static str>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    table
        .resolve(key, version)
        .map(|descriptor| descriptor.name)
        .ok_or_else(|| Error::UnknownField {
            key: format!("{key:?}"),
            version,
        })
}
