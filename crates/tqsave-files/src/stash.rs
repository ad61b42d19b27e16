//! Stash file handling.

use std::fmt;
use std::path::{Path, PathBuf};

use tqsave_record::io::{DirectoryIo, FileIo, PathIo};
use tqsave_record::{BinaryCodec, GameVersion, RecordCodec, RecordCollection, RecordCollectionProvider, RecordId};
use tracing::debug;

use crate::keys::{self, stash_table, TransferStashKey};
use crate::Result;

/// The two stashes the game keeps in `SaveData/Sys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StashKind {
    /// Shared transfer stash, `winsys.dxb`.
    Transfer,
    /// Relic vault stash, `miscsys.dxb`.
    RelicVault,
}

impl StashKind {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Transfer => "winsys.dxb",
            Self::RelicVault => "miscsys.dxb",
        }
    }

    /// Stash kind of a file name, ignoring case.
    pub fn from_file_name(name: &str) -> Option<Self> {
        [Self::Transfer, Self::RelicVault]
            .into_iter()
            .find(|kind| kind.file_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => f.write_str("transfer stash"),
            Self::RelicVault => f.write_str("relic vault stash"),
        }
    }
}

/// A stash file.
#[derive(Debug, Clone)]
pub struct StashFile {
    kind: StashKind,
    version: GameVersion,
    collection: RecordCollection,
}

impl StashFile {
    pub fn from_collection(kind: StashKind, collection: RecordCollection, version: GameVersion) -> Self {
        Self {
            kind,
            version,
            collection,
        }
    }

    /// Decode stash file bytes.
    pub fn parse(kind: StashKind, bytes: &[u8], version: GameVersion) -> Result<Self> {
        let hints = stash_table()?.hints(version);
        let collection = BinaryCodec.decode(RecordId::new(kind.file_name()), bytes, &hints)?;
        Ok(Self::from_collection(kind, collection, version))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(BinaryCodec.encode(&self.collection)?)
    }

    /// Read a stash from the `Sys` folder.
    pub fn load<IO>(
        provider: &RecordCollectionProvider<BinaryCodec, IO>,
        folder: &Path,
        kind: StashKind,
        version: GameVersion,
    ) -> Result<Self>
    where
        IO: DirectoryIo + FileIo + PathIo,
    {
        let hints = stash_table()?.hints(version);
        let path = provider.io().join(folder, kind.file_name());
        let collection = provider.read(&path, RecordId::new(kind.file_name()), &hints)?;
        debug!(path = %path.display(), %kind, variables = collection.len(), "loaded stash");
        Ok(Self::from_collection(kind, collection, version))
    }

    /// Write the stash into the `Sys` folder under its fixed name.
    pub fn save<IO>(&self, provider: &RecordCollectionProvider<BinaryCodec, IO>, folder: &Path) -> Result<PathBuf>
    where
        IO: DirectoryIo + FileIo + PathIo,
    {
        Ok(provider.write(&self.collection, folder, Some(self.kind.file_name()))?)
    }

    pub fn kind(&self) -> StashKind {
        self.kind
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn collection(&self) -> &RecordCollection {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut RecordCollection {
        &mut self.collection
    }

    /// Declared number of items in the stash.
    pub fn item_count(&self) -> Result<i32> {
        self.get_i32(TransferStashKey::NumItems)
    }

    /// Sack grid size as `(width, height)`.
    pub fn sack_size(&self) -> Result<(i32, i32)> {
        Ok((
            self.get_i32(TransferStashKey::SackWidth)?,
            self.get_i32(TransferStashKey::SackHeight)?,
        ))
    }

    fn get_i32(&self, key: TransferStashKey) -> Result<i32> {
        let variable = keys::field(&self.collection, stash_table()?, key, self.version)?;
        Ok(variable.get_i32(0)?)
    }
}
