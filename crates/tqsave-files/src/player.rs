//! Character file handling.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tqsave_record::io::{DirectoryIo, FileIo, PathIo};
use tqsave_record::{
    BinaryCodec, GameVersion, RecordCodec, RecordCollection, RecordCollectionProvider, RecordId, Variable,
};
use tracing::debug;

use crate::keys::{self, player_table, PlayerKey};
use crate::Result;

/// A character summary built from the well-known fields.
///
/// Fields absent from the file are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerSummary {
    pub name: Option<String>,
    pub class_tag: Option<String>,
    pub level: Option<i32>,
    pub experience: Option<i32>,
    pub money: Option<i32>,
}

impl fmt::Display for PlayerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn show<T: fmt::Display>(value: &Option<T>) -> String {
            value.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
        }

        writeln!(f, "Name:       {}", show(&self.name))?;
        writeln!(f, "Class:      {}", show(&self.class_tag))?;
        writeln!(f, "Level:      {}", show(&self.level))?;
        writeln!(f, "Experience: {}", show(&self.experience))?;
        write!(f, "Money:      {}", show(&self.money))
    }
}

/// A Titan Quest character file (`Player.chr`).
///
/// The file lives in the character folder, for example
/// `SaveData/Main/_Hero/Player.chr`. The summary is computed at most once and
/// recomputed after the character is modified.
#[derive(Debug)]
pub struct PlayerFile {
    collection: RecordCollection,
    version: GameVersion,
    summary: OnceLock<PlayerSummary>,
}

impl PlayerFile {
    /// Fixed name of the character file.
    pub const FILE_NAME: &'static str = "Player.chr";

    /// Wrap an already decoded collection.
    pub fn from_collection(collection: RecordCollection, version: GameVersion) -> Self {
        Self {
            collection,
            version,
            summary: OnceLock::new(),
        }
    }

    /// Decode character file bytes.
    pub fn parse(bytes: &[u8], version: GameVersion) -> Result<Self> {
        let hints = player_table()?.hints(version);
        let collection = BinaryCodec.decode(RecordId::new(Self::FILE_NAME), bytes, &hints)?;
        Ok(Self::from_collection(collection, version))
    }

    /// Encode back to character file bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(BinaryCodec.encode(&self.collection)?)
    }

    /// Read `Player.chr` from a character folder.
    pub fn load<IO>(
        provider: &RecordCollectionProvider<BinaryCodec, IO>,
        folder: &Path,
        version: GameVersion,
    ) -> Result<Self>
    where
        IO: DirectoryIo + FileIo + PathIo,
    {
        let hints = player_table()?.hints(version);
        let path = provider.io().join(folder, Self::FILE_NAME);
        let collection = provider.read(&path, RecordId::new(Self::FILE_NAME), &hints)?;
        debug!(path = %path.display(), %version, "loaded character");
        Ok(Self::from_collection(collection, version))
    }

    /// Write `Player.chr` into a character folder.
    pub fn save<IO>(&self, provider: &RecordCollectionProvider<BinaryCodec, IO>, folder: &Path) -> Result<PathBuf>
    where
        IO: DirectoryIo + FileIo + PathIo,
    {
        Ok(provider.write(&self.collection, folder, Some(Self::FILE_NAME))?)
    }

    pub fn version(&self) -> GameVersion {
        self.version
    }

    pub fn collection(&self) -> &RecordCollection {
        &self.collection
    }

    /// Mutable access to the underlying collection. Invalidates the summary.
    pub fn collection_mut(&mut self) -> &mut RecordCollection {
        self.summary.take();
        &mut self.collection
    }

    /// The variable behind a well-known key.
    pub fn field(&self, key: PlayerKey) -> Result<&Variable> {
        keys::field(&self.collection, player_table()?, key, self.version)
    }

    fn field_mut(&mut self, key: PlayerKey) -> Result<&mut Variable> {
        self.summary.take();
        keys::field_mut(&mut self.collection, player_table()?, key, self.version)
    }

    pub fn player_name(&self) -> Result<&str> {
        Ok(self.field(PlayerKey::PlayerName)?.get_wide_str(0)?)
    }

    pub fn class_tag(&self) -> Result<&str> {
        Ok(self.field(PlayerKey::PlayerClassTag)?.get_str(0)?)
    }

    pub fn level(&self) -> Result<i32> {
        Ok(self.field(PlayerKey::Level)?.get_i32(0)?)
    }

    pub fn experience(&self) -> Result<i32> {
        Ok(self.field(PlayerKey::Experience)?.get_i32(0)?)
    }

    pub fn money(&self) -> Result<i32> {
        Ok(self.field(PlayerKey::Money)?.get_i32(0)?)
    }

    pub fn set_money(&mut self, money: i32) -> Result<()> {
        Ok(self.field_mut(PlayerKey::Money)?.set_i32(0, money)?)
    }

    pub fn set_level(&mut self, level: i32) -> Result<()> {
        Ok(self.field_mut(PlayerKey::Level)?.set_i32(0, level)?)
    }

    /// The character summary, computed on first use.
    pub fn summary(&self) -> &PlayerSummary {
        self.summary.get_or_init(|| PlayerSummary {
            name: self.player_name().ok().map(str::to_string),
            class_tag: self.class_tag().ok().map(str::to_string),
            level: self.level().ok(),
            experience: self.experience().ok(),
            money: self.money().ok(),
        })
    }
}

impl Clone for PlayerFile {
    fn clone(&self) -> Self {
        Self::from_collection(self.collection.clone(), self.version)
    }
}
