//! User vault handling.

use std::path::{Path, PathBuf};

use tqsave_record::io::{DirectoryIo, FileIo, PathIo};
use tqsave_record::{BinaryCodec, GameVersion, RecordCodec, RecordCollection, RecordCollectionProvider, RecordId};
use tracing::debug;

use crate::keys::{self, player_table, PlayerKey};
use crate::Result;

/// A user vault: extra item storage kept outside the game's own files.
///
/// The file name comes from the vault name, `<name>.vault`.
#[derive(Debug, Clone)]
pub struct VaultFile {
    name: String,
    version: GameVersion,
    collection: RecordCollection,
}

impl VaultFile {
    pub const EXTENSION: &'static str = "vault";

    /// An empty vault with no sacks.
    pub fn new(name: impl Into<String>, version: GameVersion) -> Self {
        let name = name.into();
        let collection = RecordCollection::new(Self::file_name_for(&name));
        Self {
            name,
            version,
            collection,
        }
    }

    /// Wrap a decoded collection; the vault name is taken from its
    /// identifier.
    pub fn from_collection(collection: RecordCollection, version: GameVersion) -> Self {
        let raw = collection.id().raw();
        let file_name = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
        let name = strip_extension(file_name).to_string();
        Self {
            name,
            version,
            collection,
        }
    }

    pub fn parse(name: &str, bytes: &[u8], version: GameVersion) -> Result<Self> {
        let hints = player_table()?.hints(version);
        let collection = BinaryCodec.decode(RecordId::new(Self::file_name_for(name)), bytes, &hints)?;
        Ok(Self::from_collection(collection, version))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(BinaryCodec.encode(&self.collection)?)
    }

    /// Read `<name>.vault` from the vault folder.
    pub fn load<IO>(
        provider: &RecordCollectionProvider<BinaryCodec, IO>,
        folder: &Path,
        name: &str,
        version: GameVersion,
    ) -> Result<Self>
    where
        IO: DirectoryIo + FileIo + PathIo,
    {
        let file_name = Self::file_name_for(name);
        let hints = player_table()?.hints(version);
        let path = provider.io().join(folder, &file_name);
        let collection = provider.read(&path, RecordId::new(file_name), &hints)?;
        debug!(path = %path.display(), vault = name, "loaded vault");
        Ok(Self::from_collection(collection, version))
    }

    pub fn save<IO>(&self, provider: &RecordCollectionProvider<BinaryCodec, IO>, folder: &Path) -> Result<PathBuf>
    where
        IO: DirectoryIo + FileIo + PathIo,
    {
        Ok(provider.write(&self.collection, folder, Some(&self.file_name()))?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> String {
        Self::file_name_for(&self.name)
    }

    fn file_name_for(name: &str) -> String {
        format!("{name}.{}", Self::EXTENSION)
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

    /// Declared number of sacks.
    pub fn sack_count(&self) -> Result<i32> {
        let variable = keys::field(&self.collection, player_table()?, PlayerKey::NumberOfSacks, self.version)?;
        Ok(variable.get_i32(0)?)
    }

    /// Number of items stored across all sacks.
    pub fn item_count(&self) -> Result<usize> {
        let base_name = player_table()?
            .resolve(PlayerKey::BaseName, self.version)
            .map(|descriptor| descriptor.name);
        Ok(base_name.map_or(0, |name| self.collection.count(name)))
    }
}

fn strip_extension(file_name: &str) -> &str {
    let suffix_len = VaultFile::EXTENSION.len() + 1;
    match file_name.len().checked_sub(suffix_len) {
        Some(stem) if file_name.is_char_boundary(stem) && file_name[stem..].eq_ignore_ascii_case(".vault") => {
            &file_name[..stem]
        }
        _ => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tqsave_record::io::MemoryFs;
    use tqsave_record::{Variable, BEGIN_BLOCK_MAGIC, END_BLOCK_MAGIC};

    fn sacks(name: &str) -> RecordCollection {
        let mut collection = RecordCollection::new(format!("{name}.vault"));
        collection.push(Variable::integer("numberOfSacks", 2));
        for sack in 0..2 {
            collection.push(Variable::integer("begin_block", BEGIN_BLOCK_MAGIC));
            collection.push(Variable::integer("tempBool", 0));
            collection.push(Variable::integer("size", sack + 1));
            for item in 0..=sack {
                collection.push(Variable::string("baseName", format!("records\\item\\{item}.dbr")));
                collection.push(Variable::integer("seed", 100 + item));
                collection.push(Variable::integer("pointX", item));
                collection.push(Variable::integer("pointY", 0));
            }
            collection.push(Variable::integer("end_block", END_BLOCK_MAGIC));
        }
        collection
    }

    #[test]
    fn test_counts() {
        let vault = VaultFile::from_collection(sacks("Main"), GameVersion::TQAE);
        assert_eq!(vault.name(), "Main");
        assert_eq!(vault.file_name(), "Main.vault");
        assert_eq!(vault.sack_count().unwrap(), 2);
        assert_eq!(vault.item_count().unwrap(), 3);
        assert_eq!(vault.collection().check_blocks().unwrap(), 1);
    }

    #[test]
    fn test_name_from_path_like_id() {
        let vault = VaultFile::from_collection(RecordCollection::new("TQVaultData\\Gear.VAULT"), GameVersion::TQ);
        assert_eq!(vault.name(), "Gear");
        let plain = VaultFile::from_collection(RecordCollection::new("notes"), GameVersion::TQ);
        assert_eq!(plain.name(), "notes");
    }

    #[test]
    fn test_parse_round_trip() {
        let bytes = BinaryCodec.encode(&sacks("Main")).unwrap();
        let vault = VaultFile::parse("Main", &bytes, GameVersion::TQIT).unwrap();
        assert_eq!(vault.collection(), &sacks("Main"));
        assert_eq!(vault.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_save_and_load_by_name() {
        let fs = MemoryFs::new();
        let provider = RecordCollectionProvider::with_io(BinaryCodec, fs.clone());
        let folder = Path::new("/TQVaultData");

        let vault = VaultFile::from_collection(sacks("Gear"), GameVersion::TQAE);
        let path = vault.save(&provider, folder).unwrap();
        assert_eq!(path, folder.join("Gear.vault"));

        let loaded = VaultFile::load(&provider, folder, "Gear", GameVersion::TQAE).unwrap();
        assert_eq!(loaded.item_count().unwrap(), 3);
        assert!(VaultFile::load(&provider, folder, "Missing", GameVersion::TQAE).is_err());
    }

    #[test]
    fn test_new_vault_is_empty() {
        let vault = VaultFile::new("Spare", GameVersion::TQAE);
        assert_eq!(vault.collection().id().raw(), "Spare.vault");
        assert_eq!(vault.item_count().unwrap(), 0);
        assert!(vault.sack_count().is_err());
    }
}
