//! Reading and writing record collections on storage.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::{DirectoryIo, FileIo, PathIo, StdFs};
use crate::{Error, RecordCodec, RecordCollection, RecordId, Result, TypeHints};

/// Suffix of the temporary file a write goes through.
pub const TEMP_SUFFIX: &str = "tmp";

/// Reads and writes record collections through a codec and a storage
/// backend.
///
/// Writes never truncate the destination in place: the bytes go to a
/// sibling temporary file which is then renamed over the destination, so a
/// failed write leaves the previous file intact.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tqsave_record::{BinaryCodec, NoHints, RecordCollectionProvider, Variable};
///
/// let provider = RecordCollectionProvider::new(BinaryCodec);
/// let mut stash = provider.read_file(Path::new("SaveData/Sys/winsys.dxb"), &NoHints)?;
/// stash.push(Variable::integer("numItems", 0));
/// provider.write(&stash, Path::new("SaveData/Sys"), Some("winsys.dxb"))?;
/// # Ok::<(), tqsave_record::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RecordCollectionProvider<C, IO = StdFs> {
    codec: C,
    io: IO,
}

impl<C: RecordCodec> RecordCollectionProvider<C, StdFs> {
    /// Create a provider over the real filesystem.
    pub fn new(codec: C) -> Self {
        Self { codec, io: StdFs }
    }
}

impl<C, IO> RecordCollectionProvider<C, IO>
where
    C: RecordCodec,
    IO: DirectoryIo + FileIo + PathIo,
{
    /// Create a provider over a custom storage backend.
    pub fn with_io(codec: C, io: IO) -> Self {
        Self { codec, io }
    }

    /// The codec in use.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The storage backend in use.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Path a collection is written to.
    ///
    /// `file_name` overrides the name derived from the record identifier.
    /// The result always stays inside `base_folder`: an explicit file name
    /// must be a single path component, and an identifier must be non-blank
    /// without `.` or `..` segments.
    pub fn destination(
        &self,
        collection: &RecordCollection,
        base_folder: &Path,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let name = match file_name {
            Some(name) => {
                if name.contains(['/', '\\']) {
                    return Err(invalid_destination(name, "file name contains a path separator"));
                }
                name
            }
            None => collection.id().normalized(),
        };

        if name.is_empty() || name.ends_with('/') {
            let shown = file_name.unwrap_or_else(|| collection.id().raw());
            return Err(invalid_destination(shown, "no file name"));
        }
        if name.split(['/', '\\']).any(|segment| segment == "." || segment == "..") {
            return Err(invalid_destination(name, "path leaves the base folder"));
        }

        Ok(self.io.join(base_folder, name))
    }

    /// Write every variable of `collection`, in order, and return the path
    /// written.
    ///
    /// The destination folder is `base_folder` when `file_name` is given,
    /// otherwise the parent of the identifier-derived path; it is created
    /// if missing.
    pub fn write(
        &self,
        collection: &RecordCollection,
        base_folder: &Path,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        let destination = self.destination(collection, base_folder, file_name)?;
        let folder = match file_name {
            Some(_) => base_folder.to_path_buf(),
            None => self
                .io
                .parent(&destination)
                .unwrap_or_else(|| base_folder.to_path_buf()),
        };

        if !self.io.dir_exists(&folder) {
            debug!(folder = %folder.display(), "creating destination folder");
            self.io.create_dir_all(&folder)?;
        }

        let bytes = self.codec.encode(collection)?;
        self.replace(&destination, &bytes)?;

        debug!(
            path = %destination.display(),
            codec = self.codec.name(),
            variables = collection.len(),
            bytes = bytes.len(),
            "wrote record collection"
        );
        Ok(destination)
    }

    /// Read a collection with an explicit identifier.
    pub fn read(&self, path: &Path, id: RecordId, hints: &dyn TypeHints) -> Result<RecordCollection> {
        let bytes = self.io.read(path)?;
        let collection = self.codec.decode(id, &bytes, hints)?;
        debug!(
            path = %path.display(),
            codec = self.codec.name(),
            variables = collection.len(),
            "read record collection"
        );
        Ok(collection)
    }

    /// Read a collection, using the file name as its identifier.
    pub fn read_file(&self, path: &Path, hints: &dyn TypeHints) -> Result<RecordCollection> {
        let id = self.io.file_name(path).unwrap_or_default();
        self.read(path, RecordId::new(id), hints)
    }

    fn replace(&self, destination: &Path, bytes: &[u8]) -> Result<()> {
        let temp = temp_path(destination);

        if let Err(e) = self.io.write(&temp, bytes) {
            self.discard(&temp);
            return Err(e.into());
        }
        if let Err(e) = self.io.rename(&temp, destination) {
            self.discard(&temp);
            return Err(e.into());
        }
        Ok(())
    }

    fn discard(&self, temp: &Path) {
        if self.io.file_exists(temp) {
            if let Err(e) = self.io.remove_file(temp) {
                warn!(path = %temp.display(), error = %e, "failed to remove temporary file");
            }
        }
    }
}

fn invalid_destination(name: &str, reason: &'static str) -> Error {
    Error::InvalidDestination {
        name: name.to_string(),
        reason,
    }
}

fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".");
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}
