//! Storage capabilities used by the provider.
//!
//! File access is split into three narrow traits so the provider can run
//! against the real filesystem ([`StdFs`]) or an in-memory double
//! ([`MemoryFs`]). Callers must not assume more than the method names say:
//! an existence check is a point-in-time answer, not a lock.

mod memory;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use memory::MemoryFs;

/// Directory operations.
pub trait DirectoryIo {
    fn dir_exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Whole-file operations.
pub trait FileIo {
    fn file_exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate `path` and write `bytes` to it. The handle is
    /// released before returning, on success and on failure.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Move `from` to `to`, replacing `to` if it exists.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Path composition.
pub trait PathIo {
    fn join(&self, base: &Path, name: &str) -> PathBuf {
        base.join(name)
    }

    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent().map(Path::to_path_buf)
    }

    fn file_name(&self, path: &Path) -> Option<String> {
        path.file_name().map(|n| n.to_string_lossy().into_owned())
    }

    fn with_extension(&self, path: &Path, extension: &str) -> PathBuf {
        path.with_extension(extension)
    }
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl DirectoryIo for StdFs {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

impl FileIo for StdFs {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.sync_all()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

impl PathIo for StdFs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_fs_write_read_rename() {
        let dir = tempfile::tempdir().unwrap();
        let fs = StdFs;
        let nested = fs.join(dir.path(), "a/b");

        assert!(!fs.dir_exists(&nested));
        fs.create_dir_all(&nested).unwrap();
        assert!(fs.dir_exists(&nested));

        let tmp = fs.join(&nested, "x.tmp");
        let dest = fs.with_extension(&tmp, "dxb");
        fs.write(&tmp, b"data").unwrap();
        fs.rename(&tmp, &dest).unwrap();

        assert!(!fs.file_exists(&tmp));
        assert_eq!(fs.read(&dest).unwrap(), b"data");
        assert_eq!(fs.file_name(&dest).as_deref(), Some("x.dxb"));
        assert_eq!(fs.parent(&dest).as_deref(), Some(nested.as_path()));

        fs.remove_file(&dest).unwrap();
        assert!(!fs.file_exists(&dest));
        fs.remove_dir_all(&nested).unwrap();
        assert!(!fs.dir_exists(&nested));
    }
}
