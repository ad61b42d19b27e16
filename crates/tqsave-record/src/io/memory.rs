//! In-memory storage double.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{DirectoryIo, FileIo, PathIo};

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    failing_writes: HashSet<PathBuf>,
    writes: usize,
}

/// In-memory filesystem for tests.
///
/// Clones share the same storage. Directories must be created before files
/// can be written into them, as on a real filesystem. Writes to a path
/// registered with [`MemoryFs::fail_writes_to`] fail after storing a
/// truncated copy, which is what a full disk leaves behind.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    state: Arc<Mutex<State>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file directly, creating its parent directories.
    pub fn insert_file(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut state = self.state.lock();
        if let Some(parent) = path.parent() {
            add_dirs(&mut state.dirs, parent);
        }
        state.files.insert(path, bytes.into());
    }

    /// Contents of a file, if present.
    pub fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    /// Every file path, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.state.lock().files.keys().cloned().collect()
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.state.lock().failing_writes.insert(path.into());
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

fn add_dirs(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        dirs.insert(ancestor.to_path_buf());
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

impl DirectoryIo for MemoryFs {
    fn dir_exists(&self, path: &Path) -> bool {
        self.state.lock().dirs.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        add_dirs(&mut self.state.lock().dirs, path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        if !state.dirs.contains(path) {
            return Err(not_found(path));
        }
        state.dirs.retain(|d| !d.starts_with(path));
        state.files.retain(|f, _| !f.starts_with(path));
        Ok(())
    }
}

impl FileIo for MemoryFs {
    fn file_exists(&self, path: &Path) -> bool {
        self.state.lock().files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.file(path).ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !state.dirs.contains(parent) {
                return Err(not_found(parent));
            }
        }
        if state.failing_writes.contains(path) {
            let partial = bytes[..bytes.len() / 2].to_vec();
            state.files.insert(path.to_path_buf(), partial);
            return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
        }
        state.files.insert(path.to_path_buf(), bytes.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        let bytes = state.files.remove(from).ok_or_else(|| not_found(from))?;
        state.files.insert(to.to_path_buf(), bytes);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.state
            .lock()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }
}

impl PathIo for MemoryFs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_directory() {
        let fs = MemoryFs::new();
        let path = Path::new("/saves/Player.chr");
        assert!(fs.write(path, b"x").is_err());

        fs.create_dir_all(Path::new("/saves")).unwrap();
        fs.write(path, b"x").unwrap();
        assert_eq!(fs.read(path).unwrap(), b"x");
        assert_eq!(fs.write_count(), 1);
    }

    #[test]
    fn test_failing_write_leaves_partial_file() {
        let fs = MemoryFs::new();
        fs.insert_file("/s/a.dxb", b"old".to_vec());
        fs.fail_writes_to("/s/a.dxb");

        assert!(fs.write(Path::new("/s/a.dxb"), b"new data").is_err());
        assert_eq!(fs.file(Path::new("/s/a.dxb")).unwrap(), b"new ");
    }

    #[test]
    fn test_clones_share_state() {
        let fs = MemoryFs::new();
        let other = fs.clone();
        other.insert_file("/v/main.vault", b"v".to_vec());
        assert!(fs.file_exists(Path::new("/v/main.vault")));
        assert!(fs.dir_exists(Path::new("/v")));

        fs.remove_dir_all(Path::new("/v")).unwrap();
        assert!(other.file_paths().is_empty());
    }
}
