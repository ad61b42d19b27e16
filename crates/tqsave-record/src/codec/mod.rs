//! Record codecs.
//!
//! Two on-disk forms exist:
//!
//! - [`TextCodec`] - one `name,value;value,` line per variable, the form of
//!   exported database records.
//! - [`BinaryCodec`] - length-prefixed keys each followed by one value, the
//!   form of `Player.chr`, `*.dxb` stash files and vault files.
//!
//! Both keep variables in collection order and never drop or merge fields.

mod binary;
mod text;

use std::path::Path;

pub use binary::{is_key_name, BinaryCodec, MAX_KEY_LEN};
pub use text::{TextCodec, LINE_ENDING};

use crate::{RecordCollection, RecordId, Result, TypeHints};

/// Translates between a record collection and its bytes.
pub trait RecordCodec {
    /// Short name for messages.
    fn name(&self) -> &'static str;

    /// Serialize every variable, in order.
    fn encode(&self, collection: &RecordCollection) -> Result<Vec<u8>>;

    /// Parse bytes into a collection with the given identifier.
    fn decode(&self, id: RecordId, bytes: &[u8], hints: &dyn TypeHints) -> Result<RecordCollection>;
}

/// Codec selected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Binary,
}

impl Format {
    /// Pick the format from a file extension: `.txt` and `.dbr` are text,
    /// everything else is binary.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("txt") | Some("dbr") => Self::Text,
            _ => Self::Binary,
        }
    }
}

impl RecordCodec for Format {
    fn name(&self) -> &'static str {
        match self {
            Self::Text => TextCodec.name(),
            Self::Binary => BinaryCodec.name(),
        }
    }

    fn encode(&self, collection: &RecordCollection) -> Result<Vec<u8>> {
        match self {
            Self::Text => TextCodec.encode(collection),
            Self::Binary => BinaryCodec.encode(collection),
        }
    }

    fn decode(&self, id: RecordId, bytes: &[u8], hints: &dyn TypeHints) -> Result<RecordCollection> {
        match self {
            Self::Text => TextCodec.decode(id, bytes, hints),
            Self::Binary => BinaryCodec.decode(id, bytes, hints),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("Player.chr")), Format::Binary);
        assert_eq!(Format::from_path(Path::new("winsys.dxb")), Format::Binary);
        assert_eq!(Format::from_path(Path::new("dump.TXT")), Format::Text);
        assert_eq!(Format::from_path(Path::new("records/sword.dbr")), Format::Text);
        assert_eq!(Format::from_path(Path::new("noext")), Format::Binary);
    }
}
