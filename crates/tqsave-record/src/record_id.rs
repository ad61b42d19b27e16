//! Record identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a record, usually a relative file path.
///
/// Game paths are case-insensitive and use `\` separators. The normalized
/// form is trimmed, upper-cased, uses `/` separators and has no leading
/// separator; it is what identities compare on and what file names are
/// derived from.
#[derive(Clone)]
pub struct RecordId {
    raw: String,
    normalized: String,
}

impl RecordId {
    /// Create an identifier from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = normalize(&raw);
        Self { raw, normalized }
    }

    /// The identifier as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The normalized identifier.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Check whether the identifier is blank.
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .to_ascii_uppercase()
        .replace('\\', "/")
        .trim_start_matches('/')
        .to_string()
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({:?})", self.raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for RecordId {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for RecordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized() {
        let id = RecordId::new("  \\Records\\Item\\Sword.dbr ");
        assert_eq!(id.normalized(), "RECORDS/ITEM/SWORD.DBR");
        assert_eq!(id.raw(), "  \\Records\\Item\\Sword.dbr ");
    }

    #[test]
    fn test_identity_is_case_insensitive() {
        assert_eq!(RecordId::new("records/a.dbr"), RecordId::new("RECORDS\\A.DBR"));
        assert_ne!(RecordId::new("a.dbr"), RecordId::new("b.dbr"));
        assert!(RecordId::new("  ").is_empty());
    }
}
