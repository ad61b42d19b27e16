//! 16-byte unique identifier.
//!
//! Character files carry a `uniqueId` field and item records embed the same
//! shape of identifier. It is stored as 16 raw bytes with no length prefix.

use std::fmt;
use std::str::FromStr;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Error;

/// A 16-byte identifier as stored in save files.
///
/// The text form is the 32 lowercase hex digits of the bytes in file order.
/// Hyphens are tolerated when parsing so GUID-style input is accepted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct UniqueId {
    bytes: [u8; 16],
}

impl UniqueId {
    /// Size of the identifier in bytes.
    pub const SIZE: usize = 16;

    /// Empty identifier (all zeros).
    pub const EMPTY: Self = Self { bytes: [0; 16] };

    /// Create a new identifier from raw bytes.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Create an identifier from a slice, if it is exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 16]>::try_from(bytes).ok().map(Self::from_bytes)
    }

    /// Get the raw bytes of the identifier.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    /// Check if the identifier is empty (all zeros).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes == [0; 16]
    }
}

impl fmt::Debug for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UniqueId({})", self)
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for UniqueId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s.bytes().filter(|&b| b != b'-').collect();
        if digits.len() != 32 {
            return Err(Error::InvalidUniqueId(format!(
                "expected 32 hex digits, got {}",
                digits.len()
            )));
        }

        let mut bytes = [0u8; 16];
        for (i, pair) in digits.chunks_exact(2).enumerate() {
            let hex = std::str::from_utf8(pair)
                .map_err(|_| Error::InvalidUniqueId(format!("invalid hex at digit {}", i * 2)))?;
            bytes[i] = u8::from_str_radix(hex, 16)
                .map_err(|_| Error::InvalidUniqueId(format!("invalid hex at digit {}", i * 2)))?;
        }

        Ok(Self { bytes })
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UniqueId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UniqueId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_empty_id() {
        let id = UniqueId::EMPTY;
        assert!(id.is_empty());
        assert_eq!(id.to_string(), "00000000000000000000000000000000");
    }

    #[test]
    fn test_roundtrip() {
        let original = "0123456789abcdef0011223344556677";
        let id: UniqueId = original.parse().unwrap();
        assert_eq!(id.as_bytes()[0], 0x01);
        assert_eq!(id.to_string(), original);
    }

    #[test]
    fn test_hyphens_tolerated() {
        let id: UniqueId = "01234567-89ab-cdef-0011-223344556677".parse().unwrap();
        assert_eq!(id.to_string(), "0123456789abcdef0011223344556677");
    }

    #[test]
    fn test_invalid_input() {
        assert!("too-short".parse::<UniqueId>().is_err());
        assert!("zz23456789abcdef0011223344556677".parse::<UniqueId>().is_err());
    }

    #[test]
    fn test_read_struct() {
        let data: Vec<u8> = (0u8..16).collect();
        let mut reader = BinaryReader::new(&data);
        let id: UniqueId = reader.read_struct().unwrap();
        assert_eq!(id.as_bytes()[15], 15);
        assert_eq!(UniqueId::from_slice(&data), Some(id));
    }
}
