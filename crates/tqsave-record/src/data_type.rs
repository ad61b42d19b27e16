//! Field data types.

use std::fmt;
use std::str::FromStr;

/// Data types a record field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    /// Signed 32-bit integer.
    Integer,
    /// 32-bit floating point.
    Float,
    /// Single-byte string.
    String,
    /// UTF-16 string (player names).
    WideString,
    /// Boolean stored as 0 or 1.
    Boolean,
    /// 16-byte identifier.
    UniqueId,
    /// Length-prefixed binary blob.
    Stream,
}

impl DataType {
    /// All data types, in declaration order.
    pub const ALL: [DataType; 7] = [
        Self::Integer,
        Self::Float,
        Self::String,
        Self::WideString,
        Self::Boolean,
        Self::UniqueId,
        Self::Stream,
    ];

    /// Size of the value in the binary form, when it does not depend on the
    /// value itself.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Integer | Self::Float | Self::Boolean => Some(4),
            Self::UniqueId => Some(16),
            Self::String | Self::WideString | Self::Stream => None,
        }
    }

    /// Get the string name for this data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::WideString => "WideString",
            Self::Boolean => "Boolean",
            Self::UniqueId => "UniqueId",
            Self::Stream => "Stream",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown data type {:?}", s))
    }
}
