//! Typed field values.

use std::fmt;

use tqsave_common::UniqueId;

use crate::DataType;

/// One value of a record field.
///
/// The text form produced by `Display` is the one written by the text codec,
/// and [`Value::parse_text`] reads it back.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Integer(i32),
    Float(f32),
    String(String),
    WideString(String),
    Boolean(bool),
    UniqueId(UniqueId),
    Stream(Vec<u8>),
}

impl Value {
    /// The data type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Integer(_) => DataType::Integer,
            Self::Float(_) => DataType::Float,
            Self::String(_) => DataType::String,
            Self::WideString(_) => DataType::WideString,
            Self::Boolean(_) => DataType::Boolean,
            Self::UniqueId(_) => DataType::UniqueId,
            Self::Stream(_) => DataType::Stream,
        }
    }

    /// Parse the text form of a value of the given type.
    pub fn parse_text(data_type: DataType, text: &str) -> Option<Self> {
        match data_type {
            DataType::Integer => text.parse().ok().map(Self::Integer),
            DataType::Float => text.parse().ok().map(Self::Float),
            DataType::String => Some(Self::String(text.to_string())),
            DataType::WideString => Some(Self::WideString(text.to_string())),
            DataType::Boolean => match text {
                "0" => Some(Self::Boolean(false)),
                "1" => Some(Self::Boolean(true)),
                _ => None,
            },
            DataType::UniqueId => text.parse().ok().map(Self::UniqueId),
            DataType::Stream => hex::decode(text).ok().map(Self::Stream),
        }
    }

    /// Parse text as `data_type` only if the value renders back to the same
    /// text.
    ///
    /// Used for fields of unknown type, where the inferred type must not
    /// change the bytes written back.
    pub fn parse_text_exact(data_type: DataType, text: &str) -> Option<Self> {
        Self::parse_text(data_type, text).filter(|value| value.to_string() == text)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            // Bitwise, so a value read back from disk equals the one written.
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::WideString(a), Self::WideString(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::UniqueId(a), Self::UniqueId(b)) => a == b,
            (Self::Stream(a), Self::Stream(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => f.write_str(&float_text(*v)),
            Self::String(v) | Self::WideString(v) => f.write_str(v),
            Self::Boolean(v) => f.write_str(if *v { "1" } else { "0" }),
            Self::UniqueId(v) => write!(f, "{}", v),
            Self::Stream(v) => f.write_str(&hex::encode(v)),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<UniqueId> for Value {
    fn from(v: UniqueId) -> Self {
        Self::UniqueId(v)
    }
}

/// Six decimals when they read back to the same bits, otherwise the
/// shortest exact form.
fn float_text(value: f32) -> String {
    let fixed = format!("{:.6}", value);
    match fixed.parse::<f32>() {
        Ok(parsed) if parsed.to_bits() == value.to_bits() => fixed,
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_forms() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Float(1.5).to_string(), "1.500000");
        assert_eq!(Value::Boolean(true).to_string(), "1");
        assert_eq!(Value::Stream(vec![0xDE, 0xAD]).to_string(), "dead");
    }

    #[test]
    fn test_float_text_keeps_precision() {
        for v in [0.123_456_79f32, 1e-7, -3.402_823_5e38, f32::MIN_POSITIVE, -0.0, 100.25] {
            let text = Value::Float(v).to_string();
            assert_eq!(
                Value::parse_text(DataType::Float, &text),
                Some(Value::Float(v)),
                "{v} rendered as {text}"
            );
        }
        assert_eq!(Value::Float(0.123_456_79).to_string(), "0.12345679");
        assert_eq!(Value::Float(-0.0).to_string(), "-0.000000");
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(Value::parse_text(DataType::Integer, "42"), Some(Value::Integer(42)));
        assert_eq!(Value::parse_text(DataType::Boolean, "0"), Some(Value::Boolean(false)));
        assert_eq!(Value::parse_text(DataType::Boolean, "2"), None);
        assert_eq!(
            Value::parse_text(DataType::Stream, "00ff"),
            Some(Value::Stream(vec![0x00, 0xFF]))
        );
        assert_eq!(Value::parse_text(DataType::Integer, "x"), None);
    }

    #[test]
    fn test_parse_text_exact() {
        assert_eq!(Value::parse_text_exact(DataType::Integer, "007"), None);
        assert_eq!(Value::parse_text_exact(DataType::Float, "1.5"), None);
        assert_eq!(
            Value::parse_text_exact(DataType::Float, "1.500000"),
            Some(Value::Float(1.5))
        );
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(Value::Float(f32::NAN), Value::Float(f32::NAN));
        assert_ne!(Value::Integer(1), Value::Boolean(true));
    }
}
