//! Length-prefixed key/value form.
//!
//! # Layout
//!
//! Each variable is written as:
//! - 4 bytes: key length `n`
//! - `n` bytes: key (single-byte chars)
//! - the value, whose layout depends on the data type:
//!
//! | Type       | Layout                                   |
//! |------------|------------------------------------------|
//! | Integer    | `i32`                                    |
//! | Float      | `f32`                                    |
//! | Boolean    | `u32`, 0 or 1                            |
//! | String     | `u32` length + single-byte chars         |
//! | WideString | `u32` code-unit count + UTF-16LE         |
//! | UniqueId   | 16 raw bytes                             |
//! | Stream     | `u32` length + bytes                     |
//!
//! All integers are little-endian. Nothing in the file records the type, so
//! the reader relies on type hints for known keys and classifies unknown
//! values by looking for the next key. When a guess leaves the rest of the
//! input unreadable, the reader backs up and tries the next one.

use std::collections::HashSet;

use tracing::{debug, trace};

use tqsave_common::{latin1, BinaryReader, BinaryWriter, UniqueId};

use crate::{
    DataType, Error, RecordCodec, RecordCollection, RecordId, Result, TypeHints, Value, Variable,
};

/// Longest key accepted when reading.
pub const MAX_KEY_LEN: usize = 64;

/// Binary codec for character, stash and vault files.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl RecordCodec for BinaryCodec {
    fn name(&self) -> &'static str {
        "binary"
    }

    fn encode(&self, collection: &RecordCollection) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::with_capacity(collection.len() * 24);

        for variable in collection {
            if !is_key_name(variable.name().as_bytes()) {
                return Err(Error::Unencodable {
                    name: variable.name().to_string(),
                    reason: "not a valid key".to_string(),
                });
            }
            let value = match variable.values() {
                [value] => value,
                values => {
                    return Err(Error::UnsupportedArity {
                        name: variable.name().to_string(),
                        count: values.len(),
                    })
                }
            };

            writer.write_prefixed_latin1(variable.name())?;
            write_value(&mut writer, variable.name(), value)?;
        }

        debug!(id = %collection.id(), variables = collection.len(), bytes = writer.len(), "encoded binary record");
        Ok(writer.into_inner())
    }

    fn decode(&self, id: RecordId, bytes: &[u8], hints: &dyn TypeHints) -> Result<RecordCollection> {
        let variables = Decoder::new(bytes, hints).run()?;
        let collection = RecordCollection::with_variables(id, variables);

        debug!(id = %collection.id(), variables = collection.len(), bytes = bytes.len(), "decoded binary record");
        Ok(collection)
    }
}

/// A key whose value is being decoded, with the types still left to try.
struct Field {
    key_offset: usize,
    name: String,
    value_offset: usize,
    candidates: Vec<DataType>,
    tried: usize,
    value: Option<Value>,
}

/// Depth-first search over the possible types of unhinted values.
///
/// A guess is kept only if the rest of the input decodes after it. Offsets
/// from which decoding already failed are remembered, so each key is opened
/// at most once.
struct Decoder<'a> {
    bytes: &'a [u8],
    hints: &'a dyn TypeHints,
    fields: Vec<Field>,
    dead_ends: HashSet<usize>,
    failure: Option<(usize, Error)>,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8], hints: &'a dyn TypeHints) -> Self {
        Self {
            bytes,
            hints,
            fields: Vec::new(),
            dead_ends: HashSet::new(),
            failure: None,
        }
    }

    fn run(mut self) -> Result<Vec<Variable>> {
        let mut offset = 0;

        while offset < self.bytes.len() {
            if !self.dead_ends.contains(&offset) {
                match self.open(offset) {
                    Ok(field) => self.fields.push(field),
                    Err(error) => {
                        self.dead_ends.insert(offset);
                        note_failure(&mut self.failure, offset, error);
                    }
                }
            }
            offset = match self.advance() {
                Some(next) => next,
                None => {
                    return Err(self
                        .failure
                        .map_or(Error::MalformedKey { offset }, |(_, error)| error))
                }
            };
        }

        Ok(self
            .fields
            .into_iter()
            .filter_map(|field| Some(Variable::scalar(field.name, field.value?)))
            .collect())
    }

    /// Read the key at `offset` and list the types its value may have.
    fn open(&self, offset: usize) -> Result<Field> {
        if key_end(self.bytes, offset).is_none() {
            return Err(Error::MalformedKey { offset });
        }
        let mut reader = BinaryReader::new_at(self.bytes, offset);
        let name = reader.read_prefixed_latin1()?;
        let value_offset = reader.position();

        let candidates = match self.hints.data_type(&name) {
            Some(data_type) => vec![data_type],
            None => candidate_types(self.bytes, value_offset),
        };
        if candidates.is_empty() {
            return Err(Error::UndecodableValue {
                name,
                offset: value_offset,
            });
        }

        Ok(Field {
            key_offset: offset,
            name,
            value_offset,
            candidates,
            tried: 0,
            value: None,
        })
    }

    /// Move the newest field to its next type, dropping fields that have
    /// none left. Returns the offset right after the chosen value.
    fn advance(&mut self) -> Option<usize> {
        loop {
            let field = self.fields.last_mut()?;
            while let Some(&data_type) = field.candidates.get(field.tried) {
                field.tried += 1;
                let mut reader = BinaryReader::new_at(self.bytes, field.value_offset);
                match read_value(&mut reader, &field.name, data_type) {
                    Ok(value) if !self.dead_ends.contains(&reader.position()) => {
                        trace!(key = %field.name, %data_type, offset = field.value_offset, "read value");
                        field.value = Some(value);
                        return Some(reader.position());
                    }
                    Ok(_) => {}
                    Err(error) => note_failure(&mut self.failure, field.value_offset, error),
                }
            }

            let key_offset = field.key_offset;
            trace!(key = %field.name, offset = key_offset, "no type fits, backtracking");
            self.fields.pop();
            self.dead_ends.insert(key_offset);
        }
    }
}

/// Keep the error found furthest into the input.
fn note_failure(failure: &mut Option<(usize, Error)>, offset: usize, error: Error) {
    if failure.as_ref().map_or(true, |(at, _)| offset > *at) {
        *failure = Some((offset, error));
    }
}

fn write_value(writer: &mut BinaryWriter, name: &str, value: &Value) -> Result<()> {
    match value {
        Value::Integer(v) => writer.write_i32(*v)?,
        Value::Float(v) => writer.write_f32(*v)?,
        Value::Boolean(v) => writer.write_u32(u32::from(*v))?,
        Value::String(v) => writer.write_prefixed_latin1(v).map_err(|e| Error::Unencodable {
            name: name.to_string(),
            reason: e.to_string(),
        })?,
        Value::WideString(v) => writer.write_prefixed_utf16(v)?,
        Value::UniqueId(v) => writer.write_bytes(v.as_bytes()),
        Value::Stream(v) => writer.write_prefixed_bytes(v)?,
    }
    Ok(())
}

fn read_value(reader: &mut BinaryReader<'_>, name: &str, data_type: DataType) -> Result<Value> {
    let value = match data_type {
        DataType::Integer => Value::Integer(reader.read_i32()?),
        DataType::Float => Value::Float(reader.read_f32()?),
        DataType::Boolean => match reader.read_u32()? {
            0 => Value::Boolean(false),
            1 => Value::Boolean(true),
            other => {
                return Err(Error::InvalidBoolean {
                    name: name.to_string(),
                    value: other,
                })
            }
        },
        DataType::String => Value::String(reader.read_prefixed_latin1()?),
        DataType::WideString => Value::WideString(reader.read_prefixed_utf16()?),
        DataType::UniqueId => Value::UniqueId(reader.read_struct::<UniqueId>()?),
        DataType::Stream => Value::Stream(reader.read_prefixed_bytes()?.to_vec()),
    };
    Ok(value)
}

/// Check whether bytes form a key: 1 to [`MAX_KEY_LEN`] bytes, a letter
/// first, then letters, digits, `_`, `.`, `[` or `]`.
pub fn is_key_name(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((first, rest)) => {
            bytes.len() <= MAX_KEY_LEN
                && first.is_ascii_alphabetic()
                && rest
                    .iter()
                    .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'[' | b']'))
        }
        None => false,
    }
}

/// End offset of a length-prefixed key starting at `offset`.
fn key_end(data: &[u8], offset: usize) -> Option<usize> {
    let mut reader = BinaryReader::new_at(data, offset);
    let length = reader.peek_u32().ok()? as usize;
    if length == 0 || length > MAX_KEY_LEN {
        return None;
    }
    reader.advance(4);
    let key = reader.read_bytes(length).ok()?;
    is_key_name(key).then_some(reader.position())
}

/// Check whether a value may end at `offset`: either the input ends there
/// or a key starts there with room left for its value.
fn is_boundary(data: &[u8], offset: usize) -> bool {
    if offset == data.len() {
        return true;
    }
    match key_end(data, offset) {
        Some(end) => data.len().saturating_sub(end) >= 4,
        None => false,
    }
}

/// Types the value of an unknown key at `offset` may have, most likely
/// first. Every candidate ends at a boundary and re-encodes to the same
/// bytes.
///
/// Text with a matching length prefix is the strongest signal, then a
/// four-byte scalar, then an opaque length-prefixed blob, then a 16-byte
/// identifier.
fn candidate_types(data: &[u8], offset: usize) -> Vec<DataType> {
    let mut candidates = Vec::new();
    let Ok(length) = BinaryReader::new_at(data, offset).peek_u32() else {
        return candidates;
    };
    let length = length as usize;
    let start = offset + 4;
    let mut blob = false;

    if length > 0 {
        if let Some(end) = span_end(data, start, Some(length)) {
            if latin1::is_text(&data[start..end]) {
                candidates.push(DataType::String);
            }
            blob = true;
        }
        if let Some(end) = span_end(data, start, length.checked_mul(2)) {
            if is_wide_text(&data[start..end]) {
                candidates.push(DataType::WideString);
            }
        }
    }

    if span_end(data, offset, DataType::Integer.fixed_size()).is_some() {
        candidates.push(DataType::Integer);
    }
    if blob {
        candidates.push(DataType::Stream);
    }
    if span_end(data, offset, DataType::UniqueId.fixed_size()).is_some() {
        candidates.push(DataType::UniqueId);
    }

    candidates
}

/// End of `length` bytes from `start`, if they fit in the input and end at
/// a boundary.
fn span_end(data: &[u8], start: usize, length: Option<usize>) -> Option<usize> {
    length
        .and_then(|length| start.checked_add(length))
        .filter(|&end| end <= data.len() && is_boundary(data, end))
}

fn is_wide_text(bytes: &[u8]) -> bool {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    match String::from_utf16(&units) {
        Ok(text) => !text.is_empty() && !text.chars().any(char::is_control),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{NoHints, BEGIN_BLOCK_MAGIC, END_BLOCK_MAGIC};

    fn key(writer: &mut BinaryWriter, name: &str) {
        writer.write_prefixed_latin1(name).unwrap();
    }

    #[test]
    fn test_encode_layout() {
        let collection = RecordCollection::with_variables(
            "x",
            vec![Variable::integer("a", 1), Variable::string("b", "hi")],
        );
        let bytes = BinaryCodec.encode(&collection).unwrap();
        assert_eq!(
            bytes,
            [
                1, 0, 0, 0, b'a', 1, 0, 0, 0, //
                1, 0, 0, 0, b'b', 2, 0, 0, 0, b'h', b'i',
            ]
        );
    }

    #[test]
    fn test_infers_unknown_types() {
        let mut w = BinaryWriter::new();
        key(&mut w, "begin_block");
        w.write_i32(BEGIN_BLOCK_MAGIC).unwrap();
        key(&mut w, "itemName");
        w.write_prefixed_latin1("records\\item\\sword.dbr").unwrap();
        key(&mut w, "myPlayerName");
        w.write_prefixed_utf16("Hélène").unwrap();
        key(&mut w, "uniqueId");
        w.write_bytes(&[0xA5; 16]);
        key(&mut w, "streamData");
        w.write_prefixed_bytes(&[0x00, 0x01, 0x02, 0xFF, 0x10]).unwrap();
        key(&mut w, "end_block");
        w.write_i32(END_BLOCK_MAGIC).unwrap();
        let bytes = w.into_inner();

        let c = BinaryCodec.decode(RecordId::new("Player.chr"), &bytes, &NoHints).unwrap();
        let types: Vec<_> = c.iter().map(Variable::data_type).collect();
        assert_eq!(
            types,
            vec![
                DataType::Integer,
                DataType::String,
                DataType::WideString,
                DataType::UniqueId,
                DataType::Stream,
                DataType::Integer,
            ]
        );
        assert_eq!(c.get("myPlayerName").unwrap().get_wide_str(0).unwrap(), "Hélène");
        assert_eq!(c.check_blocks().unwrap(), 1);
        assert_eq!(BinaryCodec.encode(&c).unwrap(), bytes);
    }

    #[test]
    fn test_integer_preferred_over_accidental_blob() {
        // 8 could be read as the length of the next key plus part of its
        // value, but the next key starts right after four bytes.
        let mut w = BinaryWriter::new();
        key(&mut w, "count");
        w.write_i32(8).unwrap();
        key(&mut w, "name");
        w.write_prefixed_latin1("Hero").unwrap();
        let bytes = w.into_inner();

        let c = BinaryCodec.decode(RecordId::new("x"), &bytes, &NoHints).unwrap();
        assert_eq!(c.get("count").unwrap().get_i32(0).unwrap(), 8);
        assert_eq!(c.get("name").unwrap().get_str(0).unwrap(), "Hero");
    }

    #[test]
    fn test_blob_starting_with_a_key_shape() {
        // The payload begins like a one-letter key, so reading the length
        // as an Integer also lands on a boundary. Only the Stream reading
        // lets the rest of the input decode.
        let original = RecordCollection::with_variables(
            "x",
            vec![
                Variable::stream("blob", vec![1, 0, 0, 0, b'a', 0, 0, 0, 0, 0xEE]),
                Variable::integer("z", 1),
            ],
        );
        let bytes = BinaryCodec.encode(&original).unwrap();

        let decoded = BinaryCodec.decode(RecordId::new("x"), &bytes, &NoHints).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(BinaryCodec.encode(&decoded).unwrap(), bytes);
    }

    #[test]
    fn test_text_looking_blob_backtracks() {
        // Read as an Integer, the length prefix is followed by a key "ab"
        // whose value cannot be decoded.
        let mut w = BinaryWriter::new();
        key(&mut w, "data");
        w.write_prefixed_bytes(&[2, 0, 0, 0, b'a', b'b', 0xFF, 0xFF]).unwrap();
        key(&mut w, "level");
        w.write_i32(7).unwrap();
        let bytes = w.into_inner();

        let c = BinaryCodec.decode(RecordId::new("x"), &bytes, &NoHints).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("data").unwrap().data_type(), DataType::Stream);
        assert_eq!(c.get("level").unwrap().get_i32(0).unwrap(), 7);
        assert_eq!(BinaryCodec.encode(&c).unwrap(), bytes);
    }

    #[test]
    fn test_hints_override_inference() {
        let mut hints = HashMap::new();
        hints.insert("ratio".to_string(), DataType::Float);
        hints.insert("isInMainQuest".to_string(), DataType::Boolean);

        let collection = RecordCollection::with_variables(
            "x",
            vec![Variable::float("ratio", 0.5), Variable::boolean("isInMainQuest", true)],
        );
        let bytes = BinaryCodec.encode(&collection).unwrap();

        let typed = BinaryCodec.decode(RecordId::new("x"), &bytes, &hints).unwrap();
        assert_eq!(typed, collection);

        let untyped = BinaryCodec.decode(RecordId::new("x"), &bytes, &NoHints).unwrap();
        assert_eq!(untyped.get("ratio").unwrap().data_type(), DataType::Integer);
        assert_eq!(BinaryCodec.encode(&untyped).unwrap(), bytes);
    }

    #[test]
    fn test_invalid_boolean() {
        let mut hints = HashMap::new();
        hints.insert("flag".to_string(), DataType::Boolean);
        let bytes = BinaryCodec
            .encode(&RecordCollection::with_variables("x", vec![Variable::integer("flag", 2)]))
            .unwrap();
        let result = BinaryCodec.decode(RecordId::new("x"), &bytes, &hints);
        assert!(matches!(result, Err(Error::InvalidBoolean { value: 2, .. })));
    }

    #[test]
    fn test_arrays_rejected() {
        let collection = RecordCollection::with_variables(
            "x",
            vec![Variable::integers("max", [1, 2, 3]).unwrap()],
        );
        assert!(matches!(
            BinaryCodec.encode(&collection),
            Err(Error::UnsupportedArity { count: 3, .. })
        ));
    }

    #[test]
    fn test_invalid_key_names() {
        assert!(is_key_name(b"strategicMovementRespawnPoint[0]"));
        assert!(is_key_name(b"currentStats.charLevel"));
        assert!(!is_key_name(b"0abc"));
        assert!(!is_key_name(b"has space"));
        assert!(!is_key_name(b""));

        let collection = RecordCollection::with_variables("x", vec![Variable::integer("bad key", 1)]);
        assert!(matches!(BinaryCodec.encode(&collection), Err(Error::Unencodable { .. })));
    }

    #[test]
    fn test_malformed_input() {
        let garbage = [0xFFu8, 0xFF, 0xFF, 0xFF, 0x00];
        assert!(matches!(
            BinaryCodec.decode(RecordId::new("x"), &garbage, &NoHints),
            Err(Error::MalformedKey { offset: 0 })
        ));

        let mut w = BinaryWriter::new();
        key(&mut w, "truncated");
        w.write_bytes(&[1, 2]);
        assert!(matches!(
            BinaryCodec.decode(RecordId::new("x"), w.as_bytes(), &NoHints),
            Err(Error::UndecodableValue { .. })
        ));
    }
}
