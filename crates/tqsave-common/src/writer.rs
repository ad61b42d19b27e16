//! Binary writer producing the little-endian layout of save files.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{latin1, Error, Result};

/// An append-only little-endian writer backed by a `Vec<u8>`.
///
/// Every `write_*` method mirrors a `read_*` method of
/// [`BinaryReader`](crate::BinaryReader).
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    buffer: Vec<u8>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Borrow the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return its buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian i32.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.buffer.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian f32.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.buffer.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a `u32` length followed by the bytes.
    pub fn write_prefixed_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_length(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    /// Write a `u32` length followed by single-byte chars.
    pub fn write_prefixed_latin1(&mut self, text: &str) -> Result<()> {
        let bytes = latin1::encode(text)?;
        self.write_prefixed_bytes(&bytes)
    }

    /// Write a `u32` code-unit count followed by UTF-16LE data.
    pub fn write_prefixed_utf16(&mut self, text: &str) -> Result<()> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.write_length(units.len())?;
        for unit in units {
            self.buffer.write_u16::<LittleEndian>(unit)?;
        }
        Ok(())
    }

    fn write_length(&mut self, length: usize) -> Result<()> {
        let length = u32::try_from(length).map_err(|_| Error::LengthOverflow(length))?;
        self.write_u32(length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_write_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0x04030201).unwrap();
        writer.write_i32(-1).unwrap();
        writer.write_f32(1.0).unwrap();

        assert_eq!(
            writer.into_inner(),
            [0x01, 0x02, 0x03, 0x04, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F]
        );
    }

    #[test]
    fn test_prefixed_strings_match_reader() {
        let mut writer = BinaryWriter::new();
        writer.write_prefixed_latin1("itemName").unwrap();
        writer.write_prefixed_utf16("Hélène").unwrap();

        let bytes = writer.into_inner();
        let mut reader = BinaryReader::new(&bytes);
        assert_eq!(reader.read_prefixed_latin1().unwrap(), "itemName");
        assert_eq!(reader.read_prefixed_utf16().unwrap(), "Hélène");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        let mut writer = BinaryWriter::new();
        assert!(writer.write_prefixed_latin1("日本").is_err());
        assert!(writer.is_empty());
    }
}
