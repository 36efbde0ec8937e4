use crate::utils::error::{ApngError, ApngResult};

/// Cursor over a chunk payload that reads big-endian fields.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        ByteReader { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads a single byte.
    ///
    /// # Returns
    /// - The byte at the current offset
    /// - `ApngError::BufferTooShort` if the buffer is exhausted
    pub fn read_u8(&mut self) -> ApngResult<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Reads a big-endian 16-bit integer.
    pub fn read_u16(&mut self) -> ApngResult<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(u16::from_be_bytes(bytes))
    }

    /// Reads a big-endian 32-bit integer.
    pub fn read_u32(&mut self) -> ApngResult<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Reads exactly `n` bytes and advances past them.
    pub fn read_bytes(&mut self, n: usize) -> ApngResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(ApngError::BufferTooShort {
                offset: self.offset,
                needed: n,
                available: self.remaining(),
            });
        }

        let bytes = &self.buffer[self.offset..self.offset + n];
        self.offset += n;

        Ok(bytes)
    }

    /// Reads the bytes up to the next NUL and consumes the terminator.
    ///
    /// The terminator itself is not part of the returned slice. A missing
    /// terminator is reported as `BufferTooShort`, since the field runs past
    /// the end of the buffer.
    pub fn read_null_terminated(&mut self) -> ApngResult<&'a [u8]> {
        let rest = &self.buffer[self.offset..];

        match rest.iter().position(|&b| b == 0) {
            Some(end) => {
                let bytes = &rest[..end];
                self.offset += end + 1;
                Ok(bytes)
            }
            None => Err(ApngError::BufferTooShort {
                offset: self.buffer.len(),
                needed: 1,
                available: 0,
            }),
        }
    }

    /// Consumes everything left in the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = &self.buffer[self.offset..];
        self.offset = self.buffer.len();
        rest
    }

    fn read_array<const N: usize>(&mut self) -> ApngResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }
}

/// Growable big-endian payload builder, the write-side mirror of [`ByteReader`].
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter { buffer: Vec::with_capacity(capacity) }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self
    }

    pub fn write_null_terminated(&mut self, bytes: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(bytes);
        self.buffer.push(0);
        self
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

/// Decodes Latin-1 bytes, the encoding used by keywords and plain text.
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encodes a string as Latin-1. Characters outside the range become `?`.
pub(crate) fn string_to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c as u8 } else { b'?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_reader() -> Result<(), Box<dyn std::error::Error>> {
        let mut reader = ByteReader::new(b"\x01\x02\x03\x04\x05\x06\x07key\0rest");
        assert_eq!(reader.read_u8()?, 1);
        assert_eq!(reader.read_u16()?, 0x0203);
        assert_eq!(reader.read_u32()?, 0x04050607);
        assert_eq!(reader.read_null_terminated()?, b"key");
        assert_eq!(reader.read_rest(), b"rest");
        assert!(reader.is_empty());

        Ok(())
    }

    #[test]
    pub fn test_reader_past_end() {
        let mut reader = ByteReader::new(&[1, 2, 3]);
        assert!(matches!(
            reader.read_u32(),
            Err(ApngError::BufferTooShort { offset: 0, needed: 4, available: 3 })
        ));
        assert!(matches!(reader.read_null_terminated(), Err(ApngError::BufferTooShort { .. })));
    }

    #[test]
    pub fn test_writer() {
        let mut writer = ByteWriter::new();
        writer.write_u8(1).write_u16(0x0203).write_u32(0x04050607).write_null_terminated(b"key");
        assert_eq!(writer.into_inner(), b"\x01\x02\x03\x04\x05\x06\x07key\0");
    }

    #[test]
    pub fn test_latin1() {
        let text = latin1_to_string(b"caf\xe9");
        assert_eq!(text, "caf\u{e9}");
        assert_eq!(string_to_latin1(&text), b"caf\xe9");
        assert_eq!(string_to_latin1("\u{263a}"), b"?");
    }
}
