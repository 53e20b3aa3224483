//! Decoding of linked images.

use crate::error::ReadError;
use crate::Endianness;

/// Random-access decoder over a linked image.
#[derive(Debug, Clone, Copy)]
pub struct BlobReader<'a> {
    bytes: &'a [u8],
    endianness: Endianness,
}

impl<'a> BlobReader<'a> {
    /// Wraps raw image bytes written in the given byte order.
    pub fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
        Self { bytes, endianness }
    }

    /// Image size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for an empty image.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], ReadError> {
        offset
            .checked_add(len)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(ReadError::OutOfBounds { offset, len })
    }

    /// Reads an 8-bit field.
    pub fn u8(&self, offset: usize) -> Result<u8, ReadError> {
        Ok(self.slice(offset, 1)?[0])
    }

    /// Reads a 16-bit field.
    pub fn u16(&self, offset: usize) -> Result<u16, ReadError> {
        let b = self.slice(offset, 2)?;
        Ok(self.endianness.get_u16([b[0], b[1]]))
    }

    /// Reads a 32-bit field.
    pub fn u32(&self, offset: usize) -> Result<u32, ReadError> {
        let b = self.slice(offset, 4)?;
        Ok(self.endianness.get_u32([b[0], b[1], b[2], b[3]]))
    }

    /// Follows the reference stored at `offset`.
    ///
    /// Returns `None` for a null reference, otherwise the absolute offset of
    /// the target.
    pub fn reference(&self, offset: usize) -> Result<Option<usize>, ReadError> {
        let rel = self.u32(offset)? as i32;
        if rel == 0 {
            return Ok(None);
        }
        let target = offset as i64 + i64::from(rel);
        if target < 0 || target as usize > self.bytes.len() {
            return Err(ReadError::OutOfBounds {
                offset: target.max(0) as usize,
                len: 0,
            });
        }
        Ok(Some(target as usize))
    }

    /// Follows a reference that must not be null.
    pub fn required_reference(&self, offset: usize) -> Result<usize, ReadError> {
        self.reference(offset)?
            .ok_or(ReadError::NullReference(offset))
    }

    /// Reads the nul-terminated string starting at `offset`.
    pub fn c_str(&self, offset: usize) -> Result<&'a str, ReadError> {
        let tail = self
            .bytes
            .get(offset..)
            .ok_or(ReadError::OutOfBounds { offset, len: 1 })?;
        let end = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(ReadError::UnterminatedString(offset))?;
        std::str::from_utf8(&tail[..end]).map_err(|_| ReadError::InvalidUtf8(offset))
    }

    /// Follows the string reference stored at `offset`.
    pub fn string(&self, offset: usize) -> Result<Option<&'a str>, ReadError> {
        match self.reference(offset)? {
            Some(target) => self.c_str(target).map(Some),
            None => Ok(None),
        }
    }

    /// Starts a sequential cursor at `offset`.
    pub fn cursor(&self, offset: usize) -> Cursor<'a> {
        Cursor {
            reader: *self,
            pos: offset,
        }
    }
}

/// Sequential field decoder, advancing by each field's width.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    reader: BlobReader<'a>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Current offset into the image.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advances past `n` bytes without decoding them.
    pub fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    /// Reads the next 8-bit field.
    pub fn next_u8(&mut self) -> Result<u8, ReadError> {
        let v = self.reader.u8(self.pos)?;
        self.pos += 1;
        Ok(v)
    }

    /// Reads the next 16-bit field.
    pub fn next_u16(&mut self) -> Result<u16, ReadError> {
        let v = self.reader.u16(self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    /// Reads the next 32-bit field.
    pub fn next_u32(&mut self) -> Result<u32, ReadError> {
        let v = self.reader.u32(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    /// Reads the next reference field.
    pub fn next_ref(&mut self) -> Result<Option<usize>, ReadError> {
        let v = self.reader.reference(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    /// Reads the next string reference field.
    pub fn next_string(&mut self) -> Result<Option<&'a str>, ReadError> {
        let v = self.reader.string(self.pos)?;
        self.pos += 4;
        Ok(v)
    }
}
