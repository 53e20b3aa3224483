//! Binary blob assembler for relocatable chip database images.
//!
//! The [`BlobAssembler`] collects a stream of named records (labels), scalar
//! fields, strings, and references to other records by name. References may
//! point forward to records that have not been declared yet; [`BlobAssembler::link`]
//! lays out every record in a first pass and resolves all references in a
//! second pass, producing a single [`Blob`].
//!
//! # Encoding
//!
//! - Scalars are written at their natural width in the selected [`Endianness`].
//! - A reference is a signed 32-bit distance from the reference field itself
//!   to the target record, so the image can be loaded at any address. A
//!   missing target is written as `0`.
//! - Strings are nul-terminated and stored once each in a pool that follows
//!   the last record; the string field is a reference into that pool.
//!
//! The [`BlobReader`] decodes the same encoding and is what the tests and the
//! relative-addressing checks use to inspect linked images.

#![warn(missing_docs)]

pub mod assembler;
pub mod error;
pub mod reader;
pub mod text;

pub use assembler::{Blob, BlobAssembler, BlobLayout, RecordLayout};
pub use error::{LinkError, ReadError};
pub use reader::{BlobReader, Cursor};
pub use text::TextDump;

use serde::{Deserialize, Serialize};

/// Byte order of the emitted image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Least significant byte first.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    pub(crate) fn put_u16(self, out: &mut Vec<u8>, v: u16) {
        match self {
            Endianness::Little => out.extend_from_slice(&v.to_le_bytes()),
            Endianness::Big => out.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub(crate) fn put_u32(self, out: &mut Vec<u8>, v: u32) {
        match self {
            Endianness::Little => out.extend_from_slice(&v.to_le_bytes()),
            Endianness::Big => out.extend_from_slice(&v.to_be_bytes()),
        }
    }

    pub(crate) fn get_u16(self, b: [u8; 2]) -> u16 {
        match self {
            Endianness::Little => u16::from_le_bytes(b),
            Endianness::Big => u16::from_be_bytes(b),
        }
    }

    pub(crate) fn get_u32(self, b: [u8; 4]) -> u32 {
        match self {
            Endianness::Little => u32::from_le_bytes(b),
            Endianness::Big => u32::from_be_bytes(b),
        }
    }
}

impl std::fmt::Display for Endianness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endianness::Little => write!(f, "le"),
            Endianness::Big => write!(f, "be"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_little() {
        assert_eq!(Endianness::default(), Endianness::Little);
    }

    #[test]
    fn put_and_get_agree() {
        for e in [Endianness::Little, Endianness::Big] {
            let mut out = Vec::new();
            e.put_u16(&mut out, 0x1234);
            e.put_u32(&mut out, 0xDEAD_BEEF);
            assert_eq!(e.get_u16([out[0], out[1]]), 0x1234);
            assert_eq!(e.get_u32([out[2], out[3], out[4], out[5]]), 0xDEAD_BEEF);
        }
    }

    #[test]
    fn byte_order() {
        let mut le = Vec::new();
        Endianness::Little.put_u32(&mut le, 0x0102_0304);
        assert_eq!(le, [4, 3, 2, 1]);
        let mut be = Vec::new();
        Endianness::Big.put_u32(&mut be, 0x0102_0304);
        assert_eq!(be, [1, 2, 3, 4]);
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Endianness::Big).unwrap();
        assert_eq!(json, "\"big\"");
        let back: Endianness = serde_json::from_str("\"little\"").unwrap();
        assert_eq!(back, Endianness::Little);
    }
}
