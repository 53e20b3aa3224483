//! Human-readable dump of an assembled record stream.
//!
//! The dump uses the line-oriented `bba` syntax understood by the external
//! `bbasm` tool, one directive per line:
//!
//! ```text
//! pre #include "nextpnr.h"
//! push chipdb_blob_25k
//! ref chip_info chip_info
//! label loc0_pips PipInfoPOD
//! u16 0 src.x
//! str |PLC2| name
//! pop
//! ```
//!
//! It is a debugging aid; the linked [`Blob`](crate::Blob) is the actual
//! output.

use crate::assembler::{BlobAssembler, Item};
use std::fmt;

/// Display adapter returned by [`BlobAssembler::text`].
pub struct TextDump<'a>(&'a BlobAssembler);

impl BlobAssembler {
    /// Renders the record stream in `bba` text syntax.
    pub fn text(&self) -> TextDump<'_> {
        TextDump(self)
    }
}

impl fmt::Display for TextDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bba = self.0;
        for line in &bba.pre {
            writeln!(f, "pre {line}")?;
        }
        for item in &bba.items {
            match item {
                Item::Push(name) => writeln!(f, "push {name}")?,
                Item::Pop => writeln!(f, "pop")?,
                Item::Label { name, ty: None } => writeln!(f, "label {name}")?,
                Item::Label { name, ty: Some(ty) } => writeln!(f, "label {name} {ty}")?,
                Item::U8 { value, tag } => writeln!(f, "u8 {value} {tag}")?,
                Item::U16 { value, tag } => writeln!(f, "u16 {value} {tag}")?,
                Item::U32 { value, tag } => writeln!(f, "u32 {value} {tag}")?,
                Item::Str { value, tag } => writeln!(f, "str |{value}| {tag}")?,
                Item::Ref {
                    target: Some(target),
                    tag,
                } => writeln!(f, "ref {target} {tag}")?,
                Item::Ref { target: None, tag } => writeln!(f, "ref None {tag}")?,
            }
        }
        for line in &bba.post {
            writeln!(f, "post {line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_lists_directives_in_order() {
        let mut bba = BlobAssembler::new();
        bba.pre("#include \"nextpnr.h\"");
        bba.post("NEXTPNR_NAMESPACE_END");
        bba.push("chipdb_blob_25k");
        bba.reference(Some("chip_info".into()), "chip_info");
        bba.label("pio_info", Some("PIOInfoPOD"));
        bba.u16(3, "abs_loc.x");
        bba.u8(1, "tap_dir");
        bba.u32(4, "bel_index");
        bba.string("PCLKT0_0", "function_name");
        bba.reference(None, "function_name");
        bba.label("chip_info", None);
        bba.pop();

        let text = bba.text().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "pre #include \"nextpnr.h\"",
                "push chipdb_blob_25k",
                "ref chip_info chip_info",
                "label pio_info PIOInfoPOD",
                "u16 3 abs_loc.x",
                "u8 1 tap_dir",
                "u32 4 bel_index",
                "str |PCLKT0_0| function_name",
                "ref None function_name",
                "label chip_info",
                "pop",
                "post NEXTPNR_NAMESPACE_END",
            ]
        );
    }

    #[test]
    fn empty_assembler_dumps_nothing() {
        assert_eq!(BlobAssembler::new().text().to_string(), "");
    }
}
