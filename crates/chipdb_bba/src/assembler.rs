//! Record stream collection and the two-pass linker.

use crate::error::LinkError;
use crate::reader::BlobReader;
use crate::Endianness;
use serde::Serialize;
use std::collections::HashMap;

/// One emitted element of the record stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    Push(String),
    Pop,
    Label { name: String, ty: Option<String> },
    U8 { value: u8, tag: &'static str },
    U16 { value: u16, tag: &'static str },
    U32 { value: u32, tag: &'static str },
    Str { value: String, tag: &'static str },
    Ref { target: Option<String>, tag: &'static str },
}

impl Item {
    /// Bytes this item occupies in the record area.
    fn size(&self) -> usize {
        match self {
            Item::Push(_) | Item::Pop | Item::Label { .. } => 0,
            Item::U8 { .. } => 1,
            Item::U16 { .. } => 2,
            Item::U32 { .. } | Item::Str { .. } | Item::Ref { .. } => 4,
        }
    }

    fn describe(&self) -> String {
        match self {
            Item::Push(name) => format!("container '{name}'"),
            Item::Pop => "pop".to_string(),
            Item::Label { name, .. } => format!("label '{name}'"),
            Item::U8 { tag, .. }
            | Item::U16 { tag, .. }
            | Item::U32 { tag, .. }
            | Item::Str { tag, .. }
            | Item::Ref { tag, .. } => format!("field `{tag}`"),
        }
    }
}

/// Collects labels, scalars, strings, and named references for later linking.
///
/// Emission never fails; every consistency check happens in [`link`](Self::link),
/// once the whole stream is known. That is what allows a record to reference
/// another record that is only declared further down the stream.
///
/// ```
/// use chipdb_bba::{BlobAssembler, Endianness};
///
/// let mut bba = BlobAssembler::new();
/// bba.push("chipdb_blob_25k");
/// bba.reference(Some("chip_info".into()), "chip_info");
/// bba.label("chip_info", None);
/// bba.u32(42, "width");
/// bba.pop();
///
/// let blob = bba.link(Endianness::Little).unwrap();
/// assert_eq!(blob.reader().reference(0).unwrap(), Some(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlobAssembler {
    pub(crate) pre: Vec<String>,
    pub(crate) post: Vec<String>,
    pub(crate) items: Vec<Item>,
}

impl BlobAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a prologue line to the text dump. Has no effect on the binary image.
    pub fn pre(&mut self, line: impl Into<String>) {
        self.pre.push(line.into());
    }

    /// Adds an epilogue line to the text dump. Has no effect on the binary image.
    pub fn post(&mut self, line: impl Into<String>) {
        self.post.push(line.into());
    }

    /// Opens the top-level container that holds the whole image.
    pub fn push(&mut self, name: impl Into<String>) {
        self.items.push(Item::Push(name.into()));
    }

    /// Closes the top-level container.
    pub fn pop(&mut self) {
        self.items.push(Item::Pop);
    }

    /// Starts a new named record at the current position.
    pub fn label(&mut self, name: impl Into<String>, ty: Option<&str>) {
        self.items.push(Item::Label {
            name: name.into(),
            ty: ty.map(str::to_string),
        });
    }

    /// Appends an 8-bit field.
    pub fn u8(&mut self, value: u8, tag: &'static str) {
        self.items.push(Item::U8 { value, tag });
    }

    /// Appends a 16-bit field.
    pub fn u16(&mut self, value: u16, tag: &'static str) {
        self.items.push(Item::U16 { value, tag });
    }

    /// Appends a 32-bit field.
    pub fn u32(&mut self, value: u32, tag: &'static str) {
        self.items.push(Item::U32 { value, tag });
    }

    /// Appends a reference to a pooled, nul-terminated copy of `value`.
    pub fn string(&mut self, value: impl Into<String>, tag: &'static str) {
        self.items.push(Item::Str {
            value: value.into(),
            tag,
        });
    }

    /// Appends a reference to the record labelled `target`, or a null
    /// reference for `None`. The label may be declared later in the stream.
    pub fn reference(&mut self, target: Option<String>, tag: &'static str) {
        self.items.push(Item::Ref { target, tag });
    }

    /// Number of emitted items, scope markers and labels included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lays out and resolves the stream into a single image.
    ///
    /// The first pass assigns every label its byte offset and builds the
    /// string pool; the second pass writes the bytes, rewriting every
    /// reference as the distance from the field to its target.
    ///
    /// # Errors
    ///
    /// Returns a [`LinkError`] for undefined or duplicate labels, unbalanced
    /// container scopes, data outside the container, unstorable strings, and
    /// images too large for 32-bit references.
    pub fn link(&self, endianness: Endianness) -> Result<Blob, LinkError> {
        let container = self.check_scope()?;

        // Pass 1: label placement and record sizes.
        let mut labels: HashMap<&str, usize> = HashMap::new();
        let mut records: Vec<RecordLayout> = Vec::new();
        let mut offset = 0usize;
        for item in &self.items {
            match item {
                Item::Label { name, ty } => {
                    if labels.insert(name.as_str(), offset).is_some() {
                        return Err(LinkError::DuplicateLabel(name.clone()));
                    }
                    if let Some(prev) = records.last_mut() {
                        prev.size = (offset - prev.offset as usize) as u32;
                    }
                    records.push(RecordLayout {
                        name: name.clone(),
                        ty: ty.clone(),
                        offset: offset as u32,
                        size: 0,
                    });
                }
                Item::Str { value, tag } if value.contains(['\0', '|']) => {
                    return Err(LinkError::InvalidString {
                        value: value.clone(),
                        tag: tag.to_string(),
                    });
                }
                _ => {}
            }
            offset += item.size();
        }
        let records_end = offset;
        if let Some(last) = records.last_mut() {
            last.size = (records_end - last.offset as usize) as u32;
        }

        let mut pool = Vec::new();
        let mut pooled: HashMap<&str, usize> = HashMap::new();
        for item in &self.items {
            if let Item::Str { value, .. } = item {
                pooled.entry(value.as_str()).or_insert_with(|| {
                    let at = records_end + pool.len();
                    pool.extend_from_slice(value.as_bytes());
                    pool.push(0);
                    at
                });
            }
        }

        let total = records_end + pool.len();
        if total > i32::MAX as usize {
            return Err(LinkError::ImageTooLarge(total));
        }

        // Pass 2: emission with resolved references.
        let mut bytes = Vec::with_capacity(total);
        for item in &self.items {
            let pos = bytes.len();
            match item {
                Item::U8 { value, .. } => bytes.push(*value),
                Item::U16 { value, .. } => endianness.put_u16(&mut bytes, *value),
                Item::U32 { value, .. } => endianness.put_u32(&mut bytes, *value),
                Item::Str { value, .. } => {
                    let at = pooled[value.as_str()];
                    endianness.put_u32(&mut bytes, distance(pos, at));
                }
                Item::Ref { target: None, .. } => endianness.put_u32(&mut bytes, 0),
                Item::Ref {
                    target: Some(label),
                    tag,
                } => {
                    let at = *labels.get(label.as_str()).ok_or_else(|| {
                        LinkError::UndefinedLabel {
                            label: label.clone(),
                            tag: tag.to_string(),
                        }
                    })?;
                    if at == pos {
                        return Err(LinkError::SelfReference {
                            label: label.clone(),
                            tag: tag.to_string(),
                        });
                    }
                    endianness.put_u32(&mut bytes, distance(pos, at));
                }
                Item::Push(_) | Item::Pop | Item::Label { .. } => {}
            }
        }
        bytes.extend_from_slice(&pool);

        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        Ok(Blob {
            container,
            bytes,
            records,
            index,
            endianness,
            string_pool_offset: records_end,
        })
    }

    /// Checks that exactly one container wraps every label and field, and
    /// returns its name.
    fn check_scope(&self) -> Result<String, LinkError> {
        let mut container: Option<&str> = None;
        let mut closed = false;
        for item in &self.items {
            match item {
                Item::Push(name) => {
                    if let Some(open) = container {
                        return Err(LinkError::UnbalancedScope(format!(
                            "container '{name}' opened after '{open}'"
                        )));
                    }
                    container = Some(name);
                }
                Item::Pop => {
                    if container.is_none() || closed {
                        return Err(LinkError::UnbalancedScope(
                            "pop without matching push".to_string(),
                        ));
                    }
                    closed = true;
                }
                other => {
                    if container.is_none() || closed {
                        return Err(LinkError::OutsideScope(other.describe()));
                    }
                }
            }
        }
        match (container, closed) {
            (Some(name), true) => Ok(name.to_string()),
            (Some(name), false) => Err(LinkError::UnbalancedScope(format!(
                "container '{name}' never closed"
            ))),
            (None, _) => Err(LinkError::UnbalancedScope(
                "no container opened".to_string(),
            )),
        }
    }
}

/// Encodes the signed distance from a field to its target.
fn distance(from: usize, to: usize) -> u32 {
    (to as i64 - from as i64) as i32 as u32
}

/// Placement of one labelled record inside a linked image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLayout {
    /// The label name.
    pub name: String,
    /// The declared record type, if any.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    /// Byte offset of the record from the start of the image.
    pub offset: u32,
    /// Size in bytes, up to the next label or the string pool.
    pub size: u32,
}

/// A linked, self-contained binary image.
#[derive(Debug, Clone)]
pub struct Blob {
    container: String,
    bytes: Vec<u8>,
    records: Vec<RecordLayout>,
    index: HashMap<String, usize>,
    endianness: Endianness,
    string_pool_offset: usize,
}

impl Blob {
    /// The raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the blob, returning the raw image bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Image size in bytes, string pool included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for an image without any bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Name of the top-level container.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Byte order the image was written in.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Every labelled record, in emission order.
    pub fn records(&self) -> &[RecordLayout] {
        &self.records
    }

    /// Looks up a record by label name.
    pub fn record(&self, name: &str) -> Option<&RecordLayout> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Byte offset of a label, if it was declared.
    pub fn label_offset(&self, name: &str) -> Option<usize> {
        self.record(name).map(|r| r.offset as usize)
    }

    /// Offset at which the string pool starts.
    pub fn string_pool_offset(&self) -> usize {
        self.string_pool_offset
    }

    /// A decoder over this image.
    pub fn reader(&self) -> BlobReader<'_> {
        BlobReader::new(&self.bytes, self.endianness)
    }

    /// Serializable summary of the image layout.
    pub fn layout(&self) -> BlobLayout<'_> {
        BlobLayout {
            container: &self.container,
            endianness: self.endianness,
            size: self.bytes.len(),
            string_pool_offset: self.string_pool_offset,
            records: &self.records,
        }
    }
}

/// Record-layout metadata accompanying an image.
#[derive(Debug, Serialize)]
pub struct BlobLayout<'a> {
    /// Name of the top-level container.
    pub container: &'a str,
    /// Byte order of the image.
    pub endianness: Endianness,
    /// Total image size in bytes.
    pub size: usize,
    /// Offset at which the string pool starts.
    pub string_pool_offset: usize,
    /// All labelled records in emission order.
    pub records: &'a [RecordLayout],
}
