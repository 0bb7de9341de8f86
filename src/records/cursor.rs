//! # RecordCursor - Jagged Record Decoding
//!
//! `RecordCursor` pairs one [`ByteRegion`] with one [`LayoutDescriptor`] and
//! decodes records at arbitrary offsets. Each decode walks the layout in order,
//! so a variable field can use the value of an earlier length field, and
//! reports how many bytes the record actually occupied.
//!
//! ## Usage
//!
//! ```ignore
//! let cursor = RecordCursor::new(region, &layout);
//! let first = cursor.decode_at(0)?;
//! let second = cursor.decode_at(first.end())?;   // jagged: end depends on data
//! let name: &str = second.str("name")?;           // zero-copy view
//! ```
//!
//! ## Failure Semantics
//!
//! A decode is all-or-nothing. The first field that would read past the end of
//! the region fails the whole call with `OutOfBounds` and no partial record
//! escapes. Offsets closer than `minimum_size()` to the end fail before any
//! field is read.
//!
//! ## Thread Safety
//!
//! `decode_at` takes `&self`, so any number of threads may decode from
//! the same cursor. Only `decode_next`/`seek` mutate the cursor position.

use eyre::{bail, Result};
use smallvec::SmallVec;

use crate::config::INLINE_FIELDS;
use crate::error::AccessError;
use crate::layout::{FieldKind, LayoutDescriptor};
use crate::memory::ByteRegion;
use crate::records::value::Value;

#[derive(Debug, Clone)]
pub struct DecodedRecord<'a> {
    layout: &'a LayoutDescriptor,
    start: usize,
    span: ByteRegion<'a>,
    values: SmallVec<[Value<'a>; INLINE_FIELDS]>,
}

impl<'a> DecodedRecord<'a> {
    /// Offset of the record within the region it was decoded from.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Jagged length: the bytes this record occupied.
    pub fn consumed(&self) -> usize {
        self.span.len()
    }

    pub fn end(&self) -> usize {
        self.start + self.span.len()
    }

    pub fn span(&self) -> ByteRegion<'a> {
        self.span
    }

    pub fn layout(&self) -> &'a LayoutDescriptor {
        self.layout
    }

    pub fn values(&self) -> &[Value<'a>] {
        &self.values
    }

    pub fn get_index(&self, idx: usize) -> Option<Value<'a>> {
        self.values.get(idx).copied()
    }

    pub fn get(&self, name: &str) -> Option<Value<'a>> {
        self.layout
            .index_of(name)
            .and_then(|idx| self.get_index(idx))
    }

    fn require(&self, name: &str) -> Result<Value<'a>> {
        self.get(name)
            .ok_or_else(|| eyre::eyre!("record has no field named '{}'", name))
    }

    pub fn u64(&self, name: &str) -> Result<u64> {
        let value = self.require(name)?;
        value.as_u64().ok_or_else(|| {
            eyre::eyre!("field '{}' holds {} {}, not u64", name, value.type_name(), value)
        })
    }

    pub fn i64(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        value.as_i64().ok_or_else(|| {
            eyre::eyre!("field '{}' holds {} {}, not i64", name, value.type_name(), value)
        })
    }

    pub fn f64(&self, name: &str) -> Result<f64> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| eyre::eyre!("field '{}' holds {}, not a float", name, value.type_name()))
    }

    pub fn bytes(&self, name: &str) -> Result<&'a [u8]> {
        let value = self.require(name)?;
        value
            .as_bytes()
            .ok_or_else(|| eyre::eyre!("field '{}' holds {}, not bytes", name, value.type_name()))
    }

    pub fn str(&self, name: &str) -> Result<&'a str> {
        let value = self.require(name)?;
        let bytes = value
            .trimmed_bytes()
            .ok_or_else(|| eyre::eyre!("field '{}' holds {}, not bytes", name, value.type_name()))?;
        std::str::from_utf8(bytes)
            .map_err(|e| eyre::eyre!("invalid UTF-8 in field '{}': {}", name, e))
    }
}

#[derive(Debug, Clone)]
pub struct RecordCursor<'a> {
    region: ByteRegion<'a>,
    layout: &'a LayoutDescriptor,
    offset: usize,
}

impl<'a> RecordCursor<'a> {
    pub fn new(region: ByteRegion<'a>, layout: &'a LayoutDescriptor) -> Self {
        Self {
            region,
            layout,
            offset: 0,
        }
    }

    pub fn region(&self) -> ByteRegion<'a> {
        self.region
    }

    pub fn layout(&self) -> &'a LayoutDescriptor {
        self.layout
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn seek(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn decode_at(&self, offset: usize) -> Result<DecodedRecord<'a>> {
        let region = self.region;
        let layout = self.layout;
        let min = layout.minimum_size();

        match offset.checked_add(min) {
            Some(end) if end <= region.len() => {}
            _ => bail!(AccessError::out_of_bounds(offset, min, region.len())),
        }

        let endian = layout.endian();
        let mut pos = offset;
        let mut values: SmallVec<[Value<'a>; INLINE_FIELDS]> = SmallVec::new();

        for (idx, field) in layout.fields().iter().enumerate() {
            let align = layout.required_alignment(idx);
            let value = match &field.kind {
                FieldKind::Scalar(ty) => {
                    let scalar = region.read_fixed(pos, *ty, endian, align)?;
                    pos += ty.width();
                    Value::from(scalar)
                }
                FieldKind::Bytes(width) => {
                    let view = region.slice(pos, *width)?;
                    ensure_aligned(view, align)?;
                    pos += width;
                    Value::Bytes(view)
                }
                FieldKind::Var { terminated, .. } => {
                    let len = self.payload_len(&values, idx, pos)?;
                    let view = region.slice(pos, len)?;
                    ensure_aligned(view, align)?;
                    pos += len;
                    if *terminated {
                        region.byte(pos)?;
                        pos += 1;
                    }
                    Value::Bytes(view)
                }
                FieldKind::CStr => {
                    let nul = region.position_of(pos, 0).ok_or_else(|| {
                        AccessError::out_of_bounds(
                            pos,
                            region.len().saturating_sub(pos) + 1,
                            region.len(),
                        )
                    })?;
                    let view = region.slice(pos, nul - pos)?;
                    ensure_aligned(view, align)?;
                    pos = nul + 1;
                    Value::Bytes(view)
                }
            };
            values.push(value);
        }

        Ok(DecodedRecord {
            layout,
            start: offset,
            span: region.slice(offset, pos - offset)?,
            values,
        })
    }

    fn payload_len(&self, values: &[Value<'a>], idx: usize, pos: usize) -> Result<usize> {
        let source = self
            .layout
            .length_source(idx)
            .ok_or_else(|| eyre::eyre!("field {} has no resolved length source", idx))?;
        let len = match values[source] {
            Value::Unsigned(n) => n,
            other => bail!(
                "length source of field {} decoded as {}, not unsigned",
                idx,
                other.type_name()
            ),
        };
        usize::try_from(len)
            .map_err(|_| AccessError::out_of_bounds(pos, usize::MAX, self.region.len()).into())
    }

    /// Decodes the record at the cursor position and advances past it.
    /// Returns `None` once the position reaches the end of the region.
    pub fn decode_next(&mut self) -> Result<Option<DecodedRecord<'a>>> {
        if self.offset >= self.region.len() {
            return Ok(None);
        }
        let record = self.decode_at(self.offset)?;
        self.offset = record.end();
        Ok(Some(record))
    }

    /// Number of whole records in the region for fixed-size layouts.
    pub fn record_count(&self) -> Option<usize> {
        self.layout
            .fixed_size()
            .map(|size| self.region.len() / size)
    }

    /// Random access into a sequence of fixed-size records.
    pub fn record_at(&self, index: usize) -> Result<DecodedRecord<'a>> {
        let Some(size) = self.layout.fixed_size() else {
            bail!("record_at requires a fixed-size layout, got {}", self.layout);
        };
        let offset = index
            .checked_mul(size)
            .ok_or_else(|| AccessError::out_of_bounds(usize::MAX, size, self.region.len()))?;
        self.decode_at(offset)
    }
}

fn ensure_aligned(view: ByteRegion<'_>, align: usize) -> Result<()> {
    if align > 1 && view.base_offset() % align != 0 {
        bail!(AccessError::Alignment {
            offset: view.base_offset(),
            align,
        });
    }
    Ok(())
}

/// Decodes one record of `layout` at `offset` in `region`.
pub fn decode_at<'a>(
    region: ByteRegion<'a>,
    offset: usize,
    layout: &'a LayoutDescriptor,
) -> Result<DecodedRecord<'a>> {
    RecordCursor::new(region, layout).decode_at(offset)
}
