//! # LayoutDescriptor - Validated Record Shape
//!
//! Construction resolves every `Var` field's length source to a field index and
//! pre-computes the sizes that do not depend on data, so decoding never looks
//! anything up by name and never re-validates the shape.
//!
//! ## Internals
//!
//! - `index`: field name to position
//! - `length_sources`: resolved length-source position per field (`Var` only)
//! - `static_offsets`: offset of each field when every earlier field is fixed
//! - `minimum_size`: fixed widths plus the minimum of each variable field
//! - `fixed_size`: record size when the layout has no variable fields
//!
//! ## Validation
//!
//! `build` fails with `InvalidLayout` for: an empty layout, more than
//! `MAX_FIELDS` fields, an empty or duplicated name, a zero-width `Bytes`
//! field, an alignment that is not a power of two or exceeds `MAX_ALIGNMENT`,
//! and a `Var` field whose length source is missing, not earlier in the
//! layout, or not an unsigned integer.

use std::fmt;

use eyre::{bail, Result};
use hashbrown::HashMap;

use crate::config::{MAX_ALIGNMENT, MAX_FIELDS};
use crate::error::AccessError;
use crate::layout::field::{FieldKind, FieldSpec};
use crate::memory::ByteRegion;
use crate::records::{DecodedRecord, RecordCursor};
use crate::types::Endian;

/// Whether scalar reads must honor field alignment.
///
/// `Relaxed` reads at byte granularity and never raises `Alignment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    #[default]
    Enforce,
    Relaxed,
}

#[derive(Debug, Clone)]
pub struct LayoutDescriptor {
    fields: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    length_sources: Vec<Option<usize>>,
    static_offsets: Vec<Option<usize>>,
    minimum_size: usize,
    fixed_size: Option<usize>,
    endian: Endian,
    alignment: AlignmentPolicy,
}

impl LayoutDescriptor {
    pub fn build(fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            bail!(AccessError::invalid_layout("layout has no fields"));
        }
        if fields.len() > MAX_FIELDS {
            bail!(AccessError::invalid_layout(format!(
                "layout has {} fields, maximum is {}",
                fields.len(),
                MAX_FIELDS
            )));
        }

        let mut index: HashMap<String, usize> = HashMap::with_capacity(fields.len());
        let mut length_sources = Vec::with_capacity(fields.len());
        let mut static_offsets = Vec::with_capacity(fields.len());
        let mut running = Some(0usize);
        let mut minimum_size = 0usize;

        for (idx, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                bail!(AccessError::invalid_layout(format!(
                    "field {} has an empty name",
                    idx
                )));
            }

            if let Some(align) = field.declared_alignment() {
                if !align.is_power_of_two() || align > MAX_ALIGNMENT {
                    bail!(AccessError::invalid_layout(format!(
                        "field '{}' alignment {} must be a power of two no greater than {}",
                        field.name, align, MAX_ALIGNMENT
                    )));
                }
            }

            let source = match &field.kind {
                FieldKind::Bytes(0) => {
                    bail!(AccessError::invalid_layout(format!(
                        "field '{}' has zero width",
                        field.name
                    )));
                }
                FieldKind::Var { length_from, .. } => {
                    Some(Self::resolve_length_source(&fields, &index, field, length_from)?)
                }
                _ => None,
            };

            if index.insert(field.name.clone(), idx).is_some() {
                bail!(AccessError::invalid_layout(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }

            length_sources.push(source);
            static_offsets.push(running);
            running = running.and_then(|offset| field.fixed_width().map(|w| offset + w));
            minimum_size += field.min_width();
        }

        Ok(Self {
            fields,
            index,
            length_sources,
            static_offsets,
            minimum_size,
            fixed_size: running,
            endian: Endian::default(),
            alignment: AlignmentPolicy::default(),
        })
    }

    /// `index` holds only the fields that precede `field`.
    fn resolve_length_source(
        fields: &[FieldSpec],
        index: &HashMap<String, usize>,
        field: &FieldSpec,
        length_from: &str,
    ) -> Result<usize> {
        let Some(&source) = index.get(length_from) else {
            if fields.iter().any(|f| f.name == length_from) {
                bail!(AccessError::invalid_layout(format!(
                    "field '{}' takes its length from '{}', which does not precede it",
                    field.name, length_from
                )));
            }
            bail!(AccessError::invalid_layout(format!(
                "field '{}' takes its length from unknown field '{}'",
                field.name, length_from
            )));
        };

        match fields[source].kind {
            FieldKind::Scalar(ty) if ty.is_unsigned() => Ok(source),
            _ => bail!(AccessError::invalid_layout(format!(
                "length source '{}' of field '{}' is not an unsigned integer",
                length_from, field.name
            ))),
        }
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn with_alignment(mut self, policy: AlignmentPolicy) -> Self {
        self.alignment = policy;
        self
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn alignment_policy(&self) -> AlignmentPolicy {
        self.alignment
    }

    pub fn minimum_size(&self) -> usize {
        self.minimum_size
    }

    /// Record size for layouts without variable fields.
    pub fn fixed_size(&self) -> Option<usize> {
        self.fixed_size
    }

    pub fn is_jagged(&self) -> bool {
        self.fixed_size.is_none()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, idx: usize) -> Option<&FieldSpec> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn length_source(&self, idx: usize) -> Option<usize> {
        self.length_sources[idx]
    }

    /// Offset of `name` within every record, if all fields before it are fixed.
    pub fn field_offset(&self, name: &str) -> Option<usize> {
        self.index_of(name).and_then(|idx| self.static_offsets[idx])
    }

    /// Decodes the `index`-th record of a uniform sequence of fixed-size records.
    pub fn record_at<'a>(
        &'a self,
        region: ByteRegion<'a>,
        index: usize,
    ) -> Result<DecodedRecord<'a>> {
        RecordCursor::new(region, self).record_at(index)
    }

    /// Alignment a read of field `idx` must satisfy under the current policy.
    pub(crate) fn required_alignment(&self, idx: usize) -> usize {
        match self.alignment {
            AlignmentPolicy::Enforce => self.fields[idx].alignment(),
            AlignmentPolicy::Relaxed => 1,
        }
    }
}

impl fmt::Display for LayoutDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str("}")
    }
}
