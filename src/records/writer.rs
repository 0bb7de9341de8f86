//! # RecordWriter - Record Encoding
//!
//! `RecordWriter` lays records out back to back in a caller-supplied buffer,
//! typically an arena block, following the same layout the cursor decodes.
//! Length fields can be left as [`Datum::Derived`] and are filled in from the
//! payload of the variable field that depends on them.
//!
//! ## Usage
//!
//! ```ignore
//! let values = [Datum::Signed(2), Datum::Derived, Datum::from("Java")];
//! let size = RecordWriter::encoded_len(&layout, &values)?;
//! let mut writer = RecordWriter::new(&layout, arena.as_bytes_mut(handle)?);
//! let written = writer.write(&values)?;   // jagged: 4 + 2 + 4 + 1
//! ```
//!
//! ## Failure Semantics
//!
//! Every value is validated and encoded before the first byte is copied, so a
//! failed `write` leaves both the buffer and the writer position untouched.

use eyre::{bail, ensure, Result};
use smallvec::SmallVec;

use crate::config::{INLINE_FIELDS, MAX_SCALAR_WIDTH};
use crate::error::AccessError;
use crate::layout::{FieldKind, LayoutDescriptor};
use crate::types::{Endian, ScalarType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Datum<'v> {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bytes(&'v [u8]),
    /// Only valid for length fields; replaced by the dependent payload length.
    Derived,
}

impl<'v> From<&'v [u8]> for Datum<'v> {
    fn from(bytes: &'v [u8]) -> Self {
        Datum::Bytes(bytes)
    }
}

impl<'v> From<&'v str> for Datum<'v> {
    fn from(text: &'v str) -> Self {
        Datum::Bytes(text.as_bytes())
    }
}

impl From<u64> for Datum<'_> {
    fn from(n: u64) -> Self {
        Datum::Unsigned(n)
    }
}

impl From<i64> for Datum<'_> {
    fn from(n: i64) -> Self {
        Datum::Signed(n)
    }
}

impl From<f64> for Datum<'_> {
    fn from(x: f64) -> Self {
        Datum::Float(x)
    }
}

#[derive(Debug, Clone, Copy)]
enum Piece<'v> {
    Scalar([u8; MAX_SCALAR_WIDTH], usize),
    Padded(&'v [u8], usize),
    Payload(&'v [u8], bool),
}

impl Piece<'_> {
    fn len(&self) -> usize {
        match *self {
            Piece::Scalar(_, width) => width,
            Piece::Padded(_, width) => width,
            Piece::Payload(bytes, nul) => bytes.len() + usize::from(nul),
        }
    }
}

#[derive(Debug)]
pub struct RecordWriter<'a> {
    layout: &'a LayoutDescriptor,
    dest: &'a mut [u8],
    position: usize,
}

impl<'a> RecordWriter<'a> {
    pub fn new(layout: &'a LayoutDescriptor, dest: &'a mut [u8]) -> Self {
        Self {
            layout,
            dest,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.dest.len() - self.position
    }

    /// Bytes one record with `values` occupies, without writing anything.
    pub fn encoded_len(layout: &LayoutDescriptor, values: &[Datum<'_>]) -> Result<usize> {
        Ok(plan(layout, values)?.iter().map(Piece::len).sum())
    }

    /// Appends one record and returns the number of bytes written.
    pub fn write(&mut self, values: &[Datum<'_>]) -> Result<usize> {
        let pieces = plan(self.layout, values)?;
        let len: usize = pieces.iter().map(Piece::len).sum();

        match self.position.checked_add(len) {
            Some(end) if end <= self.dest.len() => {}
            _ => bail!(AccessError::out_of_bounds(self.position, len, self.dest.len())),
        }

        let mut pos = self.position;
        for (idx, piece) in pieces.iter().enumerate() {
            let align = self.layout.required_alignment(idx);
            if align > 1 && pos % align != 0 {
                bail!(AccessError::Alignment { offset: pos, align });
            }
            pos += piece.len();
        }

        let mut pos = self.position;
        for piece in &pieces {
            let dest = &mut self.dest[pos..pos + piece.len()];
            match *piece {
                Piece::Scalar(bytes, width) => dest.copy_from_slice(&bytes[..width]),
                Piece::Padded(bytes, _) => {
                    dest[..bytes.len()].copy_from_slice(bytes);
                    dest[bytes.len()..].fill(0);
                }
                Piece::Payload(bytes, nul) => {
                    dest[..bytes.len()].copy_from_slice(bytes);
                    if nul {
                        dest[bytes.len()] = 0;
                    }
                }
            }
            pos += piece.len();
        }

        self.position = pos;
        Ok(len)
    }
}

fn plan<'v>(
    layout: &LayoutDescriptor,
    values: &[Datum<'v>],
) -> Result<SmallVec<[Piece<'v>; INLINE_FIELDS]>> {
    ensure!(
        values.len() == layout.field_count(),
        "layout has {} fields but {} values were supplied",
        layout.field_count(),
        values.len()
    );

    let mut resolved: SmallVec<[Datum<'v>; INLINE_FIELDS]> = values.iter().copied().collect();

    for (idx, field) in layout.fields().iter().enumerate() {
        let Some(source) = layout.length_source(idx) else {
            continue;
        };
        let Datum::Bytes(payload) = values[idx] else {
            bail!("field '{}' expects bytes", field.name);
        };
        let len = payload.len() as u64;
        let source_name = &layout.fields()[source].name;
        match resolved[source] {
            Datum::Derived => resolved[source] = Datum::Unsigned(len),
            Datum::Unsigned(n) if n == len => {}
            Datum::Signed(n) if n >= 0 && n as u64 == len => {}
            other => bail!(
                "length field '{}' is {:?} but '{}' holds {} bytes",
                source_name,
                other,
                field.name,
                len
            ),
        }
    }

    let endian = layout.endian();
    let mut pieces = SmallVec::new();

    for (field, datum) in layout.fields().iter().zip(resolved) {
        let piece = match (&field.kind, datum) {
            (_, Datum::Derived) => {
                bail!("field '{}' is not the length of any variable field", field.name)
            }
            (FieldKind::Scalar(ty), datum) => {
                let (bytes, width) = encode_scalar(*ty, datum, endian, &field.name)?;
                Piece::Scalar(bytes, width)
            }
            (FieldKind::Bytes(width), Datum::Bytes(bytes)) => {
                ensure!(
                    bytes.len() <= *width,
                    "field '{}' holds at most {} bytes, got {}",
                    field.name,
                    width,
                    bytes.len()
                );
                Piece::Padded(bytes, *width)
            }
            (FieldKind::Var { terminated, .. }, Datum::Bytes(bytes)) => {
                Piece::Payload(bytes, *terminated)
            }
            (FieldKind::CStr, Datum::Bytes(bytes)) => {
                ensure!(
                    !bytes.contains(&0),
                    "field '{}' is NUL-terminated and cannot contain NUL bytes",
                    field.name
                );
                Piece::Payload(bytes, true)
            }
            (_, other) => bail!("field '{}' expects bytes, got {:?}", field.name, other),
        };
        pieces.push(piece);
    }

    Ok(pieces)
}

fn encode_scalar(
    ty: ScalarType,
    datum: Datum<'_>,
    endian: Endian,
    name: &str,
) -> Result<([u8; MAX_SCALAR_WIDTH], usize)> {
    let mut out = [0u8; MAX_SCALAR_WIDTH];

    macro_rules! put {
        ($v:expr) => {{
            let v = $v;
            let bytes = match endian {
                Endian::Little => v.to_le_bytes(),
                Endian::Big => v.to_be_bytes(),
            };
            out[..bytes.len()].copy_from_slice(&bytes);
        }};
    }

    macro_rules! int {
        ($t:ty) => {{
            let wide: i128 = match datum {
                Datum::Unsigned(n) => n.into(),
                Datum::Signed(n) => n.into(),
                other => bail!(
                    "field '{}' of type {} expects an integer, got {:?}",
                    name,
                    ty,
                    other
                ),
            };
            <$t>::try_from(wide).map_err(|_| {
                eyre::eyre!("value {} does not fit field '{}' of type {}", wide, name, ty)
            })?
        }};
    }

    macro_rules! float {
        () => {{
            let Datum::Float(x) = datum else {
                bail!("field '{}' of type {} expects a float, got {:?}", name, ty, datum);
            };
            x
        }};
    }

    match ty {
        ScalarType::U8 => put!(int!(u8)),
        ScalarType::U16 => put!(int!(u16)),
        ScalarType::U32 => put!(int!(u32)),
        ScalarType::U64 => put!(int!(u64)),
        ScalarType::I8 => put!(int!(i8)),
        ScalarType::I16 => put!(int!(i16)),
        ScalarType::I32 => put!(int!(i32)),
        ScalarType::I64 => put!(int!(i64)),
        ScalarType::F32 => put!(float!() as f32),
        ScalarType::F64 => put!(float!()),
    }

    Ok((out, ty.width()))
}
