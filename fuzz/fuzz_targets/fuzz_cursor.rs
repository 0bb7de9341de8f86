//! Fuzz testing for the record cursor.
//!
//! Builds a layout from arbitrary field descriptions and decodes arbitrary
//! bytes with it, checking that decoding never panics and that every decoded
//! record stays inside the region.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use jagmem::{
    AlignmentPolicy, ByteRegion, Endian, FieldSpec, LayoutDescriptor, RecordCursor, ScalarType,
};

#[derive(Debug, Arbitrary)]
struct CursorInput {
    fields: Vec<FuzzField>,
    big_endian: bool,
    relaxed: bool,
    start: u16,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzScalar {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzField {
    Scalar(FuzzScalar),
    Bytes(u8),
    /// Length taken from the field `back` positions earlier.
    Var { back: u8, terminated: bool },
    CStr,
}

impl From<FuzzScalar> for ScalarType {
    fn from(fs: FuzzScalar) -> Self {
        match fs {
            FuzzScalar::U8 => ScalarType::U8,
            FuzzScalar::U16 => ScalarType::U16,
            FuzzScalar::U32 => ScalarType::U32,
            FuzzScalar::U64 => ScalarType::U64,
            FuzzScalar::I8 => ScalarType::I8,
            FuzzScalar::I16 => ScalarType::I16,
            FuzzScalar::I32 => ScalarType::I32,
            FuzzScalar::I64 => ScalarType::I64,
            FuzzScalar::F32 => ScalarType::F32,
            FuzzScalar::F64 => ScalarType::F64,
        }
    }
}

fn build_layout(input: &CursorInput) -> Option<LayoutDescriptor> {
    let specs: Vec<FieldSpec> = input
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let name = format!("f{}", idx);
            match *field {
                FuzzField::Scalar(ty) => FieldSpec::scalar(name, ty.into()),
                FuzzField::Bytes(width) => FieldSpec::bytes(name, width as usize),
                FuzzField::Var { back, terminated } => {
                    let source = idx.saturating_sub(back as usize + 1);
                    let spec = FieldSpec::var(name, format!("f{}", source));
                    if terminated {
                        spec.terminated()
                    } else {
                        spec
                    }
                }
                FuzzField::CStr => FieldSpec::cstr(name),
            }
        })
        .collect();

    let layout = LayoutDescriptor::build(specs).ok()?;
    let endian = if input.big_endian { Endian::Big } else { Endian::Little };
    let policy = if input.relaxed {
        AlignmentPolicy::Relaxed
    } else {
        AlignmentPolicy::Enforce
    };
    Some(layout.with_endian(endian).with_alignment(policy))
}

fuzz_target!(|input: CursorInput| {
    if input.fields.is_empty() || input.fields.len() > 16 {
        return;
    }
    let Some(layout) = build_layout(&input) else {
        return;
    };

    let region = ByteRegion::new(&input.data);
    let mut cursor = RecordCursor::new(region, &layout);
    cursor.seek(input.start as usize);

    while let Ok(Some(record)) = cursor.decode_next() {
        assert!(record.consumed() >= layout.minimum_size());
        assert!(record.end() <= region.len());
        for value in record.values() {
            if let Some(bytes) = value.as_region() {
                assert!(bytes.base_offset() + bytes.len() <= region.len());
            }
        }
    }
});
