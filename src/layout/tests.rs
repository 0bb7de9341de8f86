//! Tests for the layout module

use super::*;
use crate::error::{error_kind, ErrorKind};
use crate::memory::ByteRegion;
use crate::types::{Endian, ScalarType};

fn programming_language_layout() -> LayoutDescriptor {
    LayoutDescriptor::build(vec![
        FieldSpec::scalar("id", ScalarType::I32),
        FieldSpec::scalar("name_len", ScalarType::U16),
        FieldSpec::var("name", "name_len").terminated(),
    ])
    .unwrap()
}

fn assert_invalid(fields: Vec<FieldSpec>, needle: &str) {
    let err = LayoutDescriptor::build(fields).unwrap_err();
    assert_eq!(error_kind(&err), Some(ErrorKind::InvalidLayout));
    assert!(
        err.to_string().contains(needle),
        "'{}' does not mention '{}'",
        err,
        needle
    );
}

#[test]
fn minimum_size_counts_fixed_fields_and_terminators() {
    let layout = programming_language_layout();

    assert_eq!(layout.minimum_size(), 4 + 2 + 1);
    assert_eq!(layout.fixed_size(), None);
    assert!(layout.is_jagged());
}

#[test]
fn variable_field_contributes_zero_to_minimum() {
    let layout = LayoutDescriptor::build(vec![
        FieldSpec::scalar("len1", ScalarType::U8),
        FieldSpec::var("blob", "len1"),
    ])
    .unwrap();

    assert_eq!(layout.minimum_size(), 1);
}

#[test]
fn fixed_layout_reports_record_size() {
    let layout = LayoutDescriptor::build(vec![
        FieldSpec::bytes("name", 32),
        FieldSpec::scalar("field_count", ScalarType::I16),
        FieldSpec::scalar("method_count", ScalarType::I16),
    ])
    .unwrap();

    assert_eq!(layout.fixed_size(), Some(36));
    assert_eq!(layout.minimum_size(), 36);
    assert!(!layout.is_jagged());
}

#[test]
fn field_offsets_are_known_up_to_first_variable_field() {
    let layout = LayoutDescriptor::build(vec![
        FieldSpec::scalar("id", ScalarType::I32),
        FieldSpec::scalar("name_len", ScalarType::U16),
        FieldSpec::var("name", "name_len"),
        FieldSpec::scalar("score", ScalarType::F64),
    ])
    .unwrap();

    assert_eq!(layout.field_offset("id"), Some(0));
    assert_eq!(layout.field_offset("name_len"), Some(4));
    assert_eq!(layout.field_offset("name"), Some(6));
    assert_eq!(layout.field_offset("score"), None);
    assert_eq!(layout.field_offset("missing"), None);
}

#[test]
fn fields_enumerate_in_declaration_order() {
    let layout = programming_language_layout();
    let names: Vec<&str> = layout.fields().iter().map(|f| f.name.as_str()).collect();

    assert_eq!(names, vec!["id", "name_len", "name"]);
    assert_eq!(layout.index_of("name"), Some(2));
    assert_eq!(layout.length_source(2), Some(1));
    assert_eq!(layout.length_source(0), None);
    assert_eq!(layout.field(2).and_then(FieldSpec::length_from), Some("name_len"));
    assert_eq!(layout.field(0).and_then(FieldSpec::length_from), None);
    assert!(layout.field(3).is_none());
}

#[test]
fn display_describes_shape() {
    let layout = programming_language_layout();

    assert_eq!(
        layout.to_string(),
        "{id: i32, name_len: u16, name: var(name_len)+nul}"
    );
}

#[test]
fn rejects_unknown_length_source() {
    assert_invalid(
        vec![
            FieldSpec::scalar("len", ScalarType::U8),
            FieldSpec::var("blob", "length"),
        ],
        "unknown field 'length'",
    );
}

#[test]
fn rejects_forward_length_source() {
    assert_invalid(
        vec![
            FieldSpec::var("blob", "len"),
            FieldSpec::scalar("len", ScalarType::U8),
        ],
        "does not precede",
    );
}

#[test]
fn rejects_self_referencing_length_source() {
    assert_invalid(vec![FieldSpec::var("blob", "blob")], "does not precede");
}

#[test]
fn rejects_non_integer_length_source() {
    assert_invalid(
        vec![
            FieldSpec::scalar("len", ScalarType::F32),
            FieldSpec::var("blob", "len"),
        ],
        "not an unsigned integer",
    );
    assert_invalid(
        vec![
            FieldSpec::scalar("len", ScalarType::I16),
            FieldSpec::var("blob", "len"),
        ],
        "not an unsigned integer",
    );
}

#[test]
fn rejects_duplicate_names() {
    assert_invalid(
        vec![
            FieldSpec::scalar("id", ScalarType::U8),
            FieldSpec::scalar("id", ScalarType::U16),
        ],
        "duplicate field name 'id'",
    );
}

#[test]
fn rejects_empty_layout_and_zero_width_blob() {
    assert_invalid(vec![], "no fields");
    assert_invalid(vec![FieldSpec::bytes("pad", 0)], "zero width");
}

#[test]
fn rejects_bad_alignment() {
    assert_invalid(
        vec![FieldSpec::scalar("id", ScalarType::U32).aligned(3)],
        "power of two",
    );
    assert_invalid(
        vec![FieldSpec::scalar("id", ScalarType::U32).aligned(32)],
        "power of two",
    );
}

#[test]
fn alignment_defaults_to_natural_and_can_be_relaxed() {
    let layout = LayoutDescriptor::build(vec![
        FieldSpec::scalar("a", ScalarType::U64),
        FieldSpec::bytes("b", 3),
        FieldSpec::scalar("c", ScalarType::U16).aligned(8),
    ])
    .unwrap();

    assert_eq!(layout.required_alignment(0), 8);
    assert_eq!(layout.required_alignment(1), 1);
    assert_eq!(layout.required_alignment(2), 8);

    let relaxed = layout.with_alignment(AlignmentPolicy::Relaxed);
    assert_eq!(relaxed.required_alignment(0), 1);
    assert_eq!(relaxed.alignment_policy(), AlignmentPolicy::Relaxed);
}

#[test]
fn endian_defaults_to_little() {
    let layout = programming_language_layout();
    assert_eq!(layout.endian(), Endian::Little);
    assert_eq!(layout.with_endian(Endian::Big).endian(), Endian::Big);
}

#[test]
fn record_at_indexes_uniform_sequences() {
    let layout = LayoutDescriptor::build(vec![
        FieldSpec::scalar("x", ScalarType::U16),
        FieldSpec::scalar("y", ScalarType::U16),
    ])
    .unwrap();
    let data: Vec<u8> = [1u16, 2, 3, 4, 5, 6]
        .iter()
        .flat_map(|n| n.to_le_bytes())
        .collect();
    let region = ByteRegion::new(&data);

    let second = layout.record_at(region, 1).unwrap();
    assert_eq!(second.start(), 4);
    assert_eq!(second.u64("x").unwrap(), 3);
    assert_eq!(second.u64("y").unwrap(), 4);
    assert!(layout.record_at(region, 3).is_err());
}
