//! # Jagged Record Decoding and Encoding
//!
//! This module turns a [`ByteRegion`](crate::memory::ByteRegion) plus a
//! [`LayoutDescriptor`](crate::layout::LayoutDescriptor) into typed records and
//! back. Records are laid out back to back with no header or offset table, so
//! the only way to find record N+1 is to decode record N and step past the
//! bytes it consumed.
//!
//! ## Record Binary Layout
//!
//! For the layout `{id: i32, name_len: u16, name: var(name_len)+nul}`:
//!
//! ```text
//! offset 0        4          6              6+n   7+n
//! +---------------+----------+---------------+-----+----------- ...
//! | id (i32)      | name_len | name (n bytes)| NUL | next record
//! +---------------+----------+---------------+-----+----------- ...
//! ```
//!
//! ## Design Goals
//!
//! 1. **Zero-copy reads**: blob fields decode to views into the source region
//! 2. **All-or-nothing**: a record that does not fit yields an error, never a
//!    partially filled record
//! 3. **Layout-driven**: types come from the layout, none are stored per record
//!
//! ## Module Structure
//!
//! - `value`: `Value`, one decoded field
//! - `cursor`: `RecordCursor` and `DecodedRecord`
//! - `writer`: `RecordWriter` and `Datum` for construction

pub mod cursor;
pub mod value;
pub mod writer;


pub use cursor::{decode_at, DecodedRecord, RecordCursor};
pub use value::Value;
pub use writer::{Datum, RecordWriter};
