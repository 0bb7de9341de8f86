//! # Record Layouts
//!
//! A layout is the declarative, field-by-field description of one record shape.
//! It is validated once at construction and then shared read-only by any number
//! of cursors and windows.
//!
//! ## Field Kinds
//!
//! | Kind | Width | Notes |
//! |------|-------|-------|
//! | `Scalar(ty)` | `ty.width()` | integers and floats, byte order from the layout |
//! | `Bytes(n)` | `n` | fixed blob, e.g. a NUL-padded name |
//! | `Var { length_from, terminated }` | value of `length_from` (+1) | length-prefixed blob |
//! | `CStr` | up to and including the first NUL | NUL-terminated blob |
//!
//! A record is jagged when its layout contains `Var` or `CStr` fields: the
//! number of bytes it occupies depends on its own content.
//!
//! ## Example
//!
//! ```ignore
//! let layout = LayoutDescriptor::build(vec![
//!     FieldSpec::scalar("id", ScalarType::I32),
//!     FieldSpec::scalar("name_len", ScalarType::U16),
//!     FieldSpec::var("name", "name_len").terminated(),
//! ])?;
//! assert_eq!(layout.minimum_size(), 7);
//! ```
//!
//! ## Module Structure
//!
//! - `field`: `FieldSpec` and the closed `FieldKind` variant type
//! - `descriptor`: `LayoutDescriptor` with build-time validation

mod descriptor;
mod field;

#[cfg(test)]
mod tests;

pub use descriptor::{AlignmentPolicy, LayoutDescriptor};
pub use field::{FieldKind, FieldSpec};
