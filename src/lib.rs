//! # jagmem - Structured Access to Foreign Memory
//!
//! jagmem interprets raw byte buffers that some other party allocated (a
//! native library, another process, a mapped file) as sequences of typed,
//! variable-length records, and walks them with configurable windows. Nothing
//! is copied: every decoded blob is a view into the original bytes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jagmem::{ByteRegion, FieldSpec, LayoutDescriptor, ScalarType, SteppingWindow, WindowConfig};
//!
//! let layout = LayoutDescriptor::build(vec![
//!     FieldSpec::scalar("len", ScalarType::U8),
//!     FieldSpec::var("blob", "len"),
//! ])?;
//!
//! let bytes = [0x02, b'A', b'B', 0x01, b'C'];
//! let windows = SteppingWindow::new(ByteRegion::new(&bytes), &layout, WindowConfig::records(1))?;
//! for window in windows {
//!     for record in window?.records() {
//!         println!("{} bytes: {}", record.consumed(), record.str("blob")?);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   SteppingWindow (width / step)     │
//! ├─────────────────────────────────────┤
//! │   RecordCursor / RecordWriter       │
//! ├─────────────────────────────────────┤
//! │   LayoutDescriptor (FieldSpec)      │
//! ├─────────────────────────────────────┤
//! │   ByteRegion (bounds-checked view)  │
//! ├─────────────────────────────────────┤
//! │   ForeignArena / MappedFile / &[u8] │
//! └─────────────────────────────────────┘
//! ```
//!
//! Regions and layouts are immutable and may be shared freely between
//! threads. A `SteppingWindow` owns its own position, so concurrent scans of
//! one region use one window each.
//!
//! ## Module Overview
//!
//! - [`memory`]: `ByteRegion`, plus the `ForeignArena` and `MappedFile` sources
//! - [`layout`]: field specs and validated layout descriptors
//! - [`records`]: decoding, decoded values, and record encoding
//! - [`window`]: stepping windows over jagged records
//! - [`types`]: scalar types and byte order
//! - [`error`]: `AccessError` and `ErrorKind`
//! - [`config`]: crate-wide limits

pub mod config;
pub mod error;
pub mod layout;
pub mod memory;
pub mod records;
pub mod types;
pub mod window;

pub use error::{error_kind, AccessError, ErrorKind};
pub use layout::{AlignmentPolicy, FieldKind, FieldSpec, LayoutDescriptor};
pub use memory::{ByteRegion, ForeignArena, Handle, MappedFile};
pub use records::{decode_at, Datum, DecodedRecord, RecordCursor, RecordWriter, Value};
pub use types::{Endian, Scalar, ScalarType};
pub use window::{Extent, SteppingWindow, Window, WindowConfig, WindowContents};
