//! # Foreign Memory Access
//!
//! This module provides the bounds-checked byte view that every decoder in the
//! crate reads through, plus two collaborators that produce such views from
//! memory the host did not lay out itself.
//!
//! ## Ownership Model
//!
//! ```text
//! +--------------------+        +--------------------+
//! | ForeignArena       |        | MappedFile         |
//! | (owns blocks)      |        | (owns the mapping) |
//! +---------+----------+        +---------+----------+
//!           | as_bytes(handle)            | region()
//!           v                             v
//! +-----------------------------------------------------+
//! | ByteRegion<'a>  (root slice + start + len, Copy)    |
//! +-----------------------------------------------------+
//!           | slice()/read_fixed()/overlay()
//!           v
//!   RecordCursor / SteppingWindow / DecodedRecord<'a>
//! ```
//!
//! Regions borrow from their owner, so the borrow checker guarantees that no
//! region, decoded record or window outlives the memory it points into, and
//! that an arena block cannot be released or written while a view of it exists.
//!
//! ## Module Structure
//!
//! - `region`: `ByteRegion`, the immutable bounds-checked view
//! - `arena`: `ForeignArena`, generational arena-and-index allocator
//! - `mapped`: `MappedFile`, read-only memory-mapped files

mod arena;
mod mapped;
mod region;

pub use arena::{ForeignArena, Handle};
pub use mapped::MappedFile;
pub use region::ByteRegion;
