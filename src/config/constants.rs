//! # Configuration Constants
//!
//! Constants that depend on each other are co-located here and their
//! relationships are checked at compile time.
//!
//! ## Dependency Graph
//!
//! ```text
//! MAX_SCALAR_WIDTH (8)
//!       │
//!       └─> MAX_ALIGNMENT (16, must be >=)
//!             A field may be over-aligned, never under-aligned relative to
//!             the widest scalar.
//!             │
//!             └─> ARENA_BLOCK_ALIGN (16, must be >=)
//!                   Arena block bases are aligned to this, so an offset that
//!                   satisfies a field's alignment relative to the block start
//!                   is also aligned in the address space.
//!
//! MAX_FIELDS (256)
//!       │
//!       └─> INLINE_FIELDS (8, must be <=)
//!             Decoded records keep up to this many values inline before
//!             spilling to the heap.
//!
//! INLINE_WINDOW_RECORDS (8)
//!       Windows keep up to this many records (and record end offsets)
//!       inline before spilling to the heap.
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use crate::config::{MAX_FIELDS, INLINE_FIELDS};
//! ```

// ============================================================================
// Layout Limits
// ============================================================================

/// Maximum number of fields in one layout.
pub const MAX_FIELDS: usize = 256;

/// Width of the widest scalar type (`u64`, `i64`, `f64`).
pub const MAX_SCALAR_WIDTH: usize = 8;

/// Largest alignment a field may declare.
pub const MAX_ALIGNMENT: usize = 16;

// ============================================================================
// Arena
// ============================================================================

/// Base alignment of every block handed out by `ForeignArena`.
pub const ARENA_BLOCK_ALIGN: usize = 16;

/// Largest single allocation the arena accepts (1 GiB).
pub const ARENA_MAX_ALLOCATION: usize = 1 << 30;

// ============================================================================
// Inline Capacities
// ============================================================================

/// Inline capacity for the values of one decoded record.
pub const INLINE_FIELDS: usize = 8;

/// Inline capacity for the records of one window.
pub const INLINE_WINDOW_RECORDS: usize = 8;

const _: () = assert!(MAX_ALIGNMENT >= MAX_SCALAR_WIDTH);
const _: () = assert!(ARENA_BLOCK_ALIGN >= MAX_ALIGNMENT);
const _: () = assert!(ARENA_BLOCK_ALIGN.is_power_of_two());
const _: () = assert!(INLINE_FIELDS <= MAX_FIELDS);
