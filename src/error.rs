//! # Access Errors
//!
//! Every fallible operation in this crate returns `eyre::Result`. Failures that
//! callers need to branch on are raised as an [`AccessError`] inside the report,
//! so they can be recovered with [`error_kind`] or `Report::downcast_ref`.
//!
//! ```ignore
//! match region.slice(10, 4) {
//!     Err(e) if error_kind(&e) == Some(ErrorKind::OutOfBounds) => { /* tail */ }
//!     other => { other?; }
//! }
//! ```
//!
//! | Kind | Raised by |
//! |------|-----------|
//! | `OutOfBounds` | slicing, fixed reads, record decode, record writes |
//! | `InvalidLayout` | `LayoutDescriptor::build` only |
//! | `Alignment` | fixed reads under `AlignmentPolicy::Enforce` |
//! | `Configuration` | `WindowConfig::validate`, zero-sized allocations |
//! | `ReleasedHandle` | `ForeignArena` access through a stale handle |

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OutOfBounds,
    InvalidLayout,
    Alignment,
    Configuration,
    ReleasedHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// `offset + len` would exceed `bound`.
    OutOfBounds {
        offset: usize,
        len: usize,
        bound: usize,
    },
    InvalidLayout {
        reason: String,
    },
    /// `offset` is measured from the start of the backing allocation.
    Alignment {
        offset: usize,
        align: usize,
    },
    Configuration {
        reason: String,
    },
    ReleasedHandle {
        index: u32,
    },
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            AccessError::InvalidLayout { .. } => ErrorKind::InvalidLayout,
            AccessError::Alignment { .. } => ErrorKind::Alignment,
            AccessError::Configuration { .. } => ErrorKind::Configuration,
            AccessError::ReleasedHandle { .. } => ErrorKind::ReleasedHandle,
        }
    }

    pub(crate) fn out_of_bounds(offset: usize, len: usize, bound: usize) -> Self {
        AccessError::OutOfBounds { offset, len, bound }
    }

    pub(crate) fn invalid_layout(reason: impl Into<String>) -> Self {
        AccessError::InvalidLayout {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        AccessError::Configuration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::OutOfBounds { offset, len, bound } => write!(
                f,
                "out of bounds: {} bytes at offset {} exceed region length {}",
                len, offset, bound
            ),
            AccessError::InvalidLayout { reason } => write!(f, "invalid layout: {}", reason),
            AccessError::Alignment { offset, align } => write!(
                f,
                "misaligned access: offset {} is not a multiple of {}",
                offset, align
            ),
            AccessError::Configuration { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
            AccessError::ReleasedHandle { index } => {
                write!(f, "allocation handle {} has been released", index)
            }
        }
    }
}

impl std::error::Error for AccessError {}

/// Returns the kind of the [`AccessError`] carried by `report`, if any.
pub fn error_kind(report: &eyre::Report) -> Option<ErrorKind> {
    report.downcast_ref::<AccessError>().map(AccessError::kind)
}
