//! # Window Configuration
//!
//! `WindowConfig` describes one traversal: how wide each window is, how far
//! the start advances between windows, where traversal begins, and whether a
//! window retains its decoded records or only its byte span.
//!
//! Width and step are independent [`Extent`]s. Each is either a record count
//! or a byte count, so all four combinations are valid:
//!
//! | Width              | Step               | Result                          |
//! |--------------------|--------------------|---------------------------------|
//! | `Bytes(64)`        | `Bytes(64)`        | tiling, no overlap or gap       |
//! | `Bytes(64)`        | `Bytes(16)`        | windows overlap by 48 bytes     |
//! | `Records(4)`       | `Records(6)`       | two records skipped per window  |
//! | `Bytes(64)`        | `Records(1)`       | one window per record start     |
//!
//! ## Usage
//!
//! ```ignore
//! let config = WindowConfig::records(4)
//!     .step_records(2)
//!     .start(header_len);
//! let windows = SteppingWindow::new(region, &layout, config)?;
//! ```

use std::fmt;

use eyre::{bail, Result};

use crate::error::AccessError;

/// A width or step, counted in whole records or raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Records(usize),
    Bytes(usize),
}

impl Extent {
    pub fn amount(&self) -> usize {
        match *self {
            Extent::Records(n) | Extent::Bytes(n) => n,
        }
    }

    pub fn is_records(&self) -> bool {
        matches!(self, Extent::Records(_))
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Extent::Bytes(_))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Records(n) => write!(f, "{} records", n),
            Extent::Bytes(n) => write!(f, "{} bytes", n),
        }
    }
}

/// What a yielded window carries besides its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowContents {
    /// Decoded records fully contained in the window.
    #[default]
    Records,
    /// Only the byte span. Byte-width windows skip decoding entirely.
    RawSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    width: Extent,
    step: Extent,
    start: usize,
    contents: WindowContents,
}

impl WindowConfig {
    /// Windows of `n` records, stepping by `n` records unless overridden.
    pub fn records(n: usize) -> Self {
        Self::with_width(Extent::Records(n))
    }

    /// Windows of `n` bytes, stepping by `n` bytes unless overridden.
    pub fn bytes(n: usize) -> Self {
        Self::with_width(Extent::Bytes(n))
    }

    fn with_width(width: Extent) -> Self {
        Self {
            width,
            step: width,
            start: 0,
            contents: WindowContents::default(),
        }
    }

    pub fn step_records(mut self, n: usize) -> Self {
        self.step = Extent::Records(n);
        self
    }

    pub fn step_bytes(mut self, n: usize) -> Self {
        self.step = Extent::Bytes(n);
        self
    }

    pub fn start(mut self, offset: usize) -> Self {
        self.start = offset;
        self
    }

    pub fn contents(mut self, contents: WindowContents) -> Self {
        self.contents = contents;
        self
    }

    pub fn width(&self) -> Extent {
        self.width
    }

    pub fn step(&self) -> Extent {
        self.step
    }

    pub fn start_offset(&self) -> usize {
        self.start
    }

    pub fn content_mode(&self) -> WindowContents {
        self.contents
    }

    pub fn validate(&self) -> Result<()> {
        if self.step.amount() == 0 {
            bail!(AccessError::configuration(format!(
                "window step must be positive, got {}",
                self.step
            )));
        }
        if self.width.amount() == 0 {
            bail!(AccessError::configuration(format!(
                "window width must be positive, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

impl fmt::Display for WindowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width {}, step {}, from offset {}",
            self.width, self.step, self.start
        )
    }
}
