//! # SteppingWindow - Windowed Traversal over Jagged Records
//!
//! `SteppingWindow` is a pull-based state machine over one region. It is
//! either positioned at an offset or exhausted. Every call to `next()` fills
//! one window from the current offset, then moves the offset forward by the
//! configured step.
//!
//! ## Filling a Window
//!
//! ```text
//!            start                               start + width (bytes)
//!              |                                     |
//! region:  ... [rec 0 ][rec 1   ][r2][rec 3        ]|[...
//!              |<----------- span ------------>|    |
//!                                               rec 3 straddles the edge:
//!                                               not part of the window
//! ```
//!
//! - Record width: decode up to N records. The span ends where the last of
//!   them ends.
//! - Byte width: the span is `[start, start + W)` clipped to the region, and
//!   the window holds the records that lie entirely inside it.
//!
//! A decode that runs past the end of the region ends the window early. The
//! window is then marked truncated and is still yielded, so the tail of a
//! region comes back as a short window instead of an error. A record that
//! merely crosses a byte window's edge ends that window without marking it. Any other failure (alignment) is
//! yielded as `Err` and ends the traversal.
//!
//! ## Advancing
//!
//! A byte step adds to the start offset. A record step moves past exactly that
//! many records from the start of the current window, reusing the record ends
//! the window already found and decoding further only when the step is longer
//! than the window. Overlapping windows decode their shared records again;
//! nothing is cached between windows.
//!
//! Traversal is exhausted once the next start reaches the end of the region.

use std::iter::FusedIterator;

use eyre::{Report, Result};
use smallvec::SmallVec;

use crate::config::INLINE_WINDOW_RECORDS;
use crate::error::{error_kind, ErrorKind};
use crate::layout::LayoutDescriptor;
use crate::memory::ByteRegion;
use crate::records::{DecodedRecord, RecordCursor};
use crate::window::config::{Extent, WindowConfig, WindowContents};

type RecordEnds = SmallVec<[usize; INLINE_WINDOW_RECORDS]>;

/// One yielded window.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    start: usize,
    span: ByteRegion<'a>,
    records: SmallVec<[DecodedRecord<'a>; INLINE_WINDOW_RECORDS]>,
    record_count: usize,
    short: bool,
    truncated: bool,
}

impl<'a> Window<'a> {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.start + self.span.len()
    }

    /// Bytes covered by the window.
    pub fn span(&self) -> ByteRegion<'a> {
        self.span
    }

    /// Decoded records. Empty in `RawSpan` mode even when `len()` is not.
    pub fn records(&self) -> &[DecodedRecord<'a>] {
        &self.records
    }

    pub fn into_records(self) -> SmallVec<[DecodedRecord<'a>; INLINE_WINDOW_RECORDS]> {
        self.records
    }

    /// Number of whole records the window covers.
    ///
    /// Byte-width windows in `RawSpan` mode never decode and report 0.
    pub fn len(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Fewer records or bytes than the configured width.
    pub fn is_short(&self) -> bool {
        self.short
    }

    /// A record decode inside this window ran past the end of the region.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

#[derive(Debug)]
pub struct SteppingWindow<'a> {
    cursor: RecordCursor<'a>,
    config: WindowConfig,
    offset: usize,
    exhausted: bool,
    pending: Option<Report>,
}

impl<'a> SteppingWindow<'a> {
    pub fn new(
        region: ByteRegion<'a>,
        layout: &'a LayoutDescriptor,
        config: WindowConfig,
    ) -> Result<Self> {
        config.validate()?;
        let offset = config.start_offset();
        let exhausted = offset >= region.len();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            region_len = region.len(),
            config = %config,
            exhausted,
            "Created stepping window"
        );

        Ok(Self {
            cursor: RecordCursor::new(region, layout),
            config,
            offset,
            exhausted,
            pending: None,
        })
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Start offset of the next window.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pending.is_none()
    }

    fn region(&self) -> ByteRegion<'a> {
        self.cursor.region()
    }

    fn fill(&self, start: usize) -> Result<(Window<'a>, RecordEnds)> {
        let region = self.region();
        let keep = self.config.content_mode() == WindowContents::Records;
        let mut records = SmallVec::new();
        let mut ends = RecordEnds::new();
        let mut truncated = false;

        let (span, short) = match self.config.width() {
            Extent::Records(n) => {
                let mut pos = start;
                while ends.len() < n && pos < region.len() {
                    match self.cursor.decode_at(pos) {
                        Ok(record) => {
                            pos = record.end();
                            ends.push(pos);
                            if keep {
                                records.push(record);
                            }
                        }
                        Err(err) if is_out_of_bounds(&err) => {
                            truncated = true;
                            break;
                        }
                        Err(err) => return Err(err),
                    }
                }
                (region.slice(start, pos - start)?, ends.len() < n)
            }
            Extent::Bytes(w) => {
                let end = start.saturating_add(w).min(region.len());
                let span = region.slice(start, end - start)?;
                if keep || self.config.step().is_records() {
                    // Records must end inside the span to belong to it.
                    let bounded = RecordCursor::new(region.slice(0, end)?, self.cursor.layout());
                    let mut pos = start;
                    while pos < end {
                        match bounded.decode_at(pos) {
                            Ok(record) => {
                                pos = record.end();
                                ends.push(pos);
                                if keep {
                                    records.push(record);
                                }
                            }
                            Err(err) if is_out_of_bounds(&err) => {
                                // Crossing the window edge is not truncation;
                                // running off the region is.
                                match self.cursor.decode_at(pos) {
                                    Ok(_) => {}
                                    Err(err) if is_out_of_bounds(&err) => truncated = true,
                                    Err(err) => return Err(err),
                                }
                                break;
                            }
                            Err(err) => return Err(err),
                        }
                    }
                }
                (span, end - start < w)
            }
        };

        let window = Window {
            start,
            span,
            records,
            record_count: ends.len(),
            short,
            truncated,
        };
        Ok((window, ends))
    }

    /// Start of the window after the one at `start`.
    fn advance(&self, start: usize, ends: &RecordEnds) -> Result<usize> {
        let region = self.region();
        match self.config.step() {
            Extent::Bytes(s) => Ok(start.saturating_add(s)),
            Extent::Records(k) => {
                if let Some(&end) = ends.get(k - 1) {
                    return Ok(end);
                }
                let mut pos = ends.last().copied().unwrap_or(start);
                for _ in ends.len()..k {
                    if pos >= region.len() {
                        break;
                    }
                    match self.cursor.decode_at(pos) {
                        Ok(record) => pos = record.end(),
                        Err(err) if is_out_of_bounds(&err) => return Ok(region.len()),
                        Err(err) => return Err(err),
                    }
                }
                Ok(pos)
            }
        }
    }
}

fn is_out_of_bounds(err: &Report) -> bool {
    error_kind(err) == Some(ErrorKind::OutOfBounds)
}

impl<'a> Iterator for SteppingWindow<'a> {
    type Item = Result<Window<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            self.exhausted = true;
            return Some(Err(err));
        }
        if self.exhausted {
            return None;
        }

        let start = self.offset;
        let window = match self.fill(start) {
            Ok((window, ends)) => {
                match self.advance(start, &ends) {
                    Ok(next) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!(from = start, to = next, "Advanced window");

                        self.offset = next;
                        self.exhausted = next >= self.region().len();
                    }
                    Err(err) => {
                        self.exhausted = true;
                        self.pending = Some(err);
                    }
                }
                window
            }
            Err(err) => {
                self.exhausted = true;
                return Some(Err(err));
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            start = window.start(),
            records = window.len(),
            bytes = window.span().len(),
            short = window.is_short(),
            truncated = window.is_truncated(),
            "Yielded window"
        );

        Some(Ok(window))
    }
}

impl FusedIterator for SteppingWindow<'_> {}
