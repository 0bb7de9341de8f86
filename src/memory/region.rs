//! # ByteRegion - Bounds-Checked Foreign Memory View
//!
//! A `ByteRegion` is a `Copy` view over a span of a larger backing buffer. It
//! keeps the whole backing slice alongside its own `start` and `len`, so that
//! sub-regions remain views of the same allocation and alignment can be judged
//! relative to the allocation start rather than to the view.
//!
//! ## Usage
//!
//! ```ignore
//! let region = ByteRegion::new(&bytes);
//! let header = region.slice(0, 6)?;              // zero-copy sub-view
//! let id = header.read_fixed(0, ScalarType::I32, Endian::Little, 4)?;
//! ```
//!
//! ## Bounds
//!
//! Every accessor re-checks its range against `len`. Construction of a
//! sub-region is checked against the parent, so a region can never describe
//! bytes outside its backing buffer.

use std::fmt;

use eyre::{bail, Result};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::error::AccessError;
use crate::types::{Endian, Scalar, ScalarType};

#[derive(Clone, Copy)]
pub struct ByteRegion<'a> {
    root: &'a [u8],
    start: usize,
    len: usize,
}

impl<'a> ByteRegion<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            root: bytes,
            start: 0,
            len: bytes.len(),
        }
    }

    pub fn empty() -> ByteRegion<'static> {
        ByteRegion::new(&[])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of this view from the start of the backing allocation.
    pub fn base_offset(&self) -> usize {
        self.start
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        &self.root[self.start..self.start + self.len]
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }

    /// Returns the absolute offset of `offset` after checking `offset + len`.
    fn check(&self, offset: usize, len: usize) -> Result<usize> {
        match offset.checked_add(len) {
            Some(end) if end <= self.len => Ok(self.start + offset),
            _ => bail!(AccessError::out_of_bounds(offset, len, self.len)),
        }
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<ByteRegion<'a>> {
        let start = self.check(offset, len)?;
        Ok(ByteRegion {
            root: self.root,
            start,
            len,
        })
    }

    /// Everything from `offset` to the end of the region.
    pub fn tail(&self, offset: usize) -> Result<ByteRegion<'a>> {
        if offset > self.len {
            bail!(AccessError::out_of_bounds(offset, 0, self.len));
        }
        self.slice(offset, self.len - offset)
    }

    pub fn byte(&self, offset: usize) -> Result<u8> {
        let abs = self.check(offset, 1)?;
        Ok(self.root[abs])
    }

    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let abs = self.check(offset, len)?;
        Ok(&self.root[abs..abs + len])
    }

    /// Reads one scalar. `align` is the required alignment relative to the
    /// backing allocation; pass 1 to read at byte granularity.
    pub fn read_fixed(
        &self,
        offset: usize,
        ty: ScalarType,
        endian: Endian,
        align: usize,
    ) -> Result<Scalar> {
        let width = ty.width();
        let abs = self.check(offset, width)?;
        if align > 1 && abs % align != 0 {
            bail!(AccessError::Alignment { offset: abs, align });
        }
        Ok(ty.decode(&self.root[abs..abs + width], endian))
    }

    /// Relative offset of the first `needle` at or after `offset`.
    pub fn position_of(&self, offset: usize, needle: u8) -> Option<usize> {
        if offset >= self.len {
            return None;
        }
        self.as_bytes()[offset..]
            .iter()
            .position(|&b| b == needle)
            .map(|pos| offset + pos)
    }

    /// Reinterprets `size_of::<T>()` bytes at `offset` as a `T` in place.
    ///
    /// Types with an alignment above 1 must sit at a suitably aligned address;
    /// `zerocopy`'s `Unaligned` wrappers (e.g. `little_endian::U32`) never do.
    pub fn overlay<T>(&self, offset: usize) -> Result<&'a T>
    where
        T: FromBytes + KnownLayout + Immutable,
    {
        let size = std::mem::size_of::<T>();
        let abs = self.check(offset, size)?;
        let bytes: &'a [u8] = &self.root[abs..abs + size];
        match T::ref_from_bytes(bytes) {
            Ok(value) => Ok(value),
            Err(zerocopy::ConvertError::Alignment(_)) => bail!(AccessError::Alignment {
                offset: abs,
                align: std::mem::align_of::<T>(),
            }),
            Err(_) => bail!(AccessError::out_of_bounds(offset, size, self.len)),
        }
    }
}

impl fmt::Debug for ByteRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteRegion")
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

impl<'a> From<&'a [u8]> for ByteRegion<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteRegion::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_kind, ErrorKind};
    use zerocopy::little_endian::{U16, U32};
    use zerocopy::Unaligned;

    #[test]
    fn slice_is_a_view_not_a_copy() {
        let data = [1u8, 2, 3, 4, 5];
        let region = ByteRegion::new(&data);
        let sub = region.slice(1, 3).unwrap();

        assert_eq!(sub.as_bytes(), &[2, 3, 4]);
        assert_eq!(sub.base_offset(), 1);
        assert!(std::ptr::eq(sub.as_ptr(), data[1..].as_ptr()));
    }

    #[test]
    fn slice_past_end_is_out_of_bounds() {
        let data = [0u8; 4];
        let region = ByteRegion::new(&data);

        assert!(region.slice(0, 4).is_ok());
        assert!(region.slice(4, 0).is_ok());
        let err = region.slice(2, 3).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::OutOfBounds));
        let err = region.slice(usize::MAX, 2).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::OutOfBounds));
    }

    #[test]
    fn nested_slices_are_checked_against_parent() {
        let data = [0u8; 10];
        let region = ByteRegion::new(&data);
        let sub = region.slice(2, 4).unwrap();

        assert!(sub.slice(0, 4).is_ok());
        assert!(sub.slice(1, 4).is_err());
        assert_eq!(sub.slice(1, 2).unwrap().base_offset(), 3);
    }

    #[test]
    fn read_fixed_checks_bounds_on_every_access() {
        let data = [0x2A, 0x00, 0x00];
        let region = ByteRegion::new(&data);

        assert_eq!(
            region.read_fixed(0, ScalarType::U16, Endian::Little, 1).unwrap(),
            Scalar::Unsigned(42)
        );
        let err = region
            .read_fixed(2, ScalarType::U16, Endian::Little, 1)
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::OutOfBounds));
    }

    #[test]
    fn read_fixed_enforces_alignment_relative_to_allocation() {
        let data = [0u8; 16];
        let region = ByteRegion::new(&data);
        let sub = region.slice(2, 8).unwrap();

        // offset 2 in sub is absolute offset 4
        assert!(sub.read_fixed(2, ScalarType::U32, Endian::Little, 4).is_ok());
        let err = sub
            .read_fixed(0, ScalarType::U32, Endian::Little, 4)
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Alignment));
        assert!(sub.read_fixed(0, ScalarType::U32, Endian::Little, 1).is_ok());
    }

    #[test]
    fn position_of_stays_inside_region() {
        let data = *b"ab\0cd\0";
        let region = ByteRegion::new(&data).slice(3, 2).unwrap();

        assert_eq!(region.position_of(0, 0), None);
        let whole = ByteRegion::new(&data);
        assert_eq!(whole.position_of(0, 0), Some(2));
        assert_eq!(whole.position_of(3, 0), Some(5));
        assert_eq!(whole.position_of(6, 0), None);
    }

    #[test]
    fn tail_covers_remaining_bytes() {
        let data = [1u8, 2, 3];
        let region = ByteRegion::new(&data);

        assert_eq!(region.tail(1).unwrap().as_bytes(), &[2, 3]);
        assert!(region.tail(3).unwrap().is_empty());
        assert!(region.tail(4).is_err());
    }

    #[repr(C)]
    #[derive(FromBytes, KnownLayout, Immutable, Unaligned)]
    struct Header {
        id: U32,
        name_len: U16,
    }

    #[test]
    fn overlay_reads_struct_in_place() {
        let mut data = Vec::new();
        data.extend(7u32.to_le_bytes());
        data.extend(4u16.to_le_bytes());
        data.extend(b"Java");
        let region = ByteRegion::new(&data);

        let header: &Header = region.overlay(0).unwrap();
        assert_eq!(header.id.get(), 7);
        assert_eq!(header.name_len.get(), 4);
        assert!(region.overlay::<Header>(6).is_err());
    }
}
