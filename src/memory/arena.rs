//! # ForeignArena - Arena-and-Index Block Allocator
//!
//! `ForeignArena` owns a set of zero-initialised byte blocks and hands out
//! small `Copy` handles instead of references. Views are obtained per access
//! through [`ForeignArena::as_bytes`], so the only long-lived thing a caller
//! holds is an index.
//!
//! ## Usage
//!
//! ```ignore
//! let mut arena = ForeignArena::new();
//! let handle = arena.allocate(64)?;
//! RecordWriter::new(&layout, arena.as_bytes_mut(handle)?).write(&values)?;
//! let region = arena.as_bytes(handle)?;
//! // ... traverse region ...
//! arena.release(handle)?;
//! ```
//!
//! ## Design
//!
//! Handles carry a generation counter. Releasing a block bumps the slot's
//! generation and puts the slot on a free list, so a stale handle is reported
//! as `ReleasedHandle` instead of silently aliasing a newer block.
//!
//! Blocks are stored as `Box<[Chunk]>` where `Chunk` is a 16-byte aligned
//! plain-old-data type, which gives every block base an address aligned to
//! `ARENA_BLOCK_ALIGN` without any unsafe code.

use std::fmt;

use eyre::{bail, ensure, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::config::{ARENA_BLOCK_ALIGN, ARENA_MAX_ALLOCATION};
use crate::error::AccessError;
use crate::memory::ByteRegion;

#[repr(C, align(16))]
#[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
struct Chunk([u8; ARENA_BLOCK_ALIGN]);

const _: () = assert!(std::mem::size_of::<Chunk>() == ARENA_BLOCK_ALIGN);
const _: () = assert!(std::mem::align_of::<Chunk>() == ARENA_BLOCK_ALIGN);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    pub fn index(&self) -> u32 {
        self.index
    }
}

struct Block {
    chunks: Box<[Chunk]>,
    len: usize,
}

struct Slot {
    generation: u32,
    block: Option<Block>,
}

#[derive(Default)]
pub struct ForeignArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live_bytes: usize,
}

impl ForeignArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, size: usize) -> Result<Handle> {
        if size == 0 {
            bail!(AccessError::configuration("allocation size must be at least 1 byte"));
        }
        if size > ARENA_MAX_ALLOCATION {
            bail!(AccessError::configuration(format!(
                "allocation of {} bytes exceeds the {} byte limit",
                size, ARENA_MAX_ALLOCATION
            )));
        }

        let chunk_count = size.div_ceil(ARENA_BLOCK_ALIGN);
        let block = Block {
            chunks: vec![Chunk([0u8; ARENA_BLOCK_ALIGN]); chunk_count].into_boxed_slice(),
            len: size,
        };

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.block = Some(block);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                ensure!(
                    self.slots.len() < u32::MAX as usize,
                    "arena slot table is full"
                );
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    block: Some(block),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        };

        self.live_bytes += size;

        #[cfg(feature = "tracing")]
        tracing::debug!(index = handle.index, size, "Allocated foreign block");

        Ok(handle)
    }

    fn block(&self, handle: Handle) -> Result<&Block> {
        match self.slots.get(handle.index as usize) {
            Some(Slot {
                generation,
                block: Some(block),
            }) if *generation == handle.generation => Ok(block),
            _ => bail!(AccessError::ReleasedHandle {
                index: handle.index
            }),
        }
    }

    fn block_mut(&mut self, handle: Handle) -> Result<&mut Block> {
        match self.slots.get_mut(handle.index as usize) {
            Some(Slot {
                generation,
                block: Some(block),
            }) if *generation == handle.generation => Ok(block),
            _ => bail!(AccessError::ReleasedHandle {
                index: handle.index
            }),
        }
    }

    /// A view spanning the whole allocation.
    pub fn as_bytes(&self, handle: Handle) -> Result<ByteRegion<'_>> {
        let block = self.block(handle)?;
        Ok(ByteRegion::new(&block.chunks.as_bytes()[..block.len]))
    }

    pub fn as_bytes_mut(&mut self, handle: Handle) -> Result<&mut [u8]> {
        let block = self.block_mut(handle)?;
        let len = block.len;
        Ok(&mut block.chunks.as_mut_bytes()[..len])
    }

    pub fn release(&mut self, handle: Handle) -> Result<()> {
        let size = self.block(handle)?.len;
        let slot = &mut self.slots[handle.index as usize];
        slot.block = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live_bytes -= size;

        #[cfg(feature = "tracing")]
        tracing::debug!(index = handle.index, size, "Released foreign block");

        Ok(())
    }

    pub fn live_blocks(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }
}

impl fmt::Debug for ForeignArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignArena")
            .field("live_blocks", &self.live_blocks())
            .field("live_bytes", &self.live_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_kind, ErrorKind};

    #[test]
    fn allocate_returns_zeroed_block_of_requested_size() {
        let mut arena = ForeignArena::new();
        let handle = arena.allocate(28).unwrap();

        let region = arena.as_bytes(handle).unwrap();
        assert_eq!(region.len(), 28);
        assert!(region.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(arena.live_bytes(), 28);
    }

    #[test]
    fn block_base_is_aligned() {
        let mut arena = ForeignArena::new();
        for size in [1, 7, 16, 33] {
            let handle = arena.allocate(size).unwrap();
            let ptr = arena.as_bytes(handle).unwrap().as_ptr() as usize;
            assert_eq!(ptr % ARENA_BLOCK_ALIGN, 0);
        }
    }

    #[test]
    fn writes_are_visible_through_views() {
        let mut arena = ForeignArena::new();
        let handle = arena.allocate(4).unwrap();

        arena.as_bytes_mut(handle).unwrap()[..2].copy_from_slice(&[0xCA, 0xFE]);

        assert_eq!(arena.as_bytes(handle).unwrap().as_bytes(), &[0xCA, 0xFE, 0, 0]);
    }

    #[test]
    fn released_handle_is_rejected() {
        let mut arena = ForeignArena::new();
        let handle = arena.allocate(8).unwrap();
        arena.release(handle).unwrap();

        let err = arena.as_bytes(handle).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::ReleasedHandle));
        assert!(arena.release(handle).is_err());
        assert_eq!(arena.live_blocks(), 0);
        assert_eq!(arena.live_bytes(), 0);
    }

    #[test]
    fn reused_slot_does_not_alias_stale_handle() {
        let mut arena = ForeignArena::new();
        let old = arena.allocate(8).unwrap();
        arena.release(old).unwrap();
        let new = arena.allocate(3).unwrap();

        assert_eq!(old.index(), new.index());
        assert!(arena.as_bytes(old).is_err());
        assert_eq!(arena.as_bytes(new).unwrap().len(), 3);
    }

    #[test]
    fn zero_sized_allocation_is_a_configuration_error() {
        let mut arena = ForeignArena::new();
        let err = arena.allocate(0).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Configuration));
    }
}
