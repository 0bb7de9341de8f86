//! # MappedFile - Read-Only Memory-Mapped Files
//!
//! Maps an existing file into the address space so that its contents can be
//! traversed as a [`ByteRegion`] without reading it into a buffer first. The
//! OS pages data in on demand.
//!
//! ## Safety Considerations
//!
//! A mapping reflects later writes to the file by other processes. Views
//! handed out by `region()` borrow the `MappedFile`, so they cannot outlive the
//! mapping, but their contents are only as stable as the file itself.
//!
//! Empty files cannot be mapped on every platform; they are represented by an
//! empty region instead.

use std::fs::File;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use memmap2::Mmap;

use crate::memory::ByteRegion;

#[derive(Debug)]
pub struct MappedFile {
    path: PathBuf,
    mmap: Option<Mmap>,
}

impl MappedFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .wrap_err_with(|| format!("failed to open '{}' for mapping", path.display()))?;

        let file_size = file
            .metadata()
            .wrap_err_with(|| format!("failed to get metadata for '{}'", path.display()))?
            .len();

        let mmap = if file_size == 0 {
            None
        } else {
            // SAFETY: Mmap::map is unsafe because the file may be modified or
            // truncated externally while mapped. This is acceptable because:
            // 1. The mapping is read-only; this crate never writes through it
            // 2. Every view borrows self, preventing use-after-unmap
            // 3. All reads go through ByteRegion, which bounds-checks against
            //    the length captured at mapping time
            let mmap = unsafe {
                Mmap::map(&file)
                    .wrap_err_with(|| format!("failed to memory-map '{}'", path.display()))?
            };
            Some(mmap)
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), size = file_size, "Mapped file");

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn region(&self) -> ByteRegion<'_> {
        match &self.mmap {
            Some(mmap) => ByteRegion::new(&mmap[..]),
            None => ByteRegion::new(&[]),
        }
    }

    pub fn len(&self) -> usize {
        self.mmap.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
