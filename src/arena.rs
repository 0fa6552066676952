use std::ptr::{self, NonNull};

use log::{debug, warn};

use crate::error::{AllocError, AllocResult};

/// Where the heap gets fresh arena blocks from.
///
/// Implementations hand out zero-filled, read-write regions that stay valid
/// for as long as the heap using them is alive. Blocks are never given back.
pub trait ArenaSource {
  /// Maps at least `len` bytes.
  ///
  /// # Safety
  ///
  /// The returned region must be writable for `len` bytes, aligned to at
  /// least the machine word, and not aliased by anything else.
  unsafe fn map(
    &mut self,
    len: usize,
  ) -> AllocResult<NonNull<u8>>;
}

/// Anonymous private mappings from `mmap(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MmapSource;

impl MmapSource {
  pub const fn new() -> Self {
    Self
  }
}

impl ArenaSource for MmapSource {
  unsafe fn map(
    &mut self,
    len: usize,
  ) -> AllocResult<NonNull<u8>> {
    let addr = unsafe {
      libc::mmap(
        ptr::null_mut(),
        len,
        libc::PROT_READ | libc::PROT_WRITE,
        libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if addr == libc::MAP_FAILED {
      warn!("mmap of {} bytes failed", len);
      return Err(AllocError::OutOfMemory { requested: len });
    }

    debug!("mapped arena block of {} bytes at {:?}", len, addr);

    NonNull::new(addr as *mut u8).ok_or(AllocError::OutOfMemory { requested: len })
  }
}
