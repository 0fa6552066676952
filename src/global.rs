//! Process-wide heap behind C-style entry points.
//!
//! The first call to [`allocate`] maps the first arena block; the heap then
//! lives until the process exits. One mutex guards the whole chain, since a
//! first-fit scan mutates chunks as it goes.

use std::{
  ptr::{self, NonNull},
  sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
  arena::MmapSource,
  error::AllocResult,
  heap::{Heap, HeapStats},
};

static HEAP: Mutex<Heap<MmapSource>> = Mutex::new(Heap::new());

fn heap() -> MutexGuard<'static, Heap<MmapSource>> {
  HEAP.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Allocates `size` bytes from the process heap.
///
/// Returns null when the request cannot be served: zero size, or the OS
/// refused to map more memory. Use [`try_allocate`] to see which.
pub fn allocate(size: usize) -> *mut u8 {
  match try_allocate(size) {
    Ok(payload) => payload.as_ptr(),
    Err(_) => ptr::null_mut(),
  }
}

pub fn try_allocate(size: usize) -> AllocResult<NonNull<u8>> {
  heap().allocate(size)
}

/// Marks memory from [`allocate`] as reusable. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or a pointer returned by [`allocate`] or
/// [`try_allocate`].
pub unsafe fn release(ptr: *mut u8) {
  unsafe { heap().release(ptr) }
}

pub fn stats() -> HeapStats {
  heap().stats()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::AllocError;

  // Every test touching the shared heap lives here so releases and reuses
  // are not interleaved with other tests.
  #[test_log::test]
  fn test_process_heap() {
    assert!(allocate(0).is_null());
    assert_eq!(try_allocate(0), Err(AllocError::ZeroSize));

    let p = allocate(4000);
    assert!(!p.is_null());
    assert!(stats().arena_blocks >= 1);

    unsafe {
      ptr::write_bytes(p, 0x5A, 4000);
      assert_eq!(*p.add(3999), 0x5A);

      release(p);
    }

    assert_eq!(allocate(4000), p);

    unsafe { release(ptr::null_mut()) };

    let q = try_allocate(64).unwrap().as_ptr();
    assert_ne!(q, p);
  }
}
