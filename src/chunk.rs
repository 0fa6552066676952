use std::{mem, ptr};

/// Bytes taken by the header in front of every payload.
pub const HEADER_SIZE: usize = mem::size_of::<Chunk>();

/// Inline header written at the start of every chunk.
///
/// `next` and `prev` never own anything: the memory belongs to the arena
/// block the chunk lives in. The chain is open, so the head has a null `prev`
/// and the tail a null `next`.
#[repr(C)]
pub struct Chunk {
  pub size: usize,
  pub is_free: bool,
  pub next: *mut Chunk,
  pub prev: *mut Chunk,
}

impl Chunk {
  pub fn new(
    size: usize,
    is_free: bool,
    next: *mut Chunk,
    prev: *mut Chunk,
  ) -> Self {
    Self {
      size,
      is_free,
      next,
      prev,
    }
  }

  /// Writes a header at `at` and returns it as a chunk pointer.
  ///
  /// # Safety
  ///
  /// `at` must be word aligned and backed by at least `HEADER_SIZE + size`
  /// writable bytes.
  pub unsafe fn write(
    at: *mut u8,
    chunk: Chunk,
  ) -> *mut Chunk {
    let chunk_ptr = at as *mut Chunk;
    unsafe { ptr::write(chunk_ptr, chunk) };
    chunk_ptr
  }

  /// Address handed to callers for `chunk`.
  ///
  /// # Safety
  ///
  /// `chunk` must point to a live header.
  pub unsafe fn payload(chunk: *mut Chunk) -> *mut u8 {
    unsafe { (chunk as *mut u8).add(HEADER_SIZE) }
  }

  /// Header owning a payload previously produced by [`Chunk::payload`].
  ///
  /// # Safety
  ///
  /// `payload` must come from [`Chunk::payload`].
  pub unsafe fn from_payload(payload: *mut u8) -> *mut Chunk {
    unsafe { payload.sub(HEADER_SIZE) as *mut Chunk }
  }

  /// Address right past the end of the chunk's payload.
  ///
  /// # Safety
  ///
  /// `chunk` must point to a live header.
  pub unsafe fn end(chunk: *mut Chunk) -> *mut u8 {
    unsafe { Chunk::payload(chunk).add((*chunk).size) }
  }
}
