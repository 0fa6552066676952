use std::{
  fmt,
  marker::PhantomData,
  ptr::{self, NonNull},
};

use log::{debug, trace, warn};

use crate::{
  align,
  align::round_up_pow2,
  arena::{ArenaSource, MmapSource},
  chunk::{Chunk, HEADER_SIZE},
  error::{AllocError, AllocResult},
};

/// First-fit chunk heap over arena blocks obtained from `S`.
///
/// The heap owns a doubly linked chain of chunks. The head is installed by
/// the first successful allocation and never changes afterwards: new arena
/// blocks are always appended at the tail, and splits insert right after the
/// chunk being split.
///
/// Released chunks are only marked free. Neighbours are never merged and no
/// memory goes back to the OS, so a freed chunk is reused only by a request
/// that fits in that chunk alone.
pub struct Heap<S: ArenaSource = MmapSource> {
  source: S,
  head: *mut Chunk,
  arena_blocks: usize,
  mapped_bytes: usize,
}

// Safety: every chunk lives in a block this heap mapped and nothing else
// points into the chain.
unsafe impl<S: ArenaSource + Send> Send for Heap<S> {}

impl Heap<MmapSource> {
  pub const fn new() -> Self {
    Self::with_source(MmapSource::new())
  }
}

impl Default for Heap<MmapSource> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S: ArenaSource> Heap<S> {
  pub const fn with_source(source: S) -> Self {
    Self {
      source,
      head: ptr::null_mut(),
      arena_blocks: 0,
      mapped_bytes: 0,
    }
  }

  /// Returns a pointer to at least `size` usable, word aligned bytes.
  ///
  /// The chain is scanned from the head. The first free chunk of exactly the
  /// requested size is taken whole; otherwise the first free chunk with room
  /// for the request plus a new header and one more byte is split. When the
  /// scan runs off the tail, one arena block is mapped, appended, and the
  /// scan continues into it.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> AllocResult<NonNull<u8>> {
    let size = normalize(size)?;

    if self.head.is_null() {
      self.head = self.grow(size)?;
    }

    let mut current = self.head;

    loop {
      unsafe {
        if let Some(payload) = claim(current, size) {
          trace!("allocated {} bytes at {:?}", size, payload);
          return Ok(payload);
        }

        if (*current).next.is_null() {
          let block = self.grow(size)?;
          (*block).prev = current;
          (*current).next = block;
        }

        current = (*current).next;
      }
    }
  }

  /// Marks the chunk owning `ptr` as free.
  ///
  /// Null is ignored and releasing an already free chunk only logs a warning.
  /// Adjacent free chunks are not merged.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a pointer returned by [`Heap::allocate`] on this
  /// same heap.
  pub unsafe fn release(
    &mut self,
    ptr: *mut u8,
  ) {
    if ptr.is_null() {
      return;
    }

    unsafe {
      let chunk = Chunk::from_payload(ptr);

      if (*chunk).is_free {
        warn!("release of already free chunk at {:?}", ptr);
        return;
      }

      (*chunk).is_free = true;
      trace!("released {} bytes at {:?}", (*chunk).size, ptr);
    }
  }

  /// Walks the chain from head to tail.
  pub fn chunks(&self) -> Chunks<'_> {
    Chunks {
      current: self.head,
      _heap: PhantomData,
    }
  }

  /// Number of arena blocks mapped so far.
  pub fn arena_blocks(&self) -> usize {
    self.arena_blocks
  }

  pub fn stats(&self) -> HeapStats {
    let mut stats = HeapStats {
      arena_blocks: self.arena_blocks,
      mapped_bytes: self.mapped_bytes,
      ..HeapStats::default()
    };

    for chunk in self.chunks() {
      stats.chunks += 1;

      if chunk.is_free {
        stats.free_chunks += 1;
        stats.free_bytes += chunk.size;
      } else {
        stats.used_bytes += chunk.size;
      }
    }

    stats
  }

  /// Maps a new arena block able to serve `size` and writes its sole free
  /// chunk. The chunk is returned unlinked.
  fn grow(
    &mut self,
    size: usize,
  ) -> AllocResult<*mut Chunk> {
    let payload = block_payload(size)?;
    let len = HEADER_SIZE + payload;

    let base = unsafe { self.source.map(len)? };

    self.arena_blocks += 1;
    self.mapped_bytes += len;

    debug!(
      "arena block #{} for a {} byte request: {} payload bytes at {:?}",
      self.arena_blocks, size, payload, base
    );

    let chunk = unsafe {
      Chunk::write(
        base.as_ptr(),
        Chunk::new(payload, true, ptr::null_mut(), ptr::null_mut()),
      )
    };

    Ok(chunk)
  }
}

/// Rejects empty requests and rounds the rest up to the machine word.
fn normalize(size: usize) -> AllocResult<usize> {
  if size == 0 {
    return Err(AllocError::ZeroSize);
  }

  if size > isize::MAX as usize {
    return Err(AllocError::OutOfMemory { requested: size });
  }

  Ok(align!(size))
}

/// Payload bytes of the arena block mapped for a `size` byte request.
///
/// The next power of two at or above `size`, with the header kept out of the
/// rounding. Doubled while it would be too big for an exact fit and too small
/// to split, so the fresh chunk always serves the request that caused it.
fn block_payload(size: usize) -> AllocResult<usize> {
  let out_of_memory = AllocError::OutOfMemory { requested: size };

  let mut payload = round_up_pow2(size).ok_or(out_of_memory)?;

  while payload != size && payload <= size + HEADER_SIZE {
    payload = payload.checked_mul(2).ok_or(out_of_memory)?;
  }

  Ok(payload)
}

/// Takes `chunk` for a `size` byte request if it fits, splitting off the
/// excess as a new free chunk.
unsafe fn claim(
  chunk: *mut Chunk,
  size: usize,
) -> Option<NonNull<u8>> {
  unsafe {
    if !(*chunk).is_free {
      return None;
    }

    if (*chunk).size == size {
      (*chunk).is_free = false;
      return NonNull::new(Chunk::payload(chunk));
    }

    if size + HEADER_SIZE < (*chunk).size {
      let next = (*chunk).next;
      let remainder = Chunk::write(
        Chunk::payload(chunk).add(size),
        Chunk::new((*chunk).size - size - HEADER_SIZE, true, next, chunk),
      );

      if !next.is_null() {
        (*next).prev = remainder;
      }

      (*chunk).next = remainder;
      (*chunk).size = size;
      (*chunk).is_free = false;

      trace!(
        "split chunk at {:?}, {} bytes left free",
        chunk,
        (*remainder).size
      );

      return NonNull::new(Chunk::payload(chunk));
    }

    None
  }
}

/// Snapshot of one chunk in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
  /// Address handed out for this chunk.
  pub payload: *const u8,
  pub size: usize,
  pub is_free: bool,
}

impl fmt::Display for ChunkInfo {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "{:?} [{} bytes, {}]",
      self.payload,
      self.size,
      if self.is_free { "free" } else { "used" }
    )
  }
}

/// Iterator over the chain, see [`Heap::chunks`].
pub struct Chunks<'a> {
  current: *mut Chunk,
  _heap: PhantomData<&'a ()>,
}

impl Iterator for Chunks<'_> {
  type Item = ChunkInfo;

  fn next(&mut self) -> Option<ChunkInfo> {
    if self.current.is_null() {
      return None;
    }

    unsafe {
      let chunk = self.current;
      self.current = (*chunk).next;

      Some(ChunkInfo {
        payload: Chunk::payload(chunk),
        size: (*chunk).size,
        is_free: (*chunk).is_free,
      })
    }
  }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
  pub arena_blocks: usize,
  /// Bytes obtained from the OS, headers included.
  pub mapped_bytes: usize,
  pub chunks: usize,
  pub free_chunks: usize,
  pub free_bytes: usize,
  pub used_bytes: usize,
}

impl<S: ArenaSource> fmt::Display for Heap<S> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    let stats = self.stats();

    writeln!(
      f,
      "{} arena block(s), {} bytes mapped, {} used / {} free",
      stats.arena_blocks, stats.mapped_bytes, stats.used_bytes, stats.free_bytes
    )?;

    for (i, chunk) in self.chunks().enumerate() {
      writeln!(f, "  #{:<3} {}", i, chunk)?;
    }

    Ok(())
  }
}
