//! # chunkalloc - A First-Fit Chunk Allocator over `mmap`
//!
//! This crate provides a small user-space heap that carves allocations out of
//! anonymous memory mappings, keeps inline metadata in front of every chunk,
//! and maps more memory when nothing in the heap fits.
//!
//! ## Overview
//!
//! ```text
//!   Heap layout (two arena blocks):
//!
//!        arena block #1 (mmap)                  arena block #2 (mmap)
//!   ┌─────┬─────────┬─────┬──────────┐      ┌─────┬─────────────────────┐
//!   │ hdr │ 64 used │ hdr │ 928 free │      │ hdr │      8192 free      │
//!   └─────┴─────────┴─────┴──────────┘      └─────┴─────────────────────┘
//!      ▲               ▲                       ▲
//!      │               │                       │
//!   head ◄──────────► chunk ◄───────────────► chunk ──► null
//!            next/prev          next/prev
//! ```
//!
//! The chain is open (not circular) and spans every arena block, in the order
//! the chunks were created.
//!
//! ## Crate Structure
//!
//! ```text
//!   chunkalloc
//!   ├── align      - Word rounding (align!) and power-of-two rounding
//!   ├── arena      - ArenaSource trait and the mmap-backed MmapSource
//!   ├── chunk      - Chunk header layout (internal)
//!   ├── error      - AllocError
//!   ├── heap       - Heap: first-fit search, split, growth, release
//!   └── global     - Process-wide heap with allocate / release
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chunkalloc::Heap;
//!
//! let mut heap = Heap::new();
//!
//! let ptr = heap.allocate(64).unwrap().as_ptr() as *mut u64;
//!
//! unsafe {
//!     *ptr = 42;
//!     assert_eq!(*ptr, 42);
//!
//!     heap.release(ptr as *mut u8);
//! }
//!
//! // Same size again: the released chunk is an exact fit.
//! assert_eq!(heap.allocate(64).unwrap().as_ptr(), ptr as *mut u8);
//! ```
//!
//! ## How It Works
//!
//! Each chunk starts with a header, and callers get the address right after
//! it:
//!
//! ```text
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Chunk Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ is_free: false  │  │  │                          │  │
//!   │  │ next: null/ptr  │  │  │     N bytes usable       │  │
//!   │  │ prev: null/ptr  │  │  │                          │  │
//!   │  └─────────────────┘  │  └──────────────────────────┘  │
//!   │      32 bytes         │                                │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! `allocate(size)` rounds `size` up to the machine word and walks the chain
//! from the head, taking the first free chunk that either matches exactly or
//! can be split while leaving room for a new header and at least one byte:
//!
//! ```text
//!   Before:  │ hdr │ 1000 free                                   │
//!   After:   │ hdr │ 16 used │ hdr │ 1000 - 16 - 32 free         │
//! ```
//!
//! When the walk runs off the tail, a new arena block is mapped with room for
//! one header plus the next power of two at or above the request, appended to
//! the chain, and the walk continues into it.
//!
//! ## Limitations
//!
//! - **No coalescing**: released neighbours stay separate chunks
//! - **No unmapping**: arena blocks live until the process exits
//! - **Word alignment only**: larger alignments are not honored
//! - **Single-threaded heaps**: `Heap` needs `&mut self`; the process-wide
//!   heap in [`global`] serializes callers behind one mutex
//! - **Unix-only**: requires `libc` and `mmap(2)`
//!
//! ## Safety
//!
//! Releasing a pointer that did not come from the same heap, or using memory
//! after releasing it, is undefined behavior. Release operations are `unsafe`.

pub mod align;
pub mod arena;
mod chunk;
pub mod error;
pub mod global;
mod heap;

pub use arena::{ArenaSource, MmapSource};
pub use chunk::HEADER_SIZE;
pub use error::{AllocError, AllocResult};
pub use heap::{ChunkInfo, Chunks, Heap, HeapStats};
