use std::{io::Read, ptr};

use chunkalloc::{HEADER_SIZE, Heap};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect the mappings with `pmap` or `gdb` between
/// steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn print_heap(
  label: &str,
  heap: &Heap,
) {
  println!("[{}] PID = {}\n{}", label, std::process::id(), heap);
}

fn main() {
  env_logger::init();

  let mut heap = Heap::new();

  println!("Chunk header size: {} bytes", HEADER_SIZE);
  print_heap("start", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 1) First request. The heap is empty, so the first arena block is
  //    mapped: one header plus 64 payload bytes, an exact fit.
  // --------------------------------------------------------------------
  let first = match heap.allocate(64) {
    Ok(p) => p.as_ptr(),
    Err(err) => {
      eprintln!("allocation failed: {}", err);
      return;
    }
  };

  unsafe { ptr::write_bytes(first, 0xAB, 64) };
  println!("\n[1] allocate(64) = {:?}", first);
  print_heap("1", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) 1000 bytes do not fit anywhere, so a second block is mapped and
  //    split: 1000 bytes used, the rest left free behind a new header.
  // --------------------------------------------------------------------
  let second = heap.allocate(1000).map(|p| p.as_ptr()).unwrap_or(ptr::null_mut());
  println!("\n[2] allocate(1000) = {:?}", second);
  print_heap("2", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) 16 bytes come out of the free remainder of block #2. No growth.
  // --------------------------------------------------------------------
  let third = heap.allocate(16).map(|p| p.as_ptr()).unwrap_or(ptr::null_mut());
  println!("\n[3] allocate(16) = {:?}", third);
  print_heap("3", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Release the first chunk and ask for 64 bytes again: the released
  //    chunk is an exact fit and is handed back.
  // --------------------------------------------------------------------
  unsafe { heap.release(first) };
  let fourth = heap.allocate(64).map(|p| p.as_ptr()).unwrap_or(ptr::null_mut());
  println!(
    "\n[4] release + allocate(64) = {:?}, reused first chunk? {}",
    fourth,
    fourth == first
  );
  print_heap("4", &heap);
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 5) Release two neighbours. They are not merged, so a request larger
  //    than either one maps a new block instead.
  // --------------------------------------------------------------------
  unsafe {
    heap.release(second);
    heap.release(third);
  }
  let fifth = heap.allocate(5000).map(|p| p.as_ptr()).unwrap_or(ptr::null_mut());
  println!("\n[5] allocate(5000) = {:?}", fifth);
  print_heap("5", &heap);

  println!("\nEnd of walkthrough. Arena blocks are released when the process exits.");
}
