/// Rounds `value` up to the next multiple of the machine word.
///
/// Every chunk header and payload in the heap sits on a word boundary as long
/// as all payload sizes go through this macro first.
///
/// # Examples
///
/// ```rust
/// use chunkalloc::align;
///
/// match core::mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + ::core::mem::size_of::<usize>() - 1) & !(::core::mem::size_of::<usize>() - 1)
  };
}

/// Rounds `value` up to the next power of two, `None` on overflow.
///
/// Powers of two are returned unchanged. Zero maps to one.
pub fn round_up_pow2(value: usize) -> Option<usize> {
  value.checked_next_power_of_two()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::mem;

  #[test]
  fn test_align() {
    let ptr_size = mem::size_of::<usize>();

    for i in 0..10 {
      let expected = ptr_size * (i + 1);

      for size in (ptr_size * i + 1)..=(ptr_size * (i + 1)) {
        assert_eq!(expected, align!(size));
      }
    }
  }

  #[test]
  fn test_align_keeps_word_multiples() {
    let ptr_size = mem::size_of::<usize>();

    assert_eq!(align!(0usize), 0);
    assert_eq!(align!(ptr_size * 125), ptr_size * 125);
  }

  #[test]
  fn test_round_up_pow2() {
    assert_eq!(round_up_pow2(64), Some(64));
    assert_eq!(round_up_pow2(65), Some(128));
    assert_eq!(round_up_pow2(1000), Some(1024));
    assert_eq!(round_up_pow2(5000), Some(8192));
    assert_eq!(round_up_pow2(1), Some(1));
  }

  #[test]
  fn test_round_up_pow2_overflow() {
    assert_eq!(round_up_pow2(usize::MAX), None);
    assert_eq!(round_up_pow2((usize::MAX >> 1) + 2), None);
  }
}
