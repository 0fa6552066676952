use thiserror::Error;

/// Allocation result
pub type AllocResult<T> = Result<T, AllocError>;

/// Allocation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  #[error("Out of memory: could not obtain {requested} bytes from the OS")]
  OutOfMemory { requested: usize },

  #[error("Invalid argument: allocation size must be non-zero")]
  ZeroSize,
}
