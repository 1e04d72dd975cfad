//! This module defines errors returned by the library.
use core::fmt::Debug;
use thiserror::Error;

/// Errors returned by the arithmetic core.
///
/// Arithmetic edge cases (division or modulus by zero, signed-overflow
/// division) are not errors; each has a machine-defined numeric result
/// because the consuming virtual machine must produce a result for every
/// input. The only error class is misuse of the routine cache.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ArithError {
  /// returned when the routine cache is used against its contract, e.g. a
  /// routine is requested from a context that has already been torn down
  #[error("Misuse: {reason}")]
  Misuse {
    /// What the caller did wrong
    reason: String,
  },
}
