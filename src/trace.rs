//! Optional instrumentation for observing intermediate operand values.
//!
//! The arithmetic routines report operands and results to an injectable
//! [`Tracer`] at implementation-defined diagnostic points, each call tagged
//! with a single character. The default implementation is a no-op, and
//! tracing never affects arithmetic results; the core behaves identically
//! with and without a tracer installed.

use crate::word::Word256;
use core::cell::RefCell;

/// Capability for observing values flowing through the arithmetic routines.
pub trait Tracer {
  /// Observe a tagged intermediate value. The default does nothing.
  fn trace(&self, _tag: char, _value: &Word256) {}
}

/// The default tracer: discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// A tracer that records every observation, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingTracer {
  events: RefCell<Vec<(char, Word256)>>,
}

impl RecordingTracer {
  /// Create an empty recorder.
  pub fn new() -> Self {
    Self::default()
  }

  /// The observations made so far, in order.
  pub fn events(&self) -> Vec<(char, Word256)> {
    self.events.borrow().clone()
  }
}

impl Tracer for RecordingTracer {
  fn trace(&self, tag: char, value: &Word256) {
    self.events.borrow_mut().push((tag, *value));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_noop_tracer_discards() {
    // exists to make sure the default trait method stays a no-op
    NoopTracer.trace('a', &Word256::MAX);
  }

  #[test]
  fn test_recording_tracer_keeps_order() {
    let tracer = RecordingTracer::new();
    tracer.trace('a', &Word256::ONE);
    tracer.trace('b', &Word256::MAX);
    assert_eq!(
      tracer.events(),
      vec![('a', Word256::ONE), ('b', Word256::MAX)]
    );
  }
}
