//! Signed division derived from the unsigned division engine.
//!
//! A 256-bit word reinterpreted as two's complement carries its sign in the
//! top bit; magnitude conversion is two's-complement negation. Truncating
//! signed division then reduces to unsigned division on magnitudes: the
//! quotient takes the XOR of the operand signs, the remainder takes the sign
//! of the dividend.
//!
//! The minimal-dividend overflow corner (`-2^255 / -1`) needs no special
//! branch: the magnitude of `-2^255` is the unsigned 2^255, both signs cancel
//! through the positive path, and the unsigned quotient 2^255 already *is*
//! the two's-complement bit pattern of `-2^255`. The machine-defined wrap
//! falls straight out of the representation; a dedicated test pins it down.

use crate::div::{DivisionResult, udivrem};
use crate::word::Word256;

/// Truncating signed 256-bit division producing quotient and remainder.
///
/// Rounds the quotient toward zero. A zero divisor yields the
/// machine-defined (0, 0), the same rule as the unsigned engine.
pub fn sdivrem(dividend: Word256, divisor: Word256) -> DivisionResult {
  if divisor.is_zero() {
    return DivisionResult::ZERO;
  }

  let dividend_neg = dividend.sign_bit();
  let divisor_neg = divisor.sign_bit();

  let result = udivrem(magnitude(dividend), magnitude(divisor));

  let quotient = if dividend_neg != divisor_neg {
    result.quotient.wrapping_neg()
  } else {
    result.quotient
  };
  let remainder = if dividend_neg {
    result.remainder.wrapping_neg()
  } else {
    result.remainder
  };
  DivisionResult {
    quotient,
    remainder,
  }
}

/// Truncating signed division, quotient only.
pub fn sdiv(dividend: Word256, divisor: Word256) -> Word256 {
  sdivrem(dividend, divisor).quotient
}

/// Truncating signed division, remainder only.
pub fn srem(dividend: Word256, divisor: Word256) -> Word256 {
  sdivrem(dividend, divisor).remainder
}

/// Unsigned magnitude of a word under two's-complement interpretation.
fn magnitude(value: Word256) -> Word256 {
  if value.sign_bit() {
    value.wrapping_neg()
  } else {
    value
  }
}
