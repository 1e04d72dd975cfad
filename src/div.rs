//! The division engine: mixed-width unsigned long division.
//!
//! Supports the same-width 256/256 form and the wide-numerator 512/256 form
//! required for modular reduction of extended products. The core is
//! schoolbook long division generalized to arbitrary limb counts: the divisor
//! is normalized by left-shifting until the top bit of its most significant
//! limb is set, each quotient limb is estimated from the top two dividend
//! limbs against the top divisor limb, and the estimate is corrected by a
//! trial multiply-and-compare-subtract.
//!
//! Division by zero is not an error here: the consuming virtual machine
//! requires a total function, so a zero divisor yields the machine-defined
//! result (0, 0) on every path.

use crate::word::{WIDE_LIMBS, WORD_LIMBS, Word256, Word512, borrow_sub, carry_add};
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

/// Quotient/remainder pair of a 256-bit division.
///
/// For `divisor != 0` the pair satisfies
/// `dividend == quotient * divisor + remainder` with
/// `0 <= remainder < divisor`; for `divisor == 0` both fields are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionResult {
  /// The truncated quotient.
  pub quotient: Word256,
  /// The remainder, strictly below the divisor when the divisor is nonzero.
  pub remainder: Word256,
}

impl DivisionResult {
  /// The machine-defined result of a division by zero.
  pub const ZERO: Self = Self {
    quotient: Word256::ZERO,
    remainder: Word256::ZERO,
  };
}

/// Quotient/remainder pair of a 512/256 division.
///
/// The quotient of a 512-bit numerator can itself exceed 256 bits, so it is
/// kept at full width; the remainder is always below the 256-bit divisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideDivisionResult {
  /// The truncated quotient, up to 512 bits.
  pub quotient: Word512,
  /// The remainder, strictly below the divisor when the divisor is nonzero.
  pub remainder: Word256,
}

impl WideDivisionResult {
  /// The machine-defined result of a division by zero.
  pub const ZERO: Self = Self {
    quotient: Word512::ZERO,
    remainder: Word256::ZERO,
  };
}

/// 256/256 unsigned division producing quotient and remainder.
pub fn udivrem(dividend: Word256, divisor: Word256) -> DivisionResult {
  if divisor.is_zero() {
    return DivisionResult::ZERO;
  }
  if dividend < divisor {
    return DivisionResult {
      quotient: Word256::ZERO,
      remainder: dividend,
    };
  }
  let mut quotient = [0u64; WORD_LIMBS];
  let mut remainder = [0u64; WORD_LIMBS];
  divmod_limbs(
    &dividend.limbs(),
    &divisor.limbs(),
    &mut quotient,
    &mut remainder,
  );
  DivisionResult {
    quotient: Word256::from_limbs(quotient),
    remainder: Word256::from_limbs(remainder),
  }
}

/// 256/256 unsigned division, quotient only.
pub fn udiv(dividend: Word256, divisor: Word256) -> Word256 {
  udivrem(dividend, divisor).quotient
}

/// 256/256 unsigned division, remainder only.
pub fn urem(dividend: Word256, divisor: Word256) -> Word256 {
  udivrem(dividend, divisor).remainder
}

/// 512/256 unsigned division producing quotient and remainder.
pub fn udivrem_wide(dividend: Word512, divisor: Word256) -> WideDivisionResult {
  if divisor.is_zero() {
    return WideDivisionResult::ZERO;
  }
  if dividend.fits_word() && dividend.low_word() < divisor {
    return WideDivisionResult {
      quotient: Word512::ZERO,
      remainder: dividend.low_word(),
    };
  }
  let mut quotient = [0u64; WIDE_LIMBS];
  let mut remainder = [0u64; WORD_LIMBS];
  divmod_limbs(
    &dividend.limbs(),
    &divisor.limbs(),
    &mut quotient,
    &mut remainder,
  );
  WideDivisionResult {
    quotient: Word512::from_limbs(quotient),
    remainder: Word256::from_limbs(remainder),
  }
}

/// 512/256 unsigned division, remainder only.
pub fn urem_wide(dividend: Word512, divisor: Word256) -> Word256 {
  udivrem_wide(dividend, divisor).remainder
}

/// Number of significant limbs (position of the top nonzero limb plus one).
fn sig_limbs(x: &[u64]) -> usize {
  x.iter().rposition(|&l| l != 0).map_or(0, |i| i + 1)
}

/// Compare limb sequences already trimmed to the same significant length.
fn cmp_sig(a: &[u64], b: &[u64]) -> Ordering {
  for (l, r) in a.iter().zip(b.iter()).rev() {
    match l.cmp(r) {
      Ordering::Equal => continue,
      ord => return ord,
    }
  }
  Ordering::Equal
}

/// `(hi << shift) | (lo >> (64 - shift))` with `shift` in `0..64`.
#[inline]
fn shl_pair(hi: u64, lo: u64, shift: u32) -> u64 {
  if shift == 0 {
    hi
  } else {
    (hi << shift) | (lo >> (64 - shift))
  }
}

/// Generalized schoolbook long division on little-endian limb buffers.
///
/// Writes the quotient into `quotient` and the remainder into `remainder`
/// (both zero-filled first). The divisor must be nonzero; zero divisors are
/// resolved by the callers before reaching the engine. `quotient` must hold
/// at least `num.len()` limbs and `remainder` at least the divisor's
/// significant limbs.
pub(crate) fn divmod_limbs(num: &[u64], den: &[u64], quotient: &mut [u64], remainder: &mut [u64]) {
  debug_assert!(num.len() <= WIDE_LIMBS + 1);
  debug_assert!(quotient.len() >= num.len());
  quotient.fill(0);
  remainder.fill(0);

  let n = sig_limbs(den);
  let m = sig_limbs(num);
  debug_assert!(n > 0, "zero divisor reached the division engine");

  // dividend < divisor: quotient zero, remainder is the dividend
  if m < n || (m == n && cmp_sig(&num[..m], &den[..n]) == Ordering::Less) {
    remainder[..m].copy_from_slice(&num[..m]);
    return;
  }

  // single-limb divisor: plain short division
  if n == 1 {
    let d = den[0] as u128;
    let mut rem = 0u128;
    for i in (0..m).rev() {
      let cur = (rem << 64) | num[i] as u128;
      quotient[i] = (cur / d) as u64;
      rem = cur % d;
    }
    remainder[0] = rem as u64;
    return;
  }

  // Normalize so the divisor's top limb has its high bit set; the same shift
  // is applied to the dividend, which may spill into one extra limb.
  let shift = den[n - 1].leading_zeros();

  let mut v = [0u64; WIDE_LIMBS];
  for i in (1..n).rev() {
    v[i] = shl_pair(den[i], den[i - 1], shift);
  }
  v[0] = den[0] << shift;

  let mut u = [0u64; WIDE_LIMBS + 2];
  u[m] = if shift == 0 {
    0
  } else {
    num[m - 1] >> (64 - shift)
  };
  for i in (1..m).rev() {
    u[i] = shl_pair(num[i], num[i - 1], shift);
  }
  u[0] = num[0] << shift;

  let v1 = v[n - 1];
  let v0 = v[n - 2];

  for j in (0..=m - n).rev() {
    // Estimate the quotient limb from the top two dividend limbs against the
    // top divisor limb, capping at the limb maximum.
    let (mut qhat, mut rhat) = if u[j + n] == v1 {
      (u64::MAX, u[j + n - 1] as u128 + v1 as u128)
    } else {
      let top = ((u[j + n] as u128) << 64) | u[j + n - 1] as u128;
      ((top / v1 as u128) as u64, top % v1 as u128)
    };
    // The two-limb estimate can exceed the true quotient limb by up to two;
    // pull it down while the second divisor limb disagrees.
    while rhat <= u64::MAX as u128
      && qhat as u128 * v0 as u128 > (rhat << 64) | u[j + n - 2] as u128
    {
      qhat -= 1;
      rhat += v1 as u128;
    }

    // Trial multiply-and-subtract of qhat * divisor from the dividend window.
    let mut carry = 0u64;
    let mut borrow = false;
    for i in 0..n {
      let p = qhat as u128 * v[i] as u128 + carry as u128;
      carry = (p >> 64) as u64;
      let (diff, b) = borrow_sub(u[j + i], p as u64, borrow);
      u[j + i] = diff;
      borrow = b;
    }
    let (diff, b) = borrow_sub(u[j + n], carry, borrow);
    u[j + n] = diff;

    // Went one below zero: the estimate was still one too large, add one
    // divisor back.
    if b {
      qhat -= 1;
      let mut c = false;
      for i in 0..n {
        let (sum, cc) = carry_add(u[j + i], v[i], c);
        u[j + i] = sum;
        c = cc;
      }
      u[j + n] = u[j + n].wrapping_add(c as u64);
    }

    quotient[j] = qhat;
  }

  // Undo the normalization shift on the remainder.
  if shift == 0 {
    remainder[..n].copy_from_slice(&u[..n]);
  } else {
    for i in 0..n {
      remainder[i] = (u[i] >> shift) | (u[i + 1] << (64 - shift));
    }
  }
}
