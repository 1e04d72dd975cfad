//! Extended multiplication: 256×256 → 512 bits.
//!
//! The product of two 256-bit words always fits in 512 bits, so the extended
//! multiply is exact and cannot overflow. The schoolbook accumulation walks
//! the limbs in a fixed order (outer loop over the left operand, inner loop
//! over the right) so results are reproducible bit for bit.

use crate::word::{WIDE_LIMBS, WORD_LIMBS, Word256, Word512};

/// Exact double-width product of two 256-bit words.
///
/// Limb-by-limb schoolbook accumulation: each `a[i] * b[j]` partial product
/// is added into output position `i + j` through a 128-bit intermediate, and
/// the carry out of each inner pass lands in position `i + WORD_LIMBS`.
pub fn mul_wide(a: Word256, b: Word256) -> Word512 {
  let mut out = [0u64; WIDE_LIMBS];
  for i in 0..WORD_LIMBS {
    let mut carry = 0u64;
    for j in 0..WORD_LIMBS {
      let wide = a.limb(i) as u128 * b.limb(j) as u128 + out[i + j] as u128 + carry as u128;
      out[i + j] = wide as u64;
      carry = (wide >> 64) as u64;
    }
    out[i + WORD_LIMBS] = carry;
  }
  Word512::from_limbs(out)
}

/// Product truncated to 256 bits (reduction modulo 2^256).
///
/// This is the wraparound multiply used by exponentiation; it keeps only the
/// low half of the extended product.
pub fn mul_low(a: Word256, b: Word256) -> Word256 {
  mul_wide(a, b).low_word()
}
