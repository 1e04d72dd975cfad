//! Modular addition and multiplication with widened intermediates.
//!
//! Both operations widen before they reduce: `addmod` keeps the carry out of
//! the 256-bit sum so the intermediate is never truncated, and `mulmod` runs
//! the full 512-bit extended product through the wide path of the division
//! engine. A zero modulus yields the machine-defined result 0.

use crate::div::{divmod_limbs, urem_wide};
use crate::mul::mul_wide;
use crate::word::{WORD_LIMBS, Word256};

/// `(a + b) mod m`, with the sum held in a 257-bit-class intermediate.
///
/// The carry bit of the 256-bit addition becomes a fifth limb of the
/// numerator handed to the division engine, so `addmod(MAX, 1, m)` reduces
/// the true value 2^256 rather than a truncated 0.
pub fn addmod(a: Word256, b: Word256, m: Word256) -> Word256 {
  if m.is_zero() {
    return Word256::ZERO;
  }
  let (sum, carry) = a.overflowing_add(b);

  let mut numerator = [0u64; WORD_LIMBS + 1];
  numerator[..WORD_LIMBS].copy_from_slice(&sum.limbs());
  numerator[WORD_LIMBS] = carry as u64;

  let mut quotient = [0u64; WORD_LIMBS + 1];
  let mut remainder = [0u64; WORD_LIMBS];
  divmod_limbs(&numerator, &m.limbs(), &mut quotient, &mut remainder);
  Word256::from_limbs(remainder)
}

/// `(a * b) mod m`, via the exact 512-bit product.
pub fn mulmod(a: Word256, b: Word256, m: Word256) -> Word256 {
  if m.is_zero() {
    return Word256::ZERO;
  }
  urem_wide(mul_wide(a, b), m)
}

#[cfg(test)]
mod tests {
  use super::*;
  use num_bigint::BigUint;
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};

  fn big(w: &Word256) -> BigUint {
    BigUint::from_bytes_be(&w.to_be_bytes())
  }

  fn rw(rng: &mut StdRng) -> Word256 {
    Word256::from_limbs([rng.r#gen(), rng.r#gen(), rng.r#gen(), rng.r#gen()])
  }

  #[test]
  fn test_zero_modulus_is_defined() {
    assert_eq!(addmod(Word256::MAX, Word256::MAX, Word256::ZERO), Word256::ZERO);
    assert_eq!(mulmod(Word256::MAX, Word256::MAX, Word256::ZERO), Word256::ZERO);
  }

  #[test]
  fn test_addmod_carry_is_preserved() {
    // (2^256 - 1) + 1 = 2^256, and 2^256 mod 7 == 2; a truncating
    // implementation would return 0
    assert_eq!(
      addmod(Word256::MAX, Word256::ONE, Word256::from(7u64)),
      Word256::from(2u64)
    );
  }

  #[test]
  fn test_mulmod_wide_product() {
    // 2^255 * 2^255 = 2^510, and 2^510 mod 3 == 1
    let half = Word256::MIN_SIGNED;
    assert_eq!(mulmod(half, half, Word256::from(3u64)), Word256::ONE);
  }

  #[test]
  fn test_addmod_against_reference() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..200 {
      let a = rw(&mut rng);
      let b = rw(&mut rng);
      let m = rw(&mut rng);
      if m.is_zero() {
        continue;
      }
      assert_eq!(big(&addmod(a, b, m)), (big(&a) + big(&b)) % big(&m));
    }
  }

  #[test]
  fn test_mulmod_against_reference() {
    let mut rng = StdRng::seed_from_u64(32);
    for _ in 0..200 {
      let a = rw(&mut rng);
      let b = rw(&mut rng);
      let m = rw(&mut rng);
      if m.is_zero() {
        continue;
      }
      assert_eq!(big(&mulmod(a, b, m)), (big(&a) * big(&b)) % big(&m));
    }
  }

  #[test]
  fn test_small_values_brute_force() {
    for a in 0..8u64 {
      for b in 0..8u64 {
        for m in 1..8u64 {
          assert_eq!(
            addmod(Word256::from(a), Word256::from(b), Word256::from(m)),
            Word256::from((a + b) % m)
          );
          assert_eq!(
            mulmod(Word256::from(a), Word256::from(b), Word256::from(m)),
            Word256::from((a * b) % m)
          );
        }
      }
    }
  }
}
