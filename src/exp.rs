//! Exponentiation truncated to 256 bits.
//!
//! `base^exponent` under ordinary unsigned wraparound, not reduction against
//! an explicit modulus: every intermediate square and multiply keeps only the
//! low 256 bits of its extended product. At most 256 iterations, bounded by
//! the exponent's bit length.

use crate::mul::mul_low;
use crate::word::Word256;

/// `base^exponent` modulo 2^256.
///
/// Square-and-multiply over the exponent bits from most to least
/// significant. `exp(base, 0) == 1` for every base, including
/// `exp(0, 0) == 1`; `exp(0, e) == 0` for `e > 0`.
pub fn exp(base: Word256, exponent: Word256) -> Word256 {
  let mut acc = Word256::ONE;
  for i in (0..exponent.bit_len()).rev() {
    acc = mul_low(acc, acc);
    if exponent.bit(i) {
      acc = mul_low(acc, base);
    }
  }
  acc
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

  #[test]
  fn test_zero_exponent_yields_one() {
    assert_eq!(exp(Word256::MAX, Word256::ZERO), Word256::ONE);
    assert_eq!(exp(Word256::from(17u64), Word256::ZERO), Word256::ONE);
    // the 0^0 == 1 convention
    assert_eq!(exp(Word256::ZERO, Word256::ZERO), Word256::ONE);
  }

  #[test]
  fn test_zero_base() {
    assert_eq!(exp(Word256::ZERO, Word256::ONE), Word256::ZERO);
    assert_eq!(exp(Word256::ZERO, Word256::MAX), Word256::ZERO);
  }

  #[test]
  fn test_small_powers() {
    assert_eq!(exp(Word256::from(3u64), Word256::from(4u64)), Word256::from(81u64));
    assert_eq!(
      exp(Word256::from(2u64), Word256::from(255u64)),
      Word256::MIN_SIGNED
    );
  }

  #[test]
  fn test_wraparound() {
    // 2^256 wraps to zero, as does anything beyond
    assert_eq!(exp(Word256::from(2u64), Word256::from(256u64)), Word256::ZERO);
    assert_eq!(exp(Word256::from(2u64), Word256::from(300u64)), Word256::ZERO);
  }

  #[test]
  fn test_against_reference() {
    let mut rng = StdRng::seed_from_u64(41);
    let modulus = BigUint::from(1u8) << 256;
    for _ in 0..50 {
      let base = Word256::from_limbs([rng.r#gen(), rng.r#gen(), 0, 0]);
      let exponent = Word256::from(rng.r#gen::<u8>() as u64);
      assert_eq!(
        big(&exp(base, exponent)),
        big(&base).modpow(&big(&exponent), &modulus)
      );
    }
  }
}
