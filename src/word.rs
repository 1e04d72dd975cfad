//! Fixed-width machine words for the translation pipeline.
//!
//! This module provides [`Word256`], the virtual machine's native 256-bit
//! unsigned word, and [`Word512`], the double-width intermediate used by the
//! extended multiply and the wide-numerator division path. Both are ordered
//! little-endian limb sequences: `limbs[0]` is the least significant limb.
//!
//! All arithmetic on `Word256` wraps modulo 2^256 unless an operation
//! explicitly widens into a `Word512`. Sign interpretation (two's complement)
//! is exposed only through explicit accessors ([`Word256::sign_bit`],
//! [`Word256::wrapping_neg`]); the storage is never reinterpreted as a
//! different type.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Mul};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// Number of 64-bit limbs in a 256-bit word.
pub const WORD_LIMBS: usize = 4;

/// Number of 64-bit limbs in a 512-bit intermediate.
pub const WIDE_LIMBS: usize = 8;

/// Add with carry-in, returning the sum limb and the carry-out.
#[inline]
pub(crate) const fn carry_add(x: u64, y: u64, carry: bool) -> (u64, bool) {
  let (a, c1) = x.overflowing_add(y);
  let (b, c2) = a.overflowing_add(carry as u64);
  (b, c1 | c2)
}

/// Subtract with borrow-in, returning the difference limb and the borrow-out.
#[inline]
pub(crate) const fn borrow_sub(x: u64, y: u64, borrow: bool) -> (u64, bool) {
  let (a, b1) = x.overflowing_sub(y);
  let (b, b2) = a.overflowing_sub(borrow as u64);
  (b, b1 | b2)
}

/// A 256-bit unsigned word stored as four little-endian 64-bit limbs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word256 {
  limbs: [u64; WORD_LIMBS],
}

impl Word256 {
  /// The additive identity.
  pub const ZERO: Self = Self {
    limbs: [0; WORD_LIMBS],
  };

  /// The multiplicative identity.
  pub const ONE: Self = Self {
    limbs: [1, 0, 0, 0],
  };

  /// The largest representable value, 2^256 - 1.
  pub const MAX: Self = Self {
    limbs: [u64::MAX; WORD_LIMBS],
  };

  /// The minimal value under two's-complement interpretation, -2^255
  /// (unsigned 2^255: only the top bit set).
  pub const MIN_SIGNED: Self = Self {
    limbs: [0, 0, 0, 1 << 63],
  };

  /// Construct a word from little-endian limbs.
  #[inline]
  pub const fn from_limbs(limbs: [u64; WORD_LIMBS]) -> Self {
    Self { limbs }
  }

  /// Construct a word from a big-endian byte string, the wire form the
  /// surrounding virtual machine uses for its words.
  pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
    let mut limbs = [0u64; WORD_LIMBS];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
      limbs[WORD_LIMBS - 1 - i] = u64::from_be_bytes(chunk.try_into().expect("8-byte chunk"));
    }
    Self { limbs }
  }

  /// The big-endian byte representation of this word.
  pub fn to_be_bytes(self) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
      chunk.copy_from_slice(&self.limbs[WORD_LIMBS - 1 - i].to_be_bytes());
    }
    out
  }

  /// The little-endian limbs of this word.
  #[inline]
  pub const fn limbs(&self) -> [u64; WORD_LIMBS] {
    self.limbs
  }

  /// The limb at position `i` (0 = least significant).
  #[inline]
  pub const fn limb(&self, i: usize) -> u64 {
    self.limbs[i]
  }

  /// The least-significant 64 bits.
  #[inline]
  pub const fn low_u64(&self) -> u64 {
    self.limbs[0]
  }

  /// Whether this word is zero.
  #[inline]
  pub fn is_zero(&self) -> bool {
    self.limbs.iter().all(|&l| l == 0)
  }

  /// The bit at position `i` (0 = least significant).
  #[inline]
  pub const fn bit(&self, i: u32) -> bool {
    (self.limbs[(i / 64) as usize] >> (i % 64)) & 1 == 1
  }

  /// Number of leading zero bits.
  pub fn leading_zeros(&self) -> u32 {
    let mut zeros = 0;
    for &limb in self.limbs.iter().rev() {
      if limb == 0 {
        zeros += 64;
      } else {
        zeros += limb.leading_zeros();
        break;
      }
    }
    zeros
  }

  /// Number of bits required to represent this word; zero for `ZERO`.
  #[inline]
  pub fn bit_len(&self) -> u32 {
    256 - self.leading_zeros()
  }

  /// The top bit, which carries the sign under two's-complement
  /// interpretation.
  #[inline]
  pub const fn sign_bit(&self) -> bool {
    self.limbs[WORD_LIMBS - 1] >> 63 == 1
  }

  /// Addition modulo 2^256.
  #[inline]
  pub fn wrapping_add(self, rhs: Self) -> Self {
    self.overflowing_add(rhs).0
  }

  /// Addition returning the truncated sum and the carry out of bit 255.
  ///
  /// The carry bit is what lets modular addition keep a 257-bit-class
  /// intermediate instead of silently truncating.
  pub fn overflowing_add(self, rhs: Self) -> (Self, bool) {
    let mut out = [0u64; WORD_LIMBS];
    let mut carry = false;
    for i in 0..WORD_LIMBS {
      let (sum, c) = carry_add(self.limbs[i], rhs.limbs[i], carry);
      out[i] = sum;
      carry = c;
    }
    (Self { limbs: out }, carry)
  }

  /// Subtraction returning the wrapped difference and whether a borrow out of
  /// bit 255 occurred (i.e. `self < rhs`).
  pub fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
    let mut out = [0u64; WORD_LIMBS];
    let mut borrow = false;
    for i in 0..WORD_LIMBS {
      let (diff, b) = borrow_sub(self.limbs[i], rhs.limbs[i], borrow);
      out[i] = diff;
      borrow = b;
    }
    (Self { limbs: out }, borrow)
  }

  /// Subtraction modulo 2^256.
  #[inline]
  pub fn wrapping_sub(self, rhs: Self) -> Self {
    self.overflowing_sub(rhs).0
  }

  /// Two's-complement negation modulo 2^256.
  ///
  /// This is the magnitude conversion used by the signed-division adaptor;
  /// note that `MIN_SIGNED.wrapping_neg() == MIN_SIGNED`.
  pub fn wrapping_neg(self) -> Self {
    let mut out = [0u64; WORD_LIMBS];
    for i in 0..WORD_LIMBS {
      out[i] = !self.limbs[i];
    }
    Self { limbs: out }.wrapping_add(Self::ONE)
  }
}

impl From<u64> for Word256 {
  fn from(value: u64) -> Self {
    Self {
      limbs: [value, 0, 0, 0],
    }
  }
}

impl PartialOrd for Word256 {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Word256 {
  fn cmp(&self, other: &Self) -> Ordering {
    cmp_limbs(&self.limbs, &other.limbs)
  }
}

impl Add for Word256 {
  type Output = Self;

  /// Addition modulo 2^256.
  fn add(self, rhs: Self) -> Self {
    self.wrapping_add(rhs)
  }
}

impl Mul for Word256 {
  type Output = Self;

  /// Multiplication modulo 2^256 (the low half of the extended product).
  fn mul(self, rhs: Self) -> Self {
    crate::mul::mul_low(self, rhs)
  }
}

impl Zero for Word256 {
  fn zero() -> Self {
    Self::ZERO
  }

  fn is_zero(&self) -> bool {
    Word256::is_zero(self)
  }
}

impl One for Word256 {
  fn one() -> Self {
    Self::ONE
  }
}

impl fmt::Display for Word256 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_limbs_hex(&self.limbs, f)
  }
}

/// A 512-bit unsigned intermediate stored as eight little-endian 64-bit limbs.
///
/// `Word512` exists only as the exact product of two 256-bit words and as the
/// numerator accepted by the wide path of the division engine; it is never
/// persisted beyond a single operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word512 {
  limbs: [u64; WIDE_LIMBS],
}

impl Word512 {
  /// The additive identity.
  pub const ZERO: Self = Self {
    limbs: [0; WIDE_LIMBS],
  };

  /// Construct a wide value from little-endian limbs.
  #[inline]
  pub const fn from_limbs(limbs: [u64; WIDE_LIMBS]) -> Self {
    Self { limbs }
  }

  /// Assemble a wide value from its high and low 256-bit halves.
  pub fn from_words(hi: Word256, lo: Word256) -> Self {
    let mut limbs = [0u64; WIDE_LIMBS];
    limbs[..WORD_LIMBS].copy_from_slice(&lo.limbs());
    limbs[WORD_LIMBS..].copy_from_slice(&hi.limbs());
    Self { limbs }
  }

  /// Split into (high, low) 256-bit halves.
  pub fn split(self) -> (Word256, Word256) {
    (self.high_word(), self.low_word())
  }

  /// The low 256 bits.
  pub fn low_word(&self) -> Word256 {
    let mut limbs = [0u64; WORD_LIMBS];
    limbs.copy_from_slice(&self.limbs[..WORD_LIMBS]);
    Word256::from_limbs(limbs)
  }

  /// The high 256 bits.
  pub fn high_word(&self) -> Word256 {
    let mut limbs = [0u64; WORD_LIMBS];
    limbs.copy_from_slice(&self.limbs[WORD_LIMBS..]);
    Word256::from_limbs(limbs)
  }

  /// The little-endian limbs of this value.
  #[inline]
  pub const fn limbs(&self) -> [u64; WIDE_LIMBS] {
    self.limbs
  }

  /// Whether this value is zero.
  #[inline]
  pub fn is_zero(&self) -> bool {
    self.limbs.iter().all(|&l| l == 0)
  }

  /// Whether this value fits in 256 bits.
  #[inline]
  pub fn fits_word(&self) -> bool {
    self.high_word().is_zero()
  }

  /// The big-endian byte representation of this value.
  pub fn to_be_bytes(self) -> [u8; 64] {
    let mut out = [0u8; 64];
    for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
      chunk.copy_from_slice(&self.limbs[WIDE_LIMBS - 1 - i].to_be_bytes());
    }
    out
  }
}

impl From<Word256> for Word512 {
  fn from(value: Word256) -> Self {
    Self::from_words(Word256::ZERO, value)
  }
}

impl PartialOrd for Word512 {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Word512 {
  fn cmp(&self, other: &Self) -> Ordering {
    cmp_limbs(&self.limbs, &other.limbs)
  }
}

impl Add for Word512 {
  type Output = Self;

  /// Addition modulo 2^512, required by the [`Zero`] bound.
  fn add(self, rhs: Self) -> Self {
    let mut out = [0u64; WIDE_LIMBS];
    let mut carry = false;
    for i in 0..WIDE_LIMBS {
      let (sum, c) = carry_add(self.limbs[i], rhs.limbs[i], carry);
      out[i] = sum;
      carry = c;
    }
    Self { limbs: out }
  }
}

impl Zero for Word512 {
  fn zero() -> Self {
    Self::ZERO
  }

  fn is_zero(&self) -> bool {
    Word512::is_zero(self)
  }
}

impl fmt::Display for Word512 {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt_limbs_hex(&self.limbs, f)
  }
}

/// Compare equal-length little-endian limb sequences, most significant first.
fn cmp_limbs<const N: usize>(a: &[u64; N], b: &[u64; N]) -> Ordering {
  for (l, r) in a.iter().zip(b.iter()).rev() {
    match l.cmp(r) {
      Ordering::Equal => continue,
      ord => return ord,
    }
  }
  Ordering::Equal
}

/// Write limbs as a `0x`-prefixed hex literal with leading zeros trimmed.
fn fmt_limbs_hex(limbs: &[u64], f: &mut fmt::Formatter<'_>) -> fmt::Result {
  let top = limbs.iter().rposition(|&l| l != 0);
  match top {
    None => write!(f, "0x0"),
    Some(top) => {
      write!(f, "0x{:x}", limbs[top])?;
      for &limb in limbs[..top].iter().rev() {
        write!(f, "{limb:016x}")?;
      }
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_constants() {
    assert!(Word256::ZERO.is_zero());
    assert_eq!(Word256::ONE.low_u64(), 1);
    assert_eq!(Word256::MAX.leading_zeros(), 0);
    assert!(Word256::MIN_SIGNED.sign_bit());
    assert_eq!(Word256::MIN_SIGNED.bit_len(), 256);
  }

  #[test]
  fn test_be_bytes_roundtrip() {
    let w = Word256::from_limbs([0x1122, 0x3344, 0x5566, 0x7788]);
    assert_eq!(Word256::from_be_bytes(w.to_be_bytes()), w);

    let bytes = Word256::ONE.to_be_bytes();
    assert_eq!(bytes[31], 1);
    assert!(bytes[..31].iter().all(|&b| b == 0));
  }

  #[test]
  fn test_overflowing_add_carry() {
    let (sum, carry) = Word256::MAX.overflowing_add(Word256::ONE);
    assert!(sum.is_zero());
    assert!(carry);

    let (sum, carry) = Word256::from(u64::MAX).overflowing_add(Word256::ONE);
    assert_eq!(sum.limbs(), [0, 1, 0, 0]);
    assert!(!carry);
  }

  #[test]
  fn test_overflowing_sub_borrow() {
    let (diff, borrow) = Word256::ZERO.overflowing_sub(Word256::ONE);
    assert_eq!(diff, Word256::MAX);
    assert!(borrow);

    let a = Word256::from_limbs([0, 1, 0, 0]);
    let (diff, borrow) = a.overflowing_sub(Word256::ONE);
    assert_eq!(diff, Word256::from(u64::MAX));
    assert!(!borrow);
  }

  #[test]
  fn test_wrapping_neg() {
    assert_eq!(Word256::ZERO.wrapping_neg(), Word256::ZERO);
    assert_eq!(Word256::ONE.wrapping_neg(), Word256::MAX);
    // the two's-complement fixed point
    assert_eq!(Word256::MIN_SIGNED.wrapping_neg(), Word256::MIN_SIGNED);
  }

  #[test]
  fn test_ordering() {
    let a = Word256::from_limbs([u64::MAX, 0, 0, 0]);
    let b = Word256::from_limbs([0, 1, 0, 0]);
    assert!(a < b);
    assert!(Word256::MAX > b);
    assert_eq!(a.cmp(&a), Ordering::Equal);
  }

  #[test]
  fn test_bit_accessors() {
    let w = Word256::from_limbs([0b101, 0, 1, 0]);
    assert!(w.bit(0));
    assert!(!w.bit(1));
    assert!(w.bit(2));
    assert!(w.bit(128));
    assert_eq!(w.bit_len(), 129);
    assert_eq!(Word256::ZERO.bit_len(), 0);
  }

  #[test]
  fn test_wide_split_roundtrip() {
    let hi = Word256::from_limbs([1, 2, 3, 4]);
    let lo = Word256::from_limbs([5, 6, 7, 8]);
    let wide = Word512::from_words(hi, lo);
    assert_eq!(wide.split(), (hi, lo));
    assert!(!wide.fits_word());
    assert!(Word512::from(lo).fits_word());
  }

  #[test]
  fn test_wide_add_carries_across_halves() {
    let low_max = Word512::from(Word256::MAX);
    let sum = low_max + Word512::from(Word256::ONE);
    assert_eq!(sum, Word512::from_words(Word256::ONE, Word256::ZERO));
    assert_eq!(Word512::ZERO + low_max, low_max);
    assert!(Word512::zero().is_zero());
  }

  #[test]
  fn test_display_hex() {
    assert_eq!(format!("{}", Word256::ZERO), "0x0");
    assert_eq!(format!("{}", Word256::from(0x5u64)), "0x5");
    let w = Word256::from_limbs([0, 1, 0, 0]);
    assert_eq!(format!("{w}"), "0x10000000000000000");
    assert_eq!(
      format!("{}", Word256::MAX),
      format!("0x{}", "f".repeat(64)),
    );
  }

  #[test]
  fn test_serde_roundtrip() {
    let w = Word256::from_limbs([9, 8, 7, 6]);
    let json = serde_json::to_string(&w).unwrap();
    assert_eq!(serde_json::from_str::<Word256>(&json).unwrap(), w);
  }
}
