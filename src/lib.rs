//! This library implements the fixed-width 256-bit arithmetic primitives that
//! a bytecode-to-native translation pipeline uses to realize a stack
//! machine's native word opcodes: extended multiply, mixed-width unsigned
//! division, truncating signed division, modular addition and
//! multiplication, and wraparound exponentiation.
//!
//! The machine's word (256 bits) exceeds ordinary machine word width, so
//! every operation here is built from multi-limb algorithms over
//! [`word::Word256`] and the double-width intermediate [`word::Word512`].
//! Every edge case (division by zero, zero modulus, signed-overflow
//! division) yields a machine-defined numeric result rather than a fault,
//! because the consuming virtual machine requires totality.
//!
//! Routines are requested by name from a per-context [`routine::RoutineCache`],
//! which constructs each helper at most once and hands out stable handles for
//! repeated use.
#![deny(
  warnings,
  unused,
  future_incompatible,
  nonstandard_style,
  rust_2018_idioms,
  missing_docs
)]
#![forbid(unsafe_code)]

pub mod div;
pub mod errors;
pub mod exp;
pub mod modular;
pub mod mul;
pub mod routine;
pub mod signed;
pub mod trace;
pub mod word;
