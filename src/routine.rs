//! Per-context registry of arithmetic routines.
//!
//! The translation pipeline requests a named operation from its compilation
//! context; the context's [`RoutineCache`] lazily builds the routine on first
//! request and hands back the identical [`RoutineHandle`] on every subsequent
//! one. Construction happens at most once per `(context, kind)` key, entries
//! are never rebuilt or removed before context teardown, and requests against
//! a torn-down context surface as [`ArithError::Misuse`].
//!
//! A context is a single-threaded scope: lazy construction is not idempotent
//! under concurrent first access, so a context shared across threads needs
//! external mutual exclusion around [`RoutineCache::get_or_create`].

use crate::div::{DivisionResult, WideDivisionResult, udiv, udivrem, udivrem_wide, urem, urem_wide};
use crate::errors::ArithError;
use crate::exp::exp;
use crate::modular::{addmod, mulmod};
use crate::mul::mul_wide;
use crate::signed::{sdiv, sdivrem, srem};
use crate::trace::{NoopTracer, Tracer};
use crate::word::{Word256, Word512};
use core::cell::Cell;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// The closed set of arithmetic operations the pipeline can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
  /// 256×256 → 512-bit exact product
  Mul512,
  /// 256/256 unsigned quotient
  UDiv256,
  /// 256/256 unsigned remainder
  URem256,
  /// 256/256 unsigned quotient and remainder
  UDivRem256,
  /// 512/256 unsigned remainder
  URem512,
  /// 512/256 unsigned quotient and remainder
  UDivRem512,
  /// truncating signed quotient
  SDiv256,
  /// truncating signed remainder
  SRem256,
  /// truncating signed quotient and remainder
  SDivRem256,
  /// modular addition with a carry-preserving intermediate
  AddMod,
  /// modular multiplication via the 512-bit product
  MulMod,
  /// exponentiation truncated to 256 bits
  Exp,
}

impl OperationKind {
  /// Every operation kind, in cache-slot order.
  pub const ALL: [Self; 12] = [
    Self::Mul512,
    Self::UDiv256,
    Self::URem256,
    Self::UDivRem256,
    Self::URem512,
    Self::UDivRem512,
    Self::SDiv256,
    Self::SRem256,
    Self::SDivRem256,
    Self::AddMod,
    Self::MulMod,
    Self::Exp,
  ];

  fn index(self) -> usize {
    self as usize
  }
}

/// Operands for one routine invocation, shaped by the routine's kind.
#[derive(Clone, Copy, Debug)]
pub enum Operands {
  /// Two 256-bit operands (products, divisions, exponentiation).
  Pair(Word256, Word256),
  /// Two 256-bit operands plus a modulus (`AddMod`, `MulMod`).
  Modular(Word256, Word256, Word256),
  /// A 512-bit numerator given as its (high, low) word pair, plus a 256-bit
  /// divisor (the `URem512`/`UDivRem512` forms).
  WideNumerator {
    /// High half of the numerator.
    hi: Word256,
    /// Low half of the numerator.
    lo: Word256,
    /// The 256-bit divisor.
    divisor: Word256,
  },
}

impl Operands {
  fn shape(&self) -> &'static str {
    match self {
      Self::Pair(..) => "pair",
      Self::Modular(..) => "modular",
      Self::WideNumerator { .. } => "wide-numerator",
    }
  }
}

/// Result of one routine invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
  /// A single 256-bit result.
  Word(Word256),
  /// A 512-bit extended product.
  Product(Word512),
  /// A 256-bit quotient/remainder pair.
  DivRem(DivisionResult),
  /// A wide quotient/remainder pair.
  WideDivRem(WideDivisionResult),
}

impl Evaluation {
  /// The single-word result, if this evaluation produced one.
  pub fn into_word(self) -> Option<Word256> {
    match self {
      Self::Word(w) => Some(w),
      _ => None,
    }
  }

  /// The extended product, if this evaluation produced one.
  pub fn into_product(self) -> Option<Word512> {
    match self {
      Self::Product(p) => Some(p),
      _ => None,
    }
  }

  /// The quotient/remainder pair, if this evaluation produced one.
  pub fn into_divrem(self) -> Option<DivisionResult> {
    match self {
      Self::DivRem(r) => Some(r),
      _ => None,
    }
  }

  /// The wide quotient/remainder pair, if this evaluation produced one.
  pub fn into_wide_divrem(self) -> Option<WideDivisionResult> {
    match self {
      Self::WideDivRem(r) => Some(r),
      _ => None,
    }
  }
}

/// One constructed arithmetic routine, wired to its context's tracer.
#[derive(Clone)]
pub struct Routine {
  kind: OperationKind,
  tracer: Rc<dyn Tracer>,
}

impl Routine {
  /// The operation this routine implements.
  pub fn kind(&self) -> OperationKind {
    self.kind
  }

  /// Evaluate the routine on `operands`.
  ///
  /// The operand shape must match the routine's kind; a mismatch is a
  /// precondition violation and panics. Apart from trace-hook calls the
  /// evaluation has no side effects.
  pub fn eval(&self, operands: Operands) -> Evaluation {
    use OperationKind::*;
    match (self.kind, operands) {
      (Mul512, Operands::Pair(a, b)) => {
        self.note2('a', &a, 'b', &b);
        let product = mul_wide(a, b);
        self.note2('H', &product.high_word(), 'L', &product.low_word());
        Evaluation::Product(product)
      }
      (UDiv256, Operands::Pair(a, b)) => self.word(udiv(a, b), 'a', &a, 'b', &b),
      (URem256, Operands::Pair(a, b)) => self.word(urem(a, b), 'a', &a, 'b', &b),
      (SDiv256, Operands::Pair(a, b)) => self.word(sdiv(a, b), 'a', &a, 'b', &b),
      (SRem256, Operands::Pair(a, b)) => self.word(srem(a, b), 'a', &a, 'b', &b),
      (Exp, Operands::Pair(a, b)) => self.word(exp(a, b), 'a', &a, 'b', &b),
      (UDivRem256, Operands::Pair(a, b)) => {
        self.note2('a', &a, 'b', &b);
        self.divrem(udivrem(a, b))
      }
      (SDivRem256, Operands::Pair(a, b)) => {
        self.note2('a', &a, 'b', &b);
        self.divrem(sdivrem(a, b))
      }
      (URem512, Operands::WideNumerator { hi, lo, divisor }) => {
        self.note2('h', &hi, 'l', &lo);
        let remainder = urem_wide(Word512::from_words(hi, lo), divisor);
        self.tracer.trace('r', &remainder);
        Evaluation::Word(remainder)
      }
      (UDivRem512, Operands::WideNumerator { hi, lo, divisor }) => {
        self.note2('h', &hi, 'l', &lo);
        let result = udivrem_wide(Word512::from_words(hi, lo), divisor);
        self.tracer.trace('r', &result.remainder);
        Evaluation::WideDivRem(result)
      }
      (AddMod, Operands::Modular(a, b, m)) => {
        self.note2('a', &a, 'b', &b);
        self.tracer.trace('m', &m);
        let result = addmod(a, b, m);
        self.tracer.trace('=', &result);
        Evaluation::Word(result)
      }
      (MulMod, Operands::Modular(a, b, m)) => {
        self.note2('a', &a, 'b', &b);
        self.tracer.trace('m', &m);
        let result = mulmod(a, b, m);
        self.tracer.trace('=', &result);
        Evaluation::Word(result)
      }
      (kind, operands) => panic!(
        "{kind:?} routine invoked with {} operands",
        operands.shape()
      ),
    }
  }

  fn note2(&self, t1: char, v1: &Word256, t2: char, v2: &Word256) {
    self.tracer.trace(t1, v1);
    self.tracer.trace(t2, v2);
  }

  fn word(&self, result: Word256, t1: char, v1: &Word256, t2: char, v2: &Word256) -> Evaluation {
    self.note2(t1, v1, t2, v2);
    self.tracer.trace('=', &result);
    Evaluation::Word(result)
  }

  fn divrem(&self, result: DivisionResult) -> Evaluation {
    self.tracer.trace('q', &result.quotient);
    self.tracer.trace('r', &result.remainder);
    Evaluation::DivRem(result)
  }
}

/// Shared reference to a constructed routine.
///
/// Handles returned for the same `(context, kind)` key compare equal:
/// equality is identity of the underlying routine, which is what makes the
/// construct-at-most-once invariant observable.
#[derive(Clone)]
pub struct RoutineHandle(Rc<Routine>);

impl RoutineHandle {
  /// The routine behind this handle.
  pub fn routine(&self) -> &Routine {
    &self.0
  }

  /// The operation this handle evaluates.
  pub fn kind(&self) -> OperationKind {
    self.0.kind()
  }

  /// Evaluate on `operands`; see [`Routine::eval`].
  pub fn eval(&self, operands: Operands) -> Evaluation {
    self.0.eval(operands)
  }
}

impl PartialEq for RoutineHandle {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for RoutineHandle {}

impl core::fmt::Debug for RoutineHandle {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("RoutineHandle").field(&self.0.kind).finish()
  }
}

/// Lazily-populated registry of routines, one slot per [`OperationKind`].
///
/// Owned exclusively by its compilation context; entries live exactly as long
/// as the owning context and are dropped on [`RoutineCache::teardown`].
pub struct RoutineCache {
  tracer: Rc<dyn Tracer>,
  slots: [OnceCell<RoutineHandle>; OperationKind::ALL.len()],
  constructions: Cell<usize>,
  torn_down: Cell<bool>,
}

impl RoutineCache {
  /// An empty cache with the no-op tracer.
  pub fn new() -> Self {
    Self::with_tracer(Rc::new(NoopTracer))
  }

  /// An empty cache whose routines report to `tracer`.
  pub fn with_tracer(tracer: Rc<dyn Tracer>) -> Self {
    Self {
      tracer,
      slots: core::array::from_fn(|_| OnceCell::new()),
      constructions: Cell::new(0),
      torn_down: Cell::new(false),
    }
  }

  /// Return the routine for `kind`, constructing it on first request.
  ///
  /// Every call for the same kind returns the identical handle; requesting a
  /// routine from a torn-down cache is a [`ArithError::Misuse`] error.
  pub fn get_or_create(&self, kind: OperationKind) -> Result<RoutineHandle, ArithError> {
    if self.torn_down.get() {
      return Err(ArithError::Misuse {
        reason: format!("requested {kind:?} routine from a torn-down context"),
      });
    }
    let handle = self.slots[kind.index()].get_or_init(|| {
      debug!(?kind, "constructing arithmetic routine");
      self.constructions.set(self.constructions.get() + 1);
      RoutineHandle(Rc::new(Routine {
        kind,
        tracer: Rc::clone(&self.tracer),
      }))
    });
    Ok(handle.clone())
  }

  /// How many routines have been constructed so far.
  pub fn constructions(&self) -> usize {
    self.constructions.get()
  }

  /// Drop all entries and refuse further requests.
  pub fn teardown(&mut self) {
    debug!("tearing down routine cache");
    for slot in &mut self.slots {
      slot.take();
    }
    self.torn_down.set(true);
  }
}

impl Default for RoutineCache {
  fn default() -> Self {
    Self::new()
  }
}

/// One bytecode translation unit: the scope that owns a routine cache.
///
/// Contexts share no mutable state with one another; independent translation
/// jobs may run concurrently as long as no single context crosses threads.
pub struct TranslationContext {
  label: String,
  cache: RoutineCache,
}

impl TranslationContext {
  /// A fresh context with the no-op tracer.
  pub fn new(label: impl Into<String>) -> Self {
    Self {
      label: label.into(),
      cache: RoutineCache::new(),
    }
  }

  /// A fresh context whose routines report to `tracer`.
  pub fn with_tracer(label: impl Into<String>, tracer: Rc<dyn Tracer>) -> Self {
    Self {
      label: label.into(),
      cache: RoutineCache::with_tracer(tracer),
    }
  }

  /// The diagnostic label of this translation unit.
  pub fn label(&self) -> &str {
    &self.label
  }

  /// See [`RoutineCache::get_or_create`].
  pub fn get_or_create(&self, kind: OperationKind) -> Result<RoutineHandle, ArithError> {
    self.cache.get_or_create(kind)
  }

  /// See [`RoutineCache::constructions`].
  pub fn constructions(&self) -> usize {
    self.cache.constructions()
  }

  /// Tear down the context's cache; later requests are misuse errors.
  pub fn teardown(&mut self) {
    debug!(label = %self.label, "tearing down translation context");
    self.cache.teardown();
  }
}
