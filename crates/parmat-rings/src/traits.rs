//! Algebraic structure traits.
//!
//! Matrices in this workspace only ever need an additive identity, a
//! multiplicative identity and the two operations themselves, so the
//! foundation is a semiring rather than a full ring. Every numeric type
//! implementing [`Semiring`] here is in fact a ring; `bool` is the
//! boolean semiring.

use std::fmt::Debug;

/// A semiring is a set with addition and multiplication operations.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative with identity `one()`
/// - Multiplication distributes over addition
/// - `zero()` annihilates: `zero() * a == a * zero() == zero()`, except
///   where [`ZERO_ANNIHILATES`](Self::ZERO_ANNIHILATES) is false
///
/// Elements are small `Copy` values so they can be packed into lanes and
/// shared across worker threads.
pub trait Semiring: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// True when `zero() * a == zero()` holds for every `a`.
    ///
    /// IEEE floats break this (`0.0 * inf` is NaN), so a multiply may only
    /// skip zero terms when this is set.
    const ZERO_ANNIHILATES: bool = false;

    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// The semiring addition.
    #[must_use]
    fn add(self, rhs: Self) -> Self;

    /// The semiring multiplication.
    #[must_use]
    fn mul(self, rhs: Self) -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Computes `self + a * b`.
    #[inline]
    #[must_use]
    fn mul_add(self, a: Self, b: Self) -> Self {
        self.add(a.mul(b))
    }
}
