//! Fixed-width vector lanes of semiring elements.
//!
//! A [`Lane`] groups `W` elements so a single operation combines all of
//! them. Lanes are immutable values: writing one element produces a new
//! lane. The element-wise loops are written over fixed-size arrays, which
//! the compiler lowers to SIMD instructions for primitive element types.
//!
//! # Packing rows
//!
//! A row of `n` elements occupies `n.div_ceil(W)` lanes. Elements past `n`
//! in the last lane are zero. Adding zero leaves a cell unchanged; a
//! multiply that broadcasts into padding must re-zero the tail itself,
//! since `0 * inf` is not zero for floats (see [`Lane::truncated`]).

use std::ops::Add;

use num_traits::Zero;
use parmat_rings::Semiring;

/// Default number of elements per lane.
///
/// Eight 32-bit elements fill one 256-bit vector register.
pub const DEFAULT_LANES: usize = 8;

/// `W` elements of a semiring processed together.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct Lane<R, const W: usize>([R; W]);

impl<R: Semiring, const W: usize> Lane<R, W> {
    /// Number of elements in the lane.
    pub const WIDTH: usize = {
        assert!(W > 0, "lane width must be non-zero");
        W
    };

    /// Creates a lane from an array.
    #[inline]
    #[must_use]
    pub const fn new(values: [R; W]) -> Self {
        Self(values)
    }

    /// Creates a lane from up to `W` values, zero-filling the rest.
    ///
    /// Values past the lane width are ignored.
    #[must_use]
    pub fn from_slice(values: &[R]) -> Self {
        let mut lane = [R::zero(); W];
        for (slot, value) in lane.iter_mut().zip(values) {
            *slot = *value;
        }
        Self(lane)
    }

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= W`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> R {
        self.0[index]
    }

    /// Returns a copy of this lane with the element at `index` replaced.
    ///
    /// This copies the whole lane, so it costs O(W).
    ///
    /// # Panics
    ///
    /// Panics if `index >= W`.
    #[inline]
    #[must_use]
    pub fn with(self, index: usize, value: R) -> Self {
        let mut values = self.0;
        values[index] = value;
        Self(values)
    }

    /// Returns a copy of this lane with every element from `from` on set to
    /// zero.
    #[must_use]
    pub fn truncated(self, from: usize) -> Self {
        let mut values = self.0;
        for slot in values.iter_mut().skip(from) {
            *slot = R::zero();
        }
        Self(values)
    }

    /// Returns the elements as an array.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> &[R; W] {
        &self.0
    }

    /// Computes `self + broadcast(scalar) * other` element-wise.
    #[inline]
    #[must_use]
    pub fn mul_add(self, scalar: R, other: Self) -> Self {
        Self(std::array::from_fn(|i| self.0[i].mul_add(scalar, other.0[i])))
    }
}

impl<R: Semiring, const W: usize> Default for Lane<R, W> {
    fn default() -> Self {
        Self([R::zero(); W])
    }
}

impl<R: Semiring, const W: usize> Zero for Lane<R, W> {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.0.iter().all(Semiring::is_zero)
    }
}

impl<R: Semiring, const W: usize> Add for Lane<R, W> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self(std::array::from_fn(|i| R::add(self.0[i], other.0[i])))
    }
}

/// Packs `values` into `lanes`, zero-padding the last lane.
///
/// `lanes` must hold exactly `values.len().div_ceil(W)` lanes.
pub(crate) fn pack_row<R: Semiring, const W: usize>(lanes: &mut [Lane<R, W>], values: &[R]) {
    debug_assert_eq!(lanes.len(), values.len().div_ceil(W));
    for (lane, chunk) in lanes.iter_mut().zip(values.chunks(W)) {
        *lane = Lane::from_slice(chunk);
    }
}
