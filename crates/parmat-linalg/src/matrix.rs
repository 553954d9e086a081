//! The polymorphic matrix contract.
//!
//! [`Matrix`] is the operation set every square matrix in this crate
//! supports. Binary operations take their operand as a trait object, so a
//! lane-packed matrix can be added to a bit-packed one (of the same element
//! type) or to any user-defined implementation. Each concrete type checks
//! whether the operand shares its representation and, if so, runs a packed
//! fast path; otherwise it falls back to an element-by-element loop that
//! only uses [`Matrix::get`] on the operand.

use std::any::Any;

use parmat_rings::Semiring;

use crate::error::{MatrixError, Result};
use crate::parallel::{ParallelConfig, Parallelism, RowPartitioner};

/// A square matrix over a semiring.
///
/// Every operation returns a freshly allocated matrix; operands are only
/// read. Binary operations fail with [`MatrixError::LengthMismatch`] when
/// the operands differ in side length.
pub trait Matrix: Send + Sync + 'static {
    /// The element domain.
    type Elem: Semiring;

    /// Returns the side length.
    fn len(&self) -> usize;

    /// Returns true for the 0 x 0 matrix.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at row `x`, column `y`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::OutOfBounds`] when `x` or `y` is not below
    /// [`len`](Self::len).
    fn get(&self, x: usize, y: usize) -> Result<Self::Elem>;

    /// Overwrites the element at row `x`, column `y`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::OutOfBounds`] when `x` or `y` is not below
    /// [`len`](Self::len).
    fn set(&mut self, x: usize, y: usize, value: Self::Elem) -> Result<()>;

    /// Returns `self` as [`Any`], used to detect operands that share the
    /// receiver's representation.
    fn as_any(&self) -> &dyn Any;

    /// Computes `self + other`, distributing output rows with `partitioner`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::LengthMismatch`] for operands of different
    /// length, or any error raised while reading `other`.
    fn add_partitioned(
        &self,
        other: &dyn Matrix<Elem = Self::Elem>,
        partitioner: &RowPartitioner,
    ) -> Result<Self>
    where
        Self: Sized;

    /// Computes `self * other`, distributing output rows with `partitioner`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::LengthMismatch`] for operands of different
    /// length, or any error raised while reading `other`.
    fn multiply_partitioned(
        &self,
        other: &dyn Matrix<Elem = Self::Elem>,
        partitioner: &RowPartitioner,
    ) -> Result<Self>
    where
        Self: Sized;

    /// Computes `self + other` on the calling thread.
    ///
    /// # Errors
    ///
    /// See [`add_partitioned`](Self::add_partitioned).
    fn sequential_add(&self, other: &dyn Matrix<Elem = Self::Elem>) -> Result<Self>
    where
        Self: Sized,
    {
        self.add_partitioned(other, &RowPartitioner::sequential())
    }

    /// Computes `self + other` on rayon's global pool.
    ///
    /// # Errors
    ///
    /// See [`add_partitioned`](Self::add_partitioned).
    fn parallel_add(&self, other: &dyn Matrix<Elem = Self::Elem>) -> Result<Self>
    where
        Self: Sized,
    {
        self.add_partitioned(other, &RowPartitioner::parallel())
    }

    /// Computes `self + other` with at most `threads` concurrent workers.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidDegree`] when `threads` is zero, and
    /// otherwise see [`add_partitioned`](Self::add_partitioned).
    fn parallel_add_with(
        &self,
        other: &dyn Matrix<Elem = Self::Elem>,
        threads: usize,
    ) -> Result<Self>
    where
        Self: Sized,
    {
        let partitioner = fixed_partitioner(self.len(), other.len(), threads)?;
        self.add_partitioned(other, &partitioner)
    }

    /// Computes `self * other` on the calling thread.
    ///
    /// # Errors
    ///
    /// See [`multiply_partitioned`](Self::multiply_partitioned).
    fn sequential_multiply(&self, other: &dyn Matrix<Elem = Self::Elem>) -> Result<Self>
    where
        Self: Sized,
    {
        self.multiply_partitioned(other, &RowPartitioner::sequential())
    }

    /// Computes `self * other` on rayon's global pool.
    ///
    /// # Errors
    ///
    /// See [`multiply_partitioned`](Self::multiply_partitioned).
    fn parallel_multiply(&self, other: &dyn Matrix<Elem = Self::Elem>) -> Result<Self>
    where
        Self: Sized,
    {
        self.multiply_partitioned(other, &RowPartitioner::parallel())
    }

    /// Computes `self * other` with at most `threads` concurrent workers.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidDegree`] when `threads` is zero, and
    /// otherwise see [`multiply_partitioned`](Self::multiply_partitioned).
    fn parallel_multiply_with(
        &self,
        other: &dyn Matrix<Elem = Self::Elem>,
        threads: usize,
    ) -> Result<Self>
    where
        Self: Sized,
    {
        let partitioner = fixed_partitioner(self.len(), other.len(), threads)?;
        self.multiply_partitioned(other, &partitioner)
    }
}

/// Validates the degree and lengths before spawning a dedicated pool of at
/// most one worker per row.
fn fixed_partitioner(left: usize, right: usize, threads: usize) -> Result<RowPartitioner> {
    let policy = Parallelism::fixed(threads)?;
    check_same_len(left, right)?;
    RowPartitioner::new(policy.capped(left), ParallelConfig::default())
}

/// Copies any matrix into a 2-D grid.
///
/// # Errors
///
/// Propagates errors from [`Matrix::get`].
pub fn to_rows<M: Matrix + ?Sized>(matrix: &M) -> Result<Vec<Vec<M::Elem>>> {
    let n = matrix.len();
    (0..n)
        .map(|x| (0..n).map(|y| matrix.get(x, y)).collect::<Result<Vec<_>>>())
        .collect()
}

/// Returns true if two matrices have the same length and equal cells,
/// regardless of representation.
///
/// # Errors
///
/// Propagates errors from [`Matrix::get`].
pub fn same_cells<A, B>(a: &A, b: &B) -> Result<bool>
where
    A: Matrix + ?Sized,
    B: Matrix<Elem = A::Elem> + ?Sized,
{
    if a.len() != b.len() {
        return Ok(false);
    }
    let n = a.len();
    for x in 0..n {
        for y in 0..n {
            if a.get(x, y)? != b.get(x, y)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Fills `out` with row `row` of `a + b`, reading both operands cell by
/// cell.
pub(crate) fn fallback_add_row<T: Semiring>(
    a: &dyn Matrix<Elem = T>,
    b: &dyn Matrix<Elem = T>,
    row: usize,
    out: &mut [T],
) -> Result<()> {
    for (col, cell) in out.iter_mut().enumerate() {
        *cell = a.get(row, col)?.add(b.get(row, col)?);
    }
    Ok(())
}

/// Fills `out` with row `row` of `a * b`, reading both operands cell by
/// cell.
pub(crate) fn fallback_multiply_row<T: Semiring>(
    a: &dyn Matrix<Elem = T>,
    b: &dyn Matrix<Elem = T>,
    row: usize,
    out: &mut [T],
) -> Result<()> {
    let n = a.len();
    for (col, cell) in out.iter_mut().enumerate() {
        let mut acc = T::zero();
        for k in 0..n {
            acc = acc.mul_add(a.get(row, k)?, b.get(k, col)?);
        }
        *cell = acc;
    }
    Ok(())
}

pub(crate) fn check_bounds(len: usize, x: usize, y: usize) -> Result<()> {
    if x < len && y < len {
        Ok(())
    } else {
        Err(MatrixError::OutOfBounds { x, y, len })
    }
}

pub(crate) fn check_same_len(left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(MatrixError::LengthMismatch { left, right })
    }
}

/// Checks that `rows` forms a square grid and returns its side length.
pub(crate) fn check_square<T, Row: AsRef<[T]>>(rows: &[Row]) -> Result<usize> {
    let expected = rows.len();
    for (row, values) in rows.iter().enumerate() {
        let found = values.as_ref().len();
        if found != expected {
            return Err(MatrixError::DimensionMismatch {
                row,
                expected,
                found,
            });
        }
    }
    Ok(expected)
}

/// Returns the number of `S` items needed for `len` rows of `per_row`
/// items each, or [`MatrixError::InvalidSize`] when the buffer could not be
/// addressed.
pub(crate) fn storage_len<S>(len: usize, per_row: usize) -> Result<usize> {
    let max_bytes = isize::MAX.unsigned_abs();
    len.checked_mul(per_row)
        .filter(|&items| {
            items
                .checked_mul(std::mem::size_of::<S>())
                .is_some_and(|bytes| bytes <= max_bytes)
        })
        .ok_or(MatrixError::InvalidSize { len })
}
