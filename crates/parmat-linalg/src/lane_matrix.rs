//! Dense matrices packed into vector lanes.
//!
//! Each row of an N x N matrix is stored as `ceil(N / W)` lanes of `W`
//! elements, rows laid out one after another. Addition of two lane
//! matrices is one lane addition per `W` cells. Multiplication is the
//! outer-product form of the triple loop:
//!
//! ```text
//! result.row(i) += broadcast(self[i][j]) * second.row(j)   for all j
//! ```
//!
//! which keeps every inner step a full-lane multiply-add instead of a
//! scalar dot product down a column.

use std::any::Any;

use log::debug;
use num_traits::Zero;
use parmat_rings::Semiring;

use crate::error::Result;
use crate::lane::{pack_row, Lane, DEFAULT_LANES};
use crate::matrix::{
    check_bounds, check_same_len, check_square, fallback_add_row, fallback_multiply_row,
    storage_len, Matrix,
};
use crate::parallel::RowPartitioner;

/// Square matrix whose rows are packed into lanes of `W` elements.
///
/// Lane elements past the side length are always zero.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneMatrix<R, const W: usize = DEFAULT_LANES> {
    /// Lanes in row-major order, `lanes_per_row` per row.
    lanes: Vec<Lane<R, W>>,
    /// Side length.
    len: usize,
    /// Number of lanes in each row.
    lanes_per_row: usize,
}

impl<R: Semiring, const W: usize> LaneMatrix<R, W> {
    /// Creates a new matrix filled with zeros.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidSize`](crate::MatrixError::InvalidSize)
    /// when the lane storage would exceed the address space.
    pub fn new(len: usize) -> Result<Self> {
        let lanes_per_row = len.div_ceil(Lane::<R, W>::WIDTH);
        let total = storage_len::<Lane<R, W>>(len, lanes_per_row)?;
        Ok(Self {
            lanes: vec![Lane::zero(); total],
            len,
            lanes_per_row,
        })
    }

    /// Creates a matrix by copying a square 2-D grid.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`MatrixError::DimensionMismatch`](crate::MatrixError::DimensionMismatch)
    /// when some row's length differs from the number of rows.
    pub fn from_rows<Row: AsRef<[R]>>(rows: &[Row]) -> Result<Self> {
        let len = check_square::<R, _>(rows)?;
        let mut matrix = Self::new(len)?;
        if len > 0 {
            for (lanes, values) in matrix.lanes.chunks_mut(matrix.lanes_per_row).zip(rows) {
                pack_row(lanes, values.as_ref());
            }
        }
        Ok(matrix)
    }

    /// Creates an identity matrix.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn identity(len: usize) -> Result<Self> {
        let mut matrix = Self::new(len)?;
        for i in 0..len {
            let index = matrix.lane_index(i, i);
            matrix.lanes[index] = matrix.lanes[index].with(i % W, R::one());
        }
        Ok(matrix)
    }

    /// Returns the number of elements per lane.
    #[must_use]
    pub const fn lane_width() -> usize {
        W
    }

    /// Returns the number of lanes in each row.
    #[must_use]
    pub fn lanes_per_row(&self) -> usize {
        self.lanes_per_row
    }

    /// Returns the packed lanes of the specified row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    #[must_use]
    pub fn row_lanes(&self, row: usize) -> &[Lane<R, W>] {
        assert!(row < self.len, "row {row} out of range");
        let start = row * self.lanes_per_row;
        &self.lanes[start..start + self.lanes_per_row]
    }

    #[inline]
    fn lane_index(&self, x: usize, y: usize) -> usize {
        x * self.lanes_per_row + y / W
    }

    #[inline]
    fn cell(&self, x: usize, y: usize) -> R {
        self.lanes[self.lane_index(x, y)].get(y % W)
    }

    /// A zero matrix with the same shape; cannot fail since `self` already
    /// holds storage of that size.
    fn zeroed_like(&self) -> Self {
        Self {
            lanes: vec![Lane::zero(); self.lanes.len()],
            len: self.len,
            lanes_per_row: self.lanes_per_row,
        }
    }
}

impl<R: Semiring, const W: usize> Matrix for LaneMatrix<R, W> {
    type Elem = R;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, x: usize, y: usize) -> Result<R> {
        check_bounds(self.len, x, y)?;
        Ok(self.cell(x, y))
    }

    /// Rebuilds the lane holding `(x, y)`: a single write costs O(W).
    fn set(&mut self, x: usize, y: usize, value: R) -> Result<()> {
        check_bounds(self.len, x, y)?;
        let index = self.lane_index(x, y);
        self.lanes[index] = self.lanes[index].with(y % W, value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn add_partitioned(
        &self,
        other: &dyn Matrix<Elem = R>,
        partitioner: &RowPartitioner,
    ) -> Result<Self> {
        check_same_len(self.len, other.len())?;
        let mut result = self.zeroed_like();

        if let Some(second) = other.as_any().downcast_ref::<Self>() {
            debug!("lane add: packed path, len {} width {W}", self.len);
            partitioner.for_each_row(&mut result.lanes, self.lanes_per_row, |i, out| {
                let pairs = self.row_lanes(i).iter().zip(second.row_lanes(i));
                for (slot, (a, b)) in out.iter_mut().zip(pairs) {
                    *slot = *a + *b;
                }
                Ok(())
            })?;
        } else {
            debug!("lane add: element fallback, len {}", self.len);
            let n = self.len;
            partitioner.for_each_row(&mut result.lanes, self.lanes_per_row, |i, out| {
                let mut values = vec![R::zero(); n];
                fallback_add_row::<R>(self, other, i, &mut values)?;
                pack_row(out, &values);
                Ok(())
            })?;
        }

        Ok(result)
    }

    fn multiply_partitioned(
        &self,
        other: &dyn Matrix<Elem = R>,
        partitioner: &RowPartitioner,
    ) -> Result<Self> {
        check_same_len(self.len, other.len())?;
        let mut result = self.zeroed_like();
        let n = self.len;

        if let Some(second) = other.as_any().downcast_ref::<Self>() {
            debug!("lane multiply: broadcast path, len {n} width {W}");
            // Valid elements in the last lane of each row.
            let last_valid = n - self.lanes_per_row.saturating_sub(1) * W;
            partitioner.for_each_row(&mut result.lanes, self.lanes_per_row, |i, out| {
                for j in 0..n {
                    let scalar = self.cell(i, j);
                    if R::ZERO_ANNIHILATES && scalar.is_zero() {
                        continue;
                    }
                    for (acc, b) in out.iter_mut().zip(second.row_lanes(j)) {
                        *acc = acc.mul_add(scalar, *b);
                    }
                }
                // 0 * inf in the padding would otherwise leave NaN there.
                if let Some(last) = out.last_mut() {
                    *last = last.truncated(last_valid);
                }
                Ok(())
            })?;
        } else {
            debug!("lane multiply: element fallback, len {n}");
            partitioner.for_each_row(&mut result.lanes, self.lanes_per_row, |i, out| {
                let mut values = vec![R::zero(); n];
                fallback_multiply_row::<R>(self, other, i, &mut values)?;
                pack_row(out, &values);
                Ok(())
            })?;
        }

        Ok(result)
    }
}
