//! Plain row-major matrices.
//!
//! [`GridMatrix`] keeps one element per cell in a flat vector. It has no
//! packing overhead, so single-cell access is O(1) and it serves as the
//! reference representation when checking the packed types.

use std::any::Any;
use std::ops::{Index, IndexMut};

use log::debug;
use parmat_rings::Semiring;

use crate::error::Result;
use crate::matrix::{
    check_bounds, check_same_len, check_square, fallback_add_row, fallback_multiply_row,
    storage_len, Matrix,
};
use crate::parallel::RowPartitioner;

/// Square matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMatrix<R> {
    /// Matrix entries in row-major order.
    data: Vec<R>,
    /// Side length.
    len: usize,
}

impl<R: Semiring> GridMatrix<R> {
    /// Creates a new matrix filled with zeros.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidSize`](crate::MatrixError::InvalidSize)
    /// when the storage would exceed the address space.
    pub fn new(len: usize) -> Result<Self> {
        let total = storage_len::<R>(len, len)?;
        Ok(Self {
            data: vec![R::zero(); total],
            len,
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
        let data = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Ok(Self { data, len })
    }

    /// Creates an identity matrix.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn identity(len: usize) -> Result<Self> {
        let mut m = Self::new(len)?;
        for i in 0..len {
            m[(i, i)] = R::one();
        }
        Ok(m)
    }

    /// Returns a slice of the specified row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[R] {
        let start = row * self.len;
        &self.data[start..start + self.len]
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut result = self.clone();
        for i in 0..self.len {
            for j in 0..self.len {
                result[(j, i)] = self[(i, j)];
            }
        }
        result
    }
}

impl<R: Semiring> Matrix for GridMatrix<R> {
    type Elem = R;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, x: usize, y: usize) -> Result<R> {
        check_bounds(self.len, x, y)?;
        Ok(self[(x, y)])
    }

    fn set(&mut self, x: usize, y: usize, value: R) -> Result<()> {
        check_bounds(self.len, x, y)?;
        self[(x, y)] = value;
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
        let mut result = Self {
            data: vec![R::zero(); self.data.len()],
            len: self.len,
        };

        match other.as_any().downcast_ref::<Self>() {
            Some(second) => {
                debug!("grid add: direct path, len {}", self.len);
                partitioner.for_each_row(&mut result.data, self.len, |i, out| {
                    for ((slot, a), b) in out.iter_mut().zip(self.row(i)).zip(second.row(i)) {
                        *slot = a.add(*b);
                    }
                    Ok(())
                })?;
            }
            None => {
                debug!("grid add: element fallback, len {}", self.len);
                partitioner.for_each_row(&mut result.data, self.len, |i, out| {
                    fallback_add_row::<R>(self, other, i, out)
                })?;
            }
        }

        Ok(result)
    }

    fn multiply_partitioned(
        &self,
        other: &dyn Matrix<Elem = R>,
        partitioner: &RowPartitioner,
    ) -> Result<Self> {
        check_same_len(self.len, other.len())?;
        let mut result = Self {
            data: vec![R::zero(); self.data.len()],
            len: self.len,
        };

        match other.as_any().downcast_ref::<Self>() {
            Some(second) => {
                debug!("grid multiply: i-k-j path, len {}", self.len);
                partitioner.for_each_row(&mut result.data, self.len, |i, out| {
                    for (k, &scalar) in self.row(i).iter().enumerate() {
                        if R::ZERO_ANNIHILATES && scalar.is_zero() {
                            continue;
                        }
                        for (acc, b) in out.iter_mut().zip(second.row(k)) {
                            *acc = acc.mul_add(scalar, *b);
                        }
                    }
                    Ok(())
                })?;
            }
            None => {
                debug!("grid multiply: element fallback, len {}", self.len);
                partitioner.for_each_row(&mut result.data, self.len, |i, out| {
                    fallback_multiply_row::<R>(self, other, i, out)
                })?;
            }
        }

        Ok(result)
    }
}

impl<R> Index<(usize, usize)> for GridMatrix<R> {
    type Output = R;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.len + col]
    }
}

impl<R> IndexMut<(usize, usize)> for GridMatrix<R> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.len + col]
    }
}
