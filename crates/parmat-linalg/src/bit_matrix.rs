//! Bit-packed boolean matrices.
//!
//! A row of N booleans is stored as `ceil(N / 64)` [`Bits64`] words, bit
//! `y % 64` of word `y / 64` holding column `y`. Bits past N are always
//! clear.
//!
//! Arithmetic is the boolean semiring: addition is OR and multiplication
//! is AND, so the product answers path existence. Cell `(i, j)` of
//! `A * B` is set when some `k` has both `A[i][k]` and `B[k][j]`.
//!
//! # Multiplication
//!
//! The second operand is transposed once, before any row is handed out.
//! Column `j` of `B` then lies in one packed row, and output cell `(i, j)`
//! is a word-wise AND of two rows folded with OR, stopping at the first
//! shared bit.

use std::any::Any;

use log::debug;

use crate::bits::{rows_intersect, Bits64, WORD_BITS};
use crate::error::Result;
use crate::matrix::{
    check_bounds, check_same_len, check_square, fallback_add_row, fallback_multiply_row,
    storage_len, Matrix,
};
use crate::parallel::RowPartitioner;

/// Square boolean matrix packed 64 cells to a word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    words: Vec<Bits64>,
    len: usize,
    words_per_row: usize,
}

impl BitMatrix {
    /// Creates a new all-false matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidSize`](crate::MatrixError::InvalidSize)
    /// when the word storage would exceed the address space.
    pub fn new(len: usize) -> Result<Self> {
        let words_per_row = len.div_ceil(WORD_BITS);
        let total = storage_len::<Bits64>(len, words_per_row)?;
        Ok(Self {
            words: vec![Bits64::ZERO; total],
            len,
            words_per_row,
        })
    }

    /// Creates a matrix by packing a square 2-D grid.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`MatrixError::DimensionMismatch`](crate::MatrixError::DimensionMismatch)
    /// when some row's length differs from the number of rows.
    pub fn from_rows<Row: AsRef<[bool]>>(rows: &[Row]) -> Result<Self> {
        let len = check_square::<bool, _>(rows)?;
        let mut matrix = Self::new(len)?;
        if len > 0 {
            for (words, values) in matrix.words.chunks_mut(matrix.words_per_row).zip(rows) {
                pack_bits(words, values.as_ref());
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
            matrix.put(i, i, true);
        }
        Ok(matrix)
    }

    /// Returns the number of words in each row.
    #[must_use]
    pub fn words_per_row(&self) -> usize {
        self.words_per_row
    }

    /// Returns the packed words of the specified row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.len()`.
    #[must_use]
    pub fn row_words(&self, row: usize) -> &[Bits64] {
        assert!(row < self.len, "row {row} out of range");
        let start = row * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut result = Self {
            words: vec![Bits64::ZERO; self.words.len()],
            len: self.len,
            words_per_row: self.words_per_row,
        };
        for i in 0..self.len {
            for (w, word) in self.row_words(i).iter().enumerate() {
                let mut bits = word.raw();
                while bits != 0 {
                    let j = w * WORD_BITS + bits.trailing_zeros() as usize;
                    result.put(j, i, true);
                    bits &= bits - 1;
                }
            }
        }
        result
    }

    /// Counts the true cells.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count()).sum()
    }

    #[inline]
    fn word_index(&self, x: usize, y: usize) -> usize {
        x * self.words_per_row + y / WORD_BITS
    }

    #[inline]
    fn cell(&self, x: usize, y: usize) -> bool {
        self.words[self.word_index(x, y)].bit(y % WORD_BITS)
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, value: bool) {
        let index = self.word_index(x, y);
        self.words[index] = self.words[index].with_bit(y % WORD_BITS, value);
    }

    fn cleared_like(&self) -> Self {
        Self {
            words: vec![Bits64::ZERO; self.words.len()],
            len: self.len,
            words_per_row: self.words_per_row,
        }
    }
}

/// Packs `values` into `words`, leaving the bits past the end clear.
fn pack_bits(words: &mut [Bits64], values: &[bool]) {
    for (word, chunk) in words.iter_mut().zip(values.chunks(WORD_BITS)) {
        *word = chunk
            .iter()
            .enumerate()
            .fold(Bits64::ZERO, |acc, (bit, &value)| acc.with_bit(bit, value));
    }
}

impl Matrix for BitMatrix {
    type Elem = bool;

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, x: usize, y: usize) -> Result<bool> {
        check_bounds(self.len, x, y)?;
        Ok(self.cell(x, y))
    }

    fn set(&mut self, x: usize, y: usize, value: bool) -> Result<()> {
        check_bounds(self.len, x, y)?;
        self.put(x, y, value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn add_partitioned(
        &self,
        other: &dyn Matrix<Elem = bool>,
        partitioner: &RowPartitioner,
    ) -> Result<Self> {
        check_same_len(self.len, other.len())?;
        let mut result = self.cleared_like();

        if let Some(second) = other.as_any().downcast_ref::<Self>() {
            debug!("bit add: word OR path, len {}", self.len);
            partitioner.for_each_row(&mut result.words, self.words_per_row, |i, out| {
                let pairs = self.row_words(i).iter().zip(second.row_words(i));
                for (slot, (a, b)) in out.iter_mut().zip(pairs) {
                    *slot = *a | *b;
                }
                Ok(())
            })?;
        } else {
            debug!("bit add: element fallback, len {}", self.len);
            let n = self.len;
            partitioner.for_each_row(&mut result.words, self.words_per_row, |i, out| {
                let mut values = vec![false; n];
                fallback_add_row::<bool>(self, other, i, &mut values)?;
                pack_bits(out, &values);
                Ok(())
            })?;
        }

        Ok(result)
    }

    fn multiply_partitioned(
        &self,
        other: &dyn Matrix<Elem = bool>,
        partitioner: &RowPartitioner,
    ) -> Result<Self> {
        check_same_len(self.len, other.len())?;
        let mut result = self.cleared_like();
        let n = self.len;

        if let Some(second) = other.as_any().downcast_ref::<Self>() {
            debug!("bit multiply: transposed intersect path, len {n}");
            let columns = second.transpose();
            partitioner.for_each_row(&mut result.words, self.words_per_row, |i, out| {
                let row = self.row_words(i);
                if row.iter().all(|w| w.is_clear()) {
                    return Ok(());
                }
                for j in 0..n {
                    if rows_intersect(row, columns.row_words(j)) {
                        let word = &mut out[j / WORD_BITS];
                        *word = word.with_bit(j % WORD_BITS, true);
                    }
                }
                Ok(())
            })?;
        } else {
            debug!("bit multiply: element fallback, len {n}");
            partitioner.for_each_row(&mut result.words, self.words_per_row, |i, out| {
                let mut values = vec![false; n];
                fallback_multiply_row::<bool>(self, other, i, &mut values)?;
                pack_bits(out, &values);
                Ok(())
            })?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatrixError;
    use crate::matrix::to_rows;

    const T: bool = true;
    const F: bool = false;

    #[test]
    fn test_new() {
        let m = BitMatrix::new(65).unwrap();
        assert_eq!(m.len(), 65);
        assert_eq!(m.words_per_row(), 2);
        assert_eq!(m.count_ones(), 0);
        assert!(BitMatrix::new(0).unwrap().is_empty());
    }

    #[test]
    fn test_oversized() {
        assert_eq!(
            BitMatrix::new(usize::MAX),
            Err(MatrixError::InvalidSize { len: usize::MAX })
        );
    }

    #[test]
    fn test_from_rows() {
        let grid = [[T, F, T], [F, T, T], [T, F, F]];
        let m = BitMatrix::from_rows(&grid).unwrap();
        assert_eq!(to_rows(&m).unwrap(), grid.map(Vec::from).to_vec());
        assert_eq!(m.row_words(0), &[Bits64::new(0b101)]);
        assert_eq!(m.count_ones(), 5);
    }

    #[test]
    fn test_get_set_across_words() {
        let mut m = BitMatrix::new(70).unwrap();
        m.set(69, 64, true).unwrap();
        m.set(0, 63, true).unwrap();
        assert_eq!(m.get(69, 64), Ok(true));
        assert_eq!(m.get(0, 63), Ok(true));
        assert_eq!(m.get(0, 64), Ok(false));
        m.set(0, 63, false).unwrap();
        assert_eq!(m.count_ones(), 1);
        assert_eq!(
            m.get(70, 0),
            Err(MatrixError::OutOfBounds { x: 70, y: 0, len: 70 })
        );
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut m = BitMatrix::new(70).unwrap();
        assert_eq!(
            m.set(70, 0, true),
            Err(MatrixError::OutOfBounds { x: 70, y: 0, len: 70 })
        );
        assert_eq!(
            m.set(0, 70, true),
            Err(MatrixError::OutOfBounds { x: 0, y: 70, len: 70 })
        );
        // Column 70 would land in the padding of word 1.
        assert_eq!(m.count_ones(), 0);
        assert_eq!(m.row_words(0), &[Bits64::ZERO, Bits64::ZERO]);
    }

    #[test]
    fn test_path_product() {
        let a = BitMatrix::from_rows(&[[T, F, T], [F, T, T], [T, F, F]]).unwrap();
        let b = BitMatrix::from_rows(&[[F, T, T], [T, F, F], [F, F, F]]).unwrap();
        let expected = BitMatrix::from_rows(&[[F, T, T], [T, F, F], [F, T, T]]).unwrap();

        assert_eq!(a.sequential_multiply(&b).unwrap(), expected);
        assert_eq!(a.parallel_multiply(&b).unwrap(), expected);
        assert_eq!(a.parallel_multiply_with(&b, 2).unwrap(), expected);
    }

    #[test]
    fn test_add_is_or() {
        let a = BitMatrix::from_rows(&[[T, T], [F, F]]).unwrap();
        let b = BitMatrix::from_rows(&[[T, F], [T, F]]).unwrap();
        let sum = a.sequential_add(&b).unwrap();
        // OR, not XOR: (0, 0) stays set.
        assert_eq!(to_rows(&sum).unwrap(), vec![vec![T, T], vec![T, F]]);
        assert_eq!(a.parallel_add(&b).unwrap(), sum);
    }

    #[test]
    fn test_transpose() {
        let mut m = BitMatrix::new(130).unwrap();
        m.set(1, 129, true).unwrap();
        m.set(128, 0, true).unwrap();
        let t = m.transpose();
        assert_eq!(t.get(129, 1), Ok(true));
        assert_eq!(t.get(0, 128), Ok(true));
        assert_eq!(t.count_ones(), 2);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn test_identity() {
        let id = BitMatrix::identity(67).unwrap();
        assert_eq!(id.count_ones(), 67);
        let mut m = BitMatrix::new(67).unwrap();
        m.set(3, 66, true).unwrap();
        m.set(65, 2, true).unwrap();
        assert_eq!(m.sequential_multiply(&id).unwrap(), m);
        assert_eq!(id.parallel_multiply(&m).unwrap(), m);
    }

    #[test]
    fn test_padding_stays_clear() {
        let mut m = BitMatrix::new(3).unwrap();
        for x in 0..3 {
            for y in 0..3 {
                m.set(x, y, true).unwrap();
            }
        }
        let product = m.sequential_multiply(&m).unwrap();
        for i in 0..3 {
            assert_eq!(product.row_words(i), &[Bits64::new(0b111)]);
        }
    }

    #[test]
    fn test_length_mismatch() {
        let a = BitMatrix::new(2).unwrap();
        let b = BitMatrix::new(3).unwrap();
        assert_eq!(
            a.sequential_multiply(&b),
            Err(MatrixError::LengthMismatch { left: 2, right: 3 })
        );
        assert_eq!(
            b.parallel_add(&a),
            Err(MatrixError::LengthMismatch { left: 3, right: 2 })
        );
    }
}
