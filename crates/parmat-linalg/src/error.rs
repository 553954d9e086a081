//! Errors raised by matrix construction, access and arithmetic.

use thiserror::Error;

/// Errors that can occur while building or operating on a matrix.
///
/// Every variant is detected before a result matrix is allocated or any
/// partition is spawned, except for errors raised from inside a row
/// closure (for example an out-of-bounds read on a fallback operand),
/// which abort the whole operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// The requested side length cannot be backed by addressable storage.
    #[error("side length {len} is too large to allocate")]
    InvalidSize {
        /// Requested side length.
        len: usize,
    },

    /// A construction grid is not square.
    #[error("grid is not square: row {row} has {found} entries, expected {expected}")]
    DimensionMismatch {
        /// Offending row.
        row: usize,
        /// Number of rows in the grid.
        expected: usize,
        /// Number of entries found in `row`.
        found: usize,
    },

    /// Operands of a binary operation have different side lengths.
    #[error("matrices must be the same length ({left} != {right})")]
    LengthMismatch {
        /// Length of the receiver.
        left: usize,
        /// Length of the operand.
        right: usize,
    },

    /// An index lies outside `[0, len)`.
    #[error("index ({x}, {y}) is out of bounds for a matrix of length {len}")]
    OutOfBounds {
        /// Row index.
        x: usize,
        /// Column index.
        y: usize,
        /// Side length of the matrix.
        len: usize,
    },

    /// A fixed parallel degree of zero was requested.
    #[error("parallel degree must be at least 1, got {threads}")]
    InvalidDegree {
        /// Requested worker count.
        threads: usize,
    },

    /// Rayon could not start the workers for a fixed-degree pool.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, MatrixError>;

impl From<rayon::ThreadPoolBuildError> for MatrixError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = MatrixError::LengthMismatch { left: 3, right: 4 };
        assert_eq!(err.to_string(), "matrices must be the same length (3 != 4)");

        let err = MatrixError::OutOfBounds { x: 5, y: 0, len: 2 };
        assert_eq!(
            err.to_string(),
            "index (5, 0) is out of bounds for a matrix of length 2"
        );

        let err = MatrixError::InvalidDegree { threads: 0 };
        assert!(err.to_string().contains("at least 1"));
    }
}
