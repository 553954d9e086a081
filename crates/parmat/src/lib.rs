//! # parmat
//!
//! Parallel square-matrix algebra over semirings.
//!
//! parmat adds and multiplies square matrices whose rows are packed for
//! data-parallel arithmetic, and spreads the output rows across a rayon
//! pool.
//!
//! ## Features
//!
//! - **Lane-Packed Numeric Matrices**: rows stored as fixed-width lanes
//! - **Bit-Packed Boolean Matrices**: 64 cells per word, OR/AND arithmetic
//! - **Uniform Contract**: any two matrices over one element type combine
//! - **Selectable Parallelism**: sequential, global pool or a fixed degree
//!
//! ## Quick Start
//!
//! ```rust
//! use parmat::prelude::*;
//!
//! let a = BitMatrix::from_rows(&[[true, false], [false, true]])?;
//! let b = BitMatrix::from_rows(&[[false, true], [true, false]])?;
//! let c = a.parallel_multiply_with(&b, 2)?;
//! assert!(c.get(0, 1)?);
//!
//! let x: LaneMatrix<f64> = LaneMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]])?;
//! let y = x.sequential_add(&GridMatrix::<f64>::identity(2)?)?;
//! assert_eq!(y.get(1, 1)?, 5.0);
//! # Ok::<(), parmat::linalg::MatrixError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use parmat_linalg as linalg;
pub use parmat_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use parmat_linalg::{
        same_cells, to_rows, BitMatrix, GridMatrix, LaneMatrix, Matrix, MatrixError,
        ParallelConfig, Parallelism, RowPartitioner,
    };
    pub use parmat_rings::Semiring;
}
