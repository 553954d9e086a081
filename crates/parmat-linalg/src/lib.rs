//! # parmat-linalg
//!
//! Square matrices with packed storage and row-parallel arithmetic.
//!
//! This crate provides:
//! - The [`Matrix`] contract: indexed access plus sequential, parallel
//!   and fixed-degree addition and multiplication
//! - [`LaneMatrix`]: rows packed into fixed-width vector lanes
//! - [`BitMatrix`]: boolean rows packed 64 cells to a word
//! - [`GridMatrix`]: plain row-major storage
//! - [`RowPartitioner`]: row-disjoint work distribution via rayon
//!
//! ## Operand Dispatch
//!
//! Binary operations accept any matrix over the same element type:
//! - Same representation: packed fast path (lane arithmetic, word OR/AND)
//! - Different representation: element-by-element fallback through
//!   [`Matrix::get`]
//!
//! Both paths produce identical cells.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bit_matrix;
pub mod bits;
pub mod error;
pub mod grid_matrix;
pub mod lane;
pub mod lane_matrix;
pub mod matrix;
pub mod parallel;

pub use bit_matrix::BitMatrix;
pub use bits::Bits64;
pub use error::{MatrixError, Result};
pub use grid_matrix::GridMatrix;
pub use lane::{Lane, DEFAULT_LANES};
pub use lane_matrix::LaneMatrix;
pub use matrix::{same_cells, to_rows, Matrix};
pub use parallel::{ParallelConfig, Parallelism, RowPartitioner};
pub use parmat_rings::Semiring;
