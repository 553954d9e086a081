//! # parmat-rings
//!
//! Element domains for parmat matrices.
//!
//! This crate provides:
//! - The abstract [`Semiring`] trait
//! - Wrapping implementations for every primitive integer (the rings Z/2^k)
//! - IEEE implementations for `f32` and `f64`
//! - The boolean semiring on `bool` (OR / AND)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod primitives;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use traits::Semiring;
