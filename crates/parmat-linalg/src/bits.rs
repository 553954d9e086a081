//! 64-cell words for boolean matrix rows.
//!
//! A [`BitMatrix`](crate::BitMatrix) row is a slice of [`Bits64`]; column
//! `y` lives in word `y / 64` at bit `y % 64`, least significant first.
//! Combining two rows cell-wise is then one instruction per 64 cells:
//! `|` for the boolean sum, [`Bits64::intersects`] for "some AND is true".

use std::ops::BitOr;

/// Number of cells in one word.
pub const WORD_BITS: usize = 64;

/// One word of a packed boolean row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bits64(pub u64);

impl Bits64 {
    /// The word with no cell set.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw word.
    #[inline]
    #[must_use]
    pub const fn new(word: u64) -> Self {
        Self(word)
    }

    /// The underlying word.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Reads cell `index`.
    #[inline]
    #[must_use]
    pub const fn bit(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    /// Copy of this word with cell `index` overwritten.
    #[inline]
    #[must_use]
    pub const fn with_bit(self, index: usize, value: bool) -> Self {
        let mask = 1 << index;
        Self(if value { self.0 | mask } else { self.0 & !mask })
    }

    /// Number of cells set.
    #[inline]
    #[must_use]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True when no cell is set.
    #[inline]
    #[must_use]
    pub const fn is_clear(self) -> bool {
        self.0 == 0
    }

    /// True when some cell is set in both words.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

/// Cell-wise boolean sum.
impl BitOr for Bits64 {
    type Output = Self;

    #[inline]
    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Boolean dot product of two packed rows: true when some column is set
/// in both. Stops at the first such word.
#[inline]
#[must_use]
pub fn rows_intersect(a: &[Bits64], b: &[Bits64]) -> bool {
    a.iter().zip(b).any(|(x, y)| x.intersects(*y))
}
