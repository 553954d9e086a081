//! Semiring implementations for primitive types.
//!
//! - Fixed-width integers form the ring Z/2^k, so addition and
//!   multiplication wrap instead of overflowing.
//! - Floats use IEEE arithmetic as-is.
//! - `bool` is the boolean semiring: OR is addition, AND is multiplication.

use crate::traits::Semiring;

macro_rules! wrapping_semiring {
    ($($t:ty),* $(,)?) => {
        $(
            impl Semiring for $t {
                const ZERO_ANNIHILATES: bool = true;

                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }
            }
        )*
    };
}

wrapping_semiring!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_semiring {
    ($($t:ty),* $(,)?) => {
        $(
            impl Semiring for $t {
                #[inline]
                fn zero() -> Self {
                    0.0
                }

                #[inline]
                fn one() -> Self {
                    1.0
                }

                #[inline]
                fn add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline]
                fn mul(self, rhs: Self) -> Self {
                    self * rhs
                }
            }
        )*
    };
}

float_semiring!(f32, f64);

impl Semiring for bool {
    const ZERO_ANNIHILATES: bool = true;

    #[inline]
    fn zero() -> Self {
        false
    }

    #[inline]
    fn one() -> Self {
        true
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self | rhs
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self & rhs
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}
