//! Property-based tests for the semiring laws.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::Semiring;

    proptest! {
        // Wrapping integer ring axioms

        #[test]
        fn integer_add_commutative(a in any::<i32>(), b in any::<i32>()) {
            prop_assert_eq!(a.add(b), b.add(a));
        }

        #[test]
        fn integer_add_associative(a in any::<i32>(), b in any::<i32>(), c in any::<i32>()) {
            prop_assert_eq!(a.add(b).add(c), a.add(b.add(c)));
        }

        #[test]
        fn integer_mul_associative(a in any::<i64>(), b in any::<i64>(), c in any::<i64>()) {
            prop_assert_eq!(a.mul(b).mul(c), a.mul(b.mul(c)));
        }

        #[test]
        fn integer_distributive(a in any::<u16>(), b in any::<u16>(), c in any::<u16>()) {
            prop_assert_eq!(a.mul(b.add(c)), a.mul(b).add(a.mul(c)));
        }

        #[test]
        fn integer_identities(a in any::<i64>()) {
            prop_assert_eq!(a.add(<i64 as Semiring>::zero()), a);
            prop_assert_eq!(a.mul(<i64 as Semiring>::one()), a);
            prop_assert_eq!(a.mul(<i64 as Semiring>::zero()), 0);
        }

        // Boolean semiring axioms

        #[test]
        fn bool_distributive(a in any::<bool>(), b in any::<bool>(), c in any::<bool>()) {
            prop_assert_eq!(a.mul(b.add(c)), a.mul(b).add(a.mul(c)));
        }

        #[test]
        fn bool_add_idempotent(a in any::<bool>()) {
            prop_assert_eq!(a.add(a), a);
        }
    }
}
