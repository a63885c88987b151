//! Property-based tests for field arithmetic.

use proptest::prelude::*;

use crate::finite_field::FiniteField;
use crate::traits::{Field, Ring};

type F = FiniteField<1_000_003>;
type G = FiniteField<{ (1 << 61) - 1 }>;

fn arb_f() -> impl Strategy<Value = F> {
    (0u64..1_000_003).prop_map(F::new)
}

fn arb_g() -> impl Strategy<Value = G> {
    any::<u64>().prop_map(G::new)
}

proptest! {
    #[test]
    fn prop_add_sub_inverse(a in arb_f(), b in arb_f()) {
        prop_assert_eq!((a + b) - b, a);
    }

    #[test]
    fn prop_mul_distributes(a in arb_f(), b in arb_f(), c in arb_f()) {
        prop_assert_eq!(a * (b + c), a * b + a * c);
    }

    #[test]
    fn prop_inverse_is_inverse(a in arb_g()) {
        prop_assume!(!a.is_zero());
        let inv = a.inv().unwrap();
        prop_assert!((a * inv).is_one());
    }

    #[test]
    fn prop_neg_cancels(a in arb_g()) {
        prop_assert!((a + (-a)).is_zero());
    }

    #[test]
    fn prop_pow_adds_exponents(a in arb_f(), m in 0u64..1000, n in 0u64..1000) {
        prop_assert_eq!(Ring::pow(&a, m) * Ring::pow(&a, n), Ring::pow(&a, m + n));
    }
}
