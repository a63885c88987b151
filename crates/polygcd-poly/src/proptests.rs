//! Property-based tests for polynomial arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::algorithms::gcd::{poly_div_rem, poly_gcd_cofactors};
    use crate::dense::DensePoly;
    use crate::mpolyn::Mpolyn;
    use crate::sparse::SparsePoly;
    use polygcd_rings::FiniteField;

    type F = FiniteField<1_000_003>;

    fn small_coeff() -> impl Strategy<Value = F> {
        (0u64..1_000_003).prop_map(F::new)
    }

    // Degree 0-7
    fn small_poly() -> impl Strategy<Value = DensePoly<F>> {
        proptest::collection::vec(small_coeff(), 0..=8).prop_map(DensePoly::new)
    }

    fn nonzero_poly() -> impl Strategy<Value = DensePoly<F>> {
        small_poly().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    // Up to 6 terms in 3 variables, exponents below 6.
    fn small_sparse() -> impl Strategy<Value = SparsePoly<F>> {
        proptest::collection::vec((proptest::collection::vec(0u64..6, 3), small_coeff()), 0..=6)
            .prop_map(|terms| SparsePoly::from_exponents(3, terms))
    }

    fn nonzero_sparse() -> impl Strategy<Value = SparsePoly<F>> {
        small_sparse().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    proptest! {
        #[test]
        fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn poly_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            let left = a.mul(&b.add(&c));
            let right = a.mul(&b).add(&a.mul(&c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn poly_mul_degree(a in nonzero_poly(), b in nonzero_poly()) {
            let product = a.mul(&b);
            prop_assert_eq!(product.degree(), Some(a.degree().unwrap() + b.degree().unwrap()));
        }

        #[test]
        fn poly_eval_mul(a in small_poly(), b in small_poly(), x in small_coeff()) {
            prop_assert_eq!(a.mul(&b).eval(x), a.eval(x) * b.eval(x));
        }

        #[test]
        fn poly_div_rem_identity(a in small_poly(), b in nonzero_poly()) {
            let (q, r) = poly_div_rem(&a, &b);
            prop_assert_eq!(q.mul(&b).add(&r), a);
            prop_assert!(r.degree() < b.degree());
        }

        #[test]
        fn poly_gcd_divides_common_factor(g in nonzero_poly(), a in nonzero_poly(), b in nonzero_poly()) {
            let (ga, gb) = (g.mul(&a), g.mul(&b));
            let (h, abar, bbar) = poly_gcd_cofactors(&ga, &gb);
            prop_assert_eq!(h.mul(&abar), ga);
            prop_assert_eq!(h.mul(&bbar), gb);
            // g divides the gcd
            prop_assert!(poly_div_rem(&h, &g).1.is_zero());
        }

        #[test]
        fn sparse_mul_div_exact(a in nonzero_sparse(), b in nonzero_sparse()) {
            let ab = a.mul(&b);
            prop_assert_eq!(ab.div_exact(&b), Some(a.clone()));
            prop_assert_eq!(ab.div_exact(&a), Some(b));
        }

        #[test]
        fn sparse_add_sub(a in small_sparse(), b in small_sparse()) {
            prop_assert_eq!(a.add(&b).sub(&b), a);
        }

        #[test]
        fn sparse_eval_is_homomorphism(a in small_sparse(), b in small_sparse(), x in small_coeff(), y in small_coeff()) {
            let point = [F::new(0), x, y];
            let lhs = a.mul(&b).eval_all_but(0, &point);
            let rhs = a.eval_all_but(0, &point).mul(&b.eval_all_but(0, &point));
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn mpolyn_roundtrip(a in small_sparse(), var in 0usize..3) {
            prop_assert_eq!(Mpolyn::from_sparse(&a, var).to_sparse(), a);
        }
    }
}
