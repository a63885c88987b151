//! Property-based tests for the gcd engines.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::brown::try_brown;
    use crate::config::Algorithm;
    use crate::hensel::try_hensel;
    use crate::solver::GcdSolver;
    use crate::strategy::GcdContext;
    use crate::zippel::{try_zippel, try_zippel2};
    use polygcd_poly::SparsePoly;
    use polygcd_rings::FiniteField;

    type F = FiniteField<1_000_003>;

    fn small_coeff() -> impl Strategy<Value = F> {
        (1u64..1_000_003).prop_map(F::new)
    }

    // Up to 4 terms in 3 variables, exponents below 3.
    fn small_sparse() -> impl Strategy<Value = SparsePoly<F>> {
        proptest::collection::vec((proptest::collection::vec(0u64..3, 3), small_coeff()), 1..=4)
            .prop_map(|terms| SparsePoly::from_exponents(3, terms))
            .prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    // (G, U, V) in 3 to 5 variables: G involves every variable and every
    // factor has a constant term, so no closed form settles G U and G V.
    fn shared_factors() -> impl Strategy<Value = (SparsePoly<F>, SparsePoly<F>, SparsePoly<F>)> {
        (3usize..=5).prop_flat_map(|n| {
            let factor = move || {
                proptest::collection::vec((proptest::collection::vec(0u64..3, n), small_coeff()), 1..=3)
                    .prop_map(move |terms| SparsePoly::from_exponents(n, terms))
            };
            (factor(), factor(), factor()).prop_map(move |(g, u, v)| {
                let one = SparsePoly::one(n);
                let linear = (0..n).fold(one.clone(), |s, i| s.add(&SparsePoly::var(i, n)));
                (g.add(&linear), u.add(&one), v.add(&one))
            })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn gcd_cofactors_multiply_back(a in small_sparse(), b in small_sparse()) {
            let r = GcdSolver::default().gcd_cofactors(&a, &b).unwrap();
            prop_assert_eq!(r.g.mul(&r.abar), a);
            prop_assert_eq!(r.g.mul(&r.bbar), b);
            prop_assert_eq!(r.g.leading_coeff(), F::new(1));
        }

        #[test]
        fn common_factor_divides_gcd(a in small_sparse(), b in small_sparse(), c in small_sparse()) {
            let ac = a.mul(&c);
            let bc = b.mul(&c);
            let mut expected = None;
            for algorithm in Algorithm::ALL {
                let r = GcdSolver::with_algorithm(algorithm).gcd_cofactors(&ac, &bc).unwrap();
                prop_assert_eq!(r.g.mul(&r.abar), ac.clone());
                prop_assert_eq!(r.g.mul(&r.bbar), bc.clone());
                prop_assert!(r.g.div_exact(&c).is_some());
                match &expected {
                    None => expected = Some(r.g),
                    Some(g) => prop_assert_eq!(&r.g, g),
                }
            }
        }

        #[test]
        fn every_engine_finds_shared_factor((g, u, v) in shared_factors()) {
            let a = g.mul(&u);
            let b = g.mul(&v);
            let mut expected = None;
            for algorithm in Algorithm::ALL {
                let mut solver = GcdSolver::default();
                let ctx = GcdContext::new(&mut solver, &a, &b);
                let result = match algorithm {
                    Algorithm::Brown => try_brown(&mut solver, &a, &b, &ctx),
                    Algorithm::Zippel => try_zippel(&mut solver, &a, &b, &ctx),
                    Algorithm::Zippel2 => try_zippel2(&mut solver, &a, &b, &ctx),
                    Algorithm::Hensel => try_hensel(&mut solver, &a, &b, &ctx),
                };
                let r = result.map_err(|f| TestCaseError::fail(format!("{algorithm:?}: {f:?}")))?;
                prop_assert_eq!(r.g.mul(&r.abar), a.clone());
                prop_assert_eq!(r.g.mul(&r.bbar), b.clone());
                prop_assert!(r.g.div_exact(&g).is_some());
                let monic = r.g.make_monic();
                match &expected {
                    None => expected = Some(monic),
                    Some(e) => prop_assert_eq!(&monic, e),
                }
            }
        }

        #[test]
        fn cofactors_are_coprime(a in small_sparse(), b in small_sparse()) {
            let mut solver = GcdSolver::default();
            let r = solver.gcd_cofactors(&a, &b).unwrap();
            let g = solver.gcd(&r.abar, &r.bbar).unwrap();
            prop_assert!(g.is_one());
        }

        #[test]
        fn gcd_with_zero_is_monic_input(a in small_sparse()) {
            let zero = SparsePoly::zero(3);
            let g = GcdSolver::default().gcd(&a, &zero).unwrap();
            prop_assert_eq!(g, a.make_monic());
        }
    }
}
