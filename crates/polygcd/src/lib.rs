//! # polygcd
//!
//! Greatest common divisors, with cofactors, of sparse multivariate
//! polynomials over prime fields.
//!
//! ## Features
//!
//! - **Packed sparse polynomials**: lex order, per-polynomial exponent width
//! - **Four engines**: Brown, Zippel, Zippel2 and Hensel lifting
//! - **Closed forms first**: monomials, deflation, disjoint or missing variables
//! - **Reproducible**: every random choice comes from a seeded generator
//!
//! ## Quick Start
//!
//! ```rust
//! use polygcd::prelude::*;
//!
//! type F = FiniteField<7>;
//! // 3 x^2 y and 5 x y^3
//! let a = SparsePoly::monomial(&[2, 1], F::new(3));
//! let b = SparsePoly::monomial(&[1, 3], F::new(5));
//! let r = gcd_cofactors(&a, &b).unwrap();
//! assert_eq!(r.g, SparsePoly::monomial(&[1, 1], F::new(1)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use polygcd_gcd as gcd;
pub use polygcd_lift as lift;
pub use polygcd_poly as poly;
pub use polygcd_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use polygcd_gcd::{
        gcd, gcd_cofactors, Algorithm, GcdCofactors, GcdConfig, GcdError, GcdSolver,
    };
    pub use polygcd_poly::{DensePoly, SparsePoly};
    pub use polygcd_rings::{FiniteField, PrimeField, Ring};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn p<const P: u64>(nvars: usize, terms: &[(&[u64], i64)]) -> SparsePoly<FiniteField<P>> {
        SparsePoly::from_exponents(
            nvars,
            terms
                .iter()
                .map(|(e, c)| (e.to_vec(), FiniteField::<P>::from_signed(*c)))
                .collect(),
        )
    }

    #[test]
    fn test_common_linear_factor() {
        // (x + 1)(x + y) and (x + 1)(x + 2) over Z/101
        let a = p::<101>(2, &[(&[2, 0], 1), (&[1, 1], 1), (&[1, 0], 1), (&[0, 1], 1)]);
        let b = p::<101>(2, &[(&[2, 0], 1), (&[1, 0], 3), (&[0, 0], 2)]);
        let r = gcd_cofactors(&a, &b).unwrap();
        assert_eq!(r.g, p::<101>(2, &[(&[1, 0], 1), (&[0, 0], 1)]));
        assert_eq!(r.abar, p::<101>(2, &[(&[1, 0], 1), (&[0, 1], 1)]));
        assert_eq!(r.bbar, p::<101>(2, &[(&[1, 0], 1), (&[0, 0], 2)]));
    }

    #[test]
    fn test_monomials() {
        // 3 x^2 y and 5 x y^3 over Z/7
        let a = p::<7>(2, &[(&[2, 1], 3)]);
        let b = p::<7>(2, &[(&[1, 3], 5)]);
        let r = gcd_cofactors(&a, &b).unwrap();
        assert_eq!(r.g, p::<7>(2, &[(&[1, 1], 1)]));
        assert_eq!(r.abar, p::<7>(2, &[(&[1, 0], 3)]));
        assert_eq!(r.bbar, p::<7>(2, &[(&[0, 2], 5)]));
    }

    #[test]
    fn test_disjoint_variables() {
        let a = p::<101>(2, &[(&[1, 0], 1), (&[0, 0], 1)]);
        let b = p::<101>(2, &[(&[0, 1], 1), (&[0, 0], 1)]);
        let r = gcd_cofactors(&a, &b).unwrap();
        assert!(r.g.is_one());
        assert_eq!(r.abar, a);
        assert_eq!(r.bbar, b);
    }

    #[test]
    fn test_gcd_of_zero() {
        let a = p::<101>(2, &[(&[1, 1], 4), (&[0, 0], 2)]);
        let zero = SparsePoly::zero(2);
        assert_eq!(gcd(&a, &zero).unwrap(), a.make_monic());
        assert!(gcd(&zero, &zero).unwrap().is_zero());
    }

    #[test]
    fn test_every_engine_agrees() {
        // G = x0 x1 + x2^2 + 1 times sparse cofactors in four variables
        let g = p::<1_000_003>(4, &[(&[1, 1, 0, 0], 1), (&[0, 0, 2, 0], 1), (&[0, 0, 0, 0], 1)]);
        let a = g.mul(&p(4, &[(&[1, 0, 0, 1], 1), (&[0, 1, 1, 0], 2), (&[0, 0, 0, 0], 3)]));
        let b = g.mul(&p(4, &[(&[2, 0, 0, 0], 1), (&[0, 0, 1, 1], 5), (&[0, 1, 0, 0], 1)]));
        for algorithm in Algorithm::ALL {
            let r = GcdSolver::with_algorithm(algorithm).gcd_cofactors(&a, &b).unwrap();
            assert_eq!(r.g, g, "{algorithm:?}");
            assert_eq!(r.g.mul(&r.abar), a);
            assert_eq!(r.g.mul(&r.bbar), b);
        }
    }
}
