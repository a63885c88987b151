//! Closed-form cases that need no evaluation points.

use polygcd_poly::algorithms::gcd::poly_gcd;
use polygcd_poly::{Mpolyn, Mpolyu, SparsePoly};
use polygcd_rings::PrimeField;
use tracing::trace;

use crate::error::Failure;
use crate::solver::{GcdCofactors, GcdSolver};
use crate::strategy::GcdContext;

/// At least one input is zero.
pub(crate) fn zero_gcd<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> GcdCofactors<F> {
    let n = a.nvars().max(b.nvars());
    match (a.is_zero(), b.is_zero()) {
        (true, true) => GcdCofactors {
            g: SparsePoly::zero(n),
            abar: SparsePoly::zero(n),
            bbar: SparsePoly::zero(n),
        },
        (true, false) => GcdCofactors {
            g: b.make_monic(),
            abar: SparsePoly::zero(n),
            bbar: SparsePoly::constant(b.leading_coeff(), n),
        },
        _ => GcdCofactors {
            g: a.make_monic(),
            abar: SparsePoly::constant(a.leading_coeff(), n),
            bbar: SparsePoly::zero(n),
        },
    }
}

/// One input is a monomial: the gcd is the monomial of minimum exponents.
pub(crate) fn monomial_gcd<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> GcdCofactors<F> {
    let exps: Vec<u64> = a
        .min_exponents()
        .into_iter()
        .zip(b.min_exponents())
        .map(|(x, y)| x.min(y))
        .collect();
    GcdCofactors {
        g: SparsePoly::monomial(&exps, F::one()),
        abar: a.div_monomial(&exps),
        bbar: b.div_monomial(&exps),
    }
}

/// Inputs without monomial content whose cofactors are monomials are
/// proportional: `A = c * B`.
pub(crate) fn try_monomial_cofactors<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> Option<GcdCofactors<F>> {
    if a.len() != b.len() || a.leading_exponents() != b.leading_exponents() {
        return None;
    }
    let (la, lb) = (a.leading_coeff(), b.leading_coeff());
    let s = la * lb.inv()?;
    if *a != b.scale(s) {
        return None;
    }
    let n = a.nvars();
    let g = b.make_monic();
    Some(GcdCofactors {
        g,
        abar: SparsePoly::constant(la, n),
        bbar: SparsePoly::constant(lb, n),
    })
}

/// No shared variable, so only constants divide both.
pub(crate) fn disjoint_gcd<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> GcdCofactors<F> {
    GcdCofactors {
        g: SparsePoly::one(a.nvars()),
        abar: a.clone(),
        bbar: b.clone(),
    }
}

/// Only `x_v` is shared: the gcd is the gcd of the contents in `x_v`.
pub(crate) fn try_one_shared_var<F: PrimeField>(
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    v: usize,
) -> Result<GcdCofactors<F>, Failure> {
    let an = Mpolyn::from_sparse(a, v);
    let bn = Mpolyn::from_sparse(b, v);
    let g = poly_gcd(&an.content(), &bn.content());
    trace!(v, degree = g.degree(), "single shared variable");
    let abar = an.div_poly_exact(&g).ok_or(Failure::Inapplicable)?;
    let bbar = bn.div_poly_exact(&g).ok_or(Failure::Inapplicable)?;
    Ok(GcdCofactors {
        g: SparsePoly::from_dense(&g, v, a.nvars()),
        abar: abar.to_sparse(),
        bbar: bbar.to_sparse(),
    })
}

/// A variable used by one input only cannot occur in the gcd; take the gcd
/// of the other input with the coefficients in that variable.
pub(crate) fn try_missing_var<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
) -> Result<Option<GcdCofactors<F>>, Failure> {
    let used_a = a.used_vars();
    let used_b = b.used_vars();
    let (p, q, v) = if let Some(&v) = used_a.iter().find(|v| !used_b.contains(v)) {
        (a, b, v)
    } else if let Some(&v) = used_b.iter().find(|v| !used_a.contains(v)) {
        (b, a, v)
    } else {
        return Ok(None);
    };
    trace!(v, "variable present in one input only");

    let mut polys: Vec<SparsePoly<F>> = Mpolyu::from_sparse(p, v).into_terms().into_iter().map(|(_, c)| c).collect();
    polys.push(q.clone());
    let g = solver.gcd_many(polys)?;

    let abar = a.div_exact(&g).ok_or(Failure::Inapplicable)?;
    let bbar = b.div_exact(&g).ok_or(Failure::Inapplicable)?;
    Ok(Some(GcdCofactors { g, abar, bbar }))
}

/// The degree bounds allow one input to be the gcd; check by division.
pub(crate) fn try_divides<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>, ctx: &GcdContext) -> Option<GcdCofactors<F>> {
    let n = a.nvars();
    if ctx.may_equal_a() {
        if let Some(bbar) = b.div_exact(a) {
            trace!("A divides B");
            return Some(GcdCofactors {
                g: a.clone(),
                abar: SparsePoly::one(n),
                bbar,
            });
        }
    }
    if ctx.may_equal_b() {
        if let Some(abar) = a.div_exact(b) {
            trace!("B divides A");
            return Some(GcdCofactors {
                g: b.clone(),
                abar,
                bbar: SparsePoly::one(n),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::FiniteField;

    type F = FiniteField<101>;

    fn p(nvars: usize, terms: &[(&[u64], i64)]) -> SparsePoly<F> {
        SparsePoly::from_exponents(
            nvars,
            terms.iter().map(|(e, c)| (e.to_vec(), F::from_signed(*c))).collect(),
        )
    }

    #[test]
    fn test_monomial_gcd() {
        type G = FiniteField<7>;
        let a = SparsePoly::<G>::monomial(&[2, 1], G::new(3));
        let b = SparsePoly::<G>::monomial(&[1, 3], G::new(5));
        let r = monomial_gcd(&a, &b);
        assert_eq!(r.g, SparsePoly::monomial(&[1, 1], G::new(1)));
        assert_eq!(r.abar, SparsePoly::monomial(&[1, 0], G::new(3)));
        assert_eq!(r.bbar, SparsePoly::monomial(&[0, 2], G::new(5)));
    }

    #[test]
    fn test_monomial_against_polynomial() {
        let a = SparsePoly::monomial(&[3, 2], F::new(4));
        let b = p(2, &[(&[2, 3], 1), (&[1, 1], 1)]);
        let r = monomial_gcd(&a, &b);
        assert_eq!(r.g, SparsePoly::monomial(&[1, 1], F::new(1)));
        assert_eq!(r.g.mul(&r.bbar), b);
    }

    #[test]
    fn test_proportional() {
        let b = p(2, &[(&[1, 1], 2), (&[0, 1], 3), (&[0, 0], 1)]);
        let a = b.scale(F::new(7));
        let r = try_monomial_cofactors(&a, &b).unwrap();
        assert_eq!(r.g.mul(&r.abar), a);
        assert_eq!(r.g.mul(&r.bbar), b);
        assert!(try_monomial_cofactors(&a, &b.add(&p(2, &[(&[0, 0], 1)]))).is_none());
    }

    #[test]
    fn test_one_shared_var() {
        // A = (x0 + 1)(x0 x1 + 2), B = (x0 + 1)(x0 - 3)(x2 + 1)
        let a = p(3, &[(&[1, 0, 0], 1), (&[0, 0, 0], 1)]).mul(&p(3, &[(&[1, 1, 0], 1), (&[0, 0, 0], 2)]));
        let b = p(3, &[(&[2, 0, 0], 1), (&[1, 0, 0], -2), (&[0, 0, 0], -3)]).mul(&p(3, &[(&[0, 0, 1], 1), (&[0, 0, 0], 1)]));
        let r = try_one_shared_var(&a, &b, 0).unwrap();
        assert_eq!(r.g, p(3, &[(&[1, 0, 0], 1), (&[0, 0, 0], 1)]));
        assert_eq!(r.g.mul(&r.abar), a);
        assert_eq!(r.g.mul(&r.bbar), b);
    }

    #[test]
    fn test_missing_var() {
        // A = (x0 + x1)(x2^2 + x2 + 5), B = (x0 + x1)(x0 - x1 + 1)
        let g = p(3, &[(&[1, 0, 0], 1), (&[0, 1, 0], 1)]);
        let a = g.mul(&p(3, &[(&[0, 0, 2], 1), (&[0, 0, 1], 1), (&[0, 0, 0], 5)]));
        let b = g.mul(&p(3, &[(&[1, 0, 0], 1), (&[0, 1, 0], -1), (&[0, 0, 0], 1)]));
        let mut solver = GcdSolver::default();
        let r = try_missing_var(&mut solver, &a, &b).unwrap().unwrap();
        assert_eq!(r.g, g);
        assert_eq!(r.g.mul(&r.abar), a);
        assert_eq!(r.g.mul(&r.bbar), b);
    }
}
