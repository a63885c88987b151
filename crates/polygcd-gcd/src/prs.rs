//! Primitive pseudo-remainder sequences.
//!
//! Needs no evaluation points, so it works over fields too small for the
//! modular engines. It is the last resort of the orchestrator: the
//! intermediate remainders grow in the other variables, which makes it
//! slow on anything but small inputs.

use polygcd_poly::{Mpolyu, SparsePoly};
use polygcd_rings::PrimeField;
use tracing::trace;

use crate::error::Failure;
use crate::solver::{GcdCofactors, GcdTriple};

/// Gcd with cofactors by pseudo-remainders.
pub(crate) fn try_prs<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> Result<GcdTriple<F>, Failure> {
    let g = prs_gcd(a, b);
    let abar = a.div_exact(&g).ok_or(Failure::Exhausted)?;
    let bbar = b.div_exact(&g).ok_or(Failure::Exhausted)?;
    Ok(GcdCofactors { g, abar, bbar })
}

/// Monic gcd, recursing on the contents in the first used variable.
fn prs_gcd<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> SparsePoly<F> {
    if a.is_zero() {
        return b.make_monic();
    }
    if b.is_zero() {
        return a.make_monic();
    }
    let used_a = a.used_vars();
    let used_b = b.used_vars();
    let Some(&v) = used_a.iter().chain(&used_b).min() else {
        return SparsePoly::one(a.nvars());
    };
    if !used_a.contains(&v) {
        return prs_gcd(a, &content(b, v));
    }
    if !used_b.contains(&v) {
        return prs_gcd(&content(a, v), b);
    }

    let ca = content(a, v);
    let cb = content(b, v);
    let c = prs_gcd(&ca, &cb);
    let mut f = a.div_exact(&ca).unwrap_or_else(|| a.clone());
    let mut g = b.div_exact(&cb).unwrap_or_else(|| b.clone());
    if f.degree_in(v) < g.degree_in(v) {
        std::mem::swap(&mut f, &mut g);
    }
    let mut steps = 0;
    loop {
        let r = prem(&f, &g, v);
        steps += 1;
        if r.is_zero() {
            break;
        }
        f = g;
        g = primitive_part(&r, v);
    }
    trace!(var = v, steps, "pseudo-remainder sequence");
    c.mul(&primitive_part(&g, v)).make_monic()
}

/// Monic gcd of the coefficients of `p` in `x_v`.
fn content<F: PrimeField>(p: &SparsePoly<F>, v: usize) -> SparsePoly<F> {
    let mut g = SparsePoly::zero_with(p.layout());
    for (_, c) in Mpolyu::from_sparse(p, v).into_terms() {
        g = prs_gcd(&g, &c);
        if g.is_constant() {
            break;
        }
    }
    g
}

fn primitive_part<F: PrimeField>(p: &SparsePoly<F>, v: usize) -> SparsePoly<F> {
    let c = content(p, v);
    p.div_exact(&c).unwrap_or_else(|| p.clone())
}

/// Pseudo-remainder of `f` by `g` in `x_v`.
fn prem<F: PrimeField>(f: &SparsePoly<F>, g: &SparsePoly<F>, v: usize) -> SparsePoly<F> {
    let d = g.degree_in(v);
    let lc_g = g.lead_coeff_in(v);
    let mut exps = vec![0; f.nvars()];
    let mut r = f.clone();
    while !r.is_zero() && r.degree_in(v) >= d {
        exps[v] = r.degree_in(v) - d;
        let top = r.lead_coeff_in(v).mul_monomial(&exps, F::one());
        r = r.mul(&lc_g).sub(&top.mul(g));
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::FiniteField;

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
    fn test_prem() {
        // x0^2 + x1 by x1 x0 + 1 in x0: x1^2 (x0^2 + x1) - (x1 x0 - 1)(x1 x0 + 1) = x1^3 + 1
        let f = p::<101>(2, &[(&[2, 0], 1), (&[0, 1], 1)]);
        let g = p::<101>(2, &[(&[1, 1], 1), (&[0, 0], 1)]);
        assert_eq!(prem(&f, &g, 0), p::<101>(2, &[(&[0, 3], 1), (&[0, 0], 1)]));
    }

    #[test]
    fn test_content() {
        // (x1 + 2)(x0 x1 + x0 + 3)
        let c = p::<7>(2, &[(&[0, 1], 1), (&[0, 0], 2)]);
        let q = c.mul(&p::<7>(2, &[(&[1, 1], 1), (&[1, 0], 1), (&[0, 0], 3)]));
        assert_eq!(content(&q, 0), c);
        assert!(content(&q, 1).is_one());
    }

    #[test]
    fn test_gcd_over_two() {
        // G = x0 x1 + x2 + 1, cofactors x0 + x2 and x1 x2 + x0 + 1
        let g = p::<2>(3, &[(&[1, 1, 0], 1), (&[0, 0, 1], 1), (&[0, 0, 0], 1)]);
        let a = g.mul(&p::<2>(3, &[(&[1, 0, 0], 1), (&[0, 0, 1], 1)]));
        let b = g.mul(&p::<2>(3, &[(&[1, 0, 0], 1), (&[0, 1, 1], 1), (&[0, 0, 0], 1)]));
        let r = try_prs(&a, &b).unwrap();
        assert_eq!(r.g, g);
        assert_eq!(r.g.mul(&r.abar), a);
        assert_eq!(r.g.mul(&r.bbar), b);
    }

    #[test]
    fn test_gcd_with_content() {
        // G = (x2 + 2)(x0^2 + x1) over Z/3
        let g = p::<3>(3, &[(&[0, 0, 1], 1), (&[0, 0, 0], 2)]).mul(&p::<3>(3, &[(&[2, 0, 0], 1), (&[0, 1, 0], 1)]));
        let a = g.mul(&p::<3>(3, &[(&[1, 0, 0], 1), (&[0, 1, 1], 1)]));
        let b = g.mul(&p::<3>(3, &[(&[0, 2, 0], 1), (&[1, 0, 1], 2), (&[0, 0, 0], 1)]));
        let r = try_prs(&a, &b).unwrap();
        assert_eq!(r.g, g.make_monic());
        assert_eq!(r.g.mul(&r.abar), a);
    }

    #[test]
    fn test_coprime() {
        let a = p::<7>(2, &[(&[1, 1], 1), (&[0, 0], 1)]);
        let b = p::<7>(2, &[(&[1, 0], 1), (&[0, 1], 1)]);
        let r = try_prs(&a, &b).unwrap();
        assert!(r.g.is_one());
        assert_eq!(r.abar, a);
    }
}
