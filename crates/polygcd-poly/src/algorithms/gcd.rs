//! Univariate polynomial GCD algorithms.
//!
//! This module provides the Euclidean-domain operations on `DensePoly`
//! that the multivariate engines bottom out in.

use polygcd_rings::PrimeField;

use crate::dense::DensePoly;

/// Computes the monic GCD of two polynomials using the Euclidean algorithm.
///
/// `gcd(0, 0) = 0`.
pub fn poly_gcd<F: PrimeField>(a: &DensePoly<F>, b: &DensePoly<F>) -> DensePoly<F> {
    let mut p = a.clone();
    let mut q = b.clone();

    while !q.is_zero() {
        let (_, r) = poly_div_rem(&p, &q);
        p = q;
        q = r;
    }

    make_monic(&p)
}

/// Divides polynomial a by b, returning (quotient, remainder).
///
/// # Panics
///
/// Panics if `b` is the zero polynomial.
pub fn poly_div_rem<F: PrimeField>(a: &DensePoly<F>, b: &DensePoly<F>) -> (DensePoly<F>, DensePoly<F>) {
    assert!(!b.is_zero(), "division by zero polynomial");

    let bl = b.coeffs().len();
    if a.coeffs().len() < bl {
        return (DensePoly::zero(), a.clone());
    }

    let b_lead_inv = b.leading_coeff().inv().expect("nonzero field element");
    let mut quotient = vec![F::zero(); a.coeffs().len() - bl + 1];
    let mut remainder = a.coeffs().to_vec();

    for deg_diff in (0..quotient.len()).rev() {
        let top = remainder[deg_diff + bl - 1];
        if top.is_zero() {
            continue;
        }
        let coeff = top * b_lead_inv;
        quotient[deg_diff] = coeff;

        for (i, &bc) in b.coeffs().iter().enumerate() {
            remainder[deg_diff + i] = remainder[deg_diff + i] - coeff * bc;
        }
    }
    remainder.truncate(bl - 1);

    (DensePoly::new(quotient), DensePoly::new(remainder))
}

/// Exact division: returns `Some(a / b)` when `b` divides `a`.
pub fn poly_div_exact<F: PrimeField>(a: &DensePoly<F>, b: &DensePoly<F>) -> Option<DensePoly<F>> {
    if b.is_zero() {
        return None;
    }
    let (q, r) = poly_div_rem(a, b);
    r.is_zero().then_some(q)
}

/// Makes a polynomial monic (leading coefficient = 1).
pub fn make_monic<F: PrimeField>(p: &DensePoly<F>) -> DensePoly<F> {
    match p.leading_coeff().inv() {
        Some(lead_inv) if !p.leading_coeff().is_one() => p.scale(lead_inv),
        _ => p.clone(),
    }
}

/// Extended polynomial GCD.
///
/// Computes (gcd, s, t) such that gcd = s*a + t*b with gcd monic.
pub fn poly_extended_gcd<F: PrimeField>(
    a: &DensePoly<F>,
    b: &DensePoly<F>,
) -> (DensePoly<F>, DensePoly<F>, DensePoly<F>) {
    let mut old_r = a.clone();
    let mut r = b.clone();
    let mut old_s = DensePoly::one();
    let mut s = DensePoly::zero();
    let mut old_t = DensePoly::zero();
    let mut t = DensePoly::one();

    while !r.is_zero() {
        let (q, rem) = poly_div_rem(&old_r, &r);

        let new_s = old_s.sub(&q.mul(&s));
        let new_t = old_t.sub(&q.mul(&t));

        old_r = std::mem::replace(&mut r, rem);
        old_s = std::mem::replace(&mut s, new_s);
        old_t = std::mem::replace(&mut t, new_t);
    }

    let Some(lead_inv) = old_r.leading_coeff().inv() else {
        return (DensePoly::zero(), DensePoly::zero(), DensePoly::zero());
    };

    (old_r.scale(lead_inv), old_s.scale(lead_inv), old_t.scale(lead_inv))
}

/// Computes the monic gcd together with both cofactors.
///
/// Returns `(g, abar, bbar)` with `g * abar = a` and `g * bbar = b`.
/// When both inputs are zero every output is zero.
pub fn poly_gcd_cofactors<F: PrimeField>(
    a: &DensePoly<F>,
    b: &DensePoly<F>,
) -> (DensePoly<F>, DensePoly<F>, DensePoly<F>) {
    let g = poly_gcd(a, b);
    if g.is_zero() {
        return (g, DensePoly::zero(), DensePoly::zero());
    }
    if g.is_one() {
        return (g, a.clone(), b.clone());
    }
    let (abar, _) = poly_div_rem(a, &g);
    let (bbar, _) = poly_div_rem(b, &g);
    (g, abar, bbar)
}

/// Inverse of `a` modulo `m`, if `gcd(a, m) = 1`.
pub fn poly_invmod<F: PrimeField>(a: &DensePoly<F>, m: &DensePoly<F>) -> Option<DensePoly<F>> {
    if m.is_zero() {
        return None;
    }
    let (_, a) = poly_div_rem(a, m);
    let (g, s, _) = poly_extended_gcd(&a, m);
    if !g.is_one() {
        return None;
    }
    Some(poly_div_rem(&s, m).1)
}
