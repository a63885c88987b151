//! Exponent deflation.
//!
//! A polynomial whose exponents in `x_v` all lie in `shift_v + stride_v * N`
//! is rewritten with `x_v^(shift_v + stride_v * k) -> x_v^k`. Deflating both
//! gcd inputs with a shared stride commutes with taking the gcd.

use polygcd_rings::PrimeField;

use crate::monomial::ExpLayout;
use crate::sparse::SparsePoly;

/// Shifts (one vector per polynomial) and the shared strides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deflation {
    /// Minimum exponent vector of each polynomial.
    pub shifts: Vec<Vec<u64>>,
    /// Common stride per variable, at least 1.
    pub strides: Vec<u64>,
}

impl Deflation {
    /// Returns true when no polynomial changes under deflation.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.strides.iter().all(|&s| s == 1) && self.shifts.iter().flatten().all(|&s| s == 0)
    }
}

pub(crate) fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Computes per-polynomial shifts and the strides shared by all of them.
pub fn deflation_params<F: PrimeField>(polys: &[&SparsePoly<F>]) -> Deflation {
    let nvars = polys.first().map_or(0, |p| p.nvars());
    let shifts: Vec<Vec<u64>> = polys.iter().map(|p| p.min_exponents()).collect();
    let mut strides = vec![0u64; nvars];

    for (p, shift) in polys.iter().zip(&shifts) {
        for (exps, _) in p.iter_exponents() {
            for v in 0..nvars {
                strides[v] = gcd_u64(strides[v], exps[v] - shift[v]);
            }
        }
    }
    for s in &mut strides {
        if *s == 0 {
            *s = 1;
        }
    }

    Deflation { shifts, strides }
}

/// Maps `x_v^e -> x_v^((e - shift_v) / stride_v)`.
pub fn deflate<F: PrimeField>(p: &SparsePoly<F>, shift: &[u64], stride: &[u64]) -> SparsePoly<F> {
    let max = p
        .degrees()
        .iter()
        .enumerate()
        .map(|(v, &d)| d.saturating_sub(shift[v]) / stride[v])
        .max()
        .unwrap_or(0);
    let layout = ExpLayout::for_max_exponent(p.nvars(), max);
    p.map_exponents(layout, |exps| {
        for (v, e) in exps.iter_mut().enumerate() {
            debug_assert_eq!((*e - shift[v]) % stride[v], 0);
            *e = (*e - shift[v]) / stride[v];
        }
    })
}

/// Maps `x_v^k -> x_v^(shift_v + stride_v * k)`.
///
/// Returns `None` if an exponent overflows 64 bits.
pub fn inflate<F: PrimeField>(p: &SparsePoly<F>, shift: &[u64], stride: &[u64]) -> Option<SparsePoly<F>> {
    let mut max = 0u64;
    for (v, &d) in p.degrees().iter().enumerate() {
        max = max.max(d.checked_mul(stride[v])?.checked_add(shift[v])?);
    }
    let layout = ExpLayout::for_max_exponent(p.nvars(), max);
    Some(p.map_exponents(layout, |exps| {
        for (v, e) in exps.iter_mut().enumerate() {
            *e = *e * stride[v] + shift[v];
        }
    }))
}
