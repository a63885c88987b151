//! Random reduction to bivariate and univariate images.
//!
//! A reduction is rejected when it drops the degree of an input in one of
//! the retained variables, or its total degree in them: the image of the
//! gcd is then no longer a faithful image of the true gcd.

use polygcd_poly::{Bpoly, DensePoly, SparsePoly};
use polygcd_rings::PrimeField;
use rand::Rng;
use tracing::trace;

use crate::error::Failure;

/// A random point with nonzero coordinates.
pub(crate) fn random_point<F: PrimeField, R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<F> {
    (0..n).map(|_| F::random_nonzero(rng)).collect()
}

/// Substitutes `x_v = point[v]` for every `v >= 2`.
///
/// The result is read with `x_0` outer and `x_1` inner.
pub(crate) fn reduce_bivariate<F: PrimeField>(p: &SparsePoly<F>, point: &[F]) -> Bpoly<F> {
    debug_assert!(point.len() >= p.nvars());
    let layout = p.layout();
    let mut slots: Vec<Vec<F>> = Vec::new();
    for (m, c) in p.terms() {
        let mut value = *c;
        for (v, &a) in point.iter().enumerate().take(p.nvars()).skip(2) {
            let e = m.exponent(v, layout);
            if e > 0 {
                value = value * a.pow(e);
            }
        }
        let i = m.exponent(0, layout) as usize;
        let j = if p.nvars() > 1 { m.exponent(1, layout) as usize } else { 0 };
        if slots.len() <= i {
            slots.resize(i + 1, Vec::new());
        }
        let slot = &mut slots[i];
        if slot.len() <= j {
            slot.resize(j + 1, F::zero());
        }
        slot[j] = slot[j] + value;
    }
    Bpoly::new(slots.into_iter().map(DensePoly::new).collect())
}

/// True if `image` keeps the degrees of `p` in `x_0`, and in `x_1` when `check_inner`.
pub(crate) fn keeps_degrees<F: PrimeField>(image: &Bpoly<F>, p: &SparsePoly<F>, check_inner: bool) -> bool {
    if image.degree_outer() != Some(p.degree_in(0) as usize) {
        return false;
    }
    !check_inner || image.degree_inner().unwrap_or(0) as u64 == p.degree_in(1)
}

/// Total degree of `p` in every variable but `x_v`.
fn total_degree_without<F: PrimeField>(p: &SparsePoly<F>, v: usize) -> u64 {
    let layout = p.layout();
    p.terms()
        .iter()
        .map(|(m, _)| m.total_degree(layout) - m.exponent(v, layout))
        .max()
        .unwrap_or(0)
}

/// True if `image`, which is `p` with `x_v` evaluated, kept the total degree.
pub(crate) fn keeps_total_degree<F: PrimeField>(image: &SparsePoly<F>, p: &SparsePoly<F>, v: usize) -> bool {
    image.total_degree() == total_degree_without(p, v)
}

/// Univariate images of both inputs in `x_v`, or `None` if a degree drops.
pub(crate) fn reduce_univariate<F: PrimeField>(
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    v: usize,
    point: &[F],
) -> Option<(DensePoly<F>, DensePoly<F>)> {
    let ai = a.eval_all_but(v, point);
    let bi = b.eval_all_but(v, point);
    let keeps = |img: &DensePoly<F>, p: &SparsePoly<F>| img.degree().unwrap_or(0) as u64 == p.degree_in(v);
    (keeps(&ai, a) && keeps(&bi, b)).then_some((ai, bi))
}

/// Draws points until both bivariate images keep their degrees.
pub(crate) fn sample_bivariate<F: PrimeField, R: Rng + ?Sized>(
    rng: &mut R,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    retries: usize,
) -> Result<(Vec<F>, Bpoly<F>, Bpoly<F>), Failure> {
    for _ in 0..retries {
        let point = random_point(rng, a.nvars());
        let ai = reduce_bivariate(a, &point);
        if !keeps_degrees(&ai, a, true) {
            trace!("bivariate image of A lost degree; resampling");
            continue;
        }
        let bi = reduce_bivariate(b, &point);
        if !keeps_degrees(&bi, b, true) {
            trace!("bivariate image of B lost degree; resampling");
            continue;
        }
        return Ok((point, ai, bi));
    }
    Err(Failure::Retry)
}
