//! Dense interpolation in one variable by incremental Chinese remaindering.
//!
//! The accumulator `P` agrees with every image seen so far at the points
//! recorded in the modulus `M = Π (x - a_i)`. A new image `u` at `a` gives
//! `P + M * (u - P(a)) / M(a)`. Symmetric pairs `±a` are merged in one step
//! with one inversion; `M` stays even in `x`, so `M(-a) = M(a)`.

use std::collections::BTreeMap;

use polygcd_poly::{Bpoly, DensePoly, Mpolyn, PackedMonomial, SparsePoly};
use polygcd_rings::PrimeField;

/// The product of `x - a` over the points used so far.
#[derive(Clone, Debug)]
pub(crate) struct Modulus<F: PrimeField> {
    poly: DensePoly<F>,
    even: bool,
}

/// Precomputed `1 / M(a)` for a single point.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SingleWeight<F> {
    alpha: F,
    w: F,
}

/// Precomputed `1 / 2M(a)` and `1 / 2aM(a)` for the pair `±a`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PairWeight<F> {
    alpha: F,
    w0: F,
    w1: F,
}

impl<F: PrimeField> Modulus<F> {
    /// The empty product.
    pub(crate) fn new() -> Self {
        Self {
            poly: DensePoly::one(),
            even: true,
        }
    }

    /// Number of points recorded.
    pub(crate) fn degree(&self) -> usize {
        self.poly.degree().unwrap_or(0)
    }

    /// Weight for `a`, or `None` if `a` was already used.
    pub(crate) fn single(&self, alpha: F) -> Option<SingleWeight<F>> {
        let w = self.poly.eval(alpha).inv()?;
        Some(SingleWeight { alpha, w })
    }

    /// Weights for `±a`, or `None` if either point was used, `a = 0`, the
    /// characteristic is 2, or single points broke the symmetry.
    pub(crate) fn pair(&self, alpha: F) -> Option<PairWeight<F>> {
        if !self.even || F::characteristic() == 2 || alpha.is_zero() {
            return None;
        }
        let m = self.poly.eval(alpha);
        let two = F::from_u64(2);
        let w1 = (two * alpha * m).inv()?;
        Some(PairWeight {
            alpha,
            w0: w1 * alpha,
            w1,
        })
    }

    /// Records the point `a`.
    pub(crate) fn push_single(&mut self, alpha: F) {
        self.poly = self.poly.mul_linear(alpha);
        self.even = false;
    }

    /// Records the pair `±a`.
    pub(crate) fn push_pair(&mut self, alpha: F) {
        debug_assert!(self.even);
        let factor = DensePoly::new(vec![-(alpha * alpha), F::zero(), F::one()]);
        self.poly = self.poly.mul(&factor);
    }
}

/// Updates `p` so that it also takes the value `u` at the weighted point.
pub(crate) fn crt_update_single<F: PrimeField>(
    p: &DensePoly<F>,
    modulus: &Modulus<F>,
    weight: &SingleWeight<F>,
    u: F,
) -> DensePoly<F> {
    let delta = u - p.eval(weight.alpha);
    if delta.is_zero() {
        return p.clone();
    }
    p.add(&modulus.poly.scale(delta * weight.w))
}

/// Updates `p` so that it also takes `u` at `a` and `v` at `-a`.
pub(crate) fn crt_update_pair<F: PrimeField>(
    p: &DensePoly<F>,
    modulus: &Modulus<F>,
    weight: &PairWeight<F>,
    u: F,
    v: F,
) -> DensePoly<F> {
    let (pa, pm) = p.eval_sym(weight.alpha);
    let du = u - pa;
    let dv = v - pm;
    if du.is_zero() && dv.is_zero() {
        return p.clone();
    }
    let c0 = (du + dv) * weight.w0;
    let c1 = (du - dv) * weight.w1;
    p.add(&modulus.poly.mul(&DensePoly::new(vec![c0, c1])))
}

/// Slot-wise single update of a bivariate accumulator; `image` is in `x_0`.
pub(crate) fn bpoly_update_single<F: PrimeField>(
    p: &Bpoly<F>,
    modulus: &Modulus<F>,
    weight: &SingleWeight<F>,
    image: &DensePoly<F>,
) -> Bpoly<F> {
    let len = p.coeffs().len().max(image.coeffs().len());
    Bpoly::new(
        (0..len)
            .map(|i| crt_update_single(&p.coeff(i), modulus, weight, image.coeff(i)))
            .collect(),
    )
}

/// Slot-wise pair update of a bivariate accumulator.
pub(crate) fn bpoly_update_pair<F: PrimeField>(
    p: &Bpoly<F>,
    modulus: &Modulus<F>,
    weight: &PairWeight<F>,
    plus: &DensePoly<F>,
    minus: &DensePoly<F>,
) -> Bpoly<F> {
    let len = p.coeffs().len().max(plus.coeffs().len()).max(minus.coeffs().len());
    Bpoly::new(
        (0..len)
            .map(|i| crt_update_pair(&p.coeff(i), modulus, weight, plus.coeff(i), minus.coeff(i)))
            .collect(),
    )
}

/// Monomial-wise merge of an accumulator with images that lack its folded variable.
fn merge_mpolyn<F: PrimeField>(
    p: &Mpolyn<F>,
    images: &[&SparsePoly<F>],
    mut update: impl FnMut(&DensePoly<F>, &[F]) -> DensePoly<F>,
) -> Mpolyn<F> {
    let layout = images.iter().fold(p.layout(), |l, img| l.join(img.layout()));
    let p = p.repack(layout);

    let mut merged: BTreeMap<PackedMonomial, (DensePoly<F>, Vec<F>)> = BTreeMap::new();
    for (m, c) in p.terms() {
        merged.insert(m.clone(), (c.clone(), vec![F::zero(); images.len()]));
    }
    for (k, img) in images.iter().enumerate() {
        let img = img.repack(layout);
        for (m, c) in img.terms() {
            let entry = merged
                .entry(m.clone())
                .or_insert_with(|| (DensePoly::zero(), vec![F::zero(); images.len()]));
            entry.1[k] = *c;
        }
    }

    let terms = merged
        .into_iter()
        .rev()
        .filter_map(|(m, (c, values))| {
            let c = update(&c, &values);
            (!c.is_zero()).then_some((m, c))
        })
        .collect();
    Mpolyn::from_sorted(terms, layout, p.var())
}

/// Single update of a folded accumulator.
pub(crate) fn mpolyn_update_single<F: PrimeField>(
    p: &Mpolyn<F>,
    modulus: &Modulus<F>,
    weight: &SingleWeight<F>,
    image: &SparsePoly<F>,
) -> Mpolyn<F> {
    merge_mpolyn(p, &[image], |c, v| crt_update_single(c, modulus, weight, v[0]))
}

/// Pair update of a folded accumulator.
pub(crate) fn mpolyn_update_pair<F: PrimeField>(
    p: &Mpolyn<F>,
    modulus: &Modulus<F>,
    weight: &PairWeight<F>,
    plus: &SparsePoly<F>,
    minus: &SparsePoly<F>,
) -> Mpolyn<F> {
    merge_mpolyn(p, &[plus, minus], |c, v| crt_update_pair(c, modulus, weight, v[0], v[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::{FiniteField, Ring};

    type F = FiniteField<101>;

    fn poly(cs: &[i64]) -> DensePoly<F> {
        DensePoly::new(cs.iter().map(|&c| F::from_signed(c)).collect())
    }

    #[test]
    fn test_single_points() {
        let target = poly(&[3, -1, 0, 7]);
        let mut modulus = Modulus::new();
        let mut p = DensePoly::zero();
        for a in [2u64, 5, 11, 40] {
            let a = F::new(a);
            let w = modulus.single(a).unwrap();
            p = crt_update_single(&p, &modulus, &w, target.eval(a));
            modulus.push_single(a);
        }
        assert_eq!(p, target);
        assert_eq!(modulus.degree(), 4);
        assert!(modulus.single(F::new(5)).is_none());
        assert!(modulus.pair(F::new(3)).is_none());
    }

    #[test]
    fn test_pairs() {
        let target = poly(&[3, -1, 0, 7, 12]);
        let mut modulus = Modulus::new();
        let mut p = DensePoly::zero();
        for a in [2u64, 9, 30] {
            let a = F::new(a);
            let w = modulus.pair(a).unwrap();
            let (u, v) = target.eval_sym(a);
            p = crt_update_pair(&p, &modulus, &w, u, v);
            modulus.push_pair(a);
        }
        assert_eq!(p, target);
        assert!(modulus.pair(-F::new(9)).is_none());
        assert!(modulus.pair(F::zero()).is_none());
    }

    #[test]
    fn test_characteristic_two_has_no_pairs() {
        type G = FiniteField<2>;
        let modulus = Modulus::<G>::new();
        assert!(modulus.pair(G::one()).is_none());
        assert!(modulus.single(G::one()).is_some());
    }

    #[test]
    fn test_mpolyn_pairs() {
        // x0^2 * (z^2 + 3) + x1 * (4z - 1), interpolated in z = x2
        let target = SparsePoly::from_exponents(
            3,
            vec![
                (vec![2, 0, 2], F::new(1)),
                (vec![2, 0, 0], F::new(3)),
                (vec![0, 1, 1], F::new(4)),
                (vec![0, 1, 0], F::from_signed(-1)),
            ],
        );
        let folded = Mpolyn::from_sparse(&target, 2);
        let mut modulus = Modulus::new();
        let mut p = Mpolyn::zero(target.layout(), 2);
        for a in [6u64, 17] {
            let a = F::new(a);
            let w = modulus.pair(a).unwrap();
            let (plus, minus) = folded.eval_sym(a);
            p = mpolyn_update_pair(&p, &modulus, &w, &plus, &minus);
            modulus.push_pair(a);
        }
        assert_eq!(p.to_sparse(), target);

        let mut modulus = Modulus::new();
        let mut p = Mpolyn::zero(target.layout(), 2);
        for a in [1u64, 2, 3] {
            let a = F::new(a);
            let w = modulus.single(a).unwrap();
            p = mpolyn_update_single(&p, &modulus, &w, &folded.eval(a));
            modulus.push_single(a);
        }
        assert_eq!(p.to_sparse(), target);
    }

    #[test]
    fn test_bpoly_pairs() {
        // (y^2 + 1) x + 5y
        let target = Bpoly::new(vec![poly(&[0, 5]), poly(&[1, 0, 1])]);
        let mut modulus = Modulus::new();
        let mut p = Bpoly::zero();
        for a in [4u64, 7] {
            let a = F::new(a);
            let w = modulus.pair(a).unwrap();
            let (plus, minus) = target.eval_inner_sym(a);
            p = bpoly_update_pair(&p, &modulus, &w, &plus, &minus);
            modulus.push_pair(a);
        }
        assert_eq!(p, target);
    }
}
