//! Zippel's sparse modular gcd.
//!
//! A bivariate image in `x_0, x_1` is computed with Brown's algorithm at a
//! random point `β`. Each further variable `x_k` is then interpolated
//! densely, one value at a time; the image for a new value is not computed
//! from scratch but recovered through the skeleton of the previous level
//! from bivariate images at structured points (see [`crate::zip`]).
//!
//! The reconstructed polynomial carries a known leading coefficient in
//! `x_0` so that images from different points are consistently scaled:
//!
//! | target | polynomial        | leading coefficient |
//! |--------|-------------------|---------------------|
//! | `G`    | `gamma * G / lc(G)` | `gamma`           |
//! | `Abar` | `lc(G) * Abar`    | `lc(A)`             |
//! | `Bbar` | `lc(G) * Bbar`    | `lc(B)`             |
//!
//! Zippel always reconstructs `G`; Zippel2 picks the cheapest target and
//! recovers `gamma * G / lc(G)` from `gamma * A` by exact division.

use polygcd_poly::{Bpoly, Mpolyn, Mpolyu, Polyun, SparsePoly};
use polygcd_rings::PrimeField;
use tracing::{debug, trace};

use crate::brown::brown_bivariate;
use crate::content::{content_in, Primitive};
use crate::error::Failure;
use crate::eval::{keeps_degrees, keeps_total_degree, random_point, reduce_bivariate, sample_bivariate};
use crate::interp::{mpolyn_update_single, Modulus};
use crate::solver::{GcdCofactors, GcdSolver, GcdTriple};
use crate::strategy::GcdContext;
use crate::zip::{Skeleton, ZipError};

/// Which of the three related polynomials is interpolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    G,
    Abar,
    Bbar,
}

/// Runs Zippel's algorithm reconstructing the gcd.
pub(crate) fn try_zippel<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    ctx: &GcdContext,
) -> Result<GcdTriple<F>, Failure> {
    permuted(solver, a, b, ctx, |_, _| Target::G)
}

/// Runs Zippel's algorithm on whichever target looks cheapest.
pub(crate) fn try_zippel2<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    ctx: &GcdContext,
) -> Result<GcdTriple<F>, Failure> {
    permuted(solver, a, b, ctx, cheapest_target)
}

fn permuted<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    ctx: &GcdContext,
    choose: impl Fn(&Primitive<F>, &[u64]) -> Target,
) -> Result<GcdTriple<F>, Failure> {
    let perm = &ctx.zippel_perm;
    if perm.len() < 2 {
        return Err(Failure::Inapplicable);
    }
    let ap = a.select_vars(perm);
    let bp = b.select_vars(perm);
    let gdeg: Vec<u64> = perm.iter().map(|&v| ctx.gdeg[v]).collect();

    let prim = Primitive::new(solver, &ap, &bp)?;
    let target = choose(&prim, &gdeg);
    debug!(?target, nvars = perm.len(), "zippel target");
    let r = zippel(solver, &prim, &gdeg, target)?;
    Ok(GcdCofactors {
        g: r.g.expand_vars(perm, ctx.nvars),
        abar: r.abar.expand_vars(perm, ctx.nvars),
        bbar: r.bbar.expand_vars(perm, ctx.nvars),
    })
}

impl Target {
    /// Leading coefficient of the target in `x_0`.
    fn lead<F: PrimeField>(self, prim: &Primitive<F>) -> SparsePoly<F> {
        match self {
            Self::G => prim.gamma.clone(),
            Self::Abar => prim.a.lead_coeff_in(0),
            Self::Bbar => prim.b.lead_coeff_in(0),
        }
    }

    /// Bound on the degree of the target in `x_k`.
    fn degree_bound<F: PrimeField>(self, prim: &Primitive<F>, gdeg: &[u64], k: usize) -> u64 {
        match self {
            Self::G => {
                let g = gdeg[k].min(prim.a.degree_in(k)).min(prim.b.degree_in(k));
                prim.gamma.degree_in(k) + g
            }
            Self::Abar => prim.a.degree_in(k),
            Self::Bbar => prim.b.degree_in(k),
        }
    }

    /// Degree of the target in `x_0`, given the gcd degree `deg0`.
    fn main_degree<F: PrimeField>(self, prim: &Primitive<F>, deg0: usize) -> u64 {
        let deg0 = deg0 as u64;
        match self {
            Self::G => deg0,
            Self::Abar => prim.a.degree_in(0).saturating_sub(deg0),
            Self::Bbar => prim.b.degree_in(0).saturating_sub(deg0),
        }
    }

    /// `y` is the target with `x_{k+1}, ...` at `β`: it must divide
    /// `gamma * A` (or `gamma * B` for `Bbar`) evaluated the same way.
    fn divides_tail<F: PrimeField>(self, y: &SparsePoly<F>, tails: &Tails<F>, k: usize) -> bool {
        let input = match self {
            Self::G | Self::Abar => &tails.a[k],
            Self::Bbar => &tails.b[k],
        };
        y.divides(&tails.gamma[k].mul(input))
    }

    /// The target's image from a bivariate gcd with cofactors.
    fn image<F: PrimeField>(
        self,
        (g, abar, bbar): &(Bpoly<F>, Bpoly<F>, Bpoly<F>),
        gamma: &Bpoly<F>,
    ) -> Option<Bpoly<F>> {
        let lc = g.lead();
        match self {
            Self::G => g.mul_inner(&gamma.coeff(0)).div_inner_exact(&lc),
            Self::Abar => Some(abar.mul_inner(&lc)),
            Self::Bbar => Some(bbar.mul_inner(&lc)),
        }
    }
}

/// Cost estimate: largest skeleton group of the known leading coefficient
/// times the number of dense points over all lifted variables.
fn cheapest_target<F: PrimeField>(prim: &Primitive<F>, gdeg: &[u64]) -> Target {
    let n = prim.a.nvars();
    let cost = |t: Target| -> u64 {
        let group = Mpolyu::from_sparse(&t.lead(prim), 1)
            .terms()
            .iter()
            .map(|(_, c)| c.len())
            .max()
            .unwrap_or(1)
            .max(1) as u64;
        let points: u64 = (2..n).map(|k| t.degree_bound(prim, gdeg, k) + 1).sum();
        group.saturating_mul(points.max(1))
    };
    let mut best = (Target::G, cost(Target::G));
    for t in [Target::Abar, Target::Bbar] {
        let c = cost(t);
        if c < best.1 {
            best = (t, c);
        }
    }
    trace!(target = ?best.0, cost = best.1, "zippel2 cost estimate");
    best.0
}

/// Every input with the variables above `k` set to `β`, for each `k`.
struct Tails<F: PrimeField> {
    a: Vec<SparsePoly<F>>,
    b: Vec<SparsePoly<F>>,
    gamma: Vec<SparsePoly<F>>,
    lead: Vec<SparsePoly<F>>,
}

fn tails<F: PrimeField>(p: &SparsePoly<F>, beta: &[F]) -> Vec<SparsePoly<F>> {
    let n = p.nvars();
    let mut out = vec![SparsePoly::zero(n); n];
    out[n - 1] = p.clone();
    for k in (0..n - 1).rev() {
        out[k] = out[k + 1].eval_var(k + 1, beta[k + 1]);
    }
    out
}

/// True if setting some `x_k = β`, `k >= 2`, dropped the total degree of a tail.
fn drops_total_degree<F: PrimeField>(tails: &[SparsePoly<F>]) -> bool {
    tails
        .windows(2)
        .enumerate()
        .skip(1)
        .any(|(k, w)| !keeps_total_degree(&w[0], &w[1], k + 1))
}

fn zippel<F: PrimeField>(
    solver: &mut GcdSolver,
    prim: &Primitive<F>,
    gdeg: &[u64],
    target: Target,
) -> Result<GcdTriple<F>, Failure> {
    let n = prim.a.nvars();
    let restarts = solver.config().restarts;
    let retries = solver.config().point_retries;

    for attempt in 0..restarts {
        let (beta, a2, b2) = sample_bivariate(solver.rng(), &prim.a, &prim.b, retries)?;
        let base = match brown_bivariate(solver, &a2, &b2) {
            Ok(base) => base,
            Err(Failure::Retry) => continue,
            Err(failure) => return Err(failure),
        };
        let deg0 = base.0.degree_outer().unwrap_or(0);
        if deg0 == 0 {
            trace!("bivariate image is coprime in x0");
            return Ok(prim.coprime());
        }

        let gamma2 = reduce_bivariate(&prim.gamma, &beta);
        let Some(image) = target.image(&base, &gamma2) else {
            continue;
        };
        let tails = Tails {
            a: tails(&prim.a, &beta),
            b: tails(&prim.b, &beta),
            gamma: tails(&prim.gamma, &beta),
            lead: tails(&target.lead(prim), &beta),
        };
        if drops_total_degree(&tails.a) || drops_total_degree(&tails.b) {
            trace!("base point dropped a total degree");
            continue;
        }

        let mut y = image.to_sparse(n, 0, 1);
        let mut lifted = true;
        for k in 2..n {
            match lift_variable(solver, prim, &tails, &y, &beta, k, target.degree_bound(prim, gdeg, k), deg0, target) {
                Ok(next) => y = next,
                Err(Failure::Retry) => {
                    debug!(attempt, level = k, "zippel restart");
                    lifted = false;
                    break;
                }
                Err(failure) => return Err(failure),
            }
        }
        if !lifted {
            continue;
        }

        let ghat = match target {
            Target::G => y,
            Target::Abar => match prim.gamma.mul(&prim.a).div_exact(&y) {
                Some(ghat) => ghat,
                None => continue,
            },
            Target::Bbar => match prim.gamma.mul(&prim.b).div_exact(&y) {
                Some(ghat) => ghat,
                None => continue,
            },
        };
        let content = content_in(solver, &ghat, 0)?;
        let Some(g) = ghat.div_exact(&content) else {
            continue;
        };
        if g.degree_in(0) != deg0 as u64 {
            continue;
        }
        if let Some(r) = prim.verify(&g) {
            return Ok(r);
        }
        debug!(attempt, "zippel candidate does not divide; restarting");
    }
    Err(Failure::Retry)
}

/// Interpolates `x_k` into `y`, the target with `x_k, ...` set to `β`.
#[allow(clippy::too_many_arguments)]
fn lift_variable<F: PrimeField>(
    solver: &mut GcdSolver,
    prim: &Primitive<F>,
    tails: &Tails<F>,
    y: &SparsePoly<F>,
    beta: &[F],
    k: usize,
    bound: u64,
    deg0: usize,
    target: Target,
) -> Result<SparsePoly<F>, Failure> {
    let skeleton = Skeleton::new(y, k).ok_or(Failure::Inapplicable)?;
    let max_rejected = solver.config().point_retries;
    trace!(level = k, bound, groups = skeleton.max_group(), "lifting variable");

    let mut modulus = Modulus::new();
    let first = modulus.single(beta[k]).ok_or(Failure::Retry)?;
    let mut acc = mpolyn_update_single(&Mpolyn::zero(y.layout(), k), &modulus, &first, y);
    modulus.push_single(beta[k]);

    let mut rejected = 0;
    while (modulus.degree() as u64) <= bound {
        if rejected > max_rejected {
            return Err(Failure::Retry);
        }
        let alpha = F::random_nonzero(solver.rng());
        let Some(w) = modulus.single(alpha) else {
            rejected += 1;
            continue;
        };
        match zip_image(solver, prim, tails, &skeleton, k, alpha, deg0, target)? {
            Some(image) => {
                acc = mpolyn_update_single(&acc, &modulus, &w, &image);
                modulus.push_single(alpha);
            }
            None => rejected += 1,
        }
    }

    let y = acc.to_sparse();
    if y.degree_in(0) != target.main_degree(prim, deg0) || y.lead_coeff_in(0) != tails.lead[k] {
        trace!(level = k, "interpolated leading coefficient is wrong");
        return Err(Failure::Retry);
    }
    if !target.divides_tail(&y, tails, k) {
        trace!(level = k, "interpolated image does not divide the inputs");
        return Err(Failure::Retry);
    }
    Ok(y)
}

/// Image of the target at `x_k = alpha`, or `None` for an unlucky value.
///
/// A smaller gcd degree than the base image proves the base unlucky, which
/// is reported as `Failure::Retry`.
#[allow(clippy::too_many_arguments)]
fn zip_image<F: PrimeField>(
    solver: &mut GcdSolver,
    prim: &Primitive<F>,
    tails: &Tails<F>,
    skeleton: &Skeleton,
    k: usize,
    alpha: F,
    deg0: usize,
    target: Target,
) -> Result<Option<SparsePoly<F>>, Failure> {
    let n = prim.a.nvars();
    let needed = skeleton.points_needed();
    let retries = solver.config().point_retries;

    'point: for _ in 0..retries {
        let s: Vec<F> = random_point(solver.rng(), n);
        let mut images = Vec::with_capacity(needed);
        for t in 1..=needed as u64 {
            let mut point = vec![F::one(); n];
            for (x, sv) in point[2..k].iter_mut().zip(&s[2..k]) {
                *x = sv.pow(t);
            }
            point[k] = alpha;

            let ai = reduce_bivariate(&tails.a[k], &point);
            let bi = reduce_bivariate(&tails.b[k], &point);
            if !keeps_degrees(&ai, &prim.a, false) || !keeps_degrees(&bi, &prim.b, false) {
                trace!(level = k, "structured point lost degree");
                continue 'point;
            }
            let triple = match brown_bivariate(solver, &ai, &bi) {
                Ok(triple) => triple,
                Err(Failure::Retry) => continue 'point,
                Err(failure) => return Err(failure),
            };
            let d = triple.0.degree_outer().unwrap_or(0);
            if d > deg0 {
                continue 'point;
            }
            if d < deg0 {
                return Err(Failure::Retry);
            }
            let gamma = reduce_bivariate(&tails.gamma[k], &point);
            let Some(image) = target.image(&triple, &gamma) else {
                continue 'point;
            };
            images.push(Polyun::from_bpoly(&image));
        }

        match skeleton.solve(&images, &s) {
            Ok(h) => return Ok(Some(h)),
            Err(ZipError::Singular) => {
                trace!(level = k, "singular zip system; new base point");
            }
            Err(ZipError::Inconsistent) => {
                trace!(level = k, "images contradict the skeleton");
                return Err(Failure::Retry);
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::FiniteField;

    type F = FiniteField<1_000_003>;

    fn p(nvars: usize, terms: &[(&[u64], i64)]) -> SparsePoly<F> {
        SparsePoly::from_exponents(
            nvars,
            terms.iter().map(|(e, c)| (e.to_vec(), F::from_signed(*c))).collect(),
        )
    }

    fn run(a: &SparsePoly<F>, b: &SparsePoly<F>, second: bool) -> GcdTriple<F> {
        let mut solver = GcdSolver::default();
        let ctx = GcdContext::new(&mut solver, a, b);
        let r = if second {
            try_zippel2(&mut solver, a, b, &ctx)
        } else {
            try_zippel(&mut solver, a, b, &ctx)
        };
        r.unwrap()
    }

    fn check(a: &SparsePoly<F>, b: &SparsePoly<F>, g: &SparsePoly<F>) {
        for second in [false, true] {
            let r = run(a, b, second);
            assert_eq!(r.g.make_monic(), g.make_monic());
            assert_eq!(r.g.mul(&r.abar), *a);
            assert_eq!(r.g.mul(&r.bbar), *b);
        }
    }

    #[test]
    fn test_four_variables() {
        // G = x0^2 x3 + x1 x2 + 7, sparse cofactors
        let g = p(4, &[(&[2, 0, 0, 1], 1), (&[0, 1, 1, 0], 1), (&[0, 0, 0, 0], 7)]);
        let a = g.mul(&p(4, &[(&[1, 0, 2, 0], 1), (&[0, 0, 0, 3], 2), (&[0, 1, 0, 0], 1)]));
        let b = g.mul(&p(4, &[(&[0, 2, 0, 1], 3), (&[1, 0, 0, 0], 1), (&[0, 0, 1, 0], -5)]));
        check(&a, &b, &g);
    }

    #[test]
    fn test_non_monic_lead() {
        // lc in x0 of G is x2 + x3, so gamma is not constant.
        let g = p(4, &[(&[1, 0, 1, 0], 1), (&[1, 0, 0, 1], 1), (&[0, 1, 0, 0], 1), (&[0, 0, 0, 0], 3)]);
        let a = g.mul(&p(4, &[(&[1, 1, 0, 0], 1), (&[0, 0, 2, 0], 1), (&[0, 0, 0, 0], 1)]));
        let b = g.mul(&p(4, &[(&[1, 0, 0, 2], 2), (&[0, 1, 1, 0], 1), (&[0, 0, 0, 1], 1)]));
        check(&a, &b, &g);
    }

    #[test]
    fn test_content_in_main_variable() {
        // G = (x1 + x2)(x0 + x2 x3 + 1)
        let g = p(4, &[(&[0, 1, 0, 0], 1), (&[0, 0, 1, 0], 1)])
            .mul(&p(4, &[(&[1, 0, 0, 0], 1), (&[0, 0, 1, 1], 1), (&[0, 0, 0, 0], 1)]));
        let a = g.mul(&p(4, &[(&[1, 0, 0, 1], 1), (&[0, 1, 0, 0], 2)]));
        let b = g.mul(&p(4, &[(&[2, 0, 0, 0], 1), (&[0, 0, 1, 1], 1), (&[0, 0, 0, 0], 4)]));
        check(&a, &b, &g);
    }

    #[test]
    fn test_coprime() {
        let a = p(3, &[(&[1, 1, 0], 1), (&[0, 0, 1], 1), (&[0, 0, 0], 1)]);
        let b = p(3, &[(&[1, 0, 1], 1), (&[0, 1, 0], 1), (&[0, 0, 0], 2)]);
        check(&a, &b, &SparsePoly::one(3));
    }

    #[test]
    fn test_every_target() {
        // deg_x0: G = 1, Abar = 2, Bbar = 3
        let g = p(3, &[(&[1, 0, 2], 1), (&[0, 1, 0], 1), (&[0, 0, 0], 1)]);
        let abar = p(3, &[(&[2, 0, 1], 1), (&[0, 1, 0], 1), (&[0, 0, 0], 3)]);
        let bbar = p(3, &[(&[3, 0, 0], 1), (&[0, 1, 1], 1), (&[0, 0, 0], 2)]);
        let (a, b) = (g.mul(&abar), g.mul(&bbar));
        let mut solver = GcdSolver::default();
        let prim = Primitive::new(&mut solver, &a, &b).unwrap();
        assert_eq!(Target::Abar.main_degree(&prim, 1), 2);
        assert_eq!(Target::Bbar.main_degree(&prim, 1), 3);
        for target in [Target::G, Target::Abar, Target::Bbar] {
            let r = zippel(&mut solver, &prim, &[1, 1, 2], target).unwrap();
            assert_eq!(r.g.make_monic(), g, "{target:?}");
            assert_eq!(r.g.mul(&r.abar), a);
            assert_eq!(r.g.mul(&r.bbar), b);
        }
    }

    #[test]
    fn test_target_choice() {
        // gamma = x2 and B has low degree in x2, so its cofactor is cheapest.
        let a = p(3, &[(&[1, 0, 1], 1), (&[0, 0, 3], 1), (&[0, 1, 0], 1)]);
        let b = p(3, &[(&[1, 0, 1], 1), (&[0, 1, 0], 1), (&[0, 0, 0], 1)]);
        let mut solver = GcdSolver::default();
        let prim = Primitive::new(&mut solver, &a, &b).unwrap();
        assert_eq!(prim.gamma, p(3, &[(&[0, 0, 1], 1)]));
        let gdeg = [1, 1, 1];
        assert_eq!(Target::G.degree_bound(&prim, &gdeg, 2), 2);
        assert_eq!(Target::Bbar.degree_bound(&prim, &gdeg, 2), 1);
        assert_eq!(cheapest_target(&prim, &gdeg), Target::Bbar);
        assert_eq!(cheapest_target(&prim, &[1, 1, 0]), Target::G);
    }
}
