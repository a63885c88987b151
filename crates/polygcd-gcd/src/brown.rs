//! Brown's dense modular gcd.
//!
//! The last variable is interpolated from images with that variable
//! evaluated, recursively down to a bivariate base on `Bpoly` and a
//! univariate Euclidean base. At every level:
//!
//! 1. Remove the content in the interpolation variable.
//! 2. Scale each gcd image so its leading coefficient is `gamma(a)`, where
//!    `gamma` is the gcd of the leading coefficients of the inputs. The
//!    cofactor images are scaled to keep `Ĝ·Âbar = gamma·A`.
//! 3. Images whose leading monomial is larger than the smallest seen come
//!    from unlucky points and are discarded; a smaller one restarts the
//!    accumulation.
//! 4. Once `1 + deg gamma + max(deg A, deg B)` points are in, the degree
//!    identity `deg Ĝ + deg Âbar = deg gamma + deg A` (and the same for `B`)
//!    certifies the result.

use std::cmp::Ordering;

use polygcd_poly::algorithms::gcd::{poly_div_exact, poly_gcd, poly_gcd_cofactors};
use polygcd_poly::{Bpoly, DensePoly, Mpolyn, SparsePoly};
use polygcd_rings::PrimeField;
use tracing::{debug, trace};

use crate::error::Failure;
use crate::interp::{
    bpoly_update_pair, bpoly_update_single, mpolyn_update_pair, mpolyn_update_single, Modulus,
};
use crate::solver::{GcdCofactors, GcdSolver, GcdTriple};
use crate::strategy::GcdContext;

type Triple<F> = (SparsePoly<F>, SparsePoly<F>, SparsePoly<F>);

/// Runs Brown's algorithm on the variables in `ctx.brown_perm`.
pub(crate) fn try_brown<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    ctx: &GcdContext,
) -> Result<GcdTriple<F>, Failure> {
    let perm = &ctx.brown_perm;
    let (g, abar, bbar) = brown_gcd(solver, &a.select_vars(perm), &b.select_vars(perm))?;
    Ok(GcdCofactors {
        g: g.expand_vars(perm, ctx.nvars),
        abar: abar.expand_vars(perm, ctx.nvars),
        bbar: bbar.expand_vars(perm, ctx.nvars),
    })
}

/// Gcd and cofactors of two polynomials that involve every variable.
pub(crate) fn brown_gcd<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
) -> Result<Triple<F>, Failure> {
    match a.nvars() {
        0 => Err(Failure::Inapplicable),
        n => brown_rec(solver, a, b, n - 1),
    }
}

/// Gcd of polynomials in `x_0, ..., x_m`.
fn brown_rec<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    m: usize,
) -> Result<Triple<F>, Failure> {
    let n = a.nvars();
    match m {
        0 => {
            let (g, abar, bbar) = poly_gcd_cofactors(&a.to_dense(0), &b.to_dense(0));
            Ok((
                SparsePoly::from_dense(&g, 0, n),
                SparsePoly::from_dense(&abar, 0, n),
                SparsePoly::from_dense(&bbar, 0, n),
            ))
        }
        1 => {
            let (g, abar, bbar) =
                brown_bivariate(solver, &Bpoly::from_sparse(a, 0, 1), &Bpoly::from_sparse(b, 0, 1))?;
            Ok((g.to_sparse(n, 0, 1), abar.to_sparse(n, 0, 1), bbar.to_sparse(n, 0, 1)))
        }
        _ => brown_level(solver, a, b, m),
    }
}

/// A scaled image triple and the leading monomial of its gcd.
struct Image<F: PrimeField> {
    lead: Vec<u64>,
    g: SparsePoly<F>,
    abar: SparsePoly<F>,
    bbar: SparsePoly<F>,
}

fn level_image<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    gamma: F,
    m: usize,
) -> Option<Image<F>> {
    let (g, abar, bbar) = brown_rec(solver, a, b, m - 1).ok()?;
    let lc = g.leading_coeff();
    let s = gamma * lc.inv()?;
    Some(Image {
        lead: g.leading_exponents(),
        g: g.scale(s),
        abar: abar.scale(lc),
        bbar: bbar.scale(lc),
    })
}

#[allow(clippy::too_many_lines)]
fn brown_level<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    m: usize,
) -> Result<Triple<F>, Failure> {
    let an = Mpolyn::from_sparse(a, m);
    let bn = Mpolyn::from_sparse(b, m);
    let ca = an.content();
    let cb = bn.content();
    let an = an.div_poly_exact(&ca).ok_or(Failure::Retry)?;
    let bn = bn.div_poly_exact(&cb).ok_or(Failure::Retry)?;
    let cg = poly_gcd(&ca, &cb);

    let lc_a = an.lead_poly();
    let lc_b = bn.lead_poly();
    let gamma = poly_gcd(&lc_a, &lc_b);
    let deg_gamma = gamma.degree().unwrap_or(0);
    let deg_a = an.degree_folded().unwrap_or(0);
    let deg_b = bn.degree_folded().unwrap_or(0);
    let bound = 1 + deg_gamma + deg_a.max(deg_b);
    if bound as u64 >= F::characteristic() {
        return Err(Failure::Exhausted);
    }

    let layout = an.layout().join(bn.layout());
    let pairs = F::characteristic() != 2;
    let restarts = solver.config().restarts;
    let max_rejected = solver.config().max_brown_images;

    for attempt in 0..restarts {
        let mut modulus = Modulus::new();
        let mut g = Mpolyn::zero(layout, m);
        let mut abar = Mpolyn::zero(layout, m);
        let mut bbar = Mpolyn::zero(layout, m);
        let mut lead: Option<Vec<u64>> = None;
        let mut rejected = 0;

        while modulus.degree() < bound {
            if rejected > max_rejected {
                debug!(level = m, rejected, "too many rejected images");
                return Err(Failure::Retry);
            }
            let alpha = F::random_nonzero(solver.rng());

            let images = if pairs {
                if modulus.pair(alpha).is_none() {
                    rejected += 1;
                    continue;
                }
                let (gp, gm) = gamma.eval_sym(alpha);
                let (lap, lam) = lc_a.eval_sym(alpha);
                let (lbp, lbm) = lc_b.eval_sym(alpha);
                if [gp, gm, lap, lam, lbp, lbm].iter().any(|x| x.is_zero()) {
                    trace!(level = m, "leading coefficient vanishes at the point");
                    rejected += 1;
                    continue;
                }
                let (ap, am) = an.eval_sym(alpha);
                let (bp, bm) = bn.eval_sym(alpha);
                let plus = level_image(solver, &ap, &bp, gp, m);
                let minus = level_image(solver, &am, &bm, gm, m);
                match (plus, minus) {
                    (Some(plus), Some(minus)) if plus.lead == minus.lead => vec![plus, minus],
                    _ => {
                        trace!(level = m, "image pair disagrees");
                        rejected += 1;
                        continue;
                    }
                }
            } else {
                if modulus.single(alpha).is_none() {
                    rejected += 1;
                    continue;
                }
                let gv = gamma.eval(alpha);
                if gv.is_zero() || lc_a.eval(alpha).is_zero() || lc_b.eval(alpha).is_zero() {
                    rejected += 1;
                    continue;
                }
                match level_image(solver, &an.eval(alpha), &bn.eval(alpha), gv, m) {
                    Some(image) => vec![image],
                    None => {
                        rejected += 1;
                        continue;
                    }
                }
            };

            let e = images[0].lead.clone();
            match lead.as_ref().map(|l| e.cmp(l)) {
                Some(Ordering::Greater) => {
                    trace!(level = m, "unlucky image discarded");
                    rejected += 1;
                    continue;
                }
                Some(Ordering::Less) => {
                    trace!(level = m, "smaller image; restarting accumulation");
                    modulus = Modulus::new();
                    g = Mpolyn::zero(layout, m);
                    abar = Mpolyn::zero(layout, m);
                    bbar = Mpolyn::zero(layout, m);
                }
                _ => {}
            }
            lead = Some(e);

            if let [plus, minus] = images.as_slice() {
                let Some(w) = modulus.pair(alpha) else {
                    rejected += 1;
                    continue;
                };
                g = mpolyn_update_pair(&g, &modulus, &w, &plus.g, &minus.g);
                abar = mpolyn_update_pair(&abar, &modulus, &w, &plus.abar, &minus.abar);
                bbar = mpolyn_update_pair(&bbar, &modulus, &w, &plus.bbar, &minus.bbar);
                modulus.push_pair(alpha);
            } else {
                let Some(w) = modulus.single(alpha) else {
                    rejected += 1;
                    continue;
                };
                let image = &images[0];
                g = mpolyn_update_single(&g, &modulus, &w, &image.g);
                abar = mpolyn_update_single(&abar, &modulus, &w, &image.abar);
                bbar = mpolyn_update_single(&bbar, &modulus, &w, &image.bbar);
                modulus.push_single(alpha);
            }
        }

        let dg = g.degree_folded().unwrap_or(0);
        let da = abar.degree_folded().unwrap_or(0);
        let db = bbar.degree_folded().unwrap_or(0);
        if dg + da != deg_gamma + deg_a || dg + db != deg_gamma + deg_b {
            debug!(level = m, attempt, "degree check failed; restarting");
            continue;
        }

        let Some(g) = g.div_poly_exact(&g.content()) else {
            continue;
        };
        let lc = g.lead_poly();
        let (Some(abar), Some(bbar)) = (abar.div_poly_exact(&lc), bbar.div_poly_exact(&lc)) else {
            debug!(level = m, attempt, "cofactor division failed; restarting");
            continue;
        };
        let sa = poly_div_exact(&ca, &cg).ok_or(Failure::Retry)?;
        let sb = poly_div_exact(&cb, &cg).ok_or(Failure::Retry)?;
        return Ok((
            g.mul_poly(&cg).to_sparse(),
            abar.mul_poly(&sa).to_sparse(),
            bbar.mul_poly(&sb).to_sparse(),
        ));
    }
    Err(Failure::Retry)
}

struct UniImage<F: PrimeField> {
    deg: usize,
    g: DensePoly<F>,
    abar: DensePoly<F>,
    bbar: DensePoly<F>,
}

fn univariate_image<F: PrimeField>(a: &DensePoly<F>, b: &DensePoly<F>, gamma: F) -> UniImage<F> {
    // The gcd is monic, so the cofactor images need no rescaling.
    let (g, abar, bbar) = poly_gcd_cofactors(a, b);
    UniImage {
        deg: g.degree().unwrap_or(0),
        g: g.scale(gamma),
        abar,
        bbar,
    }
}

/// Brown's algorithm for two variables, interpolating the inner one.
///
/// Returns `(g, abar, bbar)` with `g * abar = a` and `g * bbar = b`.
#[allow(clippy::too_many_lines)]
pub(crate) fn brown_bivariate<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &Bpoly<F>,
    b: &Bpoly<F>,
) -> Result<(Bpoly<F>, Bpoly<F>, Bpoly<F>), Failure> {
    if a.is_zero() || b.is_zero() {
        return Err(Failure::Inapplicable);
    }
    let ca = a.content();
    let cb = b.content();
    let a = a.div_inner_exact(&ca).ok_or(Failure::Retry)?;
    let b = b.div_inner_exact(&cb).ok_or(Failure::Retry)?;
    let cg = poly_gcd(&ca, &cb);

    let lc_a = a.lead();
    let lc_b = b.lead();
    let gamma = poly_gcd(&lc_a, &lc_b);
    let deg_gamma = gamma.degree().unwrap_or(0);
    let deg_a = a.degree_inner().unwrap_or(0);
    let deg_b = b.degree_inner().unwrap_or(0);
    let bound = 1 + deg_gamma + deg_a.max(deg_b);
    if bound as u64 >= F::characteristic() {
        return Err(Failure::Exhausted);
    }

    let pairs = F::characteristic() != 2;
    let restarts = solver.config().restarts;
    let max_rejected = solver.config().max_brown_images;

    for attempt in 0..restarts {
        let mut modulus = Modulus::new();
        let mut g = Bpoly::zero();
        let mut abar = Bpoly::zero();
        let mut bbar = Bpoly::zero();
        let mut lead: Option<usize> = None;
        let mut rejected = 0;

        while modulus.degree() < bound {
            if rejected > max_rejected {
                debug!(rejected, "too many rejected bivariate images");
                return Err(Failure::Retry);
            }
            let alpha = F::random_nonzero(solver.rng());

            let images = if pairs {
                if modulus.pair(alpha).is_none() {
                    rejected += 1;
                    continue;
                }
                let (gp, gm) = gamma.eval_sym(alpha);
                let (lap, lam) = lc_a.eval_sym(alpha);
                let (lbp, lbm) = lc_b.eval_sym(alpha);
                if [gp, gm, lap, lam, lbp, lbm].iter().any(|x| x.is_zero()) {
                    rejected += 1;
                    continue;
                }
                let (ap, am) = a.eval_inner_sym(alpha);
                let (bp, bm) = b.eval_inner_sym(alpha);
                let plus = univariate_image(&ap, &bp, gp);
                let minus = univariate_image(&am, &bm, gm);
                if plus.deg != minus.deg {
                    rejected += 1;
                    continue;
                }
                vec![plus, minus]
            } else {
                if modulus.single(alpha).is_none() {
                    rejected += 1;
                    continue;
                }
                let gv = gamma.eval(alpha);
                if gv.is_zero() || lc_a.eval(alpha).is_zero() || lc_b.eval(alpha).is_zero() {
                    rejected += 1;
                    continue;
                }
                vec![univariate_image(&a.eval_inner(alpha), &b.eval_inner(alpha), gv)]
            };

            let d = images[0].deg;
            match lead.map(|l| d.cmp(&l)) {
                Some(Ordering::Greater) => {
                    trace!(degree = d, "unlucky bivariate image discarded");
                    rejected += 1;
                    continue;
                }
                Some(Ordering::Less) => {
                    modulus = Modulus::new();
                    g = Bpoly::zero();
                    abar = Bpoly::zero();
                    bbar = Bpoly::zero();
                }
                _ => {}
            }
            lead = Some(d);

            if let [plus, minus] = images.as_slice() {
                let Some(w) = modulus.pair(alpha) else {
                    rejected += 1;
                    continue;
                };
                g = bpoly_update_pair(&g, &modulus, &w, &plus.g, &minus.g);
                abar = bpoly_update_pair(&abar, &modulus, &w, &plus.abar, &minus.abar);
                bbar = bpoly_update_pair(&bbar, &modulus, &w, &plus.bbar, &minus.bbar);
                modulus.push_pair(alpha);
            } else {
                let Some(w) = modulus.single(alpha) else {
                    rejected += 1;
                    continue;
                };
                let image = &images[0];
                g = bpoly_update_single(&g, &modulus, &w, &image.g);
                abar = bpoly_update_single(&abar, &modulus, &w, &image.abar);
                bbar = bpoly_update_single(&bbar, &modulus, &w, &image.bbar);
                modulus.push_single(alpha);
            }
        }

        let dg = g.degree_inner().unwrap_or(0);
        let da = abar.degree_inner().unwrap_or(0);
        let db = bbar.degree_inner().unwrap_or(0);
        if dg + da != deg_gamma + deg_a || dg + db != deg_gamma + deg_b {
            debug!(attempt, "bivariate degree check failed; restarting");
            continue;
        }

        let Some(g) = g.div_inner_exact(&g.content()) else {
            continue;
        };
        let lc = g.lead();
        let (Some(abar), Some(bbar)) = (abar.div_inner_exact(&lc), bbar.div_inner_exact(&lc)) else {
            continue;
        };
        let sa = poly_div_exact(&ca, &cg).ok_or(Failure::Retry)?;
        let sb = poly_div_exact(&cb, &cg).ok_or(Failure::Retry)?;
        return Ok((g.mul_inner(&cg), abar.mul_inner(&sa), bbar.mul_inner(&sb)));
    }
    Err(Failure::Retry)
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

    fn check(a: &SparsePoly<F>, b: &SparsePoly<F>, expected: &SparsePoly<F>) {
        let mut solver = GcdSolver::default();
        let (g, abar, bbar) = brown_gcd(&mut solver, a, b).unwrap();
        assert_eq!(g.mul(&abar), *a);
        assert_eq!(g.mul(&bbar), *b);
        assert_eq!(g.make_monic(), expected.make_monic());
    }

    #[test]
    fn test_bivariate() {
        let g = p(2, &[(&[1, 1], 1), (&[0, 0], 3)]);
        let a = g.mul(&p(2, &[(&[1, 0], 1), (&[0, 2], 1), (&[0, 0], 1)]));
        let b = g.mul(&p(2, &[(&[2, 0], 1), (&[0, 1], 2)]));
        check(&a, &b, &g);
    }

    #[test]
    fn test_bivariate_with_content() {
        // Contents (x1 + 1) and (x1 + 1)(x1 - 2) share x1 + 1.
        let g = p(2, &[(&[1, 0], 1), (&[0, 1], 5)]);
        let c = p(2, &[(&[0, 1], 1), (&[0, 0], 1)]);
        let a = g.mul(&c).mul(&p(2, &[(&[1, 0], 1), (&[0, 0], 7)]));
        let b = g.mul(&c).mul(&p(2, &[(&[0, 1], 1), (&[0, 0], -2)]));
        let expected = g.mul(&c);
        check(&a, &b, &expected);
    }

    #[test]
    fn test_trivariate() {
        let g = p(3, &[(&[1, 0, 0], 1), (&[0, 1, 1], 1), (&[0, 0, 0], 1)]);
        let a = g.mul(&p(3, &[(&[1, 0, 1], 1), (&[0, 0, 0], 1)]));
        let b = g.mul(&p(3, &[(&[0, 1, 0], 1), (&[0, 0, 2], 1), (&[0, 0, 0], 5)]));
        check(&a, &b, &g);
    }

    #[test]
    fn test_trivariate_non_monic_gcd() {
        // Leading coefficient x2 + 1 in x0 forces gamma scaling.
        let g = p(3, &[(&[1, 0, 1], 1), (&[1, 0, 0], 1), (&[0, 2, 0], 1), (&[0, 0, 0], 4)]);
        let a = g.mul(&p(3, &[(&[1, 1, 0], 3), (&[0, 0, 1], 1)]));
        let b = g.mul(&p(3, &[(&[2, 0, 0], 1), (&[0, 1, 1], -1), (&[0, 0, 0], 2)]));
        check(&a, &b, &g);
    }

    #[test]
    fn test_coprime() {
        let a = p(3, &[(&[1, 1, 0], 1), (&[0, 0, 1], 1)]);
        let b = p(3, &[(&[0, 1, 1], 1), (&[1, 0, 0], 2), (&[0, 0, 0], 1)]);
        let one = SparsePoly::one(3);
        check(&a, &b, &one);
    }

    #[test]
    fn test_characteristic_two() {
        // Primitive parts are free of x1 and x2, so one point per level suffices.
        type G = FiniteField<2>;
        let f = |terms: &[&[u64]]| {
            SparsePoly::<G>::from_exponents(3, terms.iter().map(|e| (e.to_vec(), G::new(1))).collect())
        };
        let c = f(&[&[0, 1, 0], &[0, 0, 0]]).mul(&f(&[&[0, 0, 1], &[0, 0, 0]]));
        let a = c.mul(&f(&[&[1, 0, 0], &[0, 0, 0]]));
        let b = c.mul(&f(&[&[1, 0, 0]]));
        let mut solver = GcdSolver::default();
        let (g, abar, bbar) = brown_gcd(&mut solver, &a, &b).unwrap();
        assert_eq!(g.make_monic(), c);
        assert_eq!(g.mul(&abar), a);
        assert_eq!(g.mul(&bbar), b);
    }

    #[test]
    fn test_small_field_exhausted() {
        type G = FiniteField<5>;
        let x = |e: &[u64]| SparsePoly::<G>::monomial(e, G::new(1));
        // Degree 6 in x1 needs more points than the field has.
        let a = x(&[1, 0]).add(&x(&[0, 6]));
        let b = x(&[1, 1]).add(&x(&[0, 0]));
        let mut solver = GcdSolver::default();
        let result = brown_bivariate(&mut solver, &Bpoly::from_sparse(&a, 0, 1), &Bpoly::from_sparse(&b, 0, 1));
        assert_eq!(result.err(), Some(Failure::Exhausted));
    }
}
