//! Gcd by Hensel lifting from a bivariate image.
//!
//! The inputs are shifted so a random point becomes the origin, then
//! reduced to `x_0, x_1` by setting the other variables to zero. Brown's
//! algorithm gives the bivariate gcd `g` and cofactors there. The factors
//!
//! ```text
//! gamma * g / lc(g)   and   lc(g) * (abar + c * bbar)
//! ```
//!
//! of `gamma * (A + c * B)` at the origin are lifted through `x_2, ...`
//! with their leading coefficients in `x_0` imposed, which makes each lift
//! unique. `c = 0` is tried first; a random `c` is used when the first
//! factor and its cofactor are not coprime.

use polygcd_lift::{hensel_lift_step, LiftError};
use polygcd_poly::{Bpoly, SparsePoly};
use polygcd_rings::PrimeField;
use tracing::{debug, trace};

use crate::brown::brown_bivariate;
use crate::content::{content_in, Primitive};
use crate::error::Failure;
use crate::eval::random_point;
use crate::solver::{GcdCofactors, GcdSolver, GcdTriple};
use crate::strategy::GcdContext;

/// Values of `c` tried per bivariate image.
const COMBINATIONS: usize = 3;

/// Runs the Hensel engine on the variables in `ctx.hensel_perm`.
pub(crate) fn try_hensel<F: PrimeField>(
    solver: &mut GcdSolver,
    a: &SparsePoly<F>,
    b: &SparsePoly<F>,
    ctx: &GcdContext,
) -> Result<GcdTriple<F>, Failure> {
    let perm = &ctx.hensel_perm;
    if perm.len() < 3 {
        return Err(Failure::Inapplicable);
    }
    let ap = a.select_vars(perm);
    let bp = b.select_vars(perm);
    let prim = Primitive::new(solver, &ap, &bp)?;
    let r = hensel(solver, &prim)?;
    Ok(GcdCofactors {
        g: r.g.expand_vars(perm, ctx.nvars),
        abar: r.abar.expand_vars(perm, ctx.nvars),
        bbar: r.bbar.expand_vars(perm, ctx.nvars),
    })
}

/// Inputs shifted to a random point with `x_0` fixed.
struct Shifted<F: PrimeField> {
    alpha: Vec<F>,
    a: SparsePoly<F>,
    b: SparsePoly<F>,
    gamma: SparsePoly<F>,
    a2: Bpoly<F>,
    b2: Bpoly<F>,
}

fn shift<F: PrimeField>(solver: &mut GcdSolver, prim: &Primitive<F>) -> Result<Shifted<F>, Failure> {
    let n = prim.a.nvars();
    let keeps = |p: &SparsePoly<F>, image: &SparsePoly<F>| {
        image.degree_in(0) == p.degree_in(0) && image.degree_in(1) == p.degree_in(1)
    };
    for _ in 0..solver.config().point_retries {
        let mut alpha: Vec<F> = random_point(solver.rng(), n);
        alpha[0] = F::zero();
        let a = prim.a.taylor_shift(&alpha);
        let a2 = a.eval_at_zero_from(2);
        if !keeps(&prim.a, &a2) {
            trace!("shifted image of A lost degree");
            continue;
        }
        let b = prim.b.taylor_shift(&alpha);
        let b2 = b.eval_at_zero_from(2);
        if !keeps(&prim.b, &b2) {
            trace!("shifted image of B lost degree");
            continue;
        }
        return Ok(Shifted {
            gamma: prim.gamma.taylor_shift(&alpha),
            alpha,
            a,
            b,
            a2: Bpoly::from_sparse(&a2, 0, 1),
            b2: Bpoly::from_sparse(&b2, 0, 1),
        });
    }
    Err(Failure::Retry)
}

/// Lifts `factors` of `q(x_2 = ... = 0)` to factors of `q`.
fn lift_all<F: PrimeField>(
    q: &SparsePoly<F>,
    mut factors: Vec<SparsePoly<F>>,
    leads: &[SparsePoly<F>],
) -> Result<Vec<SparsePoly<F>>, LiftError> {
    for k in 2..q.nvars() {
        let qk = q.eval_at_zero_from(k + 1);
        let lk: Vec<SparsePoly<F>> = leads.iter().map(|l| l.eval_at_zero_from(k + 1)).collect();
        factors = hensel_lift_step(&qk, &factors, &lk, k)?;
    }
    Ok(factors)
}

fn hensel<F: PrimeField>(solver: &mut GcdSolver, prim: &Primitive<F>) -> Result<GcdTriple<F>, Failure> {
    let n = prim.a.nvars();
    let deg_a = prim.a.degree_in(0);
    let deg_b = prim.b.degree_in(0);
    let restarts = solver.config().restarts;

    'restart: for attempt in 0..restarts {
        let sh = shift(solver, prim)?;
        let (g2, abar2, bbar2) = match brown_bivariate(solver, &sh.a2, &sh.b2) {
            Ok(triple) => triple,
            Err(Failure::Retry) => continue,
            Err(failure) => return Err(failure),
        };

        let deg0 = g2.degree_outer().unwrap_or(0) as u64;
        if deg0 == 0 {
            trace!("bivariate image is coprime in x0");
            return Ok(prim.coprime());
        }
        if deg0 == deg_a || deg0 == deg_b {
            let candidate = if deg0 == deg_a { &prim.a } else { &prim.b };
            if let Some(r) = prim.verify(candidate) {
                return Ok(r);
            }
            debug!(attempt, "closed-form candidate failed; restarting");
            continue;
        }

        let lc_g2 = g2.lead();
        let gamma2 = Bpoly::from_sparse(&sh.gamma.eval_at_zero_from(2), 0, 1);
        let Some(ghat2) = g2.mul_inner(&gamma2.coeff(0)).div_inner_exact(&lc_g2) else {
            continue;
        };
        let ghat2 = ghat2.to_sparse(n, 0, 1);
        let lc_g2 = SparsePoly::from_dense(&lc_g2, 1, n);
        let abar2 = abar2.to_sparse(n, 0, 1);
        let bbar2 = bbar2.to_sparse(n, 0, 1);

        for round in 0..COMBINATIONS {
            let c = if round == 0 { F::zero() } else { F::random_nonzero(solver.rng()) };
            let s = sh.a.add(&sh.b.scale(c));
            let that2 = abar2.add(&bbar2.scale(c)).mul(&lc_g2);
            let q = sh.gamma.mul(&s);
            let leads = [sh.gamma.clone(), s.lead_coeff_in(0)];

            let lifted = match lift_all(&q, vec![ghat2.clone(), that2], &leads) {
                Ok(lifted) => lifted,
                Err(LiftError::NotCoprime | LiftError::DegreeMismatch { .. }) => {
                    trace!(round, "lifting factors rejected; new combination");
                    continue;
                }
                Err(LiftError::NoSolution) => {
                    debug!(attempt, "hensel lift has no solution; restarting");
                    continue 'restart;
                }
                Err(LiftError::InvalidVariable { .. }) => return Err(Failure::Inapplicable),
            };

            let back: Vec<F> = sh.alpha.iter().map(|&x| -x).collect();
            let ghat = lifted[0].taylor_shift(&back);
            let content = content_in(solver, &ghat, 0)?;
            let Some(g) = ghat.div_exact(&content) else {
                continue 'restart;
            };
            if g.degree_in(0) != deg0 {
                continue 'restart;
            }
            if let Some(r) = prim.verify(&g) {
                return Ok(r);
            }
            debug!(attempt, "lifted gcd does not divide; restarting");
            continue 'restart;
        }
    }
    Err(Failure::Retry)
}
