//! Per-call degree statistics and variable orders.
//!
//! Gcd degree bounds come from univariate images: if a point keeps the
//! degrees of both inputs in `x_v`, the gcd of the images has degree at
//! least `deg_v G`. The smallest value over a few trials is kept.

use polygcd_poly::algorithms::gcd::poly_gcd;
use polygcd_poly::SparsePoly;
use polygcd_rings::PrimeField;
use tracing::{debug, trace};

use crate::eval::{random_point, reduce_univariate};
use crate::solver::GcdSolver;

/// Statistics for one gcd call on inputs that share every used variable.
#[derive(Clone, Debug)]
pub(crate) struct GcdContext {
    pub(crate) nvars: usize,
    pub(crate) degs_a: Vec<u64>,
    pub(crate) degs_b: Vec<u64>,
    /// Used variables, ascending.
    pub(crate) vars: Vec<usize>,
    /// Upper bound on `deg_v G`, indexed by variable.
    pub(crate) gdeg: Vec<u64>,
    pub(crate) density_a: f64,
    pub(crate) density_b: f64,
    /// Terms in the leading coefficients of both inputs in `x_v`.
    pub(crate) lc_terms: Vec<usize>,
    pub(crate) brown_perm: Vec<usize>,
    pub(crate) zippel_perm: Vec<usize>,
    pub(crate) hensel_perm: Vec<usize>,
}

impl GcdContext {
    pub(crate) fn new<F: PrimeField>(solver: &mut GcdSolver, a: &SparsePoly<F>, b: &SparsePoly<F>) -> Self {
        let nvars = a.nvars();
        let degs_a = a.degrees();
        let degs_b = b.degrees();
        let vars = a.used_vars();

        let mut gdeg = vec![0; nvars];
        for &v in &vars {
            gdeg[v] = degree_bound(solver, a, b, v);
        }
        trace!(?gdeg, "gcd degree bounds");

        let density = |p: &SparsePoly<F>, degs: &[u64]| {
            let volume: f64 = vars.iter().map(|&v| degs[v] as f64 + 1.0).product();
            p.len() as f64 / volume
        };
        let density_a = density(a, &degs_a);
        let density_b = density(b, &degs_b);

        let mut lc_terms = vec![0; nvars];
        for &v in &vars {
            lc_terms[v] = a.lead_coeff_in(v).len() + b.lead_coeff_in(v).len();
        }

        let max_deg = |v: usize| degs_a[v].max(degs_b[v]);

        let mut brown_perm = vars.clone();
        brown_perm.sort_by_key(|&v| std::cmp::Reverse(max_deg(v)));

        let mut zippel_perm = Vec::with_capacity(vars.len());
        let mut rest = vars.clone();
        if let Some(i) = (0..rest.len()).min_by_key(|&i| (lc_terms[rest[i]], std::cmp::Reverse(max_deg(rest[i])))) {
            zippel_perm.push(rest.remove(i));
        }
        rest.sort_by_key(|&v| std::cmp::Reverse(max_deg(v)));
        zippel_perm.extend(rest);

        let mut hensel_perm = vars.clone();
        hensel_perm.sort_by_key(|&v| std::cmp::Reverse((gdeg[v], max_deg(v))));

        debug!(nvars = vars.len(), density_a, density_b, "gcd statistics");
        Self {
            nvars,
            degs_a,
            degs_b,
            vars,
            gdeg,
            density_a,
            density_b,
            lc_terms,
            brown_perm,
            zippel_perm,
            hensel_perm,
        }
    }

    /// Dense enough for Brown to be the first choice.
    pub(crate) fn is_dense(&self, threshold: f64) -> bool {
        self.vars.len() <= 2 || self.density_a.min(self.density_b) >= threshold
    }

    /// Every degree bound is zero, so the gcd is a constant.
    pub(crate) fn gcd_is_one(&self) -> bool {
        self.vars.iter().all(|&v| self.gdeg[v] == 0)
    }

    /// The bounds allow `G` to be all of `A`.
    pub(crate) fn may_equal_a(&self) -> bool {
        self.vars.iter().all(|&v| self.gdeg[v] >= self.degs_a[v])
    }

    /// The bounds allow `G` to be all of `B`.
    pub(crate) fn may_equal_b(&self) -> bool {
        self.vars.iter().all(|&v| self.gdeg[v] >= self.degs_b[v])
    }
}

fn degree_bound<F: PrimeField>(solver: &mut GcdSolver, a: &SparsePoly<F>, b: &SparsePoly<F>, v: usize) -> u64 {
    let mut bound = a.degree_in(v).min(b.degree_in(v));
    let trials = solver.config().stat_trials;
    let retries = solver.config().point_retries;
    for _ in 0..trials {
        for _ in 0..retries {
            let point = random_point(solver.rng(), a.nvars());
            let Some((ai, bi)) = reduce_univariate(a, b, v, &point) else {
                trace!(v, "univariate image lost degree; resampling");
                continue;
            };
            let d = poly_gcd(&ai, &bi).degree().unwrap_or(0) as u64;
            bound = bound.min(d);
            break;
        }
        if bound == 0 {
            break;
        }
    }
    bound
}
