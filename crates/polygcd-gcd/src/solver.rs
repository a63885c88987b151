//! The gcd orchestrator.
//!
//! Trivial shapes are settled in closed form before any randomness is used:
//! zero and monomial inputs, deflation, proportional inputs, disjoint or
//! single shared variables, and variables present in one input only. The
//! remaining inputs get degree statistics and then the engines, in an order
//! chosen from their density. Pseudo-remainders are the last resort when
//! every engine fails, as they do over fields with too few points.

use polygcd_poly::monomial::bits_needed;
use polygcd_poly::{deflate, deflation_params, inflate, SparsePoly};
use polygcd_rings::PrimeField;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::brown::try_brown;
use crate::config::{Algorithm, GcdConfig};
use crate::error::{Failure, GcdError, MAX_BITS};
use crate::hensel::try_hensel;
use crate::prs::try_prs;
use crate::strategy::GcdContext;
use crate::trivial::{
    disjoint_gcd, monomial_gcd, try_divides, try_missing_var, try_monomial_cofactors,
    try_one_shared_var, zero_gcd,
};
use crate::zippel::{try_zippel, try_zippel2};

/// A gcd together with its cofactors.
///
/// `g * abar = a` and `g * bbar = b`; `g` is monic unless both inputs are zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GcdCofactors<F: PrimeField> {
    /// The greatest common divisor.
    pub g: SparsePoly<F>,
    /// The first input divided by `g`.
    pub abar: SparsePoly<F>,
    /// The second input divided by `g`.
    pub bbar: SparsePoly<F>,
}

/// The result of one engine attempt, not yet normalized.
pub(crate) type GcdTriple<F> = GcdCofactors<F>;

impl<F: PrimeField> GcdCofactors<F> {
    /// Rescales `g` to be monic, moving the scale into the cofactors.
    #[must_use]
    fn normalized(self) -> Self {
        let lc = self.g.leading_coeff();
        match lc.inv() {
            Some(inv) if !lc.is_one() => Self {
                g: self.g.scale(inv),
                abar: self.abar.scale(lc),
                bbar: self.bbar.scale(lc),
            },
            _ => self,
        }
    }
}

/// Multivariate gcd solver.
///
/// Owns the random state, so repeated calls with the same seed and inputs
/// are reproducible.
#[derive(Clone, Debug)]
pub struct GcdSolver {
    config: GcdConfig,
    rng: ChaCha8Rng,
}

impl Default for GcdSolver {
    fn default() -> Self {
        Self::new(GcdConfig::default())
    }
}

impl GcdSolver {
    /// Creates a new solver with the given configuration.
    #[must_use]
    pub fn new(config: GcdConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Creates a solver that tries `algorithm` before the usual order.
    #[must_use]
    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self::new(GcdConfig::with_algorithm(algorithm))
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &GcdConfig {
        &self.config
    }

    pub(crate) fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Computes the monic gcd of `a` and `b`.
    ///
    /// # Errors
    ///
    /// See [`GcdSolver::gcd_cofactors`].
    pub fn gcd<F: PrimeField>(&mut self, a: &SparsePoly<F>, b: &SparsePoly<F>) -> Result<SparsePoly<F>, GcdError> {
        self.gcd_cofactors(a, b).map(|r| r.g)
    }

    /// Computes the monic gcd of `a` and `b` with both cofactors.
    ///
    /// # Errors
    ///
    /// - `VariableMismatch` if the inputs have different variable counts
    /// - `ExponentOverflow` if deflated exponents need more than 62 bits
    /// - `Exhausted` if every engine ran out of retries
    pub fn gcd_cofactors<F: PrimeField>(
        &mut self,
        a: &SparsePoly<F>,
        b: &SparsePoly<F>,
    ) -> Result<GcdCofactors<F>, GcdError> {
        if a.nvars() != b.nvars() {
            return Err(GcdError::VariableMismatch {
                left: a.nvars(),
                right: b.nvars(),
            });
        }
        self.compute(a, b).map_err(|f| match f {
            Failure::Overflow => GcdError::ExponentOverflow {
                bits: deflated_bits(a, b),
            },
            Failure::Retry | Failure::Inapplicable | Failure::Exhausted => GcdError::Exhausted,
        })
    }

    /// Gcd with cofactors; also the entry point for recursive calls.
    pub(crate) fn compute<F: PrimeField>(
        &mut self,
        a: &SparsePoly<F>,
        b: &SparsePoly<F>,
    ) -> Result<GcdCofactors<F>, Failure> {
        if a.is_zero() || b.is_zero() {
            return Ok(zero_gcd(a, b));
        }
        if a.is_monomial() || b.is_monomial() {
            return Ok(monomial_gcd(a, b));
        }

        let deflation = deflation_params(&[a, b]);
        if deflation.is_trivial() {
            if bits_needed(a.max_exponent().max(b.max_exponent())) > MAX_BITS {
                return Err(Failure::Overflow);
            }
            return self.compute_deflated(a, b).map(GcdCofactors::normalized);
        }

        let strides = &deflation.strides;
        let (sa, sb) = (&deflation.shifts[0], &deflation.shifts[1]);
        let a0 = deflate(a, sa, strides);
        let b0 = deflate(b, sb, strides);
        if bits_needed(a0.max_exponent().max(b0.max_exponent())) > MAX_BITS {
            return Err(Failure::Overflow);
        }
        trace!(?strides, "deflated inputs");
        let r = self.compute_deflated(&a0, &b0)?;

        let sg: Vec<u64> = sa.iter().zip(sb).map(|(x, y)| *x.min(y)).collect();
        let rest = |s: &[u64]| -> Vec<u64> { s.iter().zip(&sg).map(|(x, g)| x - g).collect() };
        let g = inflate(&r.g, &sg, strides).ok_or(Failure::Overflow)?;
        let abar = inflate(&r.abar, &rest(sa), strides).ok_or(Failure::Overflow)?;
        let bbar = inflate(&r.bbar, &rest(sb), strides).ok_or(Failure::Overflow)?;
        Ok(GcdCofactors { g, abar, bbar }.normalized())
    }

    fn compute_deflated<F: PrimeField>(
        &mut self,
        a: &SparsePoly<F>,
        b: &SparsePoly<F>,
    ) -> Result<GcdCofactors<F>, Failure> {
        if let Some(r) = try_monomial_cofactors(a, b) {
            trace!("proportional inputs");
            return Ok(r);
        }

        let used_b = b.used_vars();
        let shared: Vec<usize> = a.used_vars().into_iter().filter(|v| used_b.contains(v)).collect();
        match shared.as_slice() {
            [] => return Ok(disjoint_gcd(a, b)),
            [v] => return try_one_shared_var(a, b, *v),
            _ => {}
        }

        if let Some(r) = try_missing_var(self, a, b)? {
            return Ok(r);
        }

        let ctx = GcdContext::new(self, a, b);
        if ctx.gcd_is_one() {
            trace!("degree bounds prove a trivial gcd");
            return Ok(disjoint_gcd(a, b));
        }
        if let Some(r) = try_divides(a, b, &ctx) {
            return Ok(r);
        }

        let dense = ctx.is_dense(self.config.dense_threshold);
        for algorithm in self.config.order(dense) {
            debug!(?algorithm, nvars = ctx.vars.len(), dense, "trying gcd engine");
            let result = match algorithm {
                Algorithm::Brown => try_brown(self, a, b, &ctx),
                Algorithm::Zippel => try_zippel(self, a, b, &ctx),
                Algorithm::Zippel2 => try_zippel2(self, a, b, &ctx),
                Algorithm::Hensel => try_hensel(self, a, b, &ctx),
            };
            match result {
                Ok(r) => return Ok(r),
                Err(Failure::Overflow) => return Err(Failure::Overflow),
                Err(failure) => debug!(?algorithm, ?failure, "gcd engine failed; falling through"),
            }
        }
        debug!(nvars = ctx.vars.len(), "every engine failed; using pseudo-remainders");
        try_prs(a, b)
    }

    /// Monic gcd of a list of polynomials, smallest first.
    pub(crate) fn gcd_many<F: PrimeField>(&mut self, mut polys: Vec<SparsePoly<F>>) -> Result<SparsePoly<F>, Failure> {
        polys.sort_by_key(SparsePoly::len);
        let mut iter = polys.into_iter();
        let Some(first) = iter.next() else {
            return Err(Failure::Inapplicable);
        };
        let mut g = first.make_monic();
        for p in iter {
            if g.is_constant() {
                break;
            }
            g = self.compute(&g, &p)?.g;
        }
        Ok(g)
    }
}

/// Bits needed by the largest exponent once both inputs are deflated.
fn deflated_bits<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> u32 {
    let d = deflation_params(&[a, b]);
    let a0 = deflate(a, &d.shifts[0], &d.strides);
    let b0 = deflate(b, &d.shifts[1], &d.strides);
    bits_needed(a0.max_exponent().max(b0.max_exponent()))
}

/// Computes the monic gcd of `a` and `b` with the default configuration.
///
/// # Errors
///
/// See [`GcdSolver::gcd_cofactors`].
pub fn gcd<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> Result<SparsePoly<F>, GcdError> {
    GcdSolver::default().gcd(a, b)
}

/// Computes the monic gcd and cofactors with the default configuration.
///
/// # Errors
///
/// See [`GcdSolver::gcd_cofactors`].
pub fn gcd_cofactors<F: PrimeField>(a: &SparsePoly<F>, b: &SparsePoly<F>) -> Result<GcdCofactors<F>, GcdError> {
    GcdSolver::default().gcd_cofactors(a, b)
}
