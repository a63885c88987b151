//! Multivariate Hensel lifting with imposed leading coefficients.
//!
//! Given `target ∈ K[x_0, ..., x_m]` and factors `f_1, ..., f_r` of
//! `target(x_m = 0)` whose images at the origin are pairwise coprime, lifts
//! each `f_i` to `F_i` with `Π F_i = target` and `lc_{x_0}(F_i)` equal to a
//! prescribed polynomial. With the leading coefficients fixed, every
//! correction has `x_0`-degree below the factor's, which makes the lift
//! unique.
//!
//! # Algorithm
//!
//! 1. Replace `lc_{x_0}(f_i)` by the prescribed leading coefficient
//! 2. For `j = 1, ..., deg_{x_m}(target)`, take the `x_m^j` coefficient `c`
//!    of the error `target - Π F_i` and solve `Σ σ_i Π_{k≠i} f_k = c`
//! 3. Add `σ_i x_m^j` to `F_i`; the error then vanishes modulo `x_m^{j+1}`

use polygcd_poly::SparsePoly;
use polygcd_rings::PrimeField;
use tracing::trace;

use crate::pfrac::LiftContext;
use crate::LiftError;

/// Lifts factors of `target(x_var = 0)` to factors of `target`.
///
/// `leading_coeffs[i]` is the `x_0`-leading coefficient the lifted factor
/// `i` must have; it must not involve `x_0` and must reduce to
/// `lc_{x_0}(factors[i])` at `x_var = 0`. Variables above `var` must be
/// absent from every input.
///
/// # Errors
///
/// - `InvalidVariable` if `var` is `0` or not a variable of `target`
/// - `DegreeMismatch` if a leading coefficient is inconsistent with its factor
/// - `NotCoprime` if the factor images at the origin share a factor
/// - `NoSolution` if `target` has no factorization of the requested shape
pub fn hensel_lift_step<F: PrimeField>(
    target: &SparsePoly<F>,
    factors: &[SparsePoly<F>],
    leading_coeffs: &[SparsePoly<F>],
    var: usize,
) -> Result<Vec<SparsePoly<F>>, LiftError> {
    let nvars = target.nvars();
    if var == 0 || var >= nvars {
        return Err(LiftError::InvalidVariable { var, nvars });
    }
    debug_assert_eq!(factors.len(), leading_coeffs.len());

    let ctx = LiftContext::new(factors, var - 1)?;

    let mut lifted = Vec::with_capacity(factors.len());
    for (index, (f, lc)) in factors.iter().zip(leading_coeffs).enumerate() {
        let old_lc = f.lead_coeff_in(0);
        if lc.eval_at_zero_from(var) != old_lc {
            return Err(LiftError::DegreeMismatch { index });
        }
        let mut top = vec![0u64; nvars];
        top[0] = f.degree_in(0);
        let tail = f.sub(&old_lc.mul_monomial(&top, F::one()));
        lifted.push(tail.add(&lc.mul_monomial(&top, F::one())));
    }

    let mut err = target.sub(&product(&lifted, nvars));
    if !err.coeff_in(var, 0).is_zero() {
        return Err(LiftError::NoSolution);
    }

    let mut exps = vec![0u64; nvars];
    for j in 1..=target.degree_in(var) {
        if err.is_zero() {
            break;
        }
        let c = err.coeff_in(var, j);
        if c.is_zero() {
            continue;
        }
        let sigma = ctx.solve(&c, var - 1)?;
        exps[var] = j;
        for (f, s) in lifted.iter_mut().zip(&sigma) {
            *f = f.add(&s.mul_monomial(&exps, F::one()));
        }
        err = target.sub(&product(&lifted, nvars));
        trace!(var, power = j, error_terms = err.len(), "hensel correction");
    }

    if err.is_zero() {
        Ok(lifted)
    } else {
        Err(LiftError::NoSolution)
    }
}

fn product<F: PrimeField>(factors: &[SparsePoly<F>], nvars: usize) -> SparsePoly<F> {
    factors
        .iter()
        .fold(SparsePoly::one(nvars), |acc, f| acc.mul(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::FiniteField;

    type F = FiniteField<101>;

    fn p(nvars: usize, terms: &[(&[u64], i64)]) -> SparsePoly<F> {
        SparsePoly::from_exponents(
            nvars,
            terms.iter().map(|(e, c)| (e.to_vec(), F::from_signed(*c))).collect(),
        )
    }

    #[test]
    fn test_lift_monic_factors() {
        // F1 = x0^2 + x1 x0 + x2 + 1, F2 = x0 + x1 + 2 x2 + 3
        let f1 = p(3, &[(&[2, 0, 0], 1), (&[1, 1, 0], 1), (&[0, 0, 1], 1), (&[0, 0, 0], 1)]);
        let f2 = p(3, &[(&[1, 0, 0], 1), (&[0, 1, 0], 1), (&[0, 0, 1], 2), (&[0, 0, 0], 3)]);
        let target = f1.mul(&f2);

        let images = [f1.eval_at_zero_from(2), f2.eval_at_zero_from(2)];
        let lcs = [SparsePoly::one(3), SparsePoly::one(3)];
        let lifted = hensel_lift_step(&target, &images, &lcs, 2).unwrap();
        assert_eq!(lifted, vec![f1, f2]);
    }

    #[test]
    fn test_lift_with_leading_coefficients() {
        // F1 = (x2 + 1) x0^2 + x1, F2 = x0 + x1 x2 + 5
        let f1 = p(3, &[(&[2, 0, 1], 1), (&[2, 0, 0], 1), (&[0, 1, 0], 1)]);
        let f2 = p(3, &[(&[1, 0, 0], 1), (&[0, 1, 1], 1), (&[0, 0, 0], 5)]);
        let target = f1.mul(&f2);

        let images = [f1.eval_at_zero_from(2), f2.eval_at_zero_from(2)];
        let lcs = [f1.lead_coeff_in_main(), f2.lead_coeff_in_main()];
        let lifted = hensel_lift_step(&target, &images, &lcs, 2).unwrap();
        assert_eq!(lifted, vec![f1, f2]);
    }

    #[test]
    fn test_lift_first_variable() {
        // Univariate factors lifted to bivariate ones.
        let f1 = p(2, &[(&[1, 0], 1), (&[0, 1], 4), (&[0, 0], 1)]);
        let f2 = p(2, &[(&[2, 0], 1), (&[0, 2], 1), (&[0, 0], 7)]);
        let target = f1.mul(&f2);

        let images = [f1.eval_at_zero_from(1), f2.eval_at_zero_from(1)];
        let lcs = [SparsePoly::one(2), SparsePoly::one(2)];
        assert_eq!(hensel_lift_step(&target, &images, &lcs, 1).unwrap(), vec![f1, f2]);
    }

    #[test]
    fn test_wrong_target() {
        let f1 = p(2, &[(&[1, 0], 1), (&[0, 1], 4), (&[0, 0], 1)]);
        let f2 = p(2, &[(&[1, 0], 1), (&[0, 0], 7)]);
        // target(x1 = 0) is not f1 f2 at x1 = 0.
        let target = f1.mul(&f2).add(&p(2, &[(&[0, 0], 1)]));
        let images = [f1.eval_at_zero_from(1), f2.eval_at_zero_from(1)];
        let lcs = [SparsePoly::one(2), SparsePoly::one(2)];
        assert_eq!(
            hensel_lift_step(&target, &images, &lcs, 1).unwrap_err(),
            LiftError::NoSolution
        );
    }

    #[test]
    fn test_invalid_variable() {
        let f1 = p(2, &[(&[1, 0], 1), (&[0, 1], 4), (&[0, 0], 1)]);
        let f2 = p(2, &[(&[1, 0], 1), (&[0, 0], 7)]);
        let target = f1.mul(&f2);
        let images = [f1.eval_at_zero_from(1), f2.eval_at_zero_from(1)];
        let lcs = [SparsePoly::one(2), SparsePoly::one(2)];
        assert_eq!(
            hensel_lift_step(&target, &images, &lcs, 0).unwrap_err(),
            LiftError::InvalidVariable { var: 0, nvars: 2 }
        );
        assert_eq!(
            hensel_lift_step(&target, &images, &lcs, 2).unwrap_err(),
            LiftError::InvalidVariable { var: 2, nvars: 2 }
        );
    }
}
