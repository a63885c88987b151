//! Multivariate partial fractions.
//!
//! Solves `Σ σ_i · Π_{j≠i} f_j = c` with `deg_{x_0} σ_i < deg_{x_0} f_i`,
//! lifting a univariate solution through `x_1, ..., x_top` one power at a
//! time.

use polygcd_poly::algorithms::gcd::{poly_div_rem, poly_invmod};
use polygcd_poly::{DensePoly, SparsePoly};
use polygcd_rings::PrimeField;

use crate::LiftError;

/// Precomputed data for repeated Diophantine solves against fixed factors.
#[derive(Clone, Debug)]
pub struct LiftContext<F: PrimeField> {
    nvars: usize,
    /// `cofactors[l][i] = Π_{j≠i} f_j` with `x_{l+1}, ...` set to zero.
    cofactors: Vec<Vec<SparsePoly<F>>>,
    /// Factor images with every variable but `x_0` at zero.
    univariate: Vec<DensePoly<F>>,
    /// `inverses[i] = (Π_{j≠i} u_j)^{-1} mod u_i`.
    inverses: Vec<DensePoly<F>>,
}

impl<F: PrimeField> LiftContext<F> {
    /// Prepares solves for `factors` over `x_0, ..., x_top`.
    ///
    /// # Errors
    ///
    /// `DegreeMismatch` if a factor loses `x_0`-degree at the origin,
    /// `NotCoprime` if the univariate images share a factor.
    pub fn new(factors: &[SparsePoly<F>], top: usize) -> Result<Self, LiftError> {
        let nvars = factors.first().map_or(0, SparsePoly::nvars);
        let zeros = vec![F::zero(); nvars];

        let mut univariate = Vec::with_capacity(factors.len());
        for (index, f) in factors.iter().enumerate() {
            let u = f.eval_all_but(0, &zeros);
            if u.degree() != Some(f.degree_in(0) as usize) {
                return Err(LiftError::DegreeMismatch { index });
            }
            univariate.push(u);
        }

        let mut inverses = Vec::with_capacity(factors.len());
        for i in 0..univariate.len() {
            let others = univariate
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(DensePoly::one(), |acc, (_, u)| acc.mul(u));
            let inv = poly_invmod(&others, &univariate[i]).ok_or(LiftError::NotCoprime)?;
            inverses.push(inv);
        }

        let cofactors = (0..=top)
            .map(|l| {
                let images: Vec<SparsePoly<F>> =
                    factors.iter().map(|f| f.eval_at_zero_from(l + 1)).collect();
                cofactor_products(&images, nvars)
            })
            .collect();

        Ok(Self {
            nvars,
            cofactors,
            univariate,
            inverses,
        })
    }

    /// Number of factors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.univariate.len()
    }

    /// Returns true if there are no factors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.univariate.is_empty()
    }

    /// Solves `Σ σ_i · Π_{j≠i} f_j = c` where `c` involves `x_0, ..., x_level`.
    ///
    /// # Errors
    ///
    /// `NoSolution` if no polynomial solution of bounded degree exists.
    pub fn solve(&self, c: &SparsePoly<F>, level: usize) -> Result<Vec<SparsePoly<F>>, LiftError> {
        if level == 0 {
            return Ok(self.solve_univariate(c));
        }

        let mut sigma = self.solve(&c.eval_at_zero_from(level), level - 1)?;
        let mut err = c.sub(&self.combine(&sigma, level));

        let bound = c.degree_in(level)
            + self.cofactors[level]
                .iter()
                .map(|b| b.degree_in(level))
                .max()
                .unwrap_or(0);

        let mut exps = vec![0u64; self.nvars];
        for j in 1..=bound {
            if err.is_zero() {
                break;
            }
            let cj = err.coeff_in(level, j);
            if cj.is_zero() {
                continue;
            }
            let delta = self.solve(&cj, level - 1)?;
            exps[level] = j;
            let delta: Vec<SparsePoly<F>> =
                delta.iter().map(|d| d.mul_monomial(&exps, F::one())).collect();
            err = err.sub(&self.combine(&delta, level));
            for (s, d) in sigma.iter_mut().zip(&delta) {
                *s = s.add(d);
            }
        }

        if err.is_zero() {
            Ok(sigma)
        } else {
            Err(LiftError::NoSolution)
        }
    }

    fn solve_univariate(&self, c: &SparsePoly<F>) -> Vec<SparsePoly<F>> {
        let cu = c.to_dense(0);
        self.inverses
            .iter()
            .zip(&self.univariate)
            .map(|(s, u)| {
                let (_, r) = poly_div_rem(&cu.mul(s), u);
                SparsePoly::from_dense(&r, 0, self.nvars)
            })
            .collect()
    }

    fn combine(&self, sigma: &[SparsePoly<F>], level: usize) -> SparsePoly<F> {
        sigma
            .iter()
            .zip(&self.cofactors[level])
            .fold(SparsePoly::zero(self.nvars), |acc, (s, b)| acc.add(&s.mul(b)))
    }
}

fn cofactor_products<F: PrimeField>(factors: &[SparsePoly<F>], nvars: usize) -> Vec<SparsePoly<F>> {
    (0..factors.len())
        .map(|i| {
            factors
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(SparsePoly::one(nvars), |acc, (_, f)| acc.mul(f))
        })
        .collect()
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
    fn test_univariate_solve() {
        // f1 = x + 1, f2 = x + 2: σ1 f2 + σ2 f1 = 1
        let f1 = p(1, &[(&[1], 1), (&[0], 1)]);
        let f2 = p(1, &[(&[1], 1), (&[0], 2)]);
        let ctx = LiftContext::new(&[f1.clone(), f2.clone()], 0).unwrap();
        let sigma = ctx.solve(&SparsePoly::one(1), 0).unwrap();
        let lhs = sigma[0].mul(&f2).add(&sigma[1].mul(&f1));
        assert!(lhs.is_one());
    }

    #[test]
    fn test_multivariate_solve() {
        // f1 = x0^2 + x1 + 1, f2 = x0 + 3 x1 + 2
        let f1 = p(2, &[(&[2, 0], 1), (&[0, 1], 1), (&[0, 0], 1)]);
        let f2 = p(2, &[(&[1, 0], 1), (&[0, 1], 3), (&[0, 0], 2)]);
        let ctx = LiftContext::new(&[f1.clone(), f2.clone()], 1).unwrap();

        // Build c from a known solution with deg_x0 s1 < 2 and deg_x0 s2 < 1.
        let s1 = p(2, &[(&[1, 1], 7), (&[0, 0], 5)]);
        let s2 = p(2, &[(&[0, 2], 4), (&[0, 0], 1)]);
        let c = s1.mul(&f2).add(&s2.mul(&f1));

        let sigma = ctx.solve(&c, 1).unwrap();
        assert_eq!(sigma, vec![s1, s2]);
    }

    #[test]
    fn test_not_coprime() {
        let f1 = p(2, &[(&[1, 0], 1), (&[0, 1], 1)]);
        let f2 = p(2, &[(&[1, 0], 1), (&[0, 1], 2)]);
        assert_eq!(LiftContext::new(&[f1, f2], 1).unwrap_err(), LiftError::NotCoprime);
    }

    #[test]
    fn test_degree_mismatch() {
        let f1 = p(2, &[(&[1, 1], 1), (&[0, 0], 1)]);
        let f2 = p(2, &[(&[1, 0], 1), (&[0, 0], 2)]);
        assert_eq!(
            LiftContext::new(&[f1, f2], 1).unwrap_err(),
            LiftError::DegreeMismatch { index: 0 }
        );
    }
}
