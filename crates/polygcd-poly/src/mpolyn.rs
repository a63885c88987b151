//! Recursive view with one variable folded into dense coefficients.
//!
//! Brown's algorithm interpolates one variable at a time; `Mpolyn` keeps the
//! variable being interpolated as a dense univariate coefficient attached to
//! each monomial in the remaining variables.

use std::collections::BTreeMap;

use polygcd_rings::PrimeField;

use crate::algorithms::gcd::{poly_div_exact, poly_gcd};
use crate::dense::DensePoly;
use crate::monomial::{ExpLayout, PackedMonomial};
use crate::sparse::SparsePoly;

/// `Σ coeff_i(x_var) * m_i` where the monomials `m_i` have no `x_var`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mpolyn<F: PrimeField> {
    /// Strictly decreasing monomials, nonzero coefficients.
    terms: Vec<(PackedMonomial, DensePoly<F>)>,
    layout: ExpLayout,
    var: usize,
}

impl<F: PrimeField> Mpolyn<F> {
    /// The zero polynomial.
    #[must_use]
    pub fn zero(layout: ExpLayout, var: usize) -> Self {
        Self {
            terms: Vec::new(),
            layout,
            var,
        }
    }

    /// Wraps terms that are already sorted, distinct and nonzero.
    #[must_use]
    pub fn from_sorted(terms: Vec<(PackedMonomial, DensePoly<F>)>, layout: ExpLayout, var: usize) -> Self {
        debug_assert!(terms.windows(2).all(|w| w[0].0 > w[1].0));
        debug_assert!(terms.iter().all(|(_, c)| !c.is_zero()));
        Self { terms, layout, var }
    }

    /// Folds `x_var` of `p` into the coefficients.
    #[must_use]
    pub fn from_sparse(p: &SparsePoly<F>, var: usize) -> Self {
        let layout = p.layout();
        let mut groups: BTreeMap<PackedMonomial, Vec<F>> = BTreeMap::new();
        for (m, c) in p.terms() {
            let e = m.exponent(var, layout) as usize;
            let mut rest = m.clone();
            rest.set_exponent(var, 0, layout);
            let slot = groups.entry(rest).or_default();
            if slot.len() <= e {
                slot.resize(e + 1, F::zero());
            }
            slot[e] = *c;
        }
        let terms = groups
            .into_iter()
            .rev()
            .map(|(m, c)| (m, DensePoly::new(c)))
            .collect();
        Self { terms, layout, var }
    }

    /// Unfolds back into a sparse polynomial.
    #[must_use]
    pub fn to_sparse(&self) -> SparsePoly<F> {
        let fold = self.degree_folded().unwrap_or(0) as u64;
        let layout = if fold > self.layout.max_exponent() {
            ExpLayout::for_max_exponent(self.layout.nvars(), fold)
        } else {
            self.layout
        };
        let mut terms = Vec::new();
        for (m, c) in &self.terms {
            let base = m.repack(self.layout, layout);
            for (e, &x) in c.coeffs().iter().enumerate() {
                if !x.is_zero() {
                    let mut m = base.clone();
                    m.set_exponent(self.var, e as u64, layout);
                    terms.push((m, x));
                }
            }
        }
        SparsePoly::from_packed(terms, layout)
    }

    /// Re-encodes the monomials under `layout`.
    #[must_use]
    pub fn repack(&self, layout: ExpLayout) -> Self {
        if layout == self.layout {
            return self.clone();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.repack(self.layout, layout), c.clone()))
                .collect(),
            layout,
            var: self.var,
        }
    }

    /// Terms `(monomial, coefficient in x_var)`.
    #[must_use]
    pub fn terms(&self) -> &[(PackedMonomial, DensePoly<F>)] {
        &self.terms
    }

    /// Layout of the monomials.
    #[must_use]
    pub fn layout(&self) -> ExpLayout {
        self.layout
    }

    /// The folded variable.
    #[must_use]
    pub fn var(&self) -> usize {
        self.var
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of monomials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Monic gcd of the coefficients, a polynomial in `x_var`.
    #[must_use]
    pub fn content(&self) -> DensePoly<F> {
        let mut g = DensePoly::zero();
        for (_, c) in &self.terms {
            g = poly_gcd(&g, c);
            if g.is_one() {
                break;
            }
        }
        g
    }

    /// Coefficient of the leading monomial.
    #[must_use]
    pub fn lead_poly(&self) -> DensePoly<F> {
        self.terms.first().map_or_else(DensePoly::zero, |(_, c)| c.clone())
    }

    /// Exponents of the leading monomial (`x_var` reads as zero).
    #[must_use]
    pub fn leading_exponents(&self) -> Vec<u64> {
        self.terms
            .first()
            .map_or_else(|| vec![0; self.layout.nvars()], |(m, _)| m.unpack(self.layout))
    }

    /// Degree in the folded variable.
    #[must_use]
    pub fn degree_folded(&self) -> Option<usize> {
        self.terms.iter().filter_map(|(_, c)| c.degree()).max()
    }

    /// Degree in an unfolded variable.
    #[must_use]
    pub fn degree_in(&self, v: usize) -> u64 {
        self.terms
            .iter()
            .map(|(m, _)| m.exponent(v, self.layout))
            .max()
            .unwrap_or(0)
    }

    /// Substitutes `x_var = a`.
    #[must_use]
    pub fn eval(&self, a: F) -> SparsePoly<F> {
        let terms = self
            .terms
            .iter()
            .filter_map(|(m, c)| {
                let v = c.eval(a);
                (!v.is_zero()).then(|| (m.clone(), v))
            })
            .collect();
        SparsePoly::from_sorted(terms, self.layout)
    }

    /// Substitutes `x_var = a` and `x_var = -a`.
    #[must_use]
    pub fn eval_sym(&self, a: F) -> (SparsePoly<F>, SparsePoly<F>) {
        let mut plus = Vec::with_capacity(self.terms.len());
        let mut minus = Vec::with_capacity(self.terms.len());
        for (m, c) in &self.terms {
            let (p, q) = c.eval_sym(a);
            if !p.is_zero() {
                plus.push((m.clone(), p));
            }
            if !q.is_zero() {
                minus.push((m.clone(), q));
            }
        }
        (
            SparsePoly::from_sorted(plus, self.layout),
            SparsePoly::from_sorted(minus, self.layout),
        )
    }

    /// Multiplies every coefficient by `c(x_var)`.
    #[must_use]
    pub fn mul_poly(&self, c: &DensePoly<F>) -> Self {
        if c.is_zero() {
            return Self::zero(self.layout, self.var);
        }
        Self {
            terms: self.terms.iter().map(|(m, x)| (m.clone(), x.mul(c))).collect(),
            layout: self.layout,
            var: self.var,
        }
    }

    /// Divides every coefficient by `c(x_var)`, if exact.
    #[must_use]
    pub fn div_poly_exact(&self, c: &DensePoly<F>) -> Option<Self> {
        let terms = self
            .terms
            .iter()
            .map(|(m, x)| poly_div_exact(x, c).map(|q| (m.clone(), q)))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            terms,
            layout: self.layout,
            var: self.var,
        })
    }
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
    fn test_roundtrip() {
        let a = p(3, &[(&[2, 0, 1], 3), (&[2, 0, 4], 1), (&[1, 1, 0], -2), (&[0, 0, 0], 9)]);
        let n = Mpolyn::from_sparse(&a, 2);
        assert_eq!(n.len(), 3);
        assert_eq!(n.degree_folded(), Some(4));
        assert_eq!(n.leading_exponents(), vec![2, 0, 0]);
        assert_eq!(n.to_sparse(), a);
    }

    #[test]
    fn test_eval_matches_sparse() {
        let a = p(3, &[(&[2, 0, 1], 3), (&[2, 0, 4], 1), (&[1, 1, 0], -2), (&[0, 0, 3], 9)]);
        let n = Mpolyn::from_sparse(&a, 2);
        let x = F::new(6);
        let (plus, minus) = n.eval_sym(x);
        assert_eq!(plus, a.eval_var(2, x));
        assert_eq!(minus, a.eval_var(2, -x));
        assert_eq!(n.eval(x), plus);
    }

    #[test]
    fn test_content() {
        // (z + 1)(x + z y)
        let a = p(3, &[(&[1, 0, 1], 1), (&[1, 0, 0], 1), (&[0, 1, 2], 1), (&[0, 1, 1], 1)]);
        let n = Mpolyn::from_sparse(&a, 2);
        let c = n.content();
        assert_eq!(c, DensePoly::new(vec![F::new(1), F::new(1)]));
        let prim = n.div_poly_exact(&c).unwrap();
        assert_eq!(prim.mul_poly(&c), n);
        assert_eq!(prim.lead_poly(), DensePoly::one());
    }
}
