//! Dense bivariate polynomials.
//!
//! `Bpoly` is the working form of every bivariate image: slot `i` holds the
//! coefficient of `outer^i` as a dense polynomial in the inner variable.

use polygcd_rings::PrimeField;

use crate::algorithms::gcd::{poly_div_exact, poly_gcd};
use crate::dense::DensePoly;
use crate::monomial::{ExpLayout, PackedMonomial};
use crate::sparse::SparsePoly;

/// A dense polynomial in two variables, `Σ coeffs[i](inner) * outer^i`.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Bpoly<F: PrimeField> {
    coeffs: Vec<DensePoly<F>>,
}

impl<F: PrimeField> Bpoly<F> {
    /// Creates a bivariate polynomial from its outer coefficients.
    #[must_use]
    pub fn new(mut coeffs: Vec<DensePoly<F>>) -> Self {
        while coeffs.last().is_some_and(DensePoly::is_zero) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Reads `p` as a polynomial in `outer` and `inner`; other variables must be absent.
    #[must_use]
    pub fn from_sparse(p: &SparsePoly<F>, outer: usize, inner: usize) -> Self {
        let layout = p.layout();
        let mut slots: Vec<Vec<F>> = Vec::new();
        for (m, c) in p.terms() {
            let i = m.exponent(outer, layout) as usize;
            let j = m.exponent(inner, layout) as usize;
            if slots.len() <= i {
                slots.resize(i + 1, Vec::new());
            }
            let slot = &mut slots[i];
            if slot.len() <= j {
                slot.resize(j + 1, F::zero());
            }
            slot[j] = slot[j] + *c;
        }
        Self::new(slots.into_iter().map(DensePoly::new).collect())
    }

    /// Writes the polynomial back into `nvars` variables.
    #[must_use]
    pub fn to_sparse(&self, nvars: usize, outer: usize, inner: usize) -> SparsePoly<F> {
        let max = self
            .degree_outer()
            .unwrap_or(0)
            .max(self.degree_inner().unwrap_or(0)) as u64;
        let layout = ExpLayout::for_max_exponent(nvars, max);
        let mut terms = Vec::new();
        for (i, slot) in self.coeffs.iter().enumerate() {
            for (j, &c) in slot.coeffs().iter().enumerate() {
                if c.is_zero() {
                    continue;
                }
                let mut m = PackedMonomial::one(layout);
                m.set_exponent(outer, i as u64, layout);
                m.set_exponent(inner, j as u64, layout);
                terms.push((m, c));
            }
        }
        SparsePoly::from_packed(terms, layout)
    }

    /// Outer coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[DensePoly<F>] {
        &self.coeffs
    }

    /// Coefficient of `outer^i`.
    #[must_use]
    pub fn coeff(&self, i: usize) -> DensePoly<F> {
        self.coeffs.get(i).cloned().unwrap_or_else(DensePoly::zero)
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree in the outer variable.
    #[must_use]
    pub fn degree_outer(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Degree in the inner variable.
    #[must_use]
    pub fn degree_inner(&self) -> Option<usize> {
        self.coeffs.iter().filter_map(DensePoly::degree).max()
    }

    /// Leading coefficient in the outer variable.
    #[must_use]
    pub fn lead(&self) -> DensePoly<F> {
        self.coeffs.last().cloned().unwrap_or_else(DensePoly::zero)
    }

    /// Monic gcd of the outer coefficients.
    #[must_use]
    pub fn content(&self) -> DensePoly<F> {
        let mut g = DensePoly::zero();
        for c in &self.coeffs {
            g = poly_gcd(&g, c);
            if g.is_one() {
                break;
            }
        }
        g
    }

    /// Substitutes `inner = a`.
    #[must_use]
    pub fn eval_inner(&self, a: F) -> DensePoly<F> {
        DensePoly::new(self.coeffs.iter().map(|c| c.eval(a)).collect())
    }

    /// Substitutes `inner = a` and `inner = -a`.
    #[must_use]
    pub fn eval_inner_sym(&self, a: F) -> (DensePoly<F>, DensePoly<F>) {
        let (plus, minus): (Vec<F>, Vec<F>) = self.coeffs.iter().map(|c| c.eval_sym(a)).unzip();
        (DensePoly::new(plus), DensePoly::new(minus))
    }

    /// Multiplies every coefficient by a scalar.
    #[must_use]
    pub fn scale_inner(&self, c: F) -> Self {
        Self::new(self.coeffs.iter().map(|x| x.scale(c)).collect())
    }

    /// Multiplies by a polynomial in the inner variable.
    #[must_use]
    pub fn mul_inner(&self, c: &DensePoly<F>) -> Self {
        Self::new(self.coeffs.iter().map(|x| x.mul(c)).collect())
    }

    /// Divides by a polynomial in the inner variable, if exact.
    #[must_use]
    pub fn div_inner_exact(&self, c: &DensePoly<F>) -> Option<Self> {
        self.coeffs
            .iter()
            .map(|x| poly_div_exact(x, c))
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }

    /// Multiplies two bivariate polynomials.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut out = vec![DensePoly::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] = out[i + j].add(&a.mul(b));
            }
        }
        Self::new(out)
    }
}
