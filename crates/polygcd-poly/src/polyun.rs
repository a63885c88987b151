//! Sparse-outer views of bivariate images.

use polygcd_rings::PrimeField;

use crate::bpoly::Bpoly;
use crate::dense::DensePoly;

/// Nonzero outer coefficients `(exponent, inner polynomial)`, exponents
/// strictly decreasing.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Polyun<F: PrimeField> {
    terms: Vec<(u64, DensePoly<F>)>,
}

impl<F: PrimeField> Polyun<F> {
    /// Collects the nonzero slots of a `Bpoly`, highest first.
    #[must_use]
    pub fn from_bpoly(b: &Bpoly<F>) -> Self {
        let terms = b
            .coeffs()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, c)| (i as u64, c.clone()))
            .collect();
        Self { terms }
    }

    /// The stored terms.
    #[must_use]
    pub fn terms(&self) -> &[(u64, DensePoly<F>)] {
        &self.terms
    }

    /// Coefficient of `outer^e`, if nonzero.
    #[must_use]
    pub fn coeff(&self, e: u64) -> Option<&DensePoly<F>> {
        self.terms
            .binary_search_by(|(x, _)| e.cmp(x))
            .ok()
            .map(|i| &self.terms[i].1)
    }

    /// Iterates over every nonzero `(outer, inner, coefficient)`.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u64, u64, F)> + '_ {
        self.terms.iter().flat_map(|(e0, c)| {
            c.coeffs()
                .iter()
                .enumerate()
                .filter(|(_, x)| !x.is_zero())
                .map(move |(e1, &x)| (*e0, e1 as u64, x))
        })
    }

    /// Number of nonzero coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter_nonzero().count()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::FiniteField;

    type F = FiniteField<101>;

    #[test]
    fn test_from_bpoly() {
        let b = Bpoly::new(vec![
            DensePoly::new(vec![F::new(1)]),
            DensePoly::zero(),
            DensePoly::new(vec![F::new(0), F::new(2), F::new(3)]),
        ]);
        let u = Polyun::from_bpoly(&b);
        assert_eq!(u.terms().len(), 2);
        assert_eq!(u.coeff(2).map(DensePoly::degree), Some(Some(2)));
        assert!(u.coeff(1).is_none());
        let all: Vec<_> = u.iter_nonzero().collect();
        assert_eq!(all, vec![(2, 1, F::new(2)), (2, 2, F::new(3)), (0, 0, F::new(1))]);
        assert_eq!(u.len(), 3);
    }
}
