//! Coefficient vectors with respect to one or two variables.

use std::collections::BTreeMap;

use polygcd_rings::PrimeField;

use crate::monomial::{ExpLayout, PackedMonomial};
use crate::sparse::SparsePoly;

/// `Σ coeff_k * outer^k` with sparse coefficients, keys strictly decreasing.
///
/// With two outer variables the key packs `(e0 << 32) | e1`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mpolyu<F: PrimeField> {
    terms: Vec<(u64, SparsePoly<F>)>,
}

/// Largest exponent that fits one half of a pair key.
pub const PAIR_MAX: u64 = u32::MAX as u64;

impl<F: PrimeField> Mpolyu<F> {
    /// Coefficients of `p` in `x_var`; `x_var` is absent from every coefficient.
    #[must_use]
    pub fn from_sparse(p: &SparsePoly<F>, var: usize) -> Self {
        Self::group(p, |m, layout| {
            let e = m.exponent(var, layout);
            m.set_exponent(var, 0, layout);
            Some(e)
        })
        .unwrap_or_else(|| Self { terms: Vec::new() })
    }

    /// Coefficients of `p` in the pair `(x_v0, x_v1)`.
    ///
    /// Returns `None` when an exponent does not fit in 32 bits.
    #[must_use]
    pub fn from_sparse_pair(p: &SparsePoly<F>, v0: usize, v1: usize) -> Option<Self> {
        Self::group(p, |m, layout| {
            let e0 = m.exponent(v0, layout);
            let e1 = m.exponent(v1, layout);
            if e0 > PAIR_MAX || e1 > PAIR_MAX {
                return None;
            }
            m.set_exponent(v0, 0, layout);
            m.set_exponent(v1, 0, layout);
            Some((e0 << 32) | e1)
        })
    }

    fn group(
        p: &SparsePoly<F>,
        mut key: impl FnMut(&mut PackedMonomial, ExpLayout) -> Option<u64>,
    ) -> Option<Self> {
        let layout = p.layout();
        let mut groups: BTreeMap<u64, Vec<(PackedMonomial, F)>> = BTreeMap::new();
        for (m, c) in p.terms() {
            let mut rest = m.clone();
            let k = key(&mut rest, layout)?;
            groups.entry(k).or_default().push((rest, *c));
        }
        let terms = groups
            .into_iter()
            .rev()
            .map(|(k, ts)| (k, SparsePoly::from_packed(ts, layout)))
            .collect();
        Some(Self { terms })
    }

    /// Reassembles `Σ coeff_k * x_var^k`.
    #[must_use]
    pub fn to_sparse(&self, var: usize, layout: ExpLayout) -> SparsePoly<F> {
        self.assemble(layout, |k| vec![(var, k)])
    }

    /// Reassembles a pair-keyed vector.
    #[must_use]
    pub fn to_sparse_pair(&self, v0: usize, v1: usize, layout: ExpLayout) -> SparsePoly<F> {
        self.assemble(layout, |k| vec![(v0, k >> 32), (v1, k & PAIR_MAX)])
    }

    fn assemble(&self, layout: ExpLayout, exps: impl Fn(u64) -> Vec<(usize, u64)>) -> SparsePoly<F> {
        let mut target = layout;
        for (k, c) in &self.terms {
            target = target.join(c.layout());
            for (_, e) in exps(*k) {
                target = target.join(ExpLayout::for_max_exponent(layout.nvars(), e));
            }
        }
        let mut terms = Vec::new();
        for (k, c) in &self.terms {
            let placed = exps(*k);
            for (m, x) in c.terms() {
                let mut m = m.repack(c.layout(), target);
                for &(v, e) in &placed {
                    m.set_exponent(v, e, target);
                }
                terms.push((m, *x));
            }
        }
        SparsePoly::from_packed(terms, target)
    }

    /// The stored `(key, coefficient)` pairs.
    #[must_use]
    pub fn terms(&self) -> &[(u64, SparsePoly<F>)] {
        &self.terms
    }

    /// Consumes the vector.
    #[must_use]
    pub fn into_terms(self) -> Vec<(u64, SparsePoly<F>)> {
        self.terms
    }

    /// Number of nonzero coefficients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no coefficients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
