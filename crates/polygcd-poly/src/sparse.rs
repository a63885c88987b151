//! Sparse multivariate polynomials in lex order.
//!
//! Terms are `(PackedMonomial, coefficient)` pairs sorted strictly
//! decreasing in lex with variable 0 most significant. Each polynomial
//! carries its own `ExpLayout`; operations that can grow exponents repack
//! into a layout wide enough for the result.

use std::collections::BTreeMap;

use polygcd_rings::PrimeField;
use rustc_hash::FxHashMap;

use crate::dense::DensePoly;
use crate::monomial::{ExpLayout, PackedMonomial};

/// A sparse multivariate polynomial over a prime field.
#[derive(Clone, Debug)]
pub struct SparsePoly<F: PrimeField> {
    /// Terms in strictly decreasing lex order, nonzero coefficients.
    terms: Vec<(PackedMonomial, F)>,
    layout: ExpLayout,
}

impl<F: PrimeField> SparsePoly<F> {
    /// Builds a polynomial from unpacked terms.
    ///
    /// Terms may be unsorted, repeated or zero; they are combined.
    #[must_use]
    pub fn from_exponents(nvars: usize, terms: Vec<(Vec<u64>, F)>) -> Self {
        let max = terms.iter().flat_map(|(e, _)| e.iter().copied()).max().unwrap_or(0);
        let layout = ExpLayout::for_max_exponent(nvars, max);
        let packed = terms
            .into_iter()
            .map(|(e, c)| (PackedMonomial::pack(&e, layout), c))
            .collect();
        Self::from_packed(packed, layout)
    }

    /// Builds a polynomial from packed terms in any order.
    #[must_use]
    pub fn from_packed(mut terms: Vec<(PackedMonomial, F)>, layout: ExpLayout) -> Self {
        terms.sort_by(|a, b| b.0.cmp(&a.0));

        let mut out: Vec<(PackedMonomial, F)> = Vec::with_capacity(terms.len());
        for (m, c) in terms {
            match out.last_mut() {
                Some((lm, lc)) if *lm == m => *lc = *lc + c,
                _ => {
                    if out.last().is_some_and(|(_, c)| c.is_zero()) {
                        out.pop();
                    }
                    out.push((m, c));
                }
            }
        }
        if out.last().is_some_and(|(_, c)| c.is_zero()) {
            out.pop();
        }

        Self { terms: out, layout }
    }

    /// Wraps terms that are already sorted, distinct and nonzero.
    #[must_use]
    pub fn from_sorted(terms: Vec<(PackedMonomial, F)>, layout: ExpLayout) -> Self {
        debug_assert!(terms.windows(2).all(|w| w[0].0 > w[1].0));
        debug_assert!(terms.iter().all(|(_, c)| !c.is_zero()));
        Self { terms, layout }
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(nvars: usize) -> Self {
        Self::zero_with(ExpLayout::new(nvars, 0))
    }

    /// Creates the zero polynomial with a given layout.
    #[must_use]
    pub fn zero_with(layout: ExpLayout) -> Self {
        Self {
            terms: Vec::new(),
            layout,
        }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one(nvars: usize) -> Self {
        Self::constant(F::one(), nvars)
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: F, nvars: usize) -> Self {
        Self::constant_with(c, ExpLayout::new(nvars, 0))
    }

    /// Creates a constant polynomial with a given layout.
    #[must_use]
    pub fn constant_with(c: F, layout: ExpLayout) -> Self {
        if c.is_zero() {
            return Self::zero_with(layout);
        }
        Self {
            terms: vec![(PackedMonomial::one(layout), c)],
            layout,
        }
    }

    /// Creates a single variable x_i.
    #[must_use]
    pub fn var(i: usize, nvars: usize) -> Self {
        let layout = ExpLayout::new(nvars, 0);
        Self {
            terms: vec![(PackedMonomial::var_power(i, 1, layout), F::one())],
            layout,
        }
    }

    /// Creates the monomial `c * x^exps`.
    #[must_use]
    pub fn monomial(exps: &[u64], c: F) -> Self {
        Self::from_exponents(exps.len(), vec![(exps.to_vec(), c)])
    }

    /// Embeds a univariate polynomial as a polynomial in `x_var`.
    #[must_use]
    pub fn from_dense(p: &DensePoly<F>, var: usize, nvars: usize) -> Self {
        let layout = ExpLayout::for_max_exponent(nvars, p.degree().unwrap_or(0) as u64);
        let terms = p
            .coeffs()
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !c.is_zero())
            .map(|(e, &c)| (PackedMonomial::var_power(var, e as u64, layout), c))
            .collect();
        Self::from_sorted(terms, layout)
    }

    /// Reads a polynomial involving only `x_var` as a dense polynomial.
    #[must_use]
    pub fn to_dense(&self, var: usize) -> DensePoly<F> {
        debug_assert!(self.used_vars().iter().all(|&v| v == var));
        let mut coeffs = vec![F::zero(); self.degree_in(var) as usize + 1];
        for (m, c) in &self.terms {
            coeffs[m.exponent(var, self.layout) as usize] = *c;
        }
        DensePoly::new(coeffs)
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn nvars(&self) -> usize {
        self.layout.nvars()
    }

    /// Returns the exponent layout.
    #[must_use]
    pub fn layout(&self) -> ExpLayout {
        self.layout
    }

    /// Returns the terms.
    #[must_use]
    pub fn terms(&self) -> &[(PackedMonomial, F)] {
        &self.terms
    }

    /// Consumes the polynomial and returns its terms.
    #[must_use]
    pub fn into_terms(self) -> Vec<(PackedMonomial, F)> {
        self.terms
    }

    /// Iterates over `(exponent vector, coefficient)`.
    pub fn iter_exponents(&self) -> impl Iterator<Item = (Vec<u64>, F)> + '_ {
        self.terms.iter().map(|(m, c)| (m.unpack(self.layout), *c))
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true for a nonzero constant.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].0.is_one()
    }

    /// Returns true for the constant 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.is_constant() && self.terms[0].1.is_one()
    }

    /// Returns true if the polynomial has exactly one term.
    #[must_use]
    pub fn is_monomial(&self) -> bool {
        self.terms.len() == 1
    }

    /// Returns the leading coefficient (zero for the zero polynomial).
    #[must_use]
    pub fn leading_coeff(&self) -> F {
        self.terms.first().map_or_else(F::zero, |(_, c)| *c)
    }

    /// Exponent vector of the leading term (all zero for the zero polynomial).
    #[must_use]
    pub fn leading_exponents(&self) -> Vec<u64> {
        self.terms
            .first()
            .map_or_else(|| vec![0; self.nvars()], |(m, _)| m.unpack(self.layout))
    }

    /// Degree in variable `v`; zero for the zero polynomial.
    #[must_use]
    pub fn degree_in(&self, v: usize) -> u64 {
        if v == 0 {
            return self.terms.first().map_or(0, |(m, _)| m.exponent(0, self.layout));
        }
        self.terms
            .iter()
            .map(|(m, _)| m.exponent(v, self.layout))
            .max()
            .unwrap_or(0)
    }

    /// Degree in every variable.
    #[must_use]
    pub fn degrees(&self) -> Vec<u64> {
        let mut degs = vec![0; self.nvars()];
        for (m, _) in &self.terms {
            for (v, d) in degs.iter_mut().enumerate() {
                *d = (*d).max(m.exponent(v, self.layout));
            }
        }
        degs
    }

    /// Componentwise minimum exponent (all zero for the zero polynomial).
    #[must_use]
    pub fn min_exponents(&self) -> Vec<u64> {
        let Some((first, rest)) = self.terms.split_first() else {
            return vec![0; self.nvars()];
        };
        let mut mins = first.0.unpack(self.layout);
        for (m, _) in rest {
            for (v, d) in mins.iter_mut().enumerate() {
                *d = (*d).min(m.exponent(v, self.layout));
            }
        }
        mins
    }

    /// Largest exponent appearing anywhere.
    #[must_use]
    pub fn max_exponent(&self) -> u64 {
        self.degrees().into_iter().max().unwrap_or(0)
    }

    /// Variables with a positive degree.
    #[must_use]
    pub fn used_vars(&self) -> Vec<usize> {
        self.degrees()
            .into_iter()
            .enumerate()
            .filter_map(|(v, d)| (d > 0).then_some(v))
            .collect()
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u64 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree(self.layout))
            .max()
            .unwrap_or(0)
    }

    /// Re-encodes every term under `layout`.
    #[must_use]
    pub fn repack(&self, layout: ExpLayout) -> Self {
        if layout == self.layout {
            return self.clone();
        }
        debug_assert!(self.max_exponent() <= layout.max_exponent());
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.repack(self.layout, layout), *c))
                .collect(),
            layout,
        }
    }

    fn aligned(&self, other: &Self) -> (Self, Self) {
        assert_eq!(self.nvars(), other.nvars(), "variable count mismatch");
        let layout = self.layout.join(other.layout);
        (self.repack(layout), other.repack(layout))
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let (a, b) = self.aligned(other);
        let mut terms = Vec::with_capacity(a.len() + b.len());
        let mut i = a.terms.into_iter().peekable();
        let mut j = b.terms.into_iter().peekable();
        loop {
            let next = match (i.peek(), j.peek()) {
                (Some(x), Some(y)) => match x.0.cmp(&y.0) {
                    std::cmp::Ordering::Greater => i.next(),
                    std::cmp::Ordering::Less => j.next(),
                    std::cmp::Ordering::Equal => {
                        let (m, c) = i.next().expect("peeked");
                        let (_, d) = j.next().expect("peeked");
                        let s = c + d;
                        if s.is_zero() {
                            continue;
                        }
                        Some((m, s))
                    }
                },
                (Some(_), None) => i.next(),
                (None, Some(_)) => j.next(),
                (None, None) => break,
            };
            terms.extend(next);
        }
        Self {
            terms,
            layout: a.layout,
        }
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -*c)).collect(),
            layout: self.layout,
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: F) -> Self {
        if c.is_zero() {
            return Self::zero_with(self.layout);
        }
        Self {
            terms: self.terms.iter().map(|(m, x)| (m.clone(), *x * c)).collect(),
            layout: self.layout,
        }
    }

    /// Multiplies two polynomials.
    ///
    /// The result is packed wide enough for the sum of the degrees.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.nvars(), other.nvars(), "variable count mismatch");
        if self.is_zero() || other.is_zero() {
            return Self::zero_with(self.layout.join(other.layout));
        }

        let max = self
            .degrees()
            .iter()
            .zip(other.degrees())
            .map(|(a, b)| a + b)
            .max()
            .unwrap_or(0);
        let layout = ExpLayout::for_max_exponent(self.nvars(), max).join(self.layout.join(other.layout));
        let (a, b) = (self.repack(layout), other.repack(layout));

        if a.len() == 1 || b.len() == 1 {
            let (mono, poly) = if a.len() == 1 { (&a, &b) } else { (&b, &a) };
            let (m, c) = &mono.terms[0];
            return poly.mul_packed(m, *c);
        }

        let mut acc: FxHashMap<PackedMonomial, F> = FxHashMap::default();
        acc.reserve(a.len() * b.len());
        for (m1, c1) in &a.terms {
            for (m2, c2) in &b.terms {
                let e = acc.entry(m1.mul(m2)).or_insert_with(F::zero);
                *e = *e + *c1 * *c2;
            }
        }
        Self::from_packed(acc.into_iter().collect(), layout)
    }

    fn mul_packed(&self, m: &PackedMonomial, c: F) -> Self {
        if c.is_zero() {
            return Self::zero_with(self.layout);
        }
        Self {
            terms: self.terms.iter().map(|(m2, c2)| (m.mul(m2), *c2 * c)).collect(),
            layout: self.layout,
        }
    }

    /// Multiplies by the monomial `c * x^exps`.
    #[must_use]
    pub fn mul_monomial(&self, exps: &[u64], c: F) -> Self {
        self.mul(&Self::monomial(exps, c))
    }

    /// Divides every term by `x^exps`, which must divide each monomial.
    #[must_use]
    pub fn div_monomial(&self, exps: &[u64]) -> Self {
        let d = PackedMonomial::pack(exps, self.layout);
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, c)| (m.div(&d, self.layout).expect("monomial divides every term"), *c))
                .collect(),
            layout: self.layout,
        }
    }

    /// Scales so that the leading coefficient is one.
    #[must_use]
    pub fn make_monic(&self) -> Self {
        match self.leading_coeff().inv() {
            Some(inv) => self.scale(inv),
            None => self.clone(),
        }
    }

    /// Exact division in lex order.
    ///
    /// Returns `None` unless `other` divides `self`.
    #[must_use]
    pub fn div_exact(&self, other: &Self) -> Option<Self> {
        assert_eq!(self.nvars(), other.nvars(), "variable count mismatch");
        if other.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::zero_with(self.layout));
        }
        if other.is_constant() {
            return other.leading_coeff().inv().map(|c| self.scale(c));
        }

        let da = self.degrees();
        let db = other.degrees();
        if da.iter().zip(&db).any(|(a, b)| b > a) {
            return None;
        }
        let qbound: Vec<u64> = da.iter().zip(&db).map(|(a, b)| a - b).collect();

        let (a, b) = self.aligned(other);
        let layout = a.layout;
        let lead_inv = b.leading_coeff().inv()?;
        let (lm_b, _) = &b.terms[0];

        let mut rem: BTreeMap<PackedMonomial, F> = a.terms.into_iter().collect();
        let mut quotient = Vec::new();

        while let Some((m, c)) = rem.pop_last() {
            let q = m.div(lm_b, layout)?;
            // In an exact division every partial product stays inside deg(a).
            if (0..layout.nvars()).any(|v| q.exponent(v, layout) > qbound[v]) {
                return None;
            }
            let qc = c * lead_inv;
            for (mb, cb) in &b.terms[1..] {
                let key = q.mul(mb);
                let delta = qc * *cb;
                match rem.entry(key) {
                    std::collections::btree_map::Entry::Occupied(mut e) => {
                        let v = *e.get() - delta;
                        if v.is_zero() {
                            e.remove();
                        } else {
                            *e.get_mut() = v;
                        }
                    }
                    std::collections::btree_map::Entry::Vacant(e) => {
                        e.insert(-delta);
                    }
                }
            }
            quotient.push((q, qc));
        }

        Some(Self::from_sorted(quotient, layout))
    }

    /// Returns true if `self` divides `other`.
    #[must_use]
    pub fn divides(&self, other: &Self) -> bool {
        other.div_exact(self).is_some()
    }

    /// Substitutes `x_v = a`, keeping the variable count.
    #[must_use]
    pub fn eval_var(&self, v: usize, a: F) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let e = m.exponent(v, self.layout);
                let mut m = m.clone();
                m.set_exponent(v, 0, self.layout);
                (m, *c * a.pow(e))
            })
            .collect();
        Self::from_packed(terms, self.layout)
    }

    /// Substitutes `x_u = point[u]` for every `u != v`.
    #[must_use]
    pub fn eval_all_but(&self, v: usize, point: &[F]) -> DensePoly<F> {
        debug_assert_eq!(point.len(), self.nvars());
        let mut coeffs: Vec<F> = Vec::new();
        for (m, c) in &self.terms {
            let mut value = *c;
            for (u, &a) in point.iter().enumerate() {
                if u == v {
                    continue;
                }
                let e = m.exponent(u, self.layout);
                if e > 0 {
                    value = value * a.pow(e);
                }
            }
            let e = m.exponent(v, self.layout) as usize;
            if coeffs.len() <= e {
                coeffs.resize(e + 1, F::zero());
            }
            coeffs[e] = coeffs[e] + value;
        }
        DensePoly::new(coeffs)
    }

    /// Sets every variable `>= k` to zero.
    #[must_use]
    pub fn eval_at_zero_from(&self, k: usize) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|(m, _)| (k..self.nvars()).all(|v| m.exponent(v, self.layout) == 0))
            .cloned()
            .collect();
        Self {
            terms,
            layout: self.layout,
        }
    }

    /// Substitutes `x_v -> x_v + shifts[v]` for every variable.
    #[must_use]
    pub fn taylor_shift(&self, shifts: &[F]) -> Self {
        debug_assert_eq!(shifts.len(), self.nvars());
        let mut p = self.clone();
        for (v, &a) in shifts.iter().enumerate() {
            if !a.is_zero() {
                p = p.taylor_shift_var(v, a);
            }
        }
        p
    }

    fn taylor_shift_var(&self, v: usize, a: F) -> Self {
        let layout = self.layout;
        let mut groups: FxHashMap<PackedMonomial, Vec<F>> = FxHashMap::default();
        for (m, c) in &self.terms {
            let e = m.exponent(v, layout) as usize;
            let mut rest = m.clone();
            rest.set_exponent(v, 0, layout);
            let slot = groups.entry(rest).or_default();
            if slot.len() <= e {
                slot.resize(e + 1, F::zero());
            }
            slot[e] = *c;
        }

        let mut terms = Vec::with_capacity(self.len());
        for (rest, coeffs) in groups {
            let shifted = DensePoly::new(coeffs).taylor_shift(a);
            for (e, &c) in shifted.coeffs().iter().enumerate() {
                if !c.is_zero() {
                    let mut m = rest.clone();
                    m.set_exponent(v, e as u64, layout);
                    terms.push((m, c));
                }
            }
        }
        Self::from_packed(terms, layout)
    }

    /// Coefficient of `x_v^e`, as a polynomial with `x_v` absent.
    #[must_use]
    pub fn coeff_in(&self, v: usize, e: u64) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|(m, _)| m.exponent(v, self.layout) == e)
            .map(|(m, c)| {
                let mut m = m.clone();
                m.set_exponent(v, 0, self.layout);
                (m, *c)
            })
            .collect();
        if v == 0 {
            // Removing the most significant field keeps the order.
            return Self::from_sorted(terms, self.layout);
        }
        Self::from_packed(terms, self.layout)
    }

    /// Leading coefficient with respect to `x_v`.
    #[must_use]
    pub fn lead_coeff_in(&self, v: usize) -> Self {
        self.coeff_in(v, self.degree_in(v))
    }

    /// Leading coefficient with respect to the main variable `x_0`.
    #[must_use]
    pub fn lead_coeff_in_main(&self) -> Self {
        self.lead_coeff_in(0)
    }

    /// Restricts to the listed variables: new variable `i` is old `vars[i]`.
    ///
    /// Every other variable must be absent.
    #[must_use]
    pub fn select_vars(&self, vars: &[usize]) -> Self {
        let max = vars.iter().map(|&v| self.degree_in(v)).max().unwrap_or(0);
        let layout = ExpLayout::for_max_exponent(vars.len(), max);
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let exps: Vec<u64> = vars.iter().map(|&v| m.exponent(v, self.layout)).collect();
                (PackedMonomial::pack(&exps, layout), *c)
            })
            .collect();
        Self::from_packed(terms, layout)
    }

    /// Inverse of `select_vars`: old variable `i` becomes `vars[i]` of `nvars`.
    #[must_use]
    pub fn expand_vars(&self, vars: &[usize], nvars: usize) -> Self {
        debug_assert_eq!(vars.len(), self.nvars());
        let layout = ExpLayout::new(nvars, self.layout.bits());
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mut exps = vec![0; nvars];
                for (i, &v) in vars.iter().enumerate() {
                    exps[v] = m.exponent(i, self.layout);
                }
                (PackedMonomial::pack(&exps, layout), *c)
            })
            .collect();
        Self::from_packed(terms, layout)
    }

    /// Maps every exponent vector through `f`; the images must fit `layout`.
    #[must_use]
    pub fn map_exponents(&self, layout: ExpLayout, mut f: impl FnMut(&mut [u64])) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mut exps = m.unpack(self.layout);
                f(&mut exps);
                (PackedMonomial::pack(&exps, layout), *c)
            })
            .collect();
        Self::from_packed(terms, layout)
    }
}

impl<F: PrimeField> PartialEq for SparsePoly<F> {
    fn eq(&self, other: &Self) -> bool {
        if self.nvars() != other.nvars() || self.len() != other.len() {
            return false;
        }
        if self.layout == other.layout {
            return self.terms == other.terms;
        }
        self.terms.iter().zip(&other.terms).all(|((m1, c1), (m2, c2))| {
            c1 == c2 && m1.unpack(self.layout) == m2.unpack(other.layout)
        })
    }
}

impl<F: PrimeField> Eq for SparsePoly<F> {}

impl<F: PrimeField> std::fmt::Display for SparsePoly<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let terms: Vec<_> = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mon = m.to_string(self.layout);
                if mon == "1" {
                    format!("{c}")
                } else {
                    format!("{c}*{mon}")
                }
            })
            .collect();

        write!(f, "{}", terms.join(" + "))
    }
}
