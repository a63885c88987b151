//! Sparse interpolation against a known skeleton.
//!
//! The target is grouped by its exponents in `x_0` and `x_1`; inside a group
//! the unknown coefficients multiply known monomials in `x_2, ..., x_{k-1}`.
//! Evaluating those variables at `x_v = s_v^t` for `t = 1, 2, ...` turns each
//! group into a transposed Vandermonde system with nodes `m_i(s)`, solved in
//! closed form through the master polynomial `Π (z - m_i(s))`.

use polygcd_poly::{DensePoly, Mpolyu, Polyun, SparsePoly, PAIR_MAX};
use polygcd_rings::PrimeField;
use rustc_hash::{FxHashMap, FxHashSet};

/// Why a zip solve failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZipError {
    /// Two monomials evaluate to the same node.
    Singular,
    /// The images contradict the skeleton.
    Inconsistent,
}

#[derive(Clone, Debug)]
struct Group {
    e0: u64,
    e1: u64,
    /// Exponents of `x_2, ..., x_{active-1}` per monomial.
    monomials: Vec<Vec<u64>>,
}

/// The monomial structure of an image polynomial in `x_0, ..., x_{active-1}`.
#[derive(Clone, Debug)]
pub(crate) struct Skeleton {
    nvars: usize,
    active: usize,
    groups: Vec<Group>,
    index: FxHashMap<(u64, u64), usize>,
}

impl Skeleton {
    /// Groups the terms of `h`, which involves only `x_0, ..., x_{active-1}`.
    ///
    /// Returns `None` if an exponent of `x_0` or `x_1` does not fit 32 bits.
    pub(crate) fn new<F: PrimeField>(h: &SparsePoly<F>, active: usize) -> Option<Self> {
        let pairs = Mpolyu::from_sparse_pair(h, 0, 1)?;
        let mut groups = Vec::with_capacity(pairs.len());
        let mut index = FxHashMap::default();
        for (key, coeff) in pairs.terms() {
            let e0 = key >> 32;
            let e1 = key & PAIR_MAX;
            let monomials = coeff
                .iter_exponents()
                .map(|(exps, _)| exps[2..active].to_vec())
                .collect();
            index.insert((e0, e1), groups.len());
            groups.push(Group { e0, e1, monomials });
        }
        Some(Self {
            nvars: h.nvars(),
            active,
            groups,
            index,
        })
    }

    /// Size of the largest group.
    pub(crate) fn max_group(&self) -> usize {
        self.groups.iter().map(|g| g.monomials.len()).max().unwrap_or(0)
    }

    /// Number of structured images needed, including one check image.
    pub(crate) fn points_needed(&self) -> usize {
        if self.active <= 2 {
            1
        } else {
            self.max_group() + 1
        }
    }

    /// Node `m(s)` of every monomial, group by group; `s` is indexed by variable.
    fn nodes<F: PrimeField>(&self, s: &[F]) -> Vec<Vec<F>> {
        self.groups
            .iter()
            .map(|g| {
                g.monomials
                    .iter()
                    .map(|exps| {
                        exps.iter()
                            .zip(&s[2..self.active])
                            .fold(F::one(), |acc, (&e, &x)| if e == 0 { acc } else { acc * x.pow(e) })
                    })
                    .collect()
            })
            .collect()
    }

    /// Recovers the polynomial from images at `x_v = s_v^t`, `t = 1..=images.len()`.
    pub(crate) fn solve<F: PrimeField>(&self, images: &[Polyun<F>], s: &[F]) -> Result<SparsePoly<F>, ZipError> {
        for image in images {
            if image.iter_nonzero().any(|(e0, e1, _)| !self.index.contains_key(&(e0, e1))) {
                return Err(ZipError::Inconsistent);
            }
        }

        let nodes = self.nodes(s);
        let mut terms = Vec::new();
        for (group, nodes) in self.groups.iter().zip(&nodes) {
            let values: Vec<F> = images
                .iter()
                .map(|img| img.coeff(group.e0).map_or(F::zero(), |c| c.coeff(group.e1 as usize)))
                .collect();
            let coeffs = solve_transposed_vandermonde(nodes, &values)?;
            for (exps, c) in group.monomials.iter().zip(coeffs) {
                if c.is_zero() {
                    continue;
                }
                let mut full = vec![0; self.nvars];
                full[0] = group.e0;
                full[1] = group.e1;
                full[2..self.active].copy_from_slice(exps);
                terms.push((full, c));
            }
        }
        Ok(SparsePoly::from_exponents(self.nvars, terms))
    }
}

/// Solves `Σ_i c_i * nodes[i]^t = values[t - 1]` for `t = 1..=nodes.len()`.
///
/// Extra values are check equations.
pub(crate) fn solve_transposed_vandermonde<F: PrimeField>(nodes: &[F], values: &[F]) -> Result<Vec<F>, ZipError> {
    let r = nodes.len();
    if values.len() < r {
        return Err(ZipError::Inconsistent);
    }
    let mut seen = FxHashSet::default();
    if nodes.iter().any(|x| x.is_zero() || !seen.insert(*x)) {
        return Err(ZipError::Singular);
    }

    let master = nodes.iter().fold(DensePoly::one(), |m, &x| m.mul_linear(x));
    let mcoeffs = master.coeffs();

    let mut coeffs = Vec::with_capacity(r);
    let mut q = vec![F::zero(); r];
    for &x in nodes {
        // Synthetic division of the master polynomial by (z - x).
        q[r - 1] = mcoeffs[r];
        for k in (1..r).rev() {
            q[k - 1] = mcoeffs[k] + x * q[k];
        }
        let num = q.iter().zip(values).fold(F::zero(), |acc, (&qj, &v)| acc + qj * v);
        let denom = x * DensePoly::new(q.clone()).eval(x);
        let inv = denom.inv().ok_or(ZipError::Singular)?;
        coeffs.push(num * inv);
    }

    for (t, &v) in values.iter().enumerate().skip(r) {
        let e = t as u64 + 1;
        let predicted = nodes
            .iter()
            .zip(&coeffs)
            .fold(F::zero(), |acc, (&x, &c)| acc + c * x.pow(e));
        if predicted != v {
            return Err(ZipError::Inconsistent);
        }
    }
    Ok(coeffs)
}
