//! Content in the main variable, removed before the sparse engines run.

use polygcd_poly::{Mpolyu, SparsePoly};
use polygcd_rings::PrimeField;
use tracing::trace;

use crate::error::Failure;
use crate::solver::{GcdCofactors, GcdSolver};

/// Monic gcd of the coefficients of `p` in `x_v`.
pub(crate) fn content_in<F: PrimeField>(solver: &mut GcdSolver, p: &SparsePoly<F>, v: usize) -> Result<SparsePoly<F>, Failure> {
    let coeffs = Mpolyu::from_sparse(p, v).into_terms().into_iter().map(|(_, c)| c).collect();
    solver.gcd_many(coeffs)
}

/// Inputs split into content and primitive part in `x_0`.
///
/// `G = cg * gcd(a, b)` where `a`, `b` are the primitive parts, and
/// `gamma = gcd(lc(a), lc(b))` in `x_0`.
pub(crate) struct Primitive<F: PrimeField> {
    pub(crate) a: SparsePoly<F>,
    pub(crate) b: SparsePoly<F>,
    pub(crate) gamma: SparsePoly<F>,
    contents: GcdCofactors<F>,
}

impl<F: PrimeField> Primitive<F> {
    pub(crate) fn new(solver: &mut GcdSolver, a: &SparsePoly<F>, b: &SparsePoly<F>) -> Result<Self, Failure> {
        let ca = content_in(solver, a, 0)?;
        let cb = content_in(solver, b, 0)?;
        let pa = a.div_exact(&ca).ok_or(Failure::Inapplicable)?;
        let pb = b.div_exact(&cb).ok_or(Failure::Inapplicable)?;
        let contents = solver.compute(&ca, &cb)?;
        let gamma = solver.compute(&pa.lead_coeff_in(0), &pb.lead_coeff_in(0))?.g;
        trace!(content_a = ca.len(), content_b = cb.len(), gamma = gamma.len(), "removed x0 content");
        Ok(Self {
            a: pa,
            b: pb,
            gamma,
            contents,
        })
    }

    /// Restores the contents on a gcd of the primitive parts.
    pub(crate) fn finish(&self, g: &SparsePoly<F>, abar: &SparsePoly<F>, bbar: &SparsePoly<F>) -> GcdCofactors<F> {
        GcdCofactors {
            g: g.mul(&self.contents.g),
            abar: abar.mul(&self.contents.abar),
            bbar: bbar.mul(&self.contents.bbar),
        }
    }

    /// The primitive parts are coprime.
    pub(crate) fn coprime(&self) -> GcdCofactors<F> {
        self.finish(&SparsePoly::one(self.a.nvars()), &self.a, &self.b)
    }

    /// Divides both primitive parts by a candidate gcd.
    pub(crate) fn verify(&self, g: &SparsePoly<F>) -> Option<GcdCofactors<F>> {
        let abar = self.a.div_exact(g)?;
        let bbar = self.b.div_exact(g)?;
        Some(self.finish(g, &abar, &bbar))
    }
}
