//! # polygcd-lift
//!
//! Multivariate Hensel lifting over prime fields.
//!
//! Factors of `target(x_0, ..., x_{m-1}, 0)` are lifted to factors of
//! `target(x_0, ..., x_m)` one variable at a time. Leading coefficients in
//! `x_0` are imposed up front so that each correction is unique; the
//! corrections come from a multivariate partial-fraction (Diophantine)
//! solver built on univariate Bézout inverses.
//!
//! All points are the origin. Callers that evaluate elsewhere shift
//! coordinates first with `SparsePoly::taylor_shift`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod multivariate_hensel;
pub mod pfrac;

pub use multivariate_hensel::hensel_lift_step;
pub use pfrac::LiftContext;

use thiserror::Error;

/// Errors raised while lifting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiftError {
    /// The univariate images of the factors share a common factor.
    #[error("factor images at the origin are not pairwise coprime")]
    NotCoprime,

    /// A leading coefficient vanishes at the origin or disagrees with its factor.
    #[error("leading coefficient does not match factor {index} at the origin")]
    DegreeMismatch {
        /// Index of the offending factor.
        index: usize,
    },

    /// The variable to lift is `x_0` or outside the polynomial ring.
    #[error("cannot lift x_{var} in a ring with {nvars} variables")]
    InvalidVariable {
        /// The requested variable.
        var: usize,
        /// Variables of the target.
        nvars: usize,
    },

    /// The correction series did not terminate with zero error.
    #[error("no polynomial lift exists within the degree bound")]
    NoSolution,
}
