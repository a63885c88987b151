//! Error types for the gcd solver.

use thiserror::Error;

/// Errors returned by the public gcd entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GcdError {
    /// The deflated exponents do not fit the supported packing width.
    #[error("exponents need {bits} bits after deflation; at most 62 are supported")]
    ExponentOverflow {
        /// Bits needed by the largest deflated exponent.
        bits: u32,
    },

    /// Every applicable engine ran out of retries.
    #[error("every gcd algorithm exhausted its retry budget")]
    Exhausted,

    /// The inputs live in different polynomial rings.
    #[error("inputs have {left} and {right} variables")]
    VariableMismatch {
        /// Variable count of the first input.
        left: usize,
        /// Variable count of the second input.
        right: usize,
    },
}

/// Why one engine attempt did not produce a gcd.
///
/// Never escapes the crate: the orchestrator maps it to a `GcdError` or
/// falls through to the next engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    /// Unlucky points; another engine or a fresh attempt may succeed.
    Retry,
    /// The engine cannot handle this input shape.
    Inapplicable,
    /// An intermediate exponent does not fit.
    Overflow,
    /// The field has too few elements for the points needed.
    Exhausted,
}

/// Largest deflated exponent width accepted by the engines.
pub(crate) const MAX_BITS: u32 = 62;
