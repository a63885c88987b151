//! # polygcd-gcd
//!
//! Greatest common divisors of sparse multivariate polynomials over `Z/pZ`,
//! with cofactors.
//!
//! This crate provides:
//! - An orchestrator that settles trivial inputs in closed form
//! - Brown's dense modular algorithm
//! - Zippel's sparse interpolation, reconstructing `G` or a cofactor
//! - A bivariate gcd lifted with multivariate Hensel lifting
//! - A pseudo-remainder fallback for fields too small to evaluate in
//!
//! All randomness comes from the solver's seeded generator.
//!
//! # Example
//!
//! ```
//! use polygcd_gcd::gcd_cofactors;
//! use polygcd_poly::SparsePoly;
//! use polygcd_rings::FiniteField;
//!
//! type F = FiniteField<101>;
//! let f = |terms: &[(&[u64], u64)]| {
//!     SparsePoly::from_exponents(2, terms.iter().map(|(e, c)| (e.to_vec(), F::new(*c))).collect())
//! };
//! // (x + 1)(x + y) and (x + 1)(x + 2)
//! let a = f(&[(&[2, 0], 1), (&[1, 1], 1), (&[1, 0], 1), (&[0, 1], 1)]);
//! let b = f(&[(&[2, 0], 1), (&[1, 0], 3), (&[0, 0], 2)]);
//! let r = gcd_cofactors(&a, &b).unwrap();
//! assert_eq!(r.g, f(&[(&[1, 0], 1), (&[0, 0], 1)]));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]

mod brown;
pub mod config;
mod content;
pub mod error;
mod eval;
mod hensel;
mod interp;
mod prs;
pub mod solver;
mod strategy;
mod trivial;
mod zip;
mod zippel;

#[cfg(test)]
mod proptests;

pub use config::{Algorithm, GcdConfig};
pub use error::GcdError;
pub use solver::{gcd, gcd_cofactors, GcdCofactors, GcdSolver};
