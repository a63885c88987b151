//! # polygcd-poly
//!
//! Polynomial containers for the multivariate gcd engines.
//!
//! This crate provides:
//! - Dense univariate polynomials with Karatsuba multiplication
//! - Sparse multivariate polynomials in lex order with bit-packed monomials
//! - Recursive views: `Bpoly`, `Polyun`, `Mpolyn`, `Mpolyu`
//! - Exponent deflation
//! - Univariate GCD algorithms

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod algorithms;
pub mod bpoly;
pub mod deflate;
pub mod dense;
pub mod monomial;
pub mod mpolyn;
pub mod mpolyu;
pub mod polyun;
pub mod sparse;

#[cfg(test)]
mod proptests;

pub use bpoly::Bpoly;
pub use deflate::{deflate, deflation_params, inflate, Deflation};
pub use dense::DensePoly;
pub use monomial::{ExpLayout, PackedMonomial};
pub use mpolyn::Mpolyn;
pub use mpolyu::{Mpolyu, PAIR_MAX};
pub use polyun::Polyun;
pub use sparse::SparsePoly;
