//! Polynomial algorithms.
//!
//! Univariate Euclidean algorithms over a prime field: division with
//! remainder, exact division, gcd with cofactors, extended gcd and modular
//! inverses.

pub mod gcd;
