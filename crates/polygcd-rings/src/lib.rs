//! # polygcd-rings
//!
//! Coefficient arithmetic for the polygcd workspace.
//!
//! This crate provides:
//! - `ModInt<P>`: integers modulo a compile-time word-sized modulus
//! - `Ring`, `Field` and `PrimeField` traits
//! - `FiniteField<P>`: the prime field Z_p used by every polynomial type

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod finite_field;
pub mod modular;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use finite_field::FiniteField;
pub use modular::ModInt;
pub use traits::{Field, PrimeField, Ring};
