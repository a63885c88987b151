//! Algebraic structure traits.
//!
//! The gcd engines are generic over the coefficient field. Only the
//! operations they actually need are required here: ring arithmetic,
//! inversion, and for prime fields the characteristic and random sampling.

use rand::Rng;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::ops::{Add, Mul, Neg, Sub};

/// A ring is a set with addition and multiplication operations.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
pub trait Ring:
    Clone + Eq + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Computes self + self + ... (n times).
    fn mul_by_scalar(&self, n: i64) -> Self {
        if n == 0 {
            return Self::zero();
        }

        // Double-and-add so large multiples stay cheap.
        let mut result = Self::zero();
        let mut base = self.clone();
        let mut k = n.unsigned_abs();
        while k > 0 {
            if k & 1 == 1 {
                result = result + base.clone();
            }
            base = base.clone() + base;
            k >>= 1;
        }

        if n < 0 {
            -result
        } else {
            result
        }
    }

    /// Computes self^n for non-negative n.
    fn pow(&self, n: u64) -> Self {
        if n == 0 {
            return Self::one();
        }

        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base.clone();
            }
            base = base.clone() * base;
            exp >>= 1;
        }

        result
    }
}

/// A field is a ring where every non-zero element has a multiplicative inverse.
pub trait Field: Ring {
    /// Computes the multiplicative inverse.
    ///
    /// Returns `None` if the element is zero.
    fn inv(&self) -> Option<Self>;

    /// Divides by another element.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        self.clone() * other.inv().expect("division by zero")
    }
}

/// A prime field `Z/pZ` with a word-sized characteristic.
///
/// This is the coefficient domain of every polynomial in the workspace.
pub trait PrimeField: Field + Copy + Hash + Display + 'static {
    /// The characteristic `p`.
    fn characteristic() -> u64;

    /// Reduces an unsigned integer into the field.
    fn from_u64(value: u64) -> Self;

    /// Returns the canonical representative in `[0, p)`.
    fn value(self) -> u64;

    /// Samples a uniformly random element.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_u64(rng.gen_range(0..Self::characteristic()))
    }

    /// Samples a uniformly random nonzero element.
    fn random_nonzero<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_u64(rng.gen_range(1..Self::characteristic().max(2)))
    }
}
