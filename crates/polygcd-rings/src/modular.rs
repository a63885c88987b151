//! Modular arithmetic.
//!
//! This module provides integers modulo a word-sized prime, the coefficient
//! representation of every polynomial in the gcd engine.

use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A modular integer with a compile-time modulus.
///
/// The value is always canonical, i.e. in `[0, P)`. The modulus must be
/// below `2^63` so that a sum of two canonical values fits in a `u64`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModInt<const P: u64>(u64);

impl<const P: u64> ModInt<P> {
    /// Creates a new modular integer.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value % P)
    }

    /// Creates a modular integer from a signed value.
    #[must_use]
    pub fn from_signed(value: i64) -> Self {
        if value >= 0 {
            Self::new(value as u64)
        } else {
            Self((P - (value.unsigned_abs() % P)) % P)
        }
    }

    /// Returns the canonical value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the modulus.
    #[must_use]
    pub const fn modulus() -> u64 {
        P
    }

    /// Computes the modular inverse using the extended Euclidean algorithm.
    ///
    /// Returns `None` if the inverse doesn't exist (when gcd(self, P) != 1).
    #[must_use]
    pub fn inv(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }

        let mut t = 0i128;
        let mut new_t = 1i128;
        let mut r = i128::from(P);
        let mut new_r = i128::from(self.0);

        while new_r != 0 {
            let quotient = r / new_r;
            (t, new_t) = (new_t, t - quotient * new_t);
            (r, new_r) = (new_r, r - quotient * new_r);
        }

        if r > 1 {
            return None;
        }

        let t = t.rem_euclid(i128::from(P));
        Some(Self(t as u64))
    }

    /// Computes self^exp using binary exponentiation.
    #[must_use]
    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut result = Self::one();

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }

        result
    }
}

impl<const P: u64> Zero for ModInt<P> {
    fn zero() -> Self {
        Self(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl<const P: u64> One for ModInt<P> {
    fn one() -> Self {
        Self(1 % P)
    }

    fn is_one(&self) -> bool {
        self.0 == 1 % P
    }
}

impl<const P: u64> fmt::Debug for ModInt<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.0, P)
    }
}

impl<const P: u64> fmt::Display for ModInt<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u64> Add for ModInt<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        let s = self.0 + rhs.0;
        Self(if s >= P { s - P } else { s })
    }
}

impl<const P: u64> Sub for ModInt<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.0 >= rhs.0 {
            Self(self.0 - rhs.0)
        } else {
            Self(P - rhs.0 + self.0)
        }
    }
}

impl<const P: u64> Mul for ModInt<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // Use u128 to avoid overflow
        Self(((u128::from(self.0) * u128::from(rhs.0)) % u128::from(P)) as u64)
    }
}

impl<const P: u64> Div for ModInt<P> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.inv().expect("division by non-invertible element")
    }
}

impl<const P: u64> Neg for ModInt<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.0 == 0 {
            Self(0)
        } else {
            Self(P - self.0)
        }
    }
}

impl<const P: u64> From<u64> for ModInt<P> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const P: u64> From<i64> for ModInt<P> {
    fn from(value: i64) -> Self {
        Self::from_signed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Mod7 = ModInt<7>;

    #[test]
    fn test_basic_ops() {
        let a = Mod7::new(5);
        let b = Mod7::new(4);

        assert_eq!((a + b).value(), 2); // 5 + 4 = 9 ≡ 2 (mod 7)
        assert_eq!((a - b).value(), 1);
        assert_eq!((b - a).value(), 6);
        assert_eq!((a * b).value(), 6); // 20 ≡ 6 (mod 7)
    }

    #[test]
    fn test_inverse() {
        // 3 * 5 = 15 ≡ 1 (mod 7), so inv(3) = 5
        assert_eq!(Mod7::new(3).inv(), Some(Mod7::new(5)));

        assert_eq!(Mod7::new(0).inv(), None);
    }

    #[test]
    fn test_inverse_large_modulus() {
        type M61 = ModInt<{ (1 << 61) - 1 }>;
        let a = M61::new(123_456_789_012_345);
        let inv = a.inv().unwrap();
        assert_eq!((a * inv).value(), 1);
    }

    #[test]
    fn test_pow() {
        let a = Mod7::new(3);
        assert_eq!(a.pow(0).value(), 1);
        assert_eq!(a.pow(1).value(), 3);
        assert_eq!(a.pow(2).value(), 2);
        assert_eq!(a.pow(6).value(), 1); // Fermat
    }

    #[test]
    fn test_negative() {
        assert_eq!(Mod7::from_signed(-3).value(), 4);
        assert_eq!(Mod7::from_signed(-14).value(), 0);
        assert_eq!((-Mod7::new(2)).value(), 5);
    }
}
