//! Prime fields Z_p.

use crate::modular::ModInt;
use crate::traits::{Field, PrimeField, Ring};

/// A finite field Z_p for prime p.
///
/// This wraps `ModInt<P>` and implements the algebraic traits. `P` must be
/// prime and below `2^63`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FiniteField<const P: u64>(pub ModInt<P>);

impl<const P: u64> FiniteField<P> {
    /// Creates a new field element.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(ModInt::new(value))
    }

    /// Creates a field element from a signed value.
    #[must_use]
    pub fn from_signed(value: i64) -> Self {
        Self(ModInt::from_signed(value))
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0.value()
    }

    /// Returns the characteristic (the prime p).
    #[must_use]
    pub const fn characteristic() -> u64 {
        P
    }
}

impl<const P: u64> Ring for FiniteField<P> {
    fn zero() -> Self {
        Self(ModInt::new(0))
    }

    fn one() -> Self {
        Self(ModInt::new(1))
    }

    fn is_zero(&self) -> bool {
        self.0.value() == 0
    }

    fn is_one(&self) -> bool {
        self.0.value() == 1
    }

    fn pow(&self, n: u64) -> Self {
        Self(self.0.pow(n))
    }
}

impl<const P: u64> Field for FiniteField<P> {
    fn inv(&self) -> Option<Self> {
        self.0.inv().map(Self)
    }
}

impl<const P: u64> PrimeField for FiniteField<P> {
    fn characteristic() -> u64 {
        P
    }

    fn from_u64(value: u64) -> Self {
        Self::new(value)
    }

    fn value(self) -> u64 {
        self.0.value()
    }
}

impl<const P: u64> std::ops::Add for FiniteField<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<const P: u64> std::ops::Sub for FiniteField<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<const P: u64> std::ops::Mul for FiniteField<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<const P: u64> std::ops::Neg for FiniteField<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl<const P: u64> From<u64> for FiniteField<P> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const P: u64> From<i64> for FiniteField<P> {
    fn from(value: i64) -> Self {
        Self::from_signed(value)
    }
}

impl<const P: u64> std::fmt::Display for FiniteField<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    type F7 = FiniteField<7>;

    #[test]
    fn test_field_ops() {
        let a = F7::new(5);
        let b = F7::new(4);

        assert_eq!((a + b).value(), 2);
        assert_eq!((a - b).value(), 1);
        assert_eq!((a * b).value(), 6);
    }

    #[test]
    fn test_inverse() {
        let a = F7::new(3);
        let inv = a.inv().unwrap();
        assert_eq!((a * inv).value(), 1);
        assert_eq!(F7::zero().inv(), None);
    }

    #[test]
    fn test_division() {
        let a = F7::new(5);
        let b = F7::new(3);
        let c = a.field_div(&b);

        // Verify: c * b = a
        assert_eq!((c * b).value(), a.value());
    }

    #[test]
    fn test_random_nonzero() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let x = F7::random_nonzero(&mut rng);
            assert!(!x.is_zero());
            assert!(x.value() < 7);
        }
        for _ in 0..50 {
            assert!(FiniteField::<2>::random_nonzero(&mut rng).is_one());
        }
    }

    #[test]
    fn test_characteristic() {
        assert_eq!(<FiniteField<101> as PrimeField>::characteristic(), 101);
        assert_eq!(<FiniteField<{ (1 << 31) - 1 }> as PrimeField>::from_u64(1 << 31).value(), 1);
    }
}
