//! Dense univariate polynomials over a prime field.
//!
//! This is the inner ring of every recursive view: the coefficients of
//! `Bpoly` and `Mpolyn`, the images produced by evaluation, and the moduli
//! accumulated during interpolation.

use polygcd_rings::PrimeField;

/// A dense univariate polynomial.
///
/// Coefficients are stored in ascending degree order with trailing zeros
/// trimmed, so the zero polynomial is the empty vector.
/// Multiplication switches from schoolbook to Karatsuba at degree 32.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DensePoly<F: PrimeField> {
    /// Coefficients in ascending degree order.
    coeffs: Vec<F>,
}

const KARATSUBA_THRESHOLD: usize = 32;

impl<F: PrimeField> DensePoly<F> {
    /// Creates a new polynomial from coefficients.
    #[must_use]
    pub fn new(mut coeffs: Vec<F>) -> Self {
        while coeffs.last().is_some_and(|c| c.is_zero()) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::constant(F::one())
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: F) -> Self {
        Self::new(vec![c])
    }

    /// Creates the polynomial x.
    #[must_use]
    pub fn x() -> Self {
        Self::new(vec![F::zero(), F::one()])
    }

    /// Creates the monomial c * x^n.
    #[must_use]
    pub fn monomial(c: F, n: usize) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![F::zero(); n + 1];
        coeffs[n] = c;
        Self { coeffs }
    }

    /// Returns the degree, `None` for the zero polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns true if this is the constant 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_one()
    }

    /// Returns true if the polynomial is a nonzero constant.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() == 1
    }

    /// Returns the leading coefficient (zero for the zero polynomial).
    #[must_use]
    pub fn leading_coeff(&self) -> F {
        self.coeffs.last().copied().unwrap_or_else(F::zero)
    }

    /// Returns the coefficient of x^i.
    #[must_use]
    pub fn coeff(&self, i: usize) -> F {
        self.coeffs.get(i).copied().unwrap_or_else(F::zero)
    }

    /// Returns all coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    /// Evaluates the polynomial at a point using Horner's method.
    #[must_use]
    pub fn eval(&self, x: F) -> F {
        let mut result = F::zero();
        for &c in self.coeffs.iter().rev() {
            result = result * x + c;
        }
        result
    }

    /// Evaluates at `a` and `-a` together.
    ///
    /// Splits `p(x) = E(x^2) + x O(x^2)` and returns
    /// `(E(a^2) + a O(a^2), E(a^2) - a O(a^2))`.
    #[must_use]
    pub fn eval_sym(&self, a: F) -> (F, F) {
        let a2 = a * a;
        let even = horner_stride(&self.coeffs, 0, a2);
        let odd = horner_stride(&self.coeffs, 1, a2) * a;
        (even + odd, even - odd)
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let (long, short) = if self.coeffs.len() >= other.coeffs.len() {
            (self, other)
        } else {
            (other, self)
        };
        let mut result = long.coeffs.clone();
        for (r, &c) in result.iter_mut().zip(&short.coeffs) {
            *r = *r + c;
        }
        Self::new(result)
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|&c| -c).collect(),
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        let result = (0..len).map(|i| self.coeff(i) - other.coeff(i)).collect();
        Self::new(result)
    }

    /// Multiplies two polynomials.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }

        if self.coeffs.len().min(other.coeffs.len()) < KARATSUBA_THRESHOLD {
            self.mul_schoolbook(other)
        } else {
            self.mul_karatsuba(other)
        }
    }

    /// Schoolbook multiplication: O(n²).
    fn mul_schoolbook(&self, other: &Self) -> Self {
        let n = self.coeffs.len();
        let m = other.coeffs.len();
        let mut result = vec![F::zero(); n + m - 1];

        for (i, &a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                result[i + j] = result[i + j] + a * b;
            }
        }

        Self::new(result)
    }

    /// Karatsuba multiplication: O(n^1.58).
    fn mul_karatsuba(&self, other: &Self) -> Self {
        let n = self.coeffs.len();
        let m = other.coeffs.len();

        if n < KARATSUBA_THRESHOLD || m < KARATSUBA_THRESHOLD {
            return self.mul_schoolbook(other);
        }

        let half = n.max(m).div_ceil(2);
        let (a0, a1) = self.split_at(half);
        let (b0, b1) = other.split_at(half);

        // a*b = z2*x^(2*half) + z1*x^half + z0
        let z0 = a0.mul(&b0);
        let z2 = a1.mul(&b1);
        let z1 = a0.add(&a1).mul(&b0.add(&b1)).sub(&z0).sub(&z2);

        let mut result = vec![F::zero(); n + m - 1];
        for (i, &c) in z0.coeffs.iter().enumerate() {
            result[i] = result[i] + c;
        }
        for (i, &c) in z1.coeffs.iter().enumerate() {
            result[i + half] = result[i + half] + c;
        }
        for (i, &c) in z2.coeffs.iter().enumerate() {
            result[i + 2 * half] = result[i + 2 * half] + c;
        }

        Self::new(result)
    }

    fn split_at(&self, k: usize) -> (Self, Self) {
        if self.coeffs.len() <= k {
            return (self.clone(), Self::zero());
        }
        (
            Self::new(self.coeffs[..k].to_vec()),
            Self::new(self.coeffs[k..].to_vec()),
        )
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: F) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            coeffs: self.coeffs.iter().map(|&x| x * c).collect(),
        }
    }

    /// Shifts the polynomial by multiplying by x^n.
    #[must_use]
    pub fn shift(&self, n: usize) -> Self {
        if self.is_zero() || n == 0 {
            return self.clone();
        }

        let mut coeffs = vec![F::zero(); n];
        coeffs.extend_from_slice(&self.coeffs);
        Self { coeffs }
    }

    /// Multiplies by the linear factor `(x - a)`.
    #[must_use]
    pub fn mul_linear(&self, a: F) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![F::zero(); self.coeffs.len() + 1];
        for (i, &c) in self.coeffs.iter().enumerate() {
            coeffs[i + 1] = coeffs[i + 1] + c;
            coeffs[i] = coeffs[i] - c * a;
        }
        Self::new(coeffs)
    }

    /// Returns `p(x + a)`.
    #[must_use]
    pub fn taylor_shift(&self, a: F) -> Self {
        if a.is_zero() || self.coeffs.len() <= 1 {
            return self.clone();
        }
        // Repeated synthetic division by (x - (-a)), O(n²).
        let mut c = self.coeffs.clone();
        let n = c.len();
        for i in 0..n {
            for j in (i..n - 1).rev() {
                c[j] = c[j] + a * c[j + 1];
            }
        }
        Self::new(c)
    }

    /// Raises the polynomial to a non-negative integer power.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            exp >>= 1;
            if exp > 0 {
                base = base.mul(&base);
            }
        }

        result
    }
}

fn horner_stride<F: PrimeField>(coeffs: &[F], start: usize, x: F) -> F {
    let mut acc = F::zero();
    for &c in coeffs.iter().skip(start).step_by(2).rev() {
        acc = acc * x + c;
    }
    acc
}

impl<F: PrimeField> std::fmt::Display for DensePoly<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut terms = Vec::new();
        for (i, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }

            let term = match i {
                0 => format!("{c}"),
                1 => format!("{c}*x"),
                _ => format!("{c}*x^{i}"),
            };
            terms.push(term);
        }

        write!(f, "{}", terms.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygcd_rings::FiniteField;

    type F = FiniteField<101>;

    fn poly(cs: &[i64]) -> DensePoly<F> {
        DensePoly::new(cs.iter().map(|&c| F::from_signed(c)).collect())
    }

    #[test]
    fn test_zero_is_empty() {
        let z = poly(&[0, 0, 0]);
        assert!(z.is_zero());
        assert_eq!(z.degree(), None);
        assert!(z.degree() < Some(0));
        assert_eq!(poly(&[3]).degree(), Some(0));
    }

    #[test]
    fn test_mul_schoolbook() {
        // (1 + 2x)(3 + 4x) = 3 + 10x + 8x^2
        let prod = poly(&[1, 2]).mul(&poly(&[3, 4]));
        assert_eq!(prod, poly(&[3, 10, 8]));
    }

    #[test]
    fn test_mul_karatsuba_matches() {
        let a: Vec<i64> = (0..70).map(|i| (i * 7 + 3) % 101).collect();
        let b: Vec<i64> = (0..45).map(|i| (i * 13 + 1) % 101).collect();
        let (a, b) = (poly(&a), poly(&b));
        assert_eq!(a.mul(&b), a.mul_schoolbook(&b));
    }

    #[test]
    fn test_eval() {
        // p(x) = 1 + 2x + 3x^2, p(2) = 17
        assert_eq!(poly(&[1, 2, 3]).eval(F::new(2)), F::new(17));
    }

    #[test]
    fn test_eval_sym() {
        let p = poly(&[5, -1, 7, 2, 9]);
        let a = F::new(13);
        let (plus, minus) = p.eval_sym(a);
        assert_eq!(plus, p.eval(a));
        assert_eq!(minus, p.eval(-a));
    }

    #[test]
    fn test_mul_linear() {
        // (x + 1)(x - 3) = x^2 - 2x - 3
        assert_eq!(poly(&[1, 1]).mul_linear(F::new(3)), poly(&[-3, -2, 1]));
    }

    #[test]
    fn test_taylor_shift() {
        // p(x) = x^2, p(x + 1) = x^2 + 2x + 1
        let p = poly(&[0, 0, 1]);
        assert_eq!(p.taylor_shift(F::new(1)), poly(&[1, 2, 1]));
        let q = poly(&[4, -3, 8, 1]);
        let a = F::new(17);
        assert_eq!(q.taylor_shift(a).taylor_shift(-a), q);
        assert_eq!(q.taylor_shift(a).eval(F::new(5)), q.eval(F::new(22)));
    }
}
