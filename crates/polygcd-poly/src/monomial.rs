//! Bit-packed monomials for lex-ordered multivariate polynomials.
//!
//! Exponents are packed into 64-bit words with a per-polynomial field width.
//! Variable 0 occupies the most significant field of word 0, so comparing the
//! word vectors lexicographically is exactly lex order with variable 0 most
//! significant. Fields never straddle a word boundary.

use smallvec::SmallVec;

/// Minimum field width in bits.
pub const MIN_BITS: u32 = 8;

/// Field width and variable count of a packed exponent vector.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ExpLayout {
    nvars: usize,
    bits: u32,
}

impl ExpLayout {
    /// Creates a layout; `bits` is clamped to `[MIN_BITS, 64]`.
    #[must_use]
    pub fn new(nvars: usize, bits: u32) -> Self {
        Self {
            nvars,
            bits: bits.clamp(MIN_BITS, 64),
        }
    }

    /// The narrowest layout able to hold exponents up to `max_exp`.
    #[must_use]
    pub fn for_max_exponent(nvars: usize, max_exp: u64) -> Self {
        Self::new(nvars, bits_needed(max_exp))
    }

    /// Number of variables.
    #[must_use]
    pub const fn nvars(self) -> usize {
        self.nvars
    }

    /// Field width.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.bits
    }

    /// Largest exponent representable in one field.
    #[must_use]
    pub const fn max_exponent(self) -> u64 {
        if self.bits >= 64 {
            u64::MAX
        } else {
            (1 << self.bits) - 1
        }
    }

    const fn fields_per_word(self) -> usize {
        (64 / self.bits) as usize
    }

    /// Number of words per monomial.
    #[must_use]
    pub const fn words(self) -> usize {
        self.nvars.div_ceil(self.fields_per_word())
    }

    /// The wider of two layouts over the same variables.
    #[must_use]
    pub fn join(self, other: Self) -> Self {
        debug_assert_eq!(self.nvars, other.nvars);
        Self::new(self.nvars, self.bits.max(other.bits))
    }

    #[inline]
    fn position(self, var: usize) -> (usize, u32) {
        let fpw = self.fields_per_word();
        let word = var / fpw;
        let slot = (var % fpw) as u32;
        (word, 64 - self.bits * (slot + 1))
    }
}

/// Number of bits needed to store `e`.
#[must_use]
pub const fn bits_needed(e: u64) -> u32 {
    64 - e.leading_zeros()
}

/// A packed exponent vector. Its meaning depends on an `ExpLayout`.
///
/// The derived `Ord` is lex order for monomials sharing a layout.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct PackedMonomial(SmallVec<[u64; 2]>);

impl PackedMonomial {
    /// The monomial 1.
    #[must_use]
    pub fn one(layout: ExpLayout) -> Self {
        Self(SmallVec::from_elem(0, layout.words()))
    }

    /// Packs an exponent vector.
    ///
    /// Every exponent must fit in `layout.bits()`.
    #[must_use]
    pub fn pack(exps: &[u64], layout: ExpLayout) -> Self {
        debug_assert_eq!(exps.len(), layout.nvars());
        let mut m = Self::one(layout);
        for (v, &e) in exps.iter().enumerate() {
            debug_assert!(e <= layout.max_exponent());
            let (w, shift) = layout.position(v);
            m.0[w] |= e << shift;
        }
        m
    }

    /// Creates the monomial `x_var^e`.
    #[must_use]
    pub fn var_power(var: usize, e: u64, layout: ExpLayout) -> Self {
        let mut m = Self::one(layout);
        let (w, shift) = layout.position(var);
        m.0[w] = e << shift;
        m
    }

    /// Returns the exponent of variable `var`.
    #[must_use]
    pub fn exponent(&self, var: usize, layout: ExpLayout) -> u64 {
        let (w, shift) = layout.position(var);
        (self.0[w] >> shift) & layout.max_exponent()
    }

    /// Overwrites the exponent of variable `var`.
    pub fn set_exponent(&mut self, var: usize, e: u64, layout: ExpLayout) {
        let (w, shift) = layout.position(var);
        let mask = layout.max_exponent() << shift;
        self.0[w] = (self.0[w] & !mask) | (e << shift);
    }

    /// Returns all exponents.
    #[must_use]
    pub fn unpack(&self, layout: ExpLayout) -> Vec<u64> {
        (0..layout.nvars()).map(|v| self.exponent(v, layout)).collect()
    }

    /// Adds exponent vectors word by word.
    ///
    /// The caller guarantees that no field overflows.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self(self.0.iter().zip(&other.0).map(|(a, b)| a + b).collect())
    }

    /// Divides by another monomial if possible.
    #[must_use]
    pub fn div(&self, other: &Self, layout: ExpLayout) -> Option<Self> {
        if !other.divides(self, layout) {
            return None;
        }
        // Field-wise borrows cannot occur once divisibility holds.
        Some(Self(self.0.iter().zip(&other.0).map(|(a, b)| a - b).collect()))
    }

    /// Returns true if `self` divides `other`.
    #[must_use]
    pub fn divides(&self, other: &Self, layout: ExpLayout) -> bool {
        (0..layout.nvars()).all(|v| self.exponent(v, layout) <= other.exponent(v, layout))
    }

    /// Returns true if every exponent is zero.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Sum of the exponents.
    #[must_use]
    pub fn total_degree(&self, layout: ExpLayout) -> u64 {
        (0..layout.nvars()).map(|v| self.exponent(v, layout)).sum()
    }

    /// Re-encodes this monomial under a different layout.
    #[must_use]
    pub fn repack(&self, from: ExpLayout, to: ExpLayout) -> Self {
        if from == to {
            return self.clone();
        }
        Self::pack(&self.unpack(from), to)
    }

    /// Formats the monomial using variable names `x0, x1, ...`.
    #[must_use]
    pub fn to_string(&self, layout: ExpLayout) -> String {
        let parts: Vec<String> = (0..layout.nvars())
            .filter_map(|v| match self.exponent(v, layout) {
                0 => None,
                1 => Some(format!("x{v}")),
                e => Some(format!("x{v}^{e}")),
            })
            .collect();

        if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join("*")
        }
    }
}
