//! Arbitrary precision integers.
//!
//! This module wraps `dashu::IBig` with the number-theoretic helpers the
//! root finder needs: integer square roots, square-part extraction for
//! radicands, and divisor enumeration for the rational root test.

use dashu::base::{Abs, BitTest, Gcd, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Trial division stops at this prime bound.
pub const TRIAL_DIVISION_BOUND: u64 = 1_000_000;

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Parses a decimal digit string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid integer.
    pub fn parse_decimal(s: &str) -> Result<Self, dashu::base::error::ParseError> {
        IBig::from_str_radix(s, 10).map(Self)
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is even.
    #[must_use]
    pub fn is_even(&self) -> bool {
        (&self.0 % &IBig::from(2)).is_zero()
    }

    /// Number of bits of the magnitude.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Greatest common divisor (always non-negative).
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// Least common multiple (always non-negative).
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        Self(&self.0 / &g.0 * &other.0).abs()
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Converts to an i64 if the value fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Nearest f64; may be infinite for huge magnitudes.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self.to_i64() {
            Some(v) => v as f64,
            None => self.0.to_string().parse().unwrap_or(f64::NAN),
        }
    }

    /// Computes self^exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// Floor of the square root of a non-negative integer.
    ///
    /// Returns `None` for negative input.
    #[must_use]
    pub fn isqrt(&self) -> Option<Self> {
        if self.is_negative() {
            return None;
        }
        if *self < Self::new(2) {
            return Some(self.clone());
        }
        // Newton iteration from an over-estimate converges monotonically down.
        let two = Self::new(2);
        let mut x = two.pow(u32::try_from(self.bit_len().div_ceil(2)).ok()?);
        loop {
            let y = (&x + &(self / &x)) / two.clone();
            if y >= x {
                return Some(x);
            }
            x = y;
        }
    }

    /// Returns the exact square root if this is a perfect square.
    #[must_use]
    pub fn exact_sqrt(&self) -> Option<Self> {
        let r = self.isqrt()?;
        (&r * &r == *self).then_some(r)
    }

    /// Factors `|self|` by trial division.
    ///
    /// Returns prime/multiplicity pairs in increasing prime order, or `None`
    /// when a cofactor survives that trial division cannot certify as prime.
    #[must_use]
    pub fn trial_factor(&self) -> Option<Vec<(Integer, u32)>> {
        let mut n = self.abs();
        let mut factors = Vec::new();
        if n.is_zero() {
            return None;
        }

        let mut p = 2u64;
        while p <= TRIAL_DIVISION_BOUND {
            let prime = Integer::from(p);
            if &prime * &prime > n {
                break;
            }
            let mut count = 0;
            while (&n % &prime).is_zero() {
                n = n / prime.clone();
                count += 1;
            }
            if count > 0 {
                factors.push((prime, count));
            }
            p += if p == 2 { 1 } else { 2 };
        }

        if !n.is_one() {
            let bound = Integer::from(TRIAL_DIVISION_BOUND);
            if n > &bound * &bound {
                return None;
            }
            factors.push((n, 1));
        }
        Some(factors)
    }

    /// Splits `|self| = s² · d` with `d` free of square factors.
    ///
    /// When the trial factorization is incomplete the unfactored cofactor is
    /// kept inside `d` unless it is itself a perfect square.
    #[must_use]
    pub fn split_square(&self) -> (Integer, Integer) {
        let n = self.abs();
        if n.is_zero() {
            return (Integer::one(), Integer::zero());
        }
        match n.trial_factor() {
            Some(factors) => {
                let mut square = Integer::one();
                let mut free = Integer::one();
                for (p, k) in factors {
                    square = square * p.pow(k / 2);
                    if k % 2 == 1 {
                        free = free * p;
                    }
                }
                (square, free)
            }
            None => match n.exact_sqrt() {
                Some(root) => (root, Integer::one()),
                None => (Integer::one(), n),
            },
        }
    }

    /// All positive divisors of `|self|` in increasing order.
    ///
    /// Returns `None` for zero or when the factorization is incomplete.
    #[must_use]
    pub fn positive_divisors(&self) -> Option<Vec<Integer>> {
        let factors = self.trial_factor()?;
        let mut divisors = vec![Integer::one()];
        for (p, k) in factors {
            let current = divisors.clone();
            let mut power = Integer::one();
            for _ in 0..k {
                power = power * p.clone();
                divisors.extend(current.iter().map(|d| d * &power));
            }
        }
        divisors.sort();
        Some(divisors)
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! integer_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Integer {
            type Output = Integer;

            fn $method(self, rhs: Integer) -> Integer {
                Integer($trait::$method(self.0, rhs.0))
            }
        }

        impl $trait<&Integer> for Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer($trait::$method(self.0, &rhs.0))
            }
        }

        impl $trait for &Integer {
            type Output = Integer;

            fn $method(self, rhs: &Integer) -> Integer {
                Integer($trait::$method(&self.0, &rhs.0))
            }
        }
    };
}

integer_binop!(Add, add);
integer_binop!(Sub, sub);
integer_binop!(Mul, mul);
integer_binop!(Div, div);
integer_binop!(Rem, rem);

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self::new(i64::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isqrt() {
        assert_eq!(Integer::new(0).isqrt(), Some(Integer::new(0)));
        assert_eq!(Integer::new(15).isqrt(), Some(Integer::new(3)));
        assert_eq!(Integer::new(16).isqrt(), Some(Integer::new(4)));
        assert_eq!(Integer::new(-4).isqrt(), None);
        let big = Integer::parse_decimal("1000000000000000000000000").unwrap();
        assert_eq!(big.exact_sqrt(), Some(Integer::new(1_000_000_000_000)));
    }

    #[test]
    fn test_split_square() {
        // 72 = 6² · 2
        let (s, d) = Integer::new(72).split_square();
        assert_eq!(s, Integer::new(6));
        assert_eq!(d, Integer::new(2));

        let (s, d) = Integer::new(-12).split_square();
        assert_eq!(s, Integer::new(2));
        assert_eq!(d, Integer::new(3));
    }

    #[test]
    fn test_divisors() {
        let divs = Integer::new(12).positive_divisors().unwrap();
        let expected: Vec<Integer> = [1, 2, 3, 4, 6, 12].into_iter().map(Integer::new).collect();
        assert_eq!(divs, expected);
        assert!(Integer::new(0).positive_divisors().is_none());
    }

    #[test]
    fn test_bit_len() {
        assert_eq!(Integer::zero().bit_len(), 0);
        assert_eq!(Integer::new(1).bit_len(), 1);
        assert_eq!(Integer::new(-8).bit_len(), 4);
        assert_eq!(Integer::new(255).bit_len(), 8);
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(Integer::new(48).gcd(&Integer::new(-18)), Integer::new(6));
        assert_eq!(Integer::new(4).lcm(&Integer::new(6)), Integer::new(12));
    }
}
