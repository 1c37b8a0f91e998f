//! Arbitrary precision rational numbers.
//!
//! Rationals are the coefficient field for every polynomial and every
//! exact value the analyzer manipulates.

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::rational::RBig;
use num_traits::{One, Zero};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::Integer;

/// Largest result, in bits, that an exact integer power may produce.
pub const MAX_POWER_BITS: usize = 1 << 16;

/// An arbitrary precision rational number.
///
/// Always stored in lowest terms with a positive denominator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

impl Rational {
    /// Creates a rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(numerator: Integer, denominator: Integer) -> Self {
        assert!(!denominator.is_zero(), "denominator cannot be zero");
        let negative = denominator.is_negative();
        let value = Self(RBig::from_parts(
            numerator.into_inner(),
            denominator.into_inner().unsigned_abs(),
        ));
        if negative {
            -value
        } else {
            value
        }
    }

    /// Creates a rational from an integer.
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self(RBig::from(n.into_inner()))
    }

    /// Creates a rational from i64 numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn from_i64(numerator: i64, denominator: i64) -> Self {
        Self::new(Integer::new(numerator), Integer::new(denominator))
    }

    /// Parses a decimal literal such as `12`, `0.25` or `1.5e-3` exactly.
    ///
    /// Returns `None` if the text is not a plain decimal literal.
    #[must_use]
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(pos) => (&text[..pos], text[pos + 1..].parse::<i32>().ok()?),
            None => (text, 0),
        };
        let (whole, fraction) = match mantissa.split_once('.') {
            Some((w, f)) => (w, f),
            None => (mantissa, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        let digits = format!("{whole}{fraction}");
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let numerator = Integer::parse_decimal(&digits).ok()?;
        let scale = exponent - i32::try_from(fraction.len()).ok()?;
        let ten = Rational::from(10);
        Some(Rational::from_integer(numerator) * ten.powi(scale)?)
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// Returns the (positive) denominator.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(dashu::integer::IBig::from(self.0.denominator().clone()))
    }

    /// Returns true if the denominator is one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Converts to an integer if the denominator is one.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        self.is_integer().then(|| self.numerator())
    }

    /// Converts to an i64 if this is an integer that fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer()?.to_i64()
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the reciprocal, or `None` for zero.
    #[must_use]
    pub fn checked_recip(&self) -> Option<Self> {
        (!self.is_zero()).then(|| Self(self.0.clone().inv()))
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

    /// Returns true if negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Approximate bit size of numerator and denominator beyond their
    /// leading bit; zero exactly for 0 and ±1.
    #[must_use]
    pub fn log2_size(&self) -> usize {
        self.numerator().bit_len().saturating_sub(1) + self.denominator().bit_len().saturating_sub(1)
    }

    /// Computes self^exp for non-negative exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// Computes self^exp for any integer exponent.
    ///
    /// Returns `None` for a negative power of zero, and when the result
    /// would need more than [`MAX_POWER_BITS`] bits.
    #[must_use]
    pub fn powi(&self, exp: i32) -> Option<Self> {
        if self.log2_size().saturating_mul(exp.unsigned_abs() as usize) > MAX_POWER_BITS {
            return None;
        }
        if exp >= 0 {
            Some(self.pow(exp.unsigned_abs()))
        } else {
            self.checked_recip().map(|r| r.pow(exp.unsigned_abs()))
        }
    }

    /// Largest integer not greater than self.
    #[must_use]
    pub fn floor(&self) -> Integer {
        let num = self.numerator();
        let den = self.denominator();
        let q = &num / &den;
        if self.is_negative() && !(&num % &den).is_zero() {
            q - Integer::one()
        } else {
            q
        }
    }

    /// Smallest integer not less than self.
    #[must_use]
    pub fn ceil(&self) -> Integer {
        -(-self).floor()
    }

    /// The midpoint of two rationals.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        (self + other) * Rational::from_i64(1, 2)
    }

    /// Exact `n`-th root if one exists among the rationals.
    ///
    /// Odd roots of negative numbers are real and negative.
    #[must_use]
    pub fn exact_root(&self, n: u32) -> Option<Self> {
        if n == 0 {
            return None;
        }
        if n == 1 || self.is_zero() {
            return Some(self.clone());
        }
        if self.is_negative() {
            return if n % 2 == 1 {
                self.abs().exact_root(n).map(|r| -r)
            } else {
                None
            };
        }
        let num = integer_root(&self.numerator(), n)?;
        let den = integer_root(&self.denominator(), n)?;
        Some(Rational::new(num, den))
    }

    /// Writes `sqrt(self)` as `coeff · sqrt(radicand)` with a square-free
    /// integer radicand.
    ///
    /// Returns `None` for negative input. A radicand of one means the root
    /// is the rational `coeff`.
    #[must_use]
    pub fn split_sqrt(&self) -> Option<(Rational, Integer)> {
        if self.is_negative() {
            return None;
        }
        if self.is_zero() {
            return Some((Rational::zero(), Integer::one()));
        }
        // sqrt(p/q) = sqrt(p·q) / q
        let den = self.denominator();
        let (square, free) = (self.numerator() * den.clone()).split_square();
        Some((Rational::new(square, den), free))
    }

    /// Nearest f64.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        let num = self.numerator();
        let den = self.denominator();
        match (num.to_i64(), den.to_i64()) {
            (Some(n), Some(d)) => n as f64 / d as f64,
            _ => {
                // Scale both down so that the quotient stays representable.
                let shift = num.bit_len().max(den.bit_len()).saturating_sub(60);
                let factor = Integer::new(2).pow(u32::try_from(shift).unwrap_or(u32::MAX));
                (num / factor.clone()).to_f64() / (den / factor).to_f64()
            }
        }
    }

    /// Returns the inner `dashu::RBig`.
    #[must_use]
    pub fn into_inner(self) -> RBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::RBig`.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }
}

fn integer_root(value: &Integer, n: u32) -> Option<Integer> {
    if n == 2 {
        return value.exact_sqrt();
    }
    // Bisection on [0, 2^(bits/n + 1)].
    let mut lo = Integer::zero();
    let mut hi = Integer::new(2).pow(u32::try_from(value.bit_len() / n as usize + 1).ok()?);
    while lo <= hi {
        let mid = (&lo + &hi) / Integer::new(2);
        let power = mid.pow(n);
        match power.cmp(value) {
            std::cmp::Ordering::Equal => return Some(mid),
            std::cmp::Ordering::Less => lo = mid + Integer::one(),
            std::cmp::Ordering::Greater => hi = mid - Integer::one(),
        }
    }
    None
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

impl Serialize for Rational {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

macro_rules! rational_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                Rational($trait::$method(self.0, rhs.0))
            }
        }

        impl $trait<&Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                Rational($trait::$method(self.0, &rhs.0))
            }
        }

        impl $trait for &Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                Rational($trait::$method(&self.0, &rhs.0))
            }
        }
    };
}

rational_binop!(Add, add);
rational_binop!(Sub, sub);
rational_binop!(Mul, mul);
rational_binop!(Div, div);

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational(-&self.0)
    }
}

impl From<Integer> for Rational {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(Integer::new(n))
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::from_integer(Integer::new(i64::from(n)))
    }
}
