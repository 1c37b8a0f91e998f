//! Rational functions P(x)/Q(x) over ℚ.
//!
//! The representation is canonical:
//! - the denominator is monic
//! - numerator and denominator are coprime
//! - zero is `0 / 1`
//!
//! Canonical form is what makes removable singularities visible: a factor
//! that cancels is gone from the denominator, so every remaining
//! denominator root is a genuine pole.

use std::ops::{Add, Mul, Neg, Sub};

use curvewise_integers::{ExactReal, Rational};
use num_traits::One;

use crate::algorithms::gcd::{exact_div, make_monic, poly_div_rem, poly_gcd};
use crate::dense::DensePoly;

/// A rational function in lowest terms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RationalFunction {
    numerator: DensePoly,
    denominator: DensePoly,
}

impl RationalFunction {
    /// Builds `numerator / denominator` in canonical form.
    ///
    /// Returns `None` when the denominator is the zero polynomial.
    #[must_use]
    pub fn new(numerator: DensePoly, denominator: DensePoly) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let mut rf = Self {
            numerator,
            denominator,
        };
        rf.normalize();
        Some(rf)
    }

    /// A polynomial viewed as a rational function.
    #[must_use]
    pub fn from_poly(p: DensePoly) -> Self {
        Self {
            numerator: p,
            denominator: DensePoly::one(),
        }
    }

    /// The zero function.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_poly(DensePoly::zero())
    }

    /// The constant 1.
    #[must_use]
    pub fn one() -> Self {
        Self::from_poly(DensePoly::one())
    }

    /// A constant function.
    #[must_use]
    pub fn constant(c: Rational) -> Self {
        Self::from_poly(DensePoly::constant(c))
    }

    /// The identity function x.
    #[must_use]
    pub fn x() -> Self {
        Self::from_poly(DensePoly::x())
    }

    /// The numerator polynomial.
    #[must_use]
    pub fn numerator(&self) -> &DensePoly {
        &self.numerator
    }

    /// The (monic) denominator polynomial.
    #[must_use]
    pub fn denominator(&self) -> &DensePoly {
        &self.denominator
    }

    /// Returns true for the zero function.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Returns true when the denominator is 1.
    #[must_use]
    pub fn is_polynomial(&self) -> bool {
        self.denominator.is_constant()
    }

    /// The polynomial, if this is one.
    #[must_use]
    pub fn as_polynomial(&self) -> Option<&DensePoly> {
        self.is_polynomial().then_some(&self.numerator)
    }

    /// The constant value, if this is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<Rational> {
        (self.is_polynomial() && self.numerator.is_constant()).then(|| self.numerator.coeff(0))
    }

    fn normalize(&mut self) {
        if self.numerator.is_zero() {
            self.denominator = DensePoly::one();
            return;
        }

        let g = poly_gcd(&self.numerator, &self.denominator);
        if g.degree() > 0 {
            if let (Some(num), Some(den)) = (
                exact_div(&self.numerator, &g),
                exact_div(&self.denominator, &g),
            ) {
                self.numerator = num;
                self.denominator = den;
            }
        }

        let lead = self.denominator.leading_coeff().clone();
        if !lead.is_one() {
            if let Some(inv) = lead.checked_recip() {
                self.numerator = self.numerator.scale(&inv);
                self.denominator = make_monic(&self.denominator);
            }
        }
    }

    /// deg(numerator) − deg(denominator).
    #[must_use]
    pub fn degree_at_infinity(&self) -> i64 {
        self.numerator.degree() as i64 - self.denominator.degree() as i64
    }

    /// Value at a rational point; `None` at a pole.
    #[must_use]
    pub fn eval(&self, x: &Rational) -> Option<Rational> {
        let den = self.denominator.eval(x);
        let inv = den.checked_recip()?;
        Some(self.numerator.eval(x) * inv)
    }

    /// Exact value at an exact real; `None` at a pole or when the value
    /// leaves the single-unit form.
    #[must_use]
    pub fn eval_real(&self, x: &ExactReal) -> Option<ExactReal> {
        let den = self.denominator.eval_real(x)?;
        self.numerator.eval_real(x)?.checked_div(&den)
    }

    /// Derivative by the quotient rule, (P'Q − PQ') / Q².
    #[must_use]
    pub fn derivative(&self) -> Self {
        let p = &self.numerator;
        let q = &self.denominator;
        let num = p.derivative().mul(q).sub(&p.mul(&q.derivative()));
        Self::new(num, q.mul(q)).unwrap_or_else(Self::zero)
    }

    /// Splits into polynomial part and proper remainder.
    ///
    /// Returns `(poly, proper)` with deg(proper.num) < deg(proper.den).
    #[must_use]
    pub fn decompose_proper(&self) -> (DensePoly, Self) {
        match poly_div_rem(&self.numerator, &self.denominator) {
            Some((q, r)) if !q.is_zero() => (
                q,
                Self::new(r, self.denominator.clone()).unwrap_or_else(Self::zero),
            ),
            _ => (DensePoly::zero(), self.clone()),
        }
    }

    /// Adds two rational functions.
    #[must_use]
    pub fn add_ref(&self, other: &Self) -> Self {
        let num = self
            .numerator
            .mul(&other.denominator)
            .add(&other.numerator.mul(&self.denominator));
        let den = self.denominator.mul(&other.denominator);
        Self::new(num, den).unwrap_or_else(Self::zero)
    }

    /// Subtracts `other`.
    #[must_use]
    pub fn sub_ref(&self, other: &Self) -> Self {
        self.add_ref(&other.neg_ref())
    }

    /// Multiplies two rational functions.
    #[must_use]
    pub fn mul_ref(&self, other: &Self) -> Self {
        let num = self.numerator.mul(&other.numerator);
        let den = self.denominator.mul(&other.denominator);
        Self::new(num, den).unwrap_or_else(Self::zero)
    }

    /// Divides by `other`; `None` when `other` is zero.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        Self::new(
            self.numerator.mul(&other.denominator),
            self.denominator.mul(&other.numerator),
        )
    }

    /// Multiplicative inverse; `None` for zero.
    #[must_use]
    pub fn inv(&self) -> Option<Self> {
        Self::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Negation.
    #[must_use]
    pub fn neg_ref(&self) -> Self {
        Self {
            numerator: self.numerator.neg(),
            denominator: self.denominator.clone(),
        }
    }

    /// Integer power; `None` for a negative power of zero.
    #[must_use]
    pub fn powi(&self, n: i64) -> Option<Self> {
        let base = if n < 0 { self.inv()? } else { self.clone() };
        let exp = u32::try_from(n.unsigned_abs()).ok()?;
        Some(Self {
            numerator: base.numerator.pow(exp),
            denominator: base.denominator.pow(exp),
        })
    }
}

impl Add for RationalFunction {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.add_ref(&other)
    }
}

impl Sub for RationalFunction {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.sub_ref(&other)
    }
}

impl Mul for RationalFunction {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.mul_ref(&other)
    }
}

impl Neg for RationalFunction {
    type Output = Self;

    fn neg(self) -> Self {
        self.neg_ref()
    }
}

impl std::fmt::Display for RationalFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_polynomial() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "({}) / ({})", self.numerator, self.denominator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    fn poly(coeffs: &[i64]) -> DensePoly {
        DensePoly::from_i64s(coeffs)
    }

    fn rf(num: &[i64], den: &[i64]) -> RationalFunction {
        RationalFunction::new(poly(num), poly(den)).unwrap()
    }

    #[test]
    fn test_normalization_cancels_common_factor() {
        // (x^2 - 1) / (x - 1) = x + 1
        let f = rf(&[-1, 0, 1], &[-1, 1]);
        assert!(f.is_polynomial());
        assert_eq!(f.numerator(), &poly(&[1, 1]));

        // (x - 1) / (x - 1) = 1
        assert_eq!(rf(&[-1, 1], &[-1, 1]).as_constant(), Some(Rational::one()));
    }

    #[test]
    fn test_monic_denominator() {
        // 1 / (2x^2 - 2) = (1/2) / (x^2 - 1)
        let f = rf(&[1], &[-2, 0, 2]);
        assert_eq!(f.denominator(), &poly(&[-1, 0, 1]));
        assert_eq!(f.numerator().coeff(0), Rational::from_i64(1, 2));
    }

    #[test]
    fn test_zero_denominator() {
        assert!(RationalFunction::new(poly(&[1]), DensePoly::zero()).is_none());
    }

    #[test]
    fn test_derivative() {
        // d/dx 1/(x^2 - 1) = -2x / (x^2 - 1)^2
        let f = rf(&[1], &[-1, 0, 1]);
        let d = f.derivative();
        assert_eq!(d.numerator(), &poly(&[0, -2]));
        assert_eq!(d.denominator(), &poly(&[-1, 0, 1]).pow(2));
    }

    #[test]
    fn test_decompose_proper() {
        // (x^2 + 1) / x = x + 1/x
        let (q, r) = rf(&[1, 0, 1], &[0, 1]).decompose_proper();
        assert_eq!(q, poly(&[0, 1]));
        assert_eq!(r, rf(&[1], &[0, 1]));
    }

    #[test]
    fn test_eval() {
        let f = rf(&[1], &[-1, 0, 1]);
        assert_eq!(f.eval(&Rational::zero()), Some(Rational::from(-1)));
        assert_eq!(f.eval(&Rational::one()), None);
    }

    #[test]
    fn test_arithmetic() {
        let a = rf(&[1], &[-1, 1]);
        let b = rf(&[1], &[1, 1]);
        // 1/(x-1) - 1/(x+1) = 2/(x^2-1)
        assert_eq!(a.clone() - b.clone(), rf(&[2], &[-1, 0, 1]));
        assert_eq!(a.mul_ref(&b), rf(&[1], &[-1, 0, 1]));
        assert_eq!(a.powi(-2).unwrap(), RationalFunction::from_poly(poly(&[1, -2, 1])));
        assert!(RationalFunction::zero().powi(-1).is_none());
    }
}
