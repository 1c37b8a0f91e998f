//! Exact real values `a + b·t` over a single irrational unit `t`.
//!
//! The unit is a square root `√d`, an exponential `e^r` or a logarithm
//! `ln c` of a rational. Square roots cover every real root of a rational
//! polynomial of degree at most two; the transcendental units cover the
//! solutions of `ln(g) = r` and `exp(g) = c`. Arithmetic is closed only
//! where the result keeps a single unit and is therefore checked.
//!
//! Ordering is exact for any pair of values. Square roots compare by
//! squaring. Transcendental units compare by refining rational
//! enclosures, which always separates two distinct values.

use num_traits::{One, Zero};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::rational::MAX_POWER_BITS;
use crate::{Integer, Rational};

/// Largest `|r|` accepted for a unit `e^r`.
pub const MAX_EXP_ARGUMENT: i64 = 1024;

/// Precision at which two values with different transcendental units stop
/// being refined and fall back to a structural order.
const MAX_REFINE_BITS: u32 = 4096;

/// The irrational unit `t` of a value `a + b·t`. Every unit is positive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    /// `√d` with `d` square-free and greater than one.
    Sqrt(Integer),
    /// `e^r` with `r` non-zero and `|r|` at most [`MAX_EXP_ARGUMENT`].
    Exp(Rational),
    /// `ln c` with `c > 1` not a perfect power of a rational.
    Ln(Rational),
}

impl Unit {
    fn size(&self) -> usize {
        match self {
            Unit::Sqrt(d) => d.bit_len(),
            Unit::Exp(r) => r.log2_size() + 1,
            Unit::Ln(c) => c.log2_size(),
        }
    }

    /// Rational enclosure of the unit whose width tends to zero as `bits`
    /// grows.
    #[must_use]
    pub fn enclosure(&self, bits: u32) -> (Rational, Rational) {
        match self {
            Unit::Sqrt(d) => {
                let scale = Integer::new(2).pow(bits);
                let scaled = d * &(&scale * &scale);
                let root = scaled.isqrt().unwrap_or_else(Integer::zero);
                (
                    Rational::new(root.clone(), scale.clone()),
                    Rational::new(root + Integer::one(), scale),
                )
            }
            Unit::Exp(r) => exp_enclosure(r, bits),
            Unit::Ln(c) => ln_enclosure(c, bits),
        }
    }

    /// Nearest f64.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Unit::Sqrt(d) => d.to_f64().sqrt(),
            Unit::Exp(r) => r.to_f64().exp(),
            Unit::Ln(c) => c.to_f64().ln(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Sqrt(d) => write!(f, "sqrt({d})"),
            Unit::Exp(r) => write!(f, "exp({r})"),
            Unit::Ln(c) => write!(f, "ln({c})"),
        }
    }
}

/// An exact real number `rational + coeff·unit`.
///
/// # Invariants
///
/// - `unit` is `None` exactly when `coeff` is zero (a plain rational).
/// - the unit is in the canonical form documented on [`Unit`].
///
/// The representation is canonical, so structural equality is numeric
/// equality.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExactReal {
    rational: Rational,
    coeff: Rational,
    unit: Option<Unit>,
}

impl ExactReal {
    /// Builds `a + b·√d`, normalizing square factors out of `d`.
    ///
    /// Returns `None` when `d` is negative and `b` is non-zero.
    #[must_use]
    pub fn new(a: Rational, b: Rational, d: Integer) -> Option<Self> {
        if b.is_zero() || d.is_zero() {
            return Some(Self::from_rational(a));
        }
        if d.is_negative() {
            return None;
        }
        let (square, free) = d.split_square();
        let b = b * Rational::from_integer(square);
        if free.is_one() {
            return Some(Self::from_rational(a + b));
        }
        Some(Self {
            rational: a,
            coeff: b,
            unit: Some(Unit::Sqrt(free)),
        })
    }

    /// A rational value.
    #[must_use]
    pub fn from_rational(value: Rational) -> Self {
        Self {
            rational: value,
            coeff: Rational::zero(),
            unit: None,
        }
    }

    /// The principal square root of a non-negative rational.
    #[must_use]
    pub fn sqrt_of(value: &Rational) -> Option<Self> {
        let (coeff, radicand) = value.split_sqrt()?;
        Self::new(Rational::zero(), coeff, radicand)
    }

    /// `e^r`, or `None` when `|r|` exceeds [`MAX_EXP_ARGUMENT`].
    #[must_use]
    pub fn exp_of(r: &Rational) -> Option<Self> {
        if r.is_zero() {
            return Some(Self::from_rational(Rational::one()));
        }
        if r.abs() > Rational::from(MAX_EXP_ARGUMENT) {
            return None;
        }
        Some(Self {
            rational: Rational::zero(),
            coeff: Rational::one(),
            unit: Some(Unit::Exp(r.clone())),
        })
    }

    /// The natural logarithm of a positive rational.
    ///
    /// `ln(1/c)` becomes `-ln c` and `ln(m^k)` becomes `k·ln m`, so equal
    /// logarithms share one representation.
    #[must_use]
    pub fn ln_of(c: &Rational) -> Option<Self> {
        if !c.is_positive() {
            return None;
        }
        if c.is_one() {
            return Some(Self::zero());
        }
        let (sign, base) = if c < &Rational::one() {
            (-1, c.checked_recip()?)
        } else {
            (1, c.clone())
        };
        let (power, base) = perfect_power(&base);
        Some(Self {
            rational: Rational::zero(),
            coeff: Rational::from(sign * i64::from(power)),
            unit: Some(Unit::Ln(base)),
        })
    }

    /// The zero value.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_rational(Rational::zero())
    }

    fn assemble(rational: Rational, coeff: Rational, unit: Option<&Unit>) -> Self {
        match unit {
            Some(unit) if !coeff.is_zero() => Self {
                rational,
                coeff,
                unit: Some(unit.clone()),
            },
            _ => Self::from_rational(rational),
        }
    }

    /// Rational part `a`.
    #[must_use]
    pub fn rational_part(&self) -> &Rational {
        &self.rational
    }

    /// Coefficient `b` of the irrational unit.
    #[must_use]
    pub fn unit_coeff(&self) -> &Rational {
        &self.coeff
    }

    /// The irrational unit, `None` for rationals.
    #[must_use]
    pub fn unit(&self) -> Option<&Unit> {
        self.unit.as_ref()
    }

    /// Square-free radicand `d` when the unit is `√d`.
    #[must_use]
    pub fn radicand(&self) -> Option<&Integer> {
        match &self.unit {
            Some(Unit::Sqrt(d)) => Some(d),
            _ => None,
        }
    }

    /// Returns true if the value is rational.
    #[must_use]
    pub fn is_rational(&self) -> bool {
        self.unit.is_none()
    }

    /// Returns the value as a rational if it is one.
    #[must_use]
    pub fn as_rational(&self) -> Option<&Rational> {
        self.is_rational().then_some(&self.rational)
    }

    /// Returns true if the value is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.rational.is_zero() && self.coeff.is_zero()
    }

    /// Exact sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        let sa = self.rational.signum();
        let sb = self.coeff.signum();
        if sb == 0 {
            return sa;
        }
        if sa == 0 || sa == sb {
            return sb;
        }
        let Some(Unit::Sqrt(d)) = &self.unit else {
            // A transcendental unit never equals the rational -a/b.
            return self.refined_sign();
        };
        // Opposite signs: compare a² against b²·d.
        let a2 = self.rational.pow(2);
        let b2d = self.coeff.pow(2) * Rational::from_integer(d.clone());
        match a2.cmp(&b2d) {
            Ordering::Greater => sa,
            Ordering::Less => sb,
            Ordering::Equal => 0,
        }
    }

    fn refined_sign(&self) -> i8 {
        let mut bits = 16;
        loop {
            let (lo, hi) = self.enclosure(bits);
            if lo.is_positive() {
                return 1;
            }
            if hi.is_negative() {
                return -1;
            }
            bits *= 2;
        }
    }

    fn shared_unit<'a>(&'a self, other: &'a Self) -> Option<Option<&'a Unit>> {
        match (self.unit.as_ref(), other.unit.as_ref()) {
            (None, unit) | (unit, None) => Some(unit),
            (Some(a), Some(b)) => (a == b).then_some(Some(a)),
        }
    }

    /// Sum, if both values share their irrational unit.
    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let unit = self.shared_unit(other)?;
        Some(Self::assemble(
            &self.rational + &other.rational,
            &self.coeff + &other.coeff,
            unit,
        ))
    }

    /// Difference, if both values share their irrational unit.
    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.checked_add(&other.neg())
    }

    /// Product by a rational.
    #[must_use]
    pub fn scale(&self, factor: &Rational) -> Self {
        Self::assemble(&self.rational * factor, &self.coeff * factor, self.unit.as_ref())
    }

    /// Product, if it can be written over a single unit.
    ///
    /// Besides products inside one field ℚ(√d), this covers `√d·√e` and
    /// `e^r·e^s` without rational parts.
    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        if let Some(r) = self.as_rational() {
            return Some(other.scale(r));
        }
        if let Some(r) = other.as_rational() {
            return Some(self.scale(r));
        }
        let pure = self.rational.is_zero() && other.rational.is_zero();
        let coeff = &self.coeff * &other.coeff;
        match (self.unit.as_ref()?, other.unit.as_ref()?) {
            (Unit::Sqrt(d), Unit::Sqrt(e)) if d == e => {
                let dq = Rational::from_integer(d.clone());
                // (a + b√d)(c + e√d) = (ac + be·d) + (ae + bc)√d
                let a = &self.rational * &other.rational + coeff * dq;
                let b = &self.rational * &other.coeff + &self.coeff * &other.rational;
                Self::new(a, b, d.clone())
            }
            (Unit::Sqrt(d), Unit::Sqrt(e)) if pure => Self::new(Rational::zero(), coeff, d * e),
            (Unit::Exp(r), Unit::Exp(s)) if pure => Some(Self::exp_of(&(r + s))?.scale(&coeff)),
            _ => None,
        }
    }

    /// Reciprocal, or `None` for zero and for values whose reciprocal
    /// leaves the single-unit form.
    #[must_use]
    pub fn checked_recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        match &self.unit {
            None => self.rational.checked_recip().map(Self::from_rational),
            Some(Unit::Sqrt(d)) => {
                // 1/(a + b√d) = (a - b√d) / (a² - b²d)
                let dq = Rational::from_integer(d.clone());
                let norm = self.rational.pow(2) - self.coeff.pow(2) * dq;
                let inv = norm.checked_recip()?;
                Self::new(&self.rational * &inv, -(&self.coeff * &inv), d.clone())
            }
            Some(Unit::Exp(r)) if self.rational.is_zero() => {
                let inv = self.coeff.checked_recip()?;
                Some(Self::exp_of(&-r)?.scale(&inv))
            }
            Some(_) => None,
        }
    }

    /// Quotient, if `other` is non-zero and the result has a single unit.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        self.checked_mul(&other.checked_recip()?)
    }

    /// Integer power; `None` for a negative power of zero, for a result
    /// larger than [`MAX_POWER_BITS`], or outside the single-unit form.
    #[must_use]
    pub fn checked_powi(&self, exp: i32) -> Option<Self> {
        let Some(unit) = &self.unit else {
            return self.rational.powi(exp).map(Self::from_rational);
        };
        let size = self.rational.log2_size() + self.coeff.log2_size() + unit.size();
        if size.saturating_mul(exp.unsigned_abs() as usize) > MAX_POWER_BITS {
            return None;
        }
        let mut base = if exp < 0 {
            self.checked_recip()?
        } else {
            self.clone()
        };
        let mut result = Self::from_rational(Rational::one());
        let mut n = exp.unsigned_abs();
        while n > 0 {
            if n & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            n >>= 1;
            if n > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        Some(result)
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            rational: -&self.rational,
            coeff: -&self.coeff,
            unit: self.unit.clone(),
        }
    }

    /// Exact midpoint, when the two values share their unit.
    #[must_use]
    pub fn checked_midpoint(&self, other: &Self) -> Option<Self> {
        Some(self.checked_add(other)?.scale(&Rational::from_i64(1, 2)))
    }

    /// Rational enclosure `lo <= self <= hi` whose width tends to zero as
    /// `bits` grows.
    #[must_use]
    pub fn enclosure(&self, bits: u32) -> (Rational, Rational) {
        let Some(unit) = &self.unit else {
            return (self.rational.clone(), self.rational.clone());
        };
        let (lo_unit, hi_unit) = unit.enclosure(bits);
        let (lo, hi) = if self.coeff.is_negative() {
            (&self.coeff * &hi_unit, &self.coeff * &lo_unit)
        } else {
            (&self.coeff * &lo_unit, &self.coeff * &hi_unit)
        };
        (&self.rational + &lo, &self.rational + &hi)
    }

    /// A rational strictly between `self` and `other`.
    ///
    /// Returns `None` when the two values are equal.
    #[must_use]
    pub fn rational_between(&self, other: &Self) -> Option<Rational> {
        let (low, high) = match self.cmp(other) {
            Ordering::Less => (self, other),
            Ordering::Greater => (other, self),
            Ordering::Equal => return None,
        };
        let mut bits = 8;
        loop {
            let (_, low_hi) = low.enclosure(bits);
            let (high_lo, _) = high.enclosure(bits);
            if low_hi < high_lo {
                return Some(low_hi.midpoint(&high_lo));
            }
            bits *= 2;
        }
    }

    /// Nearest f64.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match &self.unit {
            None => self.rational.to_f64(),
            Some(unit) => self.rational.to_f64() + self.coeff.to_f64() * unit.to_f64(),
        }
    }

    /// Order of two values under different square roots: the sign of
    /// `(a - c + b√d) - e√f`.
    fn cmp_radicals(&self, other: &Self, f: &Integer) -> Ordering {
        let x = Self {
            rational: &self.rational - &other.rational,
            coeff: self.coeff.clone(),
            unit: self.unit.clone(),
        };
        let sx = x.signum();
        let sy = -other.coeff.signum();
        if sx == sy || sy == 0 {
            return sx.cmp(&0);
        }
        if sx == 0 {
            return sy.cmp(&0);
        }
        // Opposite signs: the larger square wins.
        let x2 = x.checked_mul(&x).unwrap_or_else(Self::zero);
        let y2 = Self::from_rational(other.coeff.pow(2) * Rational::from_integer(f.clone()));
        let dominant = match x2.checked_sub(&y2).map(|d| d.signum()) {
            Some(s) if s > 0 => sx,
            Some(s) if s < 0 => sy,
            _ => 0,
        };
        dominant.cmp(&0)
    }

    fn cmp_refined(&self, other: &Self) -> Ordering {
        let mut bits = 16;
        while bits <= MAX_REFINE_BITS {
            let (lo, hi) = self.enclosure(bits);
            let (other_lo, other_hi) = other.enclosure(bits);
            if hi < other_lo {
                return Ordering::Less;
            }
            if other_hi < lo {
                return Ordering::Greater;
            }
            bits *= 2;
        }
        self.to_string().cmp(&other.to_string())
    }
}

impl Ord for ExactReal {
    fn cmp(&self, other: &Self) -> Ordering {
        if let Some(diff) = self.checked_sub(other) {
            return diff.signum().cmp(&0);
        }
        match (&self.unit, &other.unit) {
            (Some(Unit::Sqrt(_)), Some(Unit::Sqrt(f))) => self.cmp_radicals(other, f),
            _ => self.cmp_refined(other),
        }
    }
}

impl PartialOrd for ExactReal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Rational> for ExactReal {
    fn from(value: Rational) -> Self {
        Self::from_rational(value)
    }
}

impl From<i64> for ExactReal {
    fn from(value: i64) -> Self {
        Self::from_rational(Rational::from(value))
    }
}

impl fmt::Debug for ExactReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Real({self})")
    }
}

impl fmt::Display for ExactReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(unit) = &self.unit else {
            return write!(f, "{}", self.rational);
        };
        let negative = self.coeff.is_negative();
        let magnitude = self.coeff.abs();
        let num = magnitude.numerator();
        let den = magnitude.denominator();
        let mut term = if num.is_one() {
            unit.to_string()
        } else {
            format!("{num}*{unit}")
        };
        if !den.is_one() {
            term = format!("{term}/{den}");
        }
        match (self.rational.is_zero(), negative) {
            (true, false) => write!(f, "{term}"),
            (true, true) => write!(f, "-{term}"),
            (false, false) => write!(f, "{} + {term}", self.rational),
            (false, true) => write!(f, "{} - {term}", self.rational),
        }
    }
}

impl Serialize for ExactReal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Writes `c > 1` as `m^k` with `k` maximal.
fn perfect_power(c: &Rational) -> (u32, Rational) {
    let bits = u32::try_from(c.numerator().bit_len()).unwrap_or(u32::MAX);
    for k in (2..=bits).rev() {
        if let Some(root) = c.exact_root(k) {
            return (k, root);
        }
    }
    (1, c.clone())
}

fn dyadic(bits: u32) -> Integer {
    Integer::new(2).pow(bits)
}

fn round_down(q: &Rational, bits: u32) -> Rational {
    let scale = dyadic(bits);
    Rational::new((q * &Rational::from_integer(scale.clone())).floor(), scale)
}

fn round_up(q: &Rational, bits: u32) -> Rational {
    let scale = dyadic(bits);
    Rational::new((q * &Rational::from_integer(scale.clone())).ceil(), scale)
}

/// Sums a series of positive terms until the next term drops below
/// `2^-bits`. Returns the partial sum and the first omitted term.
fn positive_series(first: Rational, bits: u32, next: impl Fn(&Rational, u32) -> Rational) -> (Rational, Rational) {
    let eps = Rational::new(Integer::one(), dyadic(bits));
    let mut sum = Rational::zero();
    let mut term = first;
    let mut i = 1;
    while term >= eps {
        sum = sum + &term;
        term = next(&term, i);
        i += 1;
    }
    (sum, term)
}

fn exp_enclosure(r: &Rational, bits: u32) -> (Rational, Rational) {
    if r.is_negative() {
        // e^-r >= 1, so both reciprocals exist.
        let (lo, hi) = exp_enclosure(&-r, bits);
        let one = Rational::one();
        return (&one / &hi, &one / &lo);
    }
    // e^r = (e^x)^(2^k) with x = r/2^k at most one half.
    let k = u32::try_from(r.ceil().bit_len()).unwrap_or(u32::MAX) + 1;
    let precision = bits + 2 * k + 8;
    let x = r * &Rational::new(Integer::one(), dyadic(k));
    let (sum, next) = positive_series(Rational::one(), precision + 2, |term, i| {
        term * &x * Rational::new(Integer::one(), Integer::from(i64::from(i)))
    });
    // For x <= 1/2 the tail is at most twice its first term.
    let mut lo = round_down(&sum, precision);
    let mut hi = round_up(&(sum + next * Rational::from(2)), precision);
    for _ in 0..k {
        lo = round_down(&(&lo * &lo), precision);
        hi = round_up(&(&hi * &hi), precision);
    }
    (lo, hi)
}

/// `2·atanh(z)` for `0 <= z <= 1/3`, which is `ln((1+z)/(1-z))`.
fn atanh_enclosure(z: &Rational, bits: u32) -> (Rational, Rational) {
    if z.is_zero() {
        return (Rational::zero(), Rational::zero());
    }
    let z2 = z * z;
    let (sum, next) = positive_series(z.clone(), bits + 2, |term, i| {
        // z^(2i+1)/(2i+1) from z^(2i-1)/(2i-1)
        let i = i64::from(i);
        term * &z2 * Rational::from_i64(2 * i - 1, 2 * i + 1)
    });
    // With z² <= 1/9 the tail is at most 9/8 of its first term.
    let two = Rational::from(2);
    let lo = round_down(&(&sum * &two), bits);
    let hi = round_up(&((sum + next * Rational::from_i64(9, 8)) * two), bits);
    (lo, hi)
}

fn ln_enclosure(c: &Rational, bits: u32) -> (Rational, Rational) {
    // c = 2^m·c' with 1 <= c' < 2
    let mut m = c.numerator().bit_len() as i64 - c.denominator().bit_len() as i64;
    let scale = |m: i64| {
        let power = Rational::from_integer(dyadic(u32::try_from(m.unsigned_abs()).unwrap_or(u32::MAX)));
        if m >= 0 {
            c / &power
        } else {
            c * &power
        }
    };
    let mut reduced = scale(m);
    if reduced < Rational::one() {
        m -= 1;
        reduced = scale(m);
    }
    let m_bits = u32::try_from(Integer::new(m).bit_len()).unwrap_or(u32::MAX);
    let precision = bits + m_bits + 4;
    let one = Rational::one();
    let z = (&reduced - &one) / (&reduced + &one);
    let (lo, hi) = atanh_enclosure(&z, precision);
    if m == 0 {
        return (lo, hi);
    }
    let (lo2, hi2) = atanh_enclosure(&Rational::from_i64(1, 3), precision);
    let m = Rational::from(m);
    (&m * &lo2 + lo, &m * &hi2 + hi)
}
