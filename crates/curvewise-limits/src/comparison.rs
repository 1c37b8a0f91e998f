//! Asymptotic comparison classes for limit computation.
//!
//! When a sum or product is indeterminate at +∞, the limit is decided by
//! which part grows fastest. This module provides the growth-rate scale
//! and the comparison operations on it.

use std::cmp::Ordering;

use curvewise_integers::Rational;
use num_traits::Zero;

/// Relative tolerance when comparing the coefficients inside `exp(·)`.
const EXP_TOLERANCE: f64 = 1e-12;

/// Asymptotic comparison result between two expressions as x → ∞.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonClass {
    /// f(x) / g(x) → 0 (f grows slower than g)
    LessThan,
    /// f(x) / g(x) → c ≠ 0, ∞ (f and g grow at the same rate)
    Comparable,
    /// f(x) / g(x) → ∞ (f grows faster than g)
    GreaterThan,
    /// Cannot determine the comparison
    Unknown,
}

impl ComparisonClass {
    /// Returns true if self represents "less than" (slower growth).
    #[must_use]
    pub fn is_less(self) -> bool {
        matches!(self, ComparisonClass::LessThan)
    }

    /// Returns true if self represents "greater than" (faster growth).
    #[must_use]
    pub fn is_greater(self) -> bool {
        matches!(self, ComparisonClass::GreaterThan)
    }

    /// Returns true if the expressions are comparable (same growth rate).
    #[must_use]
    pub fn is_comparable(self) -> bool {
        matches!(self, ComparisonClass::Comparable)
    }

    /// Reverses the comparison (swaps the two expressions).
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            ComparisonClass::LessThan => ComparisonClass::GreaterThan,
            ComparisonClass::GreaterThan => ComparisonClass::LessThan,
            other => other,
        }
    }
}

impl From<Ordering> for ComparisonClass {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => ComparisonClass::LessThan,
            Ordering::Equal => ComparisonClass::Comparable,
            Ordering::Greater => ComparisonClass::GreaterThan,
        }
    }
}

impl From<ComparisonClass> for Option<Ordering> {
    fn from(class: ComparisonClass) -> Self {
        match class {
            ComparisonClass::LessThan => Some(Ordering::Less),
            ComparisonClass::Comparable => Some(Ordering::Equal),
            ComparisonClass::GreaterThan => Some(Ordering::Greater),
            ComparisonClass::Unknown => None,
        }
    }
}

/// Growth rate of |f(x)| as x → +∞.
#[derive(Clone, Debug, PartialEq)]
pub enum GrowthRate {
    /// `x^power · (ln x)^log_power · exp(exp_coeff · x^exp_power)`.
    ///
    /// Invariant: `exp_coeff` is zero exactly when `exp_power` is zero.
    /// Negative powers and coefficients describe decay.
    Scale {
        /// Exponent of x.
        power: Rational,
        /// Exponent of ln x.
        log_power: Rational,
        /// Coefficient inside the exponential.
        exp_coeff: f64,
        /// Exponent of x inside the exponential.
        exp_power: Rational,
    },
    /// Faster than any `exp(c·x^p)`, such as `exp(exp(x))`.
    SuperExponential,
    /// Unknown growth rate
    Unknown,
}

impl GrowthRate {
    /// Bounded and bounded away from zero.
    #[must_use]
    pub fn constant() -> Self {
        Self::poly(Rational::zero())
    }

    /// `x^power`.
    #[must_use]
    pub fn poly(power: Rational) -> Self {
        GrowthRate::Scale {
            power,
            log_power: Rational::zero(),
            exp_coeff: 0.0,
            exp_power: Rational::zero(),
        }
    }

    /// `(ln x)^power`.
    #[must_use]
    pub fn log(power: Rational) -> Self {
        GrowthRate::Scale {
            power: Rational::zero(),
            log_power: power,
            exp_coeff: 0.0,
            exp_power: Rational::zero(),
        }
    }

    /// `exp(coeff · x^power)`.
    #[must_use]
    pub fn exp(coeff: f64, power: Rational) -> Self {
        if coeff == 0.0 || power.is_zero() {
            return Self::constant();
        }
        GrowthRate::Scale {
            power: Rational::zero(),
            log_power: Rational::zero(),
            exp_coeff: coeff,
            exp_power: power,
        }
    }

    /// Returns true for the constant rate.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.compare(&Self::constant()).is_comparable()
    }

    /// Returns true if the rate has an exponential factor that grows.
    #[must_use]
    pub fn is_exponential_growth(&self) -> bool {
        match self {
            GrowthRate::Scale { exp_coeff, .. } => *exp_coeff > 0.0,
            GrowthRate::SuperExponential => true,
            GrowthRate::Unknown => false,
        }
    }

    /// Compares two growth rates.
    #[must_use]
    pub fn compare(&self, other: &Self) -> ComparisonClass {
        match (self, other) {
            (GrowthRate::Unknown, _) | (_, GrowthRate::Unknown) => ComparisonClass::Unknown,
            (GrowthRate::SuperExponential, GrowthRate::SuperExponential) => ComparisonClass::Unknown,
            (GrowthRate::SuperExponential, _) => ComparisonClass::GreaterThan,
            (_, GrowthRate::SuperExponential) => ComparisonClass::LessThan,
            (
                GrowthRate::Scale {
                    power: p1,
                    log_power: l1,
                    exp_coeff: c1,
                    exp_power: e1,
                },
                GrowthRate::Scale {
                    power: p2,
                    log_power: l2,
                    exp_coeff: c2,
                    exp_power: e2,
                },
            ) => {
                // The exponential factors dominate, then powers of x, then logs.
                match compare_exponents(*c1, e1, *c2, e2) {
                    Ordering::Equal => p1.cmp(p2).then_with(|| l1.cmp(l2)).into(),
                    ord => ord.into(),
                }
            }
        }
    }

    /// Rate of a product.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        match (self, other) {
            (GrowthRate::Unknown, _) | (_, GrowthRate::Unknown) => GrowthRate::Unknown,
            (GrowthRate::SuperExponential, GrowthRate::SuperExponential) => {
                GrowthRate::SuperExponential
            }
            (GrowthRate::SuperExponential, s) | (s, GrowthRate::SuperExponential) => {
                if s.compare(&Self::constant()).is_less() && !s.is_algebraic() {
                    GrowthRate::Unknown
                } else {
                    GrowthRate::SuperExponential
                }
            }
            (
                GrowthRate::Scale {
                    power: p1,
                    log_power: l1,
                    exp_coeff: c1,
                    exp_power: e1,
                },
                GrowthRate::Scale {
                    power: p2,
                    log_power: l2,
                    exp_coeff: c2,
                    exp_power: e2,
                },
            ) => {
                let (exp_coeff, exp_power) = if *c1 == 0.0 {
                    (*c2, e2.clone())
                } else if *c2 == 0.0 {
                    (*c1, e1.clone())
                } else if e1 == e2 {
                    let sum = c1 + c2;
                    if sum.abs() <= EXP_TOLERANCE * c1.abs().max(c2.abs()) {
                        (0.0, Rational::zero())
                    } else {
                        (sum, e1.clone())
                    }
                } else {
                    return GrowthRate::Unknown;
                };
                GrowthRate::Scale {
                    power: p1 + p2,
                    log_power: l1 + l2,
                    exp_coeff,
                    exp_power,
                }
            }
        }
    }

    /// Rate of the reciprocal.
    #[must_use]
    pub fn recip(&self) -> Self {
        self.powr(&Rational::from(-1))
    }

    /// Rate of `f^q`.
    #[must_use]
    pub fn powr(&self, q: &Rational) -> Self {
        if q.is_zero() {
            return Self::constant();
        }
        match self {
            GrowthRate::Scale {
                power,
                log_power,
                exp_coeff,
                exp_power,
            } => GrowthRate::Scale {
                power: power * q,
                log_power: log_power * q,
                exp_coeff: exp_coeff * q.to_f64(),
                exp_power: exp_power.clone(),
            },
            GrowthRate::SuperExponential if q.is_positive() => GrowthRate::SuperExponential,
            _ => GrowthRate::Unknown,
        }
    }

    fn is_algebraic(&self) -> bool {
        matches!(self, GrowthRate::Scale { exp_coeff, .. } if *exp_coeff == 0.0)
    }
}

/// Sign of `c1·x^e1 − c2·x^e2` as x → +∞.
fn compare_exponents(c1: f64, e1: &Rational, c2: f64, e2: &Rational) -> Ordering {
    match e1.cmp(e2) {
        Ordering::Greater => c1.partial_cmp(&0.0).unwrap_or(Ordering::Equal),
        Ordering::Less => 0.0_f64.partial_cmp(&c2).unwrap_or(Ordering::Equal),
        Ordering::Equal => {
            let diff = c1 - c2;
            if diff.abs() <= EXP_TOLERANCE * c1.abs().max(c2.abs()) {
                Ordering::Equal
            } else {
                diff.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::from_i64(n, d)
    }

    #[test]
    fn test_comparison_class() {
        assert!(ComparisonClass::LessThan.is_less());
        assert!(ComparisonClass::GreaterThan.is_greater());
        assert!(ComparisonClass::Comparable.is_comparable());

        assert_eq!(
            ComparisonClass::LessThan.reverse(),
            ComparisonClass::GreaterThan
        );
    }

    #[test]
    fn test_growth_rate_ordering() {
        // Constant < Polynomial
        assert_eq!(
            GrowthRate::constant().compare(&GrowthRate::poly(q(1, 1))),
            ComparisonClass::LessThan
        );

        // x^(1/2) < x
        assert_eq!(
            GrowthRate::poly(q(1, 2)).compare(&GrowthRate::poly(q(1, 1))),
            ComparisonClass::LessThan
        );

        // Polynomial < Exponential
        assert_eq!(
            GrowthRate::poly(q(100, 1)).compare(&GrowthRate::exp(1.0, q(1, 1))),
            ComparisonClass::LessThan
        );

        // exp(x) < exp(2x) < exp(x^2)
        assert!(GrowthRate::exp(1.0, q(1, 1))
            .compare(&GrowthRate::exp(2.0, q(1, 1)))
            .is_less());
        assert!(GrowthRate::exp(2.0, q(1, 1))
            .compare(&GrowthRate::exp(1.0, q(2, 1)))
            .is_less());

        // Exponential < SuperExponential
        assert!(GrowthRate::exp(1.0, q(1, 1))
            .compare(&GrowthRate::SuperExponential)
            .is_less());
    }

    #[test]
    fn test_decay() {
        // exp(-x) < x^-100 < 1
        let decay = GrowthRate::exp(-1.0, q(1, 1));
        assert!(decay.compare(&GrowthRate::poly(q(-100, 1))).is_less());
        assert!(GrowthRate::poly(q(-1, 1)).compare(&GrowthRate::constant()).is_less());
    }

    #[test]
    fn test_logarithmic() {
        // ln x < x^(1/100)
        assert!(GrowthRate::log(q(1, 1))
            .compare(&GrowthRate::poly(q(1, 100)))
            .is_less());

        // ln(x) < ln(x)^2
        assert!(GrowthRate::log(q(1, 1))
            .compare(&GrowthRate::log(q(2, 1)))
            .is_less());
    }

    #[test]
    fn test_products() {
        // x · exp(-x) decays
        let r = GrowthRate::poly(q(1, 1)).mul(&GrowthRate::exp(-1.0, q(1, 1)));
        assert!(r.compare(&GrowthRate::constant()).is_less());

        // exp(x) · exp(-x) is constant
        let r = GrowthRate::exp(1.0, q(1, 1)).mul(&GrowthRate::exp(-1.0, q(1, 1)));
        assert!(r.is_constant());

        // sqrt(x^2) is x
        assert_eq!(GrowthRate::poly(q(2, 1)).powr(&q(1, 2)), GrowthRate::poly(q(1, 1)));
        assert_eq!(GrowthRate::poly(q(3, 1)).recip(), GrowthRate::poly(q(-3, 1)));
        assert_eq!(
            GrowthRate::exp(1.0, q(1, 1)).mul(&GrowthRate::exp(1.0, q(2, 1))),
            GrowthRate::Unknown
        );
    }
}
