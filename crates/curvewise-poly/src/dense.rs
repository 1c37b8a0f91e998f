//! Dense univariate polynomials over ℚ.

use curvewise_integers::{ExactReal, Integer, Rational};
use num_traits::{One, Zero};

/// A dense univariate polynomial with rational coefficients.
///
/// Coefficients are stored in ascending degree order; trailing zeros are
/// stripped so the last coefficient is the leading one (the zero polynomial
/// is `[0]`).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DensePoly {
    coeffs: Vec<Rational>,
}

impl DensePoly {
    /// Creates a new polynomial from coefficients.
    #[must_use]
    pub fn new(mut coeffs: Vec<Rational>) -> Self {
        while coeffs.len() > 1 && coeffs.last().is_some_and(Zero::is_zero) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(Rational::zero());
        }
        Self { coeffs }
    }

    /// Creates a polynomial from integer coefficients (ascending degree).
    #[must_use]
    pub fn from_i64s(coeffs: &[i64]) -> Self {
        Self::new(coeffs.iter().map(|&c| Rational::from(c)).collect())
    }

    /// The zero polynomial.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            coeffs: vec![Rational::zero()],
        }
    }

    /// The constant polynomial 1.
    #[must_use]
    pub fn one() -> Self {
        Self::constant(Rational::one())
    }

    /// A constant polynomial.
    #[must_use]
    pub fn constant(c: Rational) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial x.
    #[must_use]
    pub fn x() -> Self {
        Self::new(vec![Rational::zero(), Rational::one()])
    }

    /// The monomial c·x^n.
    #[must_use]
    pub fn monomial(c: Rational, n: usize) -> Self {
        let mut coeffs = vec![Rational::zero(); n + 1];
        coeffs[n] = c;
        Self::new(coeffs)
    }

    /// Degree of the polynomial (zero for constants, including 0).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Returns true for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    /// Returns true for constant polynomials.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() == 1
    }

    /// Leading coefficient (zero only for the zero polynomial).
    #[must_use]
    pub fn leading_coeff(&self) -> &Rational {
        &self.coeffs[self.coeffs.len() - 1]
    }

    /// Coefficient of x^i.
    #[must_use]
    pub fn coeff(&self, i: usize) -> Rational {
        self.coeffs.get(i).cloned().unwrap_or_else(Rational::zero)
    }

    /// All coefficients, ascending.
    #[must_use]
    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// Evaluates at a rational point (Horner).
    #[must_use]
    pub fn eval(&self, x: &Rational) -> Rational {
        self.coeffs
            .iter()
            .rev()
            .fold(Rational::zero(), |acc, c| acc * x + c)
    }

    /// Evaluates exactly at an exact real (Horner).
    ///
    /// Rational coefficients keep every intermediate value inside ℚ(√d)
    /// for a square-root point. At a transcendental point only constant
    /// and linear polynomials stay in single-unit form; higher degrees
    /// give `None`.
    #[must_use]
    pub fn eval_real(&self, x: &ExactReal) -> Option<ExactReal> {
        let mut acc = ExactReal::zero();
        for c in self.coeffs.iter().rev() {
            let c = ExactReal::from_rational(c.clone());
            acc = acc.checked_mul(x)?.checked_add(&c)?;
        }
        Some(acc)
    }

    /// Sum of two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::new((0..len).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::new(self.coeffs.iter().map(|c| -c).collect())
    }

    /// Difference.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Product (schoolbook; analysis polynomials stay small).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut result = vec![Rational::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                result[i + j] = &result[i + j] + &(a * b);
            }
        }
        Self::new(result)
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|x| x * c).collect())
    }

    /// Formal derivative.
    #[must_use]
    pub fn derivative(&self) -> Self {
        if self.degree() == 0 {
            return Self::zero();
        }
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * &Rational::from(i as i64))
                .collect(),
        )
    }

    /// Raises to a non-negative power.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.mul(&base);
            exp >>= 1;
        }
        result
    }

    /// The polynomial p(-x).
    #[must_use]
    pub fn reflect(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| if i % 2 == 1 { -c } else { c.clone() })
                .collect(),
        )
    }

    /// If p(x) = h(x²), returns h.
    #[must_use]
    pub fn even_part(&self) -> Option<Self> {
        if self.coeffs.iter().skip(1).step_by(2).any(|c| !c.is_zero()) {
            return None;
        }
        Some(Self::new(self.coeffs.iter().step_by(2).cloned().collect()))
    }

    /// Multiplicity of an exact root (zero if not a root).
    ///
    /// A non-zero rational polynomial never vanishes at a transcendental
    /// point, so an evaluation that leaves single-unit form counts as
    /// non-zero.
    #[must_use]
    pub fn root_multiplicity(&self, root: &ExactReal) -> u32 {
        if self.is_zero() {
            return u32::MAX;
        }
        let mut count = 0;
        let mut p = self.clone();
        while !p.is_zero() && p.eval_real(root).is_some_and(|v| v.is_zero()) {
            count += 1;
            p = p.derivative();
        }
        count
    }

    /// Scales to integer coefficients with unit content.
    ///
    /// The sign of the leading coefficient is preserved.
    #[must_use]
    pub fn to_primitive_integers(&self) -> Vec<Integer> {
        let lcm = self
            .coeffs
            .iter()
            .fold(Integer::one(), |acc, c| acc.lcm(&c.denominator()));
        let scaled: Vec<Integer> = self
            .coeffs
            .iter()
            .map(|c| {
                let v = c * &Rational::from_integer(lcm.clone());
                v.numerator()
            })
            .collect();
        let content = scaled
            .iter()
            .fold(Integer::zero(), |acc, c| acc.gcd(c));
        if content.is_zero() || content.is_one() {
            return scaled;
        }
        scaled.into_iter().map(|c| c / content.clone()).collect()
    }

    /// Sign of p(x) as x → +∞ (zero for the zero polynomial).
    #[must_use]
    pub fn sign_at_pos_infinity(&self) -> i8 {
        self.leading_coeff().signum()
    }

    /// Sign of p(x) as x → -∞.
    #[must_use]
    pub fn sign_at_neg_infinity(&self) -> i8 {
        let s = self.leading_coeff().signum();
        if self.degree() % 2 == 1 {
            -s
        } else {
            s
        }
    }
}

impl std::fmt::Display for DensePoly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            let magnitude = c.abs();
            let sign = if c.is_negative() { "-" } else { "+" };
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            first = false;
            let show_coeff = i == 0 || !magnitude.is_one();
            match (i, show_coeff) {
                (0, _) => write!(f, "{magnitude}")?,
                (1, true) => write!(f, "{magnitude}*x")?,
                (1, false) => write!(f, "x")?,
                (_, true) => write!(f, "{magnitude}*x^{i}")?,
                (_, false) => write!(f, "x^{i}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let p = DensePoly::from_i64s(&[1, 2]); // 1 + 2x
        let q = DensePoly::from_i64s(&[3, 4]); // 3 + 4x

        assert_eq!(p.add(&q), DensePoly::from_i64s(&[4, 6]));
        // (1 + 2x)(3 + 4x) = 3 + 10x + 8x^2
        assert_eq!(p.mul(&q), DensePoly::from_i64s(&[3, 10, 8]));
        assert_eq!(p.sub(&p), DensePoly::zero());
    }

    #[test]
    fn test_eval_and_derivative() {
        let p = DensePoly::from_i64s(&[1, 2, 3]);
        assert_eq!(p.eval(&Rational::from(2)), Rational::from(17));
        assert_eq!(p.derivative(), DensePoly::from_i64s(&[2, 6]));
    }

    #[test]
    fn test_eval_real() {
        // x^2 - 2 vanishes at sqrt(2)
        let p = DensePoly::from_i64s(&[-2, 0, 1]);
        let r2 = ExactReal::sqrt_of(&Rational::from(2)).unwrap();
        assert!(p.eval_real(&r2).unwrap().is_zero());
        assert_eq!(p.root_multiplicity(&r2), 1);
    }

    #[test]
    fn test_root_multiplicity() {
        // (x - 1)^3
        let p = DensePoly::from_i64s(&[-1, 1]).pow(3);
        assert_eq!(p.root_multiplicity(&ExactReal::from(1)), 3);
        assert_eq!(p.root_multiplicity(&ExactReal::from(2)), 0);
        // x^2 - 1 at e^-1 leaves single-unit form and is not a root
        let q = DensePoly::from_i64s(&[-1, 0, 1]);
        let e = ExactReal::exp_of(&Rational::from(-1)).unwrap();
        assert_eq!(q.eval_real(&e), None);
        assert_eq!(q.root_multiplicity(&e), 0);
        assert_eq!(DensePoly::from_i64s(&[1, 1]).root_multiplicity(&e), 0);
    }

    #[test]
    fn test_reflect_and_even_part() {
        let p = DensePoly::from_i64s(&[6, 0, -5, 0, 1]);
        assert_eq!(p.even_part(), Some(DensePoly::from_i64s(&[6, -5, 1])));
        assert_eq!(DensePoly::from_i64s(&[1, 1]).even_part(), None);
        assert_eq!(DensePoly::from_i64s(&[1, 2, 3]).reflect(), DensePoly::from_i64s(&[1, -2, 3]));
    }

    #[test]
    fn test_primitive_integers() {
        // x^2/2 - 1/3 → 3x^2 - 2
        let p = DensePoly::new(vec![Rational::from_i64(-1, 3), Rational::zero(), Rational::from_i64(1, 2)]);
        let ints: Vec<i64> = p.to_primitive_integers().iter().filter_map(Integer::to_i64).collect();
        assert_eq!(ints, vec![-2, 0, 3]);
    }

    #[test]
    fn test_display() {
        assert_eq!(DensePoly::from_i64s(&[-1, 0, 1]).to_string(), "x^2 - 1");
        assert_eq!(DensePoly::from_i64s(&[0, -2]).to_string(), "-2*x");
        assert_eq!(DensePoly::zero().to_string(), "0");
    }
}
