//! Substitution and evaluation.
//!
//! Exact evaluation works over a single irrational unit: it succeeds
//! whenever every intermediate value is an [`ExactReal`], which covers
//! rational functions at square-root points, square roots of rationals,
//! and `exp`/`ln` of rationals. Anything else (π, sin 1, a cube root of 2,
//! or a point outside the domain) yields `None`, and callers fall back to
//! [`Expr::eval_f64`].

use curvewise_integers::{ExactReal, Rational, Unit};
use num_traits::Zero;

use crate::expr::{Expr, ExprNode, Function};

impl Expr {
    /// Replaces the variable with `value`.
    #[must_use]
    pub fn substitute(&self, value: &Expr) -> Expr {
        if !self.contains_var() {
            return self.clone();
        }
        match self.node() {
            ExprNode::Var(_) => value.clone(),
            ExprNode::Number(_) | ExprNode::Constant(_) => self.clone(),
            ExprNode::Add(args) => Expr::add(args.iter().map(|a| a.substitute(value))),
            ExprNode::Mul(args) => Expr::mul(args.iter().map(|a| a.substitute(value))),
            ExprNode::Pow { base, exp } => Expr::pow(base.substitute(value), exp.substitute(value)),
            ExprNode::Function { func, arg } => Expr::func(*func, arg.substitute(value)),
        }
    }

    /// Exact value with the variable set to `at`.
    #[must_use]
    pub fn eval_exact(&self, at: &ExactReal) -> Option<ExactReal> {
        match self.node() {
            ExprNode::Number(n) => Some(ExactReal::from_rational(n.clone())),
            ExprNode::Var(_) => Some(at.clone()),
            ExprNode::Constant(_) => None,
            ExprNode::Add(args) => args.iter().try_fold(ExactReal::zero(), |acc, a| {
                acc.checked_add(&a.eval_exact(at)?)
            }),
            ExprNode::Mul(args) => args
                .iter()
                .try_fold(ExactReal::from(1), |acc, a| acc.checked_mul(&a.eval_exact(at)?)),
            ExprNode::Pow { base, exp } => {
                let e = exp.eval_exact(at)?;
                exact_pow(&base.eval_exact(at)?, e.as_rational()?)
            }
            ExprNode::Function { func, arg } => exact_function(*func, &arg.eval_exact(at)?),
        }
    }

    /// Exact value of a variable-free expression.
    #[must_use]
    pub fn exact_value(&self) -> Option<ExactReal> {
        if self.contains_var() {
            return None;
        }
        self.eval_exact(&ExactReal::zero())
    }

    /// Floating-point value with the variable set to `at`.
    ///
    /// Returns `None` where the expression is undefined or not finite.
    #[must_use]
    pub fn eval_f64(&self, at: f64) -> Option<f64> {
        let v = match self.node() {
            ExprNode::Number(n) => n.to_f64(),
            ExprNode::Var(_) => at,
            ExprNode::Constant(c) => c.to_f64(),
            ExprNode::Add(args) => args
                .iter()
                .try_fold(0.0, |acc, a| Some(acc + a.eval_f64(at)?))?,
            ExprNode::Mul(args) => args
                .iter()
                .try_fold(1.0, |acc, a| Some(acc * a.eval_f64(at)?))?,
            ExprNode::Pow { base, exp } => {
                let b = base.eval_f64(at)?;
                match exp.as_number() {
                    Some(e) => real_pow(b, e),
                    None => b.powf(exp.eval_f64(at)?),
                }
            }
            ExprNode::Function { func, arg } => {
                let u = arg.eval_f64(at)?;
                match func {
                    Function::Sin => u.sin(),
                    Function::Cos => u.cos(),
                    Function::Tan => u.tan(),
                    Function::Exp => u.exp(),
                    Function::Ln if u > 0.0 => u.ln(),
                    Function::Ln => return None,
                    Function::Abs => u.abs(),
                    Function::Atan => u.atan(),
                }
            }
        };
        v.is_finite().then_some(v)
    }

    /// Floating-point value of a variable-free expression.
    #[must_use]
    pub fn approx(&self) -> Option<f64> {
        self.eval_f64(0.0)
    }
}

/// `b^e` as an exact real, for rational `e`.
fn exact_pow(b: &ExactReal, e: &Rational) -> Option<ExactReal> {
    if let Some(k) = e.to_i64() {
        return b.checked_powi(i32::try_from(k).ok()?);
    }
    let r = b.as_rational()?;
    let p = i32::try_from(e.numerator().to_i64()?).ok()?;
    let q = u32::try_from(e.denominator().to_i64()?).ok()?;
    if let Some(root) = r.exact_root(q) {
        return root.powi(p).map(ExactReal::from_rational);
    }
    if q == 2 && !r.is_negative() {
        return ExactReal::sqrt_of(r)?.checked_powi(p);
    }
    None
}

fn exact_function(func: Function, u: &ExactReal) -> Option<ExactReal> {
    match func {
        Function::Abs => Some(if u.signum() < 0 { u.neg() } else { u.clone() }),
        Function::Sin | Function::Tan | Function::Atan if u.is_zero() => Some(ExactReal::zero()),
        Function::Cos if u.is_zero() => Some(ExactReal::from(1)),
        Function::Exp => exact_exp(u),
        Function::Ln => exact_ln(u),
        _ => None,
    }
}

fn exact_exp(u: &ExactReal) -> Option<ExactReal> {
    if let Some(r) = u.as_rational() {
        return ExactReal::exp_of(r);
    }
    // exp(k·ln c) = c^k
    match u.unit()? {
        Unit::Ln(c) if u.rational_part().is_zero() => {
            let k = i32::try_from(u.unit_coeff().to_integer()?.to_i64()?).ok()?;
            c.powi(k).map(ExactReal::from_rational)
        }
        _ => None,
    }
}

fn exact_ln(u: &ExactReal) -> Option<ExactReal> {
    if let Some(c) = u.as_rational() {
        return ExactReal::ln_of(c);
    }
    // ln(b·e^r) = r + ln b
    match u.unit()? {
        Unit::Exp(r) if u.rational_part().is_zero() => {
            ExactReal::ln_of(u.unit_coeff())?.checked_add(&ExactReal::from_rational(r.clone()))
        }
        _ => None,
    }
}

/// Real power; odd roots of negative bases are real.
fn real_pow(b: f64, e: &Rational) -> f64 {
    if let Some(k) = e.to_i64().and_then(|k| i32::try_from(k).ok()) {
        return b.powi(k);
    }
    let ef = e.to_f64();
    if b >= 0.0 {
        return b.powf(ef);
    }
    if e.denominator().is_even() {
        return f64::NAN;
    }
    let magnitude = (-b).powf(ef);
    if e.numerator().is_even() {
        magnitude
    } else {
        -magnitude
    }
}

impl Expr {
    /// The expression `a + b·t` for an exact real over the unit `t`.
    #[must_use]
    pub fn from_real(value: &ExactReal) -> Expr {
        let rational = Expr::number(value.rational_part().clone());
        let Some(unit) = value.unit() else {
            return rational;
        };
        let unit = match unit {
            Unit::Sqrt(d) => Expr::sqrt(Expr::number(Rational::from_integer(d.clone()))),
            Unit::Exp(r) => Expr::func(Function::Exp, Expr::number(r.clone())),
            Unit::Ln(c) => Expr::func(Function::Ln, Expr::number(c.clone())),
        };
        Expr::add([rational, Expr::mul([Expr::number(value.unit_coeff().clone()), unit])])
    }

    /// Returns true if the expression is the literal zero or evaluates
    /// exactly to zero.
    #[must_use]
    pub fn is_exactly_zero(&self) -> bool {
        self.is_zero() || self.exact_value().is_some_and(|v| v.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn p(s: &str) -> Expr {
        parse(s).unwrap()
    }

    fn surd(a: i64, b: i64, d: i64) -> ExactReal {
        ExactReal::new(Rational::from(a), Rational::from(b), d.into()).unwrap()
    }

    #[test]
    fn test_substitute() {
        assert_eq!(p("x^2 + 1").substitute(&Expr::integer(3)), Expr::integer(10));
        assert_eq!(p("1/(x^2 - 1)").substitute(&Expr::zero()), Expr::integer(-1));
        assert_eq!(p("sin(x)").substitute(&p("2*x")), p("sin(2x)"));
    }

    #[test]
    fn test_eval_exact_at_surd() {
        // (6x^2 + 2) at sqrt(2)/2 is 5
        let half_root2 = ExactReal::new(Rational::zero(), Rational::from_i64(1, 2), 2.into()).unwrap();
        assert_eq!(p("6x^2 + 2").eval_exact(&half_root2), Some(ExactReal::from(5)));
        // 1/(x^2 - 1) at sqrt(2) is 1
        assert_eq!(p("1/(x^2-1)").eval_exact(&surd(0, 1, 2)), Some(ExactReal::from(1)));
    }

    #[test]
    fn test_eval_exact_failures() {
        // pole
        assert_eq!(p("1/x").eval_exact(&ExactReal::zero()), None);
        // even root of a negative number
        assert_eq!(p("sqrt(x)").eval_exact(&ExactReal::from(-4)), None);
        assert_eq!(p("sqrt(x)").eval_exact(&ExactReal::from(8)), Some(surd(0, 2, 2)));
        assert_eq!(p("x^(1/3)").eval_exact(&ExactReal::from(-27)), Some(ExactReal::from(-3)));
        assert_eq!(p("sin(x)").eval_exact(&ExactReal::from(1)), None);
        assert_eq!(p("ln(x)").eval_exact(&ExactReal::from(-1)), None);
        assert_eq!(p("ln(x)^2").eval_exact(&ExactReal::from(2)), None);
        assert_eq!(p("pi").exact_value(), None);
    }

    #[test]
    fn test_eval_f64() {
        assert!((p("sin(x)").eval_f64(1.0).unwrap() - 1f64.sin()).abs() < 1e-15);
        assert_eq!(p("1/x").eval_f64(0.0), None);
        assert_eq!(p("ln(x)").eval_f64(-1.0), None);
        assert_eq!(p("sqrt(x)").eval_f64(-1.0), None);
        assert!((p("x^(1/3)").eval_f64(-8.0).unwrap() + 2.0).abs() < 1e-12);
        assert!((p("pi").approx().unwrap() - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn test_from_real() {
        let s = surd(1, -1, 2);
        let e = Expr::from_real(&s);
        assert_eq!(e.to_string(), "-sqrt(2) + 1");
        assert_eq!(e.exact_value(), Some(s));
    }

    #[test]
    fn test_exp_and_ln_exact() {
        let e_inv = ExactReal::exp_of(&Rational::from(-1)).unwrap();
        assert_eq!(p("ln(x) + 1").eval_exact(&e_inv), Some(ExactReal::zero()));
        assert_eq!(p("exp(x)").eval_exact(&ExactReal::from(0)), Some(ExactReal::from(1)));
        let ln2 = ExactReal::ln_of(&Rational::from(2)).unwrap();
        assert_eq!(p("exp(x) - 2").eval_exact(&ln2), Some(ExactReal::zero()));
        assert_eq!(p("exp(3x)").eval_exact(&ln2), Some(ExactReal::from(8)));
        // ln(2·e^-1) = ln 2 - 1
        let v = p("ln(2x)").eval_exact(&e_inv).unwrap();
        assert_eq!(v, ln2.checked_sub(&ExactReal::from(1)).unwrap());
        assert_eq!(p("x").eval_exact(&e_inv).unwrap().to_string(), "exp(-1)");
        let e = Expr::from_real(&e_inv.scale(&Rational::from(3)));
        assert_eq!(e.exact_value(), Some(e_inv.scale(&Rational::from(3))));
    }

    #[test]
    fn test_abs_exact() {
        assert_eq!(p("abs(x)").eval_exact(&surd(1, -1, 2)), Some(surd(-1, 1, 2)));
        assert!(p("x - x").is_exactly_zero());
    }
}
