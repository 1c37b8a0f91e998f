//! Conversion between expressions and polynomial forms.

use curvewise_integers::Rational;
use curvewise_poly::{DensePoly, RationalFunction};
use num_traits::Zero;

use crate::expr::{Expr, ExprNode};

/// Largest degree an expression may expand to before it is read as a
/// rational function.
pub const MAX_EXPANSION_DEGREE: usize = 1024;

/// Reads an expression as a rational function of the variable.
///
/// Returns `None` for expressions involving constants like π, functions,
/// non-integer powers of the variable, or a negative power of zero, and
/// for expressions whose expansion could exceed [`MAX_EXPANSION_DEGREE`].
#[must_use]
pub fn to_rational_function(expr: &Expr) -> Option<RationalFunction> {
    if degree_bound(expr) > MAX_EXPANSION_DEGREE {
        return None;
    }
    expand(expr)
}

fn expand(expr: &Expr) -> Option<RationalFunction> {
    match expr.node() {
        ExprNode::Number(n) => Some(RationalFunction::constant(n.clone())),
        ExprNode::Var(_) => Some(RationalFunction::x()),
        ExprNode::Constant(_) | ExprNode::Function { .. } => None,
        ExprNode::Add(args) => args
            .iter()
            .try_fold(RationalFunction::zero(), |acc, a| Some(acc.add_ref(&expand(a)?))),
        ExprNode::Mul(args) => args
            .iter()
            .try_fold(RationalFunction::one(), |acc, a| Some(acc.mul_ref(&expand(a)?))),
        ExprNode::Pow { base, exp } => {
            let k = exp.as_i64()?;
            if let Some(b) = base.as_number() {
                let k = i32::try_from(k).ok()?;
                return b.powi(k).map(RationalFunction::constant);
            }
            expand(base)?.powi(k)
        }
    }
}

/// An upper bound on the degree of numerator and denominator after
/// expansion, saturating instead of overflowing.
fn degree_bound(expr: &Expr) -> usize {
    match expr.node() {
        ExprNode::Var(_) => 1,
        ExprNode::Number(_) | ExprNode::Constant(_) | ExprNode::Function { .. } => 0,
        ExprNode::Add(args) => args.iter().map(degree_bound).max().unwrap_or(0),
        ExprNode::Mul(args) => args
            .iter()
            .fold(0, |acc: usize, a| acc.saturating_add(degree_bound(a))),
        ExprNode::Pow { base, exp } => {
            let k = exp
                .as_i64()
                .map_or(0, |k| usize::try_from(k.unsigned_abs()).unwrap_or(usize::MAX));
            degree_bound(base).saturating_mul(k)
        }
    }
}

/// Reads an expression as a polynomial in the variable.
#[must_use]
pub fn to_polynomial(expr: &Expr) -> Option<DensePoly> {
    let rf = to_rational_function(expr)?;
    rf.as_polynomial().cloned()
}

/// Builds `Σ cᵢ·xⁱ`.
#[must_use]
pub fn from_polynomial(p: &DensePoly, var: &str) -> Expr {
    let x = Expr::var(var);
    Expr::add(p.coeffs().iter().enumerate().filter(|(_, c)| !c.is_zero()).map(|(i, c)| {
        let power = Expr::powi(x.clone(), i as i64);
        Expr::mul([Expr::number(c.clone()), power])
    }))
}

/// Builds `P / Q` from a rational function.
#[must_use]
pub fn from_rational_function(rf: &RationalFunction, var: &str) -> Expr {
    let num = from_polynomial(rf.numerator(), var);
    if rf.is_polynomial() {
        return num;
    }
    let den = from_polynomial(rf.denominator(), var);
    Expr::mul([num, Expr::powi(den, -1)])
}

impl Expr {
    /// Splits into numerator and denominator without cancelling anything.
    ///
    /// Sums are put over a common denominator as `(a·d + b·c) / (b·d)`;
    /// negative integer powers move to the denominator. A factor shared by
    /// both parts is kept in both, which is what lets a caller detect a
    /// removable singularity.
    #[must_use]
    pub fn as_numer_denom(&self) -> (Expr, Expr) {
        match self.node() {
            ExprNode::Mul(args) => {
                let (nums, dens): (Vec<Expr>, Vec<Expr>) =
                    args.iter().map(Expr::as_numer_denom).unzip();
                (Expr::mul(nums), Expr::mul(dens))
            }
            ExprNode::Add(args) => {
                let mut num = Expr::zero();
                let mut den = Expr::one();
                for term in args {
                    let (n, d) = term.as_numer_denom();
                    if d == den {
                        num = Expr::add([num, n]);
                    } else {
                        num = Expr::add([Expr::mul([num, d.clone()]), Expr::mul([n, den.clone()])]);
                        den = Expr::mul([den, d]);
                    }
                }
                (num, den)
            }
            ExprNode::Pow { base, exp } => match exp.as_number() {
                Some(e) if e.is_integer() && e.is_negative() => {
                    let (n, d) = base.as_numer_denom();
                    let k = Expr::number(-e.clone());
                    (Expr::pow(d, k.clone()), Expr::pow(n, k))
                }
                Some(e) if e.is_negative() => (Expr::one(), Expr::pow(base.clone(), Expr::number(-e.clone()))),
                _ => (self.clone(), Expr::one()),
            },
            ExprNode::Number(n) => (
                Expr::number(Rational::from_integer(n.numerator())),
                Expr::number(Rational::from_integer(n.denominator())),
            ),
            _ => (self.clone(), Expr::one()),
        }
    }

    /// Numerator of [`Expr::as_numer_denom`].
    #[must_use]
    pub fn numerator(&self) -> Expr {
        self.as_numer_denom().0
    }

    /// Denominator of [`Expr::as_numer_denom`].
    #[must_use]
    pub fn denominator(&self) -> Expr {
        self.as_numer_denom().1
    }

    /// Polynomial degree in the variable, if this is a polynomial.
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        to_polynomial(self).map(|p| p.degree())
    }

    /// Returns true if the variable does not occur.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        !self.contains_var()
    }
}
