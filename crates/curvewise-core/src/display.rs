//! Infix rendering.
//!
//! The output re-parses to the same expression: products are written
//! with explicit `*`, negative powers become denominators, and `u^(1/2)`
//! is written `sqrt(u)`. Sums list other terms first, then powers of the
//! variable by descending degree, then the constant.

use std::cmp::Ordering;
use std::fmt;

use curvewise_integers::Rational;
use num_traits::{One, Zero};

use crate::expr::{Expr, ExprNode};

const SUM: u8 = 1;
const PRODUCT: u8 = 2;
const POWER: u8 = 3;
const ATOM: u8 = 4;

fn precedence(e: &Expr) -> u8 {
    match e.node() {
        ExprNode::Add(_) => SUM,
        ExprNode::Mul(_) => PRODUCT,
        ExprNode::Number(n) if n.is_negative() || !n.is_integer() => PRODUCT,
        ExprNode::Pow { .. } if is_reciprocal(e) => PRODUCT,
        ExprNode::Pow { exp, .. } if is_half(exp) => ATOM,
        ExprNode::Pow { .. } => POWER,
        _ => ATOM,
    }
}

fn is_half(e: &Expr) -> bool {
    e.as_number() == Some(&Rational::from_i64(1, 2))
}

/// A negative power of a non-numeric base, written as a fraction.
fn is_reciprocal(e: &Expr) -> bool {
    match e.node() {
        ExprNode::Pow { base, exp } => {
            base.as_number().is_none() && exp.as_number().is_some_and(Rational::is_negative)
        }
        _ => false,
    }
}

/// The exponent `k` of a term `c·x^k`; `None` for any other term.
fn monomial_degree(term: &Expr) -> Option<Rational> {
    let (_, rest) = term.as_coeff_term();
    if rest.is_one() {
        return Some(Rational::zero());
    }
    let (base, exp) = rest.as_base_exp();
    match base.node() {
        ExprNode::Var(_) => exp.as_number().cloned(),
        _ => None,
    }
}

fn write_at(f: &mut fmt::Formatter<'_>, e: &Expr, min: u8) -> fmt::Result {
    if precedence(e) < min {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

/// Coefficient, numerator factors and denominator factors of a product.
fn fraction_parts(e: &Expr) -> (Rational, Vec<Expr>, Vec<Expr>) {
    let factors: Vec<Expr> = match e.node() {
        ExprNode::Mul(args) => args.to_vec(),
        _ => vec![e.clone()],
    };
    let mut coeff = Rational::one();
    let mut num = Vec::new();
    let mut den = Vec::new();
    for factor in factors {
        if let Some(n) = factor.as_number() {
            coeff = n.clone();
            continue;
        }
        let (base, exp) = factor.as_base_exp();
        match exp.as_number() {
            Some(n) if is_reciprocal(&factor) => den.push(Expr::pow(base, Expr::number(-n.clone()))),
            _ => num.push(factor),
        }
    }
    (coeff, num, den)
}

fn write_product(f: &mut fmt::Formatter<'_>, coeff: &Rational, factors: &[Expr]) -> fmt::Result {
    let mut first = true;
    if !coeff.is_one() || factors.is_empty() {
        write!(f, "{coeff}")?;
        first = false;
    }
    for factor in factors {
        if !first {
            f.write_str("*")?;
        }
        write_at(f, factor, POWER)?;
        first = false;
    }
    Ok(())
}

fn write_fraction(f: &mut fmt::Formatter<'_>, e: &Expr) -> fmt::Result {
    let (coeff, num, den) = fraction_parts(e);
    if coeff.is_negative() {
        f.write_str("-")?;
    }
    let magnitude = coeff.abs();
    let top = Rational::from_integer(magnitude.numerator());
    let bottom = Rational::from_integer(magnitude.denominator());
    write_product(f, &top, &num)?;

    let den_count = den.len() + usize::from(!bottom.is_one());
    if den_count == 0 {
        return Ok(());
    }
    f.write_str("/")?;
    if den_count == 1 && den.len() == 1 {
        return write_at(f, &den[0], POWER);
    }
    if den_count == 1 {
        return write!(f, "{bottom}");
    }
    f.write_str("(")?;
    write_product(f, &bottom, &den)?;
    f.write_str(")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            ExprNode::Number(n) => write!(f, "{n}"),
            ExprNode::Var(name) => f.write_str(name),
            ExprNode::Constant(c) => f.write_str(c.name()),
            ExprNode::Function { func, arg } => write!(f, "{}({arg})", func.name()),

            ExprNode::Add(args) => {
                let mut ordered: Vec<&Expr> = args.iter().collect();
                ordered.sort_by(|a, b| match (monomial_degree(a), monomial_degree(b)) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (None, Some(_)) => Ordering::Less,
                    (Some(_), None) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                });
                for (i, term) in ordered.into_iter().enumerate() {
                    let (c, _) = term.as_coeff_term();
                    if i == 0 {
                        write_at(f, term, PRODUCT)?;
                    } else if c.is_negative() {
                        f.write_str(" - ")?;
                        write_at(f, &term.neg(), PRODUCT)?;
                    } else {
                        f.write_str(" + ")?;
                        write_at(f, term, PRODUCT)?;
                    }
                }
                Ok(())
            }

            ExprNode::Mul(_) => write_fraction(f, self),

            ExprNode::Pow { base, exp } => {
                if is_reciprocal(self) {
                    return write_fraction(f, self);
                }
                if is_half(exp) {
                    return write!(f, "sqrt({base})");
                }
                write_at(f, base, ATOM)?;
                f.write_str("^")?;
                write_at(f, exp, ATOM)
            }
        }
    }
}
