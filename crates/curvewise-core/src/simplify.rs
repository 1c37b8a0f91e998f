//! Normalizing construction and explicit simplification.
//!
//! The `build_*` functions back the public constructors on [`Expr`]. They
//! flatten nested sums and products, fold numeric constants, collect like
//! terms and like bases, and sort arguments into a canonical order.
//!
//! Like bases are merged only when the merge cannot change where the
//! expression is defined: integer exponents of one sign, or any rational
//! exponents of a positive numeric base. `x · x⁻¹` therefore stays as
//! written, and `(x-1)/(x-1)` keeps its hole at 1.

use curvewise_integers::Rational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;

use crate::convert::{from_rational_function, to_rational_function};
use crate::expr::{Args, Constant, Expr, ExprNode, Function};

/// Builds a normalized sum.
pub(crate) fn build_add(terms: Vec<Expr>) -> Expr {
    let mut constant = Rational::zero();
    let mut order: Vec<Expr> = Vec::new();
    let mut coeffs: FxHashMap<Expr, Rational> = FxHashMap::default();

    let flat = terms.into_iter().flat_map(|t| match t.node() {
        ExprNode::Add(args) => args.clone(),
        _ => smallvec::smallvec![t],
    });

    for term in flat {
        if let Some(n) = term.as_number() {
            constant = constant + n;
            continue;
        }
        let (c, rest) = term.as_coeff_term();
        match coeffs.get_mut(&rest) {
            Some(existing) => *existing = &*existing + &c,
            None => {
                coeffs.insert(rest.clone(), c);
                order.push(rest);
            }
        }
    }

    let mut args: Args = order
        .into_iter()
        .filter_map(|rest| {
            let c = coeffs.remove(&rest)?;
            if c.is_zero() {
                None
            } else if c.is_one() {
                Some(rest)
            } else {
                Some(build_mul(vec![Expr::number(c), rest]))
            }
        })
        .collect();
    args.sort();
    if !constant.is_zero() {
        args.insert(0, Expr::number(constant));
    }

    match args.len() {
        0 => Expr::zero(),
        1 => args.remove(0),
        _ => Expr::from_node(ExprNode::Add(args)),
    }
}

/// How the exponents of one base may be combined.
#[derive(Clone, PartialEq, Eq, Hash)]
enum ExpClass {
    /// Integer exponents ≥ 1.
    Positive,
    /// Integer exponents ≤ -1.
    Negative,
    /// Any rational exponent of a positive number.
    PositiveBase,
}

/// Builds a normalized product.
pub(crate) fn build_mul(factors: Vec<Expr>) -> Expr {
    let mut coeff = Rational::one();
    let mut order: Vec<(Expr, ExpClass)> = Vec::new();
    let mut exps: FxHashMap<(Expr, ExpClass), Rational> = FxHashMap::default();
    let mut others: Args = Args::new();

    let flat = factors.into_iter().flat_map(|f| match f.node() {
        ExprNode::Mul(args) => args.clone(),
        _ => smallvec::smallvec![f],
    });

    for factor in flat {
        if let Some(n) = factor.as_number() {
            coeff = coeff * n;
            continue;
        }
        let (base, exp) = factor.as_base_exp();
        let Some(e) = exp.as_number().cloned() else {
            others.push(factor);
            continue;
        };
        let class = if base.as_number().is_some_and(Rational::is_positive) {
            ExpClass::PositiveBase
        } else if !e.is_integer() {
            others.push(factor);
            continue;
        } else if e.is_positive() {
            ExpClass::Positive
        } else {
            ExpClass::Negative
        };
        let key = (base, class);
        match exps.get_mut(&key) {
            Some(existing) => *existing = &*existing + &e,
            None => {
                exps.insert(key.clone(), e);
                order.push(key);
            }
        }
    }

    if coeff.is_zero() {
        return Expr::zero();
    }

    let mut args = others;
    for key in order {
        let Some(e) = exps.remove(&key) else { continue };
        let powered = build_pow(key.0, Expr::number(e));
        match powered.node() {
            ExprNode::Number(n) => coeff = coeff * n,
            ExprNode::Mul(inner) => {
                for f in inner {
                    match f.as_number() {
                        Some(n) => coeff = coeff * n,
                        None => args.push(f.clone()),
                    }
                }
            }
            _ => args.push(powered),
        }
    }
    args.sort();

    if args.is_empty() {
        return Expr::number(coeff);
    }
    if !coeff.is_one() {
        args.insert(0, Expr::number(coeff));
    }
    if args.len() == 1 {
        return args.remove(0);
    }
    Expr::from_node(ExprNode::Mul(args))
}

/// Builds a normalized power.
pub(crate) fn build_pow(base: Expr, exp: Expr) -> Expr {
    if exp.is_zero() || base.is_one() {
        return Expr::one();
    }
    if exp.is_one() {
        return base;
    }
    if matches!(base.node(), ExprNode::Constant(Constant::E)) {
        return build_function(Function::Exp, exp);
    }

    if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
        if let Some(folded) = fold_numeric_pow(b, e) {
            return folded;
        }
        return raw_pow(base, exp);
    }

    let Some(k) = exp.as_number().filter(|e| e.is_integer()).cloned() else {
        return raw_pow(base, exp);
    };

    match base.node() {
        ExprNode::Pow {
            base: inner,
            exp: inner_exp,
        } => match inner_exp.as_number() {
            // (x^a)^k = x^(ak) unless a hole at 0 or an even root would be lost
            Some(a) if !(a.is_negative() && k.is_negative()) && keeps_even_root(a, &k) => {
                build_pow(inner.clone(), Expr::number(a * &k))
            }
            Some(a) if inner.as_number().is_some_and(Rational::is_positive) => {
                build_pow(inner.clone(), Expr::number(a * &k))
            }
            _ => raw_pow(base, exp),
        },
        ExprNode::Mul(args) => build_mul(
            args.iter()
                .map(|f| build_pow(f.clone(), Expr::number(k.clone())))
                .collect(),
        ),
        _ => raw_pow(base, exp),
    }
}

fn keeps_even_root(a: &Rational, k: &Rational) -> bool {
    !a.denominator().is_even() || (a * k).denominator().is_even()
}

fn raw_pow(base: Expr, exp: Expr) -> Expr {
    Expr::from_node(ExprNode::Pow { base, exp })
}

/// Folds `b^e` for literal `b` and `e` when the result is rational or a
/// rational multiple of a square root.
fn fold_numeric_pow(b: &Rational, e: &Rational) -> Option<Expr> {
    if let Some(k) = e.to_i64() {
        let k = i32::try_from(k).ok()?;
        return b.powi(k).map(Expr::number);
    }

    let p = i32::try_from(e.numerator().to_i64()?).ok()?;
    let q = u32::try_from(e.denominator().to_i64()?).ok()?;
    if let Some(root) = b.exact_root(q) {
        return root.powi(p).map(Expr::number);
    }
    if q != 2 || !b.is_positive() {
        return None;
    }

    // b^(p/2) = c^p · d^((p-1)/2) · √d with b = c²·d
    let (c, d) = b.split_sqrt()?;
    let d = Rational::from_integer(d);
    let scale = c.powi(p)? * d.powi((p - 1).div_euclid(2))?;
    let root = raw_pow(Expr::number(d), Expr::number(Rational::from_i64(1, 2)));
    if scale.is_one() {
        return Some(root);
    }
    Some(Expr::from_node(ExprNode::Mul(smallvec::smallvec![
        Expr::number(scale),
        root
    ])))
}

/// Builds a function application, folding exact special values.
pub(crate) fn build_function(func: Function, arg: Expr) -> Expr {
    if let Some(n) = arg.as_number() {
        let folded = match func {
            Function::Sin | Function::Tan | Function::Atan if n.is_zero() => Some(Rational::zero()),
            Function::Cos | Function::Exp if n.is_zero() => Some(Rational::one()),
            Function::Ln if n.is_one() => Some(Rational::zero()),
            Function::Abs => Some(n.abs()),
            _ => None,
        };
        if let Some(v) = folded {
            return Expr::number(v);
        }
    }
    // ln(exp(u)) = u for every real u
    if let (Function::Ln, ExprNode::Function { func: Function::Exp, arg: inner }) = (func, arg.node()) {
        return inner.clone();
    }
    Expr::from_node(ExprNode::Function { func, arg })
}

impl Expr {
    /// Simplifies the expression.
    ///
    /// Rational functions are brought to canonical P/Q form (common
    /// factors cancelled, so removable singularities disappear). Other
    /// expressions are rebuilt bottom-up, simplifying every rational
    /// subexpression.
    #[must_use]
    pub fn simplify(&self) -> Expr {
        if let Some(rf) = to_rational_function(self) {
            return from_rational_function(&rf, self.var_name().unwrap_or("x"));
        }
        match self.node() {
            ExprNode::Number(_) | ExprNode::Var(_) | ExprNode::Constant(_) => self.clone(),
            ExprNode::Add(args) => Expr::add(args.iter().map(Expr::simplify)),
            ExprNode::Mul(args) => Expr::mul(args.iter().map(Expr::simplify)),
            ExprNode::Pow { base, exp } => Expr::pow(base.simplify(), exp.simplify()),
            ExprNode::Function { func, arg } => Expr::func(*func, arg.simplify()),
        }
    }
}
