//! Expression node types.
//!
//! An [`Expr`] is a cheap handle to an immutable [`ExprNode`]. All public
//! constructors normalize, so two expressions built from the same
//! mathematical term compare equal structurally.

use std::sync::Arc;

use curvewise_integers::Rational;
use num_traits::{One, Zero};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

use crate::simplify;

/// Argument list for n-ary nodes.
pub type Args = SmallVec<[Expr; 4]>;

/// Transcendental constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number e
    E,
}

impl Constant {
    /// Nearest f64.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }

    /// Source name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }
}

/// Elementary functions of one argument.
///
/// Square roots are not a function here; they are powers with exponent 1/2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Function {
    /// Sine
    Sin,
    /// Cosine
    Cos,
    /// Tangent
    Tan,
    /// Natural exponential
    Exp,
    /// Natural logarithm
    Ln,
    /// Absolute value
    Abs,
    /// Inverse tangent
    Atan,
}

impl Function {
    /// Looks a function up by its source name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "exp" => Function::Exp,
            "ln" | "log" => Function::Ln,
            "abs" => Function::Abs,
            "atan" => Function::Atan,
            _ => return None,
        })
    }

    /// Source name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Abs => "abs",
            Function::Atan => "atan",
        }
    }
}

/// An expression node.
///
/// Subtraction, negation and division have no nodes of their own:
/// `a - b` is `a + (-1)·b` and `a / b` is `a · b^(-1)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExprNode {
    // === Atoms ===
    /// An exact rational literal.
    Number(Rational),

    /// The free variable.
    Var(Arc<str>),

    /// A named constant.
    Constant(Constant),

    // === Compound Expressions ===
    /// Sum of expressions.
    ///
    /// Invariant: at least 2 arguments, no nested sums, at most one number
    /// (stored first).
    Add(Args),

    /// Product of expressions.
    ///
    /// Invariant: at least 2 arguments, no nested products, at most one
    /// number (stored first, never 0 or 1).
    Mul(Args),

    /// Power expression: base^exp.
    Pow {
        /// The base.
        base: Expr,
        /// The exponent.
        exp: Expr,
    },

    // === Functions ===
    /// A function application.
    Function {
        /// Which function.
        func: Function,
        /// The argument.
        arg: Expr,
    },
}

/// An immutable, shared expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    pub(crate) fn from_node(node: ExprNode) -> Self {
        Self(Arc::new(node))
    }

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &ExprNode {
        &self.0
    }

    // === Atoms ===

    /// A rational literal.
    #[must_use]
    pub fn number(value: Rational) -> Self {
        Self::from_node(ExprNode::Number(value))
    }

    /// An integer literal.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::number(Rational::from(value))
    }

    /// The literal 0.
    #[must_use]
    pub fn zero() -> Self {
        Self::integer(0)
    }

    /// The literal 1.
    #[must_use]
    pub fn one() -> Self {
        Self::integer(1)
    }

    /// The free variable with the given name.
    #[must_use]
    pub fn var(name: &str) -> Self {
        Self::from_node(ExprNode::Var(Arc::from(name)))
    }

    /// A named constant.
    #[must_use]
    pub fn constant(c: Constant) -> Self {
        Self::from_node(ExprNode::Constant(c))
    }

    // === Normalizing constructors ===

    /// Sum of the given terms.
    #[must_use]
    pub fn add(terms: impl IntoIterator<Item = Expr>) -> Self {
        simplify::build_add(terms.into_iter().collect())
    }

    /// Product of the given factors.
    #[must_use]
    pub fn mul(factors: impl IntoIterator<Item = Expr>) -> Self {
        simplify::build_mul(factors.into_iter().collect())
    }

    /// `base ^ exp`.
    #[must_use]
    pub fn pow(base: Expr, exp: Expr) -> Self {
        simplify::build_pow(base, exp)
    }

    /// `base ^ n` for an integer `n`.
    #[must_use]
    pub fn powi(base: Expr, n: i64) -> Self {
        Self::pow(base, Self::integer(n))
    }

    /// `sqrt(arg)`, stored as `arg^(1/2)`.
    #[must_use]
    pub fn sqrt(arg: Expr) -> Self {
        Self::pow(arg, Self::number(Rational::from_i64(1, 2)))
    }

    /// A function application.
    #[must_use]
    pub fn func(func: Function, arg: Expr) -> Self {
        simplify::build_function(func, arg)
    }

    /// `-self`.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self::mul([Self::integer(-1), self.clone()])
    }

    /// `self - other`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        Self::add([self.clone(), other.neg()])
    }

    /// `self / other`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Self {
        Self::mul([self.clone(), Self::powi(other.clone(), -1)])
    }

    // === Queries ===

    /// The rational value, if this is a literal.
    #[must_use]
    pub fn as_number(&self) -> Option<&Rational> {
        match self.node() {
            ExprNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The integer value, if this is an integer literal that fits in i64.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Rational::to_i64)
    }

    /// Returns true for the literal 0.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Zero::is_zero)
    }

    /// Returns true for the literal 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(One::is_one)
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self.node(),
            ExprNode::Number(_) | ExprNode::Var(_) | ExprNode::Constant(_)
        )
    }

    /// Returns true if the free variable occurs anywhere in the tree.
    #[must_use]
    pub fn contains_var(&self) -> bool {
        match self.node() {
            ExprNode::Var(_) => true,
            ExprNode::Number(_) | ExprNode::Constant(_) => false,
            ExprNode::Add(args) | ExprNode::Mul(args) => args.iter().any(Expr::contains_var),
            ExprNode::Pow { base, exp } => base.contains_var() || exp.contains_var(),
            ExprNode::Function { arg, .. } => arg.contains_var(),
        }
    }

    /// The variable's name, if it occurs.
    #[must_use]
    pub fn var_name(&self) -> Option<&str> {
        match self.node() {
            ExprNode::Var(name) => Some(name),
            ExprNode::Number(_) | ExprNode::Constant(_) => None,
            ExprNode::Add(args) | ExprNode::Mul(args) => args.iter().find_map(Expr::var_name),
            ExprNode::Pow { base, exp } => base.var_name().or_else(|| exp.var_name()),
            ExprNode::Function { arg, .. } => arg.var_name(),
        }
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> Args {
        match self.node() {
            ExprNode::Number(_) | ExprNode::Var(_) | ExprNode::Constant(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![base.clone(), exp.clone()],
            ExprNode::Function { arg, .. } => smallvec::smallvec![arg.clone()],
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Expr::node_count).sum::<usize>()
    }

    /// Splits a term into its numeric coefficient and the remaining factor.
    ///
    /// `3·x²` gives `(3, x²)`, `x` gives `(1, x)`, `5` gives `(5, 1)`.
    #[must_use]
    pub fn as_coeff_term(&self) -> (Rational, Expr) {
        match self.node() {
            ExprNode::Number(n) => (n.clone(), Expr::one()),
            ExprNode::Mul(args) => match args[0].as_number() {
                Some(c) => {
                    let rest: Args = args[1..].iter().cloned().collect();
                    let rest = if rest.len() == 1 {
                        rest[0].clone()
                    } else {
                        Expr::from_node(ExprNode::Mul(rest))
                    };
                    (c.clone(), rest)
                }
                None => (Rational::one(), self.clone()),
            },
            _ => (Rational::one(), self.clone()),
        }
    }

    /// Splits a factor into base and exponent; `x` gives `(x, 1)`.
    #[must_use]
    pub fn as_base_exp(&self) -> (Expr, Expr) {
        match self.node() {
            ExprNode::Pow { base, exp } => (base.clone(), exp.clone()),
            _ => (self.clone(), Expr::one()),
        }
    }
}

impl From<Rational> for Expr {
    fn from(value: Rational) -> Self {
        Expr::number(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_atom() {
        assert!(Expr::integer(42).is_atom());
        assert!(Expr::var("x").is_atom());
        assert!(!Expr::var("x").neg().is_atom());
    }

    #[test]
    fn test_contains_var() {
        let x = Expr::var("x");
        assert!(Expr::add([x.clone(), Expr::one()]).contains_var());
        assert!(!Expr::add([Expr::constant(Constant::Pi), Expr::one()]).contains_var());
        assert_eq!(Expr::func(Function::Sin, x).var_name(), Some("x"));
    }

    #[test]
    fn test_coeff_term() {
        let x = Expr::var("x");
        let term = Expr::mul([Expr::integer(3), Expr::powi(x.clone(), 2)]);
        let (c, rest) = term.as_coeff_term();
        assert_eq!(c, Rational::from(3));
        assert_eq!(rest, Expr::powi(x.clone(), 2));
        assert_eq!(x.as_coeff_term(), (Rational::one(), x));
    }

    #[test]
    fn test_function_names() {
        assert_eq!(Function::from_name("log"), Some(Function::Ln));
        assert_eq!(Function::from_name("sqrt"), None);
        assert_eq!(Function::Atan.name(), "atan");
    }
}
