//! Symbolic differentiation with respect to the free variable.
//!
//! Rules are applied structurally; the normalizing constructors keep the
//! intermediate trees small (`0 · u` and `1 · u` never survive), so no
//! separate cleanup pass is needed between orders.

use curvewise_integers::Rational;
use num_traits::One;

use crate::expr::{Expr, ExprNode, Function};

impl Expr {
    /// The first derivative.
    #[must_use]
    pub fn derivative(&self) -> Expr {
        match self.node() {
            ExprNode::Number(_) | ExprNode::Constant(_) => Expr::zero(),
            ExprNode::Var(_) => Expr::one(),

            ExprNode::Add(args) => Expr::add(args.iter().map(Expr::derivative)),

            // (f·g·h)' = f'·g·h + f·g'·h + f·g·h'
            ExprNode::Mul(args) => Expr::add((0..args.len()).filter_map(|i| {
                let d = args[i].derivative();
                if d.is_zero() {
                    return None;
                }
                let others = args
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, a)| a.clone());
                Some(Expr::mul(others.chain(std::iter::once(d))))
            })),

            ExprNode::Pow { base, exp } => derive_pow(base, exp),

            ExprNode::Function { func, arg } => {
                let inner = arg.derivative();
                if inner.is_zero() {
                    return Expr::zero();
                }
                Expr::mul([derive_function(*func, arg), inner])
            }
        }
    }

    /// The derivative of the given order; order 0 is the expression itself.
    #[must_use]
    pub fn nth_derivative(&self, order: usize) -> Expr {
        (0..order).fold(self.clone(), |acc, _| acc.derivative())
    }
}

fn derive_pow(base: &Expr, exp: &Expr) -> Expr {
    let base_prime = base.derivative();

    if !exp.contains_var() {
        // (u^c)' = c·u^(c-1)·u'
        if base_prime.is_zero() {
            return Expr::zero();
        }
        let lowered = match exp.as_number() {
            Some(c) => Expr::number(c - &Rational::one()),
            None => Expr::add([exp.clone(), Expr::integer(-1)]),
        };
        return Expr::mul([exp.clone(), Expr::pow(base.clone(), lowered), base_prime]);
    }

    let exp_prime = exp.derivative();
    let power = Expr::pow(base.clone(), exp.clone());
    let log_base = Expr::func(Function::Ln, base.clone());

    if !base.contains_var() {
        // (c^v)' = c^v·ln(c)·v'
        return Expr::mul([power, log_base, exp_prime]);
    }

    // (u^v)' = u^v·(v'·ln(u) + v·u'/u)
    Expr::mul([
        power,
        Expr::add([
            Expr::mul([exp_prime, log_base]),
            Expr::mul([exp.clone(), base_prime, Expr::powi(base.clone(), -1)]),
        ]),
    ])
}

/// f'(u) for the outer function, without the chain-rule factor.
fn derive_function(func: Function, u: &Expr) -> Expr {
    match func {
        Function::Sin => Expr::func(Function::Cos, u.clone()),
        Function::Cos => Expr::func(Function::Sin, u.clone()).neg(),
        Function::Tan => Expr::powi(Expr::func(Function::Cos, u.clone()), -2),
        Function::Exp => Expr::func(Function::Exp, u.clone()),
        Function::Ln => Expr::powi(u.clone(), -1),
        // |u|' = |u|/u, undefined at u = 0
        Function::Abs => Expr::mul([Expr::func(Function::Abs, u.clone()), Expr::powi(u.clone(), -1)]),
        Function::Atan => Expr::powi(Expr::add([Expr::one(), Expr::powi(u.clone(), 2)]), -1),
    }
}
