//! Property-based tests for expression construction, printing and calculus.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use curvewise_integers::{ExactReal, Rational};

    use crate::convert::to_rational_function;
    use crate::expr::Expr;
    use crate::parser::parse;

    /// Rational expressions in `x` with small integer coefficients.
    fn rational_expr() -> impl Strategy<Value = Expr> {
        let leaf = prop_oneof![
            (-9i64..10).prop_map(Expr::integer),
            Just(Expr::var("x")),
        ];
        leaf.prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 2..4).prop_map(|v| Expr::add(v)),
                proptest::collection::vec(inner.clone(), 2..3).prop_map(|v| Expr::mul(v)),
                (inner, -2i64..4).prop_map(|(b, k)| Expr::powi(b, k)),
            ]
        })
    }

    proptest! {
        #[test]
        fn display_reparses(e in rational_expr()) {
            let printed = e.to_string();
            let reparsed = parse(&printed);
            prop_assert!(reparsed.is_ok(), "failed to parse {}", printed);
            prop_assert_eq!(reparsed.unwrap(), e);
        }

        #[test]
        fn derivative_matches_rational_function(e in rational_expr()) {
            let rf = to_rational_function(&e);
            prop_assume!(rf.is_some());
            let expected = rf.unwrap().derivative();
            prop_assert_eq!(to_rational_function(&e.derivative()), Some(expected));
        }

        #[test]
        fn simplify_is_idempotent(e in rational_expr()) {
            let once = e.simplify();
            prop_assert_eq!(once.simplify(), once);
        }

        #[test]
        fn numer_denom_recombines(e in rational_expr()) {
            let rf = to_rational_function(&e);
            prop_assume!(rf.is_some());
            let (n, d) = e.as_numer_denom();
            let n = to_rational_function(&n).unwrap();
            let d = to_rational_function(&d).unwrap();
            prop_assert_eq!(n.checked_div(&d), rf);
        }

        #[test]
        fn exact_eval_agrees_with_rational_function(e in rational_expr(), at in -5i64..6) {
            let rf = to_rational_function(&e);
            prop_assume!(rf.is_some());
            let point = Rational::from(at);
            if let Some(v) = e.eval_exact(&ExactReal::from(at)) {
                prop_assert_eq!(rf.unwrap().eval(&point).map(ExactReal::from), Some(v));
            }
        }
    }
}
