//! Property-based tests for partitions and analyses.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use curvewise_core::convert::from_polynomial;
    use curvewise_core::Expr;
    use curvewise_integers::ExactReal;
    use curvewise_poly::DensePoly;
    use curvewise_solve::Domain;

    use crate::analyzer::Analyzer;
    use crate::backend::{AlgebraBackend, ExactBackend};
    use crate::partition::{Partitioner, Sign};

    fn roots() -> impl Strategy<Value = Vec<i64>> {
        proptest::collection::btree_set(-5i64..6, 1..5).prop_map(|s| s.into_iter().collect())
    }

    /// At most three roots, so every derivative is at most quadratic.
    fn few_roots() -> impl Strategy<Value = Vec<i64>> {
        proptest::collection::btree_set(-5i64..6, 1..4).prop_map(|s| s.into_iter().collect())
    }

    fn product(roots: &[i64]) -> Expr {
        let p = roots
            .iter()
            .fold(DensePoly::one(), |acc, &r| acc.mul(&DensePoly::from_i64s(&[-r, 1])));
        from_polynomial(&p, "x")
    }

    proptest! {
        #[test]
        fn simple_roots_alternate_signs(rs in roots()) {
            let b = ExactBackend::default();
            let c = Partitioner::new(&b, 1e-12)
                .partition(&product(&rs), &Domain::real_line())
                .unwrap();
            prop_assert_eq!(c.pieces().len(), rs.len() + 1);
            // monic, so positive to the right of the largest root
            prop_assert_eq!(c.pieces().last().unwrap().sign, Sign::Positive);
            for pair in c.pieces().windows(2) {
                prop_assert_ne!(pair[0].sign, pair[1].sign);
            }
            for piece in c.pieces() {
                prop_assert!(piece.interval.contains_interior(&piece.point));
            }
        }

        #[test]
        fn denominator_poles_split_the_domain(rs in roots()) {
            let b = ExactBackend::default();
            let f = Expr::one().div(&product(&rs));
            let domain = b.continuous_domain(&f).unwrap();
            prop_assert_eq!(domain.len(), rs.len() + 1);
            let c = Partitioner::new(&b, 1e-12).partition(&f, &domain).unwrap();
            prop_assert!(c.roots().is_empty());
            prop_assert!(c.intervals_with(Sign::Inconclusive).is_empty());
        }

        #[test]
        fn product_intercepts_are_its_roots(rs in roots()) {
            let r = Analyzer::default().analyze_expr(&product(&rs)).unwrap();
            let expected: Vec<ExactReal> = rs.iter().map(|&v| ExactReal::from(v)).collect();
            prop_assert_eq!(r.intercepts.x, Ok(expected));
        }

        #[test]
        fn intercepts_are_zeros(rs in roots(), shift in -3i64..4) {
            let f = Expr::add([product(&rs), Expr::integer(shift)]);
            let analyzer = Analyzer::default();
            let r = analyzer.analyze_expr(&f).unwrap();
            // quadratics always split over square roots
            if rs.len() <= 2 {
                prop_assert!(r.intercepts.x.is_ok());
            }
            if let Ok(xs) = &r.intercepts.x {
                for x in xs {
                    let v = analyzer.backend().simplify(&f).eval_exact(x);
                    prop_assert_eq!(v, Some(ExactReal::zero()));
                }
            }
        }

        #[test]
        fn monotone_sets_are_disjoint(rs in few_roots()) {
            let f = Expr::one().div(&product(&rs));
            let r = Analyzer::default().analyze_expr(&f).unwrap();
            let m = r.monotonicity.as_ref().unwrap();
            prop_assert!(m.increasing.intersect(&m.decreasing).is_empty());
            prop_assert_eq!(m.critical_points.len(), rs.len() - 1);
            for p in &m.critical_points {
                prop_assert!(r.domain.contains(&p.x));
            }
        }

        #[test]
        fn analysis_is_idempotent(rs in roots()) {
            let text = format!("({})/(x^2 + 1)", product(&rs));
            let analyzer = Analyzer::default();
            prop_assert_eq!(analyzer.analyze(&text), analyzer.analyze(&text));
        }
    }
}
