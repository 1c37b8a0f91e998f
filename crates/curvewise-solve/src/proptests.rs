//! Property-based tests for domains and solving.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use curvewise_core::convert::from_polynomial;
    use curvewise_core::Expr;
    use curvewise_integers::ExactReal;
    use curvewise_poly::DensePoly;

    use crate::domain::Domain;
    use crate::interval::{Bound, Interval};
    use crate::solve::solve_real;

    fn bound() -> impl Strategy<Value = Bound> {
        prop_oneof![
            1 => Just(Bound::NegInfinity),
            6 => (-8i64..8).prop_map(Bound::int),
            1 => Just(Bound::PosInfinity),
        ]
    }

    fn interval() -> impl Strategy<Value = Option<Interval>> {
        (bound(), bound(), any::<bool>(), any::<bool>())
            .prop_map(|(a, b, lo, hi)| Interval::new(a, b, lo, hi))
    }

    fn domain() -> impl Strategy<Value = Domain> {
        proptest::collection::vec(interval(), 0..6)
            .prop_map(|v| Domain::from_intervals(v.into_iter().flatten()))
    }

    fn points() -> impl Strategy<Value = Vec<ExactReal>> {
        proptest::collection::vec((-16i64..16).prop_map(|n| ExactReal::from(n)), 0..6)
    }

    fn sample(n: i64) -> ExactReal {
        ExactReal::from(curvewise_integers::Rational::from_i64(n, 2))
    }

    proptest! {
        #[test]
        fn domains_are_sorted_and_unmergeable(d in domain()) {
            for pair in d.intervals().windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.end() <= b.start());
                // touching only where both sides exclude the point
                if a.end() == b.start() {
                    prop_assert!(a.end_open() && b.start_open());
                }
            }
        }

        #[test]
        fn union_membership(a in domain(), b in domain(), n in -20i64..20) {
            let v = sample(n);
            prop_assert_eq!(a.union(&b).contains(&v), a.contains(&v) || b.contains(&v));
            prop_assert_eq!(a.intersect(&b).contains(&v), a.contains(&v) && b.contains(&v));
        }

        #[test]
        fn removed_points_are_excluded(d in domain(), cut in points(), n in -20i64..20) {
            let removed = d.remove_points(&cut);
            let v = sample(n);
            prop_assert_eq!(removed.contains(&v), d.contains(&v) && !cut.contains(&v));
        }

        #[test]
        fn representative_lies_inside(d in domain(), cut in points()) {
            for piece in d.remove_points(&cut).iter() {
                let r = piece.representative();
                prop_assert!(piece.contains_interior(&r), "{} not inside {}", r, piece);
            }
        }

        #[test]
        fn split_polynomial_roots_are_found(roots in proptest::collection::vec(-5i64..6, 1..5)) {
            let p = roots
                .iter()
                .fold(DensePoly::one(), |acc, &r| acc.mul(&DensePoly::from_i64s(&[-r, 1])));
            let expr: Expr = from_polynomial(&p, "x");
            let mut expected: Vec<ExactReal> = roots.iter().map(|&r| ExactReal::from(r)).collect();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(solve_real(&expr).unwrap(), expected);
        }
    }
}
