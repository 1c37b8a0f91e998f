//! Property-based tests for polynomial arithmetic and root finding.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use curvewise_integers::{ExactReal, Rational};

    use crate::algorithms::gcd::{poly_div_rem, poly_gcd};
    use crate::algorithms::squarefree::squarefree_decomposition;
    use crate::algorithms::sturm::count_real_roots;
    use crate::dense::DensePoly;
    use crate::rational_func::RationalFunction;
    use crate::roots::real_roots;

    fn small_coeff() -> impl Strategy<Value = Rational> {
        (-20i64..20i64).prop_map(Rational::from)
    }

    fn small_poly() -> impl Strategy<Value = DensePoly> {
        proptest::collection::vec(small_coeff(), 1..=5).prop_map(DensePoly::new)
    }

    fn nonzero_poly() -> impl Strategy<Value = DensePoly> {
        small_poly().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    /// Products of linear factors with small integer roots.
    fn split_poly() -> impl Strategy<Value = (DensePoly, Vec<i64>)> {
        proptest::collection::vec(-6i64..6i64, 1..=5).prop_map(|roots| {
            let p = roots.iter().fold(DensePoly::one(), |acc, &r| {
                acc.mul(&DensePoly::from_i64s(&[-r, 1]))
            });
            (p, roots)
        })
    }

    proptest! {
        #[test]
        fn poly_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn poly_distributive(a in small_poly(), b in small_poly(), c in small_poly()) {
            prop_assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
        }

        #[test]
        fn div_rem_reconstructs(a in small_poly(), b in nonzero_poly()) {
            let (q, r) = poly_div_rem(&a, &b).unwrap();
            prop_assert_eq!(q.mul(&b).add(&r), a);
            prop_assert!(r.is_zero() || r.degree() < b.degree());
        }

        #[test]
        fn gcd_divides_both(a in nonzero_poly(), b in nonzero_poly()) {
            let g = poly_gcd(&a, &b);
            let (_, ra) = poly_div_rem(&a, &g).unwrap();
            let (_, rb) = poly_div_rem(&b, &g).unwrap();
            prop_assert!(ra.is_zero());
            prop_assert!(rb.is_zero());
        }

        #[test]
        fn squarefree_reconstructs(a in nonzero_poly()) {
            prop_assert_eq!(squarefree_decomposition(&a).to_polynomial(), a);
        }

        #[test]
        fn derivative_product_rule(a in small_poly(), b in small_poly()) {
            let left = a.mul(&b).derivative();
            let right = a.derivative().mul(&b).add(&a.mul(&b.derivative()));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn split_roots_recovered((p, mut roots) in split_poly()) {
            let found = real_roots(&p, 64).unwrap();
            roots.sort_unstable();
            roots.dedup();
            let expected: Vec<ExactReal> = roots.iter().map(|&r| ExactReal::from(r)).collect();
            let got: Vec<ExactReal> = found.iter().map(|r| r.value.clone()).collect();
            prop_assert_eq!(got, expected);
            let total: u32 = found.iter().map(|r| r.multiplicity).sum();
            prop_assert_eq!(total as usize, p.degree());
        }

        #[test]
        fn sturm_matches_split_count((p, mut roots) in split_poly()) {
            roots.sort_unstable();
            roots.dedup();
            prop_assert_eq!(count_real_roots(&p), roots.len());
        }

        #[test]
        fn rational_function_eval_consistent(
            n in small_poly(),
            d in nonzero_poly(),
            x in -10i64..10i64,
        ) {
            let x = Rational::from(x);
            let raw_den = d.eval(&x);
            if let (Some(f), Some(inv)) = (RationalFunction::new(n.clone(), d), raw_den.checked_recip()) {
                prop_assert_eq!(f.eval(&x), Some(n.eval(&x) * inv));
            }
        }
    }
}
