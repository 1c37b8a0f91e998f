//! Property-based tests for exact arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{ExactReal, Integer, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    fn rational() -> impl Strategy<Value = Rational> {
        (small_int(), non_zero_int()).prop_map(|(n, d)| Rational::from_i64(n, d))
    }

    fn radical() -> impl Strategy<Value = ExactReal> {
        (rational(), rational(), prop_oneof![Just(2i64), Just(3), Just(5), Just(6)])
            .prop_map(|(a, b, d)| ExactReal::new(a, b, Integer::new(d)).unwrap())
    }

    /// `a + b·e^r` or `a + b·ln c` with small arguments.
    fn transcendental() -> impl Strategy<Value = ExactReal> {
        let unit = prop_oneof![
            (-8i64..8, 1i64..4).prop_map(|(n, d)| ExactReal::exp_of(&Rational::from_i64(n, d)).unwrap()),
            (1i64..50, 1i64..50).prop_map(|(n, d)| ExactReal::ln_of(&Rational::from_i64(n, d)).unwrap()),
        ];
        (rational(), rational(), unit).prop_map(|(a, b, t)| {
            ExactReal::from_rational(a).checked_add(&t.scale(&b)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn rational_add_inverse(a in rational()) {
            prop_assert!((a.clone() + (-a)).is_zero());
        }

        #[test]
        fn rational_mul_inverse(a in rational()) {
            if let Some(inv) = a.checked_recip() {
                prop_assert!((a * inv).is_one());
            }
        }

        #[test]
        fn rational_distributive(a in rational(), b in rational(), c in rational()) {
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn floor_brackets_value(a in rational()) {
            let floor = Rational::from_integer(a.floor());
            prop_assert!(floor <= a);
            prop_assert!(a < floor + Rational::one());
        }

        #[test]
        fn isqrt_brackets_value(n in 0i64..1_000_000_000) {
            let n = Integer::new(n);
            let r = n.isqrt().unwrap();
            prop_assert!(&r * &r <= n);
            let next = r + Integer::one();
            prop_assert!(&next * &next > n);
        }

        #[test]
        fn radical_order_matches_float(a in radical(), b in radical()) {
            let (fa, fb) = (a.to_f64(), b.to_f64());
            if (fa - fb).abs() > 1e-9 {
                prop_assert_eq!(a < b, fa < fb);
            }
        }

        #[test]
        fn transcendental_order_matches_float(a in transcendental(), b in prop_oneof![transcendental(), radical()]) {
            let (fa, fb) = (a.to_f64(), b.to_f64());
            if (fa - fb).abs() > 1e-9 * fa.abs().max(1.0) {
                prop_assert_eq!(a < b, fa < fb);
            }
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        }

        #[test]
        fn enclosure_brackets_transcendental(a in transcendental()) {
            let (lo, hi) = a.enclosure(32);
            let (lo, hi) = (ExactReal::from_rational(lo), ExactReal::from_rational(hi));
            prop_assert!(lo <= a && a <= hi);
        }

        #[test]
        fn radical_recip_roundtrip(a in radical()) {
            if let Some(inv) = a.checked_recip() {
                let one = a.checked_mul(&inv).unwrap();
                prop_assert_eq!(one, ExactReal::from(1));
            }
        }

        #[test]
        fn rational_between_is_strictly_inside(a in radical(), b in radical()) {
            if let Some(q) = a.rational_between(&b) {
                let q = ExactReal::from_rational(q);
                let (lo, hi) = if a < b { (&a, &b) } else { (&b, &a) };
                prop_assert!(lo < &q && &q < hi);
            }
        }
    }
}
