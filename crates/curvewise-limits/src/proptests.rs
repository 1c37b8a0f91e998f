//! Property-based tests for limits at infinity.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use curvewise_core::Expr;
    use curvewise_integers::Rational;

    use crate::{compute_limit, Limit, LimitResult};

    /// Coefficients (constant term first) with a non-zero leading entry.
    fn coeffs() -> impl Strategy<Value = Vec<i64>> {
        (proptest::collection::vec(-6i64..7, 0..4), 1i64..7, any::<bool>()).prop_map(
            |(mut lower, lead, negative)| {
                lower.push(if negative { -lead } else { lead });
                lower
            },
        )
    }

    fn poly(cs: &[i64]) -> Expr {
        let x = Expr::var("x");
        Expr::add(
            cs.iter()
                .enumerate()
                .map(|(k, &c)| Expr::mul([Expr::integer(c), Expr::powi(x.clone(), k as i64)])),
        )
    }

    fn expected(num: &[i64], den: &[i64], direction: Limit) -> LimitResult {
        let (n_lead, d_lead) = (num[num.len() - 1], den[den.len() - 1]);
        let diff = num.len() as i64 - den.len() as i64;
        match diff.cmp(&0) {
            std::cmp::Ordering::Less => LimitResult::Finite(Expr::zero()),
            std::cmp::Ordering::Equal => {
                LimitResult::Finite(Expr::number(Rational::from_i64(n_lead, d_lead)))
            }
            std::cmp::Ordering::Greater => {
                let mut sign = (n_lead * d_lead).signum();
                if direction == Limit::NegInfinity && diff % 2 == 1 {
                    sign = -sign;
                }
                if sign > 0 {
                    LimitResult::PosInfinity
                } else {
                    LimitResult::NegInfinity
                }
            }
        }
    }

    proptest! {
        #[test]
        fn rational_limits_follow_degrees(num in coeffs(), den in coeffs()) {
            let f = poly(&num).div(&poly(&den));
            for direction in [Limit::PosInfinity, Limit::NegInfinity] {
                prop_assert_eq!(compute_limit(&f, direction).unwrap(), expected(&num, &den, direction));
            }
        }

        #[test]
        fn negative_infinity_is_reflection(num in coeffs(), k in 1i64..4) {
            // x^k·exp(x) + p(x), with the exponential decaying at −∞
            let x = Expr::var("x");
            let f = Expr::add([
                Expr::mul([Expr::powi(x.clone(), k), Expr::func(curvewise_core::Function::Exp, x.clone())]),
                poly(&num),
            ]);
            let reflected = f.substitute(&x.neg());
            prop_assert_eq!(
                compute_limit(&f, Limit::NegInfinity).unwrap(),
                compute_limit(&reflected, Limit::PosInfinity).unwrap()
            );
        }

        #[test]
        fn exponential_decay_beats_polynomials(num in coeffs()) {
            let x = Expr::var("x");
            let f = Expr::mul([poly(&num), Expr::func(curvewise_core::Function::Exp, x.neg())]);
            prop_assert_eq!(compute_limit(&f, Limit::PosInfinity).unwrap(), LimitResult::Finite(Expr::zero()));
        }
    }
}
