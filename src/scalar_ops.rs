use crate::{
    format::{F16, Format},
    framework::{FpTraits, Ranges, ScalarOp},
    interval::{Interval, Operand},
    matrix::Matrix,
    primitives::{
        FlushMode, add_flushed_if_needed, correctly_rounded_candidates, flush_subnormal, is_finite,
        one_ulp,
    },
};

/// The parts of `modf`. Both carry the sign of the input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Modf {
    pub fract: Interval,
    pub whole: Interval,
}

impl<F: Format> FpTraits<F> {
    pub(crate) fn to_interval(x: impl Into<Operand>) -> Interval {
        x.into().to_interval::<F>()
    }

    /// Interval of the correct roundings of `x`, including the flushed value
    /// of any subnormal rounding.
    pub fn correctly_rounded(x: impl Into<Operand>) -> Interval {
        Self::run_scalar(
            Self::to_interval(x),
            &ScalarOp::new(Interval::correctly_rounded::<F>),
        )
    }

    pub fn correctly_rounded_matrix(m: &Matrix<f64>) -> Matrix<Interval> {
        m.map(|e| Self::correctly_rounded(e))
    }

    /// `[x - error, x + error]`. Any if the error is not finite in this format.
    pub fn absolute_error(x: f64, error: f64) -> Interval {
        let error = error.abs();
        let finite = is_finite::<F>(error);
        let op = ScalarOp::new(move |n: f64| {
            if finite {
                Interval::new(F::KIND, n - error, n + error)
            } else {
                F::constants().any
            }
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /**
    `[x - ulps * ulp(x), x + ulps * ulp(x)]`. Each bound is widened to include
    its flushed value when it is subnormal. The ULP is the larger of the
    flushed and unflushed ULPs.
    */
    pub fn ulp_error(x: f64, ulps: f64) -> Interval {
        let ulps = ulps.abs();
        let finite = is_finite::<F>(ulps);
        let op = ScalarOp::new(move |n: f64| {
            if !finite {
                return F::constants().any;
            }
            let ulp = one_ulp::<F>(n, FlushMode::Either);
            let begin = n - ulps * ulp;
            let end = n + ulps * ulp;
            Interval::new(
                F::KIND,
                f64::min(begin, flush_subnormal::<F>(begin)),
                f64::max(end, flush_subnormal::<F>(end)),
            )
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn abs(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::correctly_rounded(n.abs()));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Either `atan2(sqrt(1 - x^2), x)` or a polynomial approximation.
    pub fn acos(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let y = Self::sqrt(Self::subtraction(1.0, Self::multiplication(n, n)));
            Self::atan2(y, n).hull(Self::absolute_error(n.acos(), 6.77e-5))
        })
        .with_domain(Ranges::one(-1.0, 1.0));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Either `atan2(x, sqrt(1 - x^2))` or a polynomial approximation.
    pub fn asin(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let x = Self::sqrt(Self::subtraction(1.0, Self::multiplication(n, n)));
            Self::atan2(n, x).hull(Self::absolute_error(n.asin(), 6.77e-5))
        })
        .with_domain(Ranges::one(-1.0, 1.0));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `log(x + sqrt((x + 1) * (x - 1)))`
    pub fn acosh_alternative(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let inner = Self::multiplication(Self::addition(n, 1.0), Self::subtraction(n, 1.0));
            Self::log(Self::addition(n, Self::sqrt(inner)))
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `log(x + sqrt(x * x - 1))`
    pub fn acosh_primary(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let inner = Self::subtraction(Self::multiplication(n, n), 1.0);
            Self::log(Self::addition(n, Self::sqrt(inner)))
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Every accepted formulation of acosh. A result is correct if any of them
    /// contain it.
    pub fn acosh_intervals() -> [fn(f64) -> Interval; 2] {
        [
            |x| Self::acosh_alternative(x),
            |x| Self::acosh_primary(x),
        ]
    }

    /// `log(x + sqrt(x * x + 1))`
    pub fn asinh(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let inner = Self::addition(Self::multiplication(n, n), 1.0);
            Self::log(Self::addition(n, Self::sqrt(inner)))
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn atan(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::ulp_error(n.atan(), 4096.0));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `log((1 + x) / (1 - x)) * 0.5`
    pub fn atanh(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let numerator = Self::addition(1.0, n);
            let denominator = Self::subtraction(1.0, n);
            Self::multiplication(Self::log(Self::division(numerator, denominator)), 0.5)
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn ceil(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::correctly_rounded(n.ceil()));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn floor(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::correctly_rounded(n.floor()));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn trunc(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::correctly_rounded(n.trunc()));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Round to the nearest integer, ties to even.
    pub fn round(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let k = n.floor();
            let before = n - k;
            let after = k + 1.0 - n;
            let rounded = if before < after {
                k
            } else if before > after {
                k + 1.0
            } else if k % 2.0 == 0.0 {
                k
            } else {
                k + 1.0
            };
            Self::correctly_rounded(rounded)
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn cos(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::absolute_error(n.cos(), 2f64.powi(-11)))
            .with_domain(Ranges::from_interval(F::constants().neg_pi_to_pi));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn sin(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::absolute_error(n.sin(), 2f64.powi(-11)))
            .with_domain(Ranges::from_interval(F::constants().neg_pi_to_pi));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `(exp(x) + exp(-x)) * 0.5`
    pub fn cosh(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let sum = Self::addition(Self::exp(n), Self::exp(Self::negation(n)));
            Self::multiplication(sum, 0.5)
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `(exp(x) - exp(-x)) * 0.5`
    pub fn sinh(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let diff = Self::subtraction(Self::exp(n), Self::exp(Self::negation(n)));
            Self::multiplication(diff, 0.5)
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn tan(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::division(Self::sin(n), Self::cos(n)));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn tanh(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::division(Self::sinh(n), Self::cosh(n)));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn degrees(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::multiplication(n, 57.295_779_513_082_32));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn radians(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::multiplication(n, 0.017_453_292_519_943_295));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// The allowed error grows with the magnitude of the input.
    pub fn exp(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::ulp_error(n.exp(), 3.0 + 2.0 * n.abs()));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `3 + 2|x|` ULP, except at 0 and 1 where the result is exact.
    pub fn exp2(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            if n == 0.0 || n == 1.0 {
                Self::correctly_rounded(2f64.powf(n))
            } else {
                Self::ulp_error(2f64.powf(n), 3.0 + 2.0 * n.abs())
            }
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Absolute error near 1, where the result is close to zero, and ULP
    /// error elsewhere.
    pub fn log(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            if (0.5..=2.0).contains(&n) {
                Self::absolute_error(n.ln(), 2f64.powi(-21))
            } else {
                Self::ulp_error(n.ln(), 3.0)
            }
        })
        .with_domain(Ranges::from_interval(F::constants().greater_than_zero));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn log2(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            if (0.5..=2.0).contains(&n) {
                Self::absolute_error(n.log2(), 2f64.powi(-21))
            } else {
                Self::ulp_error(n.log2(), 3.0)
            }
        })
        .with_domain(Ranges::from_interval(F::constants().greater_than_zero));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn inverse_sqrt(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::ulp_error(1.0 / n.sqrt(), 2.0))
            .with_domain(Ranges::from_interval(F::constants().greater_than_zero));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// `1 / inverse_sqrt(x)`
    pub fn sqrt(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::division(1.0, Self::inverse_sqrt(n)));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /**
    `x - floor(x)`. Tiny negative inputs can produce exactly 1 through
    cancellation, so implementations that clamp to the largest value below 1
    are also accepted.
    */
    pub fn fract(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let result = Self::subtraction(n, Self::floor(n));
            if result.contains(1.0) {
                result.hull(Self::correctly_rounded(
                    F::constants().positive.less_than_one,
                ))
            } else {
                result
            }
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn modf(x: f64) -> Modf {
        let fract = x % 1.0;
        Modf {
            fract: Self::correctly_rounded(fract),
            whole: Self::correctly_rounded(x - fract),
        }
    }

    pub fn negation(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::correctly_rounded(-n));
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Round to 16 bit precision, allowing the flushed value of subnormal
    /// halves, and express the result in this format.
    pub fn quantize_to_f16(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            let values = add_flushed_if_needed::<F16>(correctly_rounded_candidates::<F16>(n));
            values[1..]
                .iter()
                .fold(Self::correctly_rounded(values[0]), |acc, v| {
                    acc.hull(Self::correctly_rounded(*v))
                })
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    pub fn sign(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| {
            Self::correctly_rounded(if n > 0.0 {
                1.0
            } else if n < 0.0 {
                -1.0
            } else {
                0.0
            })
        });
        Self::run_scalar(Self::to_interval(x), &op)
    }

    /// Length of a scalar, `sqrt(x * x)`.
    pub fn length(x: impl Into<Operand>) -> Interval {
        let op = ScalarOp::new(|n: f64| Self::sqrt(Self::multiplication(n, n)));
        Self::run_scalar(Self::to_interval(x), &op)
    }
}
