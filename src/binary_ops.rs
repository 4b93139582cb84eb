use crate::{
    format::Format,
    framework::{FpTraits, PairOp, Ranges, TripleOp},
    interval::{Interval, Operand},
    primitives::in_flush_band,
};

impl<F: Format> FpTraits<F> {
    pub(crate) fn addition_op() -> PairOp<impl Fn(f64, f64) -> Interval> {
        PairOp::new(|x: f64, y: f64| Self::correctly_rounded(x + y))
    }

    pub(crate) fn subtraction_op() -> PairOp<impl Fn(f64, f64) -> Interval> {
        PairOp::new(|x: f64, y: f64| Self::correctly_rounded(x - y))
    }

    /// The product is rounded and flushed again, because an implementation
    /// may flush a subnormal product before rounding.
    pub(crate) fn multiplication_op() -> PairOp<impl Fn(f64, f64) -> Interval> {
        PairOp::new(|x: f64, y: f64| {
            let inner = PairOp::new(|x: f64, y: f64| Self::correctly_rounded(x * y));
            Self::round_and_flush_pair(x, y, &inner)
        })
    }

    /// The division is only defined when the magnitude of the divisor is in
    /// the normal range and its reciprocal is too.
    fn division_op() -> PairOp<impl Fn(f64, f64) -> Interval> {
        let c = F::constants();
        let (lo, hi) = c.division_window;
        PairOp::new(|x: f64, y: f64| {
            if y == 0.0 {
                F::constants().any
            } else {
                Self::ulp_error(x / y, 2.5)
            }
        })
        .with_domain(
            Ranges::one(c.negative.min, c.positive.max),
            Ranges::two((-hi, -lo), (lo, hi)),
        )
        .with_extrema(|x, y| {
            // Discontinuity at zero.
            if y.contains(0.0) {
                (x, Interval::point(F::KIND, 0.0))
            } else {
                (x, y)
            }
        })
    }

    pub fn addition(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &Self::addition_op())
    }

    pub fn subtraction(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        Self::run_pair(
            Self::to_interval(x),
            Self::to_interval(y),
            &Self::subtraction_op(),
        )
    }

    pub fn multiplication(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        Self::run_pair(
            Self::to_interval(x),
            Self::to_interval(y),
            &Self::multiplication_op(),
        )
    }

    /// `x / y` within 2.5 ULP.
    pub fn division(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &Self::division_op())
    }

    /**
    Four quadrant arctangent of `y / x` within 4096 ULP. `y` must be normal,
    and `x` is restricted to the same window as a divisor. When `y` can be
    zero the sign of the zero decides the quadrant, so the extrema collapse
    it to exactly zero, which is outside the domain.
    */
    pub fn atan2(y: impl Into<Operand>, x: impl Into<Operand>) -> Interval {
        let c = F::constants();
        let (lo, hi) = c.division_window;
        let op = PairOp::new(|y: f64, x: f64| {
            let pi = F::constants().positive.pi.whole;
            let atan = (y / x).atan();
            if x > 0.0 {
                Self::ulp_error(atan, 4096.0)
            } else if y > 0.0 {
                Self::ulp_error(atan + pi, 4096.0)
            } else {
                Self::ulp_error(atan - pi, 4096.0)
            }
        })
        .with_domain(
            Ranges::two(
                (c.negative.min, c.negative.max),
                (c.positive.min, c.positive.max),
            ),
            Ranges::two((-hi, -lo), (lo, hi)),
        )
        .with_extrema(|y, x| {
            let zero = Interval::point(F::KIND, 0.0);
            match (y.contains(0.0), x.contains(0.0)) {
                (true, true) => (zero, zero),
                (true, false) => (zero, x),
                _ => (y, x),
            }
        });
        Self::run_pair(Self::to_interval(y), Self::to_interval(x), &op)
    }

    /**
    `e1 * 2^e2`, correctly rounded. The exponent window is the one where
    every integer exponent gives a normal power of two. The inputs are
    rounded and flushed directly rather than checked for finiteness first,
    so an `e1` outside the range of the format is still rounded.
    */
    pub fn ldexp(e1: f64, e2: f64) -> Interval {
        let c = F::constants();
        let (lo, hi) = c.ldexp_exponents;
        let op = PairOp::new(|e1: f64, e2: f64| {
            let result = e1 * 2f64.powf(e2);
            if result.is_nan() {
                F::constants().any
            } else {
                Self::correctly_rounded(result)
            }
        })
        .with_domain(
            Ranges::one(c.negative.min, c.positive.max),
            Ranges::one(lo, hi),
        );
        Self::round_and_flush_pair(e1, e2, &op)
    }

    /// `exp2(y * log2(x))`. Inherits the domain of `log2`.
    pub fn pow(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        let op = PairOp::new(|x: f64, y: f64| {
            Self::exp2(Self::multiplication(y, Self::log2(x)))
        });
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &op)
    }

    /// `x - y * trunc(x / y)`
    pub fn remainder(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        let op = PairOp::new(|x: f64, y: f64| {
            Self::subtraction(
                x,
                Self::multiplication(y, Self::trunc(Self::division(x, y))),
            )
        });
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &op)
    }

    /// 1 if `edge <= x`, otherwise 0. When rounding makes both possible the
    /// result is `[0, 1]`, which means either value but nothing in between.
    pub fn step(edge: impl Into<Operand>, x: impl Into<Operand>) -> Interval {
        let op = PairOp::new(|edge: f64, x: f64| {
            Self::correctly_rounded(if edge <= x { 1.0 } else { 0.0 })
        });
        Self::run_pair(Self::to_interval(edge), Self::to_interval(x), &op)
    }

    /// When both inputs are zero or subnormal an implementation may return
    /// either of them.
    pub fn max(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        let op = PairOp::new(|x: f64, y: f64| {
            if in_flush_band::<F>(x) && in_flush_band::<F>(y) {
                Self::correctly_rounded(Interval::new(F::KIND, x.min(y), x.max(y)))
            } else {
                Self::correctly_rounded(x.max(y))
            }
        });
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &op)
    }

    pub fn min(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        let op = PairOp::new(|x: f64, y: f64| {
            if in_flush_band::<F>(x) && in_flush_band::<F>(y) {
                Self::correctly_rounded(Interval::new(F::KIND, x.min(y), x.max(y)))
            } else {
                Self::correctly_rounded(x.min(y))
            }
        });
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &op)
    }

    /// Distance between two scalars, `length(x - y)`.
    pub fn distance(x: impl Into<Operand>, y: impl Into<Operand>) -> Interval {
        let op = PairOp::new(|x: f64, y: f64| Self::length(Self::subtraction(x, y)));
        Self::run_pair(Self::to_interval(x), Self::to_interval(y), &op)
    }

    pub fn clamp_median(
        x: impl Into<Operand>,
        y: impl Into<Operand>,
        z: impl Into<Operand>,
    ) -> Interval {
        let op = TripleOp::new(|x: f64, y: f64, z: f64| {
            let mut sorted = [x, y, z];
            sorted.sort_by(f64::total_cmp);
            Self::correctly_rounded(sorted[1])
        });
        Self::run_triple(
            Self::to_interval(x),
            Self::to_interval(y),
            Self::to_interval(z),
            &op,
        )
    }

    fn clamp_min_max_op() -> TripleOp<impl Fn(f64, f64, f64) -> Interval> {
        TripleOp::new(|x: f64, low: f64, high: f64| Self::min(Self::max(x, low), high))
    }

    pub fn clamp_min_max(
        x: impl Into<Operand>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Interval {
        Self::run_triple(
            Self::to_interval(x),
            Self::to_interval(low),
            Self::to_interval(high),
            &Self::clamp_min_max_op(),
        )
    }

    /// Both ways of computing clamp are acceptable.
    pub fn clamp_intervals() -> [fn(f64, f64, f64) -> Interval; 2] {
        [
            |x, y, z| Self::clamp_median(x, y, z),
            |x, y, z| Self::clamp_min_max(x, y, z),
        ]
    }

    pub fn saturate(x: impl Into<Operand>) -> Interval {
        Self::run_triple(
            Self::to_interval(x),
            Self::to_interval(0.0),
            Self::to_interval(1.0),
            &Self::clamp_min_max_op(),
        )
    }

    /// `x * y + z`
    pub fn fma(x: impl Into<Operand>, y: impl Into<Operand>, z: impl Into<Operand>) -> Interval {
        let op = TripleOp::new(|x: f64, y: f64, z: f64| {
            Self::addition(Self::multiplication(x, y), z)
        });
        Self::run_triple(
            Self::to_interval(x),
            Self::to_interval(y),
            Self::to_interval(z),
            &op,
        )
    }

    /// `x + (y - x) * z`
    pub fn mix_imprecise(
        x: impl Into<Operand>,
        y: impl Into<Operand>,
        z: impl Into<Operand>,
    ) -> Interval {
        let op = TripleOp::new(|x: f64, y: f64, z: f64| {
            Self::addition(x, Self::multiplication(Self::subtraction(y, x), z))
        });
        Self::run_triple(
            Self::to_interval(x),
            Self::to_interval(y),
            Self::to_interval(z),
            &op,
        )
    }

    /// `x * (1 - z) + y * z`
    pub fn mix_precise(
        x: impl Into<Operand>,
        y: impl Into<Operand>,
        z: impl Into<Operand>,
    ) -> Interval {
        let op = TripleOp::new(|x: f64, y: f64, z: f64| {
            let t = Self::multiplication(x, Self::subtraction(1.0, z));
            let s = Self::multiplication(y, z);
            Self::addition(t, s)
        });
        Self::run_triple(
            Self::to_interval(x),
            Self::to_interval(y),
            Self::to_interval(z),
            &op,
        )
    }

    pub fn mix_intervals() -> [fn(f64, f64, f64) -> Interval; 2] {
        [
            |x, y, z| Self::mix_imprecise(x, y, z),
            |x, y, z| Self::mix_precise(x, y, z),
        ]
    }

    /// `t * t * (3 - 2 * t)` where `t = clamp((x - low) / (high - low), 0, 1)`.
    pub fn smooth_step(
        low: impl Into<Operand>,
        high: impl Into<Operand>,
        x: impl Into<Operand>,
    ) -> Interval {
        let op = TripleOp::new(|low: f64, high: f64, x: f64| {
            let t = Self::clamp_median(
                Self::division(Self::subtraction(x, low), Self::subtraction(high, low)),
                0.0,
                1.0,
            );
            Self::multiplication(
                t,
                Self::multiplication(t, Self::subtraction(3.0, Self::multiplication(2.0, t))),
            )
        });
        Self::run_triple(
            Self::to_interval(low),
            Self::to_interval(high),
            Self::to_interval(x),
            &op,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::{F16, F32, Kind};

    type FP = FpTraits<F32>;

    fn f32_bits(bits: u32) -> f64 {
        f32::from_bits(bits) as f64
    }

    fn interval(begin: f64, end: f64) -> Interval {
        Interval::new(Kind::F32, begin, end)
    }

    fn point(x: f64) -> Interval {
        Interval::point(Kind::F32, x)
    }

    fn any() -> Interval {
        Interval::any(Kind::F32)
    }

    #[test]
    fn t_addition_subtraction() {
        let c = F32::constants();
        assert_eq!(FP::addition(1.0, 2.0), point(3.0));
        assert_eq!(FP::subtraction(1.0, 2.0), point(-1.0));
        assert_eq!(FP::addition(c.positive.max, c.positive.max), any());
        assert_eq!(FP::subtraction(c.negative.min, c.positive.max), any());
        // Not representable, so both neighbours are acceptable.
        assert_eq!(
            FP::addition(1.0, f32_bits(0x3380_0000)),
            interval(1.0, f32_bits(0x3f80_0001))
        );
        let sub = c.positive.subnormal.max;
        assert_eq!(FP::addition(sub, 0.0), interval(0.0, sub));
        assert_eq!(FP::addition(interval(1.0, 2.0), 1.0), interval(2.0, 3.0));
    }

    #[test]
    fn t_multiplication() {
        let c = F32::constants();
        assert_eq!(FP::multiplication(2.0, 3.0), point(6.0));
        assert_eq!(FP::multiplication(-2.0, 3.0), point(-6.0));
        assert_eq!(FP::multiplication(c.positive.max, 2.0), any());
        // The product of two normals can be subnormal, and then flushed.
        let product = FP::multiplication(c.positive.min, 0.5);
        assert_eq!(product, interval(0.0, c.positive.min * 0.5));
        assert_eq!(
            FP::multiplication(interval(-1.0, 2.0), interval(3.0, 4.0)),
            interval(-4.0, 8.0)
        );
    }

    #[test]
    fn t_division() {
        let c = F32::constants();
        assert_eq!(FP::division(1.0, 0.0), any());
        assert_eq!(FP::division(1.0, c.positive.subnormal.min), any());
        assert_eq!(FP::division(1.0, interval(-1.0, 1.0)), any());
        assert_eq!(FP::division(1.0, 2f64.powi(127)), any());
        let result = FP::division(1.0, 2.0);
        assert!(result.contains(0.5));
        assert!(!result.is_point());
        assert!(FP::division(-6.0, 3.0).contains(-2.0));
    }

    #[test]
    fn t_atan2() {
        let c = F32::constants();
        assert_eq!(FP::atan2(0.0, 0.0), any());
        assert_eq!(FP::atan2(0.0, 1.0), any());
        assert_eq!(FP::atan2(c.positive.subnormal.max, 1.0), any());
        let result = FP::atan2(0.0, -1.0);
        assert!(result.contains(c.positive.pi.whole));
        assert!(result.contains(c.negative.pi.whole));
        assert!(FP::atan2(1.0, 1.0).contains(c.positive.pi.quarter));
        assert!(FP::atan2(1.0, -1.0).contains(c.positive.pi.three_quarters));
        assert!(FP::atan2(-1.0, -1.0).contains(c.negative.pi.three_quarters));
        assert!(FP::atan2(1.0, 0.0).is_any());
    }

    #[test]
    fn t_ldexp() {
        let c = F32::constants();
        assert_eq!(FP::ldexp(1.0, 0.0), point(1.0));
        assert_eq!(FP::ldexp(3.0, 2.0), point(12.0));
        assert_eq!(FP::ldexp(1.0, -126.0), point(c.positive.min));
        assert_eq!(FP::ldexp(1.0, 128.0), any());
        assert_eq!(FP::ldexp(1.0, 129.0), any());
        assert_eq!(FP::ldexp(1.0, -127.0), any());
        assert_eq!(FP::ldexp(0.1, 1.0), FP::correctly_rounded(0.2));
    }

    #[test]
    fn t_pow() {
        assert!(FP::pow(2.0, 3.0).contains(8.0));
        assert!(FP::pow(4.0, 0.5).contains(2.0));
        // The error of exp2 is inherited, even for exact powers.
        let p = FP::pow(2.0, 10.0);
        assert!(p.contains(1024.0 - 2f64.powi(-13)));
        assert!(p.contains(1024.0 + 2f64.powi(-13)));
        assert_eq!(FP::pow(-2.0, 2.0), any());
        assert_eq!(FP::pow(0.0, 2.0), any());
    }

    #[test]
    fn t_remainder() {
        assert!(FP::remainder(7.0, 3.0).contains(1.0));
        assert!(FP::remainder(-7.0, 3.0).contains(-1.0));
        assert_eq!(FP::remainder(1.0, 0.0), any());
    }

    #[test]
    fn t_step() {
        assert_eq!(FP::step(0.0, 1.0), point(1.0));
        assert_eq!(FP::step(1.0, 0.0), point(0.0));
        assert_eq!(FP::step(1.0, 1.0), point(1.0));
        // Rounding of the inputs decides the result.
        assert_eq!(FP::step(0.1, 0.1), interval(0.0, 1.0));
    }

    #[test]
    fn t_max_min() {
        let c = F32::constants();
        let sub = c.positive.subnormal.max;
        assert_eq!(FP::max(1.0, 0.0), point(1.0));
        assert_eq!(FP::max(sub, 0.0), interval(0.0, sub));
        assert_eq!(FP::max(0.0, sub), interval(0.0, sub));
        assert_eq!(FP::min(1.0, 0.0), point(0.0));
        assert_eq!(FP::min(-sub, 0.0), interval(-sub, 0.0));
        assert_eq!(FP::max(-1.0, interval(-2.0, 3.0)), interval(-1.0, 3.0));
        assert_eq!(FP::min(c.positive.max, f64::INFINITY), any());
    }

    #[test]
    fn t_distance_scalar() {
        assert!(FP::distance(3.0, 1.0).contains(2.0));
        assert!(FP::distance(1.0, 3.0).contains(2.0));
        assert_eq!(FP::distance(0.0, 0.0), any());
    }

    #[test]
    fn t_clamp() {
        for clamp in FP::clamp_intervals() {
            assert_eq!(clamp(0.5, 0.0, 1.0), point(0.5));
            assert_eq!(clamp(-1.0, 0.0, 1.0), point(0.0));
            assert_eq!(clamp(2.0, 0.0, 1.0), point(1.0));
        }
        // Low above high gives different answers.
        assert_eq!(FP::clamp_median(0.5, 1.0, 0.0), point(0.5));
        assert_eq!(FP::clamp_min_max(0.5, 1.0, 0.0), point(0.0));
        assert_eq!(FP::saturate(-2.0), point(0.0));
        assert_eq!(FP::saturate(0.25), point(0.25));
        assert_eq!(FP::saturate(5.0), point(1.0));
    }

    #[test]
    fn t_fma() {
        assert_eq!(FP::fma(2.0, 3.0, 1.0), point(7.0));
        assert_eq!(FP::fma(F32::constants().positive.max, 2.0, 0.0), any());
    }

    #[test]
    fn t_mix() {
        for mix in FP::mix_intervals() {
            assert_eq!(mix(0.0, 1.0, 0.5), point(0.5));
            assert_eq!(mix(2.0, 4.0, 0.0), point(2.0));
            assert_eq!(mix(2.0, 4.0, 1.0), point(4.0));
        }
    }

    #[test]
    fn t_smooth_step() {
        // The division carries error, so `t` is not exactly zero.
        let result = FP::smooth_step(0.0, 1.0, 0.0);
        assert!(result.contains(0.0));
        assert!(result.end() < 1e-30);
        assert!(FP::smooth_step(0.0, 1.0, 1.0).contains(1.0));
        assert!(FP::smooth_step(0.0, 2.0, 1.0).contains(0.5));
        assert_eq!(FP::smooth_step(1.0, 1.0, 1.0), any());
    }

    #[test]
    fn t_half_precision() {
        type FH = FpTraits<F16>;
        assert_eq!(FH::addition(1.0, 2.0), Interval::point(Kind::F16, 3.0));
        assert_eq!(FH::multiplication(300.0, 300.0), Interval::any(Kind::F16));
        assert_eq!(FH::division(1.0, 0.0), Interval::any(Kind::F16));
        assert!(FH::division(1.0, 3.0).contains(1.0 / 3.0));
        assert_eq!(FH::ldexp(1.0, 16.0), Interval::any(Kind::F16));
        assert_eq!(FH::ldexp(1.0, 15.0), Interval::point(Kind::F16, 32768.0));
    }
}
