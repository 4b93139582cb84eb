use crate::{error::Error, interval::Interval};

impl TryFrom<Interval> for inari::Interval {
    type Error = Error;

    fn try_from(value: Interval) -> Result<Self, Error> {
        if value.is_any() {
            return Ok(inari::Interval::ENTIRE);
        }
        inari::interval!(value.begin(), value.end()).map_err(|_| Error::InvalidInterval)
    }
}

impl Interval {
    /// Check if the rigorous enclosure `exact` of a mathematical result lies
    /// within this acceptance interval.
    pub fn encloses(&self, exact: inari::Interval) -> Result<bool, Error> {
        Ok(exact.subset(inari::Interval::try_from(*self)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        format::{F16, F32, Kind},
        framework::FpTraits,
        test::check_encloses,
    };

    type FP = FpTraits<F32>;

    #[test]
    fn t_try_from() {
        let i = inari::Interval::try_from(Interval::new(Kind::F32, -1.0, 2.0)).unwrap();
        assert_eq!(i.inf(), -1.0);
        assert_eq!(i.sup(), 2.0);
        assert_eq!(
            inari::Interval::try_from(Interval::any(Kind::F16)),
            Ok(inari::Interval::ENTIRE)
        );
        let half_open =
            inari::Interval::try_from(Interval::new(Kind::F32, 1.0, f64::INFINITY)).unwrap();
        assert_eq!(half_open.sup(), f64::INFINITY);
        assert_eq!(
            inari::Interval::try_from(Interval::point(Kind::F32, f64::INFINITY)),
            Err(Error::InvalidInterval)
        );
    }

    #[test]
    fn t_encloses() {
        let third = inari::interval!(1.0, 1.0).unwrap() / inari::interval!(3.0, 3.0).unwrap();
        assert_eq!(FP::division(1.0, 3.0).encloses(third), Ok(true));
        assert_eq!(FP::correctly_rounded(0.5).encloses(third), Ok(false));
        assert_eq!(Interval::any(Kind::F32).encloses(third), Ok(true));
    }

    #[test]
    fn t_scalar_enclosures() {
        check_encloses::<F32>(|x| FP::sin(x[0]), |x| x[0].sin(), &[(-3.0, 3.0)], 256);
        check_encloses::<F32>(|x| FP::cos(x[0]), |x| x[0].cos(), &[(-3.0, 3.0)], 256);
        check_encloses::<F32>(|x| FP::exp(x[0]), |x| x[0].exp(), &[(-10.0, 10.0)], 256);
        check_encloses::<F32>(|x| FP::exp2(x[0]), |x| x[0].exp2(), &[(-10.0, 10.0)], 256);
        check_encloses::<F32>(|x| FP::log(x[0]), |x| x[0].ln(), &[(0.01, 100.0)], 256);
        check_encloses::<F32>(|x| FP::log2(x[0]), |x| x[0].log2(), &[(0.01, 100.0)], 256);
        check_encloses::<F32>(|x| FP::sqrt(x[0]), |x| x[0].sqrt(), &[(0.01, 1000.0)], 256);
        check_encloses::<F32>(|x| FP::atan(x[0]), |x| x[0].atan(), &[(-100.0, 100.0)], 256);
        check_encloses::<F32>(|x| FP::tanh(x[0]), |x| x[0].tanh(), &[(-5.0, 5.0)], 256);
    }

    #[test]
    fn t_pair_enclosures() {
        check_encloses::<F32>(
            |x| FP::division(x[0], x[1]),
            |x| x[0] / x[1],
            &[(-100.0, 100.0), (0.5, 100.0)],
            32,
        );
        check_encloses::<F32>(
            |x| FP::multiplication(x[0], x[1]),
            |x| x[0] * x[1],
            &[(-1e10, 1e10), (-1e10, 1e10)],
            32,
        );
        check_encloses::<F32>(
            |x| FP::atan2(x[0], x[1]),
            |x| x[0].atan2(x[1]),
            &[(0.5, 10.0), (0.5, 10.0)],
            32,
        );
        check_encloses::<F32>(
            |x| FP::pow(x[0], x[1]),
            |x| x[0].pow(x[1]),
            &[(0.5, 4.0), (-2.0, 2.0)],
            32,
        );
    }

    #[test]
    fn t_half_enclosures() {
        type FH = FpTraits<F16>;
        check_encloses::<F16>(|x| FH::exp(x[0]), |x| x[0].exp(), &[(-4.0, 4.0)], 128);
        check_encloses::<F16>(
            |x| FH::addition(x[0], x[1]),
            |x| x[0] + x[1],
            &[(-100.0, 100.0), (-100.0, 100.0)],
            32,
        );
    }
}
