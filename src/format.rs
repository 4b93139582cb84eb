use crate::{interval::Interval, matrix::Matrix};
use std::{
    f64::consts::{E, PI},
    sync::LazyLock,
};

/// The floating point formats for which acceptance intervals can be computed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    F32,
    F16,
    /// Unbounded precision, modelled with a 64-bit double.
    Abstract,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::F32, Kind::F16, Kind::Abstract];

    pub fn constants(&self) -> &'static Constants {
        match self {
            Kind::F32 => F32::constants(),
            Kind::F16 => F16::constants(),
            Kind::Abstract => Abstract::constants(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::F32 => "f32",
            Kind::F16 => "f16",
            Kind::Abstract => "abstract",
        }
    }

    /// Is `x` within the finite range of this format.
    pub fn is_finite(&self, x: f64) -> bool {
        let c = self.constants();
        x >= c.negative.min && x <= c.positive.max
    }

    /// Round `x` to the nearest value representable in this format.
    pub fn quantize(&self, x: f64) -> f64 {
        match self {
            Kind::F32 => F32::quantize(x),
            Kind::F16 => F16::quantize(x),
            Kind::Abstract => Abstract::quantize(x),
        }
    }

    pub fn encode(&self, x: f64) -> u64 {
        match self {
            Kind::F32 => F32::encode(x),
            Kind::F16 => F16::encode(x),
            Kind::Abstract => Abstract::encode(x),
        }
    }

    pub fn decode(&self, bits: u64) -> f64 {
        match self {
            Kind::F32 => F32::decode(bits),
            Kind::F16 => F16::decode(bits),
            Kind::Abstract => Abstract::decode(bits),
        }
    }
}

/**
Description of a binary floating point format. Everything the primitives need
to know about a format is derived from the widths of the mantissa and the
exponent, and the two conversion functions.
*/
pub trait Format: Copy + 'static {
    const KIND: Kind;
    const MANTISSA_BITS: u32;
    const EXPONENT_BITS: u32;

    const BITS: u32 = Self::MANTISSA_BITS + Self::EXPONENT_BITS + 1;
    const BIAS: i32 = (1 << (Self::EXPONENT_BITS - 1)) - 1;
    const SIGN_MASK: u64 = 1 << (Self::BITS - 1);
    const EXPONENT_MASK: u64 = ((1 << Self::EXPONENT_BITS) - 1) << Self::MANTISSA_BITS;
    const MANTISSA_MASK: u64 = (1 << Self::MANTISSA_BITS) - 1;
    /// Positive quiet NaN.
    const NAN_BITS: u64 = Self::EXPONENT_MASK | (1 << (Self::MANTISSA_BITS - 1));

    /// Convert to the bit pattern of the nearest representable value, rounding
    /// ties to even.
    fn encode(x: f64) -> u64;

    /// Exact value of the bit pattern.
    fn decode(bits: u64) -> f64;

    fn constants() -> &'static Constants;

    fn quantize(x: f64) -> f64 {
        Self::decode(Self::encode(x))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct F32;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct F16;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Abstract;

impl Format for F32 {
    const KIND: Kind = Kind::F32;
    const MANTISSA_BITS: u32 = 23;
    const EXPONENT_BITS: u32 = 8;

    fn encode(x: f64) -> u64 {
        (x as f32).to_bits() as u64
    }

    fn decode(bits: u64) -> f64 {
        f32::from_bits(bits as u32) as f64
    }

    fn constants() -> &'static Constants {
        static CONSTANTS: LazyLock<Constants> = LazyLock::new(Constants::new::<F32>);
        &CONSTANTS
    }
}

impl Format for F16 {
    const KIND: Kind = Kind::F16;
    const MANTISSA_BITS: u32 = 10;
    const EXPONENT_BITS: u32 = 5;

    fn encode(x: f64) -> u64 {
        half::f16::from_f64(x).to_bits() as u64
    }

    fn decode(bits: u64) -> f64 {
        half::f16::from_bits(bits as u16).to_f64()
    }

    fn constants() -> &'static Constants {
        static CONSTANTS: LazyLock<Constants> = LazyLock::new(Constants::new::<F16>);
        &CONSTANTS
    }
}

impl Format for Abstract {
    const KIND: Kind = Kind::Abstract;
    const MANTISSA_BITS: u32 = 52;
    const EXPONENT_BITS: u32 = 11;

    fn encode(x: f64) -> u64 {
        x.to_bits()
    }

    fn decode(bits: u64) -> f64 {
        f64::from_bits(bits)
    }

    fn constants() -> &'static Constants {
        static CONSTANTS: LazyLock<Constants> = LazyLock::new(Constants::new::<Abstract>);
        &CONSTANTS
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Subnormal {
    pub min: f64,
    pub max: f64,
}

/// Fractions of pi, rounded to the format.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pi {
    pub whole: f64,
    pub three_quarters: f64,
    pub half: f64,
    pub third: f64,
    pub quarter: f64,
    pub sixth: f64,
}

impl Pi {
    fn negated(&self) -> Pi {
        Pi {
            whole: -self.whole,
            three_quarters: -self.three_quarters,
            half: -self.half,
            third: -self.third,
            quarter: -self.quarter,
            sixth: -self.sixth,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Positive {
    /// Smallest positive normal value.
    pub min: f64,
    /// Largest finite value.
    pub max: f64,
    pub infinity: f64,
    /// The representable value just below `max`.
    pub nearest_max: f64,
    /// The largest representable value below 1.
    pub less_than_one: f64,
    pub subnormal: Subnormal,
    pub pi: Pi,
    pub e: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Negative {
    /// Most negative finite value.
    pub min: f64,
    /// Largest (closest to zero) negative normal value.
    pub max: f64,
    pub infinity: f64,
    /// The representable value just above `min`.
    pub nearest_min: f64,
    pub less_than_one: f64,
    pub subnormal: Subnormal,
    pub pi: Pi,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bits {
    pub positive_zero: u64,
    pub negative_zero: u64,
    pub positive_infinity: u64,
    pub negative_infinity: u64,
    pub nan: u64,
}

/// Named boundary values and intervals of a format, computed once and shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Constants {
    pub kind: Kind,
    pub positive: Positive,
    pub negative: Negative,
    pub bits: Bits,
    pub any: Interval,
    pub zero: Interval,
    pub neg_pi_to_pi: Interval,
    pub greater_than_zero: Interval,
    /// Magnitudes outside `[min normal, 1 / min normal]` are not safe divisors.
    pub division_window: (f64, f64),
    /// Provisional range of exponents accepted by ldexp.
    pub ldexp_exponents: (f64, f64),
}

impl Constants {
    fn new<F: Format>() -> Constants {
        let max_bits = (F::EXPONENT_MASK - (1 << F::MANTISSA_BITS)) | F::MANTISSA_MASK;
        let max = F::decode(max_bits);
        let nearest_max = F::decode(max_bits - 1);
        let min = F::decode(1 << F::MANTISSA_BITS);
        let subnormal = Subnormal {
            min: F::decode(1),
            max: F::decode(F::MANTISSA_MASK),
        };
        let less_than_one = F::decode(F::encode(1.0) - 1);
        let pi = Pi {
            whole: F::quantize(PI),
            three_quarters: F::quantize(PI * 0.75),
            half: F::quantize(PI * 0.5),
            third: F::quantize(PI / 3.0),
            quarter: F::quantize(PI * 0.25),
            sixth: F::quantize(PI / 6.0),
        };
        let positive = Positive {
            min,
            max,
            infinity: f64::INFINITY,
            nearest_max,
            less_than_one,
            subnormal,
            pi,
            e: F::quantize(E),
        };
        let negative = Negative {
            min: -max,
            max: -min,
            infinity: f64::NEG_INFINITY,
            nearest_min: -nearest_max,
            less_than_one: -less_than_one,
            subnormal: Subnormal {
                min: -subnormal.max,
                max: -subnormal.min,
            },
            pi: pi.negated(),
        };
        let bits = Bits {
            positive_zero: 0,
            negative_zero: F::SIGN_MASK,
            positive_infinity: F::EXPONENT_MASK,
            negative_infinity: F::SIGN_MASK | F::EXPONENT_MASK,
            nan: F::NAN_BITS,
        };
        tracing::debug!(kind = F::KIND.name(), max, min, "built floating point constants");
        Constants {
            kind: F::KIND,
            positive,
            negative,
            bits,
            any: Interval::new(F::KIND, f64::NEG_INFINITY, f64::INFINITY),
            zero: Interval::new(F::KIND, 0.0, 0.0),
            neg_pi_to_pi: Interval::new(F::KIND, negative.pi.whole, positive.pi.whole),
            greater_than_zero: Interval::new(F::KIND, subnormal.min, max),
            division_window: (min, 1.0 / min),
            ldexp_exponents: ((1 - F::BIAS) as f64, (F::BIAS + 1) as f64),
        }
    }

    pub fn any_vector(&self, len: usize) -> Vec<Interval> {
        vec![self.any; len]
    }

    pub fn zero_vector(&self, len: usize) -> Vec<Interval> {
        vec![self.zero; len]
    }

    pub fn any_matrix(&self, cols: usize, rows: usize) -> Matrix<Interval> {
        Matrix::filled(cols, rows, self.any)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn t_f32_constants() {
        let c = F32::constants();
        assert_eq!(c.positive.max, f32::MAX as f64);
        assert_eq!(c.positive.min, f32::MIN_POSITIVE as f64);
        assert_eq!(c.negative.min, f32::MIN as f64);
        assert_eq!(c.positive.subnormal.min, f32::from_bits(1) as f64);
        assert_eq!(c.positive.subnormal.max, f32::from_bits(0x007f_ffff) as f64);
        assert_eq!(c.negative.subnormal.min, f32::from_bits(0x807f_ffff) as f64);
        assert_eq!(c.positive.nearest_max, f32::from_bits(0x7f7f_fffe) as f64);
        assert_eq!(c.positive.less_than_one, f32::from_bits(0x3f7f_ffff) as f64);
        assert_eq!(F32::encode(c.positive.pi.whole), 0x4049_0fdb);
        assert_eq!(F32::encode(c.positive.pi.half), 0x3fc9_0fdb);
        assert_eq!(F32::encode(c.positive.pi.quarter), 0x3f49_0fdb);
        assert_eq!(F32::encode(c.negative.pi.whole), 0xc049_0fdb);
        assert_eq!(c.bits.nan, 0x7fc0_0000);
        assert_eq!(c.bits.negative_infinity, 0xff80_0000);
        assert_eq!(c.division_window, (2f64.powi(-126), 2f64.powi(126)));
        assert_eq!(c.ldexp_exponents, (-126.0, 128.0));
    }

    #[test]
    fn t_f16_constants() {
        let c = F16::constants();
        assert_eq!(c.positive.max, 65504.0);
        assert_eq!(c.positive.min, 2f64.powi(-14));
        assert_eq!(c.positive.subnormal.min, 2f64.powi(-24));
        assert_eq!(c.positive.subnormal.max, 2f64.powi(-14) - 2f64.powi(-24));
        assert_eq!(c.positive.nearest_max, 65472.0);
        assert_eq!(c.bits.nan, 0x7e00);
        assert_eq!(c.bits.positive_infinity, 0x7c00);
        assert_eq!(F16::encode(c.positive.pi.whole), 0x4248);
        assert_eq!(c.ldexp_exponents, (-14.0, 16.0));
    }

    #[test]
    fn t_abstract_constants() {
        let c = Abstract::constants();
        assert_eq!(c.positive.max, f64::MAX);
        assert_eq!(c.positive.min, f64::MIN_POSITIVE);
        assert_eq!(c.positive.pi.whole, PI);
        assert_eq!(c.positive.subnormal.min, f64::from_bits(1));
        assert_eq!(c.ldexp_exponents, (-1022.0, 1024.0));
    }

    #[test]
    fn t_kind_constants_match_formats() {
        assert_eq!(Kind::F32.constants().kind, Kind::F32);
        assert_eq!(Kind::F16.constants().kind, Kind::F16);
        assert_eq!(Kind::Abstract.constants().kind, Kind::Abstract);
        assert!(Kind::F16.is_finite(65504.0));
        assert!(!Kind::F16.is_finite(65520.0));
        assert!(Kind::Abstract.is_finite(1e300));
        assert!(!Kind::F32.is_finite(1e300));
    }

    #[test]
    fn t_quantize_rounds_to_nearest_even() {
        assert_eq!(F32::quantize(0.1), f32::from_bits(0x3dcc_cccd) as f64);
        assert_eq!(F16::quantize(1.0 + 2f64.powi(-11)), 1.0);
        assert_eq!(F16::quantize(1.0 + 3.0 * 2f64.powi(-11)), 1.0 + 2f64.powi(-9));
        assert_eq!(Abstract::quantize(0.1), 0.1);
    }
}
