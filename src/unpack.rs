use crate::{format::Format, framework::FpTraits, interval::Interval};

/// The two 16 bit halves of `n`, low half first.
fn halves(n: u32) -> [u16; 2] {
    [(n & 0xffff) as u16, (n >> 16) as u16]
}

/// The four bytes of `n`, low byte first.
fn bytes(n: u32) -> [u8; 4] {
    n.to_le_bytes()
}

impl<F: Format> FpTraits<F> {
    /// Two 16 bit floats packed into a 32 bit word. Any vector if either half
    /// is infinite or NaN.
    pub fn unpack2x16float(n: u32) -> Vec<Interval> {
        let any = || F::constants().any_vector(2);
        let values = halves(n).map(|h| half::f16::from_bits(h));
        if values.iter().any(|v| !v.is_finite()) {
            return any();
        }
        let result: Vec<Interval> = values
            .iter()
            .map(|v| Self::quantize_to_f16(v.to_f64()))
            .collect();
        if result.iter().any(|e| !e.is_finite()) {
            return any();
        }
        result
    }

    fn snorm(v: f64, scale: f64) -> Interval {
        Self::max(Self::division(v, scale), -1.0)
    }

    pub fn unpack2x16snorm(n: u32) -> Vec<Interval> {
        halves(n)
            .iter()
            .map(|h| Self::snorm(*h as i16 as f64, 32767.0))
            .collect()
    }

    pub fn unpack2x16unorm(n: u32) -> Vec<Interval> {
        halves(n)
            .iter()
            .map(|h| Self::division(*h as f64, 65535.0))
            .collect()
    }

    pub fn unpack4x8snorm(n: u32) -> Vec<Interval> {
        bytes(n)
            .iter()
            .map(|b| Self::snorm(*b as i8 as f64, 127.0))
            .collect()
    }

    pub fn unpack4x8unorm(n: u32) -> Vec<Interval> {
        bytes(n)
            .iter()
            .map(|b| Self::division(*b as f64, 255.0))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::{F16, F32, Kind};

    type FP = FpTraits<F32>;

    fn point(x: f64) -> Interval {
        Interval::point(Kind::F32, x)
    }

    #[test]
    fn t_halves_and_bytes() {
        assert_eq!(halves(0x1234_5678), [0x5678, 0x1234]);
        assert_eq!(bytes(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn t_unpack2x16float() {
        assert_eq!(FP::unpack2x16float(0x3c00_4000), vec![point(2.0), point(1.0)]);
        assert_eq!(FP::unpack2x16float(0x0000_c000), vec![point(-2.0), point(0.0)]);
        // Largest half, and a subnormal half that may be flushed.
        let unpacked = FP::unpack2x16float(0x0001_7bff);
        assert_eq!(unpacked[0], point(65504.0));
        assert_eq!(
            unpacked[1],
            Interval::new(Kind::F32, 0.0, 2f64.powi(-24))
        );
        let any = F32::constants().any_vector(2);
        assert_eq!(FP::unpack2x16float(0x7c00_0000), any);
        assert_eq!(FP::unpack2x16float(0x0000_fc00), any);
        assert_eq!(FP::unpack2x16float(0x7e00_3c00), any);
        assert_eq!(
            FpTraits::<F16>::unpack2x16float(0x3c00_4000),
            vec![Interval::point(Kind::F16, 2.0), Interval::point(Kind::F16, 1.0)]
        );
    }

    #[test]
    fn t_unpack2x16snorm() {
        let unpacked = FP::unpack2x16snorm(0x7fff_8000);
        // -32768 / 32767 is clamped to -1.
        assert_eq!(unpacked[0], point(-1.0));
        assert!(unpacked[1].contains(1.0));
        let unpacked = FP::unpack2x16snorm(0);
        assert!(unpacked.iter().all(|e| e.contains(0.0) && e.end() < 1e-30));
    }

    #[test]
    fn t_unpack2x16unorm() {
        let unpacked = FP::unpack2x16unorm(0xffff_0000);
        assert!(unpacked[0].contains(0.0));
        assert!(unpacked[1].contains(1.0));
        assert!(unpacked[1].end() - unpacked[1].begin() < 1e-6);
        assert!(FP::unpack2x16unorm(0x0000_8000)[0].contains(32768.0 / 65535.0));
    }

    #[test]
    fn t_unpack4x8snorm() {
        let unpacked = FP::unpack4x8snorm(0x8081_7f00);
        assert_eq!(unpacked.len(), 4);
        assert!(unpacked[0].contains(0.0));
        assert!(unpacked[1].contains(1.0));
        assert!(unpacked[2].contains(-1.0));
        assert_eq!(unpacked[3], point(-1.0));
    }

    #[test]
    fn t_unpack4x8unorm() {
        let unpacked = FP::unpack4x8unorm(0xff00_8000);
        assert_eq!(unpacked.len(), 4);
        assert!(unpacked[0].contains(0.0));
        assert!(unpacked[1].contains(128.0 / 255.0));
        assert!(unpacked[2].contains(0.0));
        assert!(unpacked[3].contains(1.0));
    }
}
