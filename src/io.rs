use crate::{
    error::Error,
    format::{Abstract, F16, F32, Format, Kind},
    interval::Interval,
    primitives::{correctly_rounded_candidates, from_bits},
};

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}, [", self.kind())?;
        if self.is_point() {
            write!(f, "{}", self.begin())?;
        } else {
            write!(f, "{}, {}", self.begin(), self.end())?;
        }
        write!(f, "]}}")
    }
}

/**
Compact form of an interval for storing generated test cases. The bounds are
bit patterns of the format of the interval, and the any interval has its own
variant.
*/
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SerializedInterval {
    Any(Kind),
    Bounds { kind: Kind, begin: u64, end: u64 },
}

/// Bit pattern of `x` if it is representable, otherwise of its neighbour
/// below (`outward_up == false`) or above.
fn encode_outward<F: Format>(x: f64, outward_up: bool) -> u64 {
    let values = correctly_rounded_candidates::<F>(x);
    let bound = if outward_up {
        values[values.len() - 1]
    } else {
        values[0]
    };
    F::encode(bound)
}

fn encode(kind: Kind, x: f64, outward_up: bool) -> u64 {
    match kind {
        Kind::F32 => encode_outward::<F32>(x, outward_up),
        Kind::F16 => encode_outward::<F16>(x, outward_up),
        Kind::Abstract => encode_outward::<Abstract>(x, outward_up),
    }
}

fn decode(kind: Kind, bits: u64) -> f64 {
    match kind {
        Kind::F32 => from_bits::<F32>(bits),
        Kind::F16 => from_bits::<F16>(bits),
        Kind::Abstract => from_bits::<Abstract>(bits),
    }
}

impl Interval {
    /// Bounds that the format cannot represent are widened outward to the
    /// nearest representable values, so the stored interval still contains
    /// this one.
    pub fn serialize(&self) -> SerializedInterval {
        if self.is_any() {
            return SerializedInterval::Any(self.kind());
        }
        SerializedInterval::Bounds {
            kind: self.kind(),
            begin: encode(self.kind(), self.begin(), false),
            end: encode(self.kind(), self.end(), true),
        }
    }
}

impl SerializedInterval {
    pub fn deserialize(&self) -> Result<Interval, Error> {
        match *self {
            SerializedInterval::Any(kind) => Ok(Interval::any(kind)),
            SerializedInterval::Bounds { kind, begin, end } => {
                let begin = decode(kind, begin);
                let end = decode(kind, end);
                if begin.is_nan() || end.is_nan() {
                    return Err(Error::ContainsNaN);
                }
                Interval::try_new(kind, begin, end)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn t_display() {
        assert_eq!(format!("{}", Interval::point(Kind::F32, 1.0)), "{f32, [1]}");
        assert_eq!(
            format!("{}", Interval::new(Kind::F16, -0.5, 2.0)),
            "{f16, [-0.5, 2]}"
        );
        assert_eq!(format!("{}", Interval::any(Kind::Abstract)), "{abstract, [-inf, inf]}");
    }

    #[test]
    fn t_serialize() {
        let i = Interval::new(Kind::F32, -1.0, 2.0);
        assert_eq!(
            i.serialize(),
            SerializedInterval::Bounds {
                kind: Kind::F32,
                begin: 0xbf80_0000,
                end: 0x4000_0000,
            }
        );
        assert_eq!(i.serialize().deserialize(), Ok(i));
        let any = Interval::any(Kind::F16);
        assert_eq!(any.serialize(), SerializedInterval::Any(Kind::F16));
        assert_eq!(SerializedInterval::Any(Kind::F16).deserialize(), Ok(any));
        // Half open intervals keep their infinite bound.
        let i = Interval::new(Kind::F16, 65504.0, f64::INFINITY);
        assert_eq!(
            i.serialize(),
            SerializedInterval::Bounds {
                kind: Kind::F16,
                begin: 0x7bff,
                end: 0x7c00,
            }
        );
    }

    #[test]
    fn t_serialize_widens() {
        let lo = f32::from_bits(0x3dcc_cccc) as f64;
        let hi = f32::from_bits(0x3dcc_cccd) as f64;
        let i = Interval::new(Kind::F32, 0.1, 0.1 + 1e-12);
        let stored = i.serialize().deserialize().unwrap();
        assert_eq!(stored, Interval::new(Kind::F32, lo, hi));
        assert!(stored.contains_interval(&i));
    }

    #[test]
    fn t_serialize_errors() {
        let nan = SerializedInterval::Bounds {
            kind: Kind::F32,
            begin: 0x7fc0_0000,
            end: 0,
        };
        assert_eq!(nan.deserialize(), Err(Error::ContainsNaN));
        let reversed = SerializedInterval::Bounds {
            kind: Kind::F32,
            begin: 0x4000_0000,
            end: 0,
        };
        assert_eq!(reversed.deserialize(), Err(Error::InvalidInterval));
    }
}
