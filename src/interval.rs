use crate::{
    error::Error,
    format::{Format, Kind},
    primitives::{Candidates, correctly_rounded_candidates},
};

/**
A closed range of acceptable values for a floating point format. The bounds
are doubles, and either can be infinite. The interval `[-inf, inf]` is the
"any" interval, and it is an ordinary value of this type: it spans, contains
and compares like every other interval.
*/
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
    kind: Kind,
    begin: f64,
    end: f64,
}

impl Interval {
    /// Create a new interval. Panics if either bound is NaN or if `begin >
    /// end`. Use `try_new` for bounds that come from untrusted data.
    pub fn new(kind: Kind, begin: f64, end: f64) -> Interval {
        assert!(
            !begin.is_nan() && !end.is_nan(),
            "Interval bounds cannot be NaN: [{begin}, {end}]"
        );
        assert!(begin <= end, "Interval bounds are out of order: [{begin}, {end}]");
        Interval { kind, begin, end }
    }

    pub fn try_new(kind: Kind, begin: f64, end: f64) -> Result<Interval, Error> {
        if begin.is_nan() || end.is_nan() || begin > end {
            Err(Error::InvalidInterval)
        } else {
            Ok(Interval { kind, begin, end })
        }
    }

    pub fn point(kind: Kind, val: f64) -> Interval {
        Interval::new(kind, val, val)
    }

    pub fn any(kind: Kind) -> Interval {
        Interval {
            kind,
            begin: f64::NEG_INFINITY,
            end: f64::INFINITY,
        }
    }

    /// Interval of all correct roundings of `x` to format `F`.
    pub fn correctly_rounded<F: Format>(x: f64) -> Interval {
        Interval::from_candidates(F::KIND, &correctly_rounded_candidates::<F>(x))
    }

    /// Smallest interval containing all the values.
    pub(crate) fn from_candidates(kind: Kind, values: &[f64]) -> Interval {
        assert!(!values.is_empty(), "Cannot build an interval from nothing");
        let (begin, end) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (f64::min(lo, *v), f64::max(hi, *v))
            });
        Interval::new(kind, begin, end)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn begin(&self) -> f64 {
        self.begin
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// The bounds as a candidate set. Points produce a single value.
    pub fn bounds(&self) -> Candidates {
        if self.is_point() {
            Candidates::one(self.begin)
        } else {
            Candidates::two(self.begin, self.end)
        }
    }

    pub fn is_point(&self) -> bool {
        self.begin == self.end
    }

    pub fn is_any(&self) -> bool {
        self.begin == f64::NEG_INFINITY && self.end == f64::INFINITY
    }

    /// Both bounds lie in the finite range of the format.
    pub fn is_finite(&self) -> bool {
        self.kind.is_finite(self.begin) && self.kind.is_finite(self.end)
    }

    /**
    Check whether `x` is an acceptable value. `x` is first widened to its
    own correctly rounded interval in this format, because it may be a
    double that the format cannot represent. Only the any interval contains
    NaN.
    */
    pub fn contains(&self, x: f64) -> bool {
        if x.is_nan() {
            return self.is_any();
        }
        let (begin, end) = match self.kind {
            Kind::F32 => Self::rounded_bounds::<crate::format::F32>(x),
            Kind::F16 => Self::rounded_bounds::<crate::format::F16>(x),
            Kind::Abstract => Self::rounded_bounds::<crate::format::Abstract>(x),
        };
        self.begin <= begin && self.end >= end
    }

    fn rounded_bounds<F: Format>(x: f64) -> (f64, f64) {
        let values = correctly_rounded_candidates::<F>(x);
        (values[0], values[values.len() - 1])
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.begin <= other.begin && self.end >= other.end
    }

    /// Does the interval overlap zero or any subnormal value of its format.
    pub fn contains_zero_or_subnormals(&self) -> bool {
        let c = self.kind.constants();
        self.begin <= c.positive.subnormal.max && self.end >= c.negative.subnormal.min
    }

    /// Smallest interval containing all of `intervals`. They must all belong
    /// to the same format, and there must be at least one of them.
    pub fn span(intervals: &[Interval]) -> Interval {
        assert!(!intervals.is_empty(), "Cannot span an empty list of intervals");
        intervals[1..]
            .iter()
            .fold(intervals[0], |acc, i| acc.hull(*i))
    }

    /// Like `span`, but reports an empty list or intervals of different
    /// formats as errors instead of panicking.
    pub fn try_span(intervals: &[Interval]) -> Result<Interval, Error> {
        let first = intervals.first().ok_or(Error::InvalidInterval)?;
        if let Some(other) = intervals.iter().find(|i| i.kind != first.kind) {
            return Err(Error::KindMismatch(first.kind, other.kind));
        }
        Ok(Interval::span(intervals))
    }

    pub fn hull(self, other: Interval) -> Interval {
        assert_eq!(
            self.kind, other.kind,
            "Cannot span intervals of different formats"
        );
        Interval {
            kind: self.kind,
            begin: f64::min(self.begin, other.begin),
            end: f64::max(self.end, other.end),
        }
    }

    /// The same bounds, relabelled as another format if they are valid
    /// there. Otherwise the correctly rounded span of the bounds.
    pub(crate) fn to_format<F: Format>(self) -> Interval {
        if self.kind == F::KIND {
            self
        } else {
            Interval::correctly_rounded::<F>(self.begin)
                .hull(Interval::correctly_rounded::<F>(self.end))
        }
    }
}

/// Input to a scalar operation: either a raw double, or the result of another
/// operation when composing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Operand {
    Point(f64),
    Range(Interval),
}

impl Operand {
    /// Points are correctly rounded into the format.
    pub fn to_interval<F: Format>(self) -> Interval {
        match self {
            Operand::Point(x) => Interval::correctly_rounded::<F>(x),
            Operand::Range(i) => i.to_format::<F>(),
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Point(value)
    }
}

impl From<Interval> for Operand {
    fn from(value: Interval) -> Self {
        Operand::Range(value)
    }
}

impl From<&Interval> for Operand {
    fn from(value: &Interval) -> Self {
        Operand::Range(*value)
    }
}
