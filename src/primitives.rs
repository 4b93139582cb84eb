use crate::{error::Error, format::Format};
use std::ops::Deref;

/// Which subnormal flushing behaviour to assume when computing ULPs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlushMode {
    Flush,
    NoFlush,
    /// Take the more conservative of the two.
    Either,
}

/**
A small set of candidate values, stored inline. Rounding a double to a format
produces at most two candidates, and flushing adds at most one more. The
values are kept in the order they were pushed.
*/
#[derive(Debug, Copy, Clone)]
pub struct Candidates {
    values: [f64; 3],
    len: usize,
}

impl Candidates {
    pub fn one(a: f64) -> Candidates {
        Candidates {
            values: [a, f64::NAN, f64::NAN],
            len: 1,
        }
    }

    pub fn two(a: f64, b: f64) -> Candidates {
        Candidates {
            values: [a, b, f64::NAN],
            len: 2,
        }
    }

    fn push(&mut self, val: f64) {
        assert!(self.len < self.values.len(), "Too many candidates");
        self.values[self.len] = val;
        self.len += 1;
    }
}

impl Deref for Candidates {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values[..self.len]
    }
}

impl PartialEq for Candidates {
    fn eq(&self, other: &Self) -> bool {
        self.deref() == other.deref()
    }
}

/// Bit pattern of `x` in format `F`, if `x` is exactly representable. NaN
/// maps to the canonical quiet NaN.
pub fn to_bits<F: Format>(x: f64) -> Result<u64, Error> {
    if x.is_nan() {
        return Ok(F::NAN_BITS);
    }
    let bits = F::encode(x);
    if F::decode(bits) == x {
        Ok(bits)
    } else {
        Err(Error::NotRepresentable(x))
    }
}

pub fn from_bits<F: Format>(bits: u64) -> f64 {
    F::decode(bits)
}

pub fn quantize<F: Format>(x: f64) -> f64 {
    F::quantize(x)
}

pub fn is_finite<F: Format>(x: f64) -> bool {
    F::KIND.is_finite(x)
}

/// Nonzero with a magnitude below the smallest normal value.
pub fn is_subnormal<F: Format>(x: f64) -> bool {
    let c = F::constants();
    x != 0.0 && x > c.negative.max && x < c.positive.min
}

/// Zero or subnormal. Values in this band can compare equal to each other
/// once an implementation flushes.
pub(crate) fn in_flush_band<F: Format>(x: f64) -> bool {
    let c = F::constants();
    x > c.negative.max && x < c.positive.min
}

/// Replace subnormals with zero of the same sign.
pub fn flush_subnormal<F: Format>(x: f64) -> f64 {
    if is_subnormal::<F>(x) {
        0f64.copysign(x)
    } else {
        x
    }
}

/**
The representable value adjacent to `val` towards positive infinity if
`toward_positive` is true, otherwise towards negative infinity. When `flush` is
true, subnormals are flushed to zero both before and after stepping, so zero
steps to the smallest normal value. NaN maps to the canonical quiet NaN, and
infinities are fixed points. `val` must otherwise be within the finite range of
the format.
*/
pub fn next_after<F: Format>(val: f64, toward_positive: bool, flush: bool) -> f64 {
    if val.is_nan() {
        return F::decode(F::NAN_BITS);
    }
    if val.is_infinite() {
        return val;
    }
    let c = F::constants();
    assert!(
        val <= c.positive.max && val >= c.negative.min,
        "{val} is not in the range of {}",
        F::KIND.name()
    );
    let val = if flush { flush_subnormal::<F>(val) } else { val };
    if val == 0.0 {
        return match (toward_positive, flush) {
            (true, true) => c.positive.min,
            (true, false) => c.positive.subnormal.min,
            (false, true) => c.negative.max,
            (false, false) => c.negative.subnormal.max,
        };
    }
    let converted = F::quantize(val);
    let bits = if converted == val {
        let bits = F::encode(val);
        let is_positive = bits & F::SIGN_MASK == 0;
        if toward_positive == is_positive {
            bits + 1
        } else {
            bits - 1
        }
    } else if toward_positive == (converted > val) {
        // Rounding already went the requested way.
        F::encode(converted)
    } else {
        // `converted` is representable, so this recurses only once.
        F::encode(next_after::<F>(converted, toward_positive, flush))
    };
    if bits & F::EXPONENT_MASK == F::EXPONENT_MASK {
        return if toward_positive {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    let result = F::decode(bits);
    if flush {
        flush_subnormal::<F>(result)
    } else {
        result
    }
}

/**
All valid roundings of `x` into format `F`, in ascending order. A single value
if `x` is representable, otherwise the two representable values bracketing
`x`. Values beyond the finite range can round to the largest magnitude finite
value or to infinity. Subnormals are not flushed here.
*/
pub fn correctly_rounded_candidates<F: Format>(x: f64) -> Candidates {
    assert!(!x.is_nan(), "Correct rounding is not defined for NaN");
    let c = F::constants();
    if x > c.positive.max {
        return Candidates::two(c.positive.max, f64::INFINITY);
    }
    if x < c.negative.min {
        return Candidates::two(f64::NEG_INFINITY, c.negative.min);
    }
    let converted = F::quantize(x);
    if converted == x {
        Candidates::one(x)
    } else if converted > x {
        Candidates::two(next_after::<F>(converted, false, false), converted)
    } else {
        Candidates::two(converted, next_after::<F>(converted, true, false))
    }
}

/// Append zero if any of the candidates is a nonzero subnormal, so that
/// implementations that flush are accounted for.
pub fn add_flushed_if_needed<F: Format>(mut values: Candidates) -> Candidates {
    if values.iter().any(|v| is_subnormal::<F>(*v)) && !values.contains(&0.0) {
        values.push(0.0);
    }
    values
}

fn one_ulp_impl<F: Format>(target: f64, flush: bool) -> f64 {
    if target.is_nan() {
        return f64::NAN;
    }
    let c = F::constants();
    let target = if flush {
        flush_subnormal::<F>(target)
    } else {
        target
    };
    // At or beyond the edges, use the gap between the two values closest to the edge.
    if target >= c.positive.max {
        return c.positive.max - c.positive.nearest_max;
    } else if target <= c.negative.min {
        return c.negative.nearest_min - c.negative.min;
    }
    let before = next_after::<F>(target, false, flush);
    let after = next_after::<F>(target, true, flush);
    if F::quantize(target) == target {
        f64::min(target - before, after - target)
    } else {
        after - before
    }
}

/// The unit in the last place of `target` in format `F`.
pub fn one_ulp<F: Format>(target: f64, mode: FlushMode) -> f64 {
    match mode {
        FlushMode::Flush => one_ulp_impl::<F>(target, true),
        FlushMode::NoFlush => one_ulp_impl::<F>(target, false),
        FlushMode::Either => f64::max(
            one_ulp_impl::<F>(target, false),
            one_ulp_impl::<F>(target, true),
        ),
    }
}
