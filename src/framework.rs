use crate::{
    format::Format,
    interval::Interval,
    matrix::Matrix,
    primitives::{Candidates, add_flushed_if_needed, correctly_rounded_candidates},
};
use std::marker::PhantomData;

/**
The library of acceptance interval operations for the format `F`. This is a
zero sized type, all the operations are associated functions, so every
operation is monomorphized per format.
*/
#[derive(Debug, Copy, Clone)]
pub struct FpTraits<F: Format>(PhantomData<F>);

/// A small set of closed ranges. A value is inside if any of the ranges
/// contain it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ranges {
    ranges: [(f64, f64); 2],
    len: usize,
}

impl Ranges {
    pub fn one(lo: f64, hi: f64) -> Ranges {
        Ranges {
            ranges: [(lo, hi), (f64::NAN, f64::NAN)],
            len: 1,
        }
    }

    pub fn two(a: (f64, f64), b: (f64, f64)) -> Ranges {
        Ranges {
            ranges: [a, b],
            len: 2,
        }
    }

    pub fn from_interval(i: Interval) -> Ranges {
        Ranges::one(i.begin(), i.end())
    }

    pub fn contains(&self, x: f64) -> bool {
        self.ranges[..self.len]
            .iter()
            .any(|(lo, hi)| *lo <= x && x <= *hi)
    }
}

/// Operation on a single scalar.
#[derive(Copy, Clone)]
pub struct ScalarOp<I> {
    pub imp: I,
    pub domain: Option<Ranges>,
    pub extrema: Option<fn(Interval) -> Interval>,
}

impl<I: Fn(f64) -> Interval> ScalarOp<I> {
    pub fn new(imp: I) -> ScalarOp<I> {
        ScalarOp {
            imp,
            domain: None,
            extrema: None,
        }
    }

    pub fn with_domain(mut self, domain: Ranges) -> ScalarOp<I> {
        self.domain = Some(domain);
        self
    }

    pub fn with_extrema(mut self, extrema: fn(Interval) -> Interval) -> ScalarOp<I> {
        self.extrema = Some(extrema);
        self
    }
}

/// Operation on a pair of scalars.
#[derive(Copy, Clone)]
pub struct PairOp<I> {
    pub imp: I,
    pub domain: Option<(Ranges, Ranges)>,
    pub extrema: Option<fn(Interval, Interval) -> (Interval, Interval)>,
}

impl<I: Fn(f64, f64) -> Interval> PairOp<I> {
    pub fn new(imp: I) -> PairOp<I> {
        PairOp {
            imp,
            domain: None,
            extrema: None,
        }
    }

    pub fn with_domain(mut self, x: Ranges, y: Ranges) -> PairOp<I> {
        self.domain = Some((x, y));
        self
    }

    pub fn with_extrema(
        mut self,
        extrema: fn(Interval, Interval) -> (Interval, Interval),
    ) -> PairOp<I> {
        self.extrema = Some(extrema);
        self
    }
}

/// Operation on three scalars. These never need a domain or extrema.
#[derive(Copy, Clone)]
pub struct TripleOp<I> {
    pub imp: I,
}

impl<I: Fn(f64, f64, f64) -> Interval> TripleOp<I> {
    pub fn new(imp: I) -> TripleOp<I> {
        TripleOp { imp }
    }
}

#[derive(Copy, Clone)]
pub struct VectorOp<I> {
    pub imp: I,
}

impl<I: Fn(&[f64]) -> Interval> VectorOp<I> {
    pub fn new(imp: I) -> VectorOp<I> {
        VectorOp { imp }
    }
}

#[derive(Copy, Clone)]
pub struct VectorPairOp<I> {
    pub imp: I,
}

impl<I: Fn(&[f64], &[f64]) -> Interval> VectorPairOp<I> {
    pub fn new(imp: I) -> VectorPairOp<I> {
        VectorPairOp { imp }
    }
}

#[derive(Copy, Clone)]
pub struct VectorToVectorOp<I> {
    pub imp: I,
}

impl<I: Fn(&[f64]) -> Vec<Interval>> VectorToVectorOp<I> {
    pub fn new(imp: I) -> VectorToVectorOp<I> {
        VectorToVectorOp { imp }
    }
}

#[derive(Copy, Clone)]
pub struct VectorPairToVectorOp<I> {
    pub imp: I,
}

impl<I: Fn(&[f64], &[f64]) -> Vec<Interval>> VectorPairToVectorOp<I> {
    pub fn new(imp: I) -> VectorPairToVectorOp<I> {
        VectorPairToVectorOp { imp }
    }
}

#[derive(Copy, Clone)]
pub struct MatrixToMatrixOp<I> {
    pub imp: I,
}

impl<I: Fn(&Matrix<f64>) -> Matrix<Interval>> MatrixToMatrixOp<I> {
    pub fn new(imp: I) -> MatrixToMatrixOp<I> {
        MatrixToMatrixOp { imp }
    }
}

/// Results that can be combined into the smallest result containing both.
trait Span: Sized {
    fn span_with(self, other: Self) -> Self;
}

impl Span for Interval {
    fn span_with(self, other: Self) -> Self {
        self.hull(other)
    }
}

impl Span for Vec<Interval> {
    fn span_with(mut self, other: Self) -> Self {
        assert_eq!(
            self.len(),
            other.len(),
            "Cannot span vectors of different lengths"
        );
        for (a, b) in self.iter_mut().zip(other) {
            *a = a.hull(b);
        }
        self
    }
}

impl Span for Matrix<Interval> {
    fn span_with(self, other: Self) -> Self {
        assert_eq!(
            self.dims(),
            other.dims(),
            "Cannot span matrices of different dimensions"
        );
        let elems = self
            .elems()
            .iter()
            .zip(other.elems())
            .map(|(a, b)| a.hull(*b))
            .collect();
        self.with_elems(elems)
    }
}

struct Accumulator<T: Span>(Option<T>);

impl<T: Span> Accumulator<T> {
    fn new() -> Self {
        Accumulator(None)
    }

    fn add(&mut self, value: T) {
        self.0 = Some(match self.0.take() {
            Some(acc) => acc.span_with(value),
            None => value,
        });
    }

    fn finish(self) -> Option<T> {
        self.0
    }
}

/// Largest number of sets `cartesian` walks, one per element of a 4x4 matrix.
const MAX_SETS: usize = 16;

/// Largest number of terms `for_each_permutation` orders.
const MAX_TERMS: usize = 4;

/// Call `f` with every combination of one value from each set. The sets are
/// walked like an odometer, with the first set changing fastest.
pub(crate) fn cartesian(sets: &[Candidates], mut f: impl FnMut(&[f64])) {
    let n = sets.len();
    assert!(n <= MAX_SETS, "Too many sets: {n}");
    let mut counter = [0usize; MAX_SETS];
    let mut sample = [f64::NAN; MAX_SETS];
    loop {
        for (i, set) in sets.iter().enumerate() {
            sample[i] = set[counter[i]];
        }
        f(&sample[..n]);
        let mut done = true;
        for (c, set) in counter.iter_mut().zip(sets.iter()) {
            *c += 1;
            if *c < set.len() {
                done = false;
                break;
            } else {
                *c = 0;
            }
        }
        if done {
            return;
        }
    }
}

/// Call `f` with every ordering of `items`, starting with `items` itself.
/// Orderings are generated in place with Heap's algorithm.
pub(crate) fn for_each_permutation<T: Copy>(items: &[T], mut f: impl FnMut(&[T])) {
    let n = items.len();
    assert!(n > 0 && n <= MAX_TERMS, "Cannot permute {n} items");
    let mut buf = [items[0]; MAX_TERMS];
    buf[..n].copy_from_slice(items);
    let mut counter = [0usize; MAX_TERMS];
    f(&buf[..n]);
    let mut i = 1;
    while i < n {
        if counter[i] < i {
            if i % 2 == 0 {
                buf.swap(0, i);
            } else {
                buf.swap(counter[i], i);
            }
            f(&buf[..n]);
            counter[i] += 1;
            i = 1;
        } else {
            counter[i] = 0;
            i += 1;
        }
    }
}

impl<F: Format> FpTraits<F> {
    fn any() -> Interval {
        F::constants().any
    }

    fn finish(result: Option<Interval>) -> Interval {
        match result {
            Some(result) if result.is_finite() => result,
            _ => {
                tracing::trace!(kind = F::KIND.name(), "result is not finite, accepting any");
                Self::any()
            }
        }
    }

    fn finish_vector(result: Option<Vec<Interval>>, len: usize) -> Vec<Interval> {
        match result {
            Some(result) if result.iter().all(|e| e.is_finite()) => result,
            _ => {
                tracing::trace!(kind = F::KIND.name(), len, "vector is not finite, accepting any");
                F::constants().any_vector(len)
            }
        }
    }

    /// All values an implementation may see in place of `x`: the correct
    /// roundings, and zero if one of them can be flushed.
    pub(crate) fn rounded_and_flushed(x: f64) -> Candidates {
        assert!(!x.is_nan(), "Flushing is not defined for NaN");
        add_flushed_if_needed::<F>(correctly_rounded_candidates::<F>(x))
    }

    pub(crate) fn round_and_flush_scalar<I: Fn(f64) -> Interval>(
        x: f64,
        op: &ScalarOp<I>,
    ) -> Interval {
        let mut acc = Accumulator::new();
        for &x in Self::rounded_and_flushed(x).iter() {
            acc.add(match op.domain {
                Some(domain) if !domain.contains(x) => Self::any(),
                _ => (op.imp)(x),
            });
        }
        acc.finish().unwrap_or_else(Self::any)
    }

    pub(crate) fn round_and_flush_pair<I: Fn(f64, f64) -> Interval>(
        x: f64,
        y: f64,
        op: &PairOp<I>,
    ) -> Interval {
        let mut acc = Accumulator::new();
        let xs = Self::rounded_and_flushed(x);
        let ys = Self::rounded_and_flushed(y);
        for &x in xs.iter() {
            for &y in ys.iter() {
                acc.add(match op.domain {
                    Some((dx, dy)) if !dx.contains(x) || !dy.contains(y) => Self::any(),
                    _ => (op.imp)(x, y),
                });
            }
        }
        acc.finish().unwrap_or_else(Self::any)
    }

    fn round_and_flush_triple<I: Fn(f64, f64, f64) -> Interval>(
        x: f64,
        y: f64,
        z: f64,
        op: &TripleOp<I>,
    ) -> Interval {
        let mut acc = Accumulator::new();
        let xs = Self::rounded_and_flushed(x);
        let ys = Self::rounded_and_flushed(y);
        let zs = Self::rounded_and_flushed(z);
        for &x in xs.iter() {
            for &y in ys.iter() {
                for &z in zs.iter() {
                    acc.add((op.imp)(x, y, z));
                }
            }
        }
        acc.finish().unwrap_or_else(Self::any)
    }

    fn rounded_and_flushed_all(x: &[f64]) -> Vec<Candidates> {
        x.iter().map(|e| Self::rounded_and_flushed(*e)).collect()
    }

    fn round_and_flush_vector<I: Fn(&[f64]) -> Interval>(
        x: &[f64],
        op: &VectorOp<I>,
    ) -> Option<Interval> {
        let mut acc = Accumulator::new();
        cartesian(&Self::rounded_and_flushed_all(x), |x| acc.add((op.imp)(x)));
        acc.finish()
    }

    fn round_and_flush_vector_pair<I: Fn(&[f64], &[f64]) -> Interval>(
        x: &[f64],
        y: &[f64],
        op: &VectorPairOp<I>,
    ) -> Option<Interval> {
        let mut acc = Accumulator::new();
        let ys = Self::rounded_and_flushed_all(y);
        cartesian(&Self::rounded_and_flushed_all(x), |x| {
            cartesian(&ys, |y| acc.add((op.imp)(x, y)))
        });
        acc.finish()
    }

    fn round_and_flush_vector_to_vector<I: Fn(&[f64]) -> Vec<Interval>>(
        x: &[f64],
        op: &VectorToVectorOp<I>,
    ) -> Option<Vec<Interval>> {
        let mut acc = Accumulator::new();
        cartesian(&Self::rounded_and_flushed_all(x), |x| acc.add((op.imp)(x)));
        acc.finish()
    }

    fn round_and_flush_vector_pair_to_vector<I: Fn(&[f64], &[f64]) -> Vec<Interval>>(
        x: &[f64],
        y: &[f64],
        op: &VectorPairToVectorOp<I>,
    ) -> Option<Vec<Interval>> {
        let mut acc = Accumulator::new();
        let ys = Self::rounded_and_flushed_all(y);
        cartesian(&Self::rounded_and_flushed_all(x), |x| {
            cartesian(&ys, |y| acc.add((op.imp)(x, y)))
        });
        acc.finish()
    }

    fn round_and_flush_matrix<I: Fn(&Matrix<f64>) -> Matrix<Interval>>(
        m: &Matrix<f64>,
        op: &MatrixToMatrixOp<I>,
    ) -> Option<Matrix<Interval>> {
        let mut acc = Accumulator::new();
        cartesian(&Self::rounded_and_flushed_all(m.elems()), |elems| {
            acc.add((op.imp)(&m.with_elems(elems.to_vec())))
        });
        acc.finish()
    }

    fn bounds_all(x: &[Interval]) -> Vec<Candidates> {
        x.iter().map(|e| e.bounds()).collect()
    }

    fn all_finite(x: &[Interval]) -> bool {
        x.iter().all(|e| e.is_finite())
    }

    /**
    Acceptance interval of `op` over the interval `x`. Non-finite inputs and
    outputs produce the any interval. The extrema of the operation are applied
    before evaluating at the bounds.
    */
    pub fn run_scalar<I: Fn(f64) -> Interval>(x: Interval, op: &ScalarOp<I>) -> Interval {
        if !x.is_finite() {
            tracing::trace!(kind = F::KIND.name(), "input is not finite, accepting any");
            return Self::any();
        }
        let x = match op.extrema {
            Some(extrema) => extrema(x),
            None => x,
        };
        let mut acc = Accumulator::new();
        for &b in x.bounds().iter() {
            acc.add(Self::round_and_flush_scalar(b, op));
        }
        Self::finish(acc.finish())
    }

    pub fn run_pair<I: Fn(f64, f64) -> Interval>(
        x: Interval,
        y: Interval,
        op: &PairOp<I>,
    ) -> Interval {
        if !x.is_finite() || !y.is_finite() {
            tracing::trace!(kind = F::KIND.name(), "input is not finite, accepting any");
            return Self::any();
        }
        let (x, y) = match op.extrema {
            Some(extrema) => extrema(x, y),
            None => (x, y),
        };
        let mut acc = Accumulator::new();
        for &bx in x.bounds().iter() {
            for &by in y.bounds().iter() {
                acc.add(Self::round_and_flush_pair(bx, by, op));
            }
        }
        Self::finish(acc.finish())
    }

    pub fn run_triple<I: Fn(f64, f64, f64) -> Interval>(
        x: Interval,
        y: Interval,
        z: Interval,
        op: &TripleOp<I>,
    ) -> Interval {
        if !x.is_finite() || !y.is_finite() || !z.is_finite() {
            tracing::trace!(kind = F::KIND.name(), "input is not finite, accepting any");
            return Self::any();
        }
        let mut acc = Accumulator::new();
        for &bx in x.bounds().iter() {
            for &by in y.bounds().iter() {
                for &bz in z.bounds().iter() {
                    acc.add(Self::round_and_flush_triple(bx, by, bz, op));
                }
            }
        }
        Self::finish(acc.finish())
    }

    pub fn run_vector<I: Fn(&[f64]) -> Interval>(x: &[Interval], op: &VectorOp<I>) -> Interval {
        if !Self::all_finite(x) {
            return Self::finish(None);
        }
        let mut acc = Accumulator::new();
        cartesian(&Self::bounds_all(x), |x| {
            if let Some(result) = Self::round_and_flush_vector(x, op) {
                acc.add(result);
            }
        });
        Self::finish(acc.finish())
    }

    pub fn run_vector_pair<I: Fn(&[f64], &[f64]) -> Interval>(
        x: &[Interval],
        y: &[Interval],
        op: &VectorPairOp<I>,
    ) -> Interval {
        if !Self::all_finite(x) || !Self::all_finite(y) {
            return Self::finish(None);
        }
        let mut acc = Accumulator::new();
        let ys = Self::bounds_all(y);
        cartesian(&Self::bounds_all(x), |x| {
            cartesian(&ys, |y| {
                if let Some(result) = Self::round_and_flush_vector_pair(x, y, op) {
                    acc.add(result);
                }
            })
        });
        Self::finish(acc.finish())
    }

    pub fn run_vector_to_vector<I: Fn(&[f64]) -> Vec<Interval>>(
        x: &[Interval],
        op: &VectorToVectorOp<I>,
    ) -> Vec<Interval> {
        if !Self::all_finite(x) {
            return Self::finish_vector(None, x.len());
        }
        let mut acc = Accumulator::new();
        cartesian(&Self::bounds_all(x), |x| {
            if let Some(result) = Self::round_and_flush_vector_to_vector(x, op) {
                acc.add(result);
            }
        });
        Self::finish_vector(acc.finish(), x.len())
    }

    pub fn run_vector_pair_to_vector<I: Fn(&[f64], &[f64]) -> Vec<Interval>>(
        x: &[Interval],
        y: &[Interval],
        op: &VectorPairToVectorOp<I>,
    ) -> Vec<Interval> {
        if !Self::all_finite(x) || !Self::all_finite(y) {
            return Self::finish_vector(None, x.len());
        }
        let mut acc = Accumulator::new();
        let ys = Self::bounds_all(y);
        cartesian(&Self::bounds_all(x), |x| {
            cartesian(&ys, |y| {
                if let Some(result) = Self::round_and_flush_vector_pair_to_vector(x, y, op) {
                    acc.add(result);
                }
            })
        });
        Self::finish_vector(acc.finish(), x.len())
    }

    pub fn run_matrix_to_matrix<I: Fn(&Matrix<f64>) -> Matrix<Interval>>(
        m: &Matrix<Interval>,
        op: &MatrixToMatrixOp<I>,
    ) -> Matrix<Interval> {
        let any = || F::constants().any_matrix(m.cols(), m.rows());
        if !Self::all_finite(m.elems()) {
            tracing::trace!(kind = F::KIND.name(), "matrix is not finite, accepting any");
            return any();
        }
        let mut acc = Accumulator::new();
        cartesian(&Self::bounds_all(m.elems()), |elems| {
            if let Some(result) = Self::round_and_flush_matrix(&m.with_elems(elems.to_vec()), op) {
                acc.add(result);
            }
        });
        match acc.finish() {
            Some(result) if Self::all_finite(result.elems()) => result,
            Some(result) => {
                tracing::trace!(kind = F::KIND.name(), "matrix is not finite, accepting any");
                F::constants().any_matrix(result.cols(), result.rows())
            }
            None => any(),
        }
    }

    pub fn run_scalar_component_wise<I: Fn(f64) -> Interval>(
        x: &[Interval],
        op: &ScalarOp<I>,
    ) -> Vec<Interval> {
        x.iter().map(|e| Self::run_scalar(*e, op)).collect()
    }

    pub fn run_pair_component_wise<I: Fn(f64, f64) -> Interval>(
        x: &[Interval],
        y: &[Interval],
        op: &PairOp<I>,
    ) -> Vec<Interval> {
        assert_eq!(x.len(), y.len(), "Vectors must have the same length");
        x.iter()
            .zip(y.iter())
            .map(|(a, b)| Self::run_pair(*a, *b, op))
            .collect()
    }

    pub fn run_pair_matrix_component_wise<I: Fn(f64, f64) -> Interval>(
        x: &Matrix<Interval>,
        y: &Matrix<Interval>,
        op: &PairOp<I>,
    ) -> Matrix<Interval> {
        assert_eq!(x.dims(), y.dims(), "Matrices must have the same dimensions");
        x.with_elems(Self::run_pair_component_wise(x.elems(), y.elems(), op))
    }
}
