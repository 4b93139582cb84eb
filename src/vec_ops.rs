use crate::{
    error::Error,
    format::Format,
    framework::{
        FpTraits, ScalarOp, VectorOp, VectorPairOp, VectorPairToVectorOp, VectorToVectorOp,
        for_each_permutation,
    },
    interval::{Interval, Operand},
};

/// Vectors have 2, 3 or 4 elements.
fn check_len(len: usize) -> Result<(), Error> {
    if (2..=4).contains(&len) {
        Ok(())
    } else {
        Err(Error::InvalidDimensions)
    }
}

fn check_pair(x: usize, y: usize) -> Result<(), Error> {
    if x != y {
        return Err(Error::DimensionMismatch((x, 1), (y, 1)));
    }
    check_len(x)
}

impl<F: Format> FpTraits<F> {
    pub(crate) fn to_vector<T: Into<Operand> + Copy>(x: &[T]) -> Vec<Interval> {
        x.iter().map(|e| Self::to_interval(*e)).collect()
    }

    /// Candidates handed to an implementation are already representable.
    fn points(x: &[f64]) -> Vec<Interval> {
        x.iter().map(|e| Interval::point(F::KIND, *e)).collect()
    }

    fn fold_sum(terms: &[Interval]) -> Interval {
        terms[1..]
            .iter()
            .fold(terms[0], |acc, t| Self::addition(acc, *t))
    }

    /**
    Sum of `terms` in every order of accumulation. An implementation may
    add the terms in any order, and an intermediate sum can overflow in one
    order but not in another. Two terms only have one order.
    */
    pub(crate) fn sum_all_orders(terms: &[Interval]) -> Interval {
        assert!(!terms.is_empty(), "Cannot sum nothing");
        if terms.len() <= 2 {
            return Self::fold_sum(terms);
        }
        let mut sum = Self::fold_sum(terms);
        for_each_permutation(terms, |order| sum = sum.hull(Self::fold_sum(order)));
        sum
    }

    pub(crate) fn dot_intervals(x: &[Interval], y: &[Interval]) -> Interval {
        let op = VectorPairOp::new(|x: &[f64], y: &[f64]| {
            let products = Self::run_pair_component_wise(
                &Self::points(x),
                &Self::points(y),
                &Self::multiplication_op(),
            );
            Self::sum_all_orders(&products)
        });
        Self::run_vector_pair(x, y, &op)
    }

    pub fn dot<T: Into<Operand> + Copy>(x: &[T], y: &[T]) -> Result<Interval, Error> {
        check_pair(x.len(), y.len())?;
        Ok(Self::dot_intervals(&Self::to_vector(x), &Self::to_vector(y)))
    }

    pub(crate) fn length_intervals(x: &[Interval]) -> Interval {
        let op = VectorOp::new(|n: &[f64]| {
            let n = Self::points(n);
            Self::sqrt(Self::dot_intervals(&n, &n))
        });
        Self::run_vector(x, &op)
    }

    /// `sqrt(dot(x, x))`.
    pub fn length_vector<T: Into<Operand> + Copy>(x: &[T]) -> Result<Interval, Error> {
        check_len(x.len())?;
        Ok(Self::length_intervals(&Self::to_vector(x)))
    }

    /// Length of the component-wise difference.
    pub fn distance_vector<T: Into<Operand> + Copy>(x: &[T], y: &[T]) -> Result<Interval, Error> {
        check_pair(x.len(), y.len())?;
        let op = VectorPairOp::new(|x: &[f64], y: &[f64]| {
            Self::length_intervals(&Self::run_pair_component_wise(
                &Self::points(x),
                &Self::points(y),
                &Self::subtraction_op(),
            ))
        });
        Ok(Self::run_vector_pair(
            &Self::to_vector(x),
            &Self::to_vector(y),
            &op,
        ))
    }

    pub fn cross<T: Into<Operand> + Copy>(x: &[T], y: &[T]) -> Result<Vec<Interval>, Error> {
        check_pair(x.len(), y.len())?;
        if x.len() != 3 {
            return Err(Error::InvalidDimensions);
        }
        let op = VectorPairToVectorOp::new(|x: &[f64], y: &[f64]| {
            let term = |a: usize, b: usize| {
                Self::subtraction(
                    Self::multiplication(x[a], y[b]),
                    Self::multiplication(x[b], y[a]),
                )
            };
            vec![term(1, 2), term(2, 0), term(0, 1)]
        });
        Ok(Self::run_vector_pair_to_vector(
            &Self::to_vector(x),
            &Self::to_vector(y),
            &op,
        ))
    }

    /// Each element divided by the length of the vector.
    pub fn normalize<T: Into<Operand> + Copy>(x: &[T]) -> Result<Vec<Interval>, Error> {
        check_len(x.len())?;
        let op = VectorToVectorOp::new(|n: &[f64]| {
            let length = Self::length_intervals(&Self::points(n));
            n.iter().map(|e| Self::division(*e, length)).collect()
        });
        Ok(Self::run_vector_to_vector(&Self::to_vector(x), &op))
    }

    /// Reflection of the incident vector `x` about the normal `y`, i.e. `x -
    /// 2 * dot(x, y) * y`.
    pub fn reflect<T: Into<Operand> + Copy>(x: &[T], y: &[T]) -> Result<Vec<Interval>, Error> {
        check_pair(x.len(), y.len())?;
        let op = VectorPairToVectorOp::new(|x: &[f64], y: &[f64]| {
            let x = Self::points(x);
            let t = Self::multiplication(2.0, Self::dot_intervals(&x, &Self::points(y)));
            let rhs: Vec<Interval> = y.iter().map(|e| Self::multiplication(*e, t)).collect();
            Self::run_pair_component_wise(&x, &rhs, &Self::subtraction_op())
        });
        Ok(Self::run_vector_pair_to_vector(
            &Self::to_vector(x),
            &Self::to_vector(y),
            &op,
        ))
    }

    /**
    Refraction of the incident vector `i` through the surface with normal `s`
    and ratio of indices `r`. With `k = 1 - r^2 * (1 - dot(s, i)^2)` the
    result is `i * r - (dot(s, i) * r + sqrt(k)) * s`, or the zero vector if
    `k` is negative. When `k` can be zero or subnormal the result is any,
    because an implementation may take either branch.
    */
    pub fn refract<T: Into<Operand> + Copy>(
        i: &[T],
        s: &[T],
        r: f64,
    ) -> Result<Vec<Interval>, Error> {
        check_pair(i.len(), s.len())?;
        let c = F::constants();
        let i = Self::to_vector(i);
        let s = Self::to_vector(s);
        let r_squared = Self::multiplication(r, r);
        let dot = Self::dot_intervals(&s, &i);
        let dot_squared = Self::multiplication(dot, dot);
        let one_minus_dot_squared = Self::subtraction(1.0, dot_squared);
        let k = Self::subtraction(
            1.0,
            Self::multiplication(r_squared, one_minus_dot_squared),
        );
        if !k.is_finite() || k.contains_zero_or_subnormals() {
            tracing::trace!(kind = F::KIND.name(), "refraction can take either branch");
            return Ok(c.any_vector(i.len()));
        }
        if k.end() < 0.0 {
            return Ok(c.zero_vector(i.len()));
        }
        let t = Self::addition(Self::multiplication(dot, r), Self::sqrt(k));
        let lhs: Vec<Interval> = i.iter().map(|e| Self::multiplication(*e, r)).collect();
        let rhs: Vec<Interval> = s.iter().map(|e| Self::multiplication(*e, t)).collect();
        Ok(Self::run_pair_component_wise(
            &lhs,
            &rhs,
            &Self::subtraction_op(),
        ))
    }

    /**
    The acceptable results of `face_forward(x, y, z)`, which is `x` if
    `dot(z, y) < 0` and `-x` otherwise. The dot product is an interval, so
    both `x` and `-x` may be acceptable. `None` is in the list when the dot
    product is not finite, in which case the result is unconstrained.
    */
    pub fn face_forward<T: Into<Operand> + Copy>(
        x: &[T],
        y: &[T],
        z: &[T],
    ) -> Result<Vec<Option<Vec<Interval>>>, Error> {
        check_pair(x.len(), y.len())?;
        check_pair(x.len(), z.len())?;
        let x = Self::to_vector(x);
        let positive = Self::run_scalar_component_wise(
            &x,
            &ScalarOp::new(Interval::correctly_rounded::<F>),
        );
        let negative = Self::run_scalar_component_wise(
            &x,
            &ScalarOp::new(|n: f64| Self::correctly_rounded(-n)),
        );
        let dot = Self::dot_intervals(&Self::to_vector(z), &Self::to_vector(y));
        let mut results = Vec::with_capacity(3);
        if !dot.is_finite() {
            results.push(None);
        }
        if dot.begin() < 0.0 || dot.end() < 0.0 {
            results.push(Some(positive));
        }
        if dot.begin() >= 0.0 || dot.end() >= 0.0 {
            results.push(Some(negative));
        }
        Ok(results)
    }
}
