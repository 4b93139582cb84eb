use crate::{format::Format, interval::Interval};
use rand::{Rng, SeedableRng, rngs::StdRng};

/**
Walks every combination of sampled operand values for an operation with one
or more inputs. Each input gets its own set of values, which always includes
the quantized ends of its range followed by random values inside it, all
representable in the format the sampler was built for.
*/
pub(crate) struct Sampler {
    inputs: Vec<Box<[f64]>>,
    counter: Vec<usize>,
    operands: Vec<f64>,
    exhausted: bool,
}

impl Sampler {
    /**
    Create a sampler for values of the format `F`. Each entry of `ranges` is
    the (lower, upper) bound of one operand, and each operand gets
    `samples_per_input` values. The random values are seeded with `seed`,
    so the same arguments always give the same operands.
    */
    pub fn new<F: Format>(ranges: &[(f64, f64)], samples_per_input: usize, seed: u64) -> Sampler {
        assert!(samples_per_input >= 2, "The ends of every range are sampled");
        let mut rng = StdRng::seed_from_u64(seed);
        let inputs: Vec<Box<[f64]>> = ranges
            .iter()
            .map(|&(lower, upper)| {
                let interior = (0..samples_per_input - 2)
                    .map(|_| F::quantize(lower + rng.random::<f64>() * (upper - lower)));
                [F::quantize(lower), F::quantize(upper)]
                    .into_iter()
                    .chain(interior)
                    .collect()
            })
            .collect();
        Sampler {
            counter: vec![0; inputs.len()],
            operands: vec![f64::NAN; inputs.len()],
            exhausted: inputs.is_empty(),
            inputs,
        }
    }

    /// The operands of the next combination, or `None` once every
    /// combination has been produced.
    pub fn next(&mut self) -> Option<&[f64]> {
        if self.exhausted {
            return None;
        }
        for (i, values) in self.inputs.iter().enumerate() {
            self.operands[i] = values[self.counter[i]];
        }
        // Advance like an odometer, with the first operand changing fastest.
        self.exhausted = true;
        for (c, values) in self.counter.iter_mut().zip(&self.inputs) {
            *c += 1;
            if *c < values.len() {
                self.exhausted = false;
                break;
            }
            *c = 0;
        }
        Some(&self.operands)
    }
}

/**
Evaluate the acceptance interval `acceptfn` at randomly sampled inputs, and
assert that it contains the rigorous enclosure computed by `exactfn` for the
same inputs. The inputs are passed to `exactfn` as point intervals.
*/
pub fn check_encloses<F: Format>(
    acceptfn: impl Fn(&[f64]) -> Interval,
    exactfn: impl Fn(&[inari::Interval]) -> inari::Interval,
    ranges: &[(f64, f64)],
    samples_per_input: usize,
) {
    let mut sampler = Sampler::new::<F>(ranges, samples_per_input, 42);
    let mut points = Vec::with_capacity(ranges.len());
    while let Some(sample) = sampler.next() {
        points.clear();
        points.extend(
            sample
                .iter()
                .map(|x| inari::interval!(*x, *x).expect("Samples must be finite")),
        );
        let accepted = acceptfn(sample);
        let exact = exactfn(&points);
        assert!(
            accepted.encloses(exact).unwrap(),
            "{} does not enclose {} at {:?}",
            accepted,
            exact,
            sample
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::format::{F16, F32};

    #[test]
    fn t_sampler_visits_all_combinations() {
        let mut sampler = Sampler::new::<F32>(&[(0.0, 1.0), (-1.0, 0.0)], 5, 42);
        let mut count = 0;
        while let Some(sample) = sampler.next() {
            assert_eq!(sample.len(), 2);
            assert!((0.0..=1.0).contains(&sample[0]));
            assert!((-1.0..=0.0).contains(&sample[1]));
            count += 1;
        }
        assert_eq!(count, 25);
    }

    #[test]
    fn t_sampler_includes_range_ends() {
        let mut sampler = Sampler::new::<F32>(&[(0.1, 2.0)], 4, 1);
        let mut seen = Vec::new();
        while let Some(sample) = sampler.next() {
            seen.push(sample[0]);
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], 0.1f32 as f64);
        assert_eq!(seen[1], 2.0);
        assert!(seen[2..].iter().all(|x| (0.1f32 as f64..=2.0).contains(x)));
    }

    #[test]
    fn t_sampler_representable() {
        let mut sampler = Sampler::new::<F16>(&[(-100.0, 100.0)], 50, 7);
        while let Some(sample) = sampler.next() {
            assert_eq!(F16::quantize(sample[0]), sample[0]);
        }
    }
}
