//! Random sources for field generation.
//!
//! The generator never reaches for an ambient RNG. It draws from whatever
//! [`RandomSource`] it is handed, which lets tests stub every draw and lets
//! callers reproduce a field by seeding the source.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A supplier of uniform samples in `[0, 1)`.
///
/// Implemented for [`RngSource`], for [`Sequence`], and for any
/// `FnMut() -> f32` closure:
///
/// ```
/// use galaxy_field::{generate, ParameterSet};
///
/// let mut always_zero = || 0.0_f32;
/// let field = generate(&ParameterSet::default().with_count(4), &mut always_zero).unwrap();
/// assert!(field.records().iter().all(|r| r.position == glam::Vec3::ZERO));
/// ```
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32;
}

impl<F: FnMut() -> f32> RandomSource for F {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self()
    }
}

/// Adapter turning any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Unwrap the inner generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<SmallRng> {
    /// Fast generator seeded from OS entropy. Different every run.
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }

    /// Fast generator with a fixed seed. Same seed, same field.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.rng.gen()
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
///
/// Values are clamped into `[0, 1)` so a stub cannot push the generator
/// outside its documented ranges.
#[derive(Debug, Clone)]
pub struct Sequence {
    values: Vec<f32>,
    cursor: usize,
}

impl Sequence {
    /// Build a sequence. An empty list behaves like a constant `0.0`.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for Sequence {
    fn next_f32(&mut self) -> f32 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_source_in_unit_interval() {
        let mut source = RngSource::from_entropy();
        for _ in 0..1000 {
            let v = source.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_seeded_sources_agree() {
        let mut a = RngSource::seeded(7);
        let mut b = RngSource::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn test_sequence_wraps_and_counts() {
        let mut seq = Sequence::new(vec![0.1, 0.2]);
        assert_eq!(seq.next_f32(), 0.1);
        assert_eq!(seq.next_f32(), 0.2);
        assert_eq!(seq.next_f32(), 0.1);
        assert_eq!(seq.draws(), 3);
    }

    #[test]
    fn test_sequence_clamps() {
        let mut seq = Sequence::new(vec![-1.0, 5.0]);
        assert_eq!(seq.next_f32(), 0.0);
        assert!(seq.next_f32() < 1.0);

        let mut empty = Sequence::new(Vec::new());
        assert_eq!(empty.next_f32(), 0.0);
    }

    #[test]
    fn test_closure_source() {
        let mut n = 0.0_f32;
        let mut source = move || {
            n += 0.25;
            n
        };
        assert_eq!(RandomSource::next_f32(&mut source), 0.25);
        assert_eq!(RandomSource::next_f32(&mut source), 0.5);
    }
}
