//! Spiral field generation.
//!
//! Each point is placed on one of `branches` evenly spaced arms (chosen
//! round-robin by index), at a uniformly drawn distance from the center,
//! twisted by `spin * distance`, then pushed off the arm by per-axis jitter.
//!
//! # Draw order
//!
//! Per point, samples are taken from the [`RandomSource`] in this order:
//!
//! | # | use |
//! |---|-----|
//! | 1 | distance from center |
//! | 2, 3 | x jitter magnitude, x jitter sign |
//! | 4, 5 | y jitter magnitude, y jitter sign |
//! | 6, 7 | z jitter magnitude, z jitter sign |
//!
//! Stubbing a source therefore needs seven values per point.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::color;
use crate::error::InvalidParameterError;
use crate::field::{Field, ParticleRecord};
use crate::params::ParameterSet;
use crate::random::RandomSource;

/// Number of samples [`generate`] draws per point.
pub const DRAWS_PER_POINT: usize = 7;

/// Generate a spiral field from `params`, drawing randomness from `rng`.
///
/// Fails with [`InvalidParameterError`] if `params` does not pass
/// [`ParameterSet::validate`]; nothing is drawn from `rng` in that case.
///
/// `randomness` is carried in the parameter set but does not scale the
/// jitter: each axis offset is `±v^randomness_power` with `v` uniform in
/// `[0, 1)`, so the offset always stays within `[-1, 1]`.
///
/// # Example
///
/// ```
/// use galaxy_field::{generate, ParameterSet, RngSource};
///
/// let params = ParameterSet::default().with_count(1_000);
/// let field = generate(&params, &mut RngSource::seeded(1)).unwrap();
/// assert_eq!(field.len(), 1_000);
/// ```
pub fn generate<R: RandomSource + ?Sized>(
    params: &ParameterSet,
    rng: &mut R,
) -> Result<Field, InvalidParameterError> {
    params.validate()?;
    Ok(generate_unchecked(params, rng))
}

/// Generation without validation. `params` must already be valid.
pub(crate) fn generate_unchecked<R: RandomSource + ?Sized>(params: &ParameterSet, rng: &mut R) -> Field {
    let records = (0..params.count)
        .map(|i| spiral_point(params, i, &mut *rng))
        .collect();
    Field::new(records, params.clone())
}

/// Place the `index`-th point of the spiral.
fn spiral_point<R: RandomSource + ?Sized>(params: &ParameterSet, index: u32, rng: &mut R) -> ParticleRecord {
    let branch_radius = rng.next_f32() * params.radius;
    let spin_angle = params.spin * branch_radius;
    let branch_angle = (index % params.branches) as f32 / params.branches as f32 * TAU;

    let jitter = Vec3::new(
        jitter(rng, params.randomness_power),
        jitter(rng, params.randomness_power),
        jitter(rng, params.randomness_power),
    );

    let angle = branch_angle + spin_angle;
    let position = Vec3::new(
        angle.sin() * branch_radius + jitter.x,
        jitter.y,
        angle.cos() * branch_radius + jitter.z,
    );

    let factor = branch_radius / params.radius;
    ParticleRecord {
        position,
        color: color::mix(params.inside_color, params.outside_color, factor),
    }
}

/// One axis of jitter: `±v^power`, sign chosen with equal probability.
#[inline]
fn jitter<R: RandomSource + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let magnitude = rng.next_f32().powf(power);
    let sign = if rng.next_f32() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, Sequence};

    fn center_params() -> ParameterSet {
        ParameterSet {
            count: 3,
            radius: 5.0,
            branches: 3,
            spin: 0.0,
            randomness: 0.0,
            randomness_power: 1.0,
            inside_color: Vec3::new(1.0, 0.0, 0.0),
            outside_color: Vec3::new(0.0, 0.0, 1.0),
            ..ParameterSet::default()
        }
    }

    #[test]
    fn test_all_zero_draws_collapse_to_center() {
        let mut zeros = Sequence::constant(0.0);
        let field = generate(&center_params(), &mut zeros).unwrap();

        assert_eq!(field.len(), 3);
        for record in field.records() {
            assert_eq!(record.position, Vec3::ZERO);
            assert_eq!(record.color, Vec3::new(1.0, 0.0, 0.0));
        }
        assert_eq!(zeros.draws(), 3 * DRAWS_PER_POINT);
    }

    #[test]
    fn test_branch_assignment_is_round_robin() {
        // Distance 0.5 * radius, no jitter magnitude, positive signs.
        let mut seq = Sequence::new(vec![0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let params = center_params().with_count(6);
        let field = generate(&params, &mut seq).unwrap();

        let r = 2.5;
        for (i, record) in field.records().iter().enumerate() {
            let angle = (i % 3) as f32 / 3.0 * TAU;
            assert!((record.position.x - angle.sin() * r).abs() < 1e-5);
            assert!((record.position.z - angle.cos() * r).abs() < 1e-5);
            assert_eq!(record.position.y, 0.0);
        }
        assert_eq!(field.records()[0].position, field.records()[3].position);
    }

    #[test]
    fn test_spin_twists_by_distance() {
        let mut seq = Sequence::new(vec![0.2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let params = center_params().with_count(1).with_spin(2.0);
        let field = generate(&params, &mut seq).unwrap();

        // distance 1.0, spin angle 2.0 rad, branch 0
        let p = field.records()[0].position;
        assert!((p.x - 2.0_f32.sin()).abs() < 1e-5);
        assert!((p.z - 2.0_f32.cos()).abs() < 1e-5);
    }

    #[test]
    fn test_jitter_sign_and_power() {
        // distance 0; x: 0.5^2 positive, y: 0.5^2 negative, z: zero
        let mut seq = Sequence::new(vec![0.0, 0.5, 0.1, 0.5, 0.9, 0.0, 0.0]);
        let params = center_params().with_count(1).with_randomness_power(2.0);
        let p = generate(&params, &mut seq).unwrap().records()[0].position;

        assert!((p.x - 0.25).abs() < 1e-6);
        assert!((p.y + 0.25).abs() < 1e-6);
        assert_eq!(p.z, 0.0);
    }

    #[test]
    fn test_randomness_does_not_scale_jitter() {
        let draws = vec![0.0, 0.8, 0.1, 0.8, 0.1, 0.8, 0.1];
        let low = center_params().with_count(1);
        let high = ParameterSet { randomness: 2.0, ..low.clone() };

        let a = generate(&low, &mut Sequence::new(draws.clone())).unwrap();
        let b = generate(&high, &mut Sequence::new(draws)).unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn test_invalid_params_draw_nothing() {
        let mut seq = Sequence::constant(0.3);
        assert!(generate(&center_params().with_branches(0), &mut seq).is_err());
        assert_eq!(seq.draws(), 0);
    }

    #[test]
    fn test_boundary_colors_are_exact() {
        let params = center_params().with_count(2);

        let mut at_rim = || 1.0_f32;
        for record in generate(&params, &mut at_rim).unwrap().records() {
            assert_eq!(record.color, params.outside_color);
        }

        let mut at_center = || 0.0_f32;
        for record in generate(&params, &mut at_center).unwrap().records() {
            assert_eq!(record.color, params.inside_color);
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let params = ParameterSet::default().with_count(500);
        let a = generate(&params, &mut RngSource::seeded(99)).unwrap();
        let b = generate(&params, &mut RngSource::seeded(99)).unwrap();
        let c = generate(&params, &mut RngSource::seeded(100)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
