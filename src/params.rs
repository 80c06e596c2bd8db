//! Generation parameters.
//!
//! A [`ParameterSet`] is an immutable snapshot of everything one generation
//! pass needs. The [`ControlPanel`](crate::ControlPanel) owns the editable
//! copy and hands snapshots to the manager on commit.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::{self, in_unit_range};
use crate::error::{ColorRole, InvalidParameterError};

/// Tunable inputs for one generation pass.
///
/// Defaults match the classic three-armed orange/blue galaxy.
///
/// # Example
///
/// ```
/// use galaxy_field::ParameterSet;
///
/// let params = ParameterSet {
///     count: 20_000,
///     branches: 5,
///     ..ParameterSet::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterSet {
    /// Number of particles to generate.
    pub count: u32,
    /// Point footprint. Only the draw loop reads this.
    pub size: f32,
    /// Outer radius of the spiral disk.
    pub radius: f32,
    /// Number of evenly spaced spiral arms.
    pub branches: u32,
    /// Arm twist, in radians per unit of radius.
    pub spin: f32,
    /// Intended jitter magnitude.
    ///
    /// Exposed for tuning but not applied to the jitter; see
    /// [`generate`](crate::generate).
    pub randomness: f32,
    /// Exponent applied to each jitter draw. Larger values pull jitter toward zero.
    pub randomness_power: f32,
    /// Color at the center of the disk.
    #[serde(with = "color::hex")]
    pub inside_color: Vec3,
    /// Color at the rim of the disk.
    #[serde(with = "color::hex")]
    pub outside_color: Vec3,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.02,
            randomness_power: 3.0,
            // #ff6030
            inside_color: Vec3::new(1.0, 96.0 / 255.0, 48.0 / 255.0),
            // #1b3984
            outside_color: Vec3::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0),
        }
    }
}

impl ParameterSet {
    /// Check the structural preconditions the generator relies on.
    ///
    /// Fails when `count` or `branches` is zero, `radius` is not a finite
    /// positive number, or a color channel is outside `0.0..=1.0`.
    /// `size`, `randomness` and `randomness_power` are range-limited by the
    /// control panel but never rejected here.
    pub fn validate(&self) -> Result<(), InvalidParameterError> {
        if self.count < 1 {
            return Err(InvalidParameterError::ZeroCount);
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(InvalidParameterError::NonPositiveRadius(self.radius));
        }
        if self.branches < 1 {
            return Err(InvalidParameterError::ZeroBranches);
        }
        check_color(ColorRole::Inside, self.inside_color)?;
        check_color(ColorRole::Outside, self.outside_color)?;
        Ok(())
    }

    /// Whether [`validate`](Self::validate) would succeed.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Set the particle count.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Set the disk radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the number of arms.
    pub fn with_branches(mut self, branches: u32) -> Self {
        self.branches = branches;
        self
    }

    /// Set the arm twist.
    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    /// Set the jitter exponent.
    pub fn with_randomness_power(mut self, power: f32) -> Self {
        self.randomness_power = power;
        self
    }

    /// Set both gradient endpoints.
    pub fn with_colors(mut self, inside: Vec3, outside: Vec3) -> Self {
        self.inside_color = inside;
        self.outside_color = outside;
        self
    }
}

fn check_color(which: ColorRole, color: Vec3) -> Result<(), InvalidParameterError> {
    if in_unit_range(color) {
        return Ok(());
    }
    let (channel, value) = ['r', 'g', 'b']
        .into_iter()
        .zip(color.to_array())
        .find(|(_, v)| !(0.0..=1.0).contains(v))
        .unwrap_or(('r', color.x));
    Err(InvalidParameterError::ColorOutOfRange { which, channel, value })
}
