//! Parameter editing with explicit commits.
//!
//! [`ControlPanel`] owns the editable [`ParameterSet`]. Edits are clamped
//! and snapped to each field's [`ParamRange`] immediately, but the field is
//! only regenerated when [`commit`](ControlPanel::commit) is called, which
//! the viewer does when an edit is finished (slider released, key released),
//! never on every drag step.
//!
//! # Example
//!
//! ```
//! use galaxy_field::{ControlPanel, FieldManager, HeadlessScene, ParamField, ParameterSet};
//!
//! let mut panel = ControlPanel::new(ParameterSet::default().with_count(1_000));
//! let mut manager = FieldManager::with_seed(0);
//! let mut scene = HeadlessScene::new();
//!
//! panel.set(ParamField::Branches, 4.6);     // snapped to 5
//! panel.nudge(ParamField::Count, 3);        // +300
//! panel.commit(&mut manager, &mut scene).unwrap();
//!
//! let live = manager.live_field().unwrap();
//! assert_eq!(live.params().branches, 5);
//! assert_eq!(live.len(), 1_300);
//! ```

use glam::Vec3;

use crate::error::InvalidParameterError;
use crate::manager::FieldManager;
use crate::params::ParameterSet;
use crate::random::RandomSource;
use crate::scene::{ResourceId, SceneGraph};

/// A numeric field of [`ParameterSet`] that the panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    Count,
    Size,
    Radius,
    Branches,
    Spin,
    Randomness,
    RandomnessPower,
}

impl ParamField {
    /// All editable numeric fields, in panel order.
    pub const ALL: [ParamField; 7] = [
        ParamField::Count,
        ParamField::Size,
        ParamField::Radius,
        ParamField::Branches,
        ParamField::Spin,
        ParamField::Randomness,
        ParamField::RandomnessPower,
    ];

    /// Label shown next to the widget.
    pub fn name(&self) -> &'static str {
        match self {
            ParamField::Count => "count",
            ParamField::Size => "size",
            ParamField::Radius => "radius",
            ParamField::Branches => "branches",
            ParamField::Spin => "spin",
            ParamField::Randomness => "randomness",
            ParamField::RandomnessPower => "randomnessPower",
        }
    }

    /// The allowed range and step for this field.
    pub fn range(&self) -> ParamRange {
        match self {
            ParamField::Count => ParamRange::new(100.0, 1_000_000.0, 100.0),
            ParamField::Size => ParamRange::new(0.001, 0.1, 0.001),
            ParamField::Radius => ParamRange::new(1.0, 10.0, 1.0),
            ParamField::Branches => ParamRange::new(1.0, 10.0, 1.0),
            ParamField::Spin => ParamRange::new(1.0, 10.0, 1.0),
            ParamField::Randomness => ParamRange::new(0.0, 2.0, 0.001),
            ParamField::RandomnessPower => ParamRange::new(1.0, 10.0, 0.1),
        }
    }

    /// Whether the field holds an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, ParamField::Count | ParamField::Branches)
    }

    /// Read this field from a parameter set.
    pub fn get(&self, params: &ParameterSet) -> f64 {
        match self {
            ParamField::Count => params.count as f64,
            ParamField::Size => params.size as f64,
            ParamField::Radius => params.radius as f64,
            ParamField::Branches => params.branches as f64,
            ParamField::Spin => params.spin as f64,
            ParamField::Randomness => params.randomness as f64,
            ParamField::RandomnessPower => params.randomness_power as f64,
        }
    }

    fn write(&self, params: &mut ParameterSet, value: f64) {
        match self {
            ParamField::Count => params.count = value as u32,
            ParamField::Size => params.size = value as f32,
            ParamField::Radius => params.radius = value as f32,
            ParamField::Branches => params.branches = value as u32,
            ParamField::Spin => params.spin = value as f32,
            ParamField::Randomness => params.randomness = value as f32,
            ParamField::RandomnessPower => params.randomness_power = value as f32,
        }
    }
}

/// Inclusive range with a step grid anchored at `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp into range and snap to the nearest step.
    ///
    /// NaN maps to `min`.
    pub fn apply(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        // Round away float noise from the multiplication (0.1 * 3 etc).
        let snapped = round_to(self.min + steps * self.step, self.step);
        snapped.clamp(self.min, self.max)
    }
}

fn round_to(value: f64, step: f64) -> f64 {
    let decimals = (-step.log10()).ceil().max(0.0) as i32 + 1;
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Owner of the editable parameter set.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    params: ParameterSet,
    dirty: bool,
    #[cfg_attr(not(feature = "egui"), allow(dead_code))]
    color_pending: bool,
}

impl ControlPanel {
    /// Start editing `params`, taken as is.
    ///
    /// Values outside a field's [`ParamRange`] are kept until that field is
    /// edited; only [`set`](Self::set), [`nudge`](Self::nudge) and the color
    /// setters clamp.
    pub fn new(params: ParameterSet) -> Self {
        Self {
            params,
            dirty: false,
            color_pending: false,
        }
    }

    /// The current (possibly uncommitted) parameters.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Whether there are edits not yet committed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Force the next [`commit`](Self::commit) to regenerate, even without edits.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Set a numeric field, clamped and snapped to its range.
    ///
    /// Returns the value actually stored.
    pub fn set(&mut self, field: ParamField, value: f64) -> f64 {
        let applied = field.range().apply(value);
        let mut next = self.params.clone();
        field.write(&mut next, applied);
        if next != self.params {
            self.params = next;
            self.dirty = true;
        }
        applied
    }

    /// Move a numeric field by `steps` multiples of its step.
    pub fn nudge(&mut self, field: ParamField, steps: i32) -> f64 {
        let current = field.get(&self.params);
        self.set(field, current + steps as f64 * field.range().step)
    }

    /// Set the center color. Channels are clamped to `0.0..=1.0`.
    pub fn set_inside_color(&mut self, color: Vec3) {
        let color = clamp_color(color);
        if self.params.inside_color != color {
            self.params.inside_color = color;
            self.dirty = true;
        }
    }

    /// Set the rim color. Channels are clamped to `0.0..=1.0`.
    pub fn set_outside_color(&mut self, color: Vec3) {
        let color = clamp_color(color);
        if self.params.outside_color != color {
            self.params.outside_color = color;
            self.dirty = true;
        }
    }

    /// Regenerate from the current parameters if anything changed.
    ///
    /// Returns `Ok(None)` when there was nothing to commit. On error the
    /// edits stay pending so the user can fix them and commit again.
    pub fn commit<R, S>(
        &mut self,
        manager: &mut FieldManager<R>,
        scene: &mut S,
    ) -> Result<Option<ResourceId>, InvalidParameterError>
    where
        R: RandomSource,
        S: SceneGraph + ?Sized,
    {
        if !self.dirty {
            return Ok(None);
        }
        let id = manager.regenerate(&self.params, scene)?;
        self.dirty = false;
        Ok(Some(id))
    }

    /// Draw the panel. Returns `true` when an edit was just finished and
    /// should be committed.
    #[cfg(feature = "egui")]
    pub fn ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut finished = false;

        for field in ParamField::ALL {
            let range = field.range();
            let mut value = field.get(&self.params);
            let mut slider = egui::Slider::new(&mut value, range.min..=range.max)
                .step_by(range.step)
                .clamping(egui::SliderClamping::Edits)
                .text(field.name());
            if field.is_integer() {
                slider = slider.integer();
            }
            if field == ParamField::Count {
                slider = slider.logarithmic(true);
            }

            let response = ui.add(slider);
            if response.changed() {
                self.set(field, value);
            }
            let released = response.drag_stopped() || response.lost_focus();
            let stepped = response.changed() && !response.dragged() && !response.has_focus();
            finished |= released || stepped;
        }

        let mut inside = self.params.inside_color.to_array();
        let mut outside = self.params.outside_color.to_array();
        ui.horizontal(|ui| {
            ui.color_edit_button_rgb(&mut inside);
            ui.label("insideColor");
        });
        ui.horizontal(|ui| {
            ui.color_edit_button_rgb(&mut outside);
            ui.label("outsideColor");
        });
        let before = (self.params.inside_color, self.params.outside_color);
        self.set_inside_color(Vec3::from_array(inside));
        self.set_outside_color(Vec3::from_array(outside));
        if before != (self.params.inside_color, self.params.outside_color) {
            self.color_pending = true;
        }

        // Colors commit once the picker closes.
        if self.color_pending && !ui.ctx().memory(|m| m.any_popup_open()) {
            self.color_pending = false;
            finished = true;
        }

        ui.separator();
        if ui.button("Regenerate").clicked() {
            self.mark_dirty();
            finished = true;
        }

        finished && self.dirty
    }
}

fn clamp_color(color: Vec3) -> Vec3 {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE);
    // clamp keeps NaN; treat it as black
    Vec3::from_array(c.to_array().map(|v| if v.is_nan() { 0.0 } else { v }))
}
