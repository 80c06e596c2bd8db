//! # galaxy-field - Spiral Particle Field Generator
//!
//! Generates a spiral galaxy as a cloud of colored points and keeps one
//! such field live in a scene, swapping it out safely whenever the
//! parameters change.
//!
//! ## Quick Start
//!
//! ```
//! use galaxy_field::prelude::*;
//!
//! let params = ParameterSet::default().with_count(10_000).with_branches(5);
//! let field = generate(&params, &mut RngSource::seeded(7)).unwrap();
//!
//! assert_eq!(field.len(), 10_000);
//! ```
//!
//! ## Core Concepts
//!
//! ### Parameters
//!
//! A [`ParameterSet`] describes the galaxy: point `count`, `radius`, number
//! of `branches`, how much the arms `spin`, how tightly points hug their
//! arm (`randomness_power`) and the two colors blended from center to rim.
//! Only `count`, `radius`, `branches` and the colors can make a set
//! invalid; see [`ParameterSet::validate`].
//!
//! ### Generation
//!
//! [`generate`] is a pure function of the parameters and a
//! [`RandomSource`]. Seed an [`RngSource`] for reproducible output, or pass
//! a [`Sequence`] (or any `FnMut() -> f32`) to script every draw.
//!
//! ### Live regeneration
//!
//! A [`FieldManager`] owns the single live [`FieldResource`] and swaps it
//! inside any [`SceneGraph`]:
//!
//! ```
//! use galaxy_field::prelude::*;
//!
//! let mut scene = HeadlessScene::new();
//! let mut manager = FieldManager::with_seed(1);
//!
//! manager.regenerate(&ParameterSet::default().with_count(500), &mut scene).unwrap();
//! manager.regenerate(&ParameterSet::default().with_count(800), &mut scene).unwrap();
//!
//! assert_eq!(scene.attached_count(), 1);
//! assert_eq!(scene.current().unwrap().buffers.len(), 800);
//! ```
//!
//! A rejected parameter set leaves the previous field in place. The
//! [`ControlPanel`] sits in front of the manager and regenerates only when
//! an edit is finished.
//!
//! ## Viewer
//!
//! The `galaxy-field` binary opens a window (wgpu + winit) showing the
//! live field, or writes a PNG with `--preview`. Build with the `egui`
//! feature for an on-screen parameter panel.

pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod field;
pub mod generator;
pub mod gpu;
pub mod manager;
pub mod params;
pub mod preview;
pub mod random;
pub mod scene;
pub mod viewer;

pub use glam::Vec3;

pub use config::ViewerConfig;
pub use controls::{ControlPanel, ParamField, ParamRange};
pub use error::{ColorRole, ConfigError, GpuError, InvalidParameterError, PreviewError, ViewerError};
pub use field::{Field, FieldBuffers, ParticleRecord};
pub use generator::{generate, DRAWS_PER_POINT};
pub use manager::{FieldManager, SwapStats};
pub use params::ParameterSet;
pub use preview::{render_preview, save_preview, PreviewOptions, Projection};
pub use random::{RandomSource, RngSource, Sequence};
pub use scene::{FieldResource, HeadlessScene, ResourceId, SceneGraph};

/// Convenient re-exports for common usage.
///
/// ```
/// use galaxy_field::prelude::*;
/// ```
pub mod prelude {
    pub use crate::controls::{ControlPanel, ParamField};
    pub use crate::field::{Field, ParticleRecord};
    pub use crate::generator::generate;
    pub use crate::manager::FieldManager;
    pub use crate::params::ParameterSet;
    pub use crate::random::{RandomSource, RngSource, Sequence};
    pub use crate::scene::{HeadlessScene, SceneGraph};
    pub use crate::Vec3;
}
