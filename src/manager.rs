//! Live regeneration of the displayed field.
//!
//! [`FieldManager`] owns a single slot holding the live [`FieldResource`].
//! Each successful [`regenerate`](FieldManager::regenerate) swaps it:
//!
//! 1. validate the new parameters (a rejected set changes nothing),
//! 2. detach the old resource from the scene and dispose it,
//! 3. generate the new field,
//! 4. attach the new resource and store it in the slot.
//!
//! Old and new generations are never attached at the same time, and a
//! rejected call never leaves the scene without its previous field.
//!
//! # Example
//!
//! ```
//! use galaxy_field::{FieldManager, HeadlessScene, ParameterSet};
//!
//! let mut scene = HeadlessScene::new();
//! let mut manager = FieldManager::with_seed(3);
//!
//! manager.regenerate(&ParameterSet::default().with_count(1_000), &mut scene).unwrap();
//! assert!(manager.regenerate(&ParameterSet::default().with_count(0), &mut scene).is_err());
//!
//! // The first field is still the one on display.
//! assert_eq!(scene.attached_count(), 1);
//! assert_eq!(manager.live().unwrap().field().len(), 1_000);
//! ```

use rand::rngs::SmallRng;

use crate::error::InvalidParameterError;
use crate::field::Field;
use crate::generator::generate_unchecked;
use crate::params::ParameterSet;
use crate::random::{RandomSource, RngSource};
use crate::scene::{FieldResource, ResourceId, SceneGraph};

/// Counters describing what a manager has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapStats {
    /// Fields generated and attached.
    pub generations: u64,
    /// Resources detached and disposed.
    pub disposals: u64,
    /// `regenerate` calls rejected by validation.
    pub rejected: u64,
}

/// Owner of the live field and its swap protocol.
pub struct FieldManager<R = RngSource<SmallRng>> {
    rng: R,
    live: Option<FieldResource>,
    next_id: u64,
    stats: SwapStats,
}

impl FieldManager {
    /// Manager drawing from an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_source(RngSource::from_entropy())
    }

    /// Manager drawing from a fixed-seed generator.
    ///
    /// Two managers with the same seed fed the same parameter sequence
    /// produce identical fields.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(RngSource::seeded(seed))
    }
}

impl Default for FieldManager {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> FieldManager<R> {
    /// Manager drawing from an arbitrary source.
    pub fn with_source(rng: R) -> Self {
        Self {
            rng,
            live: None,
            next_id: 1,
            stats: SwapStats::default(),
        }
    }

    /// Replace the live field with one generated from `params`.
    ///
    /// On [`InvalidParameterError`] nothing changes: the previous resource
    /// (if any) stays live and attached, and the error is returned.
    pub fn regenerate<S: SceneGraph + ?Sized>(
        &mut self,
        params: &ParameterSet,
        scene: &mut S,
    ) -> Result<ResourceId, InvalidParameterError> {
        if let Err(e) = params.validate() {
            self.stats.rejected += 1;
            tracing::warn!(error = %e, "rejected parameter set, keeping current field");
            return Err(e);
        }

        self.release(scene);

        let field = generate_unchecked(params, &mut self.rng);
        let id = ResourceId(self.next_id);
        self.next_id += 1;

        let resource = FieldResource::new(id, field);
        scene.attach(&resource);
        self.live = Some(resource);
        self.stats.generations += 1;

        tracing::info!(
            %id,
            count = params.count,
            branches = params.branches,
            radius = params.radius,
            spin = params.spin,
            "regenerated field"
        );
        Ok(id)
    }

    /// Detach and dispose the live field, leaving the slot empty.
    ///
    /// Used on shutdown. Returns the id that was released, if any.
    pub fn clear<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> Option<ResourceId> {
        self.release(scene)
    }

    /// The resource currently on display.
    pub fn live(&self) -> Option<&FieldResource> {
        self.live.as_ref()
    }

    /// The field currently on display.
    pub fn live_field(&self) -> Option<&Field> {
        self.live.as_ref().map(FieldResource::field)
    }

    /// Id of the resource currently on display.
    pub fn live_id(&self) -> Option<ResourceId> {
        self.live.as_ref().map(FieldResource::id)
    }

    /// Counters since construction.
    pub fn stats(&self) -> SwapStats {
        self.stats
    }

    /// Mutable access to the random source, e.g. to reseed it.
    pub fn source_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    fn release<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) -> Option<ResourceId> {
        let mut old = self.live.take()?;
        let id = old.id();
        scene.detach(id);
        old.dispose();
        self.stats.disposals += 1;
        tracing::debug!(%id, "disposed field");
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::Sequence;
    use crate::scene::HeadlessScene;

    /// Scene that records the order of calls it receives.
    #[derive(Default)]
    struct CallLog {
        calls: Vec<String>,
    }

    impl SceneGraph for CallLog {
        fn attach(&mut self, resource: &FieldResource) {
            self.calls.push(format!("attach {}", resource.id().get()));
        }

        fn detach(&mut self, id: ResourceId) {
            self.calls.push(format!("detach {}", id.get()));
        }
    }

    #[test]
    fn test_detach_precedes_attach() {
        let mut log = CallLog::default();
        let mut manager = FieldManager::with_source(Sequence::constant(0.5));
        let params = ParameterSet::default().with_count(10);

        manager.regenerate(&params, &mut log).unwrap();
        manager.regenerate(&params, &mut log).unwrap();
        manager.clear(&mut log);

        assert_eq!(log.calls, vec!["attach 1", "detach 1", "attach 2", "detach 2"]);
    }

    #[test]
    fn test_rejected_params_keep_live_field() {
        let mut scene = HeadlessScene::new();
        let mut manager = FieldManager::with_seed(1);

        let first = manager
            .regenerate(&ParameterSet::default().with_count(50), &mut scene)
            .unwrap();
        let err = manager
            .regenerate(&ParameterSet::default().with_radius(0.0), &mut scene)
            .unwrap_err();

        assert_eq!(err, InvalidParameterError::NonPositiveRadius(0.0));
        assert_eq!(manager.live_id(), Some(first));
        assert!(!manager.live().unwrap().is_disposed());
        assert_eq!(scene.attached_ids(), vec![first]);
        assert_eq!(scene.detach_calls(), 0);
        assert_eq!(
            manager.stats(),
            SwapStats {
                generations: 1,
                disposals: 0,
                rejected: 1
            }
        );
    }

    #[test]
    fn test_rejected_first_call_leaves_nothing() {
        let mut scene = HeadlessScene::new();
        let mut manager = FieldManager::with_seed(1);

        assert!(manager
            .regenerate(&ParameterSet::default().with_branches(0), &mut scene)
            .is_err());
        assert!(manager.live().is_none());
        assert_eq!(scene.attach_calls(), 0);
    }

    #[test]
    fn test_ids_increase() {
        let mut scene = HeadlessScene::new();
        let mut manager = FieldManager::with_seed(1);
        let params = ParameterSet::default().with_count(5);

        let a = manager.regenerate(&params, &mut scene).unwrap();
        let b = manager.regenerate(&params, &mut scene).unwrap();
        assert!(b > a);
        assert_eq!(manager.stats().disposals, 1);
    }

    #[test]
    fn test_clear_empties_slot() {
        let mut scene = HeadlessScene::new();
        let mut manager = FieldManager::with_seed(1);
        let id = manager
            .regenerate(&ParameterSet::default().with_count(5), &mut scene)
            .unwrap();

        assert_eq!(manager.clear(&mut scene), Some(id));
        assert_eq!(manager.clear(&mut scene), None);
        assert!(manager.live_field().is_none());
        assert_eq!(scene.attached_count(), 0);
    }
}
