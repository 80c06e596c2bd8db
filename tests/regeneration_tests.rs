//! Integration tests for live regeneration.
//!
//! A recording scene stands in for the renderer so each test can check
//! exactly what was attached and detached, and in what order.

use std::collections::HashSet;

use galaxy_field::{
    ControlPanel, FieldManager, FieldResource, HeadlessScene, InvalidParameterError, ParamField,
    ParameterSet, ResourceId, SceneGraph, Sequence, Vec3,
};

/// Scene that tracks live ids and fails the test on any protocol violation.
#[derive(Default)]
struct StrictScene {
    live: HashSet<ResourceId>,
    seen: Vec<ResourceId>,
    max_live: usize,
}

impl SceneGraph for StrictScene {
    fn attach(&mut self, resource: &FieldResource) {
        assert!(!resource.is_disposed(), "attached a disposed resource");
        assert!(!self.seen.contains(&resource.id()), "id {} reused", resource.id());
        self.live.insert(resource.id());
        self.seen.push(resource.id());
        self.max_live = self.max_live.max(self.live.len());
    }

    fn detach(&mut self, id: ResourceId) {
        assert!(self.live.remove(&id), "detached {} which was not attached", id);
    }
}

fn small(count: u32) -> ParameterSet {
    ParameterSet::default().with_count(count)
}

// ============================================================================
// Swap protocol
// ============================================================================

#[test]
fn test_a_then_b_leaves_only_b() {
    let mut scene = HeadlessScene::new();
    let mut manager = FieldManager::with_seed(4);

    let a = manager.regenerate(&small(100), &mut scene).unwrap();
    let b = manager.regenerate(&small(200).with_branches(7), &mut scene).unwrap();

    assert_ne!(a, b);
    assert_eq!(scene.attached_ids(), vec![b]);
    assert_eq!(manager.live_id(), Some(b));

    let live = manager.live_field().unwrap();
    assert_eq!(live.len(), 200);
    assert_eq!(live.params().branches, 7);
    assert_eq!(scene.current().unwrap().buffers.len(), 200);
}

#[test]
fn test_never_more_than_one_attached() {
    let mut scene = StrictScene::default();
    let mut manager = FieldManager::with_seed(5);

    for i in 1..=25 {
        manager.regenerate(&small(i * 10), &mut scene).unwrap();
    }
    manager.clear(&mut scene);

    assert_eq!(scene.max_live, 1);
    assert!(scene.live.is_empty());
    assert_eq!(scene.seen.len(), 25);
}

#[test]
fn test_failed_regenerate_keeps_previous_field() {
    let mut scene = HeadlessScene::new();
    let mut manager = FieldManager::with_seed(6);

    let first = manager.regenerate(&small(300), &mut scene).unwrap();
    let before = manager.live_field().unwrap().clone();

    let bad = [
        small(0),
        small(10).with_radius(0.0),
        small(10).with_branches(0),
        small(10).with_colors(Vec3::new(0.0, -0.1, 0.0), Vec3::ONE),
        small(10).with_radius(f32::NAN),
    ];
    for params in &bad {
        assert!(manager.regenerate(params, &mut scene).is_err());
        assert_eq!(scene.attached_ids(), vec![first]);
    }

    assert_eq!(manager.live_field(), Some(&before));
    assert!(!manager.live().unwrap().is_disposed());
    assert_eq!(manager.stats().rejected, bad.len() as u64);
    assert_eq!(manager.stats().disposals, 0);
}

#[test]
fn test_error_is_returned_unchanged() {
    let mut scene = HeadlessScene::new();
    let mut manager = FieldManager::with_seed(6);

    let err = manager.regenerate(&small(0), &mut scene).unwrap_err();
    assert_eq!(err, InvalidParameterError::ZeroCount);
    assert_eq!(err.to_string(), "count must be at least 1");
}

#[test]
fn test_disposed_resources_are_released() {
    let mut scene = HeadlessScene::new();
    let mut manager = FieldManager::with_source(Sequence::constant(0.25));

    manager.regenerate(&small(1_000), &mut scene).unwrap();
    manager.regenerate(&small(10), &mut scene).unwrap();
    manager.regenerate(&small(20), &mut scene).unwrap();

    // Only the live generation's buffers are held anywhere.
    let held: usize = scene.attached().iter().map(|a| a.buffers.len()).sum();
    assert_eq!(held, 20);
    assert_eq!(manager.stats().generations, 3);
    assert_eq!(manager.stats().disposals, 2);
}

#[test]
fn test_point_size_travels_with_the_resource() {
    let mut scene = HeadlessScene::new();
    let mut manager = FieldManager::with_seed(1);
    let params = ParameterSet {
        size: 0.05,
        ..small(10)
    };

    manager.regenerate(&params, &mut scene).unwrap();
    assert_eq!(scene.current().unwrap().point_size, 0.05);
    assert_eq!(manager.live().unwrap().point_size(), 0.05);
}

// ============================================================================
// Control panel driving the manager
// ============================================================================

#[test]
fn test_panel_edits_commit_once() {
    let mut scene = StrictScene::default();
    let mut manager = FieldManager::with_seed(2);
    let mut panel = ControlPanel::new(small(1_000));

    // A drag produces many intermediate values but a single commit.
    for value in [2.0, 3.0, 4.0, 5.0, 6.0] {
        panel.set(ParamField::Branches, value);
    }
    panel.commit(&mut manager, &mut scene).unwrap();
    assert_eq!(panel.commit(&mut manager, &mut scene).unwrap(), None);

    assert_eq!(scene.seen.len(), 1);
    assert_eq!(manager.live_field().unwrap().params().branches, 6);
}

#[test]
fn test_panel_keeps_values_within_ui_ranges() {
    let mut panel = ControlPanel::new(ParameterSet::default());

    panel.set(ParamField::Count, 5.0e9);
    panel.set(ParamField::Radius, -3.0);
    panel.set(ParamField::Branches, 0.0);

    let p = panel.params();
    assert_eq!(p.count, 1_000_000);
    assert_eq!(p.radius, 1.0);
    assert_eq!(p.branches, 1);
    assert!(p.is_valid());
}

#[test]
fn test_panel_edit_preserves_unedited_config_values() {
    // Count, spin and radius all sit outside the panel's ranges.
    let params = ParameterSet {
        count: 50,
        spin: 0.0,
        radius: 2.5,
        branches: 3,
        ..ParameterSet::default()
    };
    let mut scene = StrictScene::default();
    let mut manager = FieldManager::with_seed(4);
    let mut panel = ControlPanel::new(params.clone());

    galaxy_field::viewer::show_initial_field(&panel, &mut manager, &mut scene).unwrap();
    assert_eq!(manager.live_field().unwrap().params(), &params);

    panel.nudge(ParamField::Branches, 1);
    panel.commit(&mut manager, &mut scene).unwrap();

    let live = manager.live_field().unwrap();
    assert_eq!(live.params(), &ParameterSet { branches: 4, ..params });
    assert_eq!(live.len(), 50);
    assert_eq!(scene.seen.len(), 2);
}
