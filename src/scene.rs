//! The scene-graph boundary.
//!
//! The [`FieldManager`](crate::FieldManager) owns every [`FieldResource`] it
//! creates. Scenes only ever see a borrowed resource during
//! [`SceneGraph::attach`] and must copy whatever they need to draw it
//! (the GPU viewer uploads vertex buffers, [`HeadlessScene`] clones the
//! buffer pair). After [`SceneGraph::detach`] nothing of that generation
//! may remain reachable from the scene.

use std::fmt;

use crate::field::{Field, FieldBuffers};

/// Identifies one generation of the live field.
///
/// Ids are handed out by the manager in increasing order and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub(crate) u64);

impl ResourceId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

/// A generated field together with its renderable buffer pair.
#[derive(Debug)]
pub struct FieldResource {
    id: ResourceId,
    field: Field,
    buffers: FieldBuffers,
    disposed: bool,
}

impl FieldResource {
    pub(crate) fn new(id: ResourceId, field: Field) -> Self {
        let buffers = field.to_buffers();
        Self {
            id,
            field,
            buffers,
            disposed: false,
        }
    }

    /// This resource's id.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// The generated field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Position and color arrays ready for upload.
    pub fn buffers(&self) -> &FieldBuffers {
        &self.buffers
    }

    /// Point footprint the draw loop should use.
    pub fn point_size(&self) -> f32 {
        self.field.params().size
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release the buffer pair. Idempotent.
    pub(crate) fn dispose(&mut self) {
        self.buffers.release();
        self.disposed = true;
    }
}

/// Anything that can display the live field.
///
/// Calls arrive from the manager on the control thread, always in the
/// order `detach(old)` then `attach(new)`. Implementations must not call
/// back into the manager.
pub trait SceneGraph {
    /// Start displaying `resource`. The borrow ends when this returns.
    fn attach(&mut self, resource: &FieldResource);

    /// Stop displaying the resource with this id and drop any copies of it.
    fn detach(&mut self, id: ResourceId);
}

/// A CPU-side scene that keeps a copy of every attached buffer pair.
///
/// Used by tests and by the headless `--preview` path of the viewer.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    attached: Vec<AttachedField>,
    attach_calls: usize,
    detach_calls: usize,
}

/// What a [`HeadlessScene`] holds for one attached resource.
#[derive(Debug, Clone)]
pub struct AttachedField {
    /// Id returned from `attach`.
    pub id: ResourceId,
    /// Copy of the uploaded attribute arrays.
    pub buffers: FieldBuffers,
    /// Size taken from the field's parameters.
    pub point_size: f32,
}

impl HeadlessScene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything currently attached, in attach order.
    pub fn attached(&self) -> &[AttachedField] {
        &self.attached
    }

    /// Number of attached resources.
    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Ids of attached resources.
    pub fn attached_ids(&self) -> Vec<ResourceId> {
        self.attached.iter().map(|a| a.id).collect()
    }

    /// The single attached resource, if exactly one is attached.
    pub fn current(&self) -> Option<&AttachedField> {
        match self.attached.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Total `attach` calls received.
    pub fn attach_calls(&self) -> usize {
        self.attach_calls
    }

    /// Total `detach` calls received.
    pub fn detach_calls(&self) -> usize {
        self.detach_calls
    }
}

impl SceneGraph for HeadlessScene {
    fn attach(&mut self, resource: &FieldResource) {
        self.attach_calls += 1;
        self.attached.push(AttachedField {
            id: resource.id(),
            buffers: resource.buffers().clone(),
            point_size: resource.point_size(),
        });
    }

    fn detach(&mut self, id: ResourceId) {
        self.detach_calls += 1;
        self.attached.retain(|a| a.id != id);
    }
}
