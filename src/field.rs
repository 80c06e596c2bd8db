//! Generated particle fields and their GPU buffer pair.

use glam::Vec3;

use crate::params::ParameterSet;

/// One generated point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleRecord {
    /// World-space position.
    pub position: Vec3,
    /// RGB color, each channel in `0.0..=1.0`.
    pub color: Vec3,
}

/// The output of one generation pass.
///
/// Always holds exactly `params().count` records, in generation order.
/// Records are never edited in place; a new parameter set produces a new
/// `Field`.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    records: Vec<ParticleRecord>,
    params: ParameterSet,
}

impl Field {
    pub(crate) fn new(records: Vec<ParticleRecord>, params: ParameterSet) -> Self {
        debug_assert_eq!(records.len(), params.count as usize);
        Self { records, params }
    }

    /// The generated points.
    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    /// The parameters that produced this field.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Number of records. Equal to `params().count`.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a field built by the generator.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest distance from the Y axis among all records.
    pub fn max_planar_radius(&self) -> f32 {
        self.records
            .iter()
            .map(|r| (r.position.x * r.position.x + r.position.z * r.position.z).sqrt())
            .fold(0.0, f32::max)
    }

    /// Split into the position/color buffer pair renderers upload.
    pub fn to_buffers(&self) -> FieldBuffers {
        FieldBuffers::from_records(&self.records)
    }
}

/// Position and color attributes laid out as tightly packed `vec3<f32>` arrays.
///
/// This is the pair of vertex buffers the viewer uploads: one for
/// `@location(0) position`, one for `@location(1) color`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldBuffers {
    /// Point positions as `[x, y, z]`, one per record.
    pub positions: Vec<[f32; 3]>,
    /// RGB colors in `0.0..=1.0`, parallel to `positions`.
    pub colors: Vec<[f32; 3]>,
}

impl FieldBuffers {
    /// Build both attribute arrays from a slice of records.
    pub fn from_records(records: &[ParticleRecord]) -> Self {
        let mut positions = Vec::with_capacity(records.len());
        let mut colors = Vec::with_capacity(records.len());
        for record in records {
            positions.push(record.position.to_array());
            colors.push(record.color.to_array());
        }
        Self { positions, colors }
    }

    /// Number of points held.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no points are held (always true after [`release`](Self::release)).
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Raw bytes of the position attribute.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the color attribute.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Drop both arrays and return their memory.
    pub fn release(&mut self) {
        self.positions = Vec::new();
        self.colors = Vec::new();
    }
}
