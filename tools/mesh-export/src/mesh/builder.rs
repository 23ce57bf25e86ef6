//! Mesh conversion pipeline
//!
//! Two passes over the source polygons:
//! 1. plan: blend weights per control point, then a part and bone slot set
//!    per polygon
//! 2. emit: a full vertex record per polygon corner, interned through the
//!    shared [`VertexBuffer`] and indexed by its part
//!
//! Planning completes before emission starts, so blend indices always refer
//! to final slot positions.

use glam::{Affine2, Vec2};
use hashbrown::HashMap;
use mesh_common::{
    ATTR_BINORMAL, ATTR_NORMAL, ATTR_TANGENT, AttributeSet, MAX_UV_CHANNELS, MeshData,
    MeshPartData, UvBounds, pack_color_float,
};

use crate::config::ExportConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{ExportError, Result};
use crate::skin::{BlendWeights, BoneSlotSet};
use crate::source::{MeshSource, Skin};

use super::parts::{PartKey, plan_parts};
use super::types::ConvertedMesh;
use super::vertex_buffer::VertexBuffer;

/// Identifier for a mesh: its name when longer than one character,
/// otherwise `shape{index}`
pub fn mesh_id(name: &str, shape_index: usize) -> String {
    if name.chars().count() > 1 {
        name.to_string()
    } else {
        format!("shape{shape_index}")
    }
}

/// Converts source meshes with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    config: ExportConfig,
    uv_transforms: [Option<Affine2>; MAX_UV_CHANNELS],
    mesh_id: Option<String>,
}

impl MeshBuilder {
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config: config.clamped(),
            uv_transforms: [None; MAX_UV_CHANNELS],
            mesh_id: None,
        }
    }

    /// Apply `transform` to every UV of `channel` before it is written.
    /// Channels past the UV limit are ignored.
    pub fn with_uv_transform(mut self, channel: usize, transform: Affine2) -> Self {
        if let Some(slot) = self.uv_transforms.get_mut(channel) {
            *slot = Some(transform);
        }
        self
    }

    /// Override the output mesh id
    pub fn with_mesh_id(mut self, id: impl Into<String>) -> Self {
        self.mesh_id = Some(id.into());
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Convert one source mesh
    pub fn build<S: MeshSource + ?Sized>(&self, source: &S) -> Result<ConvertedMesh> {
        let id = self
            .mesh_id
            .clone()
            .unwrap_or_else(|| mesh_id(source.name(), 1));

        let corner_offsets = validate_polygons(source, &id)?;

        let mut diagnostics = Diagnostics::new(id.clone());
        let weights = BlendWeights::compute(source, &self.config, &mut diagnostics);
        let plan = plan_parts(source, weights.as_ref(), &self.config, &mut diagnostics);

        let attributes = self.attributes(source, weights.as_ref());
        let uv_channels = attributes.uv_channels();
        let mut buffer = VertexBuffer::new(attributes.vertex_size())?;

        let mut groups: HashMap<PartKey, Vec<usize>> = HashMap::new();
        for polygon in 0..plan.polygon_count() {
            if let Some(key) = plan.polygon_part(polygon) {
                groups.entry(key).or_default().push(polygon);
            }
        }

        let skin = source.skin();
        let mut record = Vec::with_capacity(attributes.vertex_size());
        let mut parts = Vec::new();

        for key in plan.keys() {
            let Some(polygons) = groups.get(&key) else {
                continue;
            };
            let slot_set = plan.slot_set(key);

            let mut part = MeshPartData {
                id: format!("{}_part{}", id, parts.len()),
                material_index: key.material as u32,
                bone_set: key.slot_set as u32,
                indices: Vec::new(),
                polygon_sizes: Vec::with_capacity(polygons.len()),
                uv_bounds: vec![None; uv_channels],
                bones: slot_set.map(|set| bone_table(set, skin)).unwrap_or_default(),
            };

            for &polygon in polygons {
                let size = source.polygon_size(polygon);
                for corner in 0..size {
                    let point = source.polygon_vertex(polygon, corner);
                    let global = corner_offsets[polygon] + corner;

                    record.clear();
                    self.write_record(
                        &mut record,
                        source,
                        &attributes,
                        weights.as_ref(),
                        slot_set,
                        global,
                        point,
                        &mut part.uv_bounds,
                    );
                    part.indices.push(buffer.intern(&record));
                }
                part.polygon_sizes.push(size as u32);
            }

            if !part.indices.is_empty() {
                parts.push(part);
            }
        }

        let mesh = MeshData {
            id,
            attributes,
            vertex_size: attributes.vertex_size() as u32,
            vertices: buffer.into_vertices(),
            parts,
            uv_mapping: source
                .uv_sets()
                .iter()
                .take(uv_channels)
                .map(|set| set.name.clone())
                .collect(),
        };

        tracing::info!(
            "Converted mesh '{}': {} vertices, {} indices, {} parts, vertex_size={}",
            mesh.id,
            mesh.vertex_count(),
            mesh.index_count(),
            mesh.parts.len(),
            mesh.vertex_size
        );

        Ok(ConvertedMesh { mesh, diagnostics })
    }

    /// Vertex layout for a source mesh
    fn attributes<S: MeshSource + ?Sized>(&self, source: &S, weights: Option<&BlendWeights>) -> AttributeSet {
        let mut attributes = AttributeSet::position_only();
        attributes.set(ATTR_NORMAL, source.normals().is_some());
        attributes.set_color(source.colors().is_some(), self.config.packed_colors);
        attributes.set(ATTR_TANGENT, source.tangents().is_some());
        attributes.set(ATTR_BINORMAL, source.binormals().is_some());
        attributes.set_uv_channels(source.uv_sets().len().min(self.config.max_uv_channels));
        attributes.set_blend_weights(weights.map_or(0, BlendWeights::weight_count));
        attributes
    }

    #[allow(clippy::too_many_arguments)]
    fn write_record<S: MeshSource + ?Sized>(
        &self,
        record: &mut Vec<f32>,
        source: &S,
        attributes: &AttributeSet,
        weights: Option<&BlendWeights>,
        slot_set: Option<&BoneSlotSet>,
        corner: usize,
        point: usize,
        uv_bounds: &mut [Option<UvBounds>],
    ) {
        record.extend_from_slice(&source.control_point(point));

        if let Some(normals) = source.normals() {
            record.extend_from_slice(&normals.value(corner, point));
        }

        if let Some(colors) = source.colors() {
            let [r, g, b, a] = colors.value(corner, point);
            if self.config.packed_colors {
                record.push(pack_color_float(r, g, b, a));
            } else {
                record.extend_from_slice(&[r, g, b, a]);
            }
        }

        if let Some(tangents) = source.tangents() {
            record.extend_from_slice(&tangents.value(corner, point));
        }

        if let Some(binormals) = source.binormals() {
            record.extend_from_slice(&binormals.value(corner, point));
        }

        for (channel, set) in source.uv_sets().iter().take(attributes.uv_channels()).enumerate() {
            let uv = set.element.value(corner, point);
            UvBounds::extend(&mut uv_bounds[channel], uv);
            let uv = match self.uv_transforms[channel] {
                Some(transform) => transform.transform_point2(Vec2::from(uv)).to_array(),
                None => uv,
            };
            record.extend_from_slice(&uv);
        }

        let weight_count = attributes.blend_weights();
        if weight_count > 0 {
            let influences = weights.map(|w| w.point(point)).unwrap_or(&[]);
            // Slot index block, then weight block
            for i in 0..weight_count {
                let slot = influences
                    .get(i)
                    .map(|w| {
                        // Bones that did not fit an overflowing slot set fall back to slot 0
                        slot_set.and_then(|set| set.index_of(w.bone)).unwrap_or(0)
                    })
                    .unwrap_or(0);
                record.push(slot as f32);
            }
            for i in 0..weight_count {
                record.push(influences.get(i).map_or(0.0, |w| w.weight));
            }
        }
    }
}

/// Check every corner against the control points and compute the global
/// corner index of each polygon's first corner
fn validate_polygons<S: MeshSource + ?Sized>(source: &S, mesh: &str) -> Result<Vec<usize>> {
    let count = source.control_point_count();
    let mut offsets = Vec::with_capacity(source.polygon_count());
    let mut corners = 0;

    for polygon in 0..source.polygon_count() {
        let size = source.polygon_size(polygon);
        if size == 0 {
            return Err(ExportError::EmptyPolygon {
                mesh: mesh.to_string(),
                polygon,
            });
        }
        for corner in 0..size {
            let point = source.polygon_vertex(polygon, corner);
            if point >= count {
                return Err(ExportError::InvalidControlPoint {
                    mesh: mesh.to_string(),
                    polygon,
                    point,
                    count,
                });
            }
        }
        offsets.push(corners);
        corners += size;
    }

    Ok(offsets)
}

/// Slot to bone identifier table for a part
fn bone_table(set: &BoneSlotSet, skin: Option<&Skin>) -> Vec<u32> {
    set.bones()
        .iter()
        .map(|&cluster| {
            skin.and_then(|s| s.clusters.get(cluster as usize))
                .map_or(cluster, |c| c.bone)
        })
        .collect()
}
