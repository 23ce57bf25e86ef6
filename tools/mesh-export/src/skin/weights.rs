//! Per-control-point blend weights
//!
//! Weights are gathered from every skin cluster (only values in (0, 1] are
//! kept, larger ones are clamped to 1), sorted so the most
//! significant influence comes first, truncated to the configured maximum
//! and renormalized to sum to one.

use crate::config::ExportConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::source::MeshSource;

use super::bones::BoneDemand;

/// Influence of one bone on one control point.
///
/// `bone` is the index of the skin cluster the weight came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeight {
    pub bone: u32,
    pub weight: f32,
}

impl BlendWeight {
    pub fn new(bone: u32, weight: f32) -> Self {
        Self { bone, weight }
    }
}

/// Sort descending by weight, truncate to `max` and renormalize.
///
/// Returns `false` when the weights sum to zero; the list is then cleared
/// and the control point is left unweighted.
pub fn normalize_point_weights(weights: &mut Vec<BlendWeight>, max: usize) -> bool {
    weights.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    weights.truncate(max);

    let sum: f32 = weights.iter().map(|w| w.weight).sum();
    if sum == 0.0 {
        weights.clear();
        return false;
    }
    for w in weights.iter_mut() {
        w.weight /= sum;
    }
    true
}

/// Blend weights of every control point of a mesh
#[derive(Debug, Clone, Default)]
pub struct BlendWeights {
    points: Vec<Vec<BlendWeight>>,
    weight_count: usize,
}

impl BlendWeights {
    /// Gather weights from the source's skin.
    ///
    /// Returns `None` when the mesh has no skin or skinning is disabled.
    pub fn compute<S: MeshSource + ?Sized>(
        source: &S,
        config: &ExportConfig,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self> {
        if !config.skinning_enabled() {
            return None;
        }
        let skin = source.skin()?;
        let point_count = source.control_point_count();

        let mut points: Vec<Vec<BlendWeight>> = vec![Vec::new(); point_count];
        for (cluster_index, cluster) in skin.clusters.iter().enumerate() {
            for (point, weight) in cluster.influences() {
                let Ok(point) = usize::try_from(point) else {
                    continue;
                };
                if point >= point_count || weight.is_nan() || weight <= 0.0 {
                    continue;
                }
                points[point].push(BlendWeight::new(cluster_index as u32, weight.min(1.0)));
            }
        }

        let mut weight_count = 0;
        for (point, weights) in points.iter_mut().enumerate() {
            if !normalize_point_weights(weights, config.max_blend_weights) {
                diagnostics.push(Diagnostic::ZeroWeights { point });
            }
            weight_count = weight_count.max(weights.len());
        }

        if weight_count > 0 && config.force_max_blend_weights {
            weight_count = config.max_blend_weights;
        }

        tracing::debug!(
            "Mesh '{}': {} clusters, {} blend weights per vertex",
            source.name(),
            skin.clusters.len(),
            weight_count
        );

        Some(Self {
            points,
            weight_count,
        })
    }

    /// Weights of a control point, most significant first
    pub fn point(&self, point: usize) -> &[BlendWeight] {
        self.points.get(point).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Blend weights emitted per vertex
    pub fn weight_count(&self) -> usize {
        self.weight_count
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Distinct bones referenced by the corners of a polygon, in encounter order
    pub fn polygon_demand<S: MeshSource + ?Sized>(&self, source: &S, polygon: usize) -> BoneDemand {
        let mut demand = BoneDemand::new();
        for corner in 0..source.polygon_size(polygon) {
            let point = source.polygon_vertex(polygon, corner);
            for w in self.point(point) {
                demand.push(w.bone);
            }
        }
        demand
    }
}
