//! Polygon to part assignment
//!
//! Every polygon is assigned to a material part and, when the mesh is
//! skinned, to a bone slot set within that material. Planning finishes before
//! any vertex is emitted so that slot indices are final when blend indices
//! are resolved.

use crate::config::ExportConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::skin::{BlendWeights, BoneSlotAllocator, BoneSlotSet};
use crate::source::MeshSource;

/// Part a polygon belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartKey {
    pub material: usize,
    pub slot_set: usize,
}

/// Result of planning: per-polygon part assignment and the slot sets
#[derive(Debug, Clone)]
pub struct PartPlan {
    polygons: Vec<Option<PartKey>>,
    material_count: usize,
    /// One allocator per material when skinned, empty otherwise
    allocators: Vec<BoneSlotAllocator>,
}

impl PartPlan {
    /// Part of a polygon, `None` when the polygon is dropped
    pub fn polygon_part(&self, polygon: usize) -> Option<PartKey> {
        self.polygons.get(polygon).copied().flatten()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Number of material parts (at least one)
    pub fn material_count(&self) -> usize {
        self.material_count
    }

    pub fn is_skinned(&self) -> bool {
        !self.allocators.is_empty()
    }

    /// Slot sets of a material, empty for unskinned meshes
    pub fn slot_sets(&self, material: usize) -> &[BoneSlotSet] {
        self.allocators
            .get(material)
            .map(BoneSlotAllocator::sets)
            .unwrap_or(&[])
    }

    pub fn slot_set(&self, key: PartKey) -> Option<&BoneSlotSet> {
        self.slot_sets(key.material).get(key.slot_set)
    }

    /// Every part key, ordered by material then slot set
    pub fn keys(&self) -> impl Iterator<Item = PartKey> + '_ {
        (0..self.material_count).flat_map(move |material| {
            let sets = self.slot_sets(material).len().max(1);
            (0..sets).map(move |slot_set| PartKey { material, slot_set })
        })
    }
}

/// Assign every polygon of `source` to a part.
///
/// With blend weights, each material gets its own bone slot allocator and
/// polygons are placed greedily in source order.
pub fn plan_parts<S: MeshSource + ?Sized>(
    source: &S,
    weights: Option<&BlendWeights>,
    config: &ExportConfig,
    diagnostics: &mut Diagnostics,
) -> PartPlan {
    let declared = source.material_count();
    let material_count = declared.max(1);

    let mut allocators: Vec<BoneSlotAllocator> = match weights {
        Some(_) => (0..material_count)
            .map(|_| BoneSlotAllocator::new(config.max_bones_per_part))
            .collect(),
        None => Vec::new(),
    };

    let polygon_count = source.polygon_count();
    let mut polygons = Vec::with_capacity(polygon_count);

    for polygon in 0..polygon_count {
        let material = if declared == 0 {
            Some(0)
        } else {
            source.material_index(polygon).filter(|&m| m < declared)
        };
        let Some(material) = material else {
            diagnostics.push(Diagnostic::NoPolygonPart {
                polygon,
                material: source.material_index(polygon),
            });
            polygons.push(None);
            continue;
        };

        let slot_set = match weights {
            Some(weights) => {
                let demand = weights.polygon_demand(source, polygon);
                let allocator = &mut allocators[material];
                let placement = allocator.place(&demand);
                if placement.overflow {
                    diagnostics.push(Diagnostic::BonesOverflow {
                        polygon,
                        required: demand.len(),
                        capacity: allocator.capacity(),
                    });
                }
                placement.slot_set
            }
            None => 0,
        };

        polygons.push(Some(PartKey { material, slot_set }));
    }

    PartPlan {
        polygons,
        material_count,
        allocators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::source::{Cluster, Skin, SourceMesh};

    fn quad_strip(polygons: usize) -> SourceMesh {
        let points = (0..polygons * 3)
            .map(|i| [i as f32, 0.0, 0.0])
            .collect();
        let polys = (0..polygons as u32)
            .map(|p| vec![p * 3, p * 3 + 1, p * 3 + 2])
            .collect();
        SourceMesh::new("strip", points, polys)
    }

    /// Every polygon fully weighted to bone `polygon_bones[p]`
    fn skin_per_polygon(polygon_bones: &[&[u32]]) -> Skin {
        let max_bone = polygon_bones.iter().flat_map(|b| b.iter()).copied().max().unwrap_or(0);
        let clusters = (0..=max_bone)
            .map(|bone| {
                let mut control_points = Vec::new();
                for (p, bones) in polygon_bones.iter().enumerate() {
                    if bones.contains(&bone) {
                        control_points.extend((p * 3..p * 3 + 3).map(|c| c as i32));
                    }
                }
                let weights = vec![1.0; control_points.len()];
                Cluster {
                    bone: 1000 + bone,
                    control_points,
                    weights,
                }
            })
            .collect();
        Skin { clusters }
    }

    fn polygons_in(plan: &PartPlan, key: PartKey) -> Vec<usize> {
        (0..plan.polygon_count())
            .filter(|&p| plan.polygon_part(p) == Some(key))
            .collect()
    }

    fn plan(mesh: &SourceMesh, config: &ExportConfig) -> (PartPlan, Diagnostics) {
        let mut diagnostics = Diagnostics::new(mesh.name.clone());
        let weights = BlendWeights::compute(mesh, config, &mut diagnostics);
        let plan = plan_parts(mesh, weights.as_ref(), config, &mut diagnostics);
        (plan, diagnostics)
    }

    #[test]
    fn test_no_materials_is_single_part() {
        let mesh = quad_strip(3);
        let (plan, diagnostics) = plan(&mesh, &ExportConfig::default());
        assert_eq!(plan.material_count(), 1);
        assert!(!plan.is_skinned());
        for p in 0..3 {
            assert_eq!(plan.polygon_part(p), Some(PartKey { material: 0, slot_set: 0 }));
        }
        assert_eq!(plan.keys().collect::<Vec<_>>(), vec![PartKey { material: 0, slot_set: 0 }]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_material_assignment() {
        let mesh = quad_strip(4).with_materials(2, vec![1, 0, 1, 0]);
        let (plan, _) = plan(&mesh, &ExportConfig::default());
        assert_eq!(plan.polygon_part(0).unwrap().material, 1);
        assert_eq!(plan.polygon_part(1).unwrap().material, 0);
        let key = PartKey { material: 1, slot_set: 0 };
        assert_eq!(polygons_in(&plan, key), vec![0, 2]);
    }

    #[test]
    fn test_bad_material_drops_polygon() {
        let mesh = quad_strip(4).with_materials(2, vec![0, -1, 5]);
        let (plan, diagnostics) = plan(&mesh, &ExportConfig::default());
        assert!(plan.polygon_part(0).is_some());
        assert!(plan.polygon_part(1).is_none());
        assert!(plan.polygon_part(2).is_none());
        // Missing entry
        assert!(plan.polygon_part(3).is_none());
        assert_eq!(diagnostics.count(DiagnosticKind::NoPolygonPart), 3);
        assert!(diagnostics.entries().contains(&Diagnostic::NoPolygonPart {
            polygon: 2,
            material: Some(5),
        }));
    }

    #[test]
    fn test_skinned_split_into_slot_sets() {
        let mesh = quad_strip(3).with_skin(skin_per_polygon(&[&[0, 1, 2], &[1, 3, 4], &[0, 2]]));
        let config = ExportConfig {
            max_bones_per_part: 4,
            ..Default::default()
        };
        let (plan, diagnostics) = plan(&mesh, &config);

        assert!(plan.is_skinned());
        assert_eq!(plan.polygon_part(0), Some(PartKey { material: 0, slot_set: 0 }));
        // {1,3,4} needs two new slots, set 0 has one free
        assert_eq!(plan.polygon_part(1), Some(PartKey { material: 0, slot_set: 1 }));
        // {0,2} is already covered by set 0
        assert_eq!(plan.polygon_part(2), Some(PartKey { material: 0, slot_set: 0 }));
        assert_eq!(plan.slot_sets(0).len(), 2);
        assert_eq!(plan.keys().count(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_allocator_per_material() {
        let mesh = quad_strip(2)
            .with_materials(2, vec![0, 1])
            .with_skin(skin_per_polygon(&[&[0, 1], &[2, 3]]));
        let config = ExportConfig {
            max_bones_per_part: 2,
            ..Default::default()
        };
        let (plan, _) = plan(&mesh, &config);
        assert_eq!(plan.slot_sets(0)[0].bones(), &[0, 1]);
        assert_eq!(plan.slot_sets(1)[0].bones(), &[2, 3]);
        assert_eq!(plan.polygon_part(1), Some(PartKey { material: 1, slot_set: 0 }));
    }

    #[test]
    fn test_overflow_keeps_polygon() {
        let mesh = quad_strip(1).with_skin(skin_per_polygon(&[&[0, 1, 2]]));
        let config = ExportConfig {
            max_bones_per_part: 2,
            max_blend_weights: 4,
            ..Default::default()
        };
        let (plan, diagnostics) = plan(&mesh, &config);
        assert!(plan.polygon_part(0).is_some());
        assert_eq!(
            diagnostics.entries(),
            &[Diagnostic::BonesOverflow {
                polygon: 0,
                required: 3,
                capacity: 2,
            }]
        );
    }

    #[test]
    fn test_every_valid_polygon_in_exactly_one_part() {
        let mesh = quad_strip(6)
            .with_materials(2, vec![0, 1, 1, 0, 7, 1])
            .with_skin(skin_per_polygon(&[&[0], &[1, 2], &[3, 4], &[5, 6], &[0], &[7, 8]]));
        let config = ExportConfig {
            max_bones_per_part: 3,
            ..Default::default()
        };
        let (plan, _) = plan(&mesh, &config);

        let mut seen = vec![0; 6];
        for key in plan.keys() {
            for polygon in polygons_in(&plan, key) {
                seen[polygon] += 1;
            }
        }
        assert_eq!(seen, vec![1, 1, 1, 1, 0, 1]);
    }
}
