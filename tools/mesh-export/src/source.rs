//! Source mesh model
//!
//! The exporter pulls everything it needs through the [`MeshSource`] trait:
//! control points, polygons, material assignment, per-channel layer elements
//! and the optional skin. [`SourceMesh`] is the plain-data implementation used
//! by the CLI (deserialized from a JSON dump produced by a scene reader).

use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::Result;

/// Where a layer element stores its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// One value per control point
    ByControlPoint,
    /// One value per polygon corner (global corner order)
    #[default]
    ByPolygonVertex,
}

/// How a layer element's mapped slot is turned into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceMode {
    /// The slot indexes `direct` directly
    #[default]
    Direct,
    /// The slot indexes `indices`, which indexes `direct`
    IndexToDirect,
}

/// One attribute channel (normals, colors, a UV set...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerElement<T> {
    #[serde(default)]
    pub mapping: MappingMode,
    #[serde(default)]
    pub reference: ReferenceMode,
    pub direct: Vec<T>,
    #[serde(default)]
    pub indices: Vec<i32>,
}

impl<T: Copy + Default> LayerElement<T> {
    /// Element with direct values
    pub fn direct(mapping: MappingMode, direct: Vec<T>) -> Self {
        Self {
            mapping,
            reference: ReferenceMode::Direct,
            direct,
            indices: Vec::new(),
        }
    }

    /// Element with values looked up through an index array
    pub fn indexed(mapping: MappingMode, direct: Vec<T>, indices: Vec<i32>) -> Self {
        Self {
            mapping,
            reference: ReferenceMode::IndexToDirect,
            direct,
            indices,
        }
    }

    /// Index into `direct` for a polygon corner, if it resolves
    pub fn resolve(&self, corner: usize, point: usize) -> Option<usize> {
        let slot = match self.mapping {
            MappingMode::ByControlPoint => point,
            MappingMode::ByPolygonVertex => corner,
        };
        match self.reference {
            ReferenceMode::Direct => Some(slot),
            ReferenceMode::IndexToDirect => self
                .indices
                .get(slot)
                .and_then(|&i| usize::try_from(i).ok()),
        }
    }

    /// Value for a polygon corner (`corner` is the global corner index,
    /// `point` its control point). Unresolvable lookups yield the default.
    pub fn value(&self, corner: usize, point: usize) -> T {
        self.resolve(corner, point)
            .and_then(|i| self.direct.get(i))
            .copied()
            .unwrap_or_default()
    }
}

/// A named UV channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvSet {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub element: LayerElement<[f32; 2]>,
}

/// One skin cluster: a bone and the control points it influences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Caller-space bone identifier, reported back in part bone tables
    pub bone: u32,
    pub control_points: Vec<i32>,
    pub weights: Vec<f32>,
}

impl Cluster {
    /// `(control point, weight)` pairs
    pub fn influences(&self) -> impl Iterator<Item = (i32, f32)> + '_ {
        self.control_points
            .iter()
            .copied()
            .zip(self.weights.iter().copied())
    }
}

/// Skin deformer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Skin {
    pub clusters: Vec<Cluster>,
}

/// Read access to a polygon mesh
pub trait MeshSource {
    fn name(&self) -> &str;

    fn control_point_count(&self) -> usize;
    fn control_point(&self, point: usize) -> [f32; 3];

    fn polygon_count(&self) -> usize;
    fn polygon_size(&self, polygon: usize) -> usize;
    /// Control point of a polygon corner
    fn polygon_vertex(&self, polygon: usize, corner: usize) -> usize;

    /// Number of declared materials; zero means a single implicit material
    fn material_count(&self) -> usize;
    /// Material of a polygon: the first non-negative index across the
    /// material layers, `None` when no layer assigns one
    fn material_index(&self, polygon: usize) -> Option<usize>;

    fn normals(&self) -> Option<&LayerElement<[f32; 3]>>;
    fn tangents(&self) -> Option<&LayerElement<[f32; 3]>>;
    fn binormals(&self) -> Option<&LayerElement<[f32; 3]>>;
    fn colors(&self) -> Option<&LayerElement<[f32; 4]>>;
    fn uv_sets(&self) -> &[UvSet];

    fn skin(&self) -> Option<&Skin>;
}

/// Plain-data polygon mesh
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceMesh {
    #[serde(default)]
    pub name: String,
    pub control_points: Vec<[f32; 3]>,
    /// Control point indices per polygon
    pub polygons: Vec<Vec<u32>>,
    #[serde(default)]
    pub material_count: usize,
    /// Material layers, each holding one index per polygon. Missing entries
    /// and negative values leave the polygon to the next layer.
    #[serde(default)]
    pub material_layers: Vec<Vec<i32>>,
    #[serde(default)]
    pub normals: Option<LayerElement<[f32; 3]>>,
    #[serde(default)]
    pub tangents: Option<LayerElement<[f32; 3]>>,
    #[serde(default)]
    pub binormals: Option<LayerElement<[f32; 3]>>,
    #[serde(default)]
    pub colors: Option<LayerElement<[f32; 4]>>,
    #[serde(default)]
    pub uv_sets: Vec<UvSet>,
    #[serde(default)]
    pub skin: Option<Skin>,
}

impl SourceMesh {
    pub fn new(name: impl Into<String>, control_points: Vec<[f32; 3]>, polygons: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            control_points,
            polygons,
            ..Default::default()
        }
    }

    /// Declare `material_count` materials assigned by a single layer
    pub fn with_materials(mut self, material_count: usize, polygon_materials: Vec<i32>) -> Self {
        self.material_count = material_count;
        self.material_layers = vec![polygon_materials];
        self
    }

    pub fn with_material_layer(mut self, polygon_materials: Vec<i32>) -> Self {
        self.material_layers.push(polygon_materials);
        self
    }

    pub fn with_normals(mut self, normals: LayerElement<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_colors(mut self, colors: LayerElement<[f32; 4]>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_uv_set(mut self, name: impl Into<String>, element: LayerElement<[f32; 2]>) -> Self {
        self.uv_sets.push(UvSet {
            name: name.into(),
            element,
        });
        self
    }

    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = Some(skin);
        self
    }
}

impl MeshSource for SourceMesh {
    fn name(&self) -> &str {
        &self.name
    }

    fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    fn control_point(&self, point: usize) -> [f32; 3] {
        self.control_points.get(point).copied().unwrap_or([0.0; 3])
    }

    fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    fn polygon_size(&self, polygon: usize) -> usize {
        self.polygons.get(polygon).map_or(0, Vec::len)
    }

    fn polygon_vertex(&self, polygon: usize, corner: usize) -> usize {
        self.polygons[polygon][corner] as usize
    }

    fn material_count(&self) -> usize {
        self.material_count
    }

    fn material_index(&self, polygon: usize) -> Option<usize> {
        self.material_layers
            .iter()
            .filter_map(|layer| layer.get(polygon))
            .find_map(|&m| usize::try_from(m).ok())
    }

    fn normals(&self) -> Option<&LayerElement<[f32; 3]>> {
        self.normals.as_ref()
    }

    fn tangents(&self) -> Option<&LayerElement<[f32; 3]>> {
        self.tangents.as_ref()
    }

    fn binormals(&self) -> Option<&LayerElement<[f32; 3]>> {
        self.binormals.as_ref()
    }

    fn colors(&self) -> Option<&LayerElement<[f32; 4]>> {
        self.colors.as_ref()
    }

    fn uv_sets(&self) -> &[UvSet] {
        &self.uv_sets
    }

    fn skin(&self) -> Option<&Skin> {
        self.skin.as_ref()
    }
}

/// A JSON dump of source meshes, as consumed by the CLI
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceScene {
    pub meshes: Vec<SourceMesh>,
}

impl SourceScene {
    pub fn from_reader<R: Read>(r: R) -> Result<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
