//! Integration tests for mesh-export
//!
//! Tests the full pipeline: write a source mesh dump -> convert -> read the model back

use mesh_common::{AttributeSet, ModelData, read_model};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

/// Unit cube, one quad per face, two materials, no skin
const CUBE_JSON: &str = r#"{
    "meshes": [{
        "name": "cube",
        "control_points": [
            [-1,-1,-1],[1,-1,-1],[1,1,-1],[-1,1,-1],
            [-1,-1,1],[1,-1,1],[1,1,1],[-1,1,1]
        ],
        "polygons": [
            [0,3,2,1],[4,5,6,7],[0,1,5,4],[2,3,7,6],[1,2,6,5],[0,4,7,3]
        ],
        "material_count": 2,
        "material_layers": [[0,0,1,1,1,1]],
        "uv_sets": [{
            "name": "map1",
            "mapping": "by_control_point",
            "direct": [[0,0],[1,0],[1,1],[0,1],[0,0],[1,0],[1,1],[0,1]]
        }]
    }]
}"#;

/// Two triangles weighted to disjoint bone pairs, plus an unnamed mesh
const SKINNED_JSON: &str = r#"{
    "meshes": [
        {
            "name": "rig",
            "control_points": [[0,0,0],[1,0,0],[0,1,0],[5,0,0],[6,0,0],[5,1,0]],
            "polygons": [[0,1,2],[3,4,5]],
            "skin": { "clusters": [
                { "bone": 40, "control_points": [0,1,2], "weights": [0.75,0.75,0.75] },
                { "bone": 41, "control_points": [0,1,2], "weights": [0.25,0.25,0.25] },
                { "bone": 42, "control_points": [3,4,5], "weights": [0.5,0.5,0.5] },
                { "bone": 43, "control_points": [3,4,5], "weights": [0.5,0.5,0.5] }
            ]}
        },
        {
            "name": "",
            "control_points": [[0,0,0],[1,0,0],[0,1,0]],
            "polygons": [[0,1,2]]
        }
    ]
}"#;

/// A polygon with a material index past the declared count
const DROPPED_JSON: &str = r#"{
    "meshes": [{
        "name": "broken",
        "control_points": [[0,0,0],[1,0,0],[0,1,0]],
        "polygons": [[0,1,2],[2,1,0]],
        "material_count": 1,
        "material_layers": [[0, 3]]
    }]
}"#;

fn mesh_export(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mesh-export"))
        .args(args)
        .output()
        .expect("Failed to run mesh-export")
}

fn convert(input: &Path, output: &Path, extra: &[&str]) -> ModelData {
    let mut args = vec![
        "convert",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    let result = mesh_export(&args);
    assert!(
        result.status.success(),
        "mesh-export convert failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(output.exists(), "Model file should exist");

    let file = std::fs::File::open(output).expect("Failed to open model");
    read_model(file).expect("Failed to parse model")
}

/// Test cube conversion: dedup, material parts, UV bounds
#[test]
fn test_cube_to_model() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("cube.json");
    let output = dir.path().join("cube.ncmesh.json");
    std::fs::write(&input, CUBE_JSON).expect("Failed to write input");

    let model = convert(&input, &output, &["--pretty"]);
    assert_eq!(model.meshes.len(), 1);

    let mesh = &model.meshes[0];
    assert_eq!(mesh.id, "cube");
    assert_eq!(mesh.attributes.uv_channels(), 1);
    assert_eq!(mesh.vertex_size, 5);
    // Per-control-point UVs: every corner collapses onto its control point
    assert_eq!(mesh.vertex_count(), 8);
    assert_eq!(mesh.uv_mapping, vec!["map1".to_string()]);

    assert_eq!(mesh.parts.len(), 2);
    assert_eq!(mesh.parts[0].id, "cube_part0");
    assert_eq!(mesh.parts[0].polygon_sizes, vec![4, 4]);
    assert_eq!(mesh.parts[1].polygon_sizes, vec![4, 4, 4, 4]);
    let bounds = mesh.parts[1].uv_bounds[0].expect("UV bounds");
    assert_eq!(bounds.min, [0.0, 0.0]);
    assert_eq!(bounds.max, [1.0, 1.0]);
}

/// Default output path sits next to the input
#[test]
fn test_default_output_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("cube.json");
    std::fs::write(&input, CUBE_JSON).expect("Failed to write input");

    let result = mesh_export(&["convert", input.to_str().unwrap()]);
    assert!(result.status.success());
    assert!(dir.path().join("cube.ncmesh.json").exists());
}

/// Test skinned conversion with a small bone slot capacity
#[test]
fn test_skinned_parts() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("rig.json");
    let output = dir.path().join("rig.ncmesh.json");
    std::fs::write(&input, SKINNED_JSON).expect("Failed to write input");

    let model = convert(&input, &output, &["--max-bones", "2", "--max-weights", "2"]);
    assert_eq!(model.meshes.len(), 2);

    let rig = &model.meshes[0];
    assert_eq!(rig.attributes.blend_weights(), 2);
    assert_eq!(rig.parts.len(), 2);
    assert_eq!(rig.parts[0].bones, vec![40, 41]);
    assert_eq!(rig.parts[1].bones, vec![42, 43]);
    assert_eq!(rig.parts[1].bone_set, 1);

    // Unnamed mesh gets a generated id and no blend channel
    let shape = &model.meshes[1];
    assert_eq!(shape.id, "shape1");
    assert_eq!(shape.attributes, AttributeSet::position_only());
}

/// Test config file loading
#[test]
fn test_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("rig.json");
    let output = dir.path().join("rig.ncmesh.json");
    let config = dir.path().join("export.toml");
    std::fs::write(&input, SKINNED_JSON).expect("Failed to write input");
    std::fs::write(&config, "max_blend_weights = 0\n").expect("Failed to write config");

    let model = convert(&input, &output, &["--config", config.to_str().unwrap()]);
    let rig = &model.meshes[0];
    assert_eq!(rig.attributes.blend_weights(), 0);
    assert_eq!(rig.parts.len(), 1);
    assert!(rig.parts[0].bones.is_empty());
}

/// Check reports diagnostics and fails
#[test]
fn test_check_reports_diagnostics() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("broken.json");
    std::fs::write(&input, DROPPED_JSON).expect("Failed to write input");

    let result = mesh_export(&["check", input.to_str().unwrap()]);
    assert!(!result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("broken: 3 vertices, 1 parts, 1 diagnostics"));
    assert!(stdout.contains("polygon 1 has no part"));
}

/// Check passes on clean input
#[test]
fn test_check_clean() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("cube.json");
    std::fs::write(&input, CUBE_JSON).expect("Failed to write input");

    let result = mesh_export(&["check", input.to_str().unwrap()]);
    assert!(result.status.success());
}

/// Malformed input is an error, not a panic
#[test]
fn test_invalid_input() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("bad.json");
    std::fs::write(&input, "{ not json").expect("Failed to write input");

    let result = mesh_export(&["convert", input.to_str().unwrap()]);
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Failed to parse mesh dump"));
}
