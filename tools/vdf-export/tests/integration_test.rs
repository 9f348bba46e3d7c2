//! Integration tests for vdf-export
//!
//! Tests the full pipeline: generate test assets -> convert -> verify output


use std::path::Path;
use std::process::Output;
use tempfile::tempdir;
use vdf_common::{VdfDocument, VdfHeader, HEADER_SIZE};

/// Test OBJ cube -> VDF conversion
#[test]
fn test_obj_cube_to_vdf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let vdf_path = dir.path().join("cube.vdf");

    generate_test_assets::generate_cube_obj(&obj_path).expect("Failed to generate OBJ");
    vdf_export_mesh(&obj_path, Some(&vdf_path), None);
    assert!(vdf_path.exists(), "VDF file should exist");

    let data = std::fs::read(&vdf_path).expect("Failed to read VDF file");
    assert_eq!(data.len(), 32 + 8 * 12 + 8 * 12 + 12 * 6);

    let header = verify_vdf(&data);
    assert_eq!(header.vertex_count, 8);
    assert_eq!(header.triangle_count, 12);
    assert_eq!(header.offset_to_position_data, 32);
    assert_eq!(header.offset_to_normal_data, 128);
    assert_eq!(header.offset_to_color_data, 0);
    assert_eq!(header.offset_to_triangle_data, 224);

    let document = VdfDocument::parse(&data).expect("Failed to parse VDF");
    assert_eq!(document.positions(), generate_test_assets::cube_positions());
    let triangles: Vec<[u16; 3]> = generate_test_assets::CUBE_TRIANGLES
        .iter()
        .map(|t| t.map(|i| i as u16))
        .collect();
    assert_eq!(document.triangles(), triangles);
}

/// Without -o the output lands next to the input with a .vdf extension
#[test]
fn test_default_output_path() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("triangle.obj");

    generate_test_assets::generate_triangle_obj(&obj_path)
        .expect("Failed to generate triangle OBJ");
    vdf_export_mesh(&obj_path, None, None);

    let data = std::fs::read(dir.path().join("triangle.vdf")).expect("Failed to read VDF file");
    let header = verify_vdf(&data);
    assert_eq!(header.vertex_count, 3);
    assert_eq!(header.triangle_count, 1);

    // No normals in the source: generated from the face
    let document = VdfDocument::parse(&data).unwrap();
    assert_eq!(document.normals(), vec![[0.0, 0.0, 1.0]; 3]);
}

/// Quads are filtered out, not triangulated
#[test]
fn test_mixed_faces_keep_only_triangles() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("mixed.obj");
    let vdf_path = dir.path().join("mixed.vdf");

    generate_test_assets::generate_mixed_faces_obj(&obj_path).unwrap();
    vdf_export_mesh(&obj_path, Some(&vdf_path), None);

    let data = std::fs::read(&vdf_path).unwrap();
    let header = verify_vdf(&data);
    assert_eq!(header.vertex_count, 5);
    assert_eq!(header.triangle_count, 1);
    assert_eq!(
        VdfDocument::parse(&data).unwrap().triangles(),
        vec![[1, 4, 2]]
    );
}

/// A triangle referencing vertex 65536 cannot be stored in u16 indices
#[test]
fn test_index_overflow_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("big.obj");
    let vdf_path = dir.path().join("big.vdf");

    generate_test_assets::generate_oversized_obj(&obj_path).unwrap();
    let output = run_vdf_export(&[
        "mesh",
        obj_path.to_str().unwrap(),
        "-o",
        vdf_path.to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "export should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("65536"), "stderr: {}", stderr);
    assert!(!vdf_path.exists(), "no output file on failure");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

/// glTF mesh selection by name
#[test]
fn test_gltf_object_selection() {
    let dir = tempdir().expect("Failed to create temp dir");
    let gltf_path = dir.path().join("scene.gltf");
    let vdf_path = dir.path().join("platform1.vdf");

    generate_test_assets::generate_two_mesh_gltf(&gltf_path).expect("Failed to generate glTF");
    vdf_export_mesh(&gltf_path, Some(&vdf_path), Some("platform1"));

    let data = std::fs::read(&vdf_path).unwrap();
    let header = verify_vdf(&data);
    assert_eq!(header.vertex_count, 4);
    assert_eq!(header.triangle_count, 2);

    let document = VdfDocument::parse(&data).unwrap();
    assert_eq!(document.normals(), vec![[0.0, 1.0, 0.0]; 4]);
    assert_eq!(document.triangles(), vec![[0, 1, 2], [0, 2, 3]]);
}

/// Without --object the first mesh is exported
#[test]
fn test_gltf_first_mesh() {
    let dir = tempdir().expect("Failed to create temp dir");
    let gltf_path = dir.path().join("scene.gltf");

    generate_test_assets::generate_two_mesh_gltf(&gltf_path).unwrap();
    let mesh = vdf_export::load_gltf(&gltf_path, None).expect("Failed to load glTF");

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    for n in &mesh.normals {
        assert!((n[1] - 1.0).abs() < 1e-6, "generated normal should face +Y");
    }
}

#[test]
fn test_gltf_missing_object_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let gltf_path = dir.path().join("scene.gltf");
    generate_test_assets::generate_two_mesh_gltf(&gltf_path).unwrap();

    let err = vdf_export::load_gltf(&gltf_path, Some("platform2")).unwrap_err();
    assert!(err.to_string().contains("platform2"));
}

/// Triangle primitives are merged with rebased indices; lines are skipped
#[test]
fn test_gltf_merges_triangle_primitives() {
    let dir = tempdir().expect("Failed to create temp dir");
    let gltf_path = dir.path().join("mixed.gltf");
    let vdf_path = dir.path().join("mixed.vdf");

    generate_test_assets::generate_multi_primitive_gltf(&gltf_path).unwrap();
    let mesh = vdf_export::load_gltf(&gltf_path, None).expect("Failed to load glTF");

    assert_eq!(mesh.vertex_count(), 7);
    assert_eq!(mesh.positions[3], [2.0, 0.0, 0.0]);
    assert_eq!(mesh.triangles, vec![[0, 1, 2], [3, 4, 5], [3, 5, 6]]);

    // Colored primitive keeps its COLOR_0, the uncolored one is filled white
    assert_eq!(mesh.colors.len(), 7);
    assert_eq!(mesh.colors[0], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(mesh.colors[2], [0.0, 0.0, 1.0, 0.5]);
    assert_eq!(&mesh.colors[3..], &[[1.0; 4]; 4]);

    vdf_export_mesh(&gltf_path, Some(&vdf_path), None);
    let data = std::fs::read(&vdf_path).unwrap();
    let header = verify_vdf(&data);
    assert_eq!(header.vertex_count, 7);
    assert_eq!(header.triangle_count, 3);
    assert_eq!(header.offset_to_color_data, 0);
}

#[test]
fn test_gltf_index_out_of_range_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let gltf_path = dir.path().join("broken.gltf");
    generate_test_assets::generate_bad_index_gltf(&gltf_path).unwrap();

    let err = vdf_export::load_gltf(&gltf_path, None).unwrap_err();
    assert!(err.to_string().contains("out of range"), "error: {}", err);
}

/// Manifest build through the CLI
#[test]
fn test_build_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_assets::generate_cube_obj(&dir.path().join("cube.obj")).unwrap();
    generate_test_assets::generate_two_mesh_gltf(&dir.path().join("scene.gltf")).unwrap();

    let manifest_path = dir.path().join("assets.toml");
    std::fs::write(
        &manifest_path,
        r#"
[output]
dir = "build"

[[meshes]]
id = "cube"
path = "cube.obj"

[[meshes]]
id = "platform1"
path = "scene.gltf"
object = "platform1"
"#,
    )
    .unwrap();

    let output = run_vdf_export(&["check", manifest_path.to_str().unwrap()]);
    assert!(output.status.success(), "check failed: {:?}", output);

    let output = run_vdf_export(&["build", manifest_path.to_str().unwrap()]);
    assert!(output.status.success(), "build failed: {:?}", output);

    let cube = std::fs::read(dir.path().join("build/cube.vdf")).unwrap();
    assert_eq!(cube.len(), 296);
    let platform = std::fs::read(dir.path().join("build/platform1.vdf")).unwrap();
    assert_eq!(verify_vdf(&platform).vertex_count, 4);
}

#[test]
fn test_check_rejects_duplicate_ids() {
    let dir = tempdir().expect("Failed to create temp dir");
    generate_test_assets::generate_triangle_obj(&dir.path().join("tri.obj")).unwrap();

    let manifest_path = dir.path().join("assets.toml");
    std::fs::write(
        &manifest_path,
        "[[meshes]]\nid = \"tri\"\npath = \"tri.obj\"\n\
         [[meshes]]\nid = \"tri\"\npath = \"tri.obj\"\n",
    )
    .unwrap();

    let output = run_vdf_export(&["check", manifest_path.to_str().unwrap()]);
    assert!(!output.status.success());
}

/// Inspect prints the header of a written file
#[test]
fn test_inspect_command() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    let vdf_path = dir.path().join("cube.vdf");

    generate_test_assets::generate_cube_obj(&obj_path).unwrap();
    vdf_export_mesh(&obj_path, Some(&vdf_path), None);

    let output = run_vdf_export(&["inspect", vdf_path.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Magic:          VDF1"), "stdout: {}", stdout);
    assert!(stdout.contains("VertexCount:    8"));
    assert!(stdout.contains("TriangleCount:  12"));
    assert!(stdout.contains("File size:      296 bytes"));
}

#[test]
fn test_inspect_rejects_non_vdf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let obj_path = dir.path().join("cube.obj");
    generate_test_assets::generate_cube_obj(&obj_path).unwrap();

    let output = run_vdf_export(&["inspect", obj_path.to_str().unwrap()]);
    assert!(!output.status.success());
}

fn run_vdf_export(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_vdf-export"))
        .args(args)
        .output()
        .expect("Failed to run vdf-export")
}

// Helper to run vdf-export mesh command
fn vdf_export_mesh(input: &Path, output: Option<&Path>, object: Option<&str>) {
    let mut args = vec!["mesh", input.to_str().unwrap()];
    if let Some(output) = output {
        args.extend(["-o", output.to_str().unwrap()]);
    }
    if let Some(object) = object {
        args.extend(["--object", object]);
    }
    let output = run_vdf_export(&args);
    assert!(
        output.status.success(),
        "vdf-export mesh command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// Verify VDF header structure and section layout
fn verify_vdf(data: &[u8]) -> VdfHeader {
    assert!(data.len() >= HEADER_SIZE, "VDF data too small for header");

    let header = VdfHeader::from_bytes(data).expect("Failed to parse VDF header");
    assert_eq!(&header.magic, b"VDF1");
    assert_eq!(header.vertex_format, 1);

    // Sections follow the header back to back: position, normal, triangle
    let vertex_bytes = header.vertex_count as usize * 12;
    let triangle_bytes = header.triangle_count as usize * 6;
    assert_eq!(header.offset_to_position_data as usize, HEADER_SIZE);
    assert_eq!(
        header.offset_to_normal_data as usize,
        HEADER_SIZE + vertex_bytes
    );
    assert_eq!(
        header.offset_to_triangle_data as usize,
        HEADER_SIZE + 2 * vertex_bytes
    );
    assert_eq!(data.len(), HEADER_SIZE + 2 * vertex_bytes + triangle_bytes);

    header
}
