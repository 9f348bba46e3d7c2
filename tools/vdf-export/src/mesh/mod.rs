//! Mesh acquisition (OBJ/glTF -> Mesh -> .vdf)
//!
//! Loaders only gather already-triangulated geometry. Faces that are not
//! triangles are dropped, never split.

mod gltf;
mod normals;
mod obj;

use anyhow::{bail, Result};
use std::path::Path;

use crate::formats::ExportSummary;

// Re-export public API
pub use self::gltf::{convert_gltf, load_gltf};
pub use normals::generate_vertex_normals;
pub use obj::{convert_obj, load_obj, parse_obj};

/// Convert any supported mesh file, picking the loader by extension
///
/// `object` selects a mesh by name in glTF/GLB files and is ignored for OBJ.
pub fn convert_mesh(input: &Path, output: &Path, object: Option<&str>) -> Result<ExportSummary> {
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "obj" => {
            if let Some(name) = object {
                tracing::warn!("Ignoring object name {:?} for OBJ input {:?}", name, input);
            }
            convert_obj(input, output)
        }
        "gltf" | "glb" => convert_gltf(input, output, object),
        _ => bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}

/// Whether `path` has an extension [`convert_mesh`] understands
pub fn is_supported_mesh(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "obj" | "gltf" | "glb"))
        .unwrap_or(false)
}
