//! glTF/GLB mesh loading

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::normals::generate_vertex_normals;
use crate::formats::{write_vdf_file, ExportSummary};
use vdf_common::Mesh;

/// Convert a glTF/GLB file to a .vdf file
pub fn convert_gltf(input: &Path, output: &Path, object: Option<&str>) -> Result<ExportSummary> {
    let mesh = load_gltf(input, object)?;
    let summary = write_vdf_file(output, &mesh)?;

    tracing::info!(
        "Converted mesh: {} vertices, {} triangles, {} bytes",
        summary.vertex_count,
        summary.triangle_count,
        summary.bytes_written
    );

    Ok(summary)
}

/// Load one mesh from a glTF/GLB file
///
/// `object` picks the mesh by name; without it the first mesh is used. All
/// triangle-list primitives of that mesh are merged into one vertex array.
/// Primitives in other modes (strips, fans, lines, points) are skipped.
pub fn load_gltf(input: &Path, object: Option<&str>) -> Result<Mesh> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mesh = match object {
        Some(name) => document
            .meshes()
            .find(|m| m.name() == Some(name))
            .with_context(|| format!("No mesh named {:?} found in {:?}", name, input))?,
        None => document
            .meshes()
            .next()
            .context("No meshes found in glTF")?,
    };

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<Option<[f32; 3]>> = Vec::new();
    let mut colors: Vec<[f32; 4]> = Vec::new();
    let mut has_colors = false;
    let mut triangles: Vec<[u32; 3]> = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} of mesh {:?}: mode {:?} is not a triangle list",
                primitive.index(),
                mesh.name().unwrap_or("<unnamed>"),
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        // Positions (required)
        let prim_positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("No positions in mesh")?
            .collect();
        let count = prim_positions.len();
        let base = u32::try_from(positions.len()).context("glTF mesh has too many vertices")?;

        // Normals (optional, generated below when missing)
        match reader.read_normals() {
            Some(iter) => normals.extend(iter.map(Some)),
            None => normals.extend(std::iter::repeat(None).take(count)),
        }

        // Vertex colors (optional)
        match reader.read_colors(0) {
            Some(iter) => {
                has_colors = true;
                colors.extend(iter.into_rgba_f32());
            }
            None => colors.extend(std::iter::repeat([1.0; 4]).take(count)),
        }

        // Indices (optional, non-indexed primitives are sequential)
        let indices: Vec<u32> = match reader.read_indices() {
            Some(iter) => iter.into_u32().collect(),
            None => (0..count as u32).collect(),
        };
        if indices.len() % 3 != 0 {
            bail!(
                "Primitive {} has {} indices, not a multiple of 3",
                primitive.index(),
                indices.len()
            );
        }
        for chunk in indices.chunks_exact(3) {
            let mut tri = [0u32; 3];
            for (slot, &i) in tri.iter_mut().zip(chunk) {
                if i as usize >= count {
                    bail!(
                        "Primitive {} index {} out of range ({} vertices)",
                        primitive.index(),
                        i,
                        count
                    );
                }
                *slot = base
                    .checked_add(i)
                    .context("glTF index exceeds u32 range")?;
            }
            triangles.push(tri);
        }

        positions.extend(prim_positions);
    }

    if positions.is_empty() {
        bail!("No triangle primitives found in mesh");
    }

    let normals: Vec<[f32; 3]> = if normals.iter().all(Option::is_some) {
        normals.into_iter().flatten().collect()
    } else {
        tracing::debug!("Generating vertex normals");
        let generated = generate_vertex_normals(&positions, &triangles);
        normals
            .into_iter()
            .zip(generated)
            .map(|(given, generated)| given.unwrap_or(generated))
            .collect()
    };

    if !has_colors {
        colors.clear();
    }

    Ok(Mesh::new(positions, normals, triangles).with_colors(colors))
}
