//! OBJ mesh loading

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::normals::generate_vertex_normals;
use crate::formats::{write_vdf_file, ExportSummary};
use vdf_common::Mesh;

/// Convert an OBJ file to a .vdf file
pub fn convert_obj(input: &Path, output: &Path) -> Result<ExportSummary> {
    let mesh = load_obj(input)?;
    let summary = write_vdf_file(output, &mesh)?;

    tracing::info!(
        "Converted OBJ mesh: {} vertices, {} triangles, {} bytes",
        summary.vertex_count,
        summary.triangle_count,
        summary.bytes_written
    );

    Ok(summary)
}

/// Load an OBJ file into a [`Mesh`]
pub fn load_obj(input: &Path) -> Result<Mesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text into a [`Mesh`]
///
/// One exported vertex per `v` line, in file order. `v x y z r g b` lines carry
/// vertex colors; they are kept only if every vertex has one. Only faces with
/// exactly three corners become triangles. A vertex takes the first `vn` any
/// face assigns to it; vertices left without one get a generated normal.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Mesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut colors: Vec<[f32; 4]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();
    let mut vertex_normals: Vec<Option<[f32; 3]>> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    let mut skipped_faces = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "v" if parts.len() >= 4 => {
                positions.push(parse_vec3(&parts[1..4], line_no)?);
                if parts.len() >= 7 {
                    let [r, g, b] = parse_vec3(&parts[4..7], line_no)?;
                    colors.push([r, g, b, 1.0]);
                }
            }
            "vn" if parts.len() >= 4 => {
                normals_raw.push(parse_vec3(&parts[1..4], line_no)?);
            }
            "v" | "vn" => {
                // Skipping would shift every later index onto the wrong element
                bail!(
                    "line {}: {:?} needs 3 coordinates, got {}",
                    line_no + 1,
                    parts[0],
                    parts.len() - 1
                );
            }
            "f" => {
                let mut corners: Vec<(usize, Option<usize>)> =
                    Vec::with_capacity(parts.len() - 1);
                for corner in &parts[1..] {
                    let resolved = parse_obj_vertex(corner, positions.len(), normals_raw.len())
                        .with_context(|| {
                            format!("line {}: invalid vertex reference {:?}", line_no + 1, corner)
                        })?;
                    corners.push(resolved);
                }

                if corners.len() != 3 {
                    skipped_faces += 1;
                    continue;
                }

                let mut tri = [0u32; 3];
                for (slot, &(vi, vni)) in tri.iter_mut().zip(corners.iter()) {
                    if vi >= positions.len() {
                        bail!(
                            "line {}: face references vertex {} but only {} defined",
                            line_no + 1,
                            vi + 1,
                            positions.len()
                        );
                    }
                    *slot = u32::try_from(vi)
                        .with_context(|| format!("line {}: vertex index too large", line_no + 1))?;

                    if vertex_normals.len() < positions.len() {
                        vertex_normals.resize(positions.len(), None);
                    }
                    if vertex_normals[vi].is_none() {
                        vertex_normals[vi] = vni.and_then(|ni| normals_raw.get(ni).copied());
                    }
                }
                triangles.push(tri);
            }
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    if skipped_faces > 0 {
        tracing::warn!(
            "Skipped {} non-triangle faces (triangulate before export)",
            skipped_faces
        );
    }

    vertex_normals.resize(positions.len(), None);
    let normals: Vec<[f32; 3]> = if vertex_normals.iter().all(Option::is_some) {
        vertex_normals.into_iter().flatten().collect()
    } else {
        let generated = generate_vertex_normals(&positions, &triangles);
        vertex_normals
            .into_iter()
            .zip(generated)
            .map(|(given, generated)| given.unwrap_or(generated))
            .collect()
    };

    let colors = if colors.len() == positions.len() {
        colors
    } else {
        if !colors.is_empty() {
            tracing::warn!(
                "Only {} of {} vertices have colors, ignoring vertex colors",
                colors.len(),
                positions.len()
            );
        }
        Vec::new()
    };

    Ok(Mesh::new(positions, normals, triangles).with_colors(colors))
}

fn parse_vec3(parts: &[&str], line_no: usize) -> Result<[f32; 3]> {
    let mut out = [0.0f32; 3];
    for (slot, s) in out.iter_mut().zip(parts) {
        *slot = s
            .parse()
            .with_context(|| format!("line {}: invalid number {:?}", line_no + 1, s))?;
    }
    Ok(out)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Returns zero-based (position, normal) indices; texture coordinates are not exported.
/// Negative indices count back from the last position/normal defined so far.
fn parse_obj_vertex(
    s: &str,
    position_count: usize,
    normal_count: usize,
) -> Option<(usize, Option<usize>)> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = resolve_obj_index(parts.first()?, position_count)?;

    let vni = match parts.get(2).filter(|s| !s.is_empty()) {
        Some(n) => Some(resolve_obj_index(n, normal_count)?),
        None => None,
    };

    Some((vi, vni))
}

/// OBJ indices are 1-based; -1 is the most recent element. 0 is invalid.
fn resolve_obj_index(s: &str, count: usize) -> Option<usize> {
    let i = s.parse::<i64>().ok()?;
    match i {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => count.checked_sub(usize::try_from(i.unsigned_abs()).ok()?),
    }
}
