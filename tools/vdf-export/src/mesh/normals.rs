//! Smooth vertex normal generation

use glam::Vec3;

/// Area-weighted vertex normals
///
/// Each triangle adds its unnormalized face normal (whose length is twice its
/// area) to its three vertices. Vertices no triangle touches, or whose sum
/// cancels out, get +Z. Triangles with out-of-range indices are skipped.
pub fn generate_vertex_normals(positions: &[[f32; 3]], triangles: &[[u32; 3]]) -> Vec<[f32; 3]> {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for &tri in triangles {
        let [a, b, c] = tri.map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }

    sums.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Z).to_array())
        .collect()
}
