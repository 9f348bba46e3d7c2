//! Triangle mesh input for the VDF serializer
//!
//! A [`Mesh`] is a set of plain arrays produced by whatever acquired the geometry
//! (an OBJ/glTF loader, a modelling tool, a procedural generator). It is already
//! triangulated: the serializer never splits polygons or applies modifiers.

use crate::error::VdfError;
use crate::formats::MAX_TRIANGLE_INDEX;

/// Already-triangulated mesh handed to the serializer.
///
/// Vertex `i` is `positions[i]` with normal `normals[i]` (and `colors[i]` when
/// colors are present). Triangles index into those arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions, one per vertex, in vertex index order
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, same length and order as `positions`. Not renormalized.
    pub normals: Vec<[f32; 3]>,
    /// Optional RGBA vertex colors: empty, or same length as `positions`
    pub colors: Vec<[f32; 4]>,
    /// Index triples, each component < vertex count
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        Self {
            positions,
            normals,
            colors: Vec::new(),
            triangles,
        }
    }

    /// Attach per-vertex RGBA colors.
    pub fn with_colors(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.colors = colors;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Check that this mesh can be written as a VDF1 document.
    ///
    /// Order of checks:
    /// 1. normals (and colors, if any) match the position count
    /// 2. vertex and triangle counts fit in u32
    /// 3. every triangle index fits the 16-bit index section
    /// 4. every triangle index is below the vertex count
    ///
    /// An index of 65536 therefore always reports [`VdfError::IndexOverflow`],
    /// even on a mesh with fewer vertices.
    pub fn validate(&self) -> Result<(), VdfError> {
        let vertex_count = self.vertex_count();

        if self.normals.len() != vertex_count {
            return Err(VdfError::AttributeLengthMismatch {
                attribute: "normals",
                expected: vertex_count,
                actual: self.normals.len(),
            });
        }

        if self.has_colors() && self.colors.len() != vertex_count {
            return Err(VdfError::AttributeLengthMismatch {
                attribute: "colors",
                expected: vertex_count,
                actual: self.colors.len(),
            });
        }

        if u32::try_from(vertex_count).is_err() {
            return Err(VdfError::TooLarge {
                what: "vertex count",
                value: vertex_count as u64,
            });
        }
        if u32::try_from(self.triangle_count()).is_err() {
            return Err(VdfError::TooLarge {
                what: "triangle count",
                value: self.triangle_count() as u64,
            });
        }

        for (triangle, tri) in self.triangles.iter().enumerate() {
            for &index in tri {
                if index > MAX_TRIANGLE_INDEX {
                    return Err(VdfError::IndexOverflow {
                        triangle,
                        index,
                        max: MAX_TRIANGLE_INDEX,
                    });
                }
                if index as usize >= vertex_count {
                    return Err(VdfError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count,
                    });
                }
            }
        }

        Ok(())
    }
}
