//! VDF1 document: section writer and verifying reader

use std::io::Write;

use super::vdf::{HEADER_SIZE, SectionLengths, SectionSpan, VdfHeader};
use crate::error::VdfError;
use crate::mesh::Mesh;

/// A fully materialized VDF1 file: header plus the four raw sections.
///
/// Built once per export with [`VdfDocument::from_mesh`] and then written to a
/// sink in one pass. Section bytes are already little-endian encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VdfDocument {
    header: VdfHeader,
    positions: Vec<u8>,
    normals: Vec<u8>,
    colors: Vec<u8>,
    triangles: Vec<u8>,
}

impl VdfDocument {
    /// Encode a mesh.
    ///
    /// The mesh is validated first, so a precondition error never leaves
    /// anything behind. Vertex colors are not written: the color section stays
    /// empty and `offset_to_color_data` is 0.
    ///
    /// A mesh with no vertices and no triangles is valid and produces a
    /// header-only, 32-byte document.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, VdfError> {
        mesh.validate()?;

        if mesh.has_colors() {
            tracing::warn!(
                "Mesh has {} vertex colors; VDF1 color section is not written",
                mesh.colors.len()
            );
        }

        let positions = encode_vec3(&mesh.positions);
        let normals = encode_vec3(&mesh.normals);
        let colors = Vec::new();
        let triangles = encode_triangles(&mesh.triangles);

        let lengths = SectionLengths {
            position: positions.len(),
            normal: normals.len(),
            color: colors.len(),
            triangle: triangles.len(),
        };

        // Counts were range-checked by validate()
        let header = VdfHeader::plan(
            mesh.vertex_count() as u32,
            mesh.triangle_count() as u32,
            &lengths,
        )?;

        Ok(Self {
            header,
            positions,
            normals,
            colors,
            triangles,
        })
    }

    pub fn header(&self) -> &VdfHeader {
        &self.header
    }

    /// Total size in bytes, header included
    pub fn byte_len(&self) -> usize {
        HEADER_SIZE
            + self.positions.len()
            + self.normals.len()
            + self.colors.len()
            + self.triangles.len()
    }

    /// Write header and sections in file order.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), VdfError> {
        w.write_all(&self.header.to_bytes())?;
        w.write_all(&self.positions)?;
        w.write_all(&self.normals)?;
        w.write_all(&self.colors)?;
        w.write_all(&self.triangles)?;
        Ok(())
    }

    /// Concatenate header and sections into one buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.positions);
        bytes.extend_from_slice(&self.normals);
        bytes.extend_from_slice(&self.colors);
        bytes.extend_from_slice(&self.triangles);
        bytes
    }

    /// Parse and verify a VDF1 file.
    ///
    /// Checks the magic and vertex format, and that every non-empty section lies
    /// between the end of the header and the end of `bytes` without overlapping
    /// another section. Offsets of empty sections are never dereferenced.
    pub fn parse(bytes: &[u8]) -> Result<Self, VdfError> {
        let header =
            VdfHeader::from_bytes(bytes).ok_or(VdfError::TruncatedHeader(bytes.len()))?;
        header.check()?;

        let spans = header.sections();
        check_disjoint(&spans)?;

        let [position, normal, color, triangle] = spans;
        let slice = |span: SectionSpan| -> Result<Vec<u8>, VdfError> {
            if span.is_empty() {
                return Ok(Vec::new());
            }
            if (span.offset as usize) < HEADER_SIZE {
                return Err(VdfError::SectionInsideHeader {
                    section: span.name,
                    offset: span.offset,
                });
            }
            if span.end() > bytes.len() as u64 {
                return Err(VdfError::SectionOutOfBounds {
                    section: span.name,
                    offset: span.offset,
                    len: span.len,
                    file_len: bytes.len(),
                });
            }
            let start = span.offset as usize;
            Ok(bytes[start..start + span.len as usize].to_vec())
        };

        let positions = slice(position)?;
        let normals = slice(normal)?;
        let colors = slice(color)?;
        let triangles = slice(triangle)?;

        tracing::debug!(
            vertices = header.vertex_count,
            triangles = header.triangle_count,
            "Parsed VDF1 document"
        );

        Ok(Self {
            header,
            positions,
            normals,
            colors,
            triangles,
        })
    }

    pub fn positions(&self) -> Vec<[f32; 3]> {
        decode_vec3(&self.positions)
    }

    pub fn normals(&self) -> Vec<[f32; 3]> {
        decode_vec3(&self.normals)
    }

    /// Color section as stored (3 x f32 per vertex); empty when absent.
    pub fn colors(&self) -> Vec<[f32; 3]> {
        decode_vec3(&self.colors)
    }

    pub fn triangles(&self) -> Vec<[u16; 3]> {
        self.triangles
            .chunks_exact(6)
            .map(|c| {
                [
                    u16::from_le_bytes([c[0], c[1]]),
                    u16::from_le_bytes([c[2], c[3]]),
                    u16::from_le_bytes([c[4], c[5]]),
                ]
            })
            .collect()
    }

    /// Rebuild the mesh arrays the document was encoded from.
    ///
    /// Colors are expanded to RGBA with alpha 1.0 if a color section exists.
    pub fn to_mesh(&self) -> Mesh {
        let triangles = self
            .triangles()
            .into_iter()
            .map(|[a, b, c]| [a as u32, b as u32, c as u32])
            .collect();
        let colors = self
            .colors()
            .into_iter()
            .map(|[r, g, b]| [r, g, b, 1.0])
            .collect();
        Mesh::new(self.positions(), self.normals(), triangles).with_colors(colors)
    }
}

/// Non-empty sections must not share bytes.
fn check_disjoint(spans: &[SectionSpan]) -> Result<(), VdfError> {
    let mut filled: Vec<&SectionSpan> = spans.iter().filter(|s| !s.is_empty()).collect();
    filled.sort_by_key(|s| s.offset);
    for pair in filled.windows(2) {
        if pair[0].end() > pair[1].offset as u64 {
            return Err(VdfError::SectionOverlap {
                first: pair[0].name,
                second: pair[1].name,
            });
        }
    }
    Ok(())
}

/// Encode `[x, y, z]` triples as consecutive little-endian f32.
fn encode_vec3(values: &[[f32; 3]]) -> Vec<u8> {
    let flat: &[f32] = bytemuck::cast_slice(values);
    let mut bytes = Vec::with_capacity(flat.len() * 4);
    for v in flat {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Encode index triples as little-endian u16. Indices must already be validated.
fn encode_triangles(triangles: &[[u32; 3]]) -> Vec<u8> {
    let flat: &[u32] = bytemuck::cast_slice(triangles);
    let mut bytes = Vec::with_capacity(flat.len() * 2);
    for &i in flat {
        debug_assert!(i <= u16::MAX as u32);
        bytes.extend_from_slice(&(i as u16).to_le_bytes());
    }
    bytes
}

fn decode_vec3(bytes: &[u8]) -> Vec<[f32; 3]> {
    let flat: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    bytemuck::cast_slice::<f32, [f32; 3]>(&flat).to_vec()
}
