//! VDF1 header and section layout (.vdf)
//!
//! "Vertex Data Format", version 1. Little-endian throughout, no padding.
//!
//! # Layout
//! ```text
//! 0x00: magic "VDF1" (4 bytes ASCII)
//! 0x04: vertex_format u32 (1 = 3 x f32)
//! 0x08: vertex_count u32
//! 0x0C: offset_to_position_data u32
//! 0x10: offset_to_normal_data u32
//! 0x14: offset_to_color_data u32 (0 = no color section)
//! 0x18: triangle_count u32
//! 0x1C: offset_to_triangle_data u32
//! 0x20: position data (vertex_count x 12 bytes)
//! var:  normal data (vertex_count x 12 bytes)
//! var:  color data (vertex_count x 12 bytes), only if offset_to_color_data != 0
//! var:  triangle data (triangle_count x 6 bytes, u16 indices)
//! ```
//!
//! Offsets of zero-length sections are still filled in (they point at the end of
//! the preceding section) but must not be dereferenced.

use crate::error::VdfError;

/// Magic bytes at the start of every VDF1 file
pub const VDF_MAGIC: &[u8; 4] = b"VDF1";

/// File extension without dot
pub const VDF_EXTENSION: &str = "vdf";

/// VertexFormat value for 3-component 32-bit float positions/normals/colors
pub const VERTEX_FORMAT_F32X3: u32 = 1;

/// Header size in bytes
pub const HEADER_SIZE: usize = 32;

/// Bytes per vertex in the position section (3 x f32)
pub const POSITION_STRIDE: usize = 12;

/// Bytes per vertex in the normal section (3 x f32)
pub const NORMAL_STRIDE: usize = 12;

/// Bytes per vertex in the color section (3 x f32, same encoding as positions)
pub const COLOR_STRIDE: usize = 12;

/// Bytes per triangle in the triangle section (3 x u16)
pub const TRIANGLE_STRIDE: usize = 6;

/// Largest vertex index the u16 triangle section can hold
pub const MAX_TRIANGLE_INDEX: u32 = u16::MAX as u32;

/// Byte lengths of the four sections, in header field order.
///
/// The writer currently always passes `color: 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionLengths {
    pub position: usize,
    pub normal: usize,
    pub color: usize,
    pub triangle: usize,
}

impl SectionLengths {
    /// Section lengths implied by the counts for VertexFormat 1.
    pub fn for_counts(vertex_count: usize, triangle_count: usize, with_colors: bool) -> Self {
        Self {
            position: vertex_count * POSITION_STRIDE,
            normal: vertex_count * NORMAL_STRIDE,
            color: if with_colors {
                vertex_count * COLOR_STRIDE
            } else {
                0
            },
            triangle: triangle_count * TRIANGLE_STRIDE,
        }
    }

    /// Combined length of all sections (excluding the header)
    pub fn total(&self) -> usize {
        self.position + self.normal + self.color + self.triangle
    }
}

/// One section's placement inside a document, as described by a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub name: &'static str,
    pub offset: u32,
    pub len: u64,
}

impl SectionSpan {
    /// Exclusive end offset
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// VDF1 header (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct VdfHeader {
    pub magic: [u8; 4],
    pub vertex_format: u32,
    pub vertex_count: u32,
    pub offset_to_position_data: u32,
    pub offset_to_normal_data: u32,
    pub offset_to_color_data: u32,
    pub triangle_count: u32,
    pub offset_to_triangle_data: u32,
}

impl VdfHeader {
    pub const SIZE: usize = HEADER_SIZE;

    /// Compute section offsets and assemble the header.
    ///
    /// Sections follow the header in field order: position, normal, color,
    /// triangle. Each offset is `HEADER_SIZE` plus the lengths of the sections
    /// before it. An empty color section gets offset 0.
    pub fn plan(
        vertex_count: u32,
        triangle_count: u32,
        lengths: &SectionLengths,
    ) -> Result<Self, VdfError> {
        let mut cursor = HEADER_SIZE as u64;

        let offset_to_position_data = to_offset("position offset", cursor)?;
        cursor += lengths.position as u64;

        let offset_to_normal_data = to_offset("normal offset", cursor)?;
        cursor += lengths.normal as u64;

        let offset_to_color_data = if lengths.color == 0 {
            0
        } else {
            to_offset("color offset", cursor)?
        };
        cursor += lengths.color as u64;

        let offset_to_triangle_data = to_offset("triangle offset", cursor)?;

        Ok(Self {
            magic: *VDF_MAGIC,
            vertex_format: VERTEX_FORMAT_F32X3,
            vertex_count,
            offset_to_position_data,
            offset_to_normal_data,
            offset_to_color_data,
            triangle_count,
            offset_to_triangle_data,
        })
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.vertex_format.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.vertex_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.offset_to_position_data.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.offset_to_normal_data.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.offset_to_color_data.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.triangle_count.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.offset_to_triangle_data.to_le_bytes());
        bytes
    }

    /// Read header from bytes
    ///
    /// Only checks the length; use [`VdfHeader::check`] to validate the fields.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let word = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        Some(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            vertex_format: word(4),
            vertex_count: word(8),
            offset_to_position_data: word(12),
            offset_to_normal_data: word(16),
            offset_to_color_data: word(20),
            triangle_count: word(24),
            offset_to_triangle_data: word(28),
        })
    }

    /// Reject headers with a foreign magic or an unknown vertex format.
    pub fn check(&self) -> Result<(), VdfError> {
        if &self.magic != VDF_MAGIC {
            return Err(VdfError::BadMagic(self.magic));
        }
        if self.vertex_format != VERTEX_FORMAT_F32X3 {
            return Err(VdfError::UnsupportedVertexFormat(self.vertex_format));
        }
        Ok(())
    }

    pub fn has_color_data(&self) -> bool {
        self.offset_to_color_data != 0
    }

    /// Section placements in header field order.
    pub fn sections(&self) -> [SectionSpan; 4] {
        let vertices = self.vertex_count as u64;
        [
            SectionSpan {
                name: "position",
                offset: self.offset_to_position_data,
                len: vertices * POSITION_STRIDE as u64,
            },
            SectionSpan {
                name: "normal",
                offset: self.offset_to_normal_data,
                len: vertices * NORMAL_STRIDE as u64,
            },
            SectionSpan {
                name: "color",
                offset: self.offset_to_color_data,
                len: if self.has_color_data() {
                    vertices * COLOR_STRIDE as u64
                } else {
                    0
                },
            },
            SectionSpan {
                name: "triangle",
                offset: self.offset_to_triangle_data,
                len: self.triangle_count as u64 * TRIANGLE_STRIDE as u64,
            },
        ]
    }

    /// Total document size implied by this header
    pub fn document_len(&self) -> u64 {
        self.sections()
            .iter()
            .map(SectionSpan::end)
            .fold(HEADER_SIZE as u64, u64::max)
    }
}

fn to_offset(what: &'static str, value: u64) -> Result<u32, VdfError> {
    u32::try_from(value).map_err(|_| VdfError::TooLarge { what, value })
}
