//! .vdf inspection

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;

use vdf_common::{VdfDocument, VdfHeader};

/// Verified header and layout of a .vdf file
#[derive(Debug, Clone)]
pub struct InspectReport {
    pub header: VdfHeader,
    pub file_len: usize,
}

impl InspectReport {
    /// Bytes past the last section. Always 0 for files this tool writes.
    pub fn trailing_bytes(&self) -> u64 {
        (self.file_len as u64).saturating_sub(self.header.document_len())
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = &self.header;
        writeln!(f, "Magic:          {}", String::from_utf8_lossy(&h.magic))?;
        writeln!(f, "VertexFormat:   {}", h.vertex_format)?;
        writeln!(f, "VertexCount:    {}", h.vertex_count)?;
        writeln!(f, "TriangleCount:  {}", h.triangle_count)?;
        writeln!(f, "File size:      {} bytes", self.file_len)?;
        for section in h.sections() {
            if section.is_empty() {
                writeln!(f, "  {:<9} (empty, offset {})", section.name, section.offset)?;
            } else {
                writeln!(
                    f,
                    "  {:<9} {:>8}..{:<8} ({} bytes)",
                    section.name,
                    section.offset,
                    section.end(),
                    section.len
                )?;
            }
        }
        if self.trailing_bytes() > 0 {
            writeln!(f, "Trailing bytes: {}", self.trailing_bytes())?;
        }
        Ok(())
    }
}

/// Read and verify a .vdf file
pub fn inspect_file(path: &Path) -> Result<InspectReport> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let document =
        VdfDocument::parse(&data).with_context(|| format!("Invalid VDF file: {:?}", path))?;

    Ok(InspectReport {
        header: *document.header(),
        file_len: data.len(),
    })
}
