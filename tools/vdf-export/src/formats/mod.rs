//! Writers for .vdf files
//!
//! Re-exports the format definitions from vdf-common and adds sink handling.

pub use vdf_common::formats::*;

use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use vdf_common::Mesh;

/// What an export produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub vertex_count: u32,
    pub normal_count: u32,
    pub triangle_count: u32,
    pub bytes_written: usize,
}

impl ExportSummary {
    fn from_document(document: &VdfDocument, mesh: &Mesh) -> Self {
        let header = document.header();
        Self {
            vertex_count: header.vertex_count,
            normal_count: mesh.normals.len() as u32,
            triangle_count: header.triangle_count,
            bytes_written: document.byte_len(),
        }
    }
}

/// Write a complete VDF file to any sink
///
/// The document is fully encoded before the first byte is written, so a mesh
/// that violates a format limit leaves the sink untouched. Works on
/// non-seekable sinks: offsets are known up front and the header goes first.
pub fn write_vdf_mesh<W: Write>(w: &mut W, mesh: &Mesh) -> Result<ExportSummary> {
    let document = VdfDocument::from_mesh(mesh).context("Mesh cannot be encoded as VDF1")?;
    document.write_to(w)?;
    Ok(ExportSummary::from_document(&document, mesh))
}

/// Write a VDF file to `output`, replacing it atomically
///
/// Bytes go to a temporary file in the same directory, which is renamed over
/// `output` only after everything has been flushed. On any failure the
/// temporary file is removed and `output` is left as it was.
pub fn write_vdf_file(output: &Path, mesh: &Mesh) -> Result<ExportSummary> {
    let document = VdfDocument::from_mesh(mesh).context("Mesh cannot be encoded as VDF1")?;

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        document
            .write_to(&mut writer)
            .with_context(|| format!("Failed to write {:?}", output))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {:?}", output))?;
    }
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync {:?}", output))?;
    temp.persist(output)
        .with_context(|| format!("Failed to create output: {:?}", output))?;

    let summary = ExportSummary::from_document(&document, mesh);
    tracing::info!("Vertices:  {}", summary.vertex_count);
    tracing::info!("Normals:   {}", summary.normal_count);
    tracing::info!("Triangles: {}", summary.triangle_count);
    tracing::debug!("Wrote {} bytes to {:?}", summary.bytes_written, output);

    Ok(summary)
}
