//! vdf-export library
//!
//! Provides mesh conversion functions for use by other tools and tests.

pub mod formats;
pub mod inspect;
pub mod manifest;
pub mod mesh;

// Re-export the core format types from vdf-common
pub use vdf_common::{Mesh, VdfDocument, VdfError, VdfHeader, VDF_EXTENSION};

// Re-export key types for mesh conversion
pub use formats::{write_vdf_file, write_vdf_mesh, ExportSummary};
pub use mesh::{convert_gltf, convert_mesh, convert_obj, load_gltf, load_obj};
