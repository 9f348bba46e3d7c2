//! Shared types for the VDF1 vertex data format
//!
//! This crate holds everything needed to turn an in-memory triangle mesh into a
//! `.vdf` file and to verify one:
//! - `vdf-export` (asset pipeline) builds documents from loaded meshes
//! - tests and the `inspect` command parse them back
//!
//! # Modules
//!
//! - [`formats`] - VDF1 header layout, header planner, section writer and reader
//! - [`mesh`] - The plain mesh arrays handed to the serializer
//! - [`error`] - Error taxonomy shared by writer and reader

pub mod error;
pub mod formats;
pub mod mesh;

pub use error::{ErrorKind, VdfError};
pub use formats::{
    BinarySerializable, COLOR_STRIDE, HEADER_SIZE, MAX_TRIANGLE_INDEX, NORMAL_STRIDE,
    POSITION_STRIDE, SectionLengths, SectionSpan, TRIANGLE_STRIDE, VDF_EXTENSION, VDF_MAGIC,
    VERTEX_FORMAT_F32X3, VdfDocument, VdfHeader,
};
pub use mesh::Mesh;

/// Result alias for fallible VDF operations
pub type Result<T> = std::result::Result<T, VdfError>;
