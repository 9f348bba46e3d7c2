//! VDF1 binary format (.vdf)
//!
//! A fixed 32-byte header followed by raw little-endian sections. The header
//! carries absolute offsets, so readers can seek straight to any section.
//!
//! All format headers implement the [`BinarySerializable`] trait for consistent
//! serialization/deserialization.

mod document;
mod serialization;
pub mod vdf;

pub use document::VdfDocument;
pub use serialization::BinarySerializable;
pub use vdf::*;
