//! Binary serialization trait for format headers.
//!
//! Format headers implement `BinarySerializable` so generic code (inspection,
//! tests) can size and round-trip them without knowing the concrete type. Each
//! header keeps its type-specific `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// The trait uses `Vec<u8>` for the return type because associated const
/// generics in return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use vdf_common::formats::{BinarySerializable, SectionLengths, VdfHeader};
///
/// let header = VdfHeader::plan(8, 12, &SectionLengths::for_counts(8, 12, false)).unwrap();
///
/// // Using the trait (returns Vec<u8>)
/// let bytes = header.serialize();
/// let parsed = VdfHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, header);
///
/// // Using the type-specific method (returns [u8; 32])
/// let bytes_array = header.to_bytes();
/// assert_eq!(bytes_array.len(), 32);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::VdfHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes).filter(|header| header.check().is_ok())
    }
}
