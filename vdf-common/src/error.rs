//! Error types for VDF encoding and parsing

use std::io;

/// Broad classification of a [`VdfError`].
///
/// Callers that only care whether the input, the sink, or the file is at fault
/// can match on this instead of individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The mesh cannot be represented (index overflow, length mismatch, size limits)
    Precondition,
    /// The sink or source could not be read, written or seeked
    Io,
    /// A VertexFormat value this crate does not understand
    UnsupportedFormat,
    /// Bytes that do not form a valid VDF1 document
    Malformed,
}

/// Error type for VDF encoding and parsing.
#[derive(Debug, thiserror::Error)]
pub enum VdfError {
    /// A triangle references a vertex the 16-bit index section cannot address
    #[error("triangle {triangle} references vertex {index}, exceeds u16 index limit {max}")]
    IndexOverflow { triangle: usize, index: u32, max: u32 },

    /// A triangle references a vertex past the end of the vertex arrays
    #[error("triangle {triangle} references vertex {index} but mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A per-vertex attribute array does not match the position count
    #[error("{attribute} has {actual} entries, expected {expected}")]
    AttributeLengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A count or offset does not fit the format's u32 fields
    #[error("{what} ({value}) does not fit in a u32 header field")]
    TooLarge { what: &'static str, value: u64 },

    /// Underlying read/write/seek failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Reserved for future encodings (compressed, quantized)
    #[error("unsupported vertex format {0}")]
    UnsupportedVertexFormat(u32),

    #[error("bad magic {0:?}, expected \"VDF1\"")]
    BadMagic([u8; 4]),

    #[error("file is {0} bytes, shorter than the 32-byte header")]
    TruncatedHeader(usize),

    /// A non-empty section starts inside the 32-byte header
    #[error("{section} section at offset {offset} starts inside the header")]
    SectionInsideHeader { section: &'static str, offset: u32 },

    /// Two non-empty sections share bytes
    #[error("{first} and {second} sections overlap")]
    SectionOverlap {
        first: &'static str,
        second: &'static str,
    },

    /// A section extends past the end of the file
    #[error("{section} section at offset {offset} needs {len} bytes but file is {file_len} bytes")]
    SectionOutOfBounds {
        section: &'static str,
        offset: u32,
        len: u64,
        file_len: usize,
    },
}

impl VdfError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IndexOverflow { .. }
            | Self::IndexOutOfRange { .. }
            | Self::AttributeLengthMismatch { .. }
            | Self::TooLarge { .. } => ErrorKind::Precondition,
            Self::Io(_) => ErrorKind::Io,
            Self::UnsupportedVertexFormat(_) => ErrorKind::UnsupportedFormat,
            Self::BadMagic(_)
            | Self::TruncatedHeader(_)
            | Self::SectionInsideHeader { .. }
            | Self::SectionOverlap { .. }
            | Self::SectionOutOfBounds { .. } => ErrorKind::Malformed,
        }
    }

    /// True for errors raised before any byte reaches the sink.
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }
}
