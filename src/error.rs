//! Error types for fixture container operations

use thiserror::Error;

use crate::dtype::DType;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FixtureError>;

/// Error type for building, encoding and decoding fixture containers
///
/// Registration and encode errors are caller logic errors. Every decode error
/// means the byte stream is corrupt or not a fixture container and must be
/// discarded as a whole.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A tensor with this name is already registered
    #[error("Duplicate tensor name '{0}'")]
    DuplicateName(String),

    /// A metadata entry with this key is already registered
    #[error("Duplicate metadata key '{0}'")]
    DuplicateKey(String),

    /// Encode was called on a container with no tensors
    #[error("Cannot encode a container with zero tensors")]
    EmptyContainer,

    /// Tensor name collides with the reserved metadata key
    #[error("Invalid tensor name '{0}': reserved for metadata")]
    InvalidName(String),

    /// Fewer than 8 bytes available for the header length prefix
    #[error("Truncated container: {available} bytes, need 8 for header length")]
    Truncated {
        /// Bytes actually available
        available: usize,
    },

    /// Header is missing, too long, or not the expected JSON object
    #[error("Malformed header: {reason}")]
    MalformedHeader {
        /// What was wrong with the header
        reason: String,
    },

    /// Tensor dtype string is not a recognized value
    #[error("Unknown dtype '{dtype}' for tensor '{name}'")]
    UnknownDType {
        /// Tensor name
        name: String,
        /// Dtype string found in the header
        dtype: String,
    },

    /// Shape contains a negative or non-integer entry, or overflows
    #[error("Invalid shape for tensor '{name}': {reason}")]
    InvalidShape {
        /// Tensor name
        name: String,
        /// Why the shape was rejected
        reason: String,
    },

    /// Byte length does not match dtype and shape
    #[error("Size mismatch for tensor '{name}': expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Tensor name
        name: String,
        /// numel(shape) * dtype width
        expected: u64,
        /// Bytes supplied or described by the offsets
        actual: u64,
    },

    /// Offsets overlap another tensor or fall outside the data section
    #[error("Tensor '{name}' offsets [{start}, {end}) invalid for {data_len}-byte data: {reason}")]
    OffsetOutOfRange {
        /// Tensor name
        name: String,
        /// Start offset from the header
        start: u64,
        /// End offset from the header
        end: u64,
        /// Length of the data section
        data_len: usize,
        /// Which check failed
        reason: String,
    },

    /// Tensor cannot be read as the requested element type
    #[error("Tensor '{name}' has dtype {actual}, cannot read as {requested}")]
    DTypeMismatch {
        /// Tensor name
        name: String,
        /// Stored dtype
        actual: DType,
        /// Requested element type
        requested: &'static str,
    },

    /// Metadata value could not be interpreted as the requested type
    #[error("Cannot parse metadata value '{value}' as {expected}")]
    MetadataParse {
        /// Raw metadata string
        value: String,
        /// Requested interpretation
        expected: &'static str,
    },

    /// Underlying byte stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixtureError {
    /// Whether this is one of the corrupt-container kinds reported by decode
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::MalformedHeader { .. }
                | Self::UnknownDType { .. }
                | Self::InvalidShape { .. }
                | Self::SizeMismatch { .. }
                | Self::OffsetOutOfRange { .. }
        )
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
        }
    }
}
