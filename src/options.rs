//! Encode and decode settings

/// Largest header accepted by default (100 MB), same ceiling as safetensors
pub const DEFAULT_MAX_HEADER_LEN: u64 = 100_000_000;

/// Alignment of the data section when header padding is enabled
pub const HEADER_ALIGNMENT: usize = 8;

/// Settings for writing a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Pad the JSON header with trailing spaces so tensor data starts on an
    /// 8-byte boundary
    pub align_header: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { align_header: true }
    }
}

/// Settings for reading a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Headers longer than this are rejected before allocation
    pub max_header_len: u64,
    /// Reject gaps between tensors and bytes after the last tensor
    pub require_contiguous: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            require_contiguous: true,
        }
    }
}

impl DecodeOptions {
    /// Accept gaps and trailing bytes in the data section
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            require_contiguous: false,
            ..Self::default()
        }
    }
}
