//! Element types and shape arithmetic
//!
//! Wire names match the safetensors reference writer, so fixtures produced by
//! `safetensors.torch.save_file` decode without translation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Scalar element type of a stored tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DType {
    /// Boolean, one byte per element
    #[serde(rename = "BOOL")]
    Bool,
    /// 8-bit unsigned integer
    U8,
    /// 8-bit signed integer
    I8,
    /// 8-bit float, 5 exponent bits
    #[serde(rename = "F8_E5M2")]
    F8E5M2,
    /// 8-bit float, 4 exponent bits
    #[serde(rename = "F8_E4M3")]
    F8E4M3,
    /// 16-bit signed integer
    I16,
    /// 16-bit unsigned integer
    U16,
    /// 16-bit float
    F16,
    /// Brain float 16
    BF16,
    /// 32-bit signed integer
    I32,
    /// 32-bit unsigned integer
    U32,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// 64-bit signed integer
    I64,
    /// 64-bit unsigned integer
    U64,
}

impl DType {
    /// Every supported dtype
    pub const ALL: [DType; 15] = [
        DType::Bool,
        DType::U8,
        DType::I8,
        DType::F8E5M2,
        DType::F8E4M3,
        DType::I16,
        DType::U16,
        DType::F16,
        DType::BF16,
        DType::I32,
        DType::U32,
        DType::F32,
        DType::F64,
        DType::I64,
        DType::U64,
    ];

    /// Bytes per element
    #[must_use]
    pub fn size_in_bytes(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 | Self::F8E5M2 | Self::F8E4M3 => 1,
            Self::I16 | Self::U16 | Self::F16 | Self::BF16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 | Self::I64 | Self::U64 => 8,
        }
    }

    /// Header string for this dtype
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::U8 => "U8",
            Self::I8 => "I8",
            Self::F8E5M2 => "F8_E5M2",
            Self::F8E4M3 => "F8_E4M3",
            Self::I16 => "I16",
            Self::U16 => "U16",
            Self::F16 => "F16",
            Self::BF16 => "BF16",
            Self::I32 => "I32",
            Self::U32 => "U32",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::I64 => "I64",
            Self::U64 => "U64",
        }
    }

    /// Whether this is a floating point type
    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(
            self,
            Self::F8E5M2 | Self::F8E4M3 | Self::F16 | Self::BF16 | Self::F32 | Self::F64
        )
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a dtype string is not one of the wire names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDTypeName(pub String);

impl fmt::Display for UnknownDTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dtype '{}'", self.0)
    }
}

impl std::error::Error for UnknownDTypeName {}

impl FromStr for DType {
    type Err = UnknownDTypeName;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DType::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDTypeName(s.to_string()))
    }
}

/// Number of elements described by `shape`
///
/// An empty shape is a scalar with one element. Returns `None` on overflow.
#[must_use]
pub fn numel(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Byte length of a tensor with this dtype and shape, `None` on overflow
#[must_use]
pub fn byte_len(dtype: DType, shape: &[usize]) -> Option<usize> {
    numel(shape)?.checked_mul(dtype.size_in_bytes())
}
