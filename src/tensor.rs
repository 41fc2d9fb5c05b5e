//! Tensor storage and borrowed views
//!
//! A container owns one [`TensorEntry`] per registered tensor. Readers get a
//! [`TensorView`] that borrows the entry (or a memory-mapped file) and can
//! widen the raw little-endian bytes into typed vectors.

use crate::dtype::DType;
use crate::error::{FixtureError, Result};

/// Owned tensor record held by a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TensorEntry {
    pub(crate) name: String,
    pub(crate) dtype: DType,
    pub(crate) shape: Vec<usize>,
    pub(crate) data: Vec<u8>,
}

impl TensorEntry {
    pub(crate) fn view(&self) -> TensorView<'_> {
        TensorView {
            name: &self.name,
            dtype: self.dtype,
            shape: &self.shape,
            data: &self.data,
        }
    }
}

/// Borrowed, read-only view of one stored tensor
///
/// # Examples
///
/// ```
/// use fixture_tensors::{DType, FixtureContainer};
///
/// let mut fixture = FixtureContainer::new();
/// fixture.add_f32("simple.input", &[1, 2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
///
/// let view = fixture.get_tensor("simple.input").unwrap();
/// assert_eq!(view.dtype(), DType::F32);
/// assert_eq!(view.shape(), &[1, 2, 2]);
/// assert_eq!(view.to_f32_vec().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorView<'a> {
    name: &'a str,
    dtype: DType,
    shape: &'a [usize],
    data: &'a [u8],
}

impl<'a> TensorView<'a> {
    /// Build a view from parts already checked against each other
    pub(crate) fn new(name: &'a str, dtype: DType, shape: &'a [usize], data: &'a [u8]) -> Self {
        Self {
            name,
            dtype,
            shape,
            data,
        }
    }

    /// Tensor name
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Element type
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Dimensions, empty for a scalar
    #[must_use]
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Raw row-major little-endian bytes
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of elements
    #[must_use]
    pub fn numel(&self) -> usize {
        self.data.len() / self.dtype.size_in_bytes()
    }

    /// Read as `f32`, widening F16 and BF16
    ///
    /// # Errors
    ///
    /// Returns `DTypeMismatch` for non-float dtypes and for F64 and F8.
    pub fn to_f32_vec(&self) -> Result<Vec<f32>> {
        match self.dtype {
            DType::F32 => Ok(self
                .data
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()),
            DType::F16 => Ok(self
                .data
                .chunks_exact(2)
                .map(|c| half::f16::from_le_bytes([c[0], c[1]]).to_f32())
                .collect()),
            DType::BF16 => Ok(self
                .data
                .chunks_exact(2)
                .map(|c| half::bf16::from_le_bytes([c[0], c[1]]).to_f32())
                .collect()),
            _ => Err(self.mismatch("f32")),
        }
    }

    /// Read as `f64`, widening any 16 or 32-bit float
    ///
    /// # Errors
    ///
    /// Returns `DTypeMismatch` for non-float dtypes and for F8.
    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        match self.dtype {
            DType::F64 => Ok(self
                .data
                .chunks_exact(8)
                .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect()),
            DType::F32 | DType::F16 | DType::BF16 => Ok(self
                .to_f32_vec()?
                .into_iter()
                .map(f64::from)
                .collect()),
            _ => Err(self.mismatch("f64")),
        }
    }

    /// Read as `i64`, widening narrower integer types
    ///
    /// # Errors
    ///
    /// Returns `DTypeMismatch` for floats, BOOL and U64.
    pub fn to_i64_vec(&self) -> Result<Vec<i64>> {
        let data = self.data;
        let values = match self.dtype {
            DType::I64 => data
                .chunks_exact(8)
                .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
            DType::I32 => data
                .chunks_exact(4)
                .map(|c| i64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
            DType::U32 => data
                .chunks_exact(4)
                .map(|c| i64::from(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
                .collect(),
            DType::I16 => data
                .chunks_exact(2)
                .map(|c| i64::from(i16::from_le_bytes([c[0], c[1]])))
                .collect(),
            DType::U16 => data
                .chunks_exact(2)
                .map(|c| i64::from(u16::from_le_bytes([c[0], c[1]])))
                .collect(),
            DType::I8 => data.iter().map(|&b| i64::from(b as i8)).collect(),
            DType::U8 => data.iter().map(|&b| i64::from(b)).collect(),
            _ => return Err(self.mismatch("i64")),
        };
        Ok(values)
    }

    /// Read a BOOL tensor, any non-zero byte is `true`
    ///
    /// # Errors
    ///
    /// Returns `DTypeMismatch` unless the dtype is BOOL.
    pub fn to_bool_vec(&self) -> Result<Vec<bool>> {
        if self.dtype != DType::Bool {
            return Err(self.mismatch("bool"));
        }
        Ok(self.data.iter().map(|&b| b != 0).collect())
    }

    fn mismatch(&self, requested: &'static str) -> FixtureError {
        FixtureError::DTypeMismatch {
            name: self.name.to_string(),
            actual: self.dtype,
            requested,
        }
    }
}

/// Encode `f32` values as little-endian bytes
#[must_use]
pub fn f32_to_le_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encode `i64` values as little-endian bytes
#[must_use]
pub fn i64_to_le_bytes(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Encode booleans as one byte each
#[must_use]
pub fn bool_to_bytes(values: &[bool]) -> Vec<u8> {
    values.iter().map(|&b| u8::from(b)).collect()
}
