//! Header codec
//!
//! ```text
//! CONTAINER := HEADER_LEN HEADER DATA
//!
//! HEADER_LEN := u64 (little-endian)
//!
//! HEADER := JSON {
//!   "__metadata__": { "key": "value", ... },      (optional)
//!   "tensor_name": {
//!     "dtype": "F32" | "F16" | "I64" | "BOOL" | ...,
//!     "shape": [dim1, dim2, ...],
//!     "data_offsets": [start, end]
//!   },
//!   ...
//! }
//!
//! DATA := tensor bytes, concatenated in header order, no padding
//! ```
//!
//! Offsets are relative to the first byte after the header.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dtype::{numel, DType};
use crate::error::{FixtureError, Result};
use crate::options::{DecodeOptions, EncodeOptions, HEADER_ALIGNMENT};
use crate::tensor::TensorEntry;

/// Header key holding the string metadata map
pub const METADATA_KEY: &str = "__metadata__";

/// Size of the little-endian header length prefix
pub const LEN_PREFIX: usize = 8;

// ============================================================================
// Encode
// ============================================================================

/// Per-tensor header record as written
#[derive(Serialize)]
struct TensorRecord<'a> {
    dtype: DType,
    shape: &'a [usize],
    data_offsets: [usize; 2],
}

/// Header view serialized in tensor insertion order
struct HeaderRef<'a> {
    tensors: &'a [TensorEntry],
    offsets: &'a [[usize; 2]],
    metadata: &'a BTreeMap<String, String>,
}

impl Serialize for HeaderRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let has_metadata = !self.metadata.is_empty();
        let len = self.tensors.len() + usize::from(has_metadata);
        let mut map = serializer.serialize_map(Some(len))?;
        if has_metadata {
            map.serialize_entry(METADATA_KEY, self.metadata)?;
        }
        for (tensor, offsets) in self.tensors.iter().zip(self.offsets) {
            map.serialize_entry(
                &tensor.name,
                &TensorRecord {
                    dtype: tensor.dtype,
                    shape: &tensor.shape,
                    data_offsets: *offsets,
                },
            )?;
        }
        map.end()
    }
}

/// Assign `[start, end)` data offsets in insertion order
pub(crate) fn assign_offsets(tensors: &[TensorEntry]) -> Vec<[usize; 2]> {
    let mut offset = 0usize;
    tensors
        .iter()
        .map(|t| {
            let start = offset;
            offset += t.data.len();
            [start, offset]
        })
        .collect()
}

/// Build the length prefix and header block for `tensors`
///
/// The returned bytes are followed directly by the tensor data in the same
/// order to form a complete container.
pub(crate) fn encode_header(
    tensors: &[TensorEntry],
    metadata: &BTreeMap<String, String>,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    if tensors.is_empty() {
        return Err(FixtureError::EmptyContainer);
    }
    if let Some(t) = tensors.iter().find(|t| t.name == METADATA_KEY) {
        return Err(FixtureError::InvalidName(t.name.clone()));
    }

    let offsets = assign_offsets(tensors);
    let header = HeaderRef {
        tensors,
        offsets: &offsets,
        metadata,
    };
    let mut json = serde_json::to_vec(&header).map_err(|e| FixtureError::malformed(e.to_string()))?;

    if options.align_header {
        let rem = json.len() % HEADER_ALIGNMENT;
        if rem != 0 {
            json.resize(json.len() + HEADER_ALIGNMENT - rem, b' ');
        }
    }

    let mut out = Vec::with_capacity(LEN_PREFIX + json.len());
    out.extend_from_slice(&(json.len() as u64).to_le_bytes());
    out.extend_from_slice(&json);
    Ok(out)
}

// ============================================================================
// Decode
// ============================================================================

/// Validated placement of one tensor in the data section
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TensorLayout {
    pub(crate) name: String,
    pub(crate) dtype: DType,
    pub(crate) shape: Vec<usize>,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Fully validated header
#[derive(Debug, Clone)]
pub(crate) struct ParsedHeader {
    /// Tensors in data-section order
    pub(crate) tensors: Vec<TensorLayout>,
    pub(crate) metadata: BTreeMap<String, String>,
    /// Absolute offset of the data section
    pub(crate) data_start: usize,
}

/// JSON object kept in document order, with duplicate keys rejected
struct OrderedObject<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedObject<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ObjectVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for ObjectVisitor<V> {
            type Value = OrderedObject<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(key) = access.next_key::<String>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    let value = access.next_value::<V>()?;
                    entries.push((key, value));
                }
                Ok(OrderedObject(entries))
            }
        }

        deserializer.deserialize_map(ObjectVisitor(PhantomData))
    }
}

/// Top-level header entry
enum HeaderEntry {
    /// Value under the metadata key, parsed as a string map
    Metadata(OrderedObject<String>),
    /// Any other key, validated later by `parse_tensor`
    Tensor(serde_json::Value),
}

/// Top-level header object in document order
struct HeaderObject(Vec<(String, HeaderEntry)>);

impl<'de> Deserialize<'de> for HeaderObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HeaderVisitor;

        impl<'de> Visitor<'de> for HeaderVisitor {
            type Value = HeaderObject;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(key) = access.next_key::<String>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    let entry = if key == METADATA_KEY {
                        let metadata = access.next_value::<OrderedObject<String>>().map_err(|e| {
                            de::Error::custom(format!("invalid '{METADATA_KEY}': {e}"))
                        })?;
                        HeaderEntry::Metadata(metadata)
                    } else {
                        HeaderEntry::Tensor(access.next_value()?)
                    };
                    entries.push((key, entry));
                }
                Ok(HeaderObject(entries))
            }
        }

        deserializer.deserialize_map(HeaderVisitor)
    }
}

/// Parse and validate the header of a complete container byte stream
///
/// Fails fast on the first violation; nothing is returned for a container
/// that is not valid as a whole.
pub(crate) fn parse_header(bytes: &[u8], options: &DecodeOptions) -> Result<ParsedHeader> {
    parse_header_inner(bytes, options).map_err(|e| {
        warn!(error = %e, len = bytes.len(), "Rejecting fixture container");
        e
    })
}

fn parse_header_inner(bytes: &[u8], options: &DecodeOptions) -> Result<ParsedHeader> {
    if bytes.len() < LEN_PREFIX {
        return Err(FixtureError::Truncated {
            available: bytes.len(),
        });
    }
    let mut prefix = [0u8; LEN_PREFIX];
    prefix.copy_from_slice(&bytes[..LEN_PREFIX]);
    let header_len = u64::from_le_bytes(prefix);

    if header_len > options.max_header_len {
        return Err(FixtureError::malformed(format!(
            "header length {header_len} exceeds limit {}",
            options.max_header_len
        )));
    }
    let available = bytes.len() - LEN_PREFIX;
    let header_len = usize::try_from(header_len)
        .ok()
        .filter(|&len| len <= available)
        .ok_or_else(|| {
            FixtureError::malformed(format!(
                "header length {header_len} exceeds the {available} bytes available"
            ))
        })?;

    let data_start = LEN_PREFIX + header_len;
    let object: HeaderObject = serde_json::from_slice(&bytes[LEN_PREFIX..data_start])
        .map_err(|e| FixtureError::malformed(e.to_string()))?;
    let data_len = bytes.len() - data_start;

    let mut metadata = BTreeMap::new();
    let mut tensors = Vec::with_capacity(object.0.len());
    for (name, entry) in object.0 {
        match entry {
            HeaderEntry::Metadata(map) => metadata = map.0.into_iter().collect(),
            HeaderEntry::Tensor(value) => tensors.push(parse_tensor(name, &value, data_len)?),
        }
    }

    // Stable: tensors sharing a start offset (zero-sized ones) keep header order
    tensors.sort_by_key(|t| t.start);
    check_placement(&tensors, data_len, options.require_contiguous)?;

    Ok(ParsedHeader {
        tensors,
        metadata,
        data_start,
    })
}

fn parse_tensor(name: String, value: &serde_json::Value, data_len: usize) -> Result<TensorLayout> {
    let record = value
        .as_object()
        .ok_or_else(|| {
            FixtureError::malformed(format!("entry for tensor '{name}' is not an object"))
        })?;
    let field = |key: &str| {
        record
            .get(key)
            .ok_or_else(|| FixtureError::malformed(format!("tensor '{name}' is missing '{key}'")))
    };

    let dtype_str = field("dtype")?
        .as_str()
        .ok_or_else(|| {
            FixtureError::malformed(format!("dtype of tensor '{name}' is not a string"))
        })?;
    let dtype: DType = dtype_str.parse().map_err(|_| FixtureError::UnknownDType {
        name: name.clone(),
        dtype: dtype_str.to_string(),
    })?;

    let dims = field("shape")?
        .as_array()
        .ok_or_else(|| {
            FixtureError::malformed(format!("shape of tensor '{name}' is not an array"))
        })?;
    let mut shape = Vec::with_capacity(dims.len());
    for dim in dims {
        let size = dim
            .as_u64()
            .and_then(|d| usize::try_from(d).ok())
            .ok_or_else(|| FixtureError::InvalidShape {
                name: name.clone(),
                reason: format!("dimension {dim} is not a non-negative integer"),
            })?;
        shape.push(size);
    }

    let offsets = field("data_offsets")?
        .as_array()
        .filter(|o| o.len() == 2)
        .and_then(|o| Some([o[0].as_u64()?, o[1].as_u64()?]))
        .ok_or_else(|| {
            FixtureError::malformed(format!(
                "data_offsets of tensor '{name}' is not a pair of non-negative integers"
            ))
        })?;
    let [start, end] = offsets;
    let out_of_range = |reason: &str| FixtureError::OffsetOutOfRange {
        name: name.clone(),
        start,
        end,
        data_len,
        reason: reason.to_string(),
    };

    if end < start {
        return Err(out_of_range("end precedes start"));
    }
    let expected = numel(&shape)
        .and_then(|n| n.checked_mul(dtype.size_in_bytes()))
        .ok_or_else(|| FixtureError::InvalidShape {
            name: name.clone(),
            reason: format!("byte length of shape {shape:?} overflows"),
        })?;
    if end - start != expected as u64 {
        return Err(FixtureError::SizeMismatch {
            name: name.clone(),
            expected: expected as u64,
            actual: end - start,
        });
    }
    if end > data_len as u64 {
        return Err(out_of_range("extends past the data section"));
    }

    Ok(TensorLayout {
        name,
        dtype,
        shape,
        // end <= data_len, so both fit in usize
        start: start as usize,
        end: end as usize,
    })
}

/// Check sorted layouts for overlap and, optionally, gaps
fn check_placement(
    tensors: &[TensorLayout],
    data_len: usize,
    require_contiguous: bool,
) -> Result<()> {
    let mut cursor = 0usize;
    for t in tensors {
        let error = |reason: String| FixtureError::OffsetOutOfRange {
            name: t.name.clone(),
            start: t.start as u64,
            end: t.end as u64,
            data_len,
            reason,
        };
        if t.start < cursor {
            return Err(error(format!("overlaps data ending at {cursor}")));
        }
        if require_contiguous && t.start > cursor {
            return Err(error(format!("leaves a gap after offset {cursor}")));
        }
        cursor = cursor.max(t.end);
    }
    if require_contiguous && cursor != data_len {
        return Err(FixtureError::OffsetOutOfRange {
            name: tensors.last().map(|t| t.name.clone()).unwrap_or_default(),
            start: cursor as u64,
            end: data_len as u64,
            data_len,
            reason: format!("{} trailing bytes after the last tensor", data_len - cursor),
        });
    }
    Ok(())
}
