//! Fixture container
//!
//! An ordered set of named tensors plus string metadata, encoded in the
//! safetensors layout (see [`header`] for the byte format).
//!
//! Producers build a container with [`FixtureContainer::add_tensor`] and
//! [`FixtureContainer::add_metadata`] and encode it once. Consumers decode a
//! container in one call and read it through [`TensorView`]s.

pub mod header;

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::dtype::{byte_len, DType};
use crate::error::{FixtureError, Result};
use crate::namespace::CaseScope;
use crate::options::{DecodeOptions, EncodeOptions};
use crate::tensor::{bool_to_bytes, f32_to_le_bytes, i64_to_le_bytes, TensorEntry, TensorView};

/// In-memory fixture container
///
/// # Examples
///
/// ```
/// use fixture_tensors::FixtureContainer;
///
/// let mut fixture = FixtureContainer::new();
/// fixture.add_f32("simple.input", &[1, 2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// fixture.add_metadata("simple.padding", "(0, 0)").unwrap();
///
/// let bytes = fixture.to_bytes().unwrap();
/// let decoded = FixtureContainer::from_bytes(&bytes).unwrap();
/// assert_eq!(decoded, fixture);
/// assert_eq!(decoded.get_metadata("simple.padding"), Some("(0, 0)"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureContainer {
    /// Tensors in insertion (and data-section) order
    tensors: Vec<TensorEntry>,
    /// Tensor name -> position in `tensors`
    index: HashMap<String, usize>,
    metadata: BTreeMap<String, String>,
}

impl FixtureContainer {
    /// Create an empty container
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Register a tensor from raw little-endian bytes
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if `name` is already registered
    /// - `InvalidShape` if the shape's byte length overflows
    /// - `SizeMismatch` if `data.len()` is not `numel(shape) * dtype width`
    pub fn add_tensor(
        &mut self,
        name: impl Into<String>,
        dtype: DType,
        shape: &[usize],
        data: impl Into<Vec<u8>>,
    ) -> Result<()> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(FixtureError::DuplicateName(name));
        }
        let data = data.into();
        let expected = byte_len(dtype, shape).ok_or_else(|| FixtureError::InvalidShape {
            name: name.clone(),
            reason: format!("byte length of shape {shape:?} overflows"),
        })?;
        if data.len() != expected {
            return Err(FixtureError::SizeMismatch {
                name,
                expected: expected as u64,
                actual: data.len() as u64,
            });
        }

        self.index.insert(name.clone(), self.tensors.len());
        self.tensors.push(TensorEntry {
            name,
            dtype,
            shape: shape.to_vec(),
            data,
        });
        Ok(())
    }

    /// Register an F32 tensor
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_tensor`].
    pub fn add_f32(
        &mut self,
        name: impl Into<String>,
        shape: &[usize],
        values: &[f32],
    ) -> Result<()> {
        self.add_tensor(name, DType::F32, shape, f32_to_le_bytes(values))
    }

    /// Register an I64 tensor
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_tensor`].
    pub fn add_i64(
        &mut self,
        name: impl Into<String>,
        shape: &[usize],
        values: &[i64],
    ) -> Result<()> {
        self.add_tensor(name, DType::I64, shape, i64_to_le_bytes(values))
    }

    /// Register a BOOL tensor
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_tensor`].
    pub fn add_bool(
        &mut self,
        name: impl Into<String>,
        shape: &[usize],
        values: &[bool],
    ) -> Result<()> {
        self.add_tensor(name, DType::Bool, shape, bool_to_bytes(values))
    }

    /// Register a metadata entry
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if `key` is already present.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.metadata.contains_key(&key) {
            return Err(FixtureError::DuplicateKey(key));
        }
        self.metadata.insert(key, value.into());
        Ok(())
    }

    /// Register tensors and metadata under `"<prefix>."`
    pub fn scope(&mut self, prefix: &str) -> CaseScope<'_> {
        CaseScope::new(self, prefix)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Get a tensor by name
    #[must_use]
    pub fn get_tensor(&self, name: &str) -> Option<TensorView<'_>> {
        self.index.get(name).map(|&i| self.tensors[i].view())
    }

    /// Get a metadata value by key
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Tensor names in container order
    #[must_use]
    pub fn tensor_names(&self) -> Vec<&str> {
        self.tensors.iter().map(|t| t.name.as_str()).collect()
    }

    /// All tensors in container order
    pub fn tensors(&self) -> impl Iterator<Item = TensorView<'_>> {
        self.tensors.iter().map(TensorEntry::view)
    }

    /// Metadata entries in key order
    pub fn metadata(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if a tensor with this name is registered
    #[must_use]
    pub fn has_tensor(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of tensors
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// True when no tensors are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Number of metadata entries
    #[must_use]
    pub fn metadata_len(&self) -> usize {
        self.metadata.len()
    }

    /// Size in bytes of the encoded data section
    #[must_use]
    pub fn data_section_len(&self) -> usize {
        self.tensors.iter().map(|t| t.data.len()).sum()
    }

    // ------------------------------------------------------------------------
    // Encode
    // ------------------------------------------------------------------------

    /// Encode into a writer with the given options
    ///
    /// # Errors
    ///
    /// - `EmptyContainer` if no tensors are registered
    /// - `InvalidName` if a tensor uses the reserved metadata key
    /// - `Io` if the writer fails
    pub fn encode_with<W: Write>(&self, mut writer: W, options: &EncodeOptions) -> Result<()> {
        let header = header::encode_header(&self.tensors, &self.metadata, options)?;
        writer.write_all(&header)?;
        for tensor in &self.tensors {
            writer.write_all(&tensor.data)?;
        }
        writer.flush()?;
        debug!(
            tensors = self.tensors.len(),
            metadata = self.metadata.len(),
            header_len = header.len() - header::LEN_PREFIX,
            data_len = self.data_section_len(),
            "Encoded fixture container"
        );
        Ok(())
    }

    /// Encode into a writer with default options
    ///
    /// # Errors
    ///
    /// See [`Self::encode_with`].
    pub fn encode_to_writer<W: Write>(&self, writer: W) -> Result<()> {
        self.encode_with(writer, &EncodeOptions::default())
    }

    /// Encode into a byte vector
    ///
    /// # Errors
    ///
    /// See [`Self::encode_with`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&EncodeOptions::default())
    }

    /// Encode into a byte vector with the given options
    ///
    /// # Errors
    ///
    /// See [`Self::encode_with`].
    pub fn to_bytes_with(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.data_section_len() + 256);
        self.encode_with(&mut out, options)?;
        Ok(out)
    }

    /// Encode to a file with default options
    ///
    /// # Errors
    ///
    /// See [`Self::encode_to_file_with`].
    pub fn encode_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.encode_to_file_with(path, &EncodeOptions::default())
    }

    /// Encode to a file, replacing it atomically
    ///
    /// The container is written to a temporary file in the destination
    /// directory and renamed over `path` only once fully written and synced.
    /// On any failure the temporary file is removed and `path` is untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Self::encode_with`], plus `Io` for temporary file creation,
    /// sync or rename.
    pub fn encode_to_file_with<P: AsRef<Path>>(
        &self,
        path: P,
        options: &EncodeOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        // Fail before touching the filesystem
        let header = header::encode_header(&self.tensors, &self.metadata, options)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            writer.write_all(&header)?;
            for tensor in &self.tensors {
                writer.write_all(&tensor.data)?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| FixtureError::Io(e.error))?;

        info!(
            path = %path.display(),
            tensors = self.tensors.len(),
            bytes = header.len() + self.data_section_len(),
            "Wrote fixture container"
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Decode
    // ------------------------------------------------------------------------

    /// Decode a complete container from bytes
    ///
    /// # Errors
    ///
    /// - `Truncated` if fewer than 8 bytes are given
    /// - `MalformedHeader` if the header is missing or not valid JSON of the
    ///   expected form
    /// - `UnknownDType`, `InvalidShape`, `SizeMismatch`, `OffsetOutOfRange`
    ///   for the first tensor entry that fails validation
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &DecodeOptions::default())
    }

    /// Decode from bytes with the given options
    ///
    /// # Errors
    ///
    /// See [`Self::from_bytes`].
    pub fn from_bytes_with(bytes: &[u8], options: &DecodeOptions) -> Result<Self> {
        let parsed = header::parse_header(bytes, options)?;
        let data = &bytes[parsed.data_start..];

        let mut index = HashMap::with_capacity(parsed.tensors.len());
        let mut tensors = Vec::with_capacity(parsed.tensors.len());
        for layout in parsed.tensors {
            index.insert(layout.name.clone(), tensors.len());
            tensors.push(TensorEntry {
                data: data[layout.start..layout.end].to_vec(),
                name: layout.name,
                dtype: layout.dtype,
                shape: layout.shape,
            });
        }
        debug!(
            tensors = tensors.len(),
            metadata = parsed.metadata.len(),
            data_len = data.len(),
            "Decoded fixture container"
        );

        Ok(Self {
            tensors,
            index,
            metadata: parsed.metadata,
        })
    }

    /// Read a reader to its end and decode
    ///
    /// # Errors
    ///
    /// `Io` if reading fails, otherwise see [`Self::from_bytes`].
    pub fn decode_from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a container file
    ///
    /// # Errors
    ///
    /// See [`Self::decode_from_file_with`].
    pub fn decode_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::decode_from_file_with(path, &DecodeOptions::default())
    }

    /// Decode a container file with the given options
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened or read, otherwise see
    /// [`Self::from_bytes`].
    pub fn decode_from_file_with<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read fixture container");
        Self::from_bytes_with(&bytes, options)
    }
}

#[cfg(test)]
mod tests;
