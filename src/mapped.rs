//! Zero-copy memory-mapped fixture reader
//!
//! [`FixtureContainer::decode_from_file`](crate::FixtureContainer::decode_from_file)
//! copies every tensor onto the heap. For large fixtures (full UNet or VAE
//! blocks) [`MappedFixture`] maps the file instead: only the header is parsed
//! on open, and tensor views borrow the mapping directly.
//!
//! Validation is identical to the in-memory decoder, so a file that opens
//! here would also decode there and vice versa.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::container::header::{parse_header, TensorLayout};
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::tensor::TensorView;

/// Memory-mapped, read-only fixture container
///
/// # Example
///
/// ```rust,ignore
/// let fixture = MappedFixture::open("test_data/nn2d/conv2d/conv2d_simple.safetensors")?;
/// let output = fixture.get_tensor("simple.output").unwrap();
/// // output.data() is a slice into the mapped file
/// ```
#[derive(Debug)]
pub struct MappedFixture {
    /// Memory-mapped file data
    mmap: memmap2::Mmap,
    /// File path (for diagnostics)
    path: PathBuf,
    /// Tensors in data-section order
    tensors: Vec<TensorLayout>,
    index: HashMap<String, usize>,
    metadata: BTreeMap<String, String>,
    /// Offset where tensor data begins
    data_start: usize,
}

impl MappedFixture {
    /// Map and validate a container file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be opened or mapped, otherwise the same
    /// decode errors as [`FixtureContainer::from_bytes`](crate::FixtureContainer::from_bytes).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &DecodeOptions::default())
    }

    /// Map and validate a container file with the given options
    ///
    /// # Errors
    ///
    /// See [`Self::open`].
    pub fn open_with<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;

        // SAFETY: File is opened read-only and we don't modify it
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };

        let parsed = parse_header(&mmap, options)?;
        let index = parsed
            .tensors
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();

        debug!(
            path = %path.display(),
            tensors = parsed.tensors.len(),
            bytes = mmap.len(),
            "Mapped fixture container"
        );

        Ok(Self {
            mmap,
            path,
            tensors: parsed.tensors,
            index,
            metadata: parsed.metadata,
            data_start: parsed.data_start,
        })
    }

    /// Get a tensor by name, borrowing the mapped bytes
    #[must_use]
    pub fn get_tensor(&self, name: &str) -> Option<TensorView<'_>> {
        self.index.get(name).map(|&i| self.view(&self.tensors[i]))
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
        self.tensors.iter().map(|t| self.view(t))
    }

    /// Metadata entries in key order
    pub fn metadata(&self) -> impl Iterator<Item = (&str, &str)> {
        self.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of tensors
    #[must_use]
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// True when the file holds no tensors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Get the file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the total file size in bytes
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.mmap.len()
    }

    fn view<'a>(&'a self, layout: &'a TensorLayout) -> TensorView<'a> {
        let bytes = &self.mmap[self.data_start + layout.start..self.data_start + layout.end];
        TensorView::new(&layout.name, layout.dtype, &layout.shape, bytes)
    }
}
