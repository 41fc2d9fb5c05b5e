//! # Fixture Tensors
//!
//! Golden test fixtures for numerical tensor operators, stored in a portable
//! binary container.
//!
//! A fixture holds the inputs, outputs and parameters captured from an oracle
//! run (rotary embeddings, 2D convolutions, residual blocks, up/down-sampling,
//! initializers) plus string metadata describing the configuration used. The
//! container is the safetensors layout, so files written by Python producers
//! decode here and files written here load in Python.
//!
//! ## Example
//!
//! ```rust
//! use fixture_tensors::{DType, FixtureContainer};
//!
//! let mut fixture = FixtureContainer::new();
//! fixture.add_f32("simple.input", &[1, 2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
//! fixture.add_metadata("simple.padding", "(0,0)").unwrap();
//!
//! let bytes = fixture.to_bytes().unwrap();
//! let decoded = FixtureContainer::from_bytes(&bytes).unwrap();
//!
//! let input = decoded.get_tensor("simple.input").unwrap();
//! assert_eq!(input.dtype(), DType::F32);
//! assert_eq!(input.shape(), &[1, 2, 2]);
//! assert_eq!(input.to_f32_vec().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(decoded.get_metadata("simple.padding"), Some("(0,0)"));
//! ```
//!
//! ## Layout
//!
//! ```text
//! [u64 LE header length][JSON header][tensor bytes, concatenated]
//! ```
//!
//! See [`container::header`] for the full byte contract.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Clippy allows (MUST come after deny/warn to override them)
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)] // offsets are bounded by buffer lengths
#![allow(clippy::cast_possible_wrap)] // i8 reinterpretation of raw bytes
#![allow(clippy::must_use_candidate)] // Not all methods need #[must_use]
#![allow(clippy::doc_markdown)] // Allow technical terms without backticks

pub mod container;
pub mod dtype;
pub mod error;
pub mod mapped;
pub mod metadata;
pub mod namespace;
pub mod options;
pub mod tensor;

pub use container::header::METADATA_KEY;
pub use container::FixtureContainer;
pub use dtype::DType;
pub use error::{FixtureError, Result};
pub use mapped::MappedFixture;
pub use namespace::CaseScope;
pub use options::{DecodeOptions, EncodeOptions};
pub use tensor::TensorView;
