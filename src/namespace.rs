//! Dotted-name registration helper
//!
//! Fixture files group tensors per test case with names such as
//! `"simple.input"`, `"simple.output"` and `"simple.conv.weight"`. The
//! grouping is only a naming convention: a [`CaseScope`] prefixes names and
//! forwards to the container, and the file format never sees the hierarchy.

use crate::container::FixtureContainer;
use crate::dtype::DType;
use crate::error::Result;

/// Registers tensors and metadata under a fixed `"<prefix>."` namespace
///
/// # Examples
///
/// ```
/// use fixture_tensors::FixtureContainer;
///
/// let mut fixture = FixtureContainer::new();
/// let mut case = fixture.scope("simple");
/// case.add_f32("input", &[1, 1], &[1.0]).unwrap();
/// case.add_metadata("stride", "(1, 1)").unwrap();
/// case.scope("conv").add_f32("bias", &[1], &[0.5]).unwrap();
///
/// assert_eq!(fixture.tensor_names(), vec!["simple.input", "simple.conv.bias"]);
/// assert_eq!(fixture.get_metadata("simple.stride"), Some("(1, 1)"));
/// ```
#[derive(Debug)]
pub struct CaseScope<'a> {
    container: &'a mut FixtureContainer,
    prefix: String,
}

impl<'a> CaseScope<'a> {
    pub(crate) fn new(container: &'a mut FixtureContainer, prefix: &str) -> Self {
        Self {
            container,
            prefix: prefix.to_string(),
        }
    }

    /// Fully qualified name for `name` in this scope
    #[must_use]
    pub fn key(&self, name: &str) -> String {
        format!("{}.{name}", self.prefix)
    }

    /// Prefix of this scope
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Nested scope, e.g. `"simple"` then `"conv"` gives `"simple.conv."`
    pub fn scope(&mut self, name: &str) -> CaseScope<'_> {
        let prefix = self.key(name);
        CaseScope {
            container: &mut *self.container,
            prefix,
        }
    }

    /// See [`FixtureContainer::add_tensor`]
    ///
    /// # Errors
    ///
    /// Same as [`FixtureContainer::add_tensor`] for the qualified name.
    pub fn add_tensor(
        &mut self,
        name: &str,
        dtype: DType,
        shape: &[usize],
        data: impl Into<Vec<u8>>,
    ) -> Result<()> {
        let key = self.key(name);
        self.container.add_tensor(key, dtype, shape, data)
    }

    /// See [`FixtureContainer::add_f32`]
    ///
    /// # Errors
    ///
    /// Same as [`FixtureContainer::add_tensor`] for the qualified name.
    pub fn add_f32(&mut self, name: &str, shape: &[usize], values: &[f32]) -> Result<()> {
        let key = self.key(name);
        self.container.add_f32(key, shape, values)
    }

    /// See [`FixtureContainer::add_i64`]
    ///
    /// # Errors
    ///
    /// Same as [`FixtureContainer::add_tensor`] for the qualified name.
    pub fn add_i64(&mut self, name: &str, shape: &[usize], values: &[i64]) -> Result<()> {
        let key = self.key(name);
        self.container.add_i64(key, shape, values)
    }

    /// See [`FixtureContainer::add_bool`]
    ///
    /// # Errors
    ///
    /// Same as [`FixtureContainer::add_tensor`] for the qualified name.
    pub fn add_bool(&mut self, name: &str, shape: &[usize], values: &[bool]) -> Result<()> {
        let key = self.key(name);
        self.container.add_bool(key, shape, values)
    }

    /// See [`FixtureContainer::add_metadata`]
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if the qualified key is already present.
    pub fn add_metadata(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let key = self.key(key);
        self.container.add_metadata(key, value)
    }
}
