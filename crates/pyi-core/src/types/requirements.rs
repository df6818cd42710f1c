//! Names that inferred annotations rely on.
//!
//! When the extractor infers `Optional[Any]` for `x = None`, the stub only
//! type-checks if `Optional` and `Any` are importable from `typing`. These are
//! recorded here as fully qualified dotted names.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::names::DottedName;

/// A deterministic set of required imports such as `typing.Any`.
///
/// # Examples
///
/// ```
/// use pyi_core::RequiredImports;
///
/// let mut required = RequiredImports::new();
/// required.require("typing.Optional");
/// required.require("typing.Any");
/// required.require("typing.Any");
///
/// let grouped = required.by_module();
/// assert_eq!(grouped, vec![("typing", vec!["Any", "Optional"])]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequiredImports(BTreeSet<DottedName>);

impl RequiredImports {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a required import. Duplicates are ignored.
    pub fn require(&mut self, name: impl Into<DottedName>) {
        self.0.insert(name.into());
    }

    /// Returns `true` if `name` has been required.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|required| required.as_str() == name)
    }

    /// Iterates over the required names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &DottedName> {
        self.0.iter()
    }

    /// Returns the number of required names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is required.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Groups the required names by their parent module.
    ///
    /// Names without a dot are skipped, since they cannot be imported with
    /// `from ... import`. Modules and names are both sorted.
    #[must_use]
    pub fn by_module(&self) -> Vec<(&str, Vec<&str>)> {
        let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (module, name) in self.0.iter().filter_map(DottedName::split_last) {
            grouped.entry(module).or_default().push(name);
        }
        grouped.into_iter().collect()
    }
}
