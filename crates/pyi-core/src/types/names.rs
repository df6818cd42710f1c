//! Opaque textual content wrappers.
//!
//! Type expressions are deliberately kept as plain text. They carry enough
//! to be re-emitted faithfully, not enough for semantic analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An identifier which might contain dots.
///
/// # Examples
///
/// ```
/// use pyi_core::DottedName;
///
/// let name = DottedName::new("os.path");
/// assert_eq!(name.as_str(), "os.path");
/// assert_eq!(name.split_last(), Some(("os", "path")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DottedName(String);

impl DottedName {
    /// Creates a dotted name from its text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Splits off the last segment, returning `(parent, last)`.
    ///
    /// Returns `None` for names without a dot.
    #[must_use]
    pub fn split_last(&self) -> Option<(&str, &str)> {
        self.0.rsplit_once('.')
    }
}

impl fmt::Display for DottedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DottedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A type annotation, kept as its source text.
///
/// # Examples
///
/// ```
/// use pyi_core::Annotation;
///
/// let annotation = Annotation::new("Dict[str, int]");
/// assert_eq!(annotation.to_string(), "Dict[str, int]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation(String);

impl Annotation {
    /// Creates an annotation from its text.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Returns the annotation text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the annotation, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Annotation {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<DottedName> for Annotation {
    fn from(name: DottedName) -> Self {
        Self(name.0)
    }
}

/// A base-class expression, kept as its source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Type(String);

impl Type {
    /// Creates a type from its text.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the type text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Type {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<DottedName> for Type {
    fn from(name: DottedName) -> Self {
        Self(name.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_name_split_last() {
        assert_eq!(
            DottedName::new("typing.Optional").split_last(),
            Some(("typing", "Optional"))
        );
        assert_eq!(DottedName::new("foo").split_last(), None);
    }

    #[test]
    fn test_conversions_keep_text() {
        let name = DottedName::new("collections.abc.Mapping");
        assert_eq!(Annotation::from(name.clone()).as_str(), "collections.abc.Mapping");
        assert_eq!(Type::from(name).as_str(), "collections.abc.Mapping");
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&Annotation::new("List[int]")).unwrap();
        assert_eq!(json, r#""List[int]""#);
    }
}
