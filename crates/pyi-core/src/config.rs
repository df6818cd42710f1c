//! Configuration structures for pyi-stubs.
//!
//! - [`ExtractConfig`] - Extraction policy (type-checking guard names)
//! - [`GenerateConfig`] - Rendering options
//! - [`ScanConfig`] - Batch driver settings (overwrite policy, walking, parallelism)
//! - [`Config`] - Root configuration combining all settings
//!
//! Every structure is `#[serde(default)]`, so a configuration file only has
//! to name the options it changes:
//!
//! ```json
//! { "scan": { "overwrite": true } }
//! ```

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the extractor.
///
/// # Examples
///
/// ```
/// use pyi_core::ExtractConfig;
///
/// let config = ExtractConfig::default();
/// assert!(config.is_type_checking_name("TYPE_CHECKING"));
/// assert!(!config.is_type_checking_name("typing.TYPE_CHECKING"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Local names recognized as the type-checking guard in `if NAME:`.
    ///
    /// Matching is by bare name only. `import typing as t; if t.TYPE_CHECKING:`
    /// is not recognized.
    pub type_checking_names: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            type_checking_names: vec!["TYPE_CHECKING".to_owned()],
        }
    }
}

impl ExtractConfig {
    /// Returns `true` if `name` is one of the configured guard names.
    #[must_use]
    pub fn is_type_checking_name(&self, name: &str) -> bool {
        self.type_checking_names.iter().any(|known| known == name)
    }
}

/// Settings for the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Emit `from typing import ...` lines for names that inferred
    /// annotations rely on.
    pub emit_required_imports: bool,
}

/// Settings for the batch driver.
///
/// # Examples
///
/// ```
/// use pyi_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(!config.overwrite);
/// assert!(config.skip_dirs.iter().any(|d| d == "__pycache__"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Replace existing `.pyi` targets instead of skipping them.
    pub overwrite: bool,

    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,

    /// Follow symbolic links while walking directories.
    pub follow_links: bool,

    /// Maximum number of parallel conversion jobs.
    /// `None` means use all available CPU cores.
    pub max_parallel_jobs: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            overwrite: false,
            skip_dirs: vec![
                "__pycache__".to_owned(),
                ".git".to_owned(),
                ".venv".to_owned(),
                ".tox".to_owned(),
                "node_modules".to_owned(),
            ],
            follow_links: false,
            max_parallel_jobs: None,
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use pyi_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{ "generate": { "emit_required_imports": true } }"#)?;
/// assert!(config.generate.emit_required_imports);
/// assert_eq!(config.extract.type_checking_names, vec!["TYPE_CHECKING"]);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extractor configuration.
    pub extract: ExtractConfig,

    /// Generator configuration.
    pub generate: GenerateConfig,

    /// Batch driver configuration.
    pub scan: ScanConfig,
}

impl Config {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON for this structure, and
    /// [`ConfigError::InvalidOption`] if validation fails.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for a guard name that is not a
    /// Python identifier or a job count of zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self
            .extract
            .type_checking_names
            .iter()
            .find(|name| !is_identifier(name))
        {
            return Err(ConfigError::InvalidOption {
                option: "extract.type_checking_names".to_owned(),
                reason: format!("'{name}' is not an identifier"),
            });
        }

        if self.scan.max_parallel_jobs == Some(0) {
            return Err(ConfigError::InvalidOption {
                option: "scan.max_parallel_jobs".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}
