//! Generation options and the `.typegen.json` configuration file.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// How a custom scalar is represented in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalarMapping {
    /// The Rust type used for fields of this scalar.
    pub rust_type: String,
    /// A module path passed to `#[serde(with = "...")]` on fields of this scalar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<String>,
    #[serde(default)]
    pub codec: ScalarCodec,
}

impl ScalarMapping {
    pub fn new(rust_type: impl Into<String>) -> Self {
        Self {
            rust_type: rust_type.into(),
            with: None,
            codec: ScalarCodec::Raw,
        }
    }

    pub fn with(mut self, module: impl Into<String>) -> Self {
        self.with = Some(module.into());
        self
    }

    /// The generated `DateTime` wrapper around `chrono::DateTime<chrono::Utc>`.
    pub fn date_time() -> Self {
        Self {
            rust_type: "DateTime".to_string(),
            with: None,
            codec: ScalarCodec::DateTime,
        }
    }
}

/// How the runtime [`Codec`][crate::Codec] treats values of a scalar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarCodec {
    /// Pass the JSON value through.
    #[default]
    Raw,
    /// Parse and format as a date-time.
    DateTime,
}

/// Options for [`generate`][crate::generate].
///
/// ```rust
/// use apollo_typegen::{GenerateOptions, ScalarMapping};
///
/// let options = GenerateOptions::new()
///     .custom_header("// @generated")
///     .scalar("Url", ScalarMapping::new("String"))
///     .strict(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOptions {
    pub(crate) custom_header: Option<String>,
    pub(crate) scalars: IndexMap<String, ScalarMapping>,
    pub(crate) strict: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        let mut scalars = IndexMap::new();
        scalars.insert("DateTime".to_string(), ScalarMapping::date_time());
        Self {
            custom_header: None,
            scalars,
            strict: false,
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text emitted verbatim at the top of the generated source.
    pub fn custom_header(mut self, header: impl Into<String>) -> Self {
        self.custom_header = Some(header.into());
        self
    }

    /// Map a custom scalar to a Rust type, replacing any previous mapping.
    pub fn scalar(mut self, name: impl Into<String>, mapping: ScalarMapping) -> Self {
        self.scalars.insert(name.into(), mapping);
        self
    }

    /// Reject `null` and absent values in non-null positions, both in
    /// generated types and when decoding with a [`Codec`][crate::Codec].
    /// Otherwise generated types decode them as the default value of the
    /// field's type and the `Codec` passes them through as `Null`.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn scalar_mapping(&self, name: &str) -> Option<&ScalarMapping> {
        self.scalars.get(name)
    }

    pub(crate) fn scalar_codec(&self, name: &str) -> ScalarCodec {
        self.scalars
            .get(name)
            .map(|mapping| mapping.codec)
            .unwrap_or_default()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// The contents of a `.typegen.json` file.
///
/// Relative paths are relative to the file's directory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub schema: Option<PathBuf>,
    /// Glob patterns of query documents.
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub custom_header: Option<String>,
    #[serde(default)]
    pub scalars: IndexMap<String, ScalarMapping>,
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    pub const FILE_NAME: &'static str = ".typegen.json";

    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        log::debug!("loaded configuration from `{}`", path.display());
        Self::from_json(&source)
    }

    /// Generation options with this file's settings applied over the defaults.
    pub fn options(&self) -> GenerateOptions {
        let mut options = GenerateOptions::new().strict(self.strict);
        if let Some(header) = &self.custom_header {
            options = options.custom_header(header.clone());
        }
        for (name, mapping) in &self.scalars {
            options = options.scalar(name.clone(), mapping.clone());
        }
        options
    }
}
