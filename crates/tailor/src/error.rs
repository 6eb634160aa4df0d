//! Error types for stylesheet compilation.
//!
//! Errors fall into two families, both wrapped by [`CompileError`]:
//!
//! - [`ConfigurationError`]: unknown variant names, malformed theme paths,
//!   circular computed values, settings of the wrong type
//! - [`NormalizationError`]: style objects the normalizer cannot interpret
//!
//! Any error aborts the compilation pass. [`CompileError::Plugin`] carries the
//! name of the plugin whose registration caused it.

use thiserror::Error;

/// Errors in the configuration or in how it is used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A rule requested a variant that is not registered.
    #[error("unknown variant '{name}'")]
    UnknownVariant { name: String },

    /// A configuration path could not be parsed.
    #[error("malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// A computed value depends on itself.
    #[error("circular reference while resolving '{path}'")]
    CircularReference { path: String },

    /// A configuration value has the wrong shape.
    #[error("invalid value at '{path}': expected {expected}")]
    InvalidValue { path: String, expected: &'static str },
}

/// Errors raised while turning style objects into rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    /// A nested block has neither declarations nor further nesting.
    #[error("empty block at '{selector}'")]
    EmptyBlock { selector: String },

    /// A declaration appears where there is no selector or at-rule to hold it.
    #[error("declaration '{property}' is not inside a rule")]
    DeclarationOutsideRule { property: String },

    /// The top-level value is neither an object nor an array of objects.
    #[error("style root must be an object or an array, got {found}")]
    InvalidRoot { found: &'static str },
}

/// Error type for a compilation pass.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Configuration problem.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Style object problem.
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    /// Configuration text could not be parsed.
    #[error("failed to parse {format} configuration: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// An error raised by (or on behalf of) a plugin.
    #[error("plugin '{plugin}': {source}")]
    Plugin {
        plugin: String,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Attributes this error to `plugin`.
    ///
    /// Errors already attributed to a plugin are returned unchanged, so the
    /// innermost attribution wins.
    pub fn in_plugin(self, plugin: &str) -> Self {
        match self {
            CompileError::Plugin { .. } => self,
            other => CompileError::Plugin {
                plugin: plugin.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the underlying error with plugin attribution stripped.
    pub fn root(&self) -> &CompileError {
        match self {
            CompileError::Plugin { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the attributed plugin name, if any.
    pub fn plugin(&self) -> Option<&str> {
        match self {
            CompileError::Plugin { plugin, .. } => Some(plugin),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(err: serde_json::Error) -> Self {
        CompileError::Parse {
            format: "JSON",
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CompileError {
    fn from(err: serde_yaml::Error) -> Self {
        CompileError::Parse {
            format: "YAML",
            message: err.to_string(),
        }
    }
}

/// Result type for compilation operations.
pub type Result<T> = std::result::Result<T, CompileError>;
