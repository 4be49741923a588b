//! Error types for rendering, the page registry and configuration loading.
//!
//! Invalid input never produces an error here: empty keys, unknown locations
//! and unusable filter results fall back to a default or render nothing. The
//! errors below cover the remaining cases, which callers must see: a failing
//! hook, a rejected registry operation, an unreadable config file.

use std::path::PathBuf;

use thiserror::Error;

use crate::hooks::HookError;

/// Error type for page rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A filter or action listener failed. The render is aborted.
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Errors returned by the [`Pages`](crate::Pages) registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The page has no usable id or option key.
    #[error("page has an empty id or option key")]
    InvalidPage,

    /// The option-key lookup was given an unusable key.
    #[error("invalid option key: {0:?}")]
    InvalidKey(String),
}

/// Errors raised while loading page configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML/JSON or does not match the schema.
    #[error("failed to parse {}: {message}", path.as_ref().map_or("<inline>".to_string(), |p| p.display().to_string()))]
    Parse {
        /// Optional source file path.
        path: Option<PathBuf>,
        /// Error message from the parser.
        message: String,
    },

    /// The file extension is not one of `.yaml`, `.yml`, `.json`.
    #[error("unsupported config format: {}", .0.display())]
    UnknownFormat(PathBuf),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
