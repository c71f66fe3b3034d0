//! ADR-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, DrawerError>;

/// Top-level error type for the app drawer.
#[derive(Debug, Error)]
pub enum DrawerError {
    #[error("[ADR-1001] invalid configuration: {details}")]
    InvalidConfiguration { details: String },

    #[error("[ADR-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[ADR-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[ADR-2001] catalog parse failure in {path}: {details}")]
    CatalogParse { path: PathBuf, details: String },

    #[error("[ADR-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[ADR-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DrawerError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "ADR-1001",
            Self::MissingConfig { .. } => "ADR-1002",
            Self::ConfigParse { .. } => "ADR-1003",
            Self::CatalogParse { .. } => "ADR-2001",
            Self::Serialization { .. } => "ADR-2101",
            Self::Io { .. } => "ADR-3002",
        }
    }

    /// Whether the failure was caused by caller-supplied settings rather than the environment.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::CatalogParse { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for a rejected configuration value.
    #[must_use]
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            details: details.into(),
        }
    }
}

impl From<serde_json::Error> for DrawerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for DrawerError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
