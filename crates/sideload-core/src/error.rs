// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sideload plugin loader.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by plugin release hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across discovery, loading, and the registry.
#[derive(Debug, Error)]
pub enum SideloadError {
    /// Invalid classpath descriptors or loader setup (empty location set,
    /// missing location, resource path escaping its scope).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A plugin metadata resource exists but cannot be parsed.
    #[error("corrupt plugin metadata in {resource} (line {line}): {message}")]
    MetadataCorruption {
        resource: String,
        line: usize,
        message: String,
    },

    /// A services manifest names an implementation nothing can construct.
    #[error("no factory registered for implementation `{implementation}` in scope `{scope}`")]
    UnknownImplementation { implementation: String, scope: String },

    /// A location or resource could not be read.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A plugin's release hook failed. Only ever reported, never returned
    /// from `close()` or `reload()`.
    #[error("failed to release plugin `{implementation}`: {source}")]
    Release {
        implementation: String,
        source: BoxError,
    },
}

impl SideloadError {
    /// Returns true for errors raised while reading plugin artifacts.
    pub fn is_metadata(&self) -> bool {
        matches!(
            self,
            SideloadError::MetadataCorruption { .. } | SideloadError::UnknownImplementation { .. }
        )
    }
}
