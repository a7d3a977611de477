// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin metadata resolution.
//!
//! Each implementation may ship `<services_dir>/<implementation-id>.properties`
//! in its classpath: one `key=value` per line, `#` or `!` starting a comment
//! line. A missing file means empty metadata; a file that does not parse is a
//! broken plugin and fails discovery.

use sideload_core::{PropertySet, ResourceScope, SideloadError};
use tracing::debug;

use crate::manifest::{DEFAULT_SERVICES_DIR, decode_utf8};

/// Resolves the property set of an implementation inside a loading context.
#[derive(Debug, Clone)]
pub struct PropertiesResolver {
    services_dir: String,
}

impl PropertiesResolver {
    pub fn new(services_dir: impl Into<String>) -> Self {
        Self {
            services_dir: services_dir.into(),
        }
    }

    /// Resource path holding the metadata of `implementation_id`.
    pub fn resource_path(&self, implementation_id: &str) -> String {
        format!(
            "{}/{implementation_id}.properties",
            self.services_dir.trim_end_matches('/')
        )
    }

    /// Read and parse the metadata of `implementation_id` from `scope`.
    pub fn resolve<S>(&self, scope: &S, implementation_id: &str) -> Result<PropertySet, SideloadError>
    where
        S: ResourceScope + ?Sized,
    {
        let path = self.resource_path(implementation_id);
        match scope.read_resource(&path)? {
            Some(bytes) => parse_properties(&path, &bytes),
            None => {
                debug!(
                    scope = scope.descriptor().name(),
                    implementation = implementation_id,
                    "no metadata resource, using empty property set"
                );
                Ok(PropertySet::new())
            }
        }
    }
}

impl Default for PropertiesResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICES_DIR)
    }
}

/// Parse `key=value` metadata content.
///
/// Whitespace around keys and values is trimmed, later keys override earlier
/// ones, and values may themselves contain `=`.
pub fn parse_properties(resource: &str, bytes: &[u8]) -> Result<PropertySet, SideloadError> {
    let content = decode_utf8(resource, bytes)?;
    let mut properties = PropertySet::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let corrupt = |message: &str| SideloadError::MetadataCorruption {
            resource: resource.to_string(),
            line: index + 1,
            message: message.to_string(),
        };

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| corrupt("expected `key=value`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(corrupt("property key must not be empty"));
        }
        properties.insert(key, value.trim());
    }

    Ok(properties)
}
