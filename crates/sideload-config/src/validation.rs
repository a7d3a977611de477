// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;
use std::path::{Component, Path};

use crate::diagnostic::ConfigError;
use crate::model::SideloadConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &SideloadConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log_level.trim().to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level `{}` is not one of {}",
                config.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let services_dir = config.discovery.services_dir.trim();
    if services_dir.is_empty() {
        errors.push(ConfigError::Validation {
            message: "discovery.services_dir must not be empty".to_string(),
        });
    } else if !Path::new(services_dir)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "discovery.services_dir `{services_dir}` must be a relative path without `..`"
            ),
        });
    }

    let mut seen_names = HashSet::new();
    for (i, plugin) in config.plugins.iter().enumerate() {
        if plugin.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].name must not be empty"),
            });
        } else if !seen_names.insert(plugin.name.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate plugin name `{}` in [[plugins]] array", plugin.name),
            });
        }

        if plugin.locations.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("plugins[{i}].locations must list at least one location"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
