// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sideload plugin loader.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Sideload configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SideloadConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Discovery conventions and plugin root.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Explicitly declared plugins, discovered in the order listed.
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

impl Default for SideloadConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            discovery: DiscoveryConfig::default(),
            plugins: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Discovery conventions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Directory, relative to each plugin location, holding services
    /// manifests and `.properties` metadata.
    #[serde(default = "default_services_dir")]
    pub services_dir: String,

    /// Optional root whose immediate subdirectories are each one plugin.
    #[serde(default)]
    pub plugins_dir: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            services_dir: default_services_dir(),
            plugins_dir: None,
        }
    }
}

fn default_services_dir() -> String {
    "META-INF/services".to_string()
}

/// A single `[[plugins]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    /// Scope name of the plugin. Scoped factories are registered under it.
    pub name: String,

    /// Locations making up the plugin's classpath, searched in order.
    #[serde(default)]
    pub locations: Vec<PathBuf>,
}
