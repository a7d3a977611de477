// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sideload.toml` > `~/.config/sideload/sideload.toml` > `/etc/sideload/sideload.toml`
//! with environment variable overrides via `SIDELOAD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SideloadConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sideload/sideload.toml` (system-wide)
/// 3. `~/.config/sideload/sideload.toml` (user XDG config)
/// 4. `./sideload.toml` (local directory)
/// 5. `SIDELOAD_*` environment variables
pub fn load_config() -> Result<SideloadConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<SideloadConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SideloadConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SideloadConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SideloadConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SideloadConfig::default()))
        .merge(Toml::file("/etc/sideload/sideload.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sideload/sideload.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sideload.toml"))
        .merge(env_provider())
}

/// Environment variable provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `SIDELOAD_DISCOVERY_SERVICES_DIR` maps to `discovery.services_dir`, not
/// `discovery.services.dir`.
fn env_provider() -> Env {
    Env::prefixed("SIDELOAD_").map(|key| {
        let mapped = key.as_str().replacen("discovery_", "discovery.", 1);
        mapped.into()
    })
}
