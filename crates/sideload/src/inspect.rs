// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sideload inspect` command implementation.
//!
//! Runs a real discovery pass over the configured plugins without
//! constructing any plugin code: every identifier a services manifest
//! declares becomes a [`DeclaredImplementation`], and the registry is then
//! queried with the filter given on the command line.

use std::sync::Arc;

use sideload_config::SideloadConfig;
use sideload_core::{
    Capability, Implementation, ImplementationSource, PropertySet, ResourceScope, SideloadError,
};
use sideload_plugin::{Discovery, PluginRecord, Registry, read_services_manifest};

/// Placeholder instance standing in for a declared implementation.
#[derive(Debug)]
pub struct DeclaredImplementation {
    pub id: String,
}

impl Capability for DeclaredImplementation {}

/// Lists what each plugin's services manifest declares for one capability.
pub struct DeclaredSource {
    capability: String,
    services_dir: String,
}

impl DeclaredSource {
    pub fn new(capability: impl Into<String>, services_dir: impl Into<String>) -> Self {
        Self {
            capability: capability.into(),
            services_dir: services_dir.into(),
        }
    }
}

impl ImplementationSource<DeclaredImplementation> for DeclaredSource {
    fn enumerate(
        &self,
        scope: &dyn ResourceScope,
    ) -> Result<Vec<Implementation<DeclaredImplementation>>, SideloadError> {
        let ids = read_services_manifest(scope, &self.services_dir, &self.capability)?;
        Ok(ids
            .into_iter()
            .map(|id| {
                let instance = Arc::new(DeclaredImplementation { id: id.clone() });
                Implementation::new(id, instance)
            })
            .collect())
    }
}

/// Parse a `key=value` command-line filter.
pub fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("property key must not be empty".to_string());
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Run the `sideload inspect` command, returning the matching records.
pub fn run_inspect(
    config: &SideloadConfig,
    capability: &str,
    filter: Vec<(String, String)>,
) -> Result<Vec<PluginRecord<DeclaredImplementation>>, SideloadError> {
    let source = DeclaredSource::new(capability, config.discovery.services_dir.clone());
    let registry = Registry::new(Discovery::from_config(config, source));
    let filter: PropertySet = filter.into_iter().collect();

    tracing::debug!(capability, %filter, "querying registry");
    registry.query(&filter)
}

/// One line per record: origin, implementation, and metadata.
pub fn format_records(records: &[PluginRecord<DeclaredImplementation>]) -> String {
    let origin_width = records.iter().map(|r| r.origin.len()).max().unwrap_or(0);
    let id_width = records
        .iter()
        .map(|r| r.implementation.len())
        .max()
        .unwrap_or(0);

    records
        .iter()
        .map(|r| {
            format!(
                "{:<origin_width$}  {:<id_width$}  {}\n",
                r.origin, r.implementation, r.properties
            )
        })
        .collect()
}
