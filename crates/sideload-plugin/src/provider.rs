// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classpath providers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sideload_config::SideloadConfig;
use sideload_core::{ClasspathDescriptor, ClasspathProvider, SideloadError};

/// A fixed list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticClasspathProvider {
    descriptors: Vec<ClasspathDescriptor>,
}

impl StaticClasspathProvider {
    pub fn new(descriptors: Vec<ClasspathDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl ClasspathProvider for StaticClasspathProvider {
    fn plugins(&self) -> Result<Vec<ClasspathDescriptor>, SideloadError> {
        Ok(self.descriptors.clone())
    }
}

/// One plugin per immediate subdirectory of a root, sorted by name.
///
/// The root is rescanned on every discovery pass, so plugins added between
/// a `reload()` and the next query are picked up.
#[derive(Debug, Clone)]
pub struct DirectoryScanProvider {
    root: PathBuf,
}

impl DirectoryScanProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ClasspathProvider for DirectoryScanProvider {
    fn plugins(&self) -> Result<Vec<ClasspathDescriptor>, SideloadError> {
        scan_plugin_root(&self.root)
    }
}

/// Plugins declared in configuration: `[[plugins]]` entries in order, then
/// the subdirectories of `discovery.plugins_dir` when it is set.
#[derive(Debug, Clone)]
pub struct ConfiguredClasspathProvider {
    declared: Vec<(String, Vec<PathBuf>)>,
    plugins_dir: Option<PathBuf>,
}

impl ConfiguredClasspathProvider {
    pub fn new(config: &SideloadConfig) -> Self {
        Self {
            declared: config
                .plugins
                .iter()
                .map(|p| (p.name.clone(), p.locations.clone()))
                .collect(),
            plugins_dir: config.discovery.plugins_dir.clone(),
        }
    }
}

impl ClasspathProvider for ConfiguredClasspathProvider {
    fn plugins(&self) -> Result<Vec<ClasspathDescriptor>, SideloadError> {
        let mut descriptors = self
            .declared
            .iter()
            .map(|(name, locations)| {
                ClasspathDescriptor::new(locations.iter().cloned())
                    .map(|d| d.with_name(name.clone()))
                    .map_err(|_| {
                        SideloadError::Configuration(format!(
                            "plugin `{name}` does not list any locations"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(root) = &self.plugins_dir {
            descriptors.extend(scan_plugin_root(root)?);
        }
        ensure_unique_names(&descriptors)?;
        Ok(descriptors)
    }
}

/// Scope names key scoped factories, so two descriptors sharing a name would
/// see each other's constructors.
pub(crate) fn ensure_unique_names(descriptors: &[ClasspathDescriptor]) -> Result<(), SideloadError> {
    let mut seen = HashSet::new();
    for descriptor in descriptors {
        if !seen.insert(descriptor.name()) {
            return Err(SideloadError::Configuration(format!(
                "plugin name `{}` is used by more than one classpath ({}); give each plugin a distinct name",
                descriptor.name(),
                descriptor
            )));
        }
    }
    Ok(())
}

fn scan_plugin_root(root: &Path) -> Result<Vec<ClasspathDescriptor>, SideloadError> {
    let io_error = |source| SideloadError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if entry.file_type().map_err(io_error)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    Ok(dirs.into_iter().map(ClasspathDescriptor::single).collect())
}
