// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin discovery and the property-keyed plugin registry.
//!
//! Every plugin is a set of directories. A [`Discovery`] pass asks a
//! classpath provider which plugins exist, builds one isolated loading
//! context per plugin, enumerates the implementations each plugin declares
//! for a capability, and resolves the metadata of every implementation. The
//! [`Registry`] runs that pass lazily and answers exact or subset queries
//! against the resulting property sets until it is closed or reloaded.

pub mod directory;
pub mod discovery;
pub mod factory;
pub mod manifest;
pub mod properties;
pub mod provider;
pub mod registry;

pub use directory::{DirectoryContext, DirectoryLoader};
pub use discovery::Discovery;
pub use factory::{FactoryTable, ManifestSource};
pub use manifest::{
    DEFAULT_SERVICES_DIR, manifest_path, parse_services_manifest, read_services_manifest,
};
pub use properties::{PropertiesResolver, parse_properties};
pub use provider::{ConfiguredClasspathProvider, DirectoryScanProvider, StaticClasspathProvider};
pub use registry::{PluginRecord, Registry};
