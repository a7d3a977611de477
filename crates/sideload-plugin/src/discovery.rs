// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One discovery pass across every plugin classpath.

use std::time::Instant;

use sideload_config::SideloadConfig;
use sideload_core::{
    Capability, ClasspathDescriptor, ClasspathProvider, ImplementationSource, IsolatedLoader,
    SideloadError,
};
use tracing::{debug, info, warn};

use crate::directory::DirectoryLoader;
use crate::properties::PropertiesResolver;
use crate::provider::{ConfiguredClasspathProvider, ensure_unique_names};
use crate::registry::{PluginRecord, release_instance, release_records};

/// Drives a [`ClasspathProvider`], an [`IsolatedLoader`], and a
/// [`PropertiesResolver`] to produce plugin records.
pub struct Discovery<C: ?Sized> {
    provider: Box<dyn ClasspathProvider>,
    loader: Box<dyn IsolatedLoader<C>>,
    resolver: PropertiesResolver,
}

impl<C: ?Sized> Discovery<C> {
    pub fn new(
        provider: impl ClasspathProvider + 'static,
        loader: impl IsolatedLoader<C> + 'static,
    ) -> Self {
        Self {
            provider: Box::new(provider),
            loader: Box::new(loader),
            resolver: PropertiesResolver::default(),
        }
    }

    /// Replace the default metadata resolver.
    pub fn with_resolver(mut self, resolver: PropertiesResolver) -> Self {
        self.resolver = resolver;
        self
    }
}

impl<C: ?Sized + 'static> Discovery<C> {
    /// Discovery over the plugins named in `config`, loaded from their
    /// directories, with metadata read from `discovery.services_dir`.
    ///
    /// `source` decides which implementations exist in each plugin; it should
    /// read manifests from the same services directory.
    pub fn from_config(config: &SideloadConfig, source: impl ImplementationSource<C> + 'static) -> Self {
        Self::new(
            ConfiguredClasspathProvider::new(config),
            DirectoryLoader::new(source),
        )
        .with_resolver(PropertiesResolver::new(config.discovery.services_dir.clone()))
    }
}

impl<C: ?Sized + Capability> Discovery<C> {
    /// Run a full pass, returning records in provider order, then
    /// declaration order within each plugin.
    ///
    /// Descriptor names must be unique, since they scope factory lookup.
    /// Any error aborts the whole pass. Instances constructed before the
    /// failure are released and nothing is returned.
    pub fn run(&self) -> Result<Vec<PluginRecord<C>>, SideloadError> {
        let started = Instant::now();
        let descriptors = self.provider.plugins()?;
        ensure_unique_names(&descriptors)?;
        let mut records = Vec::new();

        if let Err(error) = self.collect(&descriptors, &mut records) {
            let (released, _) = release_records(&records);
            warn!(%error, discarded = records.len(), released, "plugin discovery failed");
            return Err(error);
        }

        info!(
            plugins = descriptors.len(),
            records = records.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "plugin discovery complete"
        );
        Ok(records)
    }

    fn collect(
        &self,
        descriptors: &[ClasspathDescriptor],
        records: &mut Vec<PluginRecord<C>>,
    ) -> Result<(), SideloadError> {
        for descriptor in descriptors {
            let context = self.loader.build_context(descriptor)?;
            let implementations = context.enumerate()?;
            debug!(
                plugin = descriptor.name(),
                implementations = implementations.len(),
                "enumerated plugin"
            );

            let mut pending = implementations.into_iter();
            while let Some(implementation) = pending.next() {
                let properties = match self.resolver.resolve(&*context, &implementation.id) {
                    Ok(properties) => properties,
                    Err(error) => {
                        let origin = descriptor.name();
                        for unrecorded in std::iter::once(implementation).chain(pending.by_ref()) {
                            release_instance(&*unrecorded.instance, &unrecorded.id, origin);
                        }
                        return Err(error);
                    }
                };
                records.push(PluginRecord {
                    instance: implementation.instance,
                    properties,
                    implementation: implementation.id,
                    origin: descriptor.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sideload_test_utils::{
        CountingProvider, MemoryLoader, MemoryPlugin, Probe, ProbePlugin, ReleaseBehavior,
        ReleaseCounter,
    };
    use std::sync::Arc;

    fn releasable(label: &'static str, counter: ReleaseCounter) -> impl Fn() -> Arc<dyn Probe> {
        move || {
            Arc::new(ProbePlugin::new(label, ReleaseBehavior::Succeeds, counter.clone()))
                as Arc<dyn Probe>
        }
    }

    #[test]
    fn duplicate_scope_names_are_rejected_before_loading() {
        let counter = ReleaseCounter::default();
        let loader = MemoryLoader::new().with_plugin(
            "drawer",
            MemoryPlugin::new().with_implementation("impl.Plus", releasable("plus", counter.clone())),
        );
        let discovery = Discovery::new(
            CountingProvider::new(vec![
                ClasspathDescriptor::single("/x/vendor-a/drawer"),
                ClasspathDescriptor::single("/x/vendor-b/drawer"),
            ]),
            loader.clone(),
        );

        let err = discovery.run().unwrap_err();
        assert!(matches!(err, SideloadError::Configuration(_)));
        assert!(err.to_string().contains("plugin name `drawer`"));
        assert_eq!(loader.contexts_built(), 0);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn corrupt_metadata_releases_every_instance_of_the_pass() {
        let counter = ReleaseCounter::default();
        let plugin = MemoryPlugin::new()
            .with_implementation("impl.Good", releasable("good", counter.clone()))
            .with_implementation("impl.Bad", releasable("bad", counter.clone()))
            .with_implementation("impl.Later", releasable("later", counter.clone()))
            .with_properties("impl.Good", "shape=plus\n")
            .with_properties("impl.Bad", "shape plus\n");
        let discovery = Discovery::new(
            CountingProvider::new(vec![ClasspathDescriptor::single("/plugins/drawer")]),
            MemoryLoader::new().with_plugin("drawer", plugin),
        );

        let err = discovery.run().unwrap_err();
        assert!(matches!(err, SideloadError::MetadataCorruption { .. }));
        assert_eq!(counter.count(), 3);
    }

    #[tracing_test::traced_test]
    #[test]
    fn completed_pass_logs_counts_and_elapsed_time() {
        let counter = ReleaseCounter::default();
        let discovery = Discovery::new(
            CountingProvider::new(vec![ClasspathDescriptor::single("/plugins/drawer")]),
            MemoryLoader::new().with_plugin(
                "drawer",
                MemoryPlugin::new().with_implementation("impl.A", releasable("a", counter.clone())),
            ),
        );

        assert_eq!(discovery.run().unwrap().len(), 1);
        assert!(logs_contain("plugin discovery complete"));
        assert!(logs_contain("records=1"));
        assert!(logs_contain("elapsed_ms="));
    }

    #[test]
    fn records_follow_provider_then_declaration_order() {
        let counter = ReleaseCounter::default();
        let discovery = Discovery::new(
            CountingProvider::new(vec![
                ClasspathDescriptor::single("/plugins/second"),
                ClasspathDescriptor::single("/plugins/first"),
            ]),
            MemoryLoader::new()
                .with_plugin(
                    "first",
                    MemoryPlugin::new().with_implementation("impl.A", releasable("a", counter.clone())),
                )
                .with_plugin(
                    "second",
                    MemoryPlugin::new()
                        .with_implementation("impl.B", releasable("b", counter.clone()))
                        .with_implementation("impl.C", releasable("c", counter.clone())),
                ),
        );

        let records = discovery.run().unwrap();
        let order: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.origin.as_str(), r.implementation.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("second", "impl.B"), ("second", "impl.C"), ("first", "impl.A")]
        );
        assert!(records.iter().all(|r| r.properties.is_empty()));
    }
}
