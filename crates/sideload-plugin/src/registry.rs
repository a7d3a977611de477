// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-keyed registry of discovered plugins.
//!
//! The `Registry` runs discovery lazily on the first query and caches every
//! discovered [`PluginRecord`] in a bucket keyed by its exact property set.
//! Buckets keep the order in which their key was first seen, and records
//! keep discovery order within a bucket. The cache lives until
//! [`Registry::close`] or [`Registry::reload`]; the next query after either
//! runs discovery again.
//!
//! A discovery pass is published all-or-nothing: records are bucketed into a
//! fresh map that replaces the (empty) state only once the whole pass has
//! succeeded, so a failed pass leaves the registry uninitialized and empty.
//! Instances constructed by a failed pass are released before the error is
//! returned.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use sideload_core::{Capability, PropertySet, SideloadError};
use tracing::{debug, warn};

use crate::discovery::Discovery;

/// A discovered plugin instance and its metadata.
pub struct PluginRecord<C: ?Sized> {
    /// The instance, shared with every caller that received this record.
    pub instance: Arc<C>,
    /// Metadata resolved for the implementation.
    pub properties: PropertySet,
    /// Implementation identifier the instance was constructed from.
    pub implementation: String,
    /// Scope name of the classpath the plugin was loaded from.
    pub origin: String,
}

impl<C: ?Sized> Clone for PluginRecord<C> {
    fn clone(&self) -> Self {
        Self {
            instance: Arc::clone(&self.instance),
            properties: self.properties.clone(),
            implementation: self.implementation.clone(),
            origin: self.origin.clone(),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for PluginRecord<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRecord")
            .field("implementation", &self.implementation)
            .field("origin", &self.origin)
            .field("properties", &self.properties)
            .finish()
    }
}

struct RegistryState<C: ?Sized> {
    initialized: bool,
    buckets: IndexMap<PropertySet, Vec<PluginRecord<C>>>,
}

impl<C: ?Sized + Capability> RegistryState<C> {
    fn publish(&mut self, records: Vec<PluginRecord<C>>) {
        let mut buckets: IndexMap<PropertySet, Vec<PluginRecord<C>>> = IndexMap::new();
        for record in records {
            buckets
                .entry(record.properties.clone())
                .or_default()
                .push(record);
        }
        self.buckets = buckets;
        self.initialized = true;
    }

    fn select(&self, filter: &PropertySet) -> Vec<PluginRecord<C>> {
        if !filter.is_empty()
            && let Some(bucket) = self.buckets.get(filter)
        {
            return bucket.clone();
        }

        self.buckets
            .iter()
            .filter(|(key, _)| filter.is_subset_of(key))
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    /// Attempt release on every cached record, then reset.
    fn release_all(&mut self) {
        let (attempted, failed) = release_records(self.buckets.values().flatten());
        if self.initialized {
            debug!(attempted, failed, "released plugins");
        }
        self.buckets.clear();
        self.initialized = false;
    }
}

/// Call the release hook of every releasable record, independently of the
/// others. Failures are logged. Returns `(attempted, failed)`.
pub(crate) fn release_records<'a, C>(
    records: impl IntoIterator<Item = &'a PluginRecord<C>>,
) -> (usize, usize)
where
    C: ?Sized + Capability,
{
    let mut attempted = 0usize;
    let mut failed = 0usize;

    for record in records {
        match release_instance(&*record.instance, &record.implementation, &record.origin) {
            Some(true) => attempted += 1,
            Some(false) => {
                attempted += 1;
                failed += 1;
            }
            None => {}
        }
    }

    (attempted, failed)
}

/// Release one instance. `None` when it has no release hook, otherwise
/// whether the hook succeeded. A failure is logged.
pub(crate) fn release_instance<C>(instance: &C, implementation: &str, origin: &str) -> Option<bool>
where
    C: ?Sized + Capability,
{
    let hook = instance.release_hook()?;
    match hook.release() {
        Ok(()) => Some(true),
        Err(source) => {
            let error = SideloadError::Release {
                implementation: implementation.to_string(),
                source,
            };
            warn!(origin, %error, "failed to release plugin");
            Some(false)
        }
    }
}

/// Lazily initialized, property-keyed cache of plugins implementing `C`.
///
/// All operations take a single lock, including the discovery pass itself,
/// so concurrent first callers wait for one pass instead of starting their
/// own. A slow plugin therefore blocks every caller of this registry while
/// discovery runs.
pub struct Registry<C: ?Sized + Capability> {
    discovery: Discovery<C>,
    state: Mutex<RegistryState<C>>,
}

impl<C: ?Sized + Capability> Registry<C> {
    /// Create an uninitialized registry. No discovery happens until the
    /// first query.
    pub fn new(discovery: Discovery<C>) -> Self {
        Self {
            discovery,
            state: Mutex::new(RegistryState {
                initialized: false,
                buckets: IndexMap::new(),
            }),
        }
    }

    /// Return the plugins matching `filter`.
    ///
    /// - An empty filter returns every record.
    /// - A filter equal to some plugin's full property set returns exactly
    ///   that bucket, unmerged.
    /// - Otherwise every record whose properties contain all of `filter`'s
    ///   entries is returned.
    ///
    /// The first call runs discovery; its errors are returned here and the
    /// registry stays uninitialized so a later call can retry.
    pub fn query(&self, filter: &PropertySet) -> Result<Vec<PluginRecord<C>>, SideloadError> {
        let mut state = self.lock();
        if !state.initialized {
            let records = self.discovery.run()?;
            state.publish(records);
        }
        Ok(state.select(filter))
    }

    /// Return every discovered plugin.
    pub fn all(&self) -> Result<Vec<PluginRecord<C>>, SideloadError> {
        self.query(&PropertySet::new())
    }

    /// Release every cached plugin and return to the uninitialized state.
    ///
    /// Release failures are logged and never stop the remaining releases.
    pub fn close(&self) {
        self.lock().release_all();
    }

    /// Drop the cache so the next query rediscovers plugins.
    pub fn reload(&self) {
        self.close();
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    /// Number of records currently cached (zero when uninitialized).
    pub fn len(&self) -> usize {
        self.lock().buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The state is only ever replaced whole, so a poisoned lock still
    /// guards consistent data.
    fn lock(&self) -> MutexGuard<'_, RegistryState<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: ?Sized + Capability> Drop for Registry<C> {
    fn drop(&mut self) {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .release_all();
    }
}
