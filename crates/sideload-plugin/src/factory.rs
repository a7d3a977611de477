// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration table of implementation constructors and the manifest-driven
//! implementation source built on top of it.
//!
//! Implementations are compiled in, so isolation between plugins is achieved
//! by scoping: a factory registered for scope `"drawer-one"` is only visible
//! to the loading context built from the descriptor named `"drawer-one"`.
//! Global factories are visible to every scope, after scoped ones. Two
//! plugins can therefore declare the same implementation identifier and still
//! get their own constructor.

use std::collections::HashMap;
use std::sync::Arc;

use sideload_core::{
    Capability, Factory, Implementation, ImplementationSource, ResourceScope, SideloadError,
};
use tracing::debug;

use crate::manifest::{DEFAULT_SERVICES_DIR, read_services_manifest};
use crate::registry::release_instance;

/// Implementation identifier to constructor mapping, optionally per scope.
pub struct FactoryTable<C: ?Sized> {
    global: HashMap<String, Factory<C>>,
    scoped: HashMap<String, HashMap<String, Factory<C>>>,
}

impl<C: ?Sized> FactoryTable<C> {
    pub fn new() -> Self {
        Self {
            global: HashMap::new(),
            scoped: HashMap::new(),
        }
    }

    /// Register a constructor visible to every scope.
    pub fn register<F>(&mut self, implementation: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.global.insert(implementation.into(), Arc::new(factory));
    }

    /// Register a constructor visible only to the scope named `scope`.
    pub fn register_scoped<F>(
        &mut self,
        scope: impl Into<String>,
        implementation: impl Into<String>,
        factory: F,
    ) where
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.scoped
            .entry(scope.into())
            .or_default()
            .insert(implementation.into(), Arc::new(factory));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<F>(mut self, implementation: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.register(implementation, factory);
        self
    }

    /// Builder-style [`register_scoped`](Self::register_scoped).
    pub fn with_scoped<F>(
        mut self,
        scope: impl Into<String>,
        implementation: impl Into<String>,
        factory: F,
    ) -> Self
    where
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.register_scoped(scope, implementation, factory);
        self
    }

    /// Find the constructor for `implementation` as seen from `scope`.
    pub fn resolve(&self, scope: &str, implementation: &str) -> Option<&Factory<C>> {
        self.scoped
            .get(scope)
            .and_then(|factories| factories.get(implementation))
            .or_else(|| self.global.get(implementation))
    }

    /// Total number of registered constructors.
    pub fn len(&self) -> usize {
        self.global.len() + self.scoped.values().map(HashMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: ?Sized> Default for FactoryTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for FactoryTable<C> {
    fn clone(&self) -> Self {
        Self {
            global: self.global.clone(),
            scoped: self.scoped.clone(),
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for FactoryTable<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut global: Vec<&String> = self.global.keys().collect();
        global.sort();
        f.debug_struct("FactoryTable")
            .field("global", &global)
            .field("scopes", &self.scoped.len())
            .finish()
    }
}

/// Enumerates implementations listed in a scope's services manifest and
/// default-constructs each through a [`FactoryTable`].
///
/// When an identifier has no constructor, the instances already built for
/// that scope are released before the error is returned.
pub struct ManifestSource<C: ?Sized> {
    capability: String,
    services_dir: String,
    factories: Arc<FactoryTable<C>>,
}

impl<C: ?Sized> ManifestSource<C> {
    /// Source for `capability` using the conventional services directory.
    pub fn new(capability: impl Into<String>, factories: FactoryTable<C>) -> Self {
        Self {
            capability: capability.into(),
            services_dir: DEFAULT_SERVICES_DIR.to_string(),
            factories: Arc::new(factories),
        }
    }

    pub fn with_services_dir(mut self, services_dir: impl Into<String>) -> Self {
        self.services_dir = services_dir.into();
        self
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }
}

impl<C: ?Sized + Capability> ImplementationSource<C> for ManifestSource<C> {
    fn enumerate(&self, scope: &dyn ResourceScope) -> Result<Vec<Implementation<C>>, SideloadError> {
        let scope_name = scope.descriptor().name();
        let ids = read_services_manifest(scope, &self.services_dir, &self.capability)?;
        let mut built: Vec<Implementation<C>> = Vec::with_capacity(ids.len());

        for id in ids {
            let Some(factory) = self.factories.resolve(scope_name, &id) else {
                for implementation in &built {
                    release_instance(&*implementation.instance, &implementation.id, scope_name);
                }
                return Err(SideloadError::UnknownImplementation {
                    implementation: id,
                    scope: scope_name.to_string(),
                });
            };
            debug!(scope = scope_name, implementation = %id, "instantiating implementation");
            let instance = factory();
            built.push(Implementation::new(id, instance));
        }

        Ok(built)
    }
}
