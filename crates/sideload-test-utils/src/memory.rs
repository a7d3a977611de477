// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory plugins and the isolated loader that serves them.
//!
//! A [`MemoryPlugin`] is a bag of named resources plus an ordered list of
//! implementation constructors. [`MemoryLoader`] maps descriptor names to
//! plugins, so each context only sees the plugin registered under its own
//! descriptor name.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sideload_core::{
    ClasspathDescriptor, Factory, Implementation, IsolatedLoader, LoadingContext, ResourceScope,
    SideloadError,
};
use tracing::debug;

/// The contents of one in-memory plugin.
pub struct MemoryPlugin<C: ?Sized> {
    resources: HashMap<String, Vec<u8>>,
    implementations: Vec<(String, Factory<C>)>,
}

impl<C: ?Sized> MemoryPlugin<C> {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
            implementations: Vec::new(),
        }
    }

    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }

    /// Declare an implementation. Declaration order is enumeration order.
    pub fn with_implementation<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        self.implementations.push((id.into(), Arc::new(factory)));
        self
    }

    /// Ship `content` as the metadata of implementation `id`, at the
    /// conventional `META-INF/services/<id>.properties` path.
    pub fn with_properties(self, id: &str, content: impl Into<String>) -> Self {
        let content: String = content.into();
        self.with_resource(format!("META-INF/services/{id}.properties"), content)
    }
}

impl<C: ?Sized> Default for MemoryPlugin<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for MemoryPlugin<C> {
    fn clone(&self) -> Self {
        Self {
            resources: self.resources.clone(),
            implementations: self.implementations.clone(),
        }
    }
}

/// Isolated loader over [`MemoryPlugin`]s keyed by descriptor name.
///
/// Clones share the count of built contexts.
pub struct MemoryLoader<C: ?Sized> {
    plugins: HashMap<String, MemoryPlugin<C>>,
    contexts_built: Arc<AtomicUsize>,
}

impl<C: ?Sized> MemoryLoader<C> {
    pub fn new() -> Self {
        Self {
            plugins: HashMap::new(),
            contexts_built: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_plugin(mut self, name: impl Into<String>, plugin: MemoryPlugin<C>) -> Self {
        self.plugins.insert(name.into(), plugin);
        self
    }

    /// Number of loading contexts built so far.
    pub fn contexts_built(&self) -> usize {
        self.contexts_built.load(Ordering::SeqCst)
    }
}

impl<C: ?Sized> Default for MemoryLoader<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for MemoryLoader<C> {
    fn clone(&self) -> Self {
        Self {
            plugins: self.plugins.clone(),
            contexts_built: Arc::clone(&self.contexts_built),
        }
    }
}

impl<C: ?Sized> IsolatedLoader<C> for MemoryLoader<C> {
    fn build_context(
        &self,
        descriptor: &ClasspathDescriptor,
    ) -> Result<Box<dyn LoadingContext<C> + '_>, SideloadError> {
        let plugin = self.plugins.get(descriptor.name()).ok_or_else(|| {
            SideloadError::Configuration(format!("no in-memory plugin named `{}`", descriptor.name()))
        })?;
        self.contexts_built.fetch_add(1, Ordering::SeqCst);
        debug!(plugin = descriptor.name(), "built memory context");
        Ok(Box::new(MemoryContext {
            descriptor: descriptor.clone(),
            plugin,
        }))
    }
}

/// Loading context that only sees one [`MemoryPlugin`].
pub struct MemoryContext<'a, C: ?Sized> {
    descriptor: ClasspathDescriptor,
    plugin: &'a MemoryPlugin<C>,
}

impl<C: ?Sized> ResourceScope for MemoryContext<'_, C> {
    fn descriptor(&self) -> &ClasspathDescriptor {
        &self.descriptor
    }

    fn read_resource(&self, path: &str) -> Result<Option<Vec<u8>>, SideloadError> {
        Ok(self.plugin.resources.get(path).cloned())
    }
}

impl<C: ?Sized> LoadingContext<C> for MemoryContext<'_, C> {
    fn enumerate(&self) -> Result<Vec<Implementation<C>>, SideloadError> {
        Ok(self
            .plugin
            .implementations
            .iter()
            .map(|(id, factory)| Implementation::new(id.clone(), factory()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> MemoryLoader<str> {
        MemoryLoader::new()
            .with_plugin(
                "one",
                MemoryPlugin::new()
                    .with_implementation("a", || Arc::from("a"))
                    .with_implementation("b", || Arc::from("b"))
                    .with_properties("a", "k=v\n"),
            )
            .with_plugin("two", MemoryPlugin::new().with_resource("only-two", "x"))
    }

    #[test]
    fn contexts_are_scoped_by_descriptor_name() {
        let loader = loader();
        let one = loader
            .build_context(&ClasspathDescriptor::single("/plugins/one"))
            .unwrap();
        let two = loader
            .build_context(&ClasspathDescriptor::single("/plugins/two"))
            .unwrap();

        let ids: Vec<String> = one.enumerate().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            one.read_resource("META-INF/services/a.properties").unwrap(),
            Some(b"k=v\n".to_vec())
        );
        assert_eq!(one.read_resource("only-two").unwrap(), None);
        assert!(two.enumerate().unwrap().is_empty());
        assert_eq!(loader.contexts_built(), 2);
    }

    #[test]
    fn unknown_plugin_is_a_configuration_error() {
        let err = loader()
            .build_context(&ClasspathDescriptor::single("/plugins/three"))
            .err()
            .unwrap();
        assert!(matches!(err, SideloadError::Configuration(_)));
    }
}
