// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Isolation boundary between plugins.
//!
//! An [`IsolatedLoader`] turns one [`ClasspathDescriptor`] into a
//! [`LoadingContext`]. Everything a context resolves (implementation
//! identifiers, resources) comes from its own descriptor only, so two
//! contexts built from different descriptors never see each other's names.

use std::sync::Arc;

use crate::error::SideloadError;
use crate::types::ClasspathDescriptor;

/// Nullary constructor for an implementation of capability `C`.
pub type Factory<C> = Arc<dyn Fn() -> Arc<C> + Send + Sync>;

/// A freshly constructed implementation of capability `C`.
pub struct Implementation<C: ?Sized> {
    /// Fully-qualified implementation identifier, as named in the manifest.
    pub id: String,
    pub instance: Arc<C>,
}

impl<C: ?Sized> Implementation<C> {
    pub fn new(id: impl Into<String>, instance: Arc<C>) -> Self {
        Self {
            id: id.into(),
            instance,
        }
    }
}

impl<C: ?Sized> std::fmt::Debug for Implementation<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementation").field("id", &self.id).finish()
    }
}

/// Read access to the resources of a single isolation scope.
pub trait ResourceScope {
    /// The descriptor this scope was built from.
    fn descriptor(&self) -> &ClasspathDescriptor;

    /// Fetch a named resource. `Ok(None)` when the scope does not contain it.
    fn read_resource(&self, path: &str) -> Result<Option<Vec<u8>>, SideloadError>;
}

/// A loading context scoped to one plugin's classpath.
pub trait LoadingContext<C: ?Sized>: ResourceScope + Send {
    /// Instantiate every implementation of `C` this context declares, in
    /// declaration order.
    fn enumerate(&self) -> Result<Vec<Implementation<C>>, SideloadError>;
}

/// Builds isolated loading contexts.
pub trait IsolatedLoader<C: ?Sized>: Send + Sync {
    fn build_context(
        &self,
        descriptor: &ClasspathDescriptor,
    ) -> Result<Box<dyn LoadingContext<C> + '_>, SideloadError>;
}

/// Strategy for turning a scope's contents into instances of `C`.
///
/// Loaders delegate enumeration to a source so the convention used to find
/// implementations (manifest files, explicit registration) stays pluggable.
pub trait ImplementationSource<C: ?Sized>: Send + Sync {
    fn enumerate(&self, scope: &dyn ResourceScope) -> Result<Vec<Implementation<C>>, SideloadError>;
}
