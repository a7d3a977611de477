// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed isolated loader.
//!
//! A [`DirectoryContext`] only ever reads below the locations of the
//! descriptor it was built from. Resource paths must be relative and may not
//! contain `..`, so one plugin cannot reach into another plugin's files.
//! Locations are searched in descriptor order and the first hit wins.

use std::io::ErrorKind;
use std::path::{Component, Path};
use std::sync::Arc;

use sideload_core::{
    ClasspathDescriptor, Implementation, ImplementationSource, IsolatedLoader, LoadingContext,
    ResourceScope, SideloadError,
};
use tracing::debug;

/// Builds [`DirectoryContext`]s that enumerate through a shared
/// [`ImplementationSource`].
pub struct DirectoryLoader<C: ?Sized> {
    source: Arc<dyn ImplementationSource<C>>,
}

impl<C: ?Sized> DirectoryLoader<C> {
    pub fn new(source: impl ImplementationSource<C> + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

impl<C: ?Sized + 'static> IsolatedLoader<C> for DirectoryLoader<C> {
    /// Every location must exist and be a directory; anything else makes the
    /// descriptor unusable.
    fn build_context(
        &self,
        descriptor: &ClasspathDescriptor,
    ) -> Result<Box<dyn LoadingContext<C> + '_>, SideloadError> {
        for location in descriptor.locations() {
            let metadata = std::fs::metadata(location).map_err(|e| match e.kind() {
                ErrorKind::NotFound => SideloadError::Configuration(format!(
                    "plugin `{}`: location {} does not exist",
                    descriptor.name(),
                    location.display()
                )),
                _ => SideloadError::Io {
                    path: location.to_path_buf(),
                    source: e,
                },
            })?;
            if !metadata.is_dir() {
                return Err(SideloadError::Configuration(format!(
                    "plugin `{}`: location {} is not a directory",
                    descriptor.name(),
                    location.display()
                )));
            }
        }

        debug!(plugin = descriptor.name(), locations = descriptor.len(), "built directory context");
        Ok(Box::new(DirectoryContext {
            descriptor: descriptor.clone(),
            source: Arc::clone(&self.source),
        }))
    }
}

/// Loading context confined to one descriptor's directories.
pub struct DirectoryContext<C: ?Sized> {
    descriptor: ClasspathDescriptor,
    source: Arc<dyn ImplementationSource<C>>,
}

impl<C: ?Sized> ResourceScope for DirectoryContext<C> {
    fn descriptor(&self) -> &ClasspathDescriptor {
        &self.descriptor
    }

    fn read_resource(&self, path: &str) -> Result<Option<Vec<u8>>, SideloadError> {
        let relative = Path::new(path);
        if path.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(SideloadError::Configuration(format!(
                "resource path `{path}` escapes the scope of plugin `{}`",
                self.descriptor.name()
            )));
        }

        for location in self.descriptor.locations() {
            let candidate = location.join(relative);
            match std::fs::read(&candidate) {
                Ok(bytes) => return Ok(Some(bytes)),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) if candidate.is_dir() => {
                    debug!(path = %candidate.display(), error = %e, "resource path is a directory");
                    continue;
                }
                Err(e) => {
                    return Err(SideloadError::Io {
                        path: candidate,
                        source: e,
                    });
                }
            }
        }

        Ok(None)
    }
}

impl<C: ?Sized> LoadingContext<C> for DirectoryContext<C> {
    fn enumerate(&self) -> Result<Vec<Implementation<C>>, SideloadError> {
        self.source.enumerate(self)
    }
}
