// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source of plugin classpaths.

use crate::error::SideloadError;
use crate::types::ClasspathDescriptor;

/// Supplies one classpath descriptor per plugin, in discovery order.
///
/// Called once per discovery pass. An empty collection is legal and means no
/// plugins are installed. An error aborts the pass.
pub trait ClasspathProvider: Send + Sync {
    fn plugins(&self) -> Result<Vec<ClasspathDescriptor>, SideloadError>;
}

impl<T: ClasspathProvider + ?Sized> ClasspathProvider for std::sync::Arc<T> {
    fn plugins(&self) -> Result<Vec<ClasspathDescriptor>, SideloadError> {
        (**self).plugins()
    }
}
