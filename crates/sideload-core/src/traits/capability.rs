// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability contract implemented by discovered plugin instances.

use crate::error::BoxError;

/// Explicit release of resources held by a plugin instance.
///
/// Called once per record when the owning registry is closed or reloaded.
pub trait Release {
    fn release(&self) -> Result<(), BoxError>;
}

/// The contract a discoverable plugin type satisfies.
///
/// Usually implemented for a trait object (`impl Capability for dyn MyTrait`)
/// so the registry can hold heterogeneous implementations behind `Arc<C>`.
/// Instances that own resources return a release hook; the default is none.
pub trait Capability: Send + Sync + 'static {
    fn release_hook(&self) -> Option<&dyn Release> {
        None
    }
}
