// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the seams of the plugin loader.
//!
//! Capabilities describe what a plugin instance is, providers supply where
//! plugins live, and loaders turn one location set into an isolated context.

pub mod capability;
pub mod loader;
pub mod provider;

pub use capability::{Capability, Release};
pub use loader::{
    Factory, Implementation, ImplementationSource, IsolatedLoader, LoadingContext, ResourceScope,
};
pub use provider::ClasspathProvider;
