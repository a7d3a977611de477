// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sideload.
//!
//! Everything here works without touching the filesystem, so registry
//! behavior can be tested deterministically.
//!
//! # Components
//!
//! - [`MemoryLoader`] - Isolated loader over in-memory plugins
//! - [`CountingProvider`] - Classpath provider that counts calls and can be made to fail
//! - [`ProbePlugin`] - Capability instance that records release attempts

pub mod memory;
pub mod probe;
pub mod provider;

pub use memory::{MemoryContext, MemoryLoader, MemoryPlugin};
pub use probe::{Probe, ProbePlugin, ReleaseBehavior, ReleaseCounter};
pub use provider::CountingProvider;
