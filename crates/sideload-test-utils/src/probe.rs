// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A minimal capability for registry tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sideload_core::{BoxError, Capability, Release};

/// Capability used by registry tests. Instances are told apart by label.
pub trait Probe: Send + Sync {
    fn label(&self) -> &str;

    fn as_release(&self) -> Option<&dyn Release> {
        None
    }
}

impl Capability for dyn Probe {
    fn release_hook(&self) -> Option<&dyn Release> {
        self.as_release()
    }
}

/// How a [`ProbePlugin`] reacts to release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseBehavior {
    /// No release hook at all.
    NotReleasable,
    Succeeds,
    Fails,
}

/// Shared count of release attempts across probes.
#[derive(Debug, Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A [`Probe`] that records every release attempt in a [`ReleaseCounter`].
#[derive(Debug)]
pub struct ProbePlugin {
    label: String,
    behavior: ReleaseBehavior,
    counter: ReleaseCounter,
}

impl ProbePlugin {
    pub fn new(label: impl Into<String>, behavior: ReleaseBehavior, counter: ReleaseCounter) -> Self {
        Self {
            label: label.into(),
            behavior,
            counter,
        }
    }
}

impl Probe for ProbePlugin {
    fn label(&self) -> &str {
        &self.label
    }

    fn as_release(&self) -> Option<&dyn Release> {
        match self.behavior {
            ReleaseBehavior::NotReleasable => None,
            ReleaseBehavior::Succeeds | ReleaseBehavior::Fails => Some(self),
        }
    }
}

impl Release for ProbePlugin {
    fn release(&self) -> Result<(), BoxError> {
        self.counter.record();
        match self.behavior {
            ReleaseBehavior::Fails => Err(format!("{} refused to release", self.label).into()),
            _ => Ok(()),
        }
    }
}
