// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classpath provider that records how often it was asked.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use sideload_core::{ClasspathDescriptor, ClasspathProvider, SideloadError};

/// Returns a fixed descriptor list and counts calls. Clones share the counter
/// and the failure switch, so a test can keep a handle after moving the
/// provider into a registry.
#[derive(Debug, Clone)]
pub struct CountingProvider {
    descriptors: Vec<ClasspathDescriptor>,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl CountingProvider {
    pub fn new(descriptors: Vec<ClasspathDescriptor>) -> Self {
        Self {
            descriptors,
            calls: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// How many times [`ClasspathProvider::plugins`] has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// While set, every call fails with a configuration error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ClasspathProvider for CountingProvider {
    fn plugins(&self) -> Result<Vec<ClasspathDescriptor>, SideloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SideloadError::Configuration(
                "classpath provider unavailable".to_string(),
            ));
        }
        Ok(self.descriptors.clone())
    }
}
