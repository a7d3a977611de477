// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by providers, loaders, and the registry.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::SideloadError;

/// String-keyed, string-valued plugin metadata.
///
/// Used both as the metadata attached to a discovered plugin and as a query
/// filter. Entries are kept sorted so equality, hashing, and display do not
/// depend on insertion order.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PropertySet(BTreeMap<String, String>);

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert a property, returning the previous value for `key` if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if every entry of `self` is present in `other` with an
    /// equal value. The empty set is a subset of every set.
    pub fn is_subset_of(&self, other: &PropertySet) -> bool {
        self.0
            .iter()
            .all(|(key, value)| other.0.get(key) == Some(value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, "}}")
    }
}

/// The set of locations that make up one plugin's isolation scope.
///
/// Locations keep their insertion order (earlier locations win when the same
/// resource exists in several) and duplicates are collapsed. A descriptor
/// always has at least one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathDescriptor {
    name: String,
    locations: IndexSet<PathBuf>,
}

impl ClasspathDescriptor {
    /// Create a descriptor from one or more locations.
    ///
    /// The scope name defaults to the final component of the first location.
    /// Fails with [`SideloadError::Configuration`] when `locations` is empty.
    pub fn new<I, P>(locations: I) -> Result<Self, SideloadError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let locations: IndexSet<PathBuf> = locations.into_iter().map(Into::into).collect();
        let first = locations.first().ok_or_else(|| {
            SideloadError::Configuration(
                "classpath descriptor must contain at least one location".to_string(),
            )
        })?;
        let name = default_scope_name(first);
        Ok(Self { name, locations })
    }

    /// Create a descriptor for a plugin that lives in a single location.
    pub fn single(location: impl Into<PathBuf>) -> Self {
        let location = location.into();
        let name = default_scope_name(&location);
        let mut locations = IndexSet::new();
        locations.insert(location);
        Self { name, locations }
    }

    /// Override the scope name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Scope name used to tag records and to look up scoped factories.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locations in lookup order.
    pub fn locations(&self) -> impl Iterator<Item = &Path> {
        self.locations.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl fmt::Display for ClasspathDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, location) in self.locations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", location.display())?;
        }
        write!(f, "]")
    }
}

fn default_scope_name(location: &Path) -> String {
    location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.display().to_string())
}
