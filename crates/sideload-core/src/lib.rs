// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sideload plugin loader.
//!
//! Provides the error type, the property and classpath types, and the traits
//! that separate the registry from where plugins live and how they are
//! loaded.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BoxError, SideloadError};
pub use types::{ClasspathDescriptor, PropertySet};

pub use traits::{
    Capability, ClasspathProvider, Factory, Implementation, ImplementationSource, IsolatedLoader,
    LoadingContext, Release, ResourceScope,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sideload_error_messages() {
        let config = SideloadError::Configuration("no locations".into());
        assert_eq!(config.to_string(), "configuration error: no locations");

        let corrupt = SideloadError::MetadataCorruption {
            resource: "META-INF/services/a.B.properties".into(),
            line: 3,
            message: "expected `key=value`".into(),
        };
        assert!(corrupt.to_string().contains("line 3"));
        assert!(corrupt.is_metadata());

        let release = SideloadError::Release {
            implementation: "a.B".into(),
            source: Box::new(std::io::Error::other("busy")),
        };
        assert_eq!(release.to_string(), "failed to release plugin `a.B`: busy");
        assert!(!release.is_metadata());
    }

    #[test]
    fn capability_default_has_no_release_hook() {
        struct Plain;
        impl Capability for Plain {}
        assert!(Plain.release_hook().is_none());
    }

    #[test]
    fn implementation_debug_shows_identifier() {
        let implementation: Implementation<str> = Implementation::new("a.B", std::sync::Arc::from("x"));
        assert_eq!(format!("{implementation:?}"), r#"Implementation { id: "a.B" }"#);
    }
}
