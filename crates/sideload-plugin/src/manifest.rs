// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Services manifest parsing.
//!
//! A services manifest lives at `<services_dir>/<capability-id>` inside a
//! plugin's classpath and lists the identifiers of the implementations that
//! plugin provides, one per line. Everything after `#` is a comment, blank
//! lines are ignored, and repeated identifiers are listed once.

use sideload_core::{ResourceScope, SideloadError};

/// Conventional directory for manifests and metadata inside a classpath.
pub const DEFAULT_SERVICES_DIR: &str = "META-INF/services";

/// Resource path of the services manifest for `capability`.
pub fn manifest_path(services_dir: &str, capability: &str) -> String {
    format!("{}/{capability}", services_dir.trim_end_matches('/'))
}

/// Parse services manifest content into implementation identifiers.
///
/// An identifier containing whitespace is rejected as corrupt.
pub fn parse_services_manifest(resource: &str, bytes: &[u8]) -> Result<Vec<String>, SideloadError> {
    let content = decode_utf8(resource, bytes)?;
    let mut ids: Vec<String> = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let entry = line.split('#').next().unwrap_or_default().trim();
        if entry.is_empty() {
            continue;
        }
        if entry.contains(char::is_whitespace) {
            return Err(SideloadError::MetadataCorruption {
                resource: resource.to_string(),
                line: index + 1,
                message: format!("illegal implementation identifier `{entry}`"),
            });
        }
        if !ids.iter().any(|id| id == entry) {
            ids.push(entry.to_string());
        }
    }

    Ok(ids)
}

/// Read and parse the services manifest for `capability` from `scope`.
///
/// A scope without a manifest declares no implementations.
pub fn read_services_manifest(
    scope: &dyn ResourceScope,
    services_dir: &str,
    capability: &str,
) -> Result<Vec<String>, SideloadError> {
    let path = manifest_path(services_dir, capability);
    match scope.read_resource(&path)? {
        Some(bytes) => parse_services_manifest(&path, &bytes),
        None => Ok(Vec::new()),
    }
}

/// Decode a metadata resource as UTF-8, reporting the first bad line.
pub(crate) fn decode_utf8<'a>(resource: &str, bytes: &'a [u8]) -> Result<&'a str, SideloadError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let line = bytes[..e.valid_up_to()]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        SideloadError::MetadataCorruption {
            resource: resource.to_string(),
            line,
            message: "resource is not valid UTF-8".to_string(),
        }
    })
}
