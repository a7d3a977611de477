// SPDX-FileCopyrightText: 2026 Sideload Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end discovery over plugin directories on disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use sideload_core::{Capability, ClasspathDescriptor, PropertySet, SideloadError};
use sideload_plugin::{
    DirectoryLoader, DirectoryScanProvider, Discovery, FactoryTable, ManifestSource,
    PropertiesResolver, Registry, StaticClasspathProvider,
};

const CAPABILITY: &str = "shapes.ShapeDrawer";

trait ShapeDrawer: Send + Sync {
    fn draw(&self) -> String;
}

impl Capability for dyn ShapeDrawer {}

struct Plus;
struct Min;

impl ShapeDrawer for Plus {
    fn draw(&self) -> String {
        "+".to_string()
    }
}

impl ShapeDrawer for Min {
    fn draw(&self) -> String {
        "-".to_string()
    }
}

fn write_plugin(root: &Path, name: &str, services_dir: &str, implementation: &str, properties: &str) {
    let services = root.join(name).join(services_dir);
    fs::create_dir_all(&services).unwrap();
    fs::write(
        services.join(CAPABILITY),
        format!("# drawers shipped by {name}\n{implementation}\n"),
    )
    .unwrap();
    fs::write(services.join(format!("{implementation}.properties")), properties).unwrap();
}

fn factories() -> FactoryTable<dyn ShapeDrawer> {
    FactoryTable::new()
        .with("shapes.plus.PlusDrawer", || Arc::new(Plus) as Arc<dyn ShapeDrawer>)
        .with("shapes.min.MinDrawer", || Arc::new(Min) as Arc<dyn ShapeDrawer>)
}

fn filter(pairs: &[(&str, &str)]) -> PropertySet {
    pairs.iter().copied().collect()
}

fn drawings(registry: &Registry<dyn ShapeDrawer>, pairs: &[(&str, &str)]) -> Vec<String> {
    registry
        .query(&filter(pairs))
        .unwrap()
        .iter()
        .map(|r| r.instance.draw())
        .collect()
}

#[test]
fn shapes_are_discovered_and_queried() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin(
        dir.path(),
        "plus-drawer",
        "META-INF/services",
        "shapes.plus.PlusDrawer",
        "shape=plus\ndescription=D1\n",
    );
    write_plugin(
        dir.path(),
        "min-drawer",
        "META-INF/services",
        "shapes.min.MinDrawer",
        "# comment\nshape = min\ndescription=D2\n",
    );

    let registry = Registry::new(Discovery::new(
        DirectoryScanProvider::new(dir.path()),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, factories())),
    ));

    let all = registry.all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].origin, "min-drawer");
    assert_eq!(all[0].implementation, "shapes.min.MinDrawer");

    assert_eq!(drawings(&registry, &[("shape", "plus")]), vec!["+"]);
    assert!(drawings(&registry, &[("shape", "hashtag")]).is_empty());
    assert_eq!(
        drawings(&registry, &[("shape", "plus"), ("description", "D1")]),
        vec!["+"]
    );
    assert_eq!(drawings(&registry, &[("description", "D2")]), vec!["-"]);
}

#[test]
fn identical_identifiers_in_two_plugins_stay_isolated() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin(dir.path(), "left", "META-INF/services", "shapes.Drawer", "shape=plus\n");
    write_plugin(dir.path(), "right", "META-INF/services", "shapes.Drawer", "shape=min\n");

    let table = FactoryTable::new()
        .with_scoped("left", "shapes.Drawer", || Arc::new(Plus) as Arc<dyn ShapeDrawer>)
        .with_scoped("right", "shapes.Drawer", || Arc::new(Min) as Arc<dyn ShapeDrawer>);
    let registry = Registry::new(Discovery::new(
        DirectoryScanProvider::new(dir.path()),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, table)),
    ));

    assert_eq!(drawings(&registry, &[("shape", "plus")]), vec!["+"]);
    assert_eq!(drawings(&registry, &[("shape", "min")]), vec!["-"]);
}

#[test]
fn plugins_sharing_a_directory_name_must_be_renamed() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin(
        &dir.path().join("vendor-a"),
        "drawer",
        "META-INF/services",
        "shapes.Drawer",
        "shape=plus\n",
    );
    write_plugin(
        &dir.path().join("vendor-b"),
        "drawer",
        "META-INF/services",
        "shapes.Drawer",
        "shape=min\n",
    );
    let vendor_a = ClasspathDescriptor::single(dir.path().join("vendor-a/drawer"));
    let vendor_b = ClasspathDescriptor::single(dir.path().join("vendor-b/drawer"));

    let table = || {
        FactoryTable::new()
            .with_scoped("drawer", "shapes.Drawer", || Arc::new(Plus) as Arc<dyn ShapeDrawer>)
            .with_scoped("vendor-b", "shapes.Drawer", || Arc::new(Min) as Arc<dyn ShapeDrawer>)
            .with("shapes.Drawer", || Arc::new(Min) as Arc<dyn ShapeDrawer>)
    };

    let clashing = Registry::new(Discovery::new(
        StaticClasspathProvider::new(vec![vendor_a.clone(), vendor_b.clone()]),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, table())),
    ));
    let err = clashing.all().unwrap_err();
    assert!(matches!(err, SideloadError::Configuration(_)));
    assert!(!clashing.is_initialized());

    let renamed = Registry::new(Discovery::new(
        StaticClasspathProvider::new(vec![vendor_a, vendor_b.with_name("vendor-b")]),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, table())),
    ));
    assert_eq!(drawings(&renamed, &[("shape", "plus")]), vec!["+"]);
    assert_eq!(drawings(&renamed, &[("shape", "min")]), vec!["-"]);
}

#[test]
fn custom_services_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin(
        dir.path(),
        "plus-drawer",
        "plugin-meta",
        "shapes.plus.PlusDrawer",
        "shape=plus\n",
    );
    let descriptor = ClasspathDescriptor::single(dir.path().join("plus-drawer"));

    let registry = Registry::new(
        Discovery::new(
            StaticClasspathProvider::new(vec![descriptor]),
            DirectoryLoader::new(
                ManifestSource::new(CAPABILITY, factories()).with_services_dir("plugin-meta"),
            ),
        )
        .with_resolver(PropertiesResolver::new("plugin-meta")),
    );

    assert_eq!(drawings(&registry, &[("shape", "plus")]), vec!["+"]);
}

#[test]
fn plugin_without_properties_only_matches_the_empty_filter() {
    let dir = tempfile::tempdir().unwrap();
    let services = dir.path().join("bare").join("META-INF/services");
    fs::create_dir_all(&services).unwrap();
    fs::write(services.join(CAPABILITY), "shapes.plus.PlusDrawer\n").unwrap();

    let registry = Registry::new(Discovery::new(
        DirectoryScanProvider::new(dir.path()),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, factories())),
    ));

    assert_eq!(drawings(&registry, &[]), vec!["+"]);
    assert!(drawings(&registry, &[("shape", "plus")]).is_empty());
    assert!(registry.all().unwrap()[0].properties.is_empty());
}

#[test]
fn undeclared_implementation_fails_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin(dir.path(), "ghost", "META-INF/services", "shapes.Ghost", "shape=boo\n");

    let registry = Registry::new(Discovery::new(
        DirectoryScanProvider::new(dir.path()),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, factories())),
    ));

    let err = registry.all().unwrap_err();
    assert!(matches!(err, SideloadError::UnknownImplementation { .. }));
    assert!(!registry.is_initialized());
}

#[test]
fn reload_sees_plugins_added_since_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_plugin(
        dir.path(),
        "plus-drawer",
        "META-INF/services",
        "shapes.plus.PlusDrawer",
        "shape=plus\n",
    );
    let registry = Registry::new(Discovery::new(
        DirectoryScanProvider::new(dir.path()),
        DirectoryLoader::new(ManifestSource::new(CAPABILITY, factories())),
    ));
    assert_eq!(registry.all().unwrap().len(), 1);

    write_plugin(
        dir.path(),
        "min-drawer",
        "META-INF/services",
        "shapes.min.MinDrawer",
        "shape=min\n",
    );
    assert_eq!(registry.all().unwrap().len(), 1);

    registry.reload();
    assert_eq!(registry.all().unwrap().len(), 2);
}
