//! Test fixtures shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use app_permissions_catalog::{
    InMemoryPermissionSource, InstalledPackage, PermissionCatalog, PermissionGroup,
};
use app_permissions_core::{AppIdentity, UserHandle};
use chrono::{DateTime, Utc};

use crate::collaborators::UsageLookup;

pub const PKG: &str = "com.example.app";
pub const UID: u32 = 10042;
pub const VENDOR: &str = "com.vendor";

pub fn platform(name: &str, label: &str) -> PermissionGroup {
    PermissionGroup::new(name, "android", label)
}

pub fn third_party(name: &str, label: &str) -> PermissionGroup {
    PermissionGroup::new(name, VENDOR, label)
}

pub fn source_of(groups: Vec<PermissionGroup>) -> Arc<InMemoryPermissionSource> {
    let package = groups
        .into_iter()
        .fold(InstalledPackage::new(PKG, UID, "Example"), InstalledPackage::with_group);
    let source = InMemoryPermissionSource::new();
    source.install(package);
    Arc::new(source)
}

pub fn catalog_of(groups: Vec<PermissionGroup>) -> PermissionCatalog {
    PermissionCatalog::load(source_of(groups), PKG, UserHandle::SYSTEM).unwrap()
}

/// Usage table keyed by group name
pub struct FixedUsage(HashMap<String, DateTime<Utc>>);

impl FixedUsage {
    pub fn new(entries: &[(&str, DateTime<Utc>)]) -> Self {
        Self(entries.iter().map(|(g, at)| (g.to_string(), *at)).collect())
    }
}

impl UsageLookup for FixedUsage {
    fn last_access(
        &self,
        _app: &AppIdentity,
        _user: UserHandle,
        group: &str,
    ) -> Option<DateTime<Utc>> {
        self.0.get(group).copied()
    }
}

/// Counts lookups and never finds usage
#[derive(Default)]
pub struct CountingUsage(AtomicUsize);

impl CountingUsage {
    pub fn lookups(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl UsageLookup for CountingUsage {
    fn last_access(
        &self,
        _app: &AppIdentity,
        _user: UserHandle,
        _group: &str,
    ) -> Option<DateTime<Utc>> {
        self.0.fetch_add(1, Ordering::SeqCst);
        None
    }
}
