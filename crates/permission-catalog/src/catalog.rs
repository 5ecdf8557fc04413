//! Permission Catalog
//!
//! Snapshot of the permission groups one app requested under one user,
//! refreshed in place from the platform.

use std::fmt;
use std::sync::Arc;

use app_permissions_core::{AppIdentity, ResolutionError, UserHandle};
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::group::PermissionGroup;
use crate::source::{PackageMetadata, PermissionSource};

/// Called when a refresh finds the app can no longer be resolved
pub type InvalidationCallback = Box<dyn Fn() + Send + Sync>;

/// Catalog handle shared between a screen and its overflow screen
pub type SharedCatalog = Arc<RwLock<PermissionCatalog>>;

/// Permission groups of one (package, user) pair, ordered by label
pub struct PermissionCatalog {
    source: Arc<dyn PermissionSource>,
    user: UserHandle,
    package: PackageMetadata,
    groups: IndexMap<String, PermissionGroup>,
    on_invalidated: Option<InvalidationCallback>,
    revision: u64,
}

impl PermissionCatalog {
    /// Resolve `package` under `user` and read its permission groups
    pub fn load(
        source: Arc<dyn PermissionSource>,
        package: &str,
        user: UserHandle,
    ) -> Result<Self, ResolutionError> {
        let metadata = match source.resolve_package(package, user) {
            Ok(metadata) => metadata,
            Err(e) => {
                info!("No package {} for {}: {}", package, user, e);
                return Err(e);
            }
        };

        let groups = index_groups(source.permission_groups(&metadata, user));
        info!("Loaded {} permission groups for {} ({})", groups.len(), package, user);

        Ok(Self {
            source,
            user,
            package: metadata,
            groups,
            on_invalidated: None,
            revision: 0,
        })
    }

    /// Register the callback fired when the app context becomes invalid
    pub fn set_on_invalidated(&mut self, callback: InvalidationCallback) {
        self.on_invalidated = Some(callback);
    }

    pub fn with_on_invalidated(mut self, callback: InvalidationCallback) -> Self {
        self.set_on_invalidated(callback);
        self
    }

    /// Re-read grant state and group membership, replacing the held set
    ///
    /// If the package no longer resolves, the previous snapshot is kept and
    /// the invalidation callback fires.
    pub fn refresh(&mut self) {
        let package = self.package.identity.package_name.clone();

        match self.source.resolve_package(&package, self.user) {
            Ok(metadata) => {
                let groups = index_groups(self.source.permission_groups(&metadata, self.user));
                self.package = metadata;
                self.groups = groups;
                self.revision += 1;
                debug!(
                    "Refreshed {} ({} groups, revision {})",
                    package,
                    self.groups.len(),
                    self.revision
                );
            }
            Err(e) => {
                warn!("Refresh could not resolve {}: {}", package, e);
                if let Some(callback) = &self.on_invalidated {
                    callback();
                }
            }
        }
    }

    /// Groups in label order
    pub fn groups(&self) -> impl Iterator<Item = &PermissionGroup> {
        self.groups.values()
    }

    /// Owned copy of the groups in label order
    pub fn snapshot(&self) -> Vec<PermissionGroup> {
        self.groups.values().cloned().collect()
    }

    pub fn group(&self, name: &str) -> Option<&PermissionGroup> {
        self.groups.get(name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn package(&self) -> &PackageMetadata {
        &self.package
    }

    pub fn app(&self) -> &AppIdentity {
        &self.package.identity
    }

    pub fn user(&self) -> UserHandle {
        self.user
    }

    /// Number of successful refreshes since load
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn into_shared(self) -> SharedCatalog {
        Arc::new(RwLock::new(self))
    }
}

impl fmt::Debug for PermissionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionCatalog")
            .field("package", &self.package.identity.package_name)
            .field("user", &self.user)
            .field("groups", &self.groups.len())
            .field("revision", &self.revision)
            .finish()
    }
}

/// Key groups by name (first occurrence wins) and order them by label
fn index_groups(groups: Vec<PermissionGroup>) -> IndexMap<String, PermissionGroup> {
    let mut indexed = IndexMap::with_capacity(groups.len());
    for group in groups {
        if indexed.contains_key(&group.name) {
            warn!("Duplicate permission group {} ignored", group.name);
            continue;
        }
        indexed.insert(group.name.clone(), group);
    }
    indexed.sort_by(|_, a: &PermissionGroup, _, b: &PermissionGroup| a.label.cmp(&b.label));
    indexed
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::platform_groups;
    use crate::source::{InMemoryPermissionSource, InstalledPackage};

    const PKG: &str = "com.example.app";

    fn source() -> Arc<InMemoryPermissionSource> {
        let source = InMemoryPermissionSource::new();
        source.install(
            InstalledPackage::new(PKG, 10042, "Example")
                .with_group(PermissionGroup::new(platform_groups::STORAGE, "android", "Storage"))
                .with_group(
                    PermissionGroup::new(platform_groups::CAMERA, "android", "Camera")
                        .granted(true),
                )
                .with_group(PermissionGroup::new(platform_groups::LOCATION, "android", "Location")),
        );
        Arc::new(source)
    }

    fn names(catalog: &PermissionCatalog) -> Vec<&str> {
        catalog.groups().map(|g| g.name.as_str()).collect()
    }

    #[test]
    fn test_load_orders_by_label() {
        let catalog = PermissionCatalog::load(source(), PKG, UserHandle::SYSTEM).unwrap();

        assert_eq!(
            names(&catalog),
            vec![platform_groups::CAMERA, platform_groups::LOCATION, platform_groups::STORAGE]
        );
        assert_eq!(catalog.app().uid, 10042);
        assert_eq!(catalog.revision(), 0);
    }

    #[test]
    fn test_load_unknown_package() {
        let err = PermissionCatalog::load(source(), "com.example.missing", UserHandle::SYSTEM)
            .unwrap_err();
        assert_eq!(err.package(), "com.example.missing");

        let err = PermissionCatalog::load(source(), PKG, UserHandle(10)).unwrap_err();
        assert!(matches!(err, ResolutionError::PackageNotFound { .. }));
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let source = InMemoryPermissionSource::new();
        source.install(
            InstalledPackage::new(PKG, 1, "Example")
                .with_group(PermissionGroup::new("dup", "android", "First").granted(true))
                .with_group(PermissionGroup::new("dup", "android", "Second")),
        );

        let catalog = PermissionCatalog::load(Arc::new(source), PKG, UserHandle::SYSTEM).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.group("dup").unwrap().label, "First");
    }

    #[test]
    fn test_refresh_replaces_state() {
        let source = source();
        let mut catalog = PermissionCatalog::load(source.clone(), PKG, UserHandle::SYSTEM).unwrap();

        source.set_granted(PKG, UserHandle::SYSTEM, platform_groups::CAMERA, false);
        source.remove_group(PKG, UserHandle::SYSTEM, platform_groups::STORAGE);
        source.add_group(
            PKG,
            UserHandle::SYSTEM,
            PermissionGroup::new(platform_groups::MICROPHONE, "android", "Microphone")
                .granted(true),
        );

        catalog.refresh();
        catalog.refresh();

        assert!(!catalog.group(platform_groups::CAMERA).unwrap().granted);
        assert!(catalog.group(platform_groups::STORAGE).is_none());
        assert_eq!(
            names(&catalog),
            vec![platform_groups::CAMERA, platform_groups::LOCATION, platform_groups::MICROPHONE]
        );
        assert_eq!(catalog.revision(), 2);
    }

    #[test]
    fn test_refresh_after_uninstall_fires_callback() {
        let source = source();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();

        let mut catalog = PermissionCatalog::load(source.clone(), PKG, UserHandle::SYSTEM)
            .unwrap()
            .with_on_invalidated(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));

        source.uninstall(PKG, UserHandle::SYSTEM);
        catalog.refresh();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.revision(), 0);
    }

    #[test]
    fn test_shared_catalog_refresh_is_visible_to_all_holders() {
        let source = source();
        let shared = PermissionCatalog::load(source.clone(), PKG, UserHandle::SYSTEM)
            .unwrap()
            .into_shared();
        let lent = Arc::clone(&shared);

        source.set_granted(PKG, UserHandle::SYSTEM, platform_groups::LOCATION, true);
        lent.write().refresh();

        assert!(shared.read().group(platform_groups::LOCATION).unwrap().granted);
    }
}
