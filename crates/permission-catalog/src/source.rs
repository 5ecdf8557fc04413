//! Platform Permission Source
//!
//! The seam between the catalog and the platform's package and permission
//! subsystems, plus an in-memory implementation for tests and the CLI.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use app_permissions_core::{AppIdentity, ResolutionError, Result, UserHandle};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::group::{IconRef, PermissionGroup};

/// Installed-package metadata needed by the permissions screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub identity: AppIdentity,
    /// App label shown in the screen header
    pub label: String,
    #[serde(default)]
    pub icon: IconRef,
}

/// Platform permission subsystem for one device
pub trait PermissionSource: Send + Sync {
    /// Resolve a package under a user
    fn resolve_package(
        &self,
        package: &str,
        user: UserHandle,
    ) -> std::result::Result<PackageMetadata, ResolutionError>;

    /// Current permission groups the package requested, with grant state
    fn permission_groups(
        &self,
        package: &PackageMetadata,
        user: UserHandle,
    ) -> Vec<PermissionGroup>;
}

/// An installed package as described in a fixture file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledPackage {
    pub package_name: String,
    pub uid: u32,
    #[serde(default = "default_user")]
    pub user: UserHandle,
    pub label: String,
    #[serde(default)]
    pub icon: IconRef,
    #[serde(default)]
    pub groups: Vec<PermissionGroup>,
    /// Last access per group name
    #[serde(default)]
    pub last_access: BTreeMap<String, DateTime<Utc>>,
}

fn default_user() -> UserHandle {
    UserHandle::SYSTEM
}

impl InstalledPackage {
    pub fn new(package_name: &str, uid: u32, label: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            uid,
            user: UserHandle::SYSTEM,
            label: label.to_string(),
            icon: IconRef::default(),
            groups: Vec::new(),
            last_access: BTreeMap::new(),
        }
    }

    pub fn for_user(mut self, user: UserHandle) -> Self {
        self.user = user;
        self
    }

    pub fn with_group(mut self, group: PermissionGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn accessed(mut self, group: &str, at: DateTime<Utc>) -> Self {
        self.last_access.insert(group.to_string(), at);
        self
    }

    fn metadata(&self) -> PackageMetadata {
        PackageMetadata {
            identity: AppIdentity {
                package_name: self.package_name.clone(),
                uid: self.uid,
            },
            label: self.label.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Fixture file layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceFixture {
    #[serde(default)]
    pub packages: Vec<InstalledPackage>,
    /// Users the caller may not query
    #[serde(default)]
    pub inaccessible_users: Vec<UserHandle>,
}

/// In-memory device state
///
/// Interior mutability lets tests change grant state behind a loaded
/// catalog, the way background permission changes happen on a device.
#[derive(Default)]
pub struct InMemoryPermissionSource {
    packages: RwLock<HashMap<(UserHandle, String), InstalledPackage>>,
    inaccessible_users: RwLock<HashSet<UserHandle>>,
}

impl InMemoryPermissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a fixture description
    pub fn from_fixture(fixture: DeviceFixture) -> Self {
        let source = Self::new();
        for package in fixture.packages {
            source.install(package);
        }
        source.inaccessible_users.write().extend(fixture.inaccessible_users);
        source
    }

    /// Parse a JSON fixture
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: DeviceFixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Read a JSON fixture file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn install(&self, package: InstalledPackage) {
        debug!("Installing {} for {}", package.package_name, package.user);
        self.packages
            .write()
            .insert((package.user, package.package_name.clone()), package);
    }

    pub fn uninstall(&self, package: &str, user: UserHandle) -> bool {
        self.packages.write().remove(&(user, package.to_string())).is_some()
    }

    pub fn deny_user_access(&self, user: UserHandle) {
        self.inaccessible_users.write().insert(user);
    }

    /// Change the grant state of a group; returns false if it does not exist
    pub fn set_granted(&self, package: &str, user: UserHandle, group: &str, granted: bool) -> bool {
        self.update_group(package, user, group, |g| g.granted = granted)
    }

    pub fn add_group(&self, package: &str, user: UserHandle, group: PermissionGroup) -> bool {
        match self.packages.write().get_mut(&(user, package.to_string())) {
            Some(installed) => {
                installed.groups.push(group);
                true
            }
            None => false,
        }
    }

    pub fn remove_group(&self, package: &str, user: UserHandle, group: &str) -> bool {
        match self.packages.write().get_mut(&(user, package.to_string())) {
            Some(installed) => {
                let before = installed.groups.len();
                installed.groups.retain(|g| g.name != group);
                installed.groups.len() != before
            }
            None => false,
        }
    }

    pub fn record_access(&self, package: &str, user: UserHandle, group: &str, at: DateTime<Utc>) {
        if let Some(installed) = self.packages.write().get_mut(&(user, package.to_string())) {
            installed.last_access.insert(group.to_string(), at);
        }
    }

    /// Last recorded access of a group by a package
    pub fn last_access(
        &self,
        package: &str,
        user: UserHandle,
        group: &str,
    ) -> Option<DateTime<Utc>> {
        self.packages
            .read()
            .get(&(user, package.to_string()))
            .and_then(|p| p.last_access.get(group).copied())
    }

    fn update_group<F>(&self, package: &str, user: UserHandle, group: &str, update: F) -> bool
    where
        F: FnOnce(&mut PermissionGroup),
    {
        let mut packages = self.packages.write();
        let found = packages
            .get_mut(&(user, package.to_string()))
            .and_then(|p| p.groups.iter_mut().find(|g| g.name == group));

        match found {
            Some(g) => {
                update(g);
                true
            }
            None => false,
        }
    }
}

impl PermissionSource for InMemoryPermissionSource {
    fn resolve_package(
        &self,
        package: &str,
        user: UserHandle,
    ) -> std::result::Result<PackageMetadata, ResolutionError> {
        if self.inaccessible_users.read().contains(&user) {
            return Err(ResolutionError::UserNotAccessible {
                package: package.to_string(),
                user,
            });
        }

        self.packages
            .read()
            .get(&(user, package.to_string()))
            .map(InstalledPackage::metadata)
            .ok_or_else(|| ResolutionError::PackageNotFound {
                package: package.to_string(),
                user,
            })
    }

    fn permission_groups(
        &self,
        package: &PackageMetadata,
        user: UserHandle,
    ) -> Vec<PermissionGroup> {
        self.packages
            .read()
            .get(&(user, package.identity.package_name.clone()))
            .map(|p| p.groups.clone())
            .unwrap_or_default()
    }
}
