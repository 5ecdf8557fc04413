//! Permission Groups
//!
//! A permission group as requested by one app, with its current grant state.

use serde::{Deserialize, Serialize};

/// Icon resource reference, resolved and tinted by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconRef {
    /// Package the icon resource lives in
    pub package: String,
    /// Resource name within that package (e.g., "ic_perm_camera")
    pub resource: String,
}

impl IconRef {
    pub fn new(package: &str, resource: &str) -> Self {
        Self {
            package: package.to_string(),
            resource: resource.to_string(),
        }
    }
}

/// Who declared a permission group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupOrigin {
    /// Declared by the operating system
    Platform,
    /// Declared by an installed app or library
    ThirdParty(String),
}

impl GroupOrigin {
    pub fn is_platform(&self) -> bool {
        matches!(self, GroupOrigin::Platform)
    }
}

/// Permission group requested by an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGroup {
    /// Group name, unique within a catalog (e.g., "android.permission-group.CAMERA")
    pub name: String,

    /// Package that declares the group
    pub declaring_package: String,

    /// Human-readable label
    pub label: String,

    #[serde(default)]
    pub icon: IconRef,

    /// Runtime permissions of the group are granted
    #[serde(default)]
    pub granted: bool,

    /// Granted only while the app is in the foreground
    #[serde(default)]
    pub foreground_only: bool,

    /// Usage of the group is tracked by the platform
    #[serde(default)]
    pub modern: bool,
}

impl PermissionGroup {
    /// Create an ungranted group declared by `declaring_package`
    pub fn new(name: &str, declaring_package: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            declaring_package: declaring_package.to_string(),
            label: label.to_string(),
            icon: IconRef::default(),
            granted: false,
            foreground_only: false,
            modern: false,
        }
    }

    pub fn granted(mut self, granted: bool) -> Self {
        self.granted = granted;
        self
    }

    pub fn foreground_only(mut self, foreground_only: bool) -> Self {
        self.foreground_only = foreground_only;
        self
    }

    pub fn modern(mut self, modern: bool) -> Self {
        self.modern = modern;
        self
    }

    pub fn with_icon(mut self, icon: IconRef) -> Self {
        self.icon = icon;
        self
    }

    /// Origin relative to the platform package identity
    pub fn origin(&self, os_package: &str) -> GroupOrigin {
        if self.declaring_package == os_package {
            GroupOrigin::Platform
        } else {
            GroupOrigin::ThirdParty(self.declaring_package.clone())
        }
    }

    /// Get the short name without the group prefix
    pub fn short_name(&self) -> &str {
        self.name
            .strip_prefix("android.permission-group.")
            .unwrap_or(&self.name)
    }
}
