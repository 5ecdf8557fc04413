//! Permission Group Catalog
//!
//! Holds the permission groups an installed app requested under one user
//! and re-reads them from the platform on demand.

pub mod catalog;
pub mod group;
pub mod source;

pub use catalog::{InvalidationCallback, PermissionCatalog, SharedCatalog};
pub use group::{GroupOrigin, IconRef, PermissionGroup};
pub use source::{
    DeviceFixture, InMemoryPermissionSource, InstalledPackage, PackageMetadata, PermissionSource,
};

/// Platform-declared runtime permission groups
pub mod platform_groups {
    pub const CALENDAR: &str = "android.permission-group.CALENDAR";
    pub const CALL_LOG: &str = "android.permission-group.CALL_LOG";
    pub const CAMERA: &str = "android.permission-group.CAMERA";
    pub const CONTACTS: &str = "android.permission-group.CONTACTS";
    pub const LOCATION: &str = "android.permission-group.LOCATION";
    pub const MICROPHONE: &str = "android.permission-group.MICROPHONE";
    pub const PHONE: &str = "android.permission-group.PHONE";
    pub const SENSORS: &str = "android.permission-group.SENSORS";
    pub const SMS: &str = "android.permission-group.SMS";
    pub const STORAGE: &str = "android.permission-group.STORAGE";

    /// Groups with no user-facing meaning
    pub const UNDEFINED: &str = "android.permission-group.UNDEFINED";
}
