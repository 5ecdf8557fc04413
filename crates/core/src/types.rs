//! Shared Types
//!
//! Identity, navigation and view-event types exchanged between the
//! permission catalog, the list builder and the host.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User profile a package is installed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserHandle(pub u32);

impl UserHandle {
    /// The system (primary) user
    pub const SYSTEM: UserHandle = UserHandle(0);

    pub fn id(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {}", self.0)
    }
}

/// Identifier tying together all screens of one permission-settings visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl SessionId {
    /// Session id used when the caller did not supply one
    pub const INVALID: SessionId = SessionId(0);

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

/// Identity of the app whose permissions are shown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppIdentity {
    /// Package name (e.g., "com.example.app")
    pub package_name: String,
    /// Kernel uid of the package under its user
    pub uid: u32,
}

/// Categorical bucket of a logged permission row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewCategory {
    Allowed,
    AllowedForeground,
    Denied,
}

impl ViewCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewCategory::Allowed => "allowed",
            ViewCategory::AllowedForeground => "allowed_foreground",
            ViewCategory::Denied => "denied",
        }
    }
}

impl fmt::Display for ViewCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One "app permissions viewed" record, emitted per visible row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEvent {
    pub session_id: SessionId,
    /// Shared by every record of one view pass
    pub view_id: i64,
    /// `None` for synthesized overflow rows
    pub permission_group_name: Option<String>,
    pub app: AppIdentity,
    pub category: ViewCategory,
}

/// Navigation the host should perform on behalf of a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationRequest {
    /// Every permission the app requested, optionally restricted to one group
    AllPermissions {
        package: String,
        user: UserHandle,
        filter_group: Option<String>,
    },
    /// Permissions declared by packages other than the platform
    AdditionalPermissions {
        package: String,
        user: UserHandle,
        session_id: SessionId,
    },
    /// Per-group grant handler
    PermissionGroup {
        package: String,
        user: UserHandle,
        group: String,
        session_id: SessionId,
    },
    /// System app-details page
    AppInfo { package: String },
    /// Help page for a topic
    Help { topic: String },
    /// Return to the previous screen
    Back,
}
