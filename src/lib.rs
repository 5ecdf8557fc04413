//! App Permissions - permission settings screen core
//!
//! Lists the runtime permission groups an installed app requested, split
//! into allowed and denied, with permissions declared outside the platform
//! folded behind an "additional permissions" entry.
//!
//! ## Architecture
//!
//! - `app-permissions-core`: configuration, errors, event bus, shared types
//! - `app-permissions-catalog`: permission groups of one app and user, refreshed from the platform
//! - `app-permissions-list`: list building, summaries, view logging and screen lifecycle

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use app_permissions_catalog as catalog;
pub use app_permissions_core as core;
pub use app_permissions_list as list;

/// Prelude module for convenient imports
pub mod prelude {
    pub use app_permissions_catalog::{
        InMemoryPermissionSource, PermissionCatalog, PermissionGroup, PermissionSource,
    };
    pub use app_permissions_core::{
        AppConfig, Event, EventBus, ResolutionError, SessionId, UserHandle,
    };
    pub use app_permissions_list::{
        AppPermissionsScreen, PermissionListBuilder, RenderingPlan, Row, ScreenArgs, ScreenContext,
        ScreenStrings,
    };
}
