//! App Permissions Core - shared types
//!
//! Errors, configuration, the event bus and the identity/navigation/telemetry
//! types shared by the permission catalog and the permission list screens.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::{AppConfig, ScreenConfig, UsageConfig};
pub use error::{AppPermissionsError, ResolutionError, Result};
pub use events::{Event, EventBus, EventSubscription};
pub use types::{AppIdentity, NavigationRequest, SessionId, UserHandle, ViewCategory, ViewEvent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
