//! Error types for the app permissions screen
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::types::UserHandle;

/// Failure to resolve a package under a user.
///
/// This is the only failure the screen core raises. It is reported once at
/// load time and ends the screen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Package {package} not found for {user}")]
    PackageNotFound { package: String, user: UserHandle },

    #[error("{user} is not accessible when resolving {package}")]
    UserNotAccessible { package: String, user: UserHandle },
}

impl ResolutionError {
    /// Package name that failed to resolve
    pub fn package(&self) -> &str {
        match self {
            ResolutionError::PackageNotFound { package, .. }
            | ResolutionError::UserNotAccessible { package, .. } => package,
        }
    }
}

/// Main error type for the app permissions crates
#[derive(Error, Debug)]
pub enum AppPermissionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Result type alias for app permissions operations
pub type Result<T> = std::result::Result<T, AppPermissionsError>;

impl AppPermissionsError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppPermissionsError::Resolution(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            AppPermissionsError::Io(e) => format!("File operation failed: {}", e),
            AppPermissionsError::Config(msg) => format!("Configuration error: {}", msg),
            AppPermissionsError::Resolution(_) => "App not found".to_string(),
            _ => self.to_string(),
        }
    }
}
