//! Permission List
//!
//! Builds the categorized rows of the app permissions screen from a
//! permission catalog and drives the screen lifecycle:
//! - Allowed / denied lists of platform groups, in label order
//! - "Additional permissions" overflow for third-party groups
//! - Last-access summaries for tracked groups
//! - View-event logging and navigation requests

pub mod builder;
pub mod collaborators;
pub mod entry;
pub mod screen;
pub mod strings;
pub mod summary;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::PermissionListBuilder;
pub use collaborators::{
    AbsoluteUsageFormatter, CaseInsensitiveCollator, Clock, ConfigGroupPolicy, GroupPolicy,
    IdGenerator, LabelCollator, NoUsage, RandomIdGenerator, SequenceIdGenerator, UsageFormatter,
    UsageLookup,
};
pub use entry::{
    AdditionalPermissions, DisplayEntry, EntryCategory, ListCategory, OverflowEntry,
    PlaceholderEntry, RenderingPlan, Row, SummaryKind,
};
pub use screen::{
    AdditionalPermissionsScreen, AppPermissionsScreen, MenuItem, ScreenArgs, ScreenContext,
    ScreenHeader,
};
pub use strings::{PluralTemplate, ScreenStrings};
pub use telemetry::{PermissionViewLogger, TelemetrySink};
