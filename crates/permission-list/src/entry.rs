//! Rendering Plan
//!
//! Rows and lists produced by the list builder. Plans are immutable values,
//! rebuilt wholesale on every refresh.

use app_permissions_catalog::IconRef;
use serde::Serialize;

/// Row key of the overflow entry in the allowed list
pub const OVERFLOW_ALLOWED_KEY: &str = "additional_permissions_allowed";

/// Row key of the overflow entry in the denied list
pub const OVERFLOW_DENIED_KEY: &str = "additional_permissions_denied";

/// Icon resource of the overflow entry
pub const OVERFLOW_ICON: &str = "ic_toc";

/// The list a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListCategory {
    Allowed,
    Denied,
}

/// Grant category of a permission row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    Allowed,
    AllowedForeground,
    Denied,
}

impl EntryCategory {
    pub fn from_grant(granted: bool, foreground_only: bool) -> Self {
        match (granted, foreground_only) {
            (false, _) => EntryCategory::Denied,
            (true, true) => EntryCategory::AllowedForeground,
            (true, false) => EntryCategory::Allowed,
        }
    }

    pub fn list(&self) -> ListCategory {
        match self {
            EntryCategory::Allowed | EntryCategory::AllowedForeground => ListCategory::Allowed,
            EntryCategory::Denied => ListCategory::Denied,
        }
    }
}

/// Which summary text a permission row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    MostRecentAccess,
    MostRecentDenied,
    NeverAccessed,
    NeverAccessedDenied,
    Description,
}

/// A row for a real permission group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    /// Group name
    pub key: String,
    pub title: String,
    pub icon: IconRef,
    pub summary: String,
    pub summary_kind: SummaryKind,
    pub category: EntryCategory,
    pub foreground_only: bool,
}

/// Synthesized "+N more" row leading to the additional permissions view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverflowEntry {
    pub key: String,
    pub title: String,
    pub icon: IconRef,
    pub summary: String,
    pub category: ListCategory,
    /// Number of groups behind the entry
    pub count: usize,
}

/// Non-selectable "no permissions" row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderEntry {
    pub title: String,
    pub category: ListCategory,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Row {
    Permission(DisplayEntry),
    Overflow(OverflowEntry),
    Placeholder(PlaceholderEntry),
}

impl Row {
    /// Stable key; placeholders have none
    pub fn key(&self) -> Option<&str> {
        match self {
            Row::Permission(entry) => Some(&entry.key),
            Row::Overflow(entry) => Some(&entry.key),
            Row::Placeholder(_) => None,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Row::Permission(entry) => &entry.title,
            Row::Overflow(entry) => &entry.title,
            Row::Placeholder(entry) => &entry.title,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            Row::Permission(entry) => Some(&entry.summary),
            Row::Overflow(entry) => Some(&entry.summary),
            Row::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Row::Placeholder(_))
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_placeholder()
    }

    pub fn as_permission(&self) -> Option<&DisplayEntry> {
        match self {
            Row::Permission(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Third-party groups shown behind the overflow entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdditionalPermissions {
    pub allowed: Vec<Row>,
    pub denied: Vec<Row>,
}

/// Everything the primary and additional permission views render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderingPlan {
    pub allowed: Vec<Row>,
    pub denied: Vec<Row>,
    pub additional: AdditionalPermissions,
}

impl RenderingPlan {
    /// Top-level list for a category
    pub fn list(&self, category: ListCategory) -> &[Row] {
        match category {
            ListCategory::Allowed => &self.allowed,
            ListCategory::Denied => &self.denied,
        }
    }

    /// Top-level rows followed by additional-permission rows
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.allowed
            .iter()
            .chain(&self.denied)
            .chain(&self.additional.allowed)
            .chain(&self.additional.denied)
    }

    /// Find a selectable row of the two top-level lists by key
    pub fn find_top_level(&self, key: &str) -> Option<&Row> {
        self.allowed
            .iter()
            .chain(&self.denied)
            .find(|row| row.key() == Some(key))
    }

    /// Real permission rows, in list order
    pub fn entries(&self) -> impl Iterator<Item = &DisplayEntry> {
        self.rows().filter_map(Row::as_permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_category() {
        assert_eq!(EntryCategory::from_grant(false, true), EntryCategory::Denied);
        assert_eq!(EntryCategory::from_grant(true, true), EntryCategory::AllowedForeground);
        assert_eq!(EntryCategory::AllowedForeground.list(), ListCategory::Allowed);
    }

    #[test]
    fn test_placeholder_has_no_key_or_summary() {
        let row = Row::Placeholder(PlaceholderEntry {
            title: "No permissions denied".into(),
            category: ListCategory::Denied,
        });

        assert!(row.key().is_none());
        assert!(row.summary().is_none());
        assert!(!row.is_selectable());
    }

    #[test]
    fn test_row_serializes_with_type_tag() {
        let row = Row::Placeholder(PlaceholderEntry {
            title: "No permissions allowed".into(),
            category: ListCategory::Allowed,
        });
        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["type"], "placeholder");
        assert_eq!(json["category"], "allowed");
    }
}
