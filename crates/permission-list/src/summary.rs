//! Row Summaries
//!
//! Chooses between last-access text, never-accessed text and the generic
//! group description.

use app_permissions_catalog::PermissionGroup;
use chrono::{DateTime, Utc};

use crate::collaborators::UsageFormatter;
use crate::entry::SummaryKind;
use crate::strings::{fill, ScreenStrings};

/// Summary text with the kind that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub kind: SummaryKind,
    pub text: String,
}

impl Summary {
    fn new(kind: SummaryKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// Inputs that decide how a group is summarized
pub struct SummaryRules<'a> {
    pub strings: &'a ScreenStrings,
    pub formatter: &'a dyn UsageFormatter,
    /// "Never accessed" may replace an empty description
    pub permissions_hub_enabled: bool,
}

/// Generic description: the foreground-only subtitle for groups granted
/// only in the foreground, empty otherwise
pub fn group_description(group: &PermissionGroup, strings: &ScreenStrings) -> String {
    if group.granted && group.foreground_only {
        strings.only_in_foreground.clone()
    } else {
        String::new()
    }
}

impl SummaryRules<'_> {
    /// Summarize `group`
    ///
    /// `last_access` is only consulted when `tracks_usage` is set.
    pub fn summarize<F>(
        &self,
        group: &PermissionGroup,
        tracks_usage: bool,
        last_access: F,
    ) -> Summary
    where
        F: FnOnce() -> Option<DateTime<Utc>>,
    {
        if !tracks_usage {
            return Summary::new(SummaryKind::Description, group_description(group, self.strings));
        }

        if let Some(at) = last_access() {
            let when = self.formatter.format(at);
            return if group.granted {
                let text = fill(&self.strings.most_recent_access, &when);
                Summary::new(SummaryKind::MostRecentAccess, text)
            } else {
                let text = fill(&self.strings.most_recent_denied, &when);
                Summary::new(SummaryKind::MostRecentDenied, text)
            };
        }

        let description = group_description(group, self.strings);
        if description.is_empty() && self.permissions_hub_enabled {
            if group.granted {
                Summary::new(SummaryKind::NeverAccessed, self.strings.never_accessed.clone())
            } else {
                Summary::new(
                    SummaryKind::NeverAccessedDenied,
                    self.strings.never_accessed_denied.clone(),
                )
            }
        } else {
            Summary::new(SummaryKind::Description, description)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::TimeZone;

    use super::*;
    use crate::collaborators::{AbsoluteUsageFormatter, UsageFormatter};

    fn rules<'a>(
        strings: &'a ScreenStrings,
        formatter: &'a dyn UsageFormatter,
        hub: bool,
    ) -> SummaryRules<'a> {
        SummaryRules {
            strings,
            formatter,
            permissions_hub_enabled: hub,
        }
    }

    fn camera(granted: bool) -> PermissionGroup {
        PermissionGroup::new("android.permission-group.CAMERA", "android", "Camera")
            .granted(granted)
            .modern(true)
    }

    #[test]
    fn test_last_access_granted_and_denied() {
        let strings = ScreenStrings::default();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let formatter = AbsoluteUsageFormatter::in_zone(Utc).at(now);
        let rules = rules(&strings, &formatter, false);
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

        let granted = rules.summarize(&camera(true), true, || Some(at));
        assert_eq!(granted.kind, SummaryKind::MostRecentAccess);
        assert_eq!(granted.text, "Most recent access: 08:30");

        let denied = rules.summarize(&camera(false), true, || Some(at));
        assert_eq!(denied.kind, SummaryKind::MostRecentDenied);
        assert_eq!(denied.text, "Denied / Most recent access: 08:30");
    }

    #[test]
    fn test_never_accessed_needs_hub_and_empty_description() {
        let strings = ScreenStrings::default();
        let formatter = AbsoluteUsageFormatter::now();

        let without_hub =
            rules(&strings, &formatter, false).summarize(&camera(true), true, || None);
        assert_eq!(without_hub, Summary::new(SummaryKind::Description, String::new()));

        let with_hub = rules(&strings, &formatter, true);
        assert_eq!(with_hub.summarize(&camera(true), true, || None).text, "Never accessed");
        assert_eq!(
            with_hub.summarize(&camera(false), true, || None).text,
            "Denied / Never accessed"
        );

        let foreground = camera(true).foreground_only(true);
        let summary = with_hub.summarize(&foreground, true, || None);
        assert_eq!(summary.kind, SummaryKind::Description);
        assert_eq!(summary.text, "Only while app is in use");
    }

    #[test]
    fn test_untracked_group_skips_lookup() {
        let strings = ScreenStrings::default();
        let formatter = AbsoluteUsageFormatter::now();
        let looked_up = Cell::new(false);

        let summary = rules(&strings, &formatter, true).summarize(&camera(true), false, || {
            looked_up.set(true);
            None
        });

        assert!(!looked_up.get());
        assert_eq!(summary.kind, SummaryKind::Description);
    }
}
