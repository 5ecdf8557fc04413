//! Permission List Builder
//!
//! Turns a catalog snapshot into a rendering plan: platform groups split
//! into allowed and denied lists in label order, third-party groups folded
//! behind one overflow entry per list, placeholders for empty lists.

use std::sync::Arc;

use app_permissions_catalog::{IconRef, PermissionCatalog, PermissionGroup};
use app_permissions_core::config::DEFAULT_OS_PACKAGE;
use app_permissions_core::AppConfig;
use tracing::debug;

use crate::collaborators::{
    AbsoluteUsageFormatter, CaseInsensitiveCollator, ConfigGroupPolicy, GroupPolicy, LabelCollator,
    NoUsage, UsageFormatter, UsageLookup,
};
use crate::entry::{
    AdditionalPermissions, DisplayEntry, EntryCategory, ListCategory, OverflowEntry,
    PlaceholderEntry, RenderingPlan, Row, OVERFLOW_ALLOWED_KEY, OVERFLOW_DENIED_KEY,
    OVERFLOW_ICON,
};
use crate::strings::ScreenStrings;
use crate::summary::SummaryRules;

/// Builds rendering plans from catalog snapshots
pub struct PermissionListBuilder {
    strings: ScreenStrings,
    os_package: String,
    collator: Box<dyn LabelCollator>,
    policy: Box<dyn GroupPolicy>,
    usage: Arc<dyn UsageLookup>,
    formatter: Box<dyn UsageFormatter>,
    permissions_hub_enabled: bool,
}

#[derive(Default)]
struct Buckets {
    allowed: Vec<DisplayEntry>,
    denied: Vec<DisplayEntry>,
    extra_allowed: Vec<DisplayEntry>,
    extra_denied: Vec<DisplayEntry>,
}

impl PermissionListBuilder {
    /// Builder showing every group, with no usage data
    pub fn new(strings: ScreenStrings) -> Self {
        Self {
            strings,
            os_package: DEFAULT_OS_PACKAGE.to_string(),
            collator: Box::new(CaseInsensitiveCollator),
            policy: Box::new(ConfigGroupPolicy::from_config(&AppConfig::default())),
            usage: Arc::new(NoUsage),
            formatter: Box::new(AbsoluteUsageFormatter::now()),
            permissions_hub_enabled: false,
        }
    }

    /// Builder following the screen and usage settings of `config`
    pub fn from_config(
        config: &AppConfig,
        strings: ScreenStrings,
        usage: Arc<dyn UsageLookup>,
    ) -> Self {
        Self::new(strings)
            .with_os_package(&config.screen.os_package)
            .with_policy(Box::new(ConfigGroupPolicy::from_config(config)))
            .with_usage(usage)
            .with_permissions_hub(config.usage.permissions_hub_enabled)
    }

    pub fn with_os_package(mut self, os_package: &str) -> Self {
        self.os_package = os_package.to_string();
        self
    }

    pub fn with_collator(mut self, collator: Box<dyn LabelCollator>) -> Self {
        self.collator = collator;
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn GroupPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_usage(mut self, usage: Arc<dyn UsageLookup>) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_formatter(mut self, formatter: Box<dyn UsageFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_permissions_hub(mut self, enabled: bool) -> Self {
        self.permissions_hub_enabled = enabled;
        self
    }

    pub fn strings(&self) -> &ScreenStrings {
        &self.strings
    }

    pub fn os_package(&self) -> &str {
        &self.os_package
    }

    /// Build the plan for `catalog`, optionally restricted to one group
    pub fn build(&self, catalog: &PermissionCatalog, filter: Option<&str>) -> RenderingPlan {
        let mut groups: Vec<&PermissionGroup> = catalog
            .groups()
            .filter(|group| filter.map_or(true, |name| group.name == name))
            .filter(|group| self.policy.should_show(group))
            .collect();
        groups.sort_by(|a, b| self.collator.compare(&a.label, &b.label));

        let mut buckets = Buckets::default();
        for group in groups {
            let entry = self.entry_for(catalog, group);
            let platform = group.origin(&self.os_package).is_platform();
            let bucket = match (platform, group.granted) {
                (true, true) => &mut buckets.allowed,
                (true, false) => &mut buckets.denied,
                (false, true) => &mut buckets.extra_allowed,
                (false, false) => &mut buckets.extra_denied,
            };
            bucket.push(entry);
        }

        debug!(
            "Built plan for {}: {} allowed, {} denied, {} additional allowed, {} additional denied",
            catalog.app().package_name,
            buckets.allowed.len(),
            buckets.denied.len(),
            buckets.extra_allowed.len(),
            buckets.extra_denied.len()
        );

        let allowed =
            self.top_level(buckets.allowed, &buckets.extra_allowed, ListCategory::Allowed);
        let denied = self.top_level(buckets.denied, &buckets.extra_denied, ListCategory::Denied);

        RenderingPlan {
            allowed,
            denied,
            additional: AdditionalPermissions {
                allowed: self.rows_or_placeholder(buckets.extra_allowed, ListCategory::Allowed),
                denied: self.rows_or_placeholder(buckets.extra_denied, ListCategory::Denied),
            },
        }
    }

    fn entry_for(&self, catalog: &PermissionCatalog, group: &PermissionGroup) -> DisplayEntry {
        let rules = SummaryRules {
            strings: &self.strings,
            formatter: self.formatter.as_ref(),
            permissions_hub_enabled: self.permissions_hub_enabled,
        };
        let tracks_usage = group.modern && self.policy.should_show_usage(group);
        let summary = rules.summarize(group, tracks_usage, || {
            self.usage.last_access(catalog.app(), catalog.user(), &group.name)
        });

        DisplayEntry {
            key: group.name.clone(),
            title: group.label.clone(),
            icon: group.icon.clone(),
            summary: summary.text,
            summary_kind: summary.kind,
            category: EntryCategory::from_grant(group.granted, group.foreground_only),
            foreground_only: group.foreground_only,
        }
    }

    fn top_level(
        &self,
        entries: Vec<DisplayEntry>,
        extra: &[DisplayEntry],
        category: ListCategory,
    ) -> Vec<Row> {
        let mut rows: Vec<Row> = entries.into_iter().map(Row::Permission).collect();
        if !extra.is_empty() {
            rows.push(Row::Overflow(self.overflow(extra.len(), category)));
        }
        if rows.is_empty() {
            rows.push(self.placeholder(category));
        }
        rows
    }

    fn rows_or_placeholder(&self, entries: Vec<DisplayEntry>, category: ListCategory) -> Vec<Row> {
        if entries.is_empty() {
            vec![self.placeholder(category)]
        } else {
            entries.into_iter().map(Row::Permission).collect()
        }
    }

    fn overflow(&self, count: usize, category: ListCategory) -> OverflowEntry {
        let key = match category {
            ListCategory::Allowed => OVERFLOW_ALLOWED_KEY,
            ListCategory::Denied => OVERFLOW_DENIED_KEY,
        };
        OverflowEntry {
            key: key.to_string(),
            title: self.strings.additional_permissions.clone(),
            icon: IconRef::new(&self.os_package, OVERFLOW_ICON),
            summary: self.strings.additional_permissions_more.format(count),
            category,
            count,
        }
    }

    fn placeholder(&self, category: ListCategory) -> Row {
        let title = match category {
            ListCategory::Allowed => &self.strings.no_permissions_allowed,
            ListCategory::Denied => &self.strings.no_permissions_denied,
        };
        Row::Placeholder(PlaceholderEntry {
            title: title.clone(),
            category,
        })
    }
}

impl Default for PermissionListBuilder {
    fn default() -> Self {
        Self::new(ScreenStrings::default())
    }
}
