//! Collaborators
//!
//! Platform services the list builder consumes: label collation, group
//! visibility, usage lookup, timestamp formatting and view-id generation.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use app_permissions_catalog::{InMemoryPermissionSource, PermissionGroup};
use app_permissions_core::{AppConfig, AppIdentity, UserHandle};
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Locale-aware label comparison
pub trait LabelCollator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Case-insensitive comparison, the fallback when no locale collator is supplied
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveCollator;

impl LabelCollator for CaseInsensitiveCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.to_lowercase().cmp(&b.to_lowercase())
    }
}

/// Which groups are surfaced, and which show usage
pub trait GroupPolicy: Send + Sync {
    /// Whether the group is ever shown to the user
    fn should_show(&self, group: &PermissionGroup) -> bool;

    /// Whether usage summaries apply to the group
    fn should_show_usage(&self, group: &PermissionGroup) -> bool;
}

/// Group policy driven by [`AppConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigGroupPolicy {
    config: AppConfig,
}

impl ConfigGroupPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl GroupPolicy for ConfigGroupPolicy {
    fn should_show(&self, group: &PermissionGroup) -> bool {
        !self.config.is_hidden_group(&group.name)
    }

    fn should_show_usage(&self, group: &PermissionGroup) -> bool {
        self.config.usage.shows_usage_for(&group.name)
    }
}

/// Last-access lookup keyed by group
pub trait UsageLookup: Send + Sync {
    fn last_access(
        &self,
        app: &AppIdentity,
        user: UserHandle,
        group: &str,
    ) -> Option<DateTime<Utc>>;
}

/// No usage data available
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUsage;

impl UsageLookup for NoUsage {
    fn last_access(
        &self,
        _app: &AppIdentity,
        _user: UserHandle,
        _group: &str,
    ) -> Option<DateTime<Utc>> {
        None
    }
}

impl UsageLookup for InMemoryPermissionSource {
    fn last_access(
        &self,
        app: &AppIdentity,
        user: UserHandle,
        group: &str,
    ) -> Option<DateTime<Utc>> {
        InMemoryPermissionSource::last_access(self, &app.package_name, user, group)
    }
}

/// Renders a last-access timestamp for a summary line
pub trait UsageFormatter: Send + Sync {
    fn format(&self, at: DateTime<Utc>) -> String;
}

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Absolute form: time of day for accesses on the current day, the date otherwise
///
/// The current time is read on every call and day boundaries follow `zone`.
#[derive(Clone)]
pub struct AbsoluteUsageFormatter<Tz: TimeZone = Local> {
    zone: Tz,
    clock: Clock,
}

impl AbsoluteUsageFormatter<Local> {
    /// Format in the host time zone against the system clock
    pub fn now() -> Self {
        Self::in_zone(Local)
    }
}

impl<Tz: TimeZone> AbsoluteUsageFormatter<Tz> {
    pub fn in_zone(zone: Tz) -> Self {
        Self {
            zone,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Format against a fixed reference time
    pub fn at(self, reference: DateTime<Utc>) -> Self {
        self.with_clock(Arc::new(move || reference))
    }
}

impl Default for AbsoluteUsageFormatter {
    fn default() -> Self {
        Self::now()
    }
}

impl<Tz> UsageFormatter for AbsoluteUsageFormatter<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: fmt::Display,
{
    fn format(&self, at: DateTime<Utc>) -> String {
        let reference = (self.clock)().with_timezone(&self.zone);
        let at = at.with_timezone(&self.zone);

        if at.date_naive() == reference.date_naive() {
            at.format("%H:%M").to_string()
        } else if at.year() == reference.year() {
            at.format("%b %-d").to_string()
        } else {
            at.format("%b %-d, %Y").to_string()
        }
    }
}

/// Source of view ids for view-event logging
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> i64;
}

/// Random view ids
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> i64 {
        uuid::Uuid::new_v4().as_u64_pair().0 as i64
    }
}

/// Cycles through a fixed sequence of ids
#[derive(Debug)]
pub struct SequenceIdGenerator {
    ids: Vec<i64>,
    next: AtomicUsize,
}

impl SequenceIdGenerator {
    pub fn new(ids: Vec<i64>) -> Self {
        Self {
            ids,
            next: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> i64 {
        if self.ids.is_empty() {
            return 0;
        }
        let index = self.next.fetch_add(1, AtomicOrdering::Relaxed) % self.ids.len();
        self.ids[index]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicI64;

    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn test_case_insensitive_collator() {
        let collator = CaseInsensitiveCollator;
        assert_eq!(collator.compare("camera", "Contacts"), Ordering::Less);
        assert_eq!(collator.compare("SMS", "sms"), Ordering::Equal);
    }

    #[test]
    fn test_config_policy() {
        let mut config = AppConfig::default();
        config.screen.hidden_groups.push("hidden".into());
        config.usage.excluded_groups.push("quiet".into());
        let policy = ConfigGroupPolicy::from_config(&config);

        assert!(!policy.should_show(&PermissionGroup::new("hidden", "android", "Hidden")));
        assert!(policy.should_show(&PermissionGroup::new("quiet", "android", "Quiet")));
        assert!(!policy.should_show_usage(&PermissionGroup::new("quiet", "android", "Quiet")));
        assert!(policy.should_show_usage(&PermissionGroup::new("loud", "android", "Loud")));
    }

    #[test]
    fn test_config_policy_follows_usage_switch() {
        let mut config = AppConfig::default();
        config.usage.permission_usage_enabled = false;
        let policy = ConfigGroupPolicy::from_config(&config);
        let camera = PermissionGroup::new("android.permission-group.CAMERA", "android", "Camera");

        assert!(policy.should_show(&camera));
        assert!(!policy.should_show_usage(&camera));
        assert_eq!(
            policy.should_show_usage(&camera),
            config.usage.shows_usage_for(&camera.name)
        );
    }

    #[test]
    fn test_absolute_formatter() {
        let reference = Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap();
        let formatter = AbsoluteUsageFormatter::in_zone(Utc).at(reference);

        let format = |at: DateTime<Utc>| formatter.format(at);
        assert_eq!(format(Utc.with_ymd_and_hms(2026, 10, 19, 9, 5, 0).unwrap()), "09:05");
        assert_eq!(format(Utc.with_ymd_and_hms(2026, 3, 2, 9, 5, 0).unwrap()), "Mar 2");
        assert_eq!(
            format(Utc.with_ymd_and_hms(2025, 12, 31, 23, 5, 0).unwrap()),
            "Dec 31, 2025"
        );
    }

    #[test]
    fn test_formatter_uses_zone_day_boundary() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        // 01:30 on Oct 20 in the +02:00 zone
        let reference = Utc.with_ymd_and_hms(2026, 10, 19, 23, 30, 0).unwrap();
        let formatter = AbsoluteUsageFormatter::in_zone(zone).at(reference);

        let just_after_midnight = Utc.with_ymd_and_hms(2026, 10, 19, 22, 45, 0).unwrap();
        let before_midnight = Utc.with_ymd_and_hms(2026, 10, 19, 21, 30, 0).unwrap();
        assert_eq!(formatter.format(just_after_midnight), "00:45");
        assert_eq!(formatter.format(before_midnight), "Oct 19");
    }

    #[test]
    fn test_formatter_reads_clock_per_call() {
        let day = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let now = Arc::new(AtomicI64::new(day.timestamp()));
        let clock_now = Arc::clone(&now);
        let formatter = AbsoluteUsageFormatter::in_zone(Utc).with_clock(Arc::new(move || {
            Utc.timestamp_opt(clock_now.load(AtomicOrdering::SeqCst), 0).unwrap()
        }));
        let next_morning = Utc.with_ymd_and_hms(2026, 10, 20, 7, 15, 0).unwrap();

        assert_eq!(formatter.format(next_morning), "Oct 20");

        now.store(next_morning.timestamp() + 3600, AtomicOrdering::SeqCst);
        assert_eq!(formatter.format(next_morning), "07:15");
    }

    #[test]
    fn test_sequence_ids_cycle() {
        let ids = SequenceIdGenerator::new(vec![7, 8]);
        assert_eq!(ids.next_id(), 7);
        assert_eq!(ids.next_id(), 8);
        assert_eq!(ids.next_id(), 7);
        assert_eq!(SequenceIdGenerator::new(Vec::new()).next_id(), 0);
    }
}
