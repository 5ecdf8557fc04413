//! View-Event Logging
//!
//! One record per visible row of the primary view, sharing a single view id.

use std::sync::Arc;

use app_permissions_core::{AppIdentity, Event, EventBus, SessionId, ViewCategory, ViewEvent};
use tracing::debug;

use crate::collaborators::IdGenerator;
use crate::entry::{EntryCategory, ListCategory, RenderingPlan, Row};

/// Destination for view-event records
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: &ViewEvent);
}

impl TelemetrySink for EventBus {
    fn record(&self, event: &ViewEvent) {
        self.emit(Event::PermissionsViewed(event.clone()));
    }
}

/// Bucket of a row shown in the given top-level list; `None` for placeholders
pub fn view_category(row: &Row, list: ListCategory) -> Option<ViewCategory> {
    match (row, list) {
        (Row::Placeholder(_), _) => None,
        (_, ListCategory::Denied) => Some(ViewCategory::Denied),
        (Row::Permission(entry), ListCategory::Allowed)
            if entry.category == EntryCategory::AllowedForeground =>
        {
            Some(ViewCategory::AllowedForeground)
        }
        (_, ListCategory::Allowed) => Some(ViewCategory::Allowed),
    }
}

/// Records of one view pass over the top-level lists
pub fn view_events(
    plan: &RenderingPlan,
    session_id: SessionId,
    view_id: i64,
    app: &AppIdentity,
) -> Vec<ViewEvent> {
    [ListCategory::Allowed, ListCategory::Denied]
        .into_iter()
        .flat_map(|list| plan.list(list).iter().map(move |row| (row, list)))
        .filter_map(|(row, list)| {
            let category = view_category(row, list)?;
            Some(ViewEvent {
                session_id,
                view_id,
                permission_group_name: row.as_permission().map(|entry| entry.key.clone()),
                app: app.clone(),
                category,
            })
        })
        .collect()
}

/// Emits view events through a sink with ids from a generator
pub struct PermissionViewLogger {
    ids: Arc<dyn IdGenerator>,
    sink: Arc<dyn TelemetrySink>,
}

impl PermissionViewLogger {
    pub fn new(ids: Arc<dyn IdGenerator>, sink: Arc<dyn TelemetrySink>) -> Self {
        Self { ids, sink }
    }

    /// Log every non-placeholder top-level row of `plan`
    pub fn log_view(
        &self,
        plan: &RenderingPlan,
        session_id: SessionId,
        app: &AppIdentity,
    ) -> Vec<ViewEvent> {
        let view_id = self.ids.next_id();
        let events = view_events(plan, session_id, view_id, app);

        for event in &events {
            debug!(
                "View logged: session={} view={} group={:?} uid={} package={} category={}",
                event.session_id.0,
                event.view_id,
                event.permission_group_name,
                event.app.uid,
                event.app.package_name,
                event.category
            );
            self.sink.record(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use app_permissions_catalog::platform_groups;

    use super::*;
    use crate::builder::PermissionListBuilder;
    use crate::collaborators::SequenceIdGenerator;
    use crate::testing::{catalog_of, platform, third_party, PKG, UID};

    fn app() -> AppIdentity {
        AppIdentity {
            package_name: PKG.into(),
            uid: UID,
        }
    }

    #[test]
    fn test_one_record_per_real_row() {
        let catalog = catalog_of(vec![
            platform(platform_groups::CAMERA, "Camera").granted(true),
            platform(platform_groups::LOCATION, "Location").granted(true).foreground_only(true),
            platform(platform_groups::SMS, "SMS"),
            third_party("com.vendor.group.SYNC", "Sync"),
            third_party("com.vendor.group.BADGE", "Badges"),
        ]);
        let plan = PermissionListBuilder::default().build(&catalog, None);

        let events = view_events(&plan, SessionId(5), 99, &app());

        let non_placeholder = plan
            .allowed
            .iter()
            .chain(&plan.denied)
            .filter(|r| !r.is_placeholder())
            .count();
        assert_eq!(events.len(), non_placeholder);
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.view_id == 99 && e.session_id == SessionId(5)));

        let summary: Vec<(Option<&str>, ViewCategory)> = events
            .iter()
            .map(|e| (e.permission_group_name.as_deref(), e.category))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some(platform_groups::CAMERA), ViewCategory::Allowed),
                (Some(platform_groups::LOCATION), ViewCategory::AllowedForeground),
                (Some(platform_groups::SMS), ViewCategory::Denied),
                (None, ViewCategory::Denied),
            ]
        );
    }

    #[test]
    fn test_empty_catalog_logs_nothing() {
        let plan = PermissionListBuilder::default().build(&catalog_of(Vec::new()), None);
        assert!(view_events(&plan, SessionId::INVALID, 1, &app()).is_empty());
    }

    #[test]
    fn test_logger_shares_view_id_and_feeds_sink() {
        let bus = Arc::new(EventBus::new());
        let subscription = bus.subscribe();
        let ids = Arc::new(SequenceIdGenerator::new(vec![314, 271]));
        let logger = PermissionViewLogger::new(ids, bus);
        let catalog = catalog_of(vec![
            platform(platform_groups::CAMERA, "Camera").granted(true),
            platform(platform_groups::SMS, "SMS"),
        ]);
        let plan = PermissionListBuilder::default().build(&catalog, None);

        let first = logger.log_view(&plan, SessionId(1), &app());
        let second = logger.log_view(&plan, SessionId(1), &app());

        assert!(first.iter().all(|e| e.view_id == 314));
        assert!(second.iter().all(|e| e.view_id == 271));

        let received = subscription.drain();
        assert_eq!(received.len(), 4);
        assert_eq!(received[0], Event::PermissionsViewed(first[0].clone()));
    }
}
