//! Permission Screens
//!
//! Lifecycle controllers for the app permissions view and its additional
//! permissions overflow view. Entering loads the catalog; every resume
//! refreshes it and replaces the plan; menu and row actions become
//! navigation requests on the event bus.

use std::sync::Arc;

use app_permissions_catalog::{IconRef, PermissionCatalog, PermissionSource, SharedCatalog};
use app_permissions_core::{
    AppConfig, AppIdentity, Event, EventBus, NavigationRequest, ResolutionError, SessionId,
    UserHandle, ViewEvent,
};
use tracing::{debug, info, warn};

use crate::builder::PermissionListBuilder;
use crate::collaborators::IdGenerator;
use crate::entry::{AdditionalPermissions, RenderingPlan, Row};
use crate::telemetry::PermissionViewLogger;

/// Arguments a permission screen is opened with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenArgs {
    pub package: String,
    pub user: UserHandle,
    pub session_id: SessionId,
}

impl ScreenArgs {
    pub fn new(package: &str, user: UserHandle) -> Self {
        Self {
            package: package.to_string(),
            user,
            session_id: SessionId::INVALID,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = session_id;
        self
    }
}

/// Services shared by the primary screen and its overflow screen
#[derive(Clone)]
pub struct ScreenContext {
    pub source: Arc<dyn PermissionSource>,
    pub builder: Arc<PermissionListBuilder>,
    pub events: Arc<EventBus>,
    pub ids: Arc<dyn IdGenerator>,
    pub hide_info_button: bool,
}

impl ScreenContext {
    pub fn new(
        source: Arc<dyn PermissionSource>,
        builder: PermissionListBuilder,
        events: Arc<EventBus>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            source,
            builder: Arc::new(builder),
            events,
            ids,
            hide_info_button: false,
        }
    }

    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.hide_info_button = config.screen.hide_info_button;
        self
    }

    fn navigate(&self, request: NavigationRequest) {
        debug!("Navigating: {:?}", request);
        self.events.emit(Event::Navigate(request));
    }
}

/// Header shown above the lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenHeader {
    pub icon: IconRef,
    pub label: String,
    pub title: String,
    /// Action of the "app info" button, if shown
    pub info: Option<NavigationRequest>,
}

/// Options menu items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Home,
    AllPermissions,
    Help,
}

/// Token for one requested build; only the latest request may be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildTicket {
    generation: u64,
}

/// Last-writer-wins bookkeeping for plan replacement
#[derive(Debug, Default)]
struct PlanGenerations {
    requested: u64,
    applied: u64,
}

impl PlanGenerations {
    fn request(&mut self) -> BuildTicket {
        self.requested += 1;
        BuildTicket {
            generation: self.requested,
        }
    }

    fn accept(&mut self, ticket: BuildTicket) -> bool {
        if ticket.generation != self.requested || ticket.generation <= self.applied {
            return false;
        }
        self.applied = ticket.generation;
        true
    }
}

/// The app permissions view
pub struct AppPermissionsScreen {
    args: ScreenArgs,
    ctx: ScreenContext,
    catalog: SharedCatalog,
    header: ScreenHeader,
    plan: RenderingPlan,
    generations: PlanGenerations,
    view_events: Vec<ViewEvent>,
}

impl AppPermissionsScreen {
    /// Enter the screen: load the catalog, build the first plan and log the view
    ///
    /// On resolution failure the host is told to show "app not found" and finish.
    pub fn on_enter(args: ScreenArgs, ctx: ScreenContext) -> Result<Self, ResolutionError> {
        let loaded = PermissionCatalog::load(Arc::clone(&ctx.source), &args.package, args.user);
        let catalog = match loaded {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Cannot open app permissions: {}", e);
                ctx.events.emit(Event::Notify {
                    message: ctx.builder.strings().app_not_found.clone(),
                });
                ctx.events.emit(Event::Finish);
                return Err(e);
            }
        };

        let events = Arc::clone(&ctx.events);
        let package = args.package.clone();
        let catalog = catalog.with_on_invalidated(Box::new(move || {
            events.emit(Event::CatalogInvalidated {
                package: package.clone(),
            });
            events.emit(Event::Finish);
        }));

        ctx.events.emit(Event::CatalogLoaded {
            package: args.package.clone(),
            groups: catalog.len(),
        });

        let header = header_for(&ctx, &catalog, true);
        let catalog = catalog.into_shared();

        let mut screen = Self {
            args,
            ctx,
            catalog,
            header,
            plan: RenderingPlan::default(),
            generations: PlanGenerations::default(),
            view_events: Vec::new(),
        };

        let ticket = screen.request_build();
        let plan = screen.build_plan();
        screen.apply_plan(ticket, plan);

        let logger =
            PermissionViewLogger::new(Arc::clone(&screen.ctx.ids), screen.ctx.events.clone());
        let app = screen.app();
        screen.view_events = logger.log_view(&screen.plan, screen.args.session_id, &app);

        info!("Entered app permissions for {}", screen.args.package);
        Ok(screen)
    }

    /// Screen became visible again: refresh the catalog and replace the plan
    pub fn on_resume(&mut self) -> &RenderingPlan {
        let ticket = self.request_build();
        self.refresh_catalog();
        let plan = self.build_plan();
        self.apply_plan(ticket, plan);
        &self.plan
    }

    /// Start a build; a plan built for an older ticket is discarded
    pub fn request_build(&mut self) -> BuildTicket {
        self.generations.request()
    }

    /// Build a plan from the current catalog snapshot
    pub fn build_plan(&self) -> RenderingPlan {
        self.ctx.builder.build(&self.catalog.read(), None)
    }

    /// Replace the visible plan if `ticket` is still the latest request
    pub fn apply_plan(&mut self, ticket: BuildTicket, plan: RenderingPlan) -> bool {
        if !self.generations.accept(ticket) {
            debug!("Discarding stale plan (generation {})", ticket.generation);
            return false;
        }

        self.plan = plan;
        self.ctx.events.emit(Event::PlanUpdated {
            package: self.args.package.clone(),
            generation: ticket.generation,
        });
        true
    }

    /// Handle an options menu selection
    pub fn on_menu_item(&self, item: MenuItem) -> bool {
        match item {
            MenuItem::Home => {
                self.ctx.events.emit(Event::Finish);
            }
            MenuItem::AllPermissions => self.show_all_permissions(None),
            MenuItem::Help => self.ctx.navigate(NavigationRequest::Help {
                topic: self.ctx.builder.strings().help_topic.clone(),
            }),
        }
        true
    }

    /// Items of the options menu
    pub fn menu(&self) -> &'static [MenuItem] {
        &[MenuItem::AllPermissions, MenuItem::Help]
    }

    /// Open the all-permissions view, optionally for one group
    pub fn show_all_permissions(&self, filter_group: Option<&str>) {
        self.ctx.navigate(NavigationRequest::AllPermissions {
            package: self.args.package.clone(),
            user: self.args.user,
            filter_group: filter_group.map(str::to_string),
        });
    }

    /// Handle a click on the row with `key`; returns false if nothing happened
    pub fn on_row_click(&self, key: &str) -> bool {
        match self.plan.find_top_level(key) {
            Some(Row::Permission(entry)) => {
                self.ctx.navigate(group_request(&self.args, &entry.key));
                true
            }
            Some(Row::Overflow(_)) => {
                self.ctx.navigate(NavigationRequest::AdditionalPermissions {
                    package: self.args.package.clone(),
                    user: self.args.user,
                    session_id: self.args.session_id,
                });
                true
            }
            Some(Row::Placeholder(_)) | None => false,
        }
    }

    /// The overflow view, sharing this screen's catalog
    pub fn open_additional(&self) -> AdditionalPermissionsScreen {
        AdditionalPermissionsScreen {
            args: self.args.clone(),
            ctx: self.ctx.clone(),
            catalog: Arc::clone(&self.catalog),
            header: ScreenHeader {
                info: None,
                ..self.header.clone()
            },
            sections: self.plan.additional.clone(),
        }
    }

    pub fn plan(&self) -> &RenderingPlan {
        &self.plan
    }

    pub fn header(&self) -> &ScreenHeader {
        &self.header
    }

    pub fn args(&self) -> &ScreenArgs {
        &self.args
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    /// Records logged when the screen was entered
    pub fn view_events(&self) -> &[ViewEvent] {
        &self.view_events
    }

    fn app(&self) -> AppIdentity {
        self.catalog.read().app().clone()
    }

    fn refresh_catalog(&mut self) {
        let mut catalog = self.catalog.write();
        if refresh_shared(&self.ctx, &mut catalog) {
            self.header = header_for(&self.ctx, &catalog, true);
        }
    }
}

/// The additional permissions view: third-party groups only
pub struct AdditionalPermissionsScreen {
    args: ScreenArgs,
    ctx: ScreenContext,
    catalog: SharedCatalog,
    header: ScreenHeader,
    sections: AdditionalPermissions,
}

impl AdditionalPermissionsScreen {
    /// Refresh the shared catalog and rebuild the third-party lists
    pub fn on_resume(&mut self) -> &AdditionalPermissions {
        {
            let mut catalog = self.catalog.write();
            if refresh_shared(&self.ctx, &mut catalog) {
                self.header = header_for(&self.ctx, &catalog, false);
            }
        }

        let plan = self.ctx.builder.build(&self.catalog.read(), None);
        self.sections = plan.additional;
        &self.sections
    }

    /// Handle an options menu selection
    pub fn on_menu_item(&self, item: MenuItem) -> bool {
        match item {
            MenuItem::Home => {
                self.ctx.navigate(NavigationRequest::Back);
                true
            }
            _ => false,
        }
    }

    pub fn on_row_click(&self, key: &str) -> bool {
        let found = self
            .sections
            .allowed
            .iter()
            .chain(&self.sections.denied)
            .find(|row| row.key() == Some(key));

        match found {
            Some(Row::Permission(entry)) => {
                self.ctx.navigate(group_request(&self.args, &entry.key));
                true
            }
            _ => false,
        }
    }

    pub fn sections(&self) -> &AdditionalPermissions {
        &self.sections
    }

    pub fn header(&self) -> &ScreenHeader {
        &self.header
    }
}

/// Refresh a lent catalog; true if the platform state was re-read
fn refresh_shared(ctx: &ScreenContext, catalog: &mut PermissionCatalog) -> bool {
    let before = catalog.revision();
    catalog.refresh();
    if catalog.revision() == before {
        return false;
    }

    ctx.events.emit(Event::CatalogRefreshed {
        package: catalog.app().package_name.clone(),
        groups: catalog.len(),
    });
    true
}

fn header_for(ctx: &ScreenContext, catalog: &PermissionCatalog, with_info: bool) -> ScreenHeader {
    let package = catalog.package();
    let info = (with_info && !ctx.hide_info_button).then(|| NavigationRequest::AppInfo {
        package: package.identity.package_name.clone(),
    });

    ScreenHeader {
        icon: package.icon.clone(),
        label: package.label.clone(),
        title: ctx.builder.strings().screen_title.clone(),
        info,
    }
}

fn group_request(args: &ScreenArgs, group: &str) -> NavigationRequest {
    NavigationRequest::PermissionGroup {
        package: args.package.clone(),
        user: args.user,
        group: group.to_string(),
        session_id: args.session_id,
    }
}
