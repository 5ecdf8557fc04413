//! CLI commands for App Permissions
//!
//! Runs the app permissions screen against a device fixture and prints what
//! the screen would render.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;

use app_permissions_catalog::InMemoryPermissionSource;
use app_permissions_core::{AppConfig, EventBus, SessionId, UserHandle, ViewEvent};
use app_permissions_list::{
    AdditionalPermissions, AppPermissionsScreen, PermissionListBuilder, RandomIdGenerator,
    RenderingPlan, Row, ScreenArgs, ScreenContext, ScreenStrings,
};

/// Output format of the show command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Show the permission lists of one app
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "show")]
pub struct ShowCommand {
    /// JSON description of installed packages
    pub fixture: PathBuf,

    /// Package whose permissions are shown
    pub package: String,

    /// User the package is installed under
    #[arg(long, default_value_t = 0)]
    pub user: u32,

    /// Permission-settings session id (0 is the invalid session)
    #[arg(long = "session", default_value_t = 0)]
    pub session_id: i64,

    /// Config file; the default location is used when absent
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also show the additional permissions view
    #[arg(long)]
    pub additional: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    label: &'a str,
    plan: &'a RenderingPlan,
    view_events: &'a [ViewEvent],
}

impl ShowCommand {
    pub fn user(&self) -> UserHandle {
        UserHandle(self.user)
    }

    pub fn session_id(&self) -> SessionId {
        SessionId(self.session_id)
    }

    /// Execute the show command, returning the rendered output
    pub async fn execute(&self) -> Result<String> {
        let config = match &self.config {
            Some(path) => AppConfig::load_from(path).await?,
            None => AppConfig::load().await?,
        };
        let source = Arc::new(InMemoryPermissionSource::from_json_file(&self.fixture)?);
        info!("Showing permissions of {} for {}", self.package, self.user());

        let builder =
            PermissionListBuilder::from_config(&config, ScreenStrings::default(), source.clone());
        let ctx = ScreenContext::new(
            source,
            builder,
            Arc::new(EventBus::new()),
            Arc::new(RandomIdGenerator),
        )
        .with_config(&config);
        let args = ScreenArgs::new(&self.package, self.user()).with_session(self.session_id());

        let screen = AppPermissionsScreen::on_enter(args, ctx)
            .map_err(|e| anyhow!("App not found: {}", e))?;
        let header = screen.header();

        match self.format {
            OutputFormat::Json => {
                let report = ShowReport {
                    label: &header.label,
                    plan: screen.plan(),
                    view_events: screen.view_events(),
                };
                Ok(serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Text => {
                let mut out = render_plan(&header.label, &header.title, screen.plan());
                if self.additional {
                    out.push('\n');
                    out.push_str(&render_additional(screen.open_additional().sections()));
                }
                Ok(out)
            }
        }
    }
}

/// Plain-text rendering of the primary view
pub fn render_plan(label: &str, title: &str, plan: &RenderingPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", label, title);
    render_section(&mut out, "Allowed", &plan.allowed);
    render_section(&mut out, "Denied", &plan.denied);
    out
}

/// Plain-text rendering of the additional permissions view
pub fn render_additional(sections: &AdditionalPermissions) -> String {
    let mut out = String::from("Additional permissions\n");
    render_section(&mut out, "Allowed", &sections.allowed);
    render_section(&mut out, "Denied", &sections.denied);
    out
}

fn render_section(out: &mut String, heading: &str, rows: &[Row]) {
    let _ = writeln!(out, "\n{}", heading);
    for row in rows {
        match row.summary() {
            Some(summary) if !summary.is_empty() => {
                let _ = writeln!(out, "  {} ({})", row.title(), summary);
            }
            Some(_) => {
                let _ = writeln!(out, "  {}", row.title());
            }
            None => {
                let _ = writeln!(out, "  [{}]", row.title());
            }
        }
    }
}
