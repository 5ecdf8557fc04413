//! Screen Strings
//!
//! Text templates the host resolves from its resources. `{0}` is the
//! argument placeholder.

use serde::{Deserialize, Serialize};

/// Singular/plural pair for a counted template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralTemplate {
    pub one: String,
    pub other: String,
}

impl PluralTemplate {
    pub fn format(&self, count: usize) -> String {
        let template = if count == 1 { &self.one } else { &self.other };
        fill(template, &count.to_string())
    }
}

/// All text the permission screens render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenStrings {
    pub screen_title: String,
    pub most_recent_access: String,
    pub most_recent_denied: String,
    pub never_accessed: String,
    pub never_accessed_denied: String,
    pub only_in_foreground: String,
    pub no_permissions_allowed: String,
    pub no_permissions_denied: String,
    pub additional_permissions: String,
    pub additional_permissions_more: PluralTemplate,
    pub all_permissions: String,
    pub app_not_found: String,
    pub help_topic: String,
}

impl Default for ScreenStrings {
    fn default() -> Self {
        Self {
            screen_title: "App permissions".into(),
            most_recent_access: "Most recent access: {0}".into(),
            most_recent_denied: "Denied / Most recent access: {0}".into(),
            never_accessed: "Never accessed".into(),
            never_accessed_denied: "Denied / Never accessed".into(),
            only_in_foreground: "Only while app is in use".into(),
            no_permissions_allowed: "No permissions allowed".into(),
            no_permissions_denied: "No permissions denied".into(),
            additional_permissions: "Additional permissions".into(),
            additional_permissions_more: PluralTemplate {
                one: "+{0} more".into(),
                other: "+{0} more".into(),
            },
            all_permissions: "All permissions".into(),
            app_not_found: "App not found".into(),
            help_topic: "app_permissions".into(),
        }
    }
}

/// Substitute `arg` for every `{0}` in `template`
pub fn fill(template: &str, arg: &str) -> String {
    template.replace("{0}", arg)
}
