//! Feature configuration for the application settings screens.
//!
//! Instead of one static config tree, every toggle and override is a named
//! hook on [`ApplicationFeatures`]. Hooks are pure: they take contextual
//! identifiers and return a decision, never touching state or the network.
//! Deployments override individual hooks; everything else keeps the shipped
//! console defaults via the trait's default methods.

/// Identifiers available to a hook when it makes its decision.
#[derive(Debug, Clone, Copy)]
pub struct FeatureContext<'a> {
    pub client_id: &'a str,
    pub tenant_domain: &'a str,
}

/// Tabs of the application settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationTab {
    General,
    ProtocolSettings,
    UserAttributes,
    SignOnMethods,
    Provisioning,
    Advanced,
}

/// Rendering override for a settings tab. `None` from the hook means "no
/// override, render the stock tab".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabOverride {
    pub hidden: bool,
    pub read_only: bool,
    pub banner: Option<String>,
}

pub trait ApplicationFeatures: Send + Sync {
    /// Whether the application-sharing affordance is shown.
    fn show_application_share(&self, _cx: &FeatureContext<'_>) -> bool {
        true
    }

    /// Whether the contextual help panel is rendered.
    fn show_help_panel(&self) -> bool {
        true
    }

    /// Whether to disclose that client secrets are stored hashed.
    fn show_client_secret_hash_disclaimer(&self, _cx: &FeatureContext<'_>) -> bool {
        false
    }

    /// Whether the SaaS-only warning banner is shown for this tenant.
    fn show_saas_banner(&self, _cx: &FeatureContext<'_>) -> bool {
        false
    }

    /// Whether a template is one of the stock templates that cannot be
    /// deleted from the console.
    fn is_default_template(&self, template_name: &str) -> bool {
        matches!(
            template_name,
            "single-page-application" | "traditional-web-application" | "mobile-application"
        )
    }

    /// Per-tab rendering override.
    fn tab_override(&self, _cx: &FeatureContext<'_>, _tab: ApplicationTab) -> Option<TabOverride> {
        None
    }
}

/// The shipped console defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFeatures;

impl ApplicationFeatures for ConsoleFeatures {}
