//! UI-contribution manifest wire types.
//!
//! Everything here is backend-declared data, camelCase on the wire and
//! immutable from the dashboard's perspective.

use serde::Deserialize;

fn default_priority() -> i64 {
    100
}

/// A backend plugin's declaration of a dashboard widget.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetContribution {
    /// Stable identifier, unique within the manifest.
    pub id: String,
    /// Optional section heading rendered above the widget.
    #[serde(default)]
    pub title: Option<String>,
    /// Component name resolved against the host registry.
    pub component: String,
    /// Ascending sort key; lower renders first.
    #[serde(default = "default_priority")]
    pub priority: i64,
    /// Whether the widget shows without explicit opt-in.
    #[serde(default)]
    pub show_by_default: bool,
    /// Plugin that contributed this widget.
    pub plugin_id: String,
    /// Optional category used for placement filtering.
    #[serde(default, rename = "type")]
    pub widget_type: Option<String>,
}

/// Navigation entry passed through to the navigation host.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Stable identifier.
    pub id: String,
    /// Label shown in the navigation chrome.
    pub label: String,
    /// Route the entry links to.
    pub route: String,
    /// Optional icon name.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Page body contributed by a plugin.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageContribution {
    /// Stable identifier.
    pub id: String,
    /// Route the page mounts at.
    pub route: String,
    /// Component name resolved against the host registry.
    pub component: String,
    /// Optional page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Plugin that contributed this page.
    pub plugin_id: String,
}

/// Identity block for a plugin that contributed entries.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    /// Stable identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Declared version.
    #[serde(default)]
    pub version: Option<String>,
}

/// The full UI-contribution manifest returned by the backend.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UiContributions {
    /// Navigation entries, in manifest order.
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    /// Contributed pages, in manifest order.
    #[serde(default)]
    pub pages: Vec<PageContribution>,
    /// Contributed widgets, in manifest order.
    #[serde(default)]
    pub widgets: Vec<WidgetContribution>,
    /// Plugins that contributed anything above.
    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
}
