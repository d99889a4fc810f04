//! Plugin-contributed dashboard widgets.
//!
//! Backend plugins declare UI fragments by *name*; the host registers
//! concrete implementations under those names at bootstrap. This crate
//! holds the three pieces that meet in the middle:
//!
//! - [`UiContributions`]: the backend's UI-contribution manifest.
//! - [`WidgetRegistry`]: the host's name → implementation table.
//! - [`WidgetResolver`]: fetches contributions, filters and orders them,
//!   and resolves each entry against the registry.
//!
//! A contribution renders iff its component name is registered; anything
//! else is dropped with a diagnostic, never a hard failure.

mod contribution;
mod registry;
mod resolver;

pub use contribution::{
    MenuItem, PageContribution, PluginDescriptor, UiContributions, WidgetContribution,
};
pub use registry::WidgetRegistry;
pub use resolver::{
    ResolveOptions, ResolvedWidget, WidgetHost, WidgetResolver, render_into, resolve_widgets,
};
