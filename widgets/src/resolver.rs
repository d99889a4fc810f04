//! Plugin widget resolution: fetch contributions, filter, order, resolve.

use tiller_client::{ApiClient, ClientError};

use crate::contribution::{UiContributions, WidgetContribution};
use crate::registry::WidgetRegistry;

/// Route key the resolver expects the backend to declare.
const CONTRIBUTIONS_NAMESPACE: &str = "plugins";
const CONTRIBUTIONS_ACTION: &str = "contributions";

/// Options for one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Keep only contributions with this exact `type`. Untyped entries
    /// pass only when no filter is given.
    pub widget_type: Option<String>,
    /// When true (the default), keep only contributions shown by default
    /// or explicitly opted in via `additional_ids`.
    pub default_only: bool,
    /// Widget ids to include even when not shown by default.
    pub additional_ids: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            widget_type: None,
            default_only: true,
            additional_ids: Vec::new(),
        }
    }
}

/// A contribution paired with its resolved implementation.
#[derive(Debug, Clone)]
pub struct ResolvedWidget<C> {
    /// The backend-declared contribution.
    pub contribution: WidgetContribution,
    /// The host implementation registered under `contribution.component`.
    pub component: C,
}

/// Boundary to the themed rendering host.
pub trait WidgetHost<C> {
    /// Emit a section heading above a widget body.
    fn heading(&mut self, text: &str);
    /// Emit one widget body.
    fn widget(&mut self, contribution: &WidgetContribution, component: &C);
}

/// Resolves backend widget contributions against a local registry.
///
/// Each resolver instance fetches its own copy of the contribution
/// manifest per [`WidgetResolver::resolve`] call; there is no
/// cross-instance cache.
pub struct WidgetResolver<'a, C> {
    client: &'a ApiClient,
    registry: &'a WidgetRegistry<C>,
}

impl<'a, C: Clone> WidgetResolver<'a, C> {
    /// Creates a resolver over a synthesized client and a registry.
    pub fn new(client: &'a ApiClient, registry: &'a WidgetRegistry<C>) -> Self {
        Self { client, registry }
    }

    /// Fetches the UI-contribution manifest and resolves the widget list.
    pub async fn resolve(
        &self,
        options: &ResolveOptions,
    ) -> Result<Vec<ResolvedWidget<C>>, ClientError> {
        let contributions = self.fetch_contributions().await?;
        Ok(resolve_widgets(
            contributions.widgets,
            self.registry,
            options,
        ))
    }

    /// Fetches the raw contribution manifest through the synthesized
    /// client.
    pub async fn fetch_contributions(&self) -> Result<UiContributions, ClientError> {
        let value = self
            .client
            .invoke(CONTRIBUTIONS_NAMESPACE, CONTRIBUTIONS_ACTION, None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Filters, orders, and resolves a widget contribution list.
///
/// An entry whose component is not registered is dropped with a
/// diagnostic naming both the widget and the missing component; the rest
/// of the list is unaffected. Output is sorted ascending by priority,
/// with equal priorities keeping manifest order.
pub fn resolve_widgets<C: Clone>(
    widgets: Vec<WidgetContribution>,
    registry: &WidgetRegistry<C>,
    options: &ResolveOptions,
) -> Vec<ResolvedWidget<C>> {
    let mut resolved: Vec<ResolvedWidget<C>> = widgets
        .into_iter()
        .filter(|widget| match (&options.widget_type, &widget.widget_type) {
            (Some(wanted), Some(actual)) => wanted == actual,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .filter(|widget| {
            !options.default_only
                || widget.show_by_default
                || options.additional_ids.iter().any(|id| id == &widget.id)
        })
        .filter_map(|widget| match registry.get(&widget.component) {
            Some(component) => Some(ResolvedWidget {
                component: component.clone(),
                contribution: widget,
            }),
            None => {
                tracing::warn!(
                    widget = %widget.id,
                    component = %widget.component,
                    "dropping widget: component not registered"
                );
                None
            }
        })
        .collect();

    resolved.sort_by_key(|widget| widget.contribution.priority);
    resolved
}

/// Walks resolved widgets through the rendering host: the optional title
/// as a heading, then the widget body.
pub fn render_into<C>(widgets: &[ResolvedWidget<C>], host: &mut impl WidgetHost<C>) {
    for widget in widgets {
        if let Some(title) = &widget.contribution.title {
            host.heading(title);
        }
        host.widget(&widget.contribution, &widget.component);
    }
}
