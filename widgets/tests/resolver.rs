//! Widget resolution against a mock backend.

use pretty_assertions::assert_eq;
use serde_json::json;
use tiller_client::{ApiClient, ManifestFetcher};
use tiller_widgets::{ResolveOptions, WidgetRegistry, WidgetResolver};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_backend(server: &MockServer, widgets: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/client-manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": {
                "plugins.contributions": {"method": "GET", "path": "/plugins/contributions"}
            }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/plugins/contributions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "menuItems": [],
            "pages": [],
            "widgets": widgets,
            "plugins": [{"id": "monitoring"}]
        })))
        .mount(server)
        .await;
}

async fn client_for(server: &MockServer) -> std::sync::Arc<ApiClient> {
    let base_url = Url::parse(&server.uri()).expect("server URL");
    ManifestFetcher::new(reqwest::Client::new(), base_url)
        .load()
        .await
        .expect("manifest loads")
}

#[tokio::test]
async fn resolves_registered_widgets_in_priority_order() {
    let server = MockServer::start().await;
    mount_backend(
        &server,
        json!([
            {
                "id": "queue-depth",
                "title": "Queue depth",
                "component": "chart-card",
                "priority": 200,
                "showByDefault": true,
                "pluginId": "monitoring"
            },
            {
                "id": "uptime",
                "component": "stat-card",
                "priority": 10,
                "showByDefault": true,
                "pluginId": "monitoring"
            },
            {
                "id": "orphaned",
                "component": "not-a-real-component",
                "priority": 1,
                "showByDefault": true,
                "pluginId": "monitoring"
            }
        ]),
    )
    .await;

    let client = client_for(&server).await;
    let mut registry = WidgetRegistry::new();
    registry.register_many([("stat-card", "stat"), ("chart-card", "chart")]);

    let resolver = WidgetResolver::new(&client, &registry);
    let resolved = resolver
        .resolve(&ResolveOptions::default())
        .await
        .expect("resolution succeeds");

    // The unregistered component is dropped; the rest render in priority
    // order.
    let ids: Vec<&str> = resolved
        .iter()
        .map(|widget| widget.contribution.id.as_str())
        .collect();
    assert_eq!(vec!["uptime", "queue-depth"], ids);
    assert_eq!("stat", resolved[0].component);
}

#[tokio::test]
async fn each_resolve_call_fetches_fresh_contributions() {
    let server = MockServer::start().await;
    mount_backend(&server, json!([])).await;

    let client = client_for(&server).await;
    let registry: WidgetRegistry<&str> = WidgetRegistry::new();
    let resolver = WidgetResolver::new(&client, &registry);

    resolver
        .resolve(&ResolveOptions::default())
        .await
        .expect("first resolution");
    resolver
        .resolve(&ResolveOptions::default())
        .await
        .expect("second resolution");

    let contribution_fetches = server
        .received_requests()
        .await
        .expect("recorded requests")
        .iter()
        .filter(|request| request.url.path() == "/api/plugins/contributions")
        .count();
    assert_eq!(2, contribution_fetches);
}

#[tokio::test]
async fn contributions_surface_menu_items_and_plugins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/client-manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "routes": {
                "plugins.contributions": {"method": "GET", "path": "/plugins/contributions"}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/plugins/contributions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "menuItems": [
                {"id": "m1", "label": "Bans", "route": "/bans", "icon": "block"}
            ],
            "pages": [
                {"id": "p1", "route": "/bans", "component": "bans-page", "pluginId": "moderation"}
            ],
            "widgets": [],
            "plugins": [{"id": "moderation", "name": "Moderation", "version": "2.1.0"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let registry: WidgetRegistry<&str> = WidgetRegistry::new();
    let resolver = WidgetResolver::new(&client, &registry);

    let contributions = resolver
        .fetch_contributions()
        .await
        .expect("contributions load");

    assert_eq!("Bans", contributions.menu_items[0].label);
    assert_eq!(Some("block".to_string()), contributions.menu_items[0].icon);
    assert_eq!("bans-page", contributions.pages[0].component);
    assert_eq!("moderation", contributions.plugins[0].id);
}

#[tokio::test]
async fn missing_contribution_route_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/client-manifest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"routes": {}})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let registry: WidgetRegistry<&str> = WidgetRegistry::new();
    let resolver = WidgetResolver::new(&client, &registry);

    assert!(resolver.resolve(&ResolveOptions::default()).await.is_err());
}
