//! Tests for the HTTP catalog client against an in-process axum server.

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};
use specdeck_core::error::CatalogError;
use specdeck_core::{
    HttpSource, MetricKey, ParamStore, SelectionManager, ShareParams, Side, SideState, SpecValue,
    SystemSource,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn list_systems() -> Json<Value> {
    Json(json!([
        { "name": "Steam Deck", "slug": "steam-deck" },
        { "name": "Legion Go", "slug": "legion-go" }
    ]))
}

async fn get_system(Path(slug): Path<String>) -> Result<Json<Value>, StatusCode> {
    match slug.as_str() {
        "steam-deck" => Ok(Json(json!({
            "slug": "steam-deck",
            "name": "Steam Deck",
            "manufacturer": "Valve",
            "base_spec": { "refresh_rate_hz": 60, "screen_type": "IPS LCD" },
            "variants": [
                { "id": "oled", "slug": "oled", "name": "OLED", "spec": { "refresh_rate_hz": 90 } }
            ]
        }))),
        "garbled" => Ok(Json(json!({ "slug": 42 }))),
        "overloaded" => Err(StatusCode::SERVICE_UNAVAILABLE),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/api/systems", get(list_systems))
        .route("/api/systems/{slug}", get(get_system));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr) -> HttpSource {
    HttpSource::new(&format!("http://{addr}/api"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_systems() {
    let addr = spawn_server().await;
    let systems = client(addr).list_systems().await.unwrap();
    assert_eq!(systems.len(), 2);
    assert_eq!(systems[1].slug, "legion-go");
}

#[tokio::test]
async fn test_get_system_by_slug() {
    let addr = spawn_server().await;
    let system = client(addr).get_system_by_slug("steam-deck").await.unwrap();
    assert_eq!(system.manufacturer.as_deref(), Some("Valve"));
    assert_eq!(system.variants[0].slug, "oled");
    assert_eq!(
        system.base_spec.get(MetricKey::RefreshRateHz),
        Some(&SpecValue::Number(60.0))
    );
}

#[tokio::test]
async fn test_status_mapping() {
    let addr = spawn_server().await;
    let source = client(addr);

    let err = source.get_system_by_slug("switch-2").await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::NotFound {
            slug: "switch-2".into()
        }
    );

    let err = source.get_system_by_slug("overloaded").await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport { .. }));

    let err = source.get_system_by_slug("garbled").await.unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { .. }));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr).get_system_by_slug("steam-deck").await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport { .. }));
}

#[tokio::test]
async fn test_selection_manager_over_http() {
    let addr = spawn_server().await;
    let mgr = SelectionManager::new(
        Arc::new(client(addr)),
        Arc::new(ParamStore::new(ShareParams::parse(
            "a=steam-deck&varA=oled&b=missing",
        ))),
    );
    mgr.mount().await;

    let left = mgr.selection(Side::Left);
    assert_eq!(
        left.effective_spec.unwrap().get(MetricKey::RefreshRateHz),
        Some(&SpecValue::Number(90.0))
    );
    assert!(matches!(
        mgr.state(Side::Right),
        SideState::Failed {
            error: CatalogError::NotFound { .. },
            ..
        }
    ));
}
