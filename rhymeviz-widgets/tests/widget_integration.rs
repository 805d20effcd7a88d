//! Integration tests for the widget families
//!
//! A local axum router stands in for the host application, serving canned
//! JSON/GeoJSON fixtures. The real `DataClient` fetches from it over
//! loopback, so these tests cover URL construction, decoding, widget
//! transformation, and the explicit failure states end to end.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use rhymeviz_common::api::DataClient;
use rhymeviz_common::events::EventBus;
use rhymeviz_common::{AppConfig, Error, PageContext};
use rhymeviz_widgets::page::Page;
use rhymeviz_widgets::widgets::examples::{ExamplesToggle, LoadPhase, Visibility};
use rhymeviz_widgets::widgets::map::{MapWidget, ZoomClamp, ZOOM_CLAMP_LEVEL};
use rhymeviz_widgets::widgets::network::{pattern_id, NetworkWidget};
use rhymeviz_widgets::widgets::search::HeadwordAutocomplete;
use rhymeviz_widgets::widgets::song_tree::SongTreeWidget;
use rhymeviz_widgets::Viewport;

/// Test helper: fixture counters shared with the router
#[derive(Clone, Default)]
struct Counters {
    example_fetches: Arc<AtomicUsize>,
}

fn network_fixture() -> Value {
    json!({
        "name": "Big L",
        "img": "/img/big-l.jpg",
        "children": [
            {"name": "Lord Finesse", "size": 4, "img": "/img/lf.jpg", "link": "/artists/lord-finesse"},
            {"name": "Kid Capri", "size": 1, "link": "/artists/kid-capri"}
        ]
    })
}

fn tree_fixture() -> Value {
    json!({
        "name": "Protect Ya Neck",
        "children": [
            {"name": "1993", "children": [
                {"name": "C.R.E.A.M.", "link": "/songs/cream"},
                {"name": "Method Man", "link": "/songs/method-man"}
            ]}
        ]
    })
}

fn origins_fixture() -> Value {
    json!({
        "senses": [
            {"origin": {"latitude": 40.7, "longitude": -73.9, "name": "Queens", "slug": "queens"}, "count": 2},
            {"origin": {"latitude": null, "longitude": -73.9, "name": "nowhere"}, "count": 9},
            null
        ]
    })
}

fn geojson_fixture() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [-73.9, 40.7]},
             "properties": {"name": "Queensbridge", "weight": 6.5536}}
        ]
    })
}

fn examples_fixture() -> Value {
    json!({
        "remaining_examples": [
            {
                "release_date": "1994-04-19",
                "artist_name": "Nas",
                "artist_slug": "nas",
                "song_title": "The World Is Yours",
                "song_slug": "the-world-is-yours",
                "featured_artists": [
                    {"name": "AZ", "slug": "az"},
                    {"name": "Olu Dara", "slug": "olu-dara"}
                ],
                "album": "Illmatic",
                "linked_lyric": "<a href=\"/w\">the <em>world</em> is yours</a>"
            },
            null
        ]
    })
}

/// Test helper: spin up the fixture host application on loopback
async fn spawn_fixture(counters: Counters) -> String {
    let example_fetches = counters.example_fetches.clone();

    let app = Router::new()
        .route(
            "/artists/:slug/network_json/",
            get(|| async { Json(network_fixture()) }),
        )
        .route(
            "/data/songs/:slug/release_date_tree/",
            get(|| async { Json(tree_fixture()) }),
        )
        .route(
            "/data/senses/:id/artists/",
            get(|| async { Json(origins_fixture()) }),
        )
        .route(
            "/data/artists/:slug/geojson",
            get(|| async { Json(geojson_fixture()) }),
        )
        .route(
            "/senses/:id/remaining_examples/",
            get(move |Path(id): Path<String>| {
                let example_fetches = example_fetches.clone();
                async move {
                    if id == "slow" {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                    example_fetches.fetch_add(1, Ordering::SeqCst);
                    Json(examples_fixture())
                }
            }),
        )
        .route(
            "/places/:slug/artists/json",
            get(|| async {
                Json(json!({
                    "artists_with_image": [{"slug": "x", "name": "X", "image": "/i.png"}]
                }))
            }),
        )
        .route(
            "/data/headword_search/",
            get(|| async { Json(json!({"headwords": ["cream", "crew", "crib"]})) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind fixture listener");
    let addr = listener.local_addr().expect("Should read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });

    format!("http://{addr}")
}

/// Test helper: client against the fixture, short timeout, CSRF configured
async fn setup_client(counters: Counters) -> DataClient {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let base_url = spawn_fixture(counters).await;
    let config = AppConfig {
        base_url,
        csrf_token: Some("fixture-token".to_string()),
        request_timeout_secs: 1,
        ..AppConfig::default()
    };
    DataClient::new(&config).expect("Should build client")
}

// =============================================================================
// Graph Renderer
// =============================================================================

#[tokio::test]
async fn test_network_widget_end_to_end() {
    let client = setup_client(Counters::default()).await;

    let widget = NetworkWidget::new("big-l", Viewport::new(1200.0, 800.0));
    let view = widget.hydrate(&client).await.expect("Should hydrate");

    assert_eq!(view.collaborator_count, 2);
    assert_eq!(view.links.len(), 2);

    let svg = view.to_svg();
    assert!(svg.contains(&format!("id=\"{}\"", pattern_id("Big L"))));
    assert!(svg.contains("href=\"/artists/lord-finesse\""));
}

// =============================================================================
// Tree Renderer
// =============================================================================

#[tokio::test]
async fn test_song_tree_widget_end_to_end() {
    let client = setup_client(Counters::default()).await;

    let widget = SongTreeWidget::radial("protect-ya-neck", Viewport::new(1000.0, 700.0));
    let view = widget.hydrate(&client).await.expect("Should hydrate");

    assert_eq!(view.nodes.len(), 4);
    let svg = view.to_svg();
    assert!(svg.contains("class=\"treeRoot\""));
    assert!(svg.contains("href=\"/songs/cream\""));
}

// =============================================================================
// Map Renderer
// =============================================================================

#[tokio::test]
async fn test_map_widget_origins_end_to_end() {
    let client = setup_client(Counters::default()).await;

    let widget = MapWidget::new(PageContext::sense("42"), "map1");
    let scene = widget.hydrate(&client).await.expect("Should hydrate");

    // The null record and the half-coordinate record are skipped.
    assert_eq!(scene.points.len(), 1);
    assert!((scene.points[0].weight - 2.56).abs() < 1e-9);

    let fit = scene.fit.expect("Should fit plotted points");
    assert_eq!(fit.bounds.center(), (-73.9, 40.7));
}

#[tokio::test]
async fn test_map_widget_geojson_end_to_end() {
    let client = setup_client(Counters::default()).await;

    let widget = MapWidget::new(PageContext::artist("nas"), "map1");
    let scene = widget.hydrate_geojson(&client).await.expect("Should hydrate");

    assert_eq!(scene.points.len(), 1);
    assert_eq!(scene.points[0].weight, 6.5536);
    assert_eq!(scene.popup_label(0), Some("Queensbridge"));
}

#[tokio::test]
async fn test_map_zoom_clamp_after_fit() {
    let client = setup_client(Counters::default()).await;
    let bus = EventBus::default();

    let widget = MapWidget::new(PageContext::artist("nas"), "map1");
    let _scene = widget.hydrate_geojson(&client).await.expect("Should hydrate");

    let clamp = widget.clamp_zoom_once(&bus);
    widget.announce_fit(&bus);

    assert_eq!(
        clamp.await,
        Some(ZoomClamp {
            level: ZOOM_CLAMP_LEVEL
        })
    );
}

// =============================================================================
// Incremental List Loader
// =============================================================================

#[tokio::test]
async fn test_loader_full_click_path_fetches_once() {
    let counters = Counters::default();
    let client = setup_client(counters.clone()).await;

    let mut toggle = ExamplesToggle::new(PageContext::sense("42"));

    // First click: expand, fetch, populate.
    toggle.click(&client).await.expect("Should load");
    assert_eq!(toggle.visibility(), Visibility::Expanded);
    assert_eq!(toggle.phase(), LoadPhase::Loaded);
    assert_eq!(toggle.items().len(), 1, "null records are skipped");
    assert!(toggle.items()[0].contains("<a href=\"/artists/nas\">Nas</a>"));
    assert!(!toggle.indicator_visible());
    assert!(toggle.control_visible());

    // Second click collapses, third re-expands; no further fetches.
    toggle.click(&client).await.expect("Collapse is local");
    assert_eq!(toggle.visibility(), Visibility::Collapsed);
    toggle.click(&client).await.expect("Re-expand is local");
    assert_eq!(toggle.visibility(), Visibility::Expanded);

    assert_eq!(counters.example_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_loader_place_artist_cards() {
    let client = setup_client(Counters::default()).await;

    let mut toggle = ExamplesToggle::new(PageContext::place("queensbridge"));
    toggle.click(&client).await.expect("Should load");

    assert_eq!(toggle.items().len(), 1);
    let item = &toggle.items()[0];
    assert!(item.contains("<a href=\"/artists/x\">"));
    assert!(item.contains("<span class=\"caption\">X</span>"));
}

#[tokio::test]
async fn test_loader_failure_restores_control() {
    let client = setup_client(Counters::default()).await;

    // The artist examples route is not mounted on the fixture: 404.
    let mut toggle = ExamplesToggle::new(PageContext::artist("nas"));
    let result = toggle.click(&client).await;

    assert!(matches!(result, Err(Error::Api(404, _))));
    assert_eq!(toggle.phase(), LoadPhase::Failed);
    assert!(toggle.last_error().is_some());
    // The indicator never outlives the failed fetch.
    assert!(!toggle.indicator_visible());
    assert!(toggle.control_visible());
}

#[tokio::test]
async fn test_loader_timeout_is_explicit() {
    let client = setup_client(Counters::default()).await;

    let mut toggle = ExamplesToggle::new(PageContext::sense("slow"));
    let result = toggle.click(&client).await;

    assert!(matches!(result, Err(Error::Timeout(_))));
    assert_eq!(toggle.phase(), LoadPhase::Failed);
    assert!(!toggle.indicator_visible());
}

// =============================================================================
// Autocomplete
// =============================================================================

#[tokio::test]
async fn test_autocomplete_end_to_end() {
    let client = setup_client(Counters::default()).await;
    let search = HeadwordAutocomplete::new();

    let candidates = search.suggest(&client, "cr").await.expect("Should fetch");
    assert_eq!(candidates, vec!["cream", "crew", "crib"]);
}

// =============================================================================
// Page-level concurrency
// =============================================================================

#[tokio::test]
async fn test_page_hydrates_maps_concurrently_and_isolates_failures() {
    let counters = Counters::default();
    let base_url = spawn_fixture(counters).await;
    let config = AppConfig {
        base_url,
        request_timeout_secs: 1,
        ..AppConfig::default()
    };
    let page = Page::new(&config).expect("Should build page");

    let widgets = vec![
        MapWidget::new(PageContext::sense("42"), "map1"),
        // Origins for places are not mounted on the fixture: this one fails.
        MapWidget::new(PageContext::place("nowhere"), "map2"),
    ];

    let statuses = page.hydrate_maps(&widgets).await;
    assert_eq!(statuses.len(), 2);
    assert!(statuses[0].is_ready());
    assert!(statuses[1].is_failed());

    // Independent widgets: the failure left the first scene intact.
    let scene = match &statuses[0] {
        rhymeviz_widgets::WidgetStatus::Ready(scene) => scene,
        other => panic!("expected ready scene, got {other:?}"),
    };
    assert_eq!(scene.points.len(), 1);
}
