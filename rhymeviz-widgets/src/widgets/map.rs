//! Origin map widget
//!
//! One widget per map canvas. The typed page context selects the data
//! endpoint (sense pages are the default context; artist and place pages
//! are the non-default kinds). Points missing either coordinate are
//! skipped; the viewport fit covers exactly the plotted points. Heatmap
//! weight grows exponentially with occurrence count. Non-default contexts
//! clamp the zoom once, on the first bounds-changed event after the fit,
//! through a one-shot subscription.

use once_cell::sync::Lazy;
use rhymeviz_common::api::types::{FeatureCollection, OriginsPayload};
use rhymeviz_common::api::DataClient;
use rhymeviz_common::events::{EventBus, WidgetEvent};
use rhymeviz_common::{PageContext, Result};
use serde_json::{json, Value};

/// Base of the exponential heatmap weight
pub const WEIGHT_BASE: f64 = 1.6;
/// Padding around the fitted bounds, in pixels
pub const FIT_PADDING: f64 = 50.0;
/// Ceiling on the zoom a bounds fit may produce
pub const FIT_MAX_ZOOM: f64 = 12.0;
/// Fixed zoom level applied once on non-default contexts
pub const ZOOM_CLAMP_LEVEL: f64 = 9.0;

/// Initial view before any data arrives (continental US)
pub const DEFAULT_CENTER: (f64, f64) = (-98.5795, 39.8283);
pub const DEFAULT_ZOOM: f64 = 3.0;

/// Color ramp shared by the heatmap and circle layers
static HEAT_COLORS: Lazy<Vec<(f64, &'static str)>> = Lazy::new(|| {
    vec![
        (0.0, "rgba(33,102,172,0)"),
        (0.2, "rgb(103,169,207)"),
        (0.4, "rgb(209,229,240)"),
        (0.6, "rgb(253,219,199)"),
        (0.8, "rgb(239,138,98)"),
        (1.0, "rgb(178,24,43)"),
    ]
});

/// Heatmap weight for an occurrence count; strictly monotonic
pub fn heatmap_weight(count: u32) -> f64 {
    WEIGHT_BASE.powi(count as i32)
}

/// One plotted map point
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedPoint {
    pub lng: f64,
    pub lat: f64,
    pub name: String,
    pub weight: f64,
}

/// Geographic bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    fn from_point(lng: f64, lat: f64) -> Self {
        Self {
            west: lng,
            south: lat,
            east: lng,
            north: lat,
        }
    }

    fn extend(&mut self, lng: f64, lat: f64) {
        self.west = self.west.min(lng);
        self.east = self.east.max(lng);
        self.south = self.south.min(lat);
        self.north = self.north.max(lat);
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }
}

/// Viewport fit instruction for the mapping library
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    pub bounds: Bounds,
    pub padding: f64,
    pub max_zoom: f64,
}

/// Marker with its info-popup label
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub lng: f64,
    pub lat: f64,
    pub label: String,
}

/// One-shot zoom clamp instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomClamp {
    pub level: f64,
}

/// Render-ready map scene
#[derive(Debug, Clone)]
pub struct MapScene {
    pub points: Vec<PlottedPoint>,
    /// `None` when nothing was plottable
    pub fit: Option<ViewportFit>,
}

impl MapScene {
    fn from_points(points: Vec<PlottedPoint>) -> Self {
        let mut iter = points.iter();
        let fit = iter.next().map(|first| {
            let mut bounds = Bounds::from_point(first.lng, first.lat);
            for p in iter {
                bounds.extend(p.lng, p.lat);
            }
            ViewportFit {
                bounds,
                padding: FIT_PADDING,
                max_zoom: FIT_MAX_ZOOM,
            }
        });
        Self { points, fit }
    }

    /// Markers for the marker/popup presentation
    pub fn markers(&self) -> Vec<Marker> {
        self.points
            .iter()
            .map(|p| Marker {
                lng: p.lng,
                lat: p.lat,
                label: p.name.clone(),
            })
            .collect()
    }

    /// Info-popup label bound to a marker
    pub fn popup_label(&self, marker_index: usize) -> Option<&str> {
        self.points.get(marker_index).map(|p| p.name.as_str())
    }

    /// GeoJSON source for the heatmap/circle layers
    pub fn geojson_source(&self) -> Value {
        let features: Vec<Value> = self
            .points
            .iter()
            .map(|p| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [p.lng, p.lat],
                    },
                    "properties": {
                        "name": p.name,
                        "weight": p.weight,
                    },
                })
            })
            .collect();

        json!({
            "type": "geojson",
            "data": {
                "type": "FeatureCollection",
                "features": features,
            },
        })
    }

    /// Heatmap layer paint specification
    pub fn heatmap_layer(&self, source: &str) -> Value {
        let mut color = vec![
            json!("interpolate"),
            json!(["linear"]),
            json!(["heatmap-density"]),
        ];
        for (stop, rgb) in HEAT_COLORS.iter() {
            color.push(json!(stop));
            color.push(json!(rgb));
        }

        json!({
            "id": "points-heat",
            "type": "heatmap",
            "source": source,
            "maxzoom": 9,
            "paint": {
                "heatmap-weight": ["interpolate", ["linear"], ["get", "weight"], 0, 0, 6, 3],
                "heatmap-intensity": ["interpolate", ["linear"], ["zoom"], 0, 1, 9, 3],
                "heatmap-color": color,
                "heatmap-radius": ["interpolate", ["linear"], ["zoom"], 0, 2, 9, 20],
                "heatmap-opacity": ["interpolate", ["linear"], ["zoom"], 7, 1, 9, 0],
            },
        })
    }

    /// Circle layer taking over from the heatmap at street zooms
    pub fn circle_layer(&self, source: &str) -> Value {
        let mut color = vec![
            json!("interpolate"),
            json!(["linear"]),
            json!(["get", "weight"]),
        ];
        for (index, (_, rgb)) in HEAT_COLORS.iter().enumerate() {
            color.push(json!(index + 1));
            color.push(json!(rgb));
        }

        json!({
            "id": "points-circles",
            "type": "circle",
            "source": source,
            "minzoom": 7,
            "paint": {
                "circle-radius": [
                    "interpolate", ["linear"], ["zoom"],
                    7, ["interpolate", ["linear"], ["get", "weight"], 1, 1, 6, 4],
                    16, ["interpolate", ["linear"], ["get", "weight"], 1, 5, 6, 50],
                ],
                "circle-color": color,
                "circle-stroke-color": "white",
                "circle-stroke-width": 1,
                "circle-opacity": ["interpolate", ["linear"], ["zoom"], 7, 0, 8, 1],
            },
        })
    }
}

/// The map widget for one canvas element
pub struct MapWidget {
    context: PageContext,
    container_id: String,
}

impl MapWidget {
    pub fn new(context: PageContext, container_id: impl Into<String>) -> Self {
        Self {
            context,
            container_id: container_id.into(),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Fetch origin records and build the scene
    pub async fn hydrate(&self, client: &DataClient) -> Result<MapScene> {
        let payload = client.fetch_origins(&self.context).await?;
        let scene = self.scene_from_origins(&payload);
        tracing::info!(
            widget = %self.container_id,
            context = %self.context.kind,
            plotted = scene.points.len(),
            "Map scene built from origin records"
        );
        Ok(scene)
    }

    /// Fetch the GeoJSON generation of the endpoint and build the scene
    pub async fn hydrate_geojson(&self, client: &DataClient) -> Result<MapScene> {
        let collection = client.fetch_geojson(&self.context).await?;
        let scene = self.scene_from_geojson(&collection);
        tracing::info!(
            widget = %self.container_id,
            context = %self.context.kind,
            plotted = scene.points.len(),
            "Map scene built from GeoJSON"
        );
        Ok(scene)
    }

    /// Build a scene from origin records, weighting by occurrence count
    pub fn scene_from_origins(&self, payload: &OriginsPayload) -> MapScene {
        let points = payload
            .records()
            .iter()
            .flatten()
            .filter_map(|record| {
                let origin = record.origin.as_ref()?;
                let (lng, lat) = origin.coordinates()?;
                Some(PlottedPoint {
                    lng,
                    lat,
                    name: origin.name.clone(),
                    weight: heatmap_weight(record.count),
                })
            })
            .collect();
        MapScene::from_points(points)
    }

    /// Build a scene from a GeoJSON collection; weights pass through
    pub fn scene_from_geojson(&self, collection: &FeatureCollection) -> MapScene {
        let points = collection
            .features
            .iter()
            .filter_map(|feature| {
                let (lng, lat) = feature.geometry.point()?;
                Some(PlottedPoint {
                    lng,
                    lat,
                    name: feature.properties.name.clone().unwrap_or_default(),
                    weight: feature.properties.weight.unwrap_or(1.0),
                })
            })
            .collect();
        MapScene::from_points(points)
    }

    /// Announce that the viewport fit has been applied
    pub fn announce_fit(&self, bus: &EventBus) {
        bus.emit(WidgetEvent::BoundsChanged {
            widget: self.container_id.clone(),
        });
    }

    /// One-shot zoom clamp for this widget
    ///
    /// Default-context maps never clamp; non-default contexts clamp to
    /// [`ZOOM_CLAMP_LEVEL`] on the first bounds-changed event, after which
    /// the subscription is spent. The subscription is taken before this
    /// returns, so a fit announced right after is never missed.
    pub fn clamp_zoom_once(
        &self,
        bus: &EventBus,
    ) -> impl std::future::Future<Output = Option<ZoomClamp>> {
        let is_default = self.context.kind.is_default();
        let subscription = bus.subscribe_once();
        let id = self.container_id.clone();
        async move {
            if is_default {
                return None;
            }
            subscription
                .wait(move |event| {
                    matches!(event, WidgetEvent::BoundsChanged { widget } if *widget == id)
                })
                .await
                .map(|_| ZoomClamp {
                    level: ZOOM_CLAMP_LEVEL,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhymeviz_common::api::types::{Origin, OriginRecord};

    fn record(lat: Option<f64>, lng: Option<f64>, name: &str, count: u32) -> Option<OriginRecord> {
        Some(OriginRecord {
            origin: Some(Origin {
                latitude: lat,
                longitude: lng,
                name: name.to_string(),
                slug: None,
            }),
            count,
        })
    }

    fn widget(ctx: PageContext) -> MapWidget {
        MapWidget::new(ctx, "map1")
    }

    #[test]
    fn test_weight_is_monotonic_in_count() {
        for count in 0..20 {
            assert!(heatmap_weight(count + 1) > heatmap_weight(count));
        }
        assert!((heatmap_weight(2) - 2.56).abs() < 1e-9);
    }

    #[test]
    fn test_points_without_both_coordinates_are_skipped() {
        let payload = OriginsPayload {
            senses: Some(vec![
                record(Some(40.7), Some(-73.9), "Queens", 1),
                record(None, Some(-73.9), "No lat", 1),
                record(Some(40.7), None, "No lng", 1),
                Some(OriginRecord {
                    origin: None,
                    count: 3,
                }),
                None,
            ]),
            ..Default::default()
        };

        let scene = widget(PageContext::sense("1")).scene_from_origins(&payload);
        assert_eq!(scene.points.len(), 1);
        assert_eq!(scene.points[0].name, "Queens");
    }

    #[test]
    fn test_bounds_cover_exactly_the_plotted_points() {
        let payload = OriginsPayload {
            artists: Some(vec![
                record(Some(40.7), Some(-73.9), "Queens", 1),
                record(Some(34.0), Some(-118.2), "LA", 2),
                record(None, None, "invisible", 9),
            ]),
            ..Default::default()
        };

        let scene = widget(PageContext::artist("nas")).scene_from_origins(&payload);
        let fit = scene.fit.unwrap();
        assert_eq!(fit.bounds.west, -118.2);
        assert_eq!(fit.bounds.east, -73.9);
        assert_eq!(fit.bounds.south, 34.0);
        assert_eq!(fit.bounds.north, 40.7);
        assert_eq!(fit.padding, FIT_PADDING);
        assert_eq!(fit.max_zoom, FIT_MAX_ZOOM);
    }

    #[test]
    fn test_empty_scene_has_no_fit() {
        let scene = widget(PageContext::sense("1")).scene_from_origins(&OriginsPayload::default());
        assert!(scene.points.is_empty());
        assert!(scene.fit.is_none());
    }

    #[test]
    fn test_geojson_weights_pass_through() {
        let collection: FeatureCollection = serde_json::from_str(
            r#"{"type": "FeatureCollection", "features": [
                {"geometry": {"type": "Point", "coordinates": [-73.9, 40.7]},
                 "properties": {"name": "Queensbridge", "weight": 42.0}},
                {"geometry": {"type": "LineString", "coordinates": []},
                 "properties": {}}
            ]}"#,
        )
        .unwrap();

        let scene = widget(PageContext::place("queensbridge")).scene_from_geojson(&collection);
        assert_eq!(scene.points.len(), 1);
        assert_eq!(scene.points[0].weight, 42.0);
    }

    #[test]
    fn test_markers_carry_popup_labels() {
        let payload = OriginsPayload {
            places: Some(vec![record(Some(40.7), Some(-73.9), "Queens", 1)]),
            ..Default::default()
        };
        let scene = widget(PageContext::place("queens")).scene_from_origins(&payload);
        let markers = scene.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].label, "Queens");
        assert_eq!(scene.popup_label(0), Some("Queens"));
        assert_eq!(scene.popup_label(7), None);
    }

    #[test]
    fn test_layer_specs_reference_the_source() {
        let payload = OriginsPayload {
            senses: Some(vec![record(Some(40.7), Some(-73.9), "Queens", 2)]),
            ..Default::default()
        };
        let scene = widget(PageContext::sense("1")).scene_from_origins(&payload);

        let source = scene.geojson_source();
        assert_eq!(source["type"], "geojson");
        assert_eq!(source["data"]["features"].as_array().unwrap().len(), 1);
        assert_eq!(
            source["data"]["features"][0]["properties"]["weight"],
            json!(heatmap_weight(2))
        );

        let heat = scene.heatmap_layer("points");
        assert_eq!(heat["source"], "points");
        assert_eq!(heat["type"], "heatmap");

        let circles = scene.circle_layer("points");
        assert_eq!(circles["minzoom"], 7);
    }

    #[tokio::test]
    async fn test_zoom_clamp_is_one_shot_for_non_default_contexts() {
        let bus = EventBus::default();
        let map = widget(PageContext::artist("nas"));

        // Subscription is taken here, before any event fires.
        let waiter = tokio::spawn(map.clamp_zoom_once(&bus));

        // An event for a different widget must not satisfy the clamp.
        bus.emit(WidgetEvent::BoundsChanged {
            widget: "other-map".to_string(),
        });
        map.announce_fit(&bus);

        let clamp = waiter.await.unwrap();
        assert_eq!(
            clamp,
            Some(ZoomClamp {
                level: ZOOM_CLAMP_LEVEL
            })
        );
    }

    #[tokio::test]
    async fn test_default_context_never_clamps() {
        let bus = EventBus::default();
        let map = widget(PageContext::sense("1"));
        assert_eq!(map.clamp_zoom_once(&bus).await, None);
    }
}
