//! Payload models for the host application endpoints
//!
//! All payloads are read-only snapshots: deserialized once per widget
//! hydration and discarded on the next one. Nothing here is merged or
//! persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nested hierarchy node, used for both collaboration graphs and
/// release-date dendrograms
///
/// Forms a tree; the root is distinguished by the caller. Nodes may arrive
/// with or without an `id`; flattening assigns one to any node lacking it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HierarchyNode {
    /// Display name (artist name, song title, release date label)
    pub name: String,
    /// Occurrence/collaboration count driving node sizing
    #[serde(default)]
    pub size: Option<u32>,
    /// Thumbnail image URL for pattern fills
    #[serde(default)]
    pub img: Option<String>,
    /// Navigation target for click-through
    #[serde(default)]
    pub link: Option<String>,
    /// Server-assigned id, kept as-is when present
    #[serde(default)]
    pub id: Option<u32>,
    /// Ordered children
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Leaf node with just a name (test/builder convenience)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            img: None,
            link: None,
            id: None,
            children: Vec::new(),
        }
    }
}

/// Geographic origin of an artist or place
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Origin {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Origin {
    /// A point is only plottable when both coordinates are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }
}

fn default_count() -> u32 {
    1
}

/// One origin record with its occurrence count
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OriginRecord {
    /// Missing origins are skipped per-record
    #[serde(default)]
    pub origin: Option<Origin>,
    /// Occurrence count feeding the heatmap weight
    #[serde(default = "default_count")]
    pub count: u32,
}

/// Origin records wrapped under the key matching the page context
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OriginsPayload {
    #[serde(default)]
    pub artists: Option<Vec<Option<OriginRecord>>>,
    #[serde(default)]
    pub places: Option<Vec<Option<OriginRecord>>>,
    #[serde(default)]
    pub senses: Option<Vec<Option<OriginRecord>>>,
}

impl OriginsPayload {
    /// The record list, whichever wrapper key the endpoint used
    pub fn records(&self) -> &[Option<OriginRecord>] {
        self.artists
            .as_deref()
            .or(self.places.as_deref())
            .or(self.senses.as_deref())
            .unwrap_or(&[])
    }
}

/// GeoJSON feature collection, consumed directly by later map generations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

/// GeoJSON feature
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: FeatureProperties,
}

/// GeoJSON point geometry (coordinates are [longitude, latitude])
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

impl Geometry {
    pub fn point(&self) -> Option<(f64, f64)> {
        if self.kind == "Point" && self.coordinates.len() >= 2 {
            Some((self.coordinates[0], self.coordinates[1]))
        } else {
            None
        }
    }
}

/// Properties carried on map features
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Featured artist credit on an example
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturedArtist {
    pub name: String,
    pub slug: String,
}

/// One dictionary example citation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExampleRecord {
    /// Release date of the citing song
    pub release_date: NaiveDate,
    pub artist_name: String,
    pub artist_slug: String,
    pub song_title: String,
    pub song_slug: String,
    /// Rendered with the final entry unseparated
    #[serde(default)]
    pub featured_artists: Vec<FeaturedArtist>,
    #[serde(default)]
    pub album: Option<String>,
    /// Lyric HTML produced by the host application; inserted untouched
    pub linked_lyric: String,
}

/// Examples beyond the first page of a sense
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemainingExamplesPayload {
    #[serde(default)]
    pub remaining_examples: Vec<Option<ExampleRecord>>,
}

/// Example records for an artist's senses
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SenseExamplesPayload {
    #[serde(default)]
    pub examples: Vec<Option<ExampleRecord>>,
}

/// Artist thumbnail card on place pages
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCard {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Artists (with images) from a place
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaceArtistsPayload {
    #[serde(default)]
    pub artists_with_image: Vec<ArtistCard>,
}

/// Headword autocomplete candidates
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HeadwordsPayload {
    #[serde(default)]
    pub headwords: Vec<String>,
}
