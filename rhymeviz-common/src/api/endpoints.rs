//! Catalog of the host application endpoints the widgets consume
//!
//! All endpoints are GET and return JSON or GeoJSON. Paths mirror the host
//! application's URL layout; the data client joins them to the configured
//! base URL and appends the CSRF token.

use crate::context::{ContextKind, PageContext};

/// One consumable endpoint, fully parameterized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Collaboration tree for the artist network graph
    ArtistNetwork { slug: String },
    /// Legacy song hierarchy tree
    SongTree { slug: String },
    /// Release-date dendrogram tree
    ReleaseDateTree { slug: String },
    /// Origin records for the artists citing a sense
    SenseArtists { sense_id: String },
    /// Legacy origin endpoint for a sense
    SenseArtistOrigins { sense_id: String },
    /// Origin records for a single artist
    ArtistOrigins { slug: String },
    /// Origin records for the artists from a place
    PlaceOrigins { slug: String },
    /// GeoJSON feature collection for the artists citing a sense
    SenseArtistsGeo { sense_id: String },
    /// GeoJSON feature collection for a single artist
    ArtistGeo { slug: String },
    /// GeoJSON feature collection for a place
    PlaceGeo { slug: String },
    /// Examples beyond the first page of a sense
    RemainingExamples { sense_id: String },
    /// Example records for an artist's senses
    ArtistSenseExamples { slug: String },
    /// Artists (with thumbnail images) from a place
    PlaceArtists { slug: String },
    /// Headword autocomplete candidates
    HeadwordSearch,
    /// Legacy headword autocomplete endpoint
    SearchHeadwords,
}

impl Endpoint {
    /// URL path relative to the host application base
    pub fn path(&self) -> String {
        match self {
            Endpoint::ArtistNetwork { slug } => format!("/artists/{slug}/network_json/"),
            Endpoint::SongTree { slug } => format!("/songs/{slug}/song_tree/"),
            Endpoint::ReleaseDateTree { slug } => {
                format!("/data/songs/{slug}/release_date_tree/")
            }
            Endpoint::SenseArtists { sense_id } => {
                format!("/data/senses/{sense_id}/artists/")
            }
            Endpoint::SenseArtistOrigins { sense_id } => {
                format!("/senses/{sense_id}/artist_origins/")
            }
            Endpoint::ArtistOrigins { slug } => format!("/data/artists/{slug}/"),
            Endpoint::PlaceOrigins { slug } => format!("/data/places/{slug}/"),
            Endpoint::SenseArtistsGeo { sense_id } => {
                format!("/data/senses/{sense_id}/artists/geojson")
            }
            Endpoint::ArtistGeo { slug } => format!("/data/artists/{slug}/geojson"),
            Endpoint::PlaceGeo { slug } => format!("/data/places/{slug}/geojson"),
            Endpoint::RemainingExamples { sense_id } => {
                format!("/senses/{sense_id}/remaining_examples/")
            }
            Endpoint::ArtistSenseExamples { slug } => {
                format!("/artists/{slug}/sense_examples_json")
            }
            Endpoint::PlaceArtists { slug } => format!("/places/{slug}/artists/json"),
            Endpoint::HeadwordSearch => "/data/headword_search/".to_string(),
            Endpoint::SearchHeadwords => "/search_headwords/".to_string(),
        }
    }

    /// Extra query pairs the endpoint expects beyond the CSRF token
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::SenseArtistsGeo { .. }
            | Endpoint::ArtistGeo { .. }
            | Endpoint::PlaceGeo { .. } => vec![("format", "json".to_string())],
            _ => Vec::new(),
        }
    }

    /// Origin-record endpoint for a map widget context
    pub fn origins_for(ctx: &PageContext) -> Endpoint {
        match ctx.kind {
            ContextKind::Sense => Endpoint::SenseArtists {
                sense_id: ctx.identifier.clone(),
            },
            ContextKind::Artist => Endpoint::ArtistOrigins {
                slug: ctx.identifier.clone(),
            },
            ContextKind::Place => Endpoint::PlaceOrigins {
                slug: ctx.identifier.clone(),
            },
        }
    }

    /// GeoJSON endpoint for a map widget context
    pub fn geojson_for(ctx: &PageContext) -> Endpoint {
        match ctx.kind {
            ContextKind::Sense => Endpoint::SenseArtistsGeo {
                sense_id: ctx.identifier.clone(),
            },
            ContextKind::Artist => Endpoint::ArtistGeo {
                slug: ctx.identifier.clone(),
            },
            ContextKind::Place => Endpoint::PlaceGeo {
                slug: ctx.identifier.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let e = Endpoint::ArtistNetwork {
            slug: "big-l".to_string(),
        };
        assert_eq!(e.path(), "/artists/big-l/network_json/");

        let e = Endpoint::RemainingExamples {
            sense_id: "e9000_trE_1".to_string(),
        };
        assert_eq!(e.path(), "/senses/e9000_trE_1/remaining_examples/");
    }

    #[test]
    fn test_context_selects_origin_endpoint() {
        let sense = PageContext::sense("42");
        assert_eq!(
            Endpoint::origins_for(&sense).path(),
            "/data/senses/42/artists/"
        );

        let artist = PageContext::artist("nas");
        assert_eq!(Endpoint::origins_for(&artist).path(), "/data/artists/nas/");

        let place = PageContext::place("queensbridge");
        assert_eq!(
            Endpoint::origins_for(&place).path(),
            "/data/places/queensbridge/"
        );
    }

    #[test]
    fn test_geojson_endpoints_request_json_format() {
        let e = Endpoint::geojson_for(&PageContext::artist("nas"));
        assert_eq!(e.path(), "/data/artists/nas/geojson");
        assert_eq!(e.query_pairs(), vec![("format", "json".to_string())]);
    }
}
