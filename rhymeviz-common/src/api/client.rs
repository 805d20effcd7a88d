//! HTTP data client for the host application endpoints
//!
//! One client instance serves every widget on a page. Each widget issues at
//! most one request per hydration; there is no retry. Failures map to
//! explicit `Error` variants so widgets can surface them.

use crate::api::endpoints::Endpoint;
use crate::api::types::{
    FeatureCollection, HeadwordsPayload, HierarchyNode, OriginsPayload, PlaceArtistsPayload,
    RemainingExamplesPayload, SenseExamplesPayload,
};
use crate::config::AppConfig;
use crate::context::PageContext;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("rhymeviz/", env!("CARGO_PKG_VERSION"));

/// Client for the host application's JSON/GeoJSON endpoints
pub struct DataClient {
    http_client: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl DataClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            csrf_token: config.csrf_token.clone(),
        })
    }

    /// Absolute URL for an endpoint
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// GET an endpoint and decode its JSON body
    ///
    /// The CSRF token, when configured, is mirrored as a query parameter the
    /// way the host page passes it.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        self.get_json_with(endpoint, &[]).await
    }

    async fn get_json_with<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        extra: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url_for(endpoint);
        tracing::debug!(url = %url, "Fetching widget data");

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.csrf_token {
            request = request.query(&[("csrfmiddlewaretoken", token.as_str())]);
        }
        for (key, value) in endpoint.query_pairs() {
            request = request.query(&[(key, value.as_str())]);
        }
        for (key, value) in extra {
            request = request.query(&[(key, value)]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(endpoint.path())
            } else {
                Error::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// Collaboration tree for the artist network graph
    pub async fn fetch_network(&self, slug: &str) -> Result<HierarchyNode> {
        let tree = self
            .get_json::<HierarchyNode>(&Endpoint::ArtistNetwork {
                slug: slug.to_string(),
            })
            .await?;
        tracing::info!(artist = %slug, collaborators = tree.children.len(), "Fetched collaboration tree");
        Ok(tree)
    }

    /// Release-date dendrogram tree for a song
    pub async fn fetch_release_date_tree(&self, slug: &str) -> Result<HierarchyNode> {
        self.get_json(&Endpoint::ReleaseDateTree {
            slug: slug.to_string(),
        })
        .await
    }

    /// Legacy song hierarchy tree
    pub async fn fetch_song_tree(&self, slug: &str) -> Result<HierarchyNode> {
        self.get_json(&Endpoint::SongTree {
            slug: slug.to_string(),
        })
        .await
    }

    /// Origin records for a map widget context
    pub async fn fetch_origins(&self, ctx: &PageContext) -> Result<OriginsPayload> {
        self.get_json(&Endpoint::origins_for(ctx)).await
    }

    /// GeoJSON feature collection for a map widget context
    pub async fn fetch_geojson(&self, ctx: &PageContext) -> Result<FeatureCollection> {
        self.get_json(&Endpoint::geojson_for(ctx)).await
    }

    /// Examples beyond the first page of a sense
    pub async fn fetch_remaining_examples(
        &self,
        sense_id: &str,
    ) -> Result<RemainingExamplesPayload> {
        self.get_json(&Endpoint::RemainingExamples {
            sense_id: sense_id.to_string(),
        })
        .await
    }

    /// Example records for an artist's senses
    pub async fn fetch_sense_examples(&self, slug: &str) -> Result<SenseExamplesPayload> {
        self.get_json(&Endpoint::ArtistSenseExamples {
            slug: slug.to_string(),
        })
        .await
    }

    /// Artists (with images) from a place
    pub async fn fetch_place_artists(&self, slug: &str) -> Result<PlaceArtistsPayload> {
        self.get_json(&Endpoint::PlaceArtists {
            slug: slug.to_string(),
        })
        .await
    }

    /// Headword autocomplete candidates for a search term
    pub async fn search_headwords(&self, term: &str) -> Result<HeadwordsPayload> {
        self.get_json_with(&Endpoint::HeadwordSearch, &[("term", term)])
            .await
    }

    /// Legacy headword autocomplete endpoint
    pub async fn search_headwords_legacy(&self, term: &str) -> Result<HeadwordsPayload> {
        self.get_json_with(&Endpoint::SearchHeadwords, &[("term", term)])
            .await
    }
}
