//! Headword autocomplete widget
//!
//! Backs the header search box: terms shorter than the minimum length
//! return no suggestions without touching the network; longer terms issue
//! one fetch and surface the candidate headwords.

use rhymeviz_common::api::DataClient;
use rhymeviz_common::Result;

/// Minimum term length before a request is issued
pub const MIN_TERM_LENGTH: usize = 2;

/// Which endpoint generation serves the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    HeadwordSearch,
    LegacySearchHeadwords,
}

/// Autocomplete suggestion source
pub struct HeadwordAutocomplete {
    source: SearchSource,
}

impl HeadwordAutocomplete {
    pub fn new() -> Self {
        Self {
            source: SearchSource::HeadwordSearch,
        }
    }

    pub fn legacy() -> Self {
        Self {
            source: SearchSource::LegacySearchHeadwords,
        }
    }

    /// Candidate headwords for a term
    pub async fn suggest(&self, client: &DataClient, term: &str) -> Result<Vec<String>> {
        if term.chars().count() < MIN_TERM_LENGTH {
            return Ok(Vec::new());
        }

        let payload = match self.source {
            SearchSource::HeadwordSearch => client.search_headwords(term).await?,
            SearchSource::LegacySearchHeadwords => client.search_headwords_legacy(term).await?,
        };
        tracing::debug!(term = %term, candidates = payload.headwords.len(), "Autocomplete lookup");
        Ok(payload.headwords)
    }
}

impl Default for HeadwordAutocomplete {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhymeviz_common::AppConfig;

    #[tokio::test]
    async fn test_short_terms_issue_no_request() {
        // Unroutable base URL: a request would fail loudly, proving the
        // short-circuit never fetches.
        let config = AppConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..AppConfig::default()
        };
        let client = DataClient::new(&config).unwrap();
        let search = HeadwordAutocomplete::new();

        assert!(search.suggest(&client, "").await.unwrap().is_empty());
        assert!(search.suggest(&client, "g").await.unwrap().is_empty());
    }
}
