//! Incremental example/artist list loader
//!
//! One state machine per toggle control. Visibility flips between
//! collapsed and expanded; the first expansion with an empty list shows
//! the loading indicator, hides the control, and issues the single fetch.
//! The list is populated exactly once; later toggles only show and hide
//! it. A failed fetch lands in `Failed` with the indicator hidden and the
//! control restored, and the next expansion retries.

use crate::render::html::{anchor, escape, list_item, span};
use rhymeviz_common::api::types::{ArtistCard, ExampleRecord, FeaturedArtist};
use rhymeviz_common::api::DataClient;
use rhymeviz_common::{ContextKind, PageContext, Result};

/// Visibility of the example list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Collapsed,
    Expanded,
}

/// Fetch lifecycle of the list contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing fetched yet
    Unloaded,
    /// Fetch in flight; indicator shown, control hidden
    Loading,
    /// List populated; no further fetches
    Loaded,
    /// Fetch failed; control restored, next expansion retries
    Failed,
}

/// What a click changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Only visibility flipped
    VisibilityOnly,
    /// The expansion needs a fetch
    NeedsFetch,
}

/// Control label pair; copy varies by page kind
#[derive(Debug, Clone)]
pub struct ToggleCopy {
    pub show: &'static str,
    pub hide: &'static str,
}

impl ToggleCopy {
    pub fn for_kind(kind: ContextKind) -> Self {
        match kind {
            ContextKind::Sense => Self {
                show: "Toggle more examples",
                hide: "Toggle fewer examples",
            },
            ContextKind::Artist => Self {
                show: "Show more examples",
                hide: "Hide more examples",
            },
            ContextKind::Place => Self {
                show: "Show more artists",
                hide: "Hide more artists",
            },
        }
    }
}

/// The toggle control plus its lazily loaded list
pub struct ExamplesToggle {
    context: PageContext,
    visibility: Visibility,
    phase: LoadPhase,
    items: Vec<String>,
    copy: ToggleCopy,
    last_error: Option<String>,
}

impl ExamplesToggle {
    pub fn new(context: PageContext) -> Self {
        let copy = ToggleCopy::for_kind(context.kind);
        Self {
            context,
            visibility: Visibility::Collapsed,
            phase: LoadPhase::Unloaded,
            items: Vec::new(),
            copy,
            last_error: None,
        }
    }

    /// One user click: flip visibility, fetch when needed
    pub async fn click(&mut self, client: &DataClient) -> Result<()> {
        match self.toggle() {
            ToggleAction::NeedsFetch => self.load(client).await,
            ToggleAction::VisibilityOnly => Ok(()),
        }
    }

    /// Synchronous part of a click
    pub fn toggle(&mut self) -> ToggleAction {
        match self.visibility {
            Visibility::Expanded => {
                self.visibility = Visibility::Collapsed;
                ToggleAction::VisibilityOnly
            }
            Visibility::Collapsed => {
                self.visibility = Visibility::Expanded;
                if self.items.is_empty()
                    && matches!(self.phase, LoadPhase::Unloaded | LoadPhase::Failed)
                {
                    self.phase = LoadPhase::Loading;
                    ToggleAction::NeedsFetch
                } else {
                    ToggleAction::VisibilityOnly
                }
            }
        }
    }

    /// Perform the single fetch for this control's context
    pub async fn load(&mut self, client: &DataClient) -> Result<()> {
        let result = self.fetch_items(client).await;
        match result {
            Ok(items) => {
                self.items = items;
                self.phase = LoadPhase::Loaded;
                self.last_error = None;
                tracing::info!(
                    context = %self.context.kind,
                    identifier = %self.context.identifier,
                    items = self.items.len(),
                    "Example list populated"
                );
                Ok(())
            }
            Err(e) => {
                self.phase = LoadPhase::Failed;
                self.last_error = Some(e.to_string());
                tracing::warn!(
                    context = %self.context.kind,
                    identifier = %self.context.identifier,
                    error = %e,
                    "Example list fetch failed"
                );
                Err(e)
            }
        }
    }

    async fn fetch_items(&self, client: &DataClient) -> Result<Vec<String>> {
        Ok(match self.context.kind {
            ContextKind::Sense => client
                .fetch_remaining_examples(&self.context.identifier)
                .await?
                .remaining_examples
                .iter()
                .flatten()
                .map(render_example)
                .collect(),
            ContextKind::Artist => client
                .fetch_sense_examples(&self.context.identifier)
                .await?
                .examples
                .iter()
                .flatten()
                .map(render_example)
                .collect(),
            ContextKind::Place => client
                .fetch_place_artists(&self.context.identifier)
                .await?
                .artists_with_image
                .iter()
                .map(render_artist_card)
                .collect(),
        })
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current control label
    pub fn label(&self) -> &'static str {
        match self.visibility {
            Visibility::Expanded => self.copy.hide,
            Visibility::Collapsed => self.copy.show,
        }
    }

    pub fn list_visible(&self) -> bool {
        self.visibility == Visibility::Expanded
    }

    pub fn indicator_visible(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn control_visible(&self) -> bool {
        self.phase != LoadPhase::Loading
    }
}

/// Comma-joined featured-artist links; the final entry emits no separator
pub fn render_featured(featured: &[FeaturedArtist]) -> String {
    let mut out = String::new();
    for (index, artist) in featured.iter().enumerate() {
        out.push_str(&anchor(&format!("/artists/{}", artist.slug), &artist.name));
        if index + 1 < featured.len() {
            out.push_str(", ");
        }
    }
    out
}

/// One example list fragment: date, artist, title, featuring, album, lyric
pub fn render_example(record: &ExampleRecord) -> String {
    let mut parts = vec![
        span(
            "release-date",
            &escape(&record.release_date.format("%Y-%m-%d").to_string()),
        ),
        anchor(&format!("/artists/{}", record.artist_slug), &record.artist_name),
        span(
            "song-title",
            &anchor(&format!("/songs/{}", record.song_slug), &record.song_title),
        ),
    ];

    if !record.featured_artists.is_empty() {
        parts.push(span(
            "featured",
            &format!("feat. {}", render_featured(&record.featured_artists)),
        ));
    }

    if let Some(album) = &record.album {
        parts.push(span("album", &escape(album)));
    }

    // Lyric HTML comes from the host application and is inserted untouched.
    parts.push(span("lyric", &record.linked_lyric));

    list_item("example", &parts.join(" "))
}

/// One linked, captioned artist card fragment
pub fn render_artist_card(card: &ArtistCard) -> String {
    let mut inner = String::new();
    if let Some(src) = &card.image {
        inner.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\"/>",
            escape(src),
            escape(&card.name)
        ));
    }
    inner.push_str(&span("caption", &escape(&card.name)));
    list_item(
        "artist-card",
        &format!("<a href=\"/artists/{}\">{}</a>", escape(&card.slug), inner),
    )
}
