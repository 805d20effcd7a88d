//! # Rhymeviz Widgets
//!
//! The widget families of the lyrics/dictionary presentation layer:
//!
//! - `widgets::network`: force-directed artist collaboration graph
//! - `widgets::song_tree`: radial/cluster release-date dendrograms
//! - `widgets::map`: origin maps (markers, heatmap layers, viewport fit)
//! - `widgets::examples`: incrementally loaded example/artist lists
//! - `widgets::search`: headword autocomplete
//!
//! Control flow is uniform: construct a widget from its typed page context,
//! hydrate it with one fetch through `rhymeviz_common::api::DataClient`,
//! and turn the payload into the artifact the rendering side consumes
//! (SVG document, map layer JSON, HTML fragments). Widgets are independent
//! of one another and own disjoint output; `page` runs their fetches
//! concurrently.

pub mod hierarchy;
pub mod layout;
pub mod page;
pub mod render;
pub mod widgets;

pub use layout::Viewport;
pub use widgets::WidgetStatus;
