//! Concurrent hydration of one page's widgets
//!
//! Widgets are independent: each owns its fetch and its output, so a page
//! hydrates them concurrently and unordered. A failure in one widget never
//! touches another; it lands in that widget's status and is logged.

use crate::widgets::map::{MapScene, MapWidget};
use crate::widgets::WidgetStatus;
use rhymeviz_common::api::DataClient;
use rhymeviz_common::events::EventBus;
use rhymeviz_common::{AppConfig, Result};

/// Shared page plumbing: one data client and one event bus
pub struct Page {
    client: DataClient,
    bus: EventBus,
}

impl Page {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: DataClient::new(config)?,
            bus: EventBus::default(),
        })
    }

    pub fn client(&self) -> &DataClient {
        &self.client
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Hydrate every map canvas on the page concurrently
    ///
    /// Results arrive in widget order; each failure is isolated to its own
    /// status entry.
    pub async fn hydrate_maps(&self, widgets: &[MapWidget]) -> Vec<WidgetStatus<MapScene>> {
        let fetches = widgets.iter().map(|w| w.hydrate(&self.client));
        futures::future::join_all(fetches)
            .await
            .into_iter()
            .zip(widgets)
            .map(|(result, widget)| {
                if let Err(e) = &result {
                    tracing::warn!(widget = %widget.container_id(), error = %e, "Map hydration failed");
                }
                WidgetStatus::from_result(result)
            })
            .collect()
    }
}
