//! The widget families

pub mod examples;
pub mod map;
pub mod network;
pub mod search;
pub mod song_tree;

use rhymeviz_common::Error;

/// Hydration status of one widget
///
/// Widgets never fail silently: a fetch or decode problem lands in
/// `Failed` where the page can show a diagnostic instead of a blank spot.
#[derive(Debug)]
pub enum WidgetStatus<T> {
    /// Not hydrated yet
    Pending,
    /// Hydrated; holds the render-ready artifact
    Ready(T),
    /// Hydration failed; no retry is scheduled
    Failed(Error),
}

impl<T> WidgetStatus<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, WidgetStatus::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, WidgetStatus::Failed(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            WidgetStatus::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn from_result(result: rhymeviz_common::Result<T>) -> Self {
        match result {
            Ok(value) => WidgetStatus::Ready(value),
            Err(e) => WidgetStatus::Failed(e),
        }
    }
}
