//! # Rhymeviz Common Library
//!
//! Shared code for the Rhymeviz widget crates including:
//! - Typed payload models for the host application's JSON/GeoJSON endpoints
//! - Endpoint catalog and the HTTP data client
//! - Page context types (sense / artist / place)
//! - Configuration loading
//! - Widget event bus with one-shot subscriptions

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod events;

pub use config::AppConfig;
pub use context::{ContextKind, PageContext};
pub use error::{Error, Result};
