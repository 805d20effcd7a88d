//! Endpoint catalog, payload models, and the HTTP data client

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::DataClient;
pub use endpoints::Endpoint;
