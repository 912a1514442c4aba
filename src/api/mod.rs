//! MTG Catalog API Client
//!
//! Layered client for the public Magic: The Gathering catalog API.
//!
//! # Architecture
//!
//! - **validators**: pure argument checks, run before any network call
//! - **params**: validated arguments to query parameters
//! - **transport**: one HTTP exchange per call behind the [`Transport`] trait
//! - **retry**: bounded exponential backoff for transient failures
//! - **mapper**: response payloads to [`Card`](crate::models::Card) and [`Set`](crate::models::Set)
//! - **classify**: final failures to [`ClassifiedError`](crate::error::ClassifiedError)
//! - **client**: the [`CatalogClient`] facade tying them together
//!
//! # Example
//!
//! ```ignore
//! use mtg_catalog_mcp::api::CatalogClient;
//! use mtg_catalog_mcp::config::Config;
//!
//! let (config, _warnings) = Config::from_env()?;
//! let client = CatalogClient::from_config(&config)?;
//! let cards = client.search_cards("Lightning Bolt", Some(5)).await?;
//! ```

pub mod classify;
pub mod client;
pub mod mapper;
pub mod params;
pub mod retry;
pub mod transport;
pub mod validators;

#[cfg(test)]
mod proptests;

pub use client::CatalogClient;
pub use params::QueryParameters;
pub use retry::RetryConfig;
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport, TransportError, TransportResult};
pub use validators::FilterArgs;
