//! MTG Catalog MCP Library
//!
//! Client and resilience layer for the Magic: The Gathering catalog API,
//! exposed to MCP clients as five tools: `search_cards`, `get_card`,
//! `filter_cards`, `get_sets` and `get_random_cards`.

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod rate_limit;
pub mod tools;

pub use api::CatalogClient;
pub use error::{ClassifiedError, ErrorKind};
