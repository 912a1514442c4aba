//! Catalog Tools
//!
//! The five tools exposed to MCP clients.
//!
//! ## Architecture
//!
//! - `definitions` - names, descriptions and JSON input schemas
//! - `handler` - argument extraction and dispatch to the catalog client
//! - `format` - text rendering of cards and sets

pub mod definitions;
mod format;
mod handler;

pub use definitions::{tool_definitions, TOOL_NAMES};
pub use handler::{ToolHandler, ToolOutput};
