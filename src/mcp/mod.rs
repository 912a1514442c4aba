//! MCP (Model Context Protocol) Server
//!
//! Exposes the catalog tools to an MCP client over line-delimited JSON-RPC.
//!
//! # Architecture
//!
//! 1. **Protocol Layer** (`protocol`): JSON-RPC 2.0 message types
//! 2. **Server Layer** (`server`): stdio read loop and request dispatch

// Protocol layer: JSON-RPC 2.0 message types
pub mod protocol;

// Server layer: stdio host
pub mod server;

pub use protocol::{McpError, McpMethod, McpRequest, McpResponse, Tool, ToolCallParams};
pub use server::McpServer;
