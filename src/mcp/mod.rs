//! Model Context Protocol (MCP) server implementation.
//!
//! Exposes translation key lookups to AI coding agents over stdio.
//!
//! ## Module Structure
//!
//! - `server`: Main MCP server implementation
//! - `types`: MCP-specific type definitions

mod server;
pub mod types;

pub use server::{TranskeyMcpServer, run_server};
