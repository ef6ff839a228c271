//! Model Context Protocol (MCP) dispatch and JSON-RPC implementations
//!
//! Provides protocol-level specifics surrounding JSON-RPC validation, formatting, and routing.

pub mod rpc;
pub mod server;
