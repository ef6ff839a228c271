//! Knowledge capture domain
//!
//! Provides the recorder that formats knowledge entries and the MCP tool that drives it.

pub mod recorder;
pub mod tools;
