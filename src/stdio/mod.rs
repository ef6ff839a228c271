//! Stdio transport layer for the Model Context Protocol
//!
//! Provides newline framing over stdin/stdout and the request loop driving the dispatcher.

pub mod server;
pub mod transport;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("read error: {0}")]
    Read(#[source] std::io::Error),
    #[error("write error: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub use server::{serve, shutdown_signal, ServerExit};
pub use transport::LineTransport;
