//! MCP request loop over a line transport.
//!
//! Lines are handled strictly in arrival order; each one is dispatched to
//! completion before the next is read.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use super::{LineTransport, TransportError};
use crate::mcp::server::{handle_line, Outcome};
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerExit {
    EndOfInput,
    Shutdown,
}

pub async fn serve<R, W>(
    state: &AppState,
    transport: &mut LineTransport<R, W>,
) -> Result<ServerExit, TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let Some(line) = transport.read_line().await? else {
            info!("stdin closed, stopping");
            return Ok(ServerExit::EndOfInput);
        };

        if line.trim().is_empty() {
            continue;
        }

        match handle_line(state, &line).await {
            Outcome::Respond(response) => transport.write_message(&response).await?,
            Outcome::RespondThenShutdown(response) => {
                transport.write_message(&response).await?;
                info!("shutdown requested, stopping");
                return Ok(ServerExit::Shutdown);
            }
            Outcome::Shutdown => {
                info!("shutdown requested, stopping");
                return Ok(ServerExit::Shutdown);
            }
            Outcome::NoResponse => debug!("no response for line"),
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("SIGINT received"),
        () = terminate => info!("SIGTERM received"),
    }
}
