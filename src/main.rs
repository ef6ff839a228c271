use std::sync::Arc;

use knowledge_capture_mcp::{
    config::Config,
    knowledge_log::FileKnowledgeLog,
    logging,
    stdio::{serve, shutdown_signal, LineTransport},
    AppState,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::from_env()?;
    let knowledge_log = FileKnowledgeLog::new(&config.knowledge_dir, &config.session_file);
    info!(
        knowledge_log = %knowledge_log.path().display(),
        "server starting on stdio"
    );
    let state = AppState::new(Arc::new(knowledge_log));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let mut transport = LineTransport::new(tokio::io::stdin(), tokio::io::stdout());
        tokio::select! {
            result = serve(&state, &mut transport) => result.map(Some),
            () = shutdown_signal() => Ok(None),
        }
    });

    // A pending stdin read would otherwise hold up runtime teardown.
    runtime.shutdown_background();

    match result? {
        Some(exit) => info!(?exit, "server stopped"),
        None => info!("server stopped by signal"),
    }
    Ok(())
}
