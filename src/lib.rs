use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod errors;
pub mod knowledge_log;
pub mod logging;
pub mod mcp;
pub mod stdio;

use knowledge_log::KnowledgeLog;

#[derive(Clone)]
pub struct AppState {
    pub knowledge_log: Arc<dyn KnowledgeLog>,
}

impl AppState {
    pub fn new(knowledge_log: Arc<dyn KnowledgeLog>) -> Self {
        Self { knowledge_log }
    }
}
