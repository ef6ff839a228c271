//! Knowledge entry formatting and recording
//!
//! Entries are rendered as Markdown blocks and appended to a [`KnowledgeLog`]; the
//! log receives a dated session header the first time anything is captured.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, Utc};

use crate::{errors::AppError, knowledge_log::KnowledgeLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Architecture,
    Pattern,
    Dependency,
    Workflow,
    Config,
    Gotcha,
    Convention,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Architecture,
        Category::Pattern,
        Category::Dependency,
        Category::Workflow,
        Category::Config,
        Category::Gotcha,
        Category::Convention,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Architecture => "architecture",
            Category::Pattern => "pattern",
            Category::Dependency => "dependency",
            Category::Workflow => "workflow",
            Category::Config => "config",
            Category::Gotcha => "gotcha",
            Category::Convention => "convention",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|category| category.as_str()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| {
                AppError::bad_request(
                    "invalid_category",
                    format!("category must be one of: {}", Self::names().join(", ")),
                )
            })
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub category: Category,
    pub topic: String,
    pub details: String,
    pub files: Option<String>,
    pub recorded_at: DateTime<Local>,
}

impl KnowledgeEntry {
    pub fn render(&self) -> String {
        let mut block = format!(
            "### [{}] [{}] {}\n**Details**: {}\n",
            self.recorded_at.format("%H:%M"),
            self.category,
            self.topic,
            self.details
        );
        if let Some(files) = self.files.as_deref().filter(|files| !files.is_empty()) {
            block.push_str(&format!("**Files**: {files}\n"));
        }
        block.push_str("---\n\n");
        block
    }
}

pub fn session_header(recorded_at: DateTime<Local>) -> String {
    let date = recorded_at.with_timezone(&Utc).format("%Y-%m-%d");
    format!("# Knowledge Capture Session - {date}\n\n")
}

pub async fn capture_knowledge(
    log: &dyn KnowledgeLog,
    entry: &KnowledgeEntry,
) -> Result<String, AppError> {
    log.ensure_initialized(&session_header(entry.recorded_at)).await?;
    log.append(&entry.render()).await?;

    Ok(format!(
        "✓ Captured to {}: [{}] {}",
        log.location(),
        entry.category,
        entry.topic
    ))
}
