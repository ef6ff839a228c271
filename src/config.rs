use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_KNOWLEDGE_DIR: &str = ".knowledge";
pub const DEFAULT_SESSION_FILE: &str = "session.md";

#[derive(Debug, Clone)]
pub struct Config {
    pub knowledge_dir: PathBuf,
    pub session_file: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("KNOWLEDGE_DIR must not be empty")]
    EmptyKnowledgeDir,
    #[error("KNOWLEDGE_SESSION_FILE must be a plain file name")]
    InvalidSessionFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            knowledge_dir: PathBuf::from(DEFAULT_KNOWLEDGE_DIR),
            session_file: DEFAULT_SESSION_FILE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let knowledge_dir = match lookup("KNOWLEDGE_DIR") {
            Some(value) => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(ConfigError::EmptyKnowledgeDir);
                }
                PathBuf::from(value)
            }
            None => PathBuf::from(DEFAULT_KNOWLEDGE_DIR),
        };

        let session_file = lookup("KNOWLEDGE_SESSION_FILE")
            .map(|value| value.trim().to_string())
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
        validate_session_file(&session_file)?;

        Ok(Self {
            knowledge_dir,
            session_file,
        })
    }
}

fn validate_session_file(name: &str) -> Result<(), ConfigError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\');

    if plain {
        Ok(())
    } else {
        Err(ConfigError::InvalidSessionFile)
    }
}
