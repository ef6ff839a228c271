use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};

use crate::errors::AppError;

/// Append-only storage behind the knowledge recorder.
#[async_trait]
pub trait KnowledgeLog: Send + Sync {
    /// Creates the log starting with `header` unless it already exists.
    /// Returns `true` when this call created it.
    async fn ensure_initialized(&self, header: &str) -> Result<bool, AppError>;

    async fn append(&self, record: &str) -> Result<(), AppError>;

    fn location(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileKnowledgeLog {
    dir: PathBuf,
    file_name: String,
}

impl FileKnowledgeLog {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

#[async_trait]
impl KnowledgeLog for FileKnowledgeLog {
    async fn ensure_initialized(&self, header: &str) -> Result<bool, AppError> {
        fs::create_dir_all(&self.dir).await.map_err(|err| {
            AppError::storage(format!("failed to create {}: {err}", self.dir.display()))
        })?;

        let path = self.path();
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(err) => {
                return Err(AppError::storage(format!("failed to create {}: {err}", path.display())))
            }
        };

        let written = write_all_and_flush(&mut file, header).await;
        drop(file);
        discard_on_error(&path, written).await?;

        info!(path = %path.display(), "knowledge log created");
        Ok(true)
    }

    async fn append(&self, record: &str) -> Result<(), AppError> {
        let path = self.path();
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await
            .map_err(|err| {
                AppError::storage(format!("failed to open {}: {err}", path.display()))
            })?;

        write_all_and_flush(&mut file, record)
            .await
            .map_err(|err| AppError::storage(format!("failed to append entry: {err}")))
    }

    fn location(&self) -> String {
        self.path().display().to_string()
    }
}

async fn write_all_and_flush(file: &mut fs::File, text: &str) -> io::Result<()> {
    file.write_all(text.as_bytes()).await?;
    file.flush().await
}

/// A log without its header must not survive, or later calls would see it as initialized.
async fn discard_on_error(path: &Path, written: io::Result<()>) -> Result<(), AppError> {
    let Err(err) = written else {
        return Ok(());
    };

    if let Err(remove_err) = fs::remove_file(path).await {
        warn!(
            path = %path.display(),
            error = %remove_err,
            "failed to remove partially initialized knowledge log"
        );
    }
    Err(AppError::storage(format!("failed to write header: {err}")))
}
