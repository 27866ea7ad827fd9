use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::application::services::{IngestedDocument, IngestionError, IngestionService};
use crate::domain::ContentType;

/// Ingests every PDF found under a directory tree.
pub struct DirectoryIngestion {
    ingestion: Arc<IngestionService>,
}

/// Documents are keyed by their path relative to the input directory, with
/// `/` separators, so same-named files in sibling folders stay distinct.
#[derive(Debug, Default)]
pub struct DirectoryReport {
    pub documents: Vec<(String, IngestedDocument)>,
    pub failures: Vec<(PathBuf, String)>,
}

impl DirectoryIngestion {
    pub fn new(ingestion: Arc<IngestionService>) -> Self {
        Self { ingestion }
    }

    /// A file that cannot be read or extracted is logged and recorded in
    /// `failures`; the walk continues with the next file.
    pub async fn ingest_directory(
        &self,
        input_dir: &Path,
    ) -> Result<DirectoryReport, DirectoryIngestionError> {
        if !input_dir.is_dir() {
            return Err(DirectoryIngestionError::NotADirectory(
                input_dir.to_path_buf(),
            ));
        }

        let mut report = DirectoryReport::default();

        for path in find_pdfs(input_dir) {
            let filename = relative_key(input_dir, &path);

            tracing::info!(path = %path.display(), "Processing file");

            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to read file");
                    report.failures.push((path, e.to_string()));
                    continue;
                }
            };

            match self
                .ingestion
                .ingest(&data, filename.clone(), ContentType::Pdf)
                .await
            {
                Ok(document) => report.documents.push((filename, document)),
                Err(e @ IngestionError::Storage(_)) => {
                    return Err(DirectoryIngestionError::Ingestion(e));
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to ingest file");
                    report.failures.push((path, e.to_string()));
                }
            }
        }

        tracing::info!(
            ingested = report.documents.len(),
            failed = report.failures.len(),
            "Directory ingestion finished"
        );

        Ok(report)
    }
}

/// `input/a/guide.pdf` under `input` becomes `a/guide.pdf`.
pub fn relative_key(input_dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    relative
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// PDF files under `dir`, sorted by path so runs are reproducible.
pub fn find_pdfs(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(ContentType::from_extension)
                == Some(ContentType::Pdf)
        })
        .collect();
    paths.sort();
    paths
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryIngestionError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Ingestion(IngestionError),
}
