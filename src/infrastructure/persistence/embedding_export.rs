use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::application::ports::KnowledgeBaseError;
use crate::domain::KnowledgeEntry;

#[derive(Serialize)]
struct EmbeddingCollection<'a> {
    source: &'a str,
    entries: &'a [KnowledgeEntry],
}

/// `report.pdf` becomes `report_embeddings.json`. Directory separators in a
/// relative source path are flattened, so `a/guide.pdf` becomes
/// `a_guide_embeddings.json`.
pub fn embedding_collection_filename(source_filename: &str) -> String {
    let stem = Path::new(&source_filename.replace('\\', "/"))
        .with_extension("")
        .iter()
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("_");
    format!("{stem}_embeddings.json")
}

/// Writes the chunks and embeddings of one source file to
/// `<output_dir>/<stem>_embeddings.json` and returns the path written.
pub async fn write_embedding_collection(
    output_dir: &Path,
    source_filename: &str,
    entries: &[KnowledgeEntry],
) -> Result<PathBuf, KnowledgeBaseError> {
    let path = output_dir.join(embedding_collection_filename(source_filename));
    let collection = EmbeddingCollection {
        source: source_filename,
        entries,
    };

    let json = serde_json::to_vec_pretty(&collection)
        .map_err(|e| KnowledgeBaseError::PersistFailed(e.to_string()))?;
    write_file(&path, &json).await?;

    tracing::info!(path = %path.display(), entries = entries.len(), "Embeddings written");
    Ok(path)
}

/// Writes `{ filename: extracted_text }` as indented JSON.
pub async fn write_text_dump(
    path: &Path,
    texts: &BTreeMap<String, String>,
) -> Result<(), KnowledgeBaseError> {
    let json = serde_json::to_vec_pretty(texts)
        .map_err(|e| KnowledgeBaseError::PersistFailed(e.to_string()))?;
    write_file(path, &json).await?;

    tracing::info!(path = %path.display(), documents = texts.len(), "Extracted text written");
    Ok(())
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), KnowledgeBaseError> {
    let persist_err =
        |e: std::io::Error| KnowledgeBaseError::PersistFailed(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(persist_err)?;
    }
    tokio::fs::write(path, contents).await.map_err(persist_err)
}
