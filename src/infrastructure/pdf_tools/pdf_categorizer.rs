use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use super::PdfToolError;
use crate::domain::{ContentType, SizeCategory};

/// Moves every `*.pdf` directly inside `source_dir` into
/// `target_dir/{small,medium,large}/` and returns the file names per bucket.
#[tracing::instrument(skip_all, fields(source = %source_dir.display(), target = %target_dir.display()))]
pub fn categorize_pdfs(
    source_dir: &Path,
    target_dir: &Path,
) -> Result<BTreeMap<SizeCategory, Vec<String>>, PdfToolError> {
    if !source_dir.is_dir() {
        return Err(PdfToolError::NotADirectory(source_dir.to_path_buf()));
    }
    std::fs::create_dir_all(target_dir).map_err(|e| PdfToolError::io(target_dir, e))?;

    let mut categories: BTreeMap<SizeCategory, Vec<String>> = BTreeMap::new();

    let mut files: Vec<_> = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry.file_name().to_str().and_then(ContentType::from_extension)
                == Some(ContentType::Pdf)
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in files {
        let path = entry.path();
        let size_bytes = entry
            .metadata()
            .map_err(|e| PdfToolError::io(path, e.into()))?
            .len();
        let category = SizeCategory::from_bytes(size_bytes);

        let category_dir = target_dir.join(category.as_str());
        std::fs::create_dir_all(&category_dir).map_err(|e| PdfToolError::io(&category_dir, e))?;

        let file_name = entry.file_name().to_string_lossy().into_owned();
        let destination = category_dir.join(&file_name);
        move_file(path, &destination)?;

        tracing::debug!(file = %file_name, %category, size_bytes, "PDF categorized");
        categories.entry(category).or_default().push(file_name);
    }

    Ok(categories)
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), PdfToolError> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to).map_err(|e| PdfToolError::io(from, e))?;
    std::fs::remove_file(from).map_err(|e| PdfToolError::io(from, e))
}
