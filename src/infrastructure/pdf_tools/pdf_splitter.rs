use std::path::{Path, PathBuf};

use lopdf::Document;

use super::PdfToolError;

const MEBIBYTE: f64 = 1024.0 * 1024.0;

/// One written part of a split PDF. Page numbers are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPart {
    pub path: PathBuf,
    pub first_page: u32,
    pub last_page: u32,
    pub size_bytes: u64,
}

/// Splits `input` into `split_part_<n>.pdf` files under `output_dir`.
///
/// Pages are added to the current part one at a time and the part is
/// serialised after each page; once it reaches `max_size_mb` it is written
/// and a new part starts. Remaining pages form the final part, which may be
/// smaller than the limit. A single page larger than the limit becomes a
/// part on its own.
#[tracing::instrument(skip_all, fields(input = %input.display(), output_dir = %output_dir.display()))]
pub fn split_pdf_by_size(
    input: &Path,
    output_dir: &Path,
    max_size_mb: f64,
) -> Result<Vec<SplitPart>, PdfToolError> {
    if !(max_size_mb > 0.0) {
        return Err(PdfToolError::InvalidLimit(max_size_mb));
    }
    let max_size_bytes = (max_size_mb * MEBIBYTE) as usize;

    let source = Document::load(input).map_err(|e| PdfToolError::pdf(input, e))?;
    let page_numbers: Vec<u32> = source.get_pages().keys().copied().collect();
    if page_numbers.is_empty() {
        return Err(PdfToolError::NoPages(input.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir).map_err(|e| PdfToolError::io(output_dir, e))?;

    let mut parts = Vec::new();
    let mut start = 0usize;

    for end in 0..page_numbers.len() {
        let bytes = render_pages(&source, &page_numbers, start..=end, input)?;
        if bytes.len() >= max_size_bytes {
            parts.push(write_part(output_dir, parts.len() + 1, &page_numbers, start, end, &bytes)?);
            start = end + 1;
        }
    }

    if start < page_numbers.len() {
        let end = page_numbers.len() - 1;
        let bytes = render_pages(&source, &page_numbers, start..=end, input)?;
        parts.push(write_part(output_dir, parts.len() + 1, &page_numbers, start, end, &bytes)?);
    }

    tracing::info!(parts = parts.len(), pages = page_numbers.len(), "PDF split");
    Ok(parts)
}

/// Serialises a copy of `source` holding only the pages at `keep`
/// (indices into `page_numbers`).
fn render_pages(
    source: &Document,
    page_numbers: &[u32],
    keep: std::ops::RangeInclusive<usize>,
    input: &Path,
) -> Result<Vec<u8>, PdfToolError> {
    let dropped: Vec<u32> = page_numbers
        .iter()
        .enumerate()
        .filter(|(index, _)| !keep.contains(index))
        .map(|(_, number)| *number)
        .collect();

    let mut part = source.clone();
    part.delete_pages(&dropped);
    part.prune_objects();

    let mut bytes = Vec::new();
    part.save_to(&mut bytes)
        .map_err(|e| PdfToolError::io(input, e))?;
    Ok(bytes)
}

fn write_part(
    output_dir: &Path,
    part_number: usize,
    page_numbers: &[u32],
    start: usize,
    end: usize,
    bytes: &[u8],
) -> Result<SplitPart, PdfToolError> {
    let path = output_dir.join(format!("split_part_{part_number}.pdf"));
    std::fs::write(&path, bytes).map_err(|e| PdfToolError::io(&path, e))?;

    let size_bytes = bytes.len() as u64;
    tracing::info!(
        path = %path.display(),
        size_mb = %format!("{:.2}", size_bytes as f64 / MEBIBYTE),
        "Saved part"
    );

    Ok(SplitPart {
        path,
        first_page: page_numbers[start],
        last_page: page_numbers[end],
        size_bytes,
    })
}
