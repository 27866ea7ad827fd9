use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PdfToolError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("PDF error on {path}: {source}")]
    Pdf {
        path: PathBuf,
        source: lopdf::Error,
    },
    #[error("{0} has no pages")]
    NoPages(PathBuf),
    #[error("maximum part size must be positive, got {0} MB")]
    InvalidLimit(f64),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl PdfToolError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn pdf(path: impl Into<PathBuf>, source: lopdf::Error) -> Self {
        Self::Pdf {
            path: path.into(),
            source,
        }
    }
}
