use std::fmt;

use serde::Serialize;

const MEBIBYTE: u64 = 1024 * 1024;

/// Coarse bucket for a document by file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    /// Under 1 MiB is small, under 10 MiB is medium, anything else is large.
    pub fn from_bytes(size_bytes: u64) -> Self {
        if size_bytes < MEBIBYTE {
            Self::Small
        } else if size_bytes < 10 * MEBIBYTE {
            Self::Medium
        } else {
            Self::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for SizeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
