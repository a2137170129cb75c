use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a detection or export call.
///
/// An empty detector result, a stale page reference in an edited table, and an
/// empty export range are not errors; they surface as empty lists or skipped
/// nodes.
#[derive(Error, Debug)]
pub enum ChapterError {
    #[error("invalid document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("failed to render page {page}: {reason}")]
    RenderFailure { page: usize, reason: String },

    #[error("failed to extract pages {start}..{end}: {reason}")]
    ExtractFailure {
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("page index {index} is out of range for a {page_count}-page document")]
    PageOutOfRange { index: usize, page_count: usize },

    #[error("required tool `{program}` is not available on PATH")]
    ToolMissing { program: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, ChapterError>;
