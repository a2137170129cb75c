use std::path::Path;

use anyhow::{Context, Result};

use crate::document::{PageSource, PdfDocument};
use crate::model::SourceInfo;
use crate::util::sha256_file;

pub mod detect;
pub mod export;
pub mod filter;
pub mod patterns;
pub mod status;

pub const MANIFEST_VERSION: u32 = 1;

pub fn open_document(path: &Path) -> Result<PdfDocument> {
    PdfDocument::open(path).with_context(|| format!("failed to open {}", path.display()))
}

pub fn source_info(doc: &PdfDocument) -> Result<SourceInfo> {
    Ok(SourceInfo {
        path: doc.path().display().to_string(),
        sha256: sha256_file(doc.path())?,
        book_title: doc.book_title().to_string(),
        page_count: doc.page_count(),
    })
}
