//! Document collaborator: the only place that touches the PDF itself.

use crate::error::Result;
use crate::layout::{OutlineEntry, PageLayout};

#[cfg(test)]
pub mod memory;
mod poppler;
pub mod tools;
mod xml_layout;

pub use poppler::PdfDocument;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub zoom: f64,
    pub format: ImageFormat,
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            format: ImageFormat::Jpeg,
            jpeg_quality: 95,
        }
    }
}

/// Read-only view of a paginated document. Page indices are zero-based.
pub trait PageSource {
    /// Title used as the root segment of exported paths.
    fn book_title(&self) -> &str;

    fn page_count(&self) -> usize;

    /// Embedded outline in document order; empty when the document has none.
    fn embedded_outline(&self) -> Result<Vec<OutlineEntry>>;

    fn page_layout(&self, index: usize) -> Result<PageLayout>;

    fn raw_page_text(&self, index: usize) -> Result<String>;

    /// `(width, height)` in points.
    fn page_size(&self, index: usize) -> Result<(f64, f64)>;

    fn render_page(&self, index: usize, options: &RenderOptions) -> Result<Vec<u8>>;

    /// Bytes of a new document holding pages `start..end`.
    fn extract_range(&self, start: usize, end: usize) -> Result<Vec<u8>>;
}
