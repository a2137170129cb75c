//! In-memory document used by unit tests.

use super::{PageSource, RenderOptions};
use crate::error::{ChapterError, Result};
use crate::layout::{BBox, Block, Line, OutlineEntry, PageLayout, TextSpan};

pub const PAGE_WIDTH: f64 = 600.0;
pub const PAGE_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone)]
pub struct MemoryDocument {
    pub title: String,
    pub pages: Vec<PageLayout>,
    pub raw_text: Vec<String>,
    pub outline: Vec<OutlineEntry>,
    pub failing_page: Option<usize>,
}

impl MemoryDocument {
    pub fn blank(title: &str, page_count: usize) -> Self {
        Self {
            title: title.to_string(),
            pages: (0..page_count)
                .map(|index| PageLayout {
                    index,
                    width: PAGE_WIDTH,
                    height: PAGE_HEIGHT,
                    blocks: Vec::new(),
                })
                .collect(),
            raw_text: vec![String::new(); page_count],
            outline: Vec::new(),
            failing_page: None,
        }
    }

    /// Adds a single-span line to a page (zero-based index) and mirrors its
    /// text into the raw page text.
    pub fn add_line(&mut self, index: usize, text: &str, size: f64, x0: f64, y0: f64) -> &mut Self {
        let width = text.chars().count() as f64 * size * 0.5;
        let span = TextSpan {
            text: text.to_string(),
            size,
            font: "Serif".to_string(),
            bbox: BBox::new(x0, y0, x0 + width, y0 + size),
        };
        self.pages[index].blocks.push(Block {
            lines: vec![Line::from_spans(vec![span])],
        });
        let raw = &mut self.raw_text[index];
        if !raw.is_empty() {
            raw.push('\n');
        }
        raw.push_str(text);
        self
    }

    /// Adds a horizontally centered line.
    pub fn add_centered(&mut self, index: usize, text: &str, size: f64, y0: f64) -> &mut Self {
        let width = text.chars().count() as f64 * size * 0.5;
        self.add_line(index, text, size, (PAGE_WIDTH - width) / 2.0, y0)
    }

    /// Fills a page with body-sized lines below the top region.
    pub fn add_body(&mut self, index: usize, size: f64, lines: usize) -> &mut Self {
        for row in 0..lines {
            let y0 = PAGE_HEIGHT * 0.55 + row as f64 * (size + 2.0);
            self.add_line(
                index,
                "Body text that runs across the page for a while",
                size,
                72.0,
                y0,
            );
        }
        self
    }
}

impl PageSource for MemoryDocument {
    fn book_title(&self) -> &str {
        &self.title
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn embedded_outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }

    fn page_layout(&self, index: usize) -> Result<PageLayout> {
        self.pages
            .get(index)
            .cloned()
            .ok_or(ChapterError::PageOutOfRange {
                index,
                page_count: self.pages.len(),
            })
    }

    fn raw_page_text(&self, index: usize) -> Result<String> {
        self.raw_text
            .get(index)
            .cloned()
            .ok_or(ChapterError::PageOutOfRange {
                index,
                page_count: self.pages.len(),
            })
    }

    fn page_size(&self, index: usize) -> Result<(f64, f64)> {
        let page = self.page_layout(index)?;
        Ok((page.width, page.height))
    }

    fn render_page(&self, index: usize, options: &RenderOptions) -> Result<Vec<u8>> {
        if self.failing_page == Some(index) {
            return Err(ChapterError::RenderFailure {
                page: index + 1,
                reason: "simulated failure".to_string(),
            });
        }
        Ok(format!("image:{}:{}:{}", index, options.zoom, options.format.extension()).into_bytes())
    }

    fn extract_range(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        if let Some(page) = self.failing_page.filter(|page| (start..end).contains(page)) {
            return Err(ChapterError::ExtractFailure {
                start,
                end,
                reason: format!("simulated failure on page {}", page + 1),
            });
        }
        Ok(format!("pdf:{start}-{end}").into_bytes())
    }
}
