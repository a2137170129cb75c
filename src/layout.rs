//! Page layout shapes shared by every detector.
//!
//! Coordinates are in PDF points with the origin at the top-left corner of
//! the page, so `y0 < y1` and a smaller `y0` is closer to the top.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub size: f64,
    pub font: String,
    pub bbox: BBox,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub bbox: BBox,
    pub spans: Vec<TextSpan>,
}

impl Line {
    /// Builds a line from spans, ordering them left to right.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
        let bbox = spans
            .iter()
            .map(|span| span.bbox)
            .reduce(|acc, bbox| acc.union(&bbox))
            .unwrap_or_default();
        Self { bbox, spans }
    }

    /// Span texts joined with single spaces, trimmed.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|span| span.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<&str>>()
            .join(" ")
    }

    pub fn max_font_size(&self) -> Option<f64> {
        self.spans
            .iter()
            .filter(|span| !span.text.trim().is_empty())
            .map(|span| span.size)
            .reduce(f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    /// Zero-based page index.
    pub index: usize,
    pub width: f64,
    pub height: f64,
    pub blocks: Vec<Block>,
}

impl PageLayout {
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|block| block.lines.iter())
    }

    pub fn spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.lines().flat_map(|line| line.spans.iter())
    }
}

/// One entry of an embedded document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub level: u32,
    pub title: String,
    /// One-based target page; zero or negative when the target is unresolved.
    pub target_page: i64,
}
