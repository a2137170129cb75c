use super::*;

const MAX_TITLE_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternParams {
    pub min_page_gap: usize,
    pub top_ratio: f64,
    /// Fraction of the page width excluded on each side, tested against the
    /// horizontal center of the text.
    pub margin_ratio: f64,
    /// Optional minimum size relative to the body size.
    pub min_size_ratio: Option<f64>,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            min_page_gap: 2,
            top_ratio: 0.45,
            margin_ratio: 0.12,
            min_size_ratio: None,
        }
    }
}

/// Finds chapter-titled text in the top band of each page, ignoring font
/// metadata beyond an optional size floor. Meant for OCR output.
pub fn detect_by_pattern<D>(doc: &D, params: &PatternParams) -> Result<Vec<ChapterCandidate>>
where
    D: PageSource + ?Sized,
{
    let min_size = match params.min_size_ratio {
        Some(ratio) => document_body_size(doc, BODY_SAMPLE_PAGES)?.map(|body| body * ratio),
        None => None,
    };

    let mut candidates = Vec::<ChapterCandidate>::new();
    for index in 0..doc.page_count() {
        let page_no = index + 1;
        if let Some(last) = candidates.last() {
            if page_no - last.page_num < params.min_page_gap {
                continue;
            }
        }

        let layout = doc.page_layout(index)?;
        let region = Region {
            top_limit: page_height(doc, &layout)? * params.top_ratio,
            left: page_width(doc, &layout)? * params.margin_ratio,
            right: page_width(doc, &layout)? * (1.0 - params.margin_ratio),
            min_size,
        };

        if let Some(title) = first_pattern_title(&layout, &region) {
            debug!(page = page_no, title = %title, "pattern heading candidate");
            candidates.push(ChapterCandidate::new(title, page_no, 1, CandidateSource::Pattern));
        }
    }

    info!(count = candidates.len(), "pattern detection finished");
    Ok(candidates)
}

struct Region {
    top_limit: f64,
    left: f64,
    right: f64,
    min_size: Option<f64>,
}

impl Region {
    fn accepts(&self, bbox_top: f64, center_x: f64, size: Option<f64>) -> bool {
        if bbox_top > self.top_limit || center_x < self.left || center_x > self.right {
            return false;
        }
        match (self.min_size, size) {
            (Some(min_size), Some(size)) => size >= min_size,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// First line (or, failing that, span) in the region whose text is a
/// chapter title. OCR engines often emit one span per word, so the joined
/// line is tried before its spans.
fn first_pattern_title(layout: &PageLayout, region: &Region) -> Option<String> {
    for line in layout.lines() {
        if line.bbox.y0 > region.top_limit {
            continue;
        }

        let text = line.text();
        if is_title(&text) && region.accepts(line.bbox.y0, line.bbox.center_x(), line.max_font_size())
        {
            return Some(text);
        }

        for span in &line.spans {
            let text = span.text.trim();
            if is_title(text) && region.accepts(span.bbox.y0, span.bbox.center_x(), Some(span.size)) {
                return Some(text.to_string());
            }
        }
    }

    None
}

fn is_title(text: &str) -> bool {
    !text.is_empty() && char_len(text) <= MAX_TITLE_CHARS && patterns::matches_any(text)
}
