use super::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleParams {
    /// Minimum heading size as a multiple of the body size.
    pub header_scale: f64,
    pub min_page_gap: usize,
    /// Fraction of the page height, from the top, searched for headings.
    pub top_ratio: f64,
    /// Estimate the body size on every page instead of once over the first
    /// pages of the document. A page holding only its heading then has no
    /// larger text, so this misses bare chapter-opening pages.
    pub per_page_font: bool,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            header_scale: 1.3,
            min_page_gap: 2,
            top_ratio: 0.5,
            per_page_font: false,
        }
    }
}

/// Picks at most one oversized span near the top of each page.
pub fn detect_by_style<D>(doc: &D, params: &StyleParams) -> Result<Vec<ChapterCandidate>>
where
    D: PageSource + ?Sized,
{
    let document_body = document_body_size(doc, BODY_SAMPLE_PAGES)?;
    let mut candidates = Vec::<ChapterCandidate>::new();

    for index in 0..doc.page_count() {
        let page_no = index + 1;
        if let Some(last) = candidates.last() {
            if page_no - last.page_num < params.min_page_gap {
                continue;
            }
        }

        let layout = doc.page_layout(index)?;
        let body = if params.per_page_font {
            estimate_body_size(layout.spans()).or(document_body)
        } else {
            document_body
        };
        let Some(body) = body else {
            continue;
        };

        let min_header_size = body * params.header_scale;
        let top_limit = page_height(doc, &layout)? * params.top_ratio;

        let heading = layout
            .lines()
            .flat_map(|line| line.spans.iter())
            .find_map(|span| {
                if span.bbox.y0 > top_limit || span.size < min_header_size {
                    return None;
                }
                let text = span.text.trim();
                let length = char_len(text);
                if length <= 1 || length >= 60 {
                    return None;
                }
                Some((text.to_string(), span.size, span.font.as_str()))
            });

        if let Some((title, size, font)) = heading {
            debug!(
                page = page_no,
                title = %title,
                size,
                font,
                body_size = body,
                "style heading candidate"
            );
            candidates.push(ChapterCandidate::new(
                title,
                page_no,
                1,
                CandidateSource::StyleHeuristic,
            ));
        }
    }

    info!(count = candidates.len(), "style detection finished");
    Ok(candidates)
}
