use super::*;

/// Pages sampled for a document-wide body size estimate.
pub const BODY_SAMPLE_PAGES: usize = 20;

/// Font size carrying the most rendered characters, or `None` when the spans
/// hold no visible text. Sizes are bucketed to a tenth of a point; ties go to
/// the smaller size.
pub fn estimate_body_size<'a, I>(spans: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a TextSpan>,
{
    let mut histogram = HashMap::<i64, usize>::new();
    for span in spans {
        let chars = span
            .text
            .chars()
            .filter(|character| !character.is_whitespace())
            .count();
        if chars == 0 || !span.size.is_finite() || span.size <= 0.0 {
            continue;
        }
        *histogram.entry((span.size * 10.0).round() as i64).or_insert(0) += chars;
    }

    histogram
        .into_iter()
        .max_by(|(size_a, count_a), (size_b, count_b)| {
            count_a.cmp(count_b).then(size_b.cmp(size_a))
        })
        .map(|(bucket, _)| bucket as f64 / 10.0)
}

/// Body size estimated over the first `sample_pages` pages.
pub fn document_body_size<D>(doc: &D, sample_pages: usize) -> Result<Option<f64>>
where
    D: PageSource + ?Sized,
{
    let mut layouts = Vec::new();
    for index in 0..sample_pages.min(doc.page_count()) {
        layouts.push(doc.page_layout(index)?);
    }

    Ok(estimate_body_size(
        layouts.iter().flat_map(|layout| layout.spans()),
    ))
}

/// Page height from the layout, falling back to the document's page size.
pub fn page_height<D>(doc: &D, layout: &PageLayout) -> Result<f64>
where
    D: PageSource + ?Sized,
{
    if layout.height > 0.0 {
        return Ok(layout.height);
    }
    Ok(doc.page_size(layout.index)?.1)
}

pub fn page_width<D>(doc: &D, layout: &PageLayout) -> Result<f64>
where
    D: PageSource + ?Sized,
{
    if layout.width > 0.0 {
        return Ok(layout.width);
    }
    Ok(doc.page_size(layout.index)?.0)
}

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
