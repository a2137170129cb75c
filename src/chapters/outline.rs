use super::*;

/// Converts the embedded outline into candidates, keeping its order and
/// levels. Entries pointing before page 1 or past the last page are dropped.
pub fn detect_outline<D>(doc: &D) -> Result<Vec<ChapterCandidate>>
where
    D: PageSource + ?Sized,
{
    let page_count = doc.page_count();
    let outline = doc.embedded_outline()?;

    let mut candidates = Vec::with_capacity(outline.len());
    for entry in outline {
        if entry.target_page < 1 || entry.target_page as usize > page_count {
            debug!(
                title = %entry.title,
                target_page = entry.target_page,
                "skipping outline entry without a valid target page"
            );
            continue;
        }

        candidates.push(ChapterCandidate::new(
            entry.title,
            entry.target_page as usize,
            entry.level.max(1),
            CandidateSource::EmbeddedOutline,
        ));
    }

    info!(count = candidates.len(), "outline detection finished");
    Ok(candidates)
}
