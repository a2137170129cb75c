use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Pattern groups treated as chapter markers; `None` means all groups.
    pub active_groups: Option<Vec<String>>,
    /// Titles containing this text (case-insensitive) are always accepted.
    pub keyword: Option<String>,
    /// A repeated title closer than this many pages to its kept occurrence is
    /// dropped.
    pub min_distance: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            active_groups: None,
            keyword: None,
            min_distance: 5,
        }
    }
}

/// Keeps only candidates that look like real chapters, sorted by page, and
/// collapses repeats of the same title printed within `min_distance` pages.
pub fn filter_major_chapters(
    candidates: &[ChapterCandidate],
    params: &FilterParams,
) -> Vec<ChapterCandidate> {
    let keyword = params
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_lowercase);

    if let Some(groups) = &params.active_groups {
        for id in groups {
            if patterns::find_group(id).is_none() {
                warn!(group = %id, "ignoring unknown pattern group");
            }
        }
    }

    let mut sorted = candidates.to_vec();
    sorted.sort_by_key(|candidate| candidate.page_num);

    let mut last_kept = HashMap::<String, usize>::new();
    let mut kept = Vec::<ChapterCandidate>::new();

    for candidate in sorted {
        let keyword_hit = keyword
            .as_deref()
            .map(|keyword| candidate.title.to_lowercase().contains(keyword))
            .unwrap_or(false);
        let pattern_hit = match &params.active_groups {
            Some(groups) => patterns::matches_groups(&candidate.title, groups),
            None => patterns::matches_any(&candidate.title),
        };
        if !keyword_hit && !pattern_hit {
            continue;
        }

        let normalized = normalize_whitespace(&candidate.title);
        if let Some(previous) = last_kept.get(&normalized) {
            if candidate.page_num.saturating_sub(*previous) < params.min_distance {
                debug!(
                    title = %candidate.title,
                    page = candidate.page_num,
                    kept_page = *previous,
                    "dropping repeated title"
                );
                continue;
            }
        }

        last_kept.insert(normalized, candidate.page_num);
        kept.push(candidate);
    }

    kept
}

/// Pattern groups matched by at least one title, in catalog order; every
/// group when nothing matches.
pub fn suggest_pattern_group_ids(candidates: &[ChapterCandidate]) -> Vec<String> {
    let matched = candidates
        .iter()
        .flat_map(|candidate| patterns::matching_group_ids(&candidate.title))
        .collect::<HashSet<&'static str>>();

    let ids = patterns::group_ids();
    let suggested = ids
        .iter()
        .filter(|id| matched.contains(*id))
        .map(|id| id.to_string())
        .collect::<Vec<String>>();

    if suggested.is_empty() {
        ids.into_iter().map(str::to_string).collect()
    } else {
        suggested
    }
}
