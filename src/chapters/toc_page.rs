use super::*;

const TOC_KEYWORDS: [&str; 9] = [
    "目次",
    "目录",
    "Contents",
    "CONTENTS",
    "Table of Contents",
    "Inhalt",
    "Table des matières",
    "Índice",
    "Содержание",
];

/// Title, leader run (spaces, dots, middle dots, ellipses, dashes) and a
/// trailing page number.
static TRAILING_PAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.*?\S)[\s.．·・･…‥⋯‧\-‐–—―─_]+(?P<page>[0-9０-９]{1,5})\s*$")
        .expect("toc trailing page regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocParams {
    pub max_scan_pages: usize,
}

impl Default for TocParams {
    fn default() -> Self {
        Self { max_scan_pages: 25 }
    }
}

/// Reads chapter entries off printed table-of-contents pages.
pub fn detect_from_toc_pages<D>(doc: &D, params: &TocParams) -> Result<Vec<ChapterCandidate>>
where
    D: PageSource + ?Sized,
{
    let page_count = doc.page_count();
    let mut candidates = Vec::<ChapterCandidate>::new();
    let mut seen_pages = HashSet::<usize>::new();

    for index in 0..params.max_scan_pages.min(page_count) {
        let raw = doc.raw_page_text(index)?;
        if !TOC_KEYWORDS.iter().any(|keyword| raw.contains(keyword)) {
            continue;
        }

        let layout = doc.page_layout(index)?;
        let mut lines = layout.lines().map(Line::text).collect::<Vec<String>>();
        if lines.is_empty() {
            lines = raw.lines().map(normalize_whitespace).collect();
        }
        debug!(page = index + 1, lines = lines.len(), "scanning table-of-contents page");

        for line in lines {
            let Some((title, target)) = parse_toc_line(&line) else {
                continue;
            };
            if target < 1 || target > page_count {
                debug!(title = %title, target, "toc entry points outside the document");
                continue;
            }
            if !seen_pages.insert(target) {
                continue;
            }
            candidates.push(ChapterCandidate::new(title, target, 1, CandidateSource::TocPage));
        }
    }

    candidates.sort_by_key(|candidate| candidate.page_num);
    info!(count = candidates.len(), "toc page detection finished");
    Ok(candidates)
}

/// Splits a table-of-contents line into its title and target page.
///
/// The line, and the title left after removing the page number, must both
/// look like a TOC entry; the number must follow at least one leader
/// character.
pub fn parse_toc_line(line: &str) -> Option<(String, usize)> {
    let line = line.trim();
    if !patterns::is_toc_entry(line) {
        return None;
    }

    let captures = TRAILING_PAGE_RE.captures(line)?;
    let title = captures.name("title")?.as_str().trim();
    // "Chapter 7" alone would otherwise read as title "Chapter", page 7.
    if title.is_empty() || !patterns::is_toc_entry(title) {
        return None;
    }
    let page = captures
        .name("page")?
        .as_str()
        .chars()
        .map(fold_full_width_digit)
        .collect::<String>()
        .parse::<usize>()
        .ok()?;

    Some((title.to_string(), page))
}

fn fold_full_width_digit(character: char) -> char {
    match character {
        '０'..='９' => char::from_u32(character as u32 - '０' as u32 + '0' as u32).unwrap_or(character),
        other => other,
    }
}
