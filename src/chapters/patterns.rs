//! Chapter-title and table-of-contents line patterns.

use super::*;

/// Arabic (ASCII and full-width), Roman (ASCII and Unicode) and CJK numerals.
const NUMERAL: &str = r"(?:[0-9０-９]+|[IVXLCDM]+|[ⅠⅡⅢⅣⅤⅥⅦⅧⅨⅩⅪⅫ]+|[一二三四五六七八九十百千〇零]+)";

/// Leading punctuation or whitespace (bullets, brackets, ornaments).
const LEAD: &str = r"^[^\p{L}\p{N}]*";

/// A numeral after a Latin/Cyrillic keyword must not run into another word.
const TAIL: &str = r"(?:[^\p{L}\p{N}]|$)";

#[derive(Debug)]
pub struct PatternGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub patterns: Vec<Regex>,
}

impl PatternGroup {
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }
}

pub static PATTERN_GROUPS: LazyLock<Vec<PatternGroup>> = LazyLock::new(|| {
    vec![
        group(
            "ja_chapter",
            "Japanese 第N章 / N章",
            &[
                format!(r"{LEAD}第\s*{NUMERAL}\s*章"),
                format!(r"{LEAD}{NUMERAL}\s*章"),
            ],
        ),
        group(
            "ja_part",
            "Japanese 第N部 / 編 / 講 / 回",
            &[format!(r"{LEAD}第\s*{NUMERAL}\s*[部編講回]")],
        ),
        group(
            "en_chapter",
            "English Chapter N / Chap. N",
            &[
                format!(r"{LEAD}(?i:chapter)\s*{NUMERAL}{TAIL}"),
                format!(r"{LEAD}(?i:chap)\.\s*{NUMERAL}{TAIL}"),
            ],
        ),
        group(
            "en_part",
            "English Part N / Lesson N",
            &[
                format!(r"{LEAD}(?i:part)\s+{NUMERAL}{TAIL}"),
                format!(r"{LEAD}(?i:lesson)\s+{NUMERAL}{TAIL}"),
            ],
        ),
        group(
            "other",
            "Kapitel / Chapitre / Capítulo / Capitolo / Глава",
            &[format!(
                r"{LEAD}(?i:kapitel|chapitre|cap[ií]tulo|capitolo|глава)\s+{NUMERAL}{TAIL}"
            )],
        ),
    ]
});

/// Every chapter pattern of every group, in catalog order.
pub static CHAPTER_PATTERNS: LazyLock<Vec<&'static Regex>> = LazyLock::new(|| {
    PATTERN_GROUPS
        .iter()
        .flat_map(|group| group.patterns.iter())
        .collect()
});

/// Generic enumerations accepted on table-of-contents pages in addition to
/// the chapter patterns: "1. ", "1) ", "1 <non-digit>".
static TOC_ENUMERATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*[0-9０-９]+[.．]\s",
        r"^\s*[0-9０-９]+[)）]\s*",
        r"^\s*[0-9０-９]+\s+[^0-9０-９\s]",
    ]
    .iter()
    .map(|source| Regex::new(source).expect("toc enumeration regex"))
    .collect()
});

fn group(id: &'static str, label: &'static str, sources: &[String]) -> PatternGroup {
    PatternGroup {
        id,
        label,
        patterns: sources
            .iter()
            .map(|source| Regex::new(source).expect("chapter pattern regex"))
            .collect(),
    }
}

pub fn group_ids() -> Vec<&'static str> {
    PATTERN_GROUPS.iter().map(|group| group.id).collect()
}

pub fn find_group(id: &str) -> Option<&'static PatternGroup> {
    PATTERN_GROUPS.iter().find(|group| group.id == id)
}

/// True when `text` matches any chapter pattern of any group.
pub fn matches_any(text: &str) -> bool {
    CHAPTER_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}

/// True when `text` matches a chapter pattern in one of the named groups.
/// Unknown ids are ignored.
pub fn matches_groups<S: AsRef<str>>(text: &str, group_ids: &[S]) -> bool {
    group_ids
        .iter()
        .filter_map(|id| find_group(id.as_ref()))
        .any(|group| group.is_match(text))
}

pub fn matching_group_ids(text: &str) -> Vec<&'static str> {
    PATTERN_GROUPS
        .iter()
        .filter(|group| group.is_match(text))
        .map(|group| group.id)
        .collect()
}

/// True when a line looks like a table-of-contents entry title.
pub fn is_toc_entry(text: &str) -> bool {
    TOC_ENUMERATION_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(text))
        || matches_any(text)
}
