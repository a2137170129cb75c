use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    EmbeddedOutline,
    TocPage,
    StyleHeuristic,
    Pattern,
    User,
}

impl CandidateSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmbeddedOutline => "embedded_outline",
            Self::TocPage => "toc_page",
            Self::StyleHeuristic => "style_heuristic",
            Self::Pattern => "pattern",
            Self::User => "user",
        }
    }
}

/// A provisional chapter boundary. `page_num` is one-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterCandidate {
    pub title: String,
    pub page_num: usize,
    pub level: u32,
    pub source: CandidateSource,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl ChapterCandidate {
    pub fn new(title: impl Into<String>, page_num: usize, level: u32, source: CandidateSource) -> Self {
        Self {
            title: title.into(),
            page_num,
            level,
            source,
            selected: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,
    pub sha256: String,
    pub book_title: String,
    pub page_count: usize,
}

/// The editable candidate table exchanged between `detect`, `filter` and
/// `export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: Option<SourceInfo>,
    pub strategy: Option<String>,
    #[serde(default)]
    pub suggested_groups: Vec<String>,
    pub candidates: Vec<ChapterCandidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportNodeSummary {
    pub path: String,
    pub level: u32,
    pub page_start: usize,
    pub page_end: usize,
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source: SourceInfo,
    pub mode: String,
    pub archive_path: String,
    pub archive_bytes: usize,
    pub mirror_root: Option<String>,
    pub mirrored_paths: Vec<String>,
    pub skipped_candidates: usize,
    pub nodes: Vec<ExportNodeSummary>,
}
