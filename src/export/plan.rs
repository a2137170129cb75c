use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub level: u32,
    pub title: String,
}

/// One exported chapter: its nesting path and zero-based page range
/// `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNode {
    pub segments: Vec<PathSegment>,
    pub start: usize,
    pub end: usize,
}

impl ExportNode {
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn level(&self) -> u32 {
        self.segments.last().map(|segment| segment.level).unwrap_or(1)
    }

    pub fn leaf_title(&self) -> &str {
        self.segments
            .last()
            .map(|segment| segment.title.as_str())
            .unwrap_or_default()
    }

    /// Root followed by every segment title.
    pub fn path_parts<'a>(&'a self, root: &'a str) -> Vec<&'a str> {
        std::iter::once(root)
            .chain(self.segments.iter().map(|segment| segment.title.as_str()))
            .collect()
    }

    /// Root followed by every segment title except the leaf.
    pub fn parent_parts<'a>(&'a self, root: &'a str) -> Vec<&'a str> {
        let mut parts = self.path_parts(root);
        parts.pop();
        parts
    }

    pub fn pages(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportPlan {
    /// Sanitized document title, the first segment of every path.
    pub root: String,
    pub nodes: Vec<ExportNode>,
    /// Selected candidates that produced no node.
    pub skipped: usize,
}

/// Keeps alphanumerics, space, `-`, `_`, `.`, `(` and `)`, then trims.
/// Titles made only of dots come back empty.
pub fn sanitize_title(title: &str) -> String {
    let kept = title
        .chars()
        .filter(|character| {
            character.is_alphanumeric() || matches!(character, ' ' | '-' | '_' | '.' | '(' | ')')
        })
        .collect::<String>();
    let trimmed = kept.trim();
    if trimmed.chars().all(|character| character == '.') {
        return String::new();
    }
    trimmed.to_string()
}

/// Turns the selected, leveled candidates into nested export nodes.
///
/// Each candidate covers pages from its own start up to the next candidate's
/// start (the last one runs to the end of the document). Candidates whose
/// range is empty are skipped. Pages before the first selected candidate are
/// not covered by any node.
pub fn plan_export(
    book_title: &str,
    page_count: usize,
    candidates: &[ChapterCandidate],
) -> ExportPlan {
    let mut skipped = 0usize;
    let mut selected = Vec::<&ChapterCandidate>::new();
    for candidate in candidates.iter().filter(|candidate| candidate.selected) {
        if candidate.page_num < 1 || candidate.page_num > page_count {
            debug!(
                title = %candidate.title,
                page = candidate.page_num,
                page_count,
                "dropping candidate outside the document"
            );
            skipped += 1;
            continue;
        }
        selected.push(candidate);
    }
    selected.sort_by_key(|candidate| candidate.page_num);

    let root = match sanitize_title(book_title) {
        title if title.is_empty() => "document".to_string(),
        title => title,
    };

    let mut nodes = Vec::<ExportNode>::new();
    let mut stack = Vec::<PathSegment>::new();
    let mut used_paths = HashSet::<Vec<String>>::new();

    for (ordinal, candidate) in selected.iter().enumerate() {
        let start = candidate.page_num - 1;
        let end = selected
            .get(ordinal + 1)
            .map(|next| next.page_num - 1)
            .unwrap_or(page_count);
        if start >= end {
            debug!(title = %candidate.title, page = candidate.page_num, "empty page range");
            skipped += 1;
            continue;
        }

        let level = candidate.level.max(1);
        while stack.last().is_some_and(|top| top.level >= level) {
            stack.pop();
        }

        let base = match sanitize_title(&candidate.title) {
            title if title.is_empty() => format!("Chapter_{}", ordinal + 1),
            title => title,
        };
        let title = unique_title(&stack, &base, &mut used_paths);
        stack.push(PathSegment { level, title });

        nodes.push(ExportNode {
            segments: stack.clone(),
            start,
            end,
        });
    }

    ExportPlan {
        root,
        nodes,
        skipped,
    }
}

/// Appends ` (2)`, ` (3)`, ... when a sibling already claimed the same path.
fn unique_title(stack: &[PathSegment], base: &str, used: &mut HashSet<Vec<String>>) -> String {
    let parent = stack
        .iter()
        .map(|segment| segment.title.clone())
        .collect::<Vec<String>>();

    let mut suffix = 1usize;
    loop {
        let title = if suffix == 1 {
            base.to_string()
        } else {
            format!("{base} ({suffix})")
        };
        let mut path = parent.clone();
        path.push(title.clone());
        if used.insert(path) {
            return title;
        }
        suffix += 1;
    }
}
