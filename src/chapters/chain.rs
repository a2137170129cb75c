use super::*;

/// One detection strategy with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detector {
    Outline,
    TocPage(TocParams),
    Style(StyleParams),
    Pattern(PatternParams),
}

impl Detector {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::TocPage(_) => "toc",
            Self::Style(_) => "style",
            Self::Pattern(_) => "pattern",
        }
    }

    /// Runs this strategy alone. The result fully replaces any earlier list.
    pub fn detect<D>(&self, doc: &D) -> Result<Vec<ChapterCandidate>>
    where
        D: PageSource + ?Sized,
    {
        match self {
            Self::Outline => detect_outline(doc),
            Self::TocPage(params) => detect_from_toc_pages(doc, params),
            Self::Style(params) => detect_by_style(doc, params),
            Self::Pattern(params) => detect_by_pattern(doc, params),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorChain {
    pub toc: TocParams,
    pub style: StyleParams,
    pub pattern: PatternParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome {
    /// Strategy that produced the candidates; `None` when every strategy came
    /// back empty.
    pub strategy: Option<&'static str>,
    pub candidates: Vec<ChapterCandidate>,
    /// Every strategy tried, with its candidate count, in order.
    pub attempts: Vec<(&'static str, usize)>,
}

impl DetectorChain {
    pub fn detectors(&self) -> [Detector; 4] {
        [
            Detector::Outline,
            Detector::TocPage(self.toc),
            Detector::Style(self.style),
            Detector::Pattern(self.pattern),
        ]
    }

    /// Outline, then TOC pages, then style, then pattern; the first non-empty
    /// result wins.
    pub fn run<D>(&self, doc: &D) -> Result<ChainOutcome>
    where
        D: PageSource + ?Sized,
    {
        let mut attempts = Vec::new();
        for detector in self.detectors() {
            let candidates = detector.detect(doc)?;
            attempts.push((detector.name(), candidates.len()));
            if !candidates.is_empty() {
                info!(
                    strategy = detector.name(),
                    count = candidates.len(),
                    "detector chain settled"
                );
                return Ok(ChainOutcome {
                    strategy: Some(detector.name()),
                    candidates,
                    attempts,
                });
            }
        }

        warn!("no strategy produced chapter candidates");
        Ok(ChainOutcome {
            strategy: None,
            candidates: Vec::new(),
            attempts,
        })
    }
}
