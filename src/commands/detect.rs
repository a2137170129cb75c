use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::chapters::{
    Detector, DetectorChain, filter_major_chapters, suggest_pattern_group_ids,
};
use crate::cli::{DetectArgs, Strategy};
use crate::commands::{MANIFEST_VERSION, open_document, source_info};
use crate::document::PageSource;
use crate::model::CandidateManifest;
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: DetectArgs) -> Result<()> {
    let doc = open_document(&args.pdf)?;
    let source = source_info(&doc)?;
    info!(
        pdf = %args.pdf.display(),
        pages = doc.page_count(),
        strategy = ?args.strategy,
        "starting detection"
    );

    let chain = args.detector.chain();
    let (strategy, mut candidates) = match single_detector(args.strategy, &chain) {
        Some(detector) => {
            let candidates = detector
                .detect(&doc)
                .with_context(|| format!("{} detection failed", detector.name()))?;
            (Some(detector.name()), candidates)
        }
        None => {
            let outcome = chain.run(&doc).context("detector chain failed")?;
            for (name, count) in &outcome.attempts {
                debug!(strategy = *name, count = *count, "strategy attempted");
            }
            (outcome.strategy, outcome.candidates)
        }
    };

    let suggested_groups = suggest_pattern_group_ids(&candidates);
    info!(
        count = candidates.len(),
        groups = %suggested_groups.join(","),
        "suggested pattern groups"
    );

    if args.major_only {
        let before = candidates.len();
        candidates = filter_major_chapters(&candidates, &args.filter.params());
        info!(before, after = candidates.len(), "applied major-chapter filter");
    }

    let manifest = CandidateManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source: Some(source),
        strategy: strategy.map(str::to_string),
        suggested_groups,
        candidates,
    };

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &manifest)?;
            info!(
                path = %path.display(),
                count = manifest.candidates.len(),
                "wrote candidate table"
            );
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(&manifest).context("failed to serialize candidates")?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}").context("failed to write candidates to stdout")?;
        }
    }

    Ok(())
}

/// The detector to run on its own, or `None` for the full fallback chain.
pub fn single_detector(strategy: Strategy, chain: &DetectorChain) -> Option<Detector> {
    let [outline, toc, style, pattern] = chain.detectors();
    match strategy {
        Strategy::Auto => None,
        Strategy::Outline => Some(outline),
        Strategy::Toc => Some(toc),
        Strategy::Style => Some(style),
        Strategy::Pattern => Some(pattern),
    }
}
