use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chapters::patterns::PATTERN_GROUPS;
use crate::cli::PatternsArgs;

#[derive(Debug, Serialize)]
struct PatternGroupSummary {
    id: &'static str,
    label: &'static str,
    patterns: Vec<String>,
}

pub fn run(args: PatternsArgs) -> Result<()> {
    let groups = PATTERN_GROUPS
        .iter()
        .map(|group| PatternGroupSummary {
            id: group.id,
            label: group.label,
            patterns: group
                .patterns
                .iter()
                .map(|pattern| pattern.as_str().to_string())
                .collect(),
        })
        .collect::<Vec<_>>();

    let mut stdout = io::stdout().lock();
    if args.json {
        let rendered =
            serde_json::to_string_pretty(&groups).context("failed to serialize pattern groups")?;
        writeln!(stdout, "{rendered}").context("failed to write pattern groups")?;
        return Ok(());
    }

    for group in &groups {
        writeln!(stdout, "{} ({})", group.id, group.label)
            .context("failed to write pattern groups")?;
        for pattern in &group.patterns {
            writeln!(stdout, "    {pattern}").context("failed to write pattern groups")?;
        }
    }
    Ok(())
}
