use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ExportArgs;
use crate::commands::{MANIFEST_VERSION, open_document, source_info};
use crate::export::{ExportMode, ExportOptions, ExportOutput, plan_and_export};
use crate::model::{
    CandidateManifest, CandidateSource, ChapterCandidate, ExportManifest, ExportNodeSummary,
    SourceInfo,
};
use crate::util::{ensure_directory, now_utc_string, read_json, write_json_pretty};

pub fn run(args: ExportArgs) -> Result<()> {
    let table: CandidateManifest = read_json(&args.candidates)?;
    let doc = open_document(&args.pdf)?;
    let source = source_info(&doc)?;

    if let Some(recorded) = &table.source {
        if recorded.sha256 != source.sha256 {
            warn!(
                table = %args.candidates.display(),
                pdf = %args.pdf.display(),
                "candidate table was generated from a different file"
            );
        }
    }

    let candidates = edited_candidates(&table.candidates);
    if !candidates.iter().any(|candidate| candidate.selected) {
        bail!("no selected candidates in {}", args.candidates.display());
    }

    let options = ExportOptions {
        mode: args.mode.into(),
        render: args.render_options(),
        mirror_root: args.mirror_root.clone(),
    };
    info!(
        pdf = %args.pdf.display(),
        mode = options.mode.as_str(),
        zoom = options.render.zoom,
        format = options.render.format.extension(),
        "starting export"
    );

    let output = plan_and_export(&doc, &candidates, &options)
        .with_context(|| format!("failed to export {}", args.pdf.display()))?;
    if output.plan.nodes.is_empty() {
        warn!("no candidate produced a non-empty page range");
    }

    let archive_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_archive_path(&output.plan.root, options.mode));
    if let Some(parent) = archive_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        ensure_directory(parent)?;
    }
    fs::write(&archive_path, &output.archive)
        .with_context(|| format!("failed to write {}", archive_path.display()))?;

    let manifest_path = manifest_path_for(&archive_path);
    let manifest = export_manifest(&output, &options, source, &archive_path);
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        archive = %archive_path.display(),
        manifest = %manifest_path.display(),
        nodes = output.plan.nodes.len(),
        skipped = output.plan.skipped,
        bytes = output.archive.len(),
        "export finished"
    );
    Ok(())
}

/// Candidates from an edited table belong to the user from here on.
pub fn edited_candidates(candidates: &[ChapterCandidate]) -> Vec<ChapterCandidate> {
    candidates
        .iter()
        .cloned()
        .map(|candidate| ChapterCandidate {
            source: CandidateSource::User,
            ..candidate
        })
        .collect()
}

pub fn default_archive_path(root: &str, mode: ExportMode) -> PathBuf {
    PathBuf::from(format!("{}_{}.zip", root, mode.as_str()))
}

pub fn manifest_path_for(archive_path: &Path) -> PathBuf {
    archive_path.with_extension("manifest.json")
}

fn export_manifest(
    output: &ExportOutput,
    options: &ExportOptions,
    source: SourceInfo,
    archive_path: &Path,
) -> ExportManifest {
    let root = output.plan.root.as_str();
    let nodes = output
        .plan
        .nodes
        .iter()
        .zip(&output.entries)
        .map(|(node, entries)| ExportNodeSummary {
            path: node.path_parts(root).join("/"),
            level: node.level(),
            page_start: node.start + 1,
            page_end: node.end,
            entries: entries.clone(),
        })
        .collect();

    ExportManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source,
        mode: options.mode.as_str().to_string(),
        archive_path: archive_path.display().to_string(),
        archive_bytes: output.archive.len(),
        mirror_root: options
            .mirror_root
            .as_ref()
            .map(|root| root.display().to_string()),
        mirrored_paths: output
            .mirrored_paths
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
        skipped_candidates: output.plan.skipped,
        nodes,
    }
}
