use super::*;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ExportMode {
    /// One sub-document per node.
    Split,
    /// One rendered image per page, in a folder per node.
    #[default]
    Images,
}

impl ExportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Split => "pdf",
            Self::Images => "image",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub mode: ExportMode,
    pub render: RenderOptions,
    /// Image-mode output is also written below this directory.
    pub mirror_root: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ExportOutput {
    pub plan: ExportPlan,
    /// Archive entry names written for each node, parallel to `plan.nodes`.
    pub entries: Vec<Vec<String>>,
    pub archive: Vec<u8>,
    pub mirrored_paths: Vec<PathBuf>,
}

/// Plans the selected candidates and writes every node into an in-memory ZIP
/// archive.
///
/// Any render or extraction failure aborts the whole export and no archive is
/// returned. Mirrored files already written stay on disk.
pub fn plan_and_export<D>(
    doc: &D,
    candidates: &[ChapterCandidate],
    options: &ExportOptions,
) -> Result<ExportOutput>
where
    D: PageSource + ?Sized,
{
    let plan = plan_export(doc.book_title(), doc.page_count(), candidates);
    info!(
        nodes = plan.nodes.len(),
        skipped = plan.skipped,
        mode = options.mode.as_str(),
        "planned export"
    );

    let mirror_root = match (&options.mirror_root, options.mode) {
        (Some(root), ExportMode::Images) => Some(root.as_path()),
        (Some(root), ExportMode::Split) => {
            warn!(root = %root.display(), "mirroring applies to image exports only");
            None
        }
        (None, _) => None,
    };

    let mut zip = ZipWriter::new(Cursor::new(Vec::<u8>::new()));
    let file_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::with_capacity(plan.nodes.len());
    let mut mirrored_paths = Vec::new();

    for node in &plan.nodes {
        let mut node_entries = Vec::new();
        match options.mode {
            ExportMode::Split => {
                let bytes = doc.extract_range(node.start, node.end)?;
                let mut parts = node.parent_parts(&plan.root);
                let file_name = format!("{}.pdf", node.leaf_title());
                parts.push(&file_name);
                let name = parts.join("/");

                zip.start_file(name.as_str(), file_options)?;
                zip.write_all(&bytes)?;
                node_entries.push(name);
            }
            ExportMode::Images => {
                let parts = node.path_parts(&plan.root);
                let folder = parts.join("/");
                let extension = options.render.format.extension();

                for (offset, page_index) in node.pages().enumerate() {
                    let bytes = doc.render_page(page_index, &options.render)?;
                    let file_name = format!("{:03}.{}", offset + 1, extension);
                    let name = format!("{folder}/{file_name}");

                    zip.start_file(name.as_str(), file_options)?;
                    zip.write_all(&bytes)?;

                    if let Some(root) = mirror_root {
                        let directory = parts.iter().fold(root.to_path_buf(), |path, part| path.join(part));
                        fs::create_dir_all(&directory)?;
                        let target = directory.join(&file_name);
                        fs::write(&target, &bytes)?;
                        mirrored_paths.push(target);
                    }
                    node_entries.push(name);
                }
            }
        }

        debug!(
            path = %node.path_parts(&plan.root).join("/"),
            depth = node.depth(),
            start = node.start,
            end = node.end,
            entries = node_entries.len(),
            "exported node"
        );
        entries.push(node_entries);
    }

    let archive = zip.finish()?.into_inner();
    info!(
        bytes = archive.len(),
        mirrored = mirrored_paths.len(),
        "export archive complete"
    );

    Ok(ExportOutput {
        plan,
        entries,
        archive,
        mirrored_paths,
    })
}
