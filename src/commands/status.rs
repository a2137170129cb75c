use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::open_document;
use crate::document::PageSource;
use crate::document::tools::{ToolVersion, collect_tool_versions};
use crate::util::sha256_file;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub tools: Vec<ToolVersion>,
    pub document: Option<DocumentStatus>,
}

#[derive(Debug, Serialize)]
pub struct DocumentStatus {
    pub path: String,
    pub sha256: String,
    pub title: String,
    pub page_count: usize,
    pub outline_entries: usize,
    pub first_page_size: Option<(f64, f64)>,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let tools = collect_tool_versions();
    for tool in &tools {
        match &tool.version {
            Some(version) => info!(program = %tool.program, version = %version, "tool available"),
            None => warn!(program = %tool.program, "tool missing"),
        }
    }

    let document = match &args.pdf {
        Some(pdf) => Some(document_status(pdf)?),
        None => None,
    };
    if let Some(document) = &document {
        info!(
            path = %document.path,
            sha256 = %document.sha256,
            title = %document.title,
            pages = document.page_count,
            outline_entries = document.outline_entries,
            first_page_size = ?document.first_page_size,
            "document status"
        );
    }

    if args.json {
        let report = StatusReport { tools, document };
        let rendered =
            serde_json::to_string_pretty(&report).context("failed to serialize status")?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}").context("failed to write status to stdout")?;
    }
    Ok(())
}

fn document_status(pdf: &Path) -> Result<DocumentStatus> {
    let doc = open_document(pdf)?;
    let outline = doc
        .embedded_outline()
        .with_context(|| format!("failed to read outline of {}", pdf.display()))?;
    let first_page_size = if doc.page_count() > 0 {
        Some(
            doc.page_size(0)
                .with_context(|| format!("failed to read page size of {}", pdf.display()))?,
        )
    } else {
        None
    };

    Ok(DocumentStatus {
        path: pdf.display().to_string(),
        sha256: sha256_file(pdf)?,
        title: doc.book_title().to_string(),
        page_count: doc.page_count(),
        outline_entries: outline.len(),
        first_page_size,
    })
}
