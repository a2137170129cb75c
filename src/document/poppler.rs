use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use super::tools::run_tool;
use super::xml_layout::parse_pdftohtml_xml;
use super::{ImageFormat, PageSource, RenderOptions};
use crate::error::{ChapterError, Result};
use crate::layout::{OutlineEntry, PageLayout};

static PAGES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Pages:\s+(\d+)\s*$").expect("pdfinfo pages regex"));

static PAGE_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Page size:\s+([0-9.]+)\s+x\s+([0-9.]+)\s+pts").expect("pdfinfo size regex")
});

/// A PDF on disk, read through the Poppler command-line tools.
///
/// Text layout, outline and raw text are extracted once at open time and kept
/// for the lifetime of the value. Rendering and range extraction go back to
/// the file on every call.
#[derive(Debug)]
pub struct PdfDocument {
    path: PathBuf,
    book_title: String,
    page_count: usize,
    default_size: (f64, f64),
    layouts: Vec<PageLayout>,
    raw_text: Vec<String>,
    outline: Vec<OutlineEntry>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(invalid(path, "file does not exist"));
        }

        let info = run_tool("pdfinfo", [path.as_os_str()], |reason| invalid(path, &reason))?;
        let info = String::from_utf8_lossy(&info.stdout);
        let page_count = PAGES_RE
            .captures(&info)
            .and_then(|captures| captures[1].parse::<usize>().ok())
            .ok_or_else(|| invalid(path, "pdfinfo did not report a page count"))?;
        let default_size = PAGE_SIZE_RE
            .captures(&info)
            .and_then(|captures| {
                let width = captures[1].parse::<f64>().ok()?;
                let height = captures[2].parse::<f64>().ok()?;
                Some((width, height))
            })
            .unwrap_or((595.0, 842.0));

        let xml = run_tool(
            "pdftohtml",
            [
                OsStr::new("-xml"),
                OsStr::new("-i"),
                OsStr::new("-hidden"),
                OsStr::new("-q"),
                OsStr::new("-zoom"),
                OsStr::new("1"),
                OsStr::new("-stdout"),
                path.as_os_str(),
            ],
            |reason| invalid(path, &reason),
        )?;
        let parsed = parse_pdftohtml_xml(&String::from_utf8_lossy(&xml.stdout))
            .map_err(|error| invalid(path, &format!("unreadable pdftohtml output: {error}")))?;

        let mut layouts = (0..page_count)
            .map(|index| PageLayout {
                index,
                width: default_size.0,
                height: default_size.1,
                blocks: Vec::new(),
            })
            .collect::<Vec<PageLayout>>();
        for layout in parsed.pages {
            if let Some(slot) = layouts.get_mut(layout.index) {
                *slot = layout;
            }
        }

        let raw_text = extract_raw_text(path, page_count)?;

        let book_title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("document")
            .to_string();

        info!(
            path = %path.display(),
            pages = page_count,
            outline_entries = parsed.outline.len(),
            "opened document"
        );

        Ok(Self {
            path: path.to_path_buf(),
            book_title,
            page_count,
            default_size,
            layouts,
            raw_text,
            outline: parsed.outline,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.page_count {
            return Err(ChapterError::PageOutOfRange {
                index,
                page_count: self.page_count,
            });
        }
        Ok(())
    }
}

impl PageSource for PdfDocument {
    fn book_title(&self) -> &str {
        &self.book_title
    }

    fn page_count(&self) -> usize {
        self.page_count
    }

    fn embedded_outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }

    fn page_layout(&self, index: usize) -> Result<PageLayout> {
        self.check_index(index)?;
        Ok(self.layouts[index].clone())
    }

    fn raw_page_text(&self, index: usize) -> Result<String> {
        self.check_index(index)?;
        Ok(self.raw_text.get(index).cloned().unwrap_or_default())
    }

    fn page_size(&self, index: usize) -> Result<(f64, f64)> {
        self.check_index(index)?;
        let layout = &self.layouts[index];
        if layout.width > 0.0 && layout.height > 0.0 {
            Ok((layout.width, layout.height))
        } else {
            Ok(self.default_size)
        }
    }

    fn render_page(&self, index: usize, options: &RenderOptions) -> Result<Vec<u8>> {
        self.check_index(index)?;
        let page = index + 1;
        let failure = |reason: String| ChapterError::RenderFailure { page, reason };

        let scratch = tempfile::tempdir()?;
        let output_root = scratch.path().join("page");
        let dpi = (72.0 * options.zoom).round().max(1.0) as u32;

        let mut args = vec![
            "-f".to_string(),
            page.to_string(),
            "-l".to_string(),
            page.to_string(),
            "-singlefile".to_string(),
            "-r".to_string(),
            dpi.to_string(),
        ];
        match options.format {
            ImageFormat::Jpeg => {
                args.push("-jpeg".to_string());
                args.push("-jpegopt".to_string());
                args.push(format!("quality={}", options.jpeg_quality.min(100)));
            }
            ImageFormat::Png => args.push("-png".to_string()),
        }
        args.push(self.path.display().to_string());
        args.push(output_root.display().to_string());

        run_tool("pdftoppm", &args, failure)?;

        let image_path = output_root.with_extension(options.format.extension());
        let bytes = fs::read(&image_path)
            .map_err(|error| failure(format!("no image at {}: {error}", image_path.display())))?;
        debug!(page, dpi, bytes = bytes.len(), "rendered page");
        Ok(bytes)
    }

    fn extract_range(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        if start >= end || end > self.page_count {
            return Err(ChapterError::ExtractFailure {
                start,
                end,
                reason: format!("range is empty or beyond {} pages", self.page_count),
            });
        }
        let failure = |reason: String| ChapterError::ExtractFailure { start, end, reason };

        let scratch = tempfile::tempdir()?;
        let pattern = scratch.path().join("page-%d.pdf");
        run_tool(
            "pdfseparate",
            [
                "-f".to_string(),
                (start + 1).to_string(),
                "-l".to_string(),
                end.to_string(),
                self.path.display().to_string(),
                pattern.display().to_string(),
            ],
            failure,
        )?;

        let pieces = (start + 1..=end)
            .map(|page| scratch.path().join(format!("page-{page}.pdf")))
            .collect::<Vec<PathBuf>>();
        if let Some(missing) = pieces.iter().find(|piece| !piece.is_file()) {
            return Err(failure(format!(
                "pdfseparate did not produce {}",
                missing.display()
            )));
        }

        let merged = if pieces.len() == 1 {
            pieces[0].clone()
        } else {
            let merged = scratch.path().join("range.pdf");
            let mut args = pieces
                .iter()
                .map(|piece| piece.display().to_string())
                .collect::<Vec<String>>();
            args.push(merged.display().to_string());
            run_tool("pdfunite", &args, failure)?;
            merged
        };

        let bytes = fs::read(&merged).map_err(|error| failure(error.to_string()))?;
        debug!(start, end, bytes = bytes.len(), "extracted page range");
        Ok(bytes)
    }
}

fn extract_raw_text(path: &Path, page_count: usize) -> Result<Vec<String>> {
    let output = run_tool(
        "pdftotext",
        [
            OsStr::new("-enc"),
            OsStr::new("UTF-8"),
            path.as_os_str(),
            OsStr::new("-"),
        ],
        |reason| invalid(path, &reason),
    )?;

    let raw = String::from_utf8_lossy(&output.stdout);
    let mut pages = raw
        .split('\u{000C}')
        .take(page_count)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();
    pages.resize(page_count, String::new());
    Ok(pages)
}

fn invalid(path: &Path, reason: &str) -> ChapterError {
    ChapterError::InvalidDocument {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
