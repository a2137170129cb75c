//! Turns an approved candidate list into nested output: split sub-documents
//! or per-page images, packed into a ZIP archive.

use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::{PageSource, RenderOptions};
use crate::error::Result;
use crate::model::ChapterCandidate;

mod archive;
mod plan;

pub use archive::{ExportMode, ExportOptions, ExportOutput, plan_and_export};
pub use plan::{ExportNode, ExportPlan, PathSegment, plan_export, sanitize_title};
