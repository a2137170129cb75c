use std::ffi::OsStr;
use std::process::{Command, Output};

use serde::Serialize;

use crate::error::{ChapterError, Result};

pub const POPPLER_TOOLS: [&str; 6] = [
    "pdfinfo",
    "pdftohtml",
    "pdftotext",
    "pdftoppm",
    "pdfseparate",
    "pdfunite",
];

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersion {
    pub program: String,
    pub version: Option<String>,
}

pub fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}

pub fn collect_tool_versions() -> Vec<ToolVersion> {
    POPPLER_TOOLS
        .iter()
        .map(|program| ToolVersion {
            program: program.to_string(),
            version: command_version_optional(program, &["-v"]),
        })
        .collect()
}

/// Runs a tool to completion and returns its output when it exits cleanly.
///
/// A spawn failure maps to `ToolMissing`; a non-zero exit is handed to
/// `on_failure` with the tool's trimmed stderr.
pub fn run_tool<I, S, F>(program: &str, args: I, on_failure: F) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    F: FnOnce(String) -> ChapterError,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|_| ChapterError::ToolMissing {
            program: program.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(on_failure(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(output)
}
