use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::chapters::{DetectorChain, FilterParams, PatternParams, StyleParams, TocParams};
use crate::document::{ImageFormat, RenderOptions};
use crate::export::ExportMode;

#[derive(Parser, Debug)]
#[command(
    name = "chapter-split",
    version,
    about = "Infer chapter boundaries in PDFs and export them as nested archives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect chapter candidates and write an editable candidate table.
    Detect(DetectArgs),
    /// Apply the major-chapter filter to a candidate table.
    Filter(FilterArgs),
    /// Export a candidate table as split documents or page images.
    Export(ExportArgs),
    /// List the chapter-heading pattern catalog.
    Patterns(PatternsArgs),
    /// Report tool versions and basic document facts.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long, value_enum, default_value_t = Strategy::Auto)]
    pub strategy: Strategy,

    #[command(flatten)]
    pub detector: DetectorArgs,

    /// Keep only candidates that look like major chapters.
    #[arg(long, default_value_t = false)]
    pub major_only: bool,

    #[command(flatten)]
    pub filter: FilterOptionArgs,

    /// Candidate table path; printed to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Strategy {
    Auto,
    Outline,
    Toc,
    Style,
    Pattern,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Sensitivity {
    Fine,
    Standard,
    Coarse,
}

impl Sensitivity {
    /// `(header_scale, min_page_gap)`.
    pub fn style_preset(self) -> (f64, usize) {
        match self {
            Self::Fine => (1.1, 1),
            Self::Standard => (1.3, 3),
            Self::Coarse => (1.5, 5),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DetectorArgs {
    #[arg(long, value_enum)]
    pub sensitivity: Option<Sensitivity>,

    /// Overrides the sensitivity preset.
    #[arg(long)]
    pub header_scale: Option<f64>,

    /// Overrides the sensitivity preset.
    #[arg(long)]
    pub min_page_gap: Option<usize>,

    #[arg(long, default_value_t = 0.5)]
    pub style_top_ratio: f64,

    /// Compare headings against each page's own body size instead of the
    /// document-wide one.
    #[arg(long, default_value_t = false)]
    pub per_page_body_size: bool,

    #[arg(long, default_value_t = 0.45)]
    pub pattern_top_ratio: f64,

    #[arg(long, default_value_t = 0.12)]
    pub margin_ratio: f64,

    #[arg(long)]
    pub min_size_ratio: Option<f64>,

    #[arg(long, default_value_t = 25)]
    pub toc_max_pages: usize,
}

impl DetectorArgs {
    pub fn chain(&self) -> DetectorChain {
        let style_defaults = StyleParams::default();
        let pattern_defaults = PatternParams::default();
        let preset = self.sensitivity.map(Sensitivity::style_preset);

        let header_scale = self
            .header_scale
            .or(preset.map(|(scale, _)| scale))
            .unwrap_or(style_defaults.header_scale);
        let style_gap = self
            .min_page_gap
            .or(preset.map(|(_, gap)| gap))
            .unwrap_or(style_defaults.min_page_gap);
        let pattern_gap = self
            .min_page_gap
            .or(preset.map(|(_, gap)| gap))
            .unwrap_or(pattern_defaults.min_page_gap);

        DetectorChain {
            toc: TocParams {
                max_scan_pages: self.toc_max_pages,
            },
            style: StyleParams {
                header_scale,
                min_page_gap: style_gap,
                top_ratio: self.style_top_ratio,
                per_page_font: self.per_page_body_size,
            },
            pattern: PatternParams {
                min_page_gap: pattern_gap,
                top_ratio: self.pattern_top_ratio,
                margin_ratio: self.margin_ratio,
                min_size_ratio: self.min_size_ratio,
            },
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FilterOptionArgs {
    /// Pattern group ids to treat as chapter markers; all groups when empty.
    #[arg(long = "group")]
    pub groups: Vec<String>,

    #[arg(long)]
    pub keyword: Option<String>,

    #[arg(long, default_value_t = 5)]
    pub min_distance: usize,
}

impl FilterOptionArgs {
    pub fn params(&self) -> FilterParams {
        FilterParams {
            active_groups: (!self.groups.is_empty()).then(|| self.groups.clone()),
            keyword: self.keyword.clone(),
            min_distance: self.min_distance,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(long)]
    pub candidates: PathBuf,

    #[command(flatten)]
    pub filter: FilterOptionArgs,

    /// Defaults to overwriting the input table.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportModeArg {
    Split,
    Images,
}

impl From<ExportModeArg> for ExportMode {
    fn from(value: ExportModeArg) -> Self {
        match value {
            ExportModeArg::Split => Self::Split,
            ExportModeArg::Images => Self::Images,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Quality {
    Standard,
    High,
    Ultra,
}

impl Quality {
    pub fn zoom(self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::High => 2.0,
            Self::Ultra => 3.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ImageFormatArg {
    Jpeg,
    Png,
}

impl From<ImageFormatArg> for ImageFormat {
    fn from(value: ImageFormatArg) -> Self {
        match value {
            ImageFormatArg::Jpeg => Self::Jpeg,
            ImageFormatArg::Png => Self::Png,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long)]
    pub candidates: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportModeArg::Images)]
    pub mode: ExportModeArg,

    #[arg(long, value_enum, conflicts_with = "zoom")]
    pub quality: Option<Quality>,

    #[arg(long)]
    pub zoom: Option<f64>,

    #[arg(long, value_enum, default_value_t = ImageFormatArg::Jpeg)]
    pub image_format: ImageFormatArg,

    #[arg(long, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Also write image exports into this directory tree.
    #[arg(long)]
    pub mirror_root: Option<PathBuf>,

    /// Archive path; defaults to `<book title>_<mode>.zip`.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn render_options(&self) -> RenderOptions {
        let zoom = self
            .zoom
            .or(self.quality.map(Quality::zoom))
            .unwrap_or(RenderOptions::default().zoom);
        RenderOptions {
            zoom,
            format: self.image_format.into(),
            jpeg_quality: self.jpeg_quality,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct PatternsArgs {
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
