//! Chapter-boundary inference: the pattern catalog, the four detectors, the
//! fallback chain and the major-chapter filter.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::document::PageSource;
use crate::error::Result;
use crate::layout::{Line, PageLayout, TextSpan};
use crate::model::{CandidateSource, ChapterCandidate};
use crate::util::normalize_whitespace;

mod body_size;
mod chain;
mod filter;
mod outline;
mod pattern_match;
pub mod patterns;
mod style;
#[cfg(test)]
mod tests;
mod toc_page;

pub use chain::{ChainOutcome, Detector, DetectorChain};
pub use filter::{FilterParams, filter_major_chapters, suggest_pattern_group_ids};
pub use outline::detect_outline;
pub use pattern_match::{PatternParams, detect_by_pattern};
pub use style::{StyleParams, detect_by_style};
pub use toc_page::{TocParams, detect_from_toc_pages};

use body_size::*;
