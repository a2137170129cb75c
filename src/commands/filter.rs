use anyhow::Result;
use tracing::info;

use crate::chapters::filter_major_chapters;
use crate::cli::FilterArgs;
use crate::model::CandidateManifest;
use crate::util::{now_utc_string, read_json, write_json_pretty};

pub fn run(args: FilterArgs) -> Result<()> {
    let mut manifest: CandidateManifest = read_json(&args.candidates)?;
    let before = manifest.candidates.len();

    manifest.candidates = filter_major_chapters(&manifest.candidates, &args.filter.params());
    manifest.generated_at = now_utc_string();

    let output = args.output.unwrap_or(args.candidates);
    write_json_pretty(&output, &manifest)?;

    info!(
        path = %output.display(),
        before,
        after = manifest.candidates.len(),
        "filtered candidate table"
    );
    Ok(())
}
