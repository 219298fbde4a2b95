//! Transcript emission.

pub mod transcript;

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::model::{OutputOptions, Row, Summary};

/// Render the rows and write the transcript file.
pub fn emit(rows: &[Row], opts: &OutputOptions, path: &Path) -> Result<Summary> {
    let (text, summary) = transcript::render(rows, opts);
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    info!(
        "wrote {}: {} maps, {} common events, {} events, {} dialogue lines",
        path.display(),
        summary.maps,
        summary.common_events,
        summary.events,
        summary.dialogue_lines
    );
    Ok(summary)
}
