use std::path::Path;

use anyhow::{Context, Result};
use echoconfig::SheetLabels;
use tracing::info;

use crate::common;

pub fn run(config: &Path, sheet: &Path, labels: &SheetLabels) -> Result<()> {
    let loaded = common::load(config)?;
    echoconfig::export_sheet_with(&loaded, sheet, labels)
        .with_context(|| format!("export {}", sheet.display()))?;
    info!(
        presets = loaded.preset_count(),
        circuits = loaded.circuit_count(),
        "spreadsheet ready"
    );
    println!("{} -> {}", config.display(), sheet.display());
    Ok(())
}
