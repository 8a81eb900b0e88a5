use std::path::Path;

use anyhow::{bail, Context, Result};
use echoconfig::{Config, Reference, SheetLabels};
use serde::Serialize;
use tracing::info;

use crate::common;

#[derive(Serialize)]
struct Report<'a> {
    panel: &'static str,
    dangling: &'a [Reference],
}

/// Dangling references of `config`, after importing `sheet` when given.
pub fn dangling(
    config: &mut Config,
    sheet: Option<&Path>,
    labels: &SheetLabels,
) -> Result<Vec<Reference>> {
    if let Some(sheet) = sheet {
        echoconfig::import_sheet_with(config, sheet, labels)
            .with_context(|| format!("import {}", sheet.display()))?;
    }
    Ok(config.check_references())
}

pub fn run(config: &Path, sheet: Option<&Path>, labels: &SheetLabels, json: bool) -> Result<()> {
    let mut loaded = common::load(config)?;
    let dangling = dangling(&mut loaded, sheet, labels)?;
    info!(count = dangling.len(), "checked cross references");

    if json {
        common::print_json(&Report {
            panel: echoconfig::panel_type(&loaded),
            dangling: &dangling,
        })?;
    } else if dangling.is_empty() {
        println!("No dangling references.");
    } else {
        for reference in &dangling {
            println!("missing {reference}");
        }
    }

    if !dangling.is_empty() {
        bail!("{} dangling reference(s)", dangling.len());
    }
    Ok(())
}
