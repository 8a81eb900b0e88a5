use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use echoconfig::{Config, SheetLabels};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}

/// Sheet vocabulary from `path`, or the English defaults.
pub fn load_labels(path: Option<&Path>) -> Result<SheetLabels> {
    let Some(path) = path else {
        return Ok(SheetLabels::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read labels {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse labels {}", path.display()))
}

pub fn load(path: &Path) -> Result<Config> {
    echoconfig::load_config(path).with_context(|| format!("load {}", path.display()))
}
