use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MOCK_PANEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SMARTSWITCH2>
  <CABINET VERSION="3.1.0" NAME="Demo Hall">
    <RELAYS>
      <RELAY NUMBER="1" SPACE="1" ZONE="1"/>
      <RELAY NUMBER="2" SPACE="1" ZONE="1"/>
      <RELAY NUMBER="3" SPACE="18" ZONE="2"/>
    </RELAYS>
    <SPACES>
      <SPACE SPACEINRACK="1" NUMBER="1" NAME="House"/>
      <SPACE SPACEINRACKEXT="2" NUMBEREXT="18" NAMEEXT="Foyer"/>
    </SPACES>
    <PRESETS>
      <PRESET NUMBER="1" NAME="Walk in">
        <PREFADELEVEL SPACEINRACK="1" UPTIME="3"/>
        <PREFADELEVEL SPACEINRACK="2" UPTIME="5"/>
        <PRELEVEL RELAY="1" LEVEL="255"/>
        <PRELEVEL RELAY="2" LEVEL="180"/>
        <PRELEVEL RELAY="3" LEVEL="90"/>
      </PRESET>
    </PRESETS>
  </CABINET>
</SMARTSWITCH2>
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with_target(false)
        .init();

    let dir = tempfile::tempdir().context("create work directory")?;
    let base = match env::args().nth(1) {
        Some(arg) if arg != "--mock" => PathBuf::from(arg),
        _ => {
            let path = dir.path().join("mock.xml");
            fs::write(&path, MOCK_PANEL).context("write mock panel")?;
            path
        }
    };
    run(&base, dir.path())
}

fn run(base: &Path, work: &Path) -> Result<()> {
    let config = echoconfig::load_config(base)?;
    println!(
        "{} '{}': {} circuits, {} spaces, {} presets",
        echoconfig::panel_type(&config),
        echoconfig::panel_name(&config),
        config.circuit_count(),
        config.space_count(),
        config.preset_count()
    );

    let sheet = work.join("levels.xlsx");
    let out = work.join("rewritten.xml");
    echoconfig::export_sheet(&config, &sheet)?;
    info!(sheet = %sheet.display(), "applying unedited sheet");
    let labels = echoconfig::SheetLabels::default();
    echoconfig::apply_sheet(base, &sheet, &out, &labels)?;

    let before = fs::read(base).with_context(|| format!("read {}", base.display()))?;
    let after = fs::read(&out).context("read rewritten panel")?;
    if before != after {
        bail!("rewrite of an unedited sheet changed {}", base.display());
    }
    println!("unedited sheet rewrites {} byte for byte", base.display());
    Ok(())
}
