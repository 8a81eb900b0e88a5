use std::path::Path;

use anyhow::Result;
use echoconfig::SheetLabels;
use serde::Serialize;

use crate::common;

#[derive(Serialize)]
struct Applied<'a> {
    out: String,
    panel: &'a str,
    circuits: usize,
    spaces: usize,
    presets: usize,
}

pub fn run(config: &Path, sheet: &Path, out: &Path, labels: &SheetLabels, json: bool) -> Result<()> {
    let applied = echoconfig::apply_sheet(config, sheet, out, labels).map_err(|err| {
        let class = err.class();
        anyhow::Error::new(err).context(format!("apply {} ({class} error)", sheet.display()))
    })?;
    let summary = Applied {
        out: out.display().to_string(),
        panel: echoconfig::panel_type(&applied),
        circuits: applied.circuit_count(),
        spaces: applied.space_count(),
        presets: applied.preset_count(),
    };
    if json {
        return common::print_json(&summary);
    }
    println!(
        "{} -> {} ({} circuits, {} spaces, {} presets)",
        sheet.display(),
        summary.out,
        summary.circuits,
        summary.spaces,
        summary.presets
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd_export;

    const PANEL: &str = r#"<?xml version="1.0"?>
<EACP>
  <RACK VERSION="2.0.1" NAME="Gallery">
    <OUTPUT NUMBER="1" SPACE="1" ZONE="1"/>
    <OUTPUT NUMBER="2" SPACE="1" ZONE="2"/>
    <SPACE SPACEINRACK="1" NUMBER="1" NAME="West"/>
    <PRESET NUMBER="1">
      <PREFADELEVEL SPACEINRACK="1" PREFADELEVEL="2"/>
      <PRELEVEL OUTPUT="1" LEVEL="200"/>
      <PRELEVEL OUTPUT="2" LEVEL="50"/>
    </PRESET>
  </RACK>
</EACP>
"#;

    #[test]
    fn export_then_apply_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("panel.xml");
        let sheet = dir.path().join("panel.xlsx");
        let out = dir.path().join("panel-new.xml");
        std::fs::write(&config, PANEL).unwrap();

        let labels = SheetLabels::default();
        cmd_export::run(&config, &sheet, &labels).unwrap();
        run(&config, &sheet, &out, &labels, false).unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), PANEL);
    }

    #[test]
    fn failure_names_error_class() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("panel.xml");
        std::fs::write(&config, PANEL).unwrap();
        let err = run(
            &config,
            &dir.path().join("missing.xlsx"),
            &dir.path().join("out.xml"),
            &SheetLabels::default(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("(io error)"));
    }
}
