use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::common;

#[derive(Serialize)]
struct PanelInfo<'a> {
    panel: &'a str,
    dialect: Option<&'a str>,
    name: &'a str,
    circuits: usize,
    spaces: usize,
    rack_positions: usize,
    presets: usize,
}

pub fn run(config: &Path, json: bool) -> Result<()> {
    let config = common::load(config)?;
    let info = PanelInfo {
        panel: echoconfig::panel_type(&config),
        dialect: config.dialect(),
        name: echoconfig::panel_name(&config),
        circuits: config.circuit_count(),
        spaces: config.space_count(),
        rack_positions: config.rack().len(),
        presets: config.preset_count(),
    };

    if json {
        return common::print_json(&info);
    }

    println!("{} '{}'", info.panel, info.name);
    println!("{:<16} {}", "Circuits", info.circuits);
    println!("{:<16} {}", "Spaces", info.spaces);
    println!("{:<16} {}", "Rack positions", info.rack_positions);
    println!("{:<16} {}", "Presets", info.presets);
    Ok(())
}
