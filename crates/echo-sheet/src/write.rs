use echo_model::{Config, Preset};
use tracing::info;

use crate::book::Workbook;
use crate::cell::{Cell, Grid};
use crate::labels::SheetLabels;

/// Lay `config` out as the Levels and Times sheets.
///
/// Rows follow the configuration's circuit and space order, preset columns
/// ascend by preset number. A preset without an entry for a row leaves the
/// cell empty.
pub fn export(config: &Config, labels: &SheetLabels) -> Workbook {
    let presets: Vec<&Preset> = config.presets().collect();
    let preset_headers: Vec<Cell> = presets
        .iter()
        .map(|preset| Cell::from(labels.preset_header(preset.num)))
        .collect();

    let mut levels = Grid::new();
    levels.push_row(
        [&labels.circuit, &labels.space, &labels.zone]
            .into_iter()
            .map(|label| Cell::from(label.as_str()))
            .chain(preset_headers.iter().cloned()),
    );
    for circuit in config.circuits() {
        levels.push_row(
            [circuit.num, circuit.space, circuit.zone]
                .into_iter()
                .map(Cell::from)
                .chain(
                    presets
                        .iter()
                        .map(|preset| Cell::from(preset.levels.get(&circuit.num).copied())),
                ),
        );
    }

    let mut times = Grid::new();
    times.push_row(
        std::iter::once(Cell::from(labels.space.as_str())).chain(preset_headers.iter().cloned()),
    );
    for space in config.spaces() {
        times.push_row(
            std::iter::once(Cell::from(space.num)).chain(
                presets
                    .iter()
                    .map(|preset| Cell::from(preset.fade_times.get(&space.num).copied())),
            ),
        );
    }

    info!(
        circuits = config.circuit_count(),
        spaces = config.space_count(),
        presets = presets.len(),
        "exported spreadsheet"
    );
    let mut book = Workbook::new();
    book.add_sheet(labels.levels_sheet.clone(), levels);
    book.add_sheet(labels.times_sheet.clone(), times);
    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellGrid;
    use crate::read::import;
    use echo_model::Circuit;

    fn sample() -> Config {
        let mut config = Config::new();
        config.set_name("Foyer");
        for (num, space, zone) in [(3, 2, 1), (1, 2, 2), (2, 20, 1)] {
            config.upsert_circuit(Circuit { num, space, zone });
        }
        for num in [4, 1] {
            let preset = config.preset_entry(num);
            for circuit in 1..=3 {
                preset.levels.insert(circuit, (num * 10 + circuit) as u8);
            }
            preset.fade_times.insert(2, num);
            preset.fade_times.insert(20, num + 1);
        }
        config
    }

    #[test]
    fn fixed_layout() {
        let book = export(&sample(), &SheetLabels::default());
        let names: Vec<&str> = book.sheets().iter().map(|sheet| sheet.name()).collect();
        assert_eq!(names, vec!["Levels", "Times"]);

        let levels = book.grid("Levels").unwrap();
        assert_eq!(levels.extent(), (4, 5));
        let header: Vec<Cell> = (0..5).map(|col| levels.cell(0, col)).collect();
        assert_eq!(
            header,
            ["Circuit", "Space", "Zone", "Preset 1", "Preset 4"].map(Cell::from)
        );
        assert_eq!(levels.cell(1, 0), Cell::Int(3), "circuit insertion order");
        assert_eq!(levels.cell(1, 4), Cell::Int(43));

        let times = book.grid("Times").unwrap();
        assert_eq!(times.extent(), (3, 3));
        assert_eq!(times.cell(2, 0), Cell::Int(20));
        assert_eq!(times.cell(2, 2), Cell::Int(5));
    }

    #[test]
    fn missing_entries_are_blank() {
        let mut config = sample();
        config.preset_entry(1).levels.remove(&2);
        let book = export(&config, &SheetLabels::default());
        let levels = book.grid("Levels").unwrap();
        assert_eq!(levels.cell(3, 3), Cell::Empty);
    }

    #[test]
    fn export_then_import_is_stable() {
        let original = sample();
        let labels = SheetLabels::default();
        let mut book = export(&original, &labels);
        let mut imported = original.empty_like();
        import(&mut imported, &mut book, &labels).unwrap();
        assert_eq!(imported, original);

        let again = export(&imported, &labels);
        assert_eq!(again, export(&original, &labels));
    }

    #[test]
    fn all_zero_preset_survives() {
        let mut config = sample();
        let preset = config.preset_entry(9);
        for circuit in 1..=3 {
            preset.levels.insert(circuit, 0);
        }
        preset.fade_times.insert(2, 0);
        preset.fade_times.insert(20, 0);

        let labels = SheetLabels::default();
        let mut book = export(&config, &labels);
        let mut imported = config.empty_like();
        import(&mut imported, &mut book, &labels).unwrap();
        let preset = imported.preset(9).unwrap();
        assert!(preset.levels.values().all(|&level| level == 0));
        assert_eq!(preset.levels.len(), 3);
    }
}
