use std::collections::BTreeMap;

use echo_model::{Circuit, Config};
use tracing::{debug, info};

use crate::book::SheetSource;
use crate::cell::{cell_ref, Cell, CellGrid};
use crate::labels::SheetLabels;
use crate::SheetError;

/// Replace the content of `config` with the circuits, spaces and presets in
/// `source`.
///
/// The panel name and dialect are kept; the rack map is synthesized from the
/// imported space numbers. `config` is untouched when reading fails.
pub fn import<S: SheetSource>(
    config: &mut Config,
    source: &mut S,
    labels: &SheetLabels,
) -> Result<(), SheetError> {
    let levels = required_sheet(source, &labels.levels_sheet)?;
    let times = required_sheet(source, &labels.times_sheet)?;

    let mut fresh = config.empty_like();
    read_levels(&mut fresh, &levels, labels)?;
    read_times(&mut fresh, &times, labels)?;
    fresh.synthesize_rack();

    info!(
        circuits = fresh.circuit_count(),
        spaces = fresh.space_count(),
        presets = fresh.preset_count(),
        "imported spreadsheet"
    );
    *config = fresh;
    Ok(())
}

fn required_sheet<S: SheetSource>(source: &mut S, name: &str) -> Result<S::Grid, SheetError> {
    source
        .sheet(name)?
        .ok_or_else(|| SheetError::MissingSheet(name.to_string()))
}

fn read_levels<G: CellGrid>(config: &mut Config, grid: &G, labels: &SheetLabels) -> Result<(), SheetError> {
    let sheet = labels.levels_sheet.as_str();
    let columns = Columns::discover(
        grid,
        sheet,
        &[
            labels.circuit.as_str(),
            labels.space.as_str(),
            labels.zone.as_str(),
        ],
        labels,
    )?;
    for &num in columns.presets.keys() {
        config.preset_entry(num);
    }

    let (height, _) = grid.extent();
    for row in 1..height {
        if columns.row_is_blank(grid, row) {
            debug!(sheet, row, "skip blank row");
            continue;
        }
        let circuit = Circuit {
            num: read_u32(grid, sheet, row, columns.fixed[0], u32::MAX)?,
            space: read_u32(grid, sheet, row, columns.fixed[1], u32::MAX)?,
            zone: read_u32(grid, sheet, row, columns.fixed[2], u32::MAX)?,
        };
        config.upsert_circuit(circuit);
        for (&preset, &col) in &columns.presets {
            let entry = config.preset_entry(preset);
            match read_entry(grid, sheet, row, col, u8::MAX.into())? {
                Some(level) => {
                    entry.levels.insert(circuit.num, level as u8);
                }
                None => debug!(sheet, preset, circuit = circuit.num, "no level"),
            }
        }
    }
    Ok(())
}

fn read_times<G: CellGrid>(config: &mut Config, grid: &G, labels: &SheetLabels) -> Result<(), SheetError> {
    let sheet = labels.times_sheet.as_str();
    let columns = Columns::discover(grid, sheet, &[labels.space.as_str()], labels)?;
    for &num in columns.presets.keys() {
        config.preset_entry(num);
    }

    let (height, _) = grid.extent();
    for row in 1..height {
        if columns.row_is_blank(grid, row) {
            debug!(sheet, row, "skip blank row");
            continue;
        }
        let space = read_u32(grid, sheet, row, columns.fixed[0], u32::MAX)?;
        config.upsert_space(space);
        for (&preset, &col) in &columns.presets {
            let entry = config.preset_entry(preset);
            match read_entry(grid, sheet, row, col, u32::MAX)? {
                Some(seconds) => {
                    entry.fade_times.insert(space, seconds);
                }
                None => debug!(sheet, preset, space, "no fade time"),
            }
        }
    }
    Ok(())
}

/// Column indices found in a header row.
struct Columns {
    /// Same order as the labels passed to [`Columns::discover`].
    fixed: Vec<u32>,
    /// Preset number -> column.
    presets: BTreeMap<u32, u32>,
}

impl Columns {
    /// Scan row 0 left to right up to the first blank cell.
    fn discover<G: CellGrid>(
        grid: &G,
        sheet: &str,
        fixed_labels: &[&str],
        labels: &SheetLabels,
    ) -> Result<Self, SheetError> {
        let (_, width) = grid.extent();
        let mut fixed = vec![None; fixed_labels.len()];
        let mut presets = BTreeMap::new();
        for col in 0..width {
            let cell = grid.cell(0, col);
            if cell.is_blank() {
                break;
            }
            let Some(text) = cell.as_text() else {
                continue;
            };
            if let Some(idx) = fixed_labels.iter().position(|label| *label == text) {
                fixed[idx] = Some(col);
            } else if let Some(num) = labels.parse_preset_header(text) {
                presets.insert(num, col);
            }
        }

        let fixed = fixed
            .into_iter()
            .zip(fixed_labels)
            .map(|(col, label)| {
                col.ok_or_else(|| SheetError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: label.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if presets.is_empty() {
            return Err(SheetError::MissingColumn {
                sheet: sheet.to_string(),
                column: format!("{} <N>", labels.preset),
            });
        }
        debug!(sheet, presets = presets.len(), "discovered columns");
        Ok(Self { fixed, presets })
    }

    fn row_is_blank<G: CellGrid>(&self, grid: &G, row: u32) -> bool {
        self.fixed
            .iter()
            .chain(self.presets.values())
            .all(|&col| grid.cell(row, col).is_blank())
    }
}

/// Preset cell: blank means the preset has no entry for this row.
fn read_entry<G: CellGrid>(
    grid: &G,
    sheet: &str,
    row: u32,
    col: u32,
    max: u32,
) -> Result<Option<u32>, SheetError> {
    if grid.cell(row, col).is_blank() {
        return Ok(None);
    }
    read_u32(grid, sheet, row, col, max).map(Some)
}

/// Cell `(row, col)` as an integer in `0..=max`.
fn read_u32<G: CellGrid>(grid: &G, sheet: &str, row: u32, col: u32, max: u32) -> Result<u32, SheetError> {
    let cell = grid.cell(row, col);
    let value = match &cell {
        Cell::Int(value) => u64::try_from(*value).ok(),
        Cell::Float(value) if value.is_finite() && *value >= 0.0 && value.fract() == 0.0 => {
            Some(*value as u64)
        }
        Cell::Text(text) if text.trim().is_empty() => None,
        Cell::Text(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    let Some(value) = value else {
        return Err(if cell.is_blank() {
            SheetError::MissingValue {
                sheet: sheet.to_string(),
                cell: cell_ref(row, col),
            }
        } else {
            SheetError::NotANumber {
                sheet: sheet.to_string(),
                cell: cell_ref(row, col),
                found: cell.to_string(),
            }
        });
    };
    if value > u64::from(max) {
        return Err(SheetError::OutOfRange {
            sheet: sheet.to_string(),
            cell: cell_ref(row, col),
            value,
            max,
        });
    }
    Ok(value as u32)
}
