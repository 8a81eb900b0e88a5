//! xlsx binding: calamine reads workbooks, rust_xlsxwriter writes them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use rust_xlsxwriter::Format;
use tracing::debug;

use crate::book::{SheetSource, Workbook};
use crate::cell::{Cell, CellGrid};
use crate::SheetError;

/// Spreadsheet file opened for reading (xlsx, xls, xlsb or ods).
pub struct XlsxSource {
    sheets: Sheets<BufReader<File>>,
}

impl XlsxSource {
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let sheets = open_workbook_auto(path)
            .map_err(|err| SheetError::Workbook(format!("{}: {err}", path.display())))?;
        Ok(Self { sheets })
    }
}

impl SheetSource for XlsxSource {
    type Grid = Range<Data>;

    fn sheet(&mut self, name: &str) -> Result<Option<Range<Data>>, SheetError> {
        if !self.sheets.sheet_names().iter().any(|sheet| sheet == name) {
            return Ok(None);
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|err| SheetError::Workbook(format!("sheet {name:?}: {err}")))?;
        debug!(sheet = name, size = ?range.get_size(), "read worksheet");
        Ok(Some(range))
    }
}

impl CellGrid for Range<Data> {
    fn extent(&self) -> (u32, u32) {
        self.end().map_or((0, 0), |(row, col)| (row + 1, col + 1))
    }

    fn cell(&self, row: u32, col: u32) -> Cell {
        self.get_value((row, col)).map_or(Cell::Empty, Cell::from)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(value) => Cell::Int(*value),
            Data::Float(value) => Cell::Float(*value),
            Data::Bool(value) => Cell::Bool(*value),
            Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
                Cell::Text(text.clone())
            }
            Data::DateTime(date) => Cell::Float(date.as_f64()),
            Data::Error(err) => Cell::Text(err.to_string()),
        }
    }
}

/// Serialize `book` as an xlsx file with a bold, frozen header row.
pub fn to_xlsx(book: &Workbook) -> Result<Vec<u8>, SheetError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let header = Format::new().set_bold();

    for sheet in book.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name())?;
        for (row, cells) in sheet.grid().rows().enumerate() {
            let row = row as u32;
            for (col, cell) in cells.iter().enumerate() {
                let col = u16::try_from(col).map_err(|_| SheetError::TooManyColumns {
                    sheet: sheet.name().to_string(),
                    columns: cells.len(),
                })?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) if row == 0 => {
                        worksheet.write_string_with_format(row, col, text, &header)?;
                    }
                    Cell::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    Cell::Int(value) => {
                        worksheet.write_number(row, col, *value as f64)?;
                    }
                    Cell::Float(value) => {
                        worksheet.write_number(row, col, *value)?;
                    }
                    Cell::Bool(value) => {
                        worksheet.write_boolean(row, col, *value)?;
                    }
                }
            }
        }
        worksheet.set_freeze_panes(1, 0)?;
    }
    Ok(workbook.save_to_buffer()?)
}
