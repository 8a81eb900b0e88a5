//! Spreadsheet codec for Echo panel configurations.
//!
//! A workbook holds two sheets: *Levels* (one row per circuit, one column
//! per preset) and *Times* (one row per space, one column per preset).
//! Reading discovers columns from the header row; writing uses a fixed
//! layout. Both work on the [`CellGrid`] abstraction so the codec does not
//! depend on a file format; [`XlsxSource`] and [`to_xlsx`] bind it to xlsx.

mod book;
mod cell;
mod labels;
mod read;
mod write;
mod xlsx;

use thiserror::Error;

pub use book::{Sheet, SheetSource, Workbook};
pub use cell::{cell_ref, Cell, CellGrid, Grid};
pub use labels::SheetLabels;
pub use read::import;
pub use write::export;
pub use xlsx::{to_xlsx, XlsxSource};

#[derive(Debug, Error)]
pub enum SheetError {
    /// The workbook file could not be opened or a sheet could not be read.
    #[error("workbook: {0}")]
    Workbook(String),
    #[error("xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("workbook has no sheet named {0:?}")]
    MissingSheet(String),
    #[error("sheet {sheet:?} has no {column:?} column")]
    MissingColumn { sheet: String, column: String },
    #[error("{sheet}!{cell}: value is missing")]
    MissingValue { sheet: String, cell: String },
    #[error("{sheet}!{cell}: expected a non-negative integer, found {found}")]
    NotANumber {
        sheet: String,
        cell: String,
        found: String,
    },
    #[error("{sheet}!{cell}: {value} exceeds {max}")]
    OutOfRange {
        sheet: String,
        cell: String,
        value: u64,
        max: u32,
    },
    #[error("sheet {sheet:?} needs {columns} columns, more than a worksheet holds")]
    TooManyColumns { sheet: String, columns: usize },
}
