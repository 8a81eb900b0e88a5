use crate::cell::{CellGrid, Grid};
use crate::SheetError;

/// Named sheet of a [`Workbook`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    grid: Grid,
}

impl Sheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// In-memory workbook: what [`crate::export`] produces and what tests import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, replacing any sheet with the same name.
    pub fn add_sheet(&mut self, name: impl Into<String>, grid: Grid) {
        let name = name.into();
        match self.sheets.iter_mut().find(|sheet| sheet.name == name) {
            Some(sheet) => sheet.grid = grid,
            None => self.sheets.push(Sheet { name, grid }),
        }
    }

    pub fn grid(&self, name: &str) -> Option<&Grid> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .map(|sheet| &sheet.grid)
    }

    pub fn grid_mut(&mut self, name: &str) -> Option<&mut Grid> {
        self.sheets
            .iter_mut()
            .find(|sheet| sheet.name == name)
            .map(|sheet| &mut sheet.grid)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }
}

/// Anything the reader can pull named sheets from.
pub trait SheetSource {
    type Grid: CellGrid;

    /// Sheet `name`, or `None` when the workbook has no such sheet.
    fn sheet(&mut self, name: &str) -> Result<Option<Self::Grid>, SheetError>;
}

impl SheetSource for Workbook {
    type Grid = Grid;

    fn sheet(&mut self, name: &str) -> Result<Option<Grid>, SheetError> {
        Ok(self.grid(name).cloned())
    }
}
