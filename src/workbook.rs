// Spreadsheet access.
//
// Both .xls (the IBGE workbook) and .xlsx (the sales sheets) go through
// calamine's auto-detecting reader. Only the first worksheet is ever read, and
// every cell is reduced to its display text so the scanner and the ETL step
// work on one plain representation.
use crate::error::{PipelineError, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// Rows of cells; `None` marks an empty cell.
pub type Grid = Vec<Vec<Option<String>>>;

/// Display text of a cell. Whole floats print without a fraction
/// (`2021.0` → `"2021"`), which is what the year scan relies on.
pub fn cell_text(data: &Data) -> Option<String> {
    match data {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{}", *f as i64)),
        other => Some(other.to_string()),
    }
}

pub fn range_to_grid(range: &Range<Data>) -> Grid {
    range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

/// Read the first worksheet of `path` into a grid.
pub fn read_first_sheet(path: &Path) -> Result<Grid> {
    let wrap = |source| PipelineError::Workbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(wrap)?;
    let Some(name) = workbook.sheet_names().first().cloned() else {
        return Err(PipelineError::EmptyWorkbook(path.to_path_buf()));
    };
    let range = workbook.worksheet_range(&name).map_err(wrap)?;
    Ok(range_to_grid(&range))
}

/// Source of header-first grids for the ETL step.
///
/// Production code reads workbooks from disk; tests hand in grids directly.
pub trait SheetLoader {
    fn load(&self, path: &Path) -> Result<Grid>;
}

/// [`SheetLoader`] backed by calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct WorkbookLoader;

impl SheetLoader for WorkbookLoader {
    fn load(&self, path: &Path) -> Result<Grid> {
        read_first_sheet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cells_become_display_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String("  ".into())), None);
        assert_eq!(cell_text(&Data::Float(2021.0)), Some("2021".into()));
        assert_eq!(cell_text(&Data::Float(0.42)), Some("0.42".into()));
        assert_eq!(cell_text(&Data::Int(7)), Some("7".into()));
        assert_eq!(cell_text(&Data::String("MAI".into())), Some("MAI".into()));
    }

    #[test]
    fn range_keeps_row_and_column_positions() {
        let mut range: Range<Data> = Range::new((0, 0), (1, 3));
        range.set_value((0, 0), Data::Float(2023.0));
        range.set_value((1, 1), Data::String("JAN".into()));
        range.set_value((1, 3), Data::String("0,53".into()));
        let grid = range_to_grid(&range);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0].as_deref(), Some("2023"));
        assert_eq!(grid[0][1], None);
        assert_eq!(grid[1][1].as_deref(), Some("JAN"));
        assert_eq!(grid[1][3].as_deref(), Some("0,53"));
    }

    #[test]
    fn garbage_file_is_a_workbook_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"definitely not a spreadsheet").unwrap();
        let err = read_first_sheet(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Workbook { .. }));
    }
}
