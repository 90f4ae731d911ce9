// Positional scan of the IPCA worksheet.
//
// The sheet has no header we can rely on: titles, notes and column captions
// are interleaved with the data. A block of monthly values starts at a row
// whose first cell is a four-digit year; the month rows follow it.
use crate::util::{is_year_token, non_blank};
use crate::workbook::Grid;
use log::debug;

/// Where the month rows of a year block live relative to the year marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLayout {
    /// Distance from the year row to the first month row.
    pub first_month_offset: usize,
    pub months_per_year: usize,
    pub month_column: usize,
    pub value_column: usize,
}

impl ScanLayout {
    /// The IBGE `ipca_*SerieHist.xls` layout: the year sits in column A of the
    /// January row, so a block is the year row plus the eleven rows below it.
    pub const IBGE_SERIE_HIST: ScanLayout = ScanLayout {
        first_month_offset: 0,
        months_per_year: 12,
        month_column: 1,
        value_column: 3,
    };
}

/// Year marker on its own row, months on the twelve rows below it.
impl Default for ScanLayout {
    fn default() -> Self {
        ScanLayout {
            first_month_offset: 1,
            months_per_year: 12,
            month_column: 1,
            value_column: 3,
        }
    }
}

/// A month row lifted out of the sheet, still as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMonthRow {
    pub year: i32,
    pub month_label: String,
    pub value: String,
}

fn cell(grid: &Grid, row: usize, col: usize) -> Option<&str> {
    grid.get(row)?.get(col)?.as_deref()
}

/// Lazily yields `(year, row_index)` for each year marker inside the interval.
pub struct YearBlocks<'a> {
    grid: &'a Grid,
    start_year: i32,
    end_year: i32,
    next_row: usize,
}

impl<'a> YearBlocks<'a> {
    /// The bounds may be given in either order.
    pub fn new(grid: &'a Grid, years: (i32, i32)) -> Self {
        YearBlocks {
            grid,
            start_year: years.0.min(years.1),
            end_year: years.0.max(years.1),
            next_row: 0,
        }
    }
}

impl Iterator for YearBlocks<'_> {
    type Item = (i32, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_row < self.grid.len() {
            let row = self.next_row;
            self.next_row += 1;

            let Some(text) = cell(self.grid, row, 0).map(str::trim) else {
                continue;
            };
            if !is_year_token(text) {
                continue;
            }
            let Ok(year) = text.parse::<i32>() else {
                continue;
            };
            debug!("found year {} at row {}", year, row);
            if (self.start_year..=self.end_year).contains(&year) {
                return Some((year, row));
            }
        }
        None
    }
}

/// Month rows belonging to the year marker at `year_row`.
///
/// Rows past the end of the grid are simply not there; rows with a blank
/// month label or a blank value are skipped.
pub fn month_rows<'a>(
    grid: &'a Grid,
    year: i32,
    year_row: usize,
    layout: ScanLayout,
) -> impl Iterator<Item = RawMonthRow> + 'a {
    let first = year_row + layout.first_month_offset;
    let last = (first + layout.months_per_year).min(grid.len());
    (first..last).filter_map(move |row| {
        let month = non_blank(cell(grid, row, layout.month_column))?;
        let value = non_blank(cell(grid, row, layout.value_column))?;
        Some(RawMonthRow {
            year,
            month_label: month.to_string(),
            value: value.to_string(),
        })
    })
}

/// Every month row of every year block in `years`, in sheet order.
pub fn scan(grid: &Grid, years: (i32, i32), layout: ScanLayout) -> Vec<RawMonthRow> {
    YearBlocks::new(grid, years)
        .flat_map(|(year, row)| month_rows(grid, year, row, layout))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::MONTH_LABELS;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    fn year_block(year: &str) -> Vec<Vec<Option<String>>> {
        let mut rows = vec![row(&[year])];
        for (i, label) in MONTH_LABELS.into_iter().enumerate() {
            rows.push(row(&["", label, "", format!("0,{}", i + 10).as_str()]));
        }
        rows
    }

    #[test]
    fn twelve_months_after_a_year_marker() {
        let mut grid: Grid = (0..10).map(|i| row(&[format!("title {i}").as_str()])).collect();
        grid.extend(year_block("2021"));
        grid.push(row(&["Fonte: IBGE"]));

        let blocks: Vec<_> = YearBlocks::new(&grid, (2020, 2024)).collect();
        assert_eq!(blocks, vec![(2021, 10)]);

        let rows = scan(&grid, (2020, 2024), ScanLayout::default());
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].month_label, "JAN");
        assert_eq!(rows[0].value, "0,10");
        assert_eq!(rows[11].month_label, "DEZ");
        assert!(rows.iter().all(|r| r.year == 2021));
    }

    #[test]
    fn years_outside_the_interval_are_ignored() {
        let mut grid = year_block("2019");
        grid.extend(year_block("2020"));
        grid.extend(year_block("2025"));
        let rows = scan(&grid, (2024, 2020), ScanLayout::default());
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.year == 2020));
    }

    #[test]
    fn truncated_block_yields_available_rows() {
        let mut grid = year_block("2022");
        grid.truncate(1 + 4);
        let rows = scan(&grid, (2020, 2024), ScanLayout::default());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].month_label, "ABR");
    }

    #[test]
    fn blank_month_or_value_rows_are_dropped() {
        let mut grid = year_block("2023");
        grid[2][3] = None;
        grid[5][1] = Some("   ".to_string());
        let rows = scan(&grid, (2023, 2023), ScanLayout::default());
        assert_eq!(rows.len(), 10);
        assert!(rows.iter().all(|r| r.month_label != "FEV"));
    }

    #[test]
    fn ibge_layout_reads_january_from_the_year_row() {
        let mut grid = Vec::new();
        for year in ["2022", "2023"] {
            for (i, label) in MONTH_LABELS.into_iter().enumerate() {
                let first = if i == 0 { year } else { "" };
                grid.push(row(&[first, label, "", format!("0,{}", i + 10).as_str()]));
            }
        }
        let rows = scan(&grid, (2022, 2022), ScanLayout::IBGE_SERIE_HIST);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].month_label, "JAN");
        assert_eq!(rows[11].month_label, "DEZ");
        assert!(rows.iter().all(|r| r.year == 2022));

        // The default layout would start a month late on this sheet.
        let shifted = scan(&grid, (2022, 2022), ScanLayout::default());
        assert_eq!(shifted[0].month_label, "FEV");
        assert_eq!(shifted[11].month_label, "JAN");
    }

    #[test]
    fn non_year_tokens_do_not_start_blocks() {
        let grid: Grid = vec![
            row(&["20215"]),
            row(&["202"]),
            row(&["2O21"]),
            row(&["", "JAN", "", "1"]),
        ];
        assert_eq!(YearBlocks::new(&grid, (0, 9999)).count(), 0);
    }
}
