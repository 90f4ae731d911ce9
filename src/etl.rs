// Sales spreadsheet ETL.
//
// Loads every spreadsheet in a folder, maps its header onto the fixed sales
// columns and concatenates the complete rows. A file that cannot be read or
// lacks a column is logged and skipped; the others still go through.
use crate::error::{PipelineError, Result};
use crate::types::SalesRecord;
use crate::util::{format_int, non_blank, parse_quantity};
use crate::workbook::{Grid, SheetLoader};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// Columns every sales sheet must provide, after name normalization, in
/// output order.
pub const SALES_COLUMNS: [&str; 4] = ["uf", "id", "pet_shop", "compra_maio_2023_(kg)"];

/// `" Pet Shop "` → `"pet_shop"`.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Spreadsheets in `dir`, sorted by file name. Office lock files (`~$...`)
/// are left out.
pub fn list_spreadsheets(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lower = name.to_lowercase();
        if name.starts_with('~') || !(lower.ends_with(".xlsx") || lower.ends_with(".xls")) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Rows kept and rows dropped for one sheet.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub kept: usize,
    pub dropped: usize,
}

/// Map a header-first grid onto [`SalesRecord`]s.
///
/// Fails only when a required column is missing; incomplete rows are dropped.
pub fn clean_sales_grid(path: &Path, grid: &Grid) -> Result<(Vec<SalesRecord>, CleanReport)> {
    let header: Vec<String> = grid
        .first()
        .map(|row| {
            row.iter()
                .map(|c| c.as_deref().map(normalize_column_name).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();

    let mut idx = [0usize; SALES_COLUMNS.len()];
    for (slot, column) in idx.iter_mut().zip(SALES_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| PipelineError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })?;
    }

    let mut records = Vec::new();
    let mut report = CleanReport::default();
    for row in grid.iter().skip(1) {
        let get = |i: usize| non_blank(row.get(i).and_then(|c| c.as_deref()));
        let record = match (get(idx[0]), get(idx[1]), get(idx[2]), parse_quantity(get(idx[3]))) {
            (Some(uf), Some(id), Some(pet_shop), Some(base_quantity)) => SalesRecord {
                uf: uf.to_string(),
                id: id.to_string(),
                pet_shop: pet_shop.to_string(),
                base_quantity,
            },
            _ => {
                report.dropped += 1;
                continue;
            }
        };
        records.push(record);
        report.kept += 1;
    }
    Ok((records, report))
}

/// Run the ETL over `dir`. An empty result means nothing usable was found,
/// which the caller treats as "no output", not as an error.
pub fn run_etl<L: SheetLoader>(dir: &Path, loader: &L) -> Result<Vec<SalesRecord>> {
    let files = list_spreadsheets(dir)?;
    if files.is_empty() {
        warn!("no spreadsheets found in {}; skipping ETL", dir.display());
        return Ok(Vec::new());
    }

    let mut all = Vec::new();
    let mut processed = 0usize;
    for path in &files {
        info!("starting ETL for {}", path.display());
        let result = loader
            .load(path)
            .and_then(|grid| clean_sales_grid(path, &grid));
        match result {
            Ok((records, report)) => {
                info!(
                    "processed {}: {} rows kept, {} dropped as incomplete",
                    path.display(),
                    format_int(report.kept),
                    format_int(report.dropped)
                );
                all.extend(records);
                processed += 1;
            }
            Err(e) => error!("error processing {}: {}", path.display(), e),
        }
    }

    if processed == 0 {
        info!("no spreadsheet could be processed; nothing to write");
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn column_names_are_normalized() {
        assert_eq!(normalize_column_name(" Pet Shop "), "pet_shop");
        assert_eq!(
            normalize_column_name("Compra Maio 2023 (kg)"),
            "compra_maio_2023_(kg)"
        );
    }

    #[test]
    fn columns_are_selected_by_name_and_incomplete_rows_dropped() {
        let g = grid(&[
            &["ID", "Extra", "Pet Shop", "UF", "Compra Maio 2023 (kg)"],
            &["1", "x", "Bicho Feliz", "SP", "1200"],
            &["2", "y", "", "RJ", "300"],
            &["3", "z", "Au Au", "MG", "n/a"],
            &["4", "", "Miau", "PR", "87.5"],
        ]);
        let (records, report) = clean_sales_grid(Path::new("a.xlsx"), &g).unwrap();
        assert_eq!(report, CleanReport { kept: 2, dropped: 2 });
        assert_eq!(
            records[0],
            SalesRecord {
                uf: "SP".into(),
                id: "1".into(),
                pet_shop: "Bicho Feliz".into(),
                base_quantity: 1200.0,
            }
        );
        assert_eq!(records[1].pet_shop, "Miau");
    }

    #[test]
    fn missing_column_fails_the_file() {
        let g = grid(&[&["uf", "id", "pet_shop"], &["SP", "1", "Loja"]]);
        let err = clean_sales_grid(Path::new("b.xlsx"), &g).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { column, .. } if column == "compra_maio_2023_(kg)"));
    }

    #[test]
    fn only_spreadsheets_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.XLS", "~$a.xlsx", "notes.txt", "c.csv"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<String> = list_spreadsheets(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.XLS", "b.xlsx"]);
    }
}
