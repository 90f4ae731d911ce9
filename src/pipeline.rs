// Step orchestration.
//
// Each step writes one artifact into the docs folder and is skipped when a
// file matching that artifact's name is already there. Only this module looks
// at the filesystem to make that decision; the steps themselves always
// recompute.
use crate::config::{existence_pattern, Config};
use crate::dashboard;
use crate::error::Result;
use crate::etl::run_etl;
use crate::fetch::fetch_workbook;
use crate::normalizer::{from_inflation_rows, normalize};
use crate::output::{preview_table, read_csv, write_csv, write_html};
use crate::scanner::scan;
use crate::synthesizer::synthesize;
use crate::types::{InflationRow, MockSalesRow, ReconstructedRecord, SalesRecord};
use crate::util::format_int;
use crate::workbook::{read_first_sheet, Grid, SheetLoader};
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// First file directly inside `dir` whose name matches `pattern`.
pub fn find_existing(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let mut found: Vec<PathBuf> = glob::glob(&full)?.filter_map(|e| e.ok()).collect();
    found.sort();
    Ok(found.into_iter().next())
}

/// Monthly rates for `config.years` found in a header-less sheet.
pub fn inflation_rows(config: &Config, grid: &Grid) -> Vec<InflationRow> {
    let series = normalize(&scan(grid, config.years, config.scan_layout));
    info!("{} monthly rates extracted", format_int(series.len()));
    series.iter().map(InflationRow::from).collect()
}

/// Scan an IPCA workbook and write the monthly rates for `config.years`.
pub fn extract_inflation(config: &Config, workbook: &Path) -> Result<usize> {
    info!("processing {}", workbook.display());
    let grid = read_first_sheet(workbook)?;
    info!("read {} raw rows", format_int(grid.len()));
    write_inflation(config, &grid)
}

/// Write the inflation CSV from an already-loaded sheet.
pub fn write_inflation(config: &Config, grid: &Grid) -> Result<usize> {
    let rows = inflation_rows(config, grid);
    write_csv(&config.inflation_path(), &rows)?;
    info!(
        "rates for {}..={} exported to {}",
        config.years.0,
        config.years.1,
        config.inflation_path().display()
    );
    Ok(rows.len())
}

/// Step 1: inflation CSV. Reuses a workbook already in the docs folder,
/// otherwise downloads it.
pub fn process_inflation(config: &Config) -> Result<PathBuf> {
    let out = config.inflation_path();
    if let Some(existing) = find_existing(&config.docs_dir, &existence_pattern(&config.inflation_file))? {
        info!("{} already exists; skipping inflation step", existing.display());
        return Ok(existing);
    }

    let workbook = match find_existing(&config.docs_dir, &config.ipca_workbook_pattern)? {
        Some(local) => {
            info!("found workbook {}; skipping download", local.display());
            local
        }
        None => fetch_workbook(&config.ipca_url, &config.docs_dir, &config.ipca_workbook_pattern)?,
    };
    extract_inflation(config, &workbook)?;
    Ok(out)
}

/// Step 2: combined base-period sales table. `None` when no spreadsheet
/// produced any row.
pub fn process_sales<L: SheetLoader>(config: &Config, loader: &L) -> Result<Option<PathBuf>> {
    if let Some(existing) = find_existing(&config.docs_dir, &existence_pattern(&config.base_data_file))? {
        info!("{} already exists; skipping sales ETL", existing.display());
        return Ok(Some(existing));
    }
    let records = run_etl(&config.raw_dir, loader)?;
    if records.is_empty() {
        info!("no sales rows to write");
        return Ok(None);
    }
    let out = config.base_data_path();
    write_csv(&out, &records)?;
    Ok(Some(out))
}

/// Step 3: fictitious sales history from the two previous artifacts.
pub fn generate_mock_sales(config: &Config, inflation: &Path, base_data: &Path) -> Result<PathBuf> {
    let rates: Vec<InflationRow> = read_csv(inflation)?;
    info!("loaded inflation table {}", inflation.display());
    let stores: Vec<SalesRecord> = read_csv(base_data)?;
    info!("loaded base data {}", base_data.display());

    let series = from_inflation_rows(&rates);
    let records = synthesize(&series, config.base_period, &stores);
    info!(
        "synthesized {} rows for {} stores",
        format_int(records.len()),
        format_int(stores.len())
    );

    let rows: Vec<MockSalesRow> = records.iter().map(MockSalesRow::from).collect();
    let out = config.mock_sales_path();
    write_csv(&out, &rows)?;
    Ok(out)
}

/// Run every step. Returns the mock sales CSV, or `None` if a step failed
/// (the failure has been logged).
pub fn run<L: SheetLoader>(config: &Config, loader: &L) -> Option<PathBuf> {
    match find_existing(&config.docs_dir, &existence_pattern(&config.mock_sales_file)) {
        Ok(Some(existing)) => {
            info!("sales file {} already exists", existing.display());
            return Some(existing);
        }
        Ok(None) => {}
        Err(e) => {
            error!("could not check for existing sales file: {}", e);
            return None;
        }
    }

    info!("--- step 1: IPCA inflation data ---");
    let inflation = match process_inflation(config) {
        Ok(path) => path,
        Err(e) => {
            error!("inflation step failed: {}", e);
            return None;
        }
    };

    info!("--- step 2: sales spreadsheet ETL ---");
    let base_data = match process_sales(config, loader) {
        Ok(Some(path)) => path,
        Ok(None) => {
            warn!("no base sales data available");
            return None;
        }
        Err(e) => {
            error!("sales ETL step failed: {}", e);
            return None;
        }
    };

    info!("--- step 3: fictitious sales history ---");
    match generate_mock_sales(config, &inflation, &base_data) {
        Ok(path) => Some(path),
        Err(e) => {
            error!("mock sales step failed: {}", e);
            None
        }
    }
}

/// Load the mock sales CSV back into records; rows with an unknown month
/// label are skipped.
pub fn load_mock_sales(path: &Path) -> Result<Vec<ReconstructedRecord>> {
    let rows: Vec<MockSalesRow> = read_csv(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        match row.to_record() {
            Some(r) => records.push(r),
            None => warn!("skipping row with unknown month '{}' {}", row.mes, row.ano),
        }
    }
    Ok(records)
}

/// Build the dashboard page in the docs folder.
pub fn generate_dashboard(config: &Config, mock_sales: &Path) -> Result<PathBuf> {
    let records = load_mock_sales(mock_sales)?;
    info!("loaded {} sales rows from {}", format_int(records.len()), mock_sales.display());

    let months = dashboard::top_months(&records, config.top_months);
    let stores = dashboard::top_stores(&records, config.top_stores);
    preview_table("Top months by sales volume", &months, config.top_months);
    preview_table("Top pet shops by sales volume", &stores, config.top_stores);

    let html = dashboard::render_page(&months, &stores)?;
    let out = config.dashboard_path();
    write_html(&out, &html)?;
    info!("dashboard written to {}", out.display());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn existing_artifacts_are_found_by_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_existing(dir.path(), "vendas_ficticias*.csv").unwrap(), None);
        fs::write(dir.path().join("vendas_ficticias_old.csv"), b"").unwrap();
        let found = find_existing(dir.path(), "vendas_ficticias*.csv").unwrap();
        assert_eq!(found, Some(dir.path().join("vendas_ficticias_old.csv")));
    }

    #[test]
    fn directory_names_with_glob_characters_are_escaped() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("data [v1]");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("dados.csv"), b"").unwrap();
        assert_eq!(find_existing(&dir, "dados*.csv").unwrap(), Some(dir.join("dados.csv")));
    }

    fn sheet(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn inflation_csv_is_written_from_a_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            docs_dir: dir.path().to_path_buf(),
            years: (2023, 2023),
            ..Config::default()
        };
        let grid = sheet(&[
            &["Série histórica do IPCA"],
            &["2022"],
            &["", "DEZ", "", "0,62"],
            &["2023"],
            &["", "MAI", "", "0,23"],
            &["", "JUN", "", "-"],
            &["", "jul", "", "0,12"],
            &["Fonte: IBGE"],
        ]);

        assert_eq!(write_inflation(&config, &grid).unwrap(), 3);

        let text = fs::read_to_string(config.inflation_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ANO,MES,INFLACAO_NO_MES",
                "2023,MAI,0.23",
                "2023,JUN,",
                "2023,JUL,0.12",
            ]
        );

        let back: Vec<InflationRow> = read_csv(&config.inflation_path()).unwrap();
        let series = from_inflation_rows(&back);
        assert_eq!(series.len(), 3);
        assert_eq!(series[1].rate, None);
        assert_eq!(series[2].rate, Some(0.12));
    }

    #[test]
    fn dashboard_lands_at_the_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            docs_dir: dir.path().join("docs"),
            ..Config::default()
        };
        fs::create_dir_all(&config.docs_dir).unwrap();
        let csv = dir.path().join("elsewhere.csv");
        fs::write(
            &csv,
            "ano,mes,uf,id,pet_shop,volume_vendas_(kg)\n2023,MAI,SP,1,Miau,10\n",
        )
        .unwrap();
        let out = generate_dashboard(&config, &csv).unwrap();
        assert_eq!(out, config.dashboard_path());
        assert!(fs::read_to_string(out).unwrap().contains("Miau"));
    }

    #[test]
    fn inflation_step_is_skipped_when_output_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            docs_dir: dir.path().to_path_buf(),
            ipca_url: "http://127.0.0.1:9/unreachable.zip".into(),
            ..Config::default()
        };
        fs::write(config.inflation_path(), "ANO,MES,INFLACAO_NO_MES\n").unwrap();
        assert_eq!(process_inflation(&config).unwrap(), config.inflation_path());
    }
}
