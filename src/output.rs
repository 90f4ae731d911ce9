use crate::error::Result;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// Write `rows` as CSV with a header. Failures are logged here and returned
/// to the caller, which aborts the step.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let result = (|| -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for r in rows {
            wtr.serialize(r)?;
        }
        wtr.flush()?;
        Ok(())
    })();
    match &result {
        Ok(()) => info!("wrote {} rows to {}", rows.len(), path.display()),
        Err(e) => error!("could not write {}: {}", path.display(), e),
    }
    result
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

pub fn write_html(path: &Path, html: &str) -> Result<()> {
    std::fs::write(path, html).inspect_err(|e| error!("could not write {}: {}", path.display(), e))?;
    Ok(())
}

/// Print up to `max_rows` rows as a markdown table.
pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
