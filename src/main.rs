// Entry point.
//
// Prepares the data folders, runs the pipeline steps in order and, when a
// sales history is available, renders the dashboard. There are no flags; see
// `Config::from_env` for the few overridable paths.
use log::{error, info};
use sales_dashboard::workbook::WorkbookLoader;
use sales_dashboard::{logging, pipeline, Config};
use std::path::Path;
use std::process::ExitCode;

fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("created folder {}", dir.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let config = Config::from_env();
    logging::init(&config.log_file);

    for dir in [&config.raw_dir, &config.docs_dir] {
        if let Err(e) = ensure_dir(dir) {
            error!("could not create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let Some(mock_sales) = pipeline::run(&config, &WorkbookLoader) else {
        info!("could not produce the sales data");
        return ExitCode::FAILURE;
    };

    info!("--- sales data located ---");
    match pipeline::generate_dashboard(&config, &mock_sales) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("dashboard generation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
