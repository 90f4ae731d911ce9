use crate::scanner::ScanLayout;
use crate::types::Period;
use std::env;
use std::path::PathBuf;

pub const IPCA_ZIP_URL: &str =
    "https://ftp.ibge.gov.br/Precos_Indices_de_Precos_ao_Consumidor/IPCA/Serie_Historica/ipca_SerieHist.zip";

/// Every knob of a run. The defaults are the production values; a handful of
/// paths can be overridden from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder with the sales spreadsheets.
    pub raw_dir: PathBuf,
    /// Folder for every generated artifact.
    pub docs_dir: PathBuf,
    pub ipca_url: String,
    /// Glob (file name only) of the workbook inside the IPCA archive.
    pub ipca_workbook_pattern: String,
    /// Closed year interval kept from the IPCA sheet.
    pub years: (i32, i32),
    /// Defaults to month rows below the year row. The published IBGE workbook
    /// puts the year on the January row; use `ScanLayout::IBGE_SERIE_HIST`
    /// for it.
    pub scan_layout: ScanLayout,
    /// The month the sales spreadsheets describe.
    pub base_period: Period,
    pub inflation_file: String,
    pub base_data_file: String,
    pub mock_sales_file: String,
    pub dashboard_file: String,
    pub log_file: PathBuf,
    pub top_months: usize,
    pub top_stores: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            raw_dir: PathBuf::from("data/raw"),
            docs_dir: PathBuf::from("data/docs"),
            ipca_url: IPCA_ZIP_URL.to_string(),
            ipca_workbook_pattern: "ipca_*.xls".to_string(),
            years: (2020, 2024),
            scan_layout: ScanLayout::default(),
            base_period: Period::new(2023, 5).expect("2023-05 is a calendar month"),
            inflation_file: "inflacao_2020_2024.csv".to_string(),
            base_data_file: "dados.csv".to_string(),
            mock_sales_file: "vendas_ficticias.csv".to_string(),
            dashboard_file: "index.html".to_string(),
            log_file: PathBuf::from("file.log"),
            top_months: 5,
            top_stores: 3,
        }
    }
}

impl Config {
    /// Defaults, with `SALES_DASHBOARD_{RAW_DIR,DOCS_DIR,IPCA_URL,LOG_FILE}`
    /// applied when set.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(v) = env::var("SALES_DASHBOARD_RAW_DIR") {
            config.raw_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SALES_DASHBOARD_DOCS_DIR") {
            config.docs_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SALES_DASHBOARD_IPCA_URL") {
            config.ipca_url = v;
        }
        if let Ok(v) = env::var("SALES_DASHBOARD_LOG_FILE") {
            config.log_file = PathBuf::from(v);
        }
        config
    }

    pub fn inflation_path(&self) -> PathBuf {
        self.docs_dir.join(&self.inflation_file)
    }

    pub fn base_data_path(&self) -> PathBuf {
        self.docs_dir.join(&self.base_data_file)
    }

    pub fn mock_sales_path(&self) -> PathBuf {
        self.docs_dir.join(&self.mock_sales_file)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.docs_dir.join(&self.dashboard_file)
    }
}

/// `"vendas_ficticias.csv"` → `"vendas_ficticias*.csv"`: matches the file and
/// any suffixed variant of it.
pub fn existence_pattern(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}*.{}", stem, ext),
        None => format!("{}*", file_name),
    }
}
