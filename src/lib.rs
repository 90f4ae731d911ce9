// Batch pipeline that builds a fictitious monthly sales history from one
// month of real store purchases and the IBGE IPCA inflation series, then
// renders it as a static dashboard.
pub mod accumulator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod etl;
pub mod fetch;
pub mod logging;
pub mod normalizer;
pub mod output;
pub mod pipeline;
pub mod scanner;
pub mod synthesizer;
pub mod types;
pub mod util;
pub mod workbook;

pub use config::Config;
pub use error::{PipelineError, Result};
