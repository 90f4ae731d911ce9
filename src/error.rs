use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a pipeline step.
///
/// The variants only exist so log lines say what went wrong; the orchestrator
/// treats all of them the same way (log, abort the step, return no result).
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("could not read workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook {0} has no worksheet")]
    EmptyWorkbook(PathBuf),
    #[error("download failed: {0}")]
    Download(#[from] Box<ureq::Error>),
    #[error("invalid ZIP archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("{0}")]
    NotFound(String),
    #[error("missing column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("chart serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
