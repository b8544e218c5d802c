use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrismError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("model init error: {0}")]
    ModelInit(String),

    #[error("scoring error at row {row}: {message}")]
    Scoring { row: usize, message: String },

    #[error("parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    #[error("statistics error: {0}")]
    Statistics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plot error: {0}")]
    Plot(String),
}

impl PrismError {
    pub fn missing_path(flag: &str) -> Self {
        PrismError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no path given for {flag}"),
        ))
    }
}

pub type Result<T> = std::result::Result<T, PrismError>;
