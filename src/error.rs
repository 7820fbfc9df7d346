use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error on row {row}: '{value}'")]
    DateParse { row: usize, value: String },

    #[error("Invalid coordinate on row {row}, column '{column}': '{value}'")]
    InvalidCoordinate {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote insert rejected with status {status}: {body}")]
    RemoteInsert { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
