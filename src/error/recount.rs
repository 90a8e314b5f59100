use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RecountError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
