use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayrunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported journal type: {0}")]
    UnsupportedJournalType(String),

    #[error("Missing column '{column}' in {file} (columns found: {found})")]
    MissingColumn {
        file: String,
        column: String,
        found: String,
    },

    #[error("Unknown month: {0}")]
    UnknownMonth(String),

    #[error("Journal type '{0}' requires --total")]
    MissingTotal(String),

    #[error("Zero driver total: {0}")]
    ZeroDriverTotal(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PayrunError>;
