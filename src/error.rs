use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No worksheet found in '{}'", .0.display())]
    NoWorksheet(PathBuf),

    #[error("Row {row} has {width} columns but column {required} is required")]
    ShortRow {
        row: usize,
        width: usize,
        required: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, RosterError>;
