use thiserror::Error;

/// Errors that can occur while decoding or encoding workbooks
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Unsupported file format: '{extension}'. Supported: xlsx, xls, csv")]
    UnsupportedFormat { extension: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
