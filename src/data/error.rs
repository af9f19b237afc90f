use thiserror::Error;

/// Fatal problems with the input file. Any of these aborts startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("Input is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Row {row}: transaction_amount '{value}' is not a number")]
    InvalidAmount { row: usize, value: String },

    #[error("Row {row}: transaction_amount has unsupported type {data_type}")]
    UnsupportedAmountType { row: usize, data_type: String },

    #[error("Row {row} is not a JSON object")]
    NotARecord { row: usize },
}
