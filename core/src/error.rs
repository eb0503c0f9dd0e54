use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Invalid value {value:?} in column '{column}' at line {line}: {reason}")]
    InvalidField {
        line: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported audit window: {days} days (expected 7, 30 or 90)")]
    InvalidWindow { days: u32 },

    #[error("Invalid cost per unit: {value} (must be a finite, non-negative amount)")]
    InvalidCostPerUnit { value: f64 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AuditResult<T> = Result<T, AuditError>;
