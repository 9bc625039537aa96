use thiserror::Error;

#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LeaseError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LeaseError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LeaseError {
    fn from(e: serde_json::Error) -> Self {
        LeaseError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "records")]
impl From<csv::Error> for LeaseError {
    fn from(e: csv::Error) -> Self {
        LeaseError::SerializationError(e.to_string())
    }
}
