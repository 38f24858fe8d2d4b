use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid month name '{0}': expected a Spanish month name such as 'enero'")]
    InvalidMonth(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Grouping field '{0}' does not exist")]
    UnknownField(String),

    #[error("Invalid value '{value}' in column '{column}' on line {line}")]
    InvalidValue {
        column: String,
        line: usize,
        value: String,
    },

    #[error("Year {0} cannot be represented on the calendar")]
    InvalidYear(i32),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalyticsError {
    /// True when the caller sent a bad parameter, false when the dataset
    /// itself (or the environment) is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InvalidMonth(_)
                | AnalyticsError::UnknownField(_)
                | AnalyticsError::InvalidYear(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
