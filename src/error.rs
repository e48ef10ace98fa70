use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Upload rejected: {0}")]
    Parse(String),

    #[error("Upload rejected: missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Upload rejected: line {line}, column '{column}': cannot read '{value}' as {expected}")]
    InvalidCell {
        line: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid date selection: {0}")]
    InvalidSelection(String),

    #[error("Dimension '{dimension}' does not apply to {kind} records")]
    UnsupportedDimension { dimension: String, kind: String },

    #[error("Column '{column}' does not exist in {kind} records")]
    UnknownColumn { column: String, kind: String },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl DashboardError {
    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        DashboardError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Fetch failures can be retried by re-issuing the selection; everything
    /// else needs different input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DashboardError::Fetch { .. })
    }

    /// True for the errors that reject a CSV upload as a whole.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Parse(_)
                | DashboardError::MissingColumns(_)
                | DashboardError::InvalidCell { .. }
                | DashboardError::Csv(_)
        )
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        DashboardError::fetch(url, err)
    }
}
