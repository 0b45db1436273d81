/// Error types for the forecast pipeline
use thiserror::Error;

/// Coarse classification of a [`ForecastError`], used by callers that only
/// need to branch on the failure category.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ErrorKind {
    InvalidDate,
    RemoteFetch,
    AnchorNotFound,
    ExportRender,
}

/// Main error type for forecast operations.
///
/// Variants carry rendered messages rather than source errors so the value
/// can be cloned into navigation state snapshots.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Malformed date input, or a date the prediction service rejected as
    /// outside its supported range
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Any network, status or decode failure from the prediction service
    #[error("Prediction service request failed ({endpoint}): {reason}")]
    RemoteFetch { endpoint: String, reason: String },

    /// The anchor key is missing from the records fetched for its own window
    #[error("Anchor {0} not present in fetched window")]
    AnchorNotFound(String),

    /// A visual surface could not be rasterized for export
    #[error("Failed to render '{label}' for export: {reason}")]
    ExportRender { label: String, reason: String },
}

impl ForecastError {
    pub fn remote(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        ForecastError::RemoteFetch {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn export(label: impl Into<String>, reason: impl ToString) -> Self {
        ForecastError::ExportRender {
            label: label.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::InvalidDate(_) => ErrorKind::InvalidDate,
            ForecastError::RemoteFetch { .. } => ErrorKind::RemoteFetch,
            ForecastError::AnchorNotFound(_) => ErrorKind::AnchorNotFound,
            ForecastError::ExportRender { .. } => ErrorKind::ExportRender,
        }
    }

    /// Collapse a per-request failure into the whole-batch failure.
    pub fn into_batch_failure(self, endpoint: &str) -> Self {
        match self {
            remote @ ForecastError::RemoteFetch { .. } => remote,
            other => ForecastError::remote(endpoint, other),
        }
    }

    /// The single line shown to the user in place of the data panels.
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::InvalidDate(detail) if !detail.is_empty() => detail.clone(),
            ForecastError::InvalidDate(_) => {
                "The target date must be within 1 year before and 3 months after today."
                    .to_string()
            }
            ForecastError::RemoteFetch { .. } => {
                "Error fetching forecast data. Please try again.".to_string()
            }
            ForecastError::AnchorNotFound(_) => {
                "Something went wrong while preparing the charts.".to_string()
            }
            ForecastError::ExportRender { label, .. } => {
                format!("Could not export '{}': the chart is not ready yet.", label)
            }
        }
    }
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
