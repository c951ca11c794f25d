//! Error types for loading and summarizing the survey dataset.

use thiserror::Error;

/// Errors surfaced to the dashboard.
///
/// None of these is fatal at the process level: `DataUnavailable` stops the
/// dashboard from rendering data views, the others stop a single view.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// The dataset could not be fetched or parsed.
    #[error("dataset unavailable from {locator}: {reason}")]
    DataUnavailable {
        /// URL or path that was read.
        locator: String,
        /// Full cause chain.
        reason: String,
    },

    /// A view referenced columns that are absent after normalization.
    #[error("missing columns {missing:?} (expected {expected:?}, found {found:?})")]
    MissingColumns {
        expected: Vec<String>,
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// A numeric measure was requested from a column that holds no numbers.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },
}

pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// Build a `MissingColumns` error by checking the requested names against
    /// the columns a dataset actually has. `found` keeps the requested names
    /// that were present, in request order.
    pub fn missing_columns(expected: &[&str], available: &[String]) -> Self {
        let (found, missing): (Vec<&str>, Vec<&str>) = expected
            .iter()
            .copied()
            .partition(|name| available.iter().any(|a| a.as_str() == *name));
        DataError::MissingColumns {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            missing: missing.into_iter().map(String::from).collect(),
            found: found.into_iter().map(String::from).collect(),
        }
    }

    /// Short message for display in the UI.
    pub fn user_message(&self) -> String {
        match self {
            DataError::DataUnavailable { .. } => {
                "Could not load the dataset. Please check the URL and internet connection."
                    .to_string()
            }
            DataError::MissingColumns { missing, found, .. } => {
                format!("Missing columns {missing:?}! Found only: {found:?}")
            }
            DataError::NonNumericColumn { column } => {
                format!("Column '{column}' does not contain numbers.")
            }
        }
    }
}
