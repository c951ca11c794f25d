use std::time::Duration;

use crate::data::loader::DataSource;
use crate::summary::aggregate::AgeBuckets;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Published location of the cleaned survey CSV.
pub const DATA_URL: &str = "https://raw.githubusercontent.com/KhadijahRijal/SleepHealthandLifestyle/refs/heads/main/cleaned_sleep_health_data.csv";

/// Upper bound on the remote fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Normalized names of the survey columns the dashboard reads.
pub mod columns {
    pub const GENDER: &str = "gender";
    pub const AGE: &str = "age";
    pub const OCCUPATION: &str = "occupation";
    pub const SLEEP_DURATION: &str = "sleep duration";
    pub const QUALITY_OF_SLEEP: &str = "quality of sleep";
    pub const PHYSICAL_ACTIVITY: &str = "physical activity level";
    pub const BMI_CATEGORY: &str = "bmi category";
    pub const SLEEP_DISORDER: &str = "sleep disorder";
    pub const SYSTOLIC: &str = "systolic";
    pub const DIASTOLIC: &str = "diastolic";
    /// Derived from `AGE` by bucketing.
    pub const AGE_GROUP: &str = "age group";
}

/// Columns of the quality-of-sleep vs. blood-pressure correlation view
/// (normalized names).
pub const CORRELATION_COLUMNS: [&str; 3] = [
    columns::QUALITY_OF_SLEEP,
    columns::SYSTOLIC,
    columns::DIASTOLIC,
];

/// Everything the dashboard needs that is not derived from the data.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Where the dataset is read from on startup.
    pub source: DataSource,
    /// Timeout applied to remote fetches.
    pub fetch_timeout: Duration,
    /// Bucketing of the age column for the age-group views.
    pub age_buckets: AgeBuckets,
    /// Columns fed to the correlation matrix.
    pub correlation_columns: Vec<String>,
    /// Bin count of the age histograms.
    pub histogram_bins: usize,
    /// Rows shown in the raw dataset table.
    pub table_row_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Url(DATA_URL.to_string()),
            fetch_timeout: FETCH_TIMEOUT,
            age_buckets: AgeBuckets::default(),
            correlation_columns: CORRELATION_COLUMNS.iter().map(|s| s.to_string()).collect(),
            histogram_bins: 20,
            table_row_limit: 500,
        }
    }
}

impl DashboardConfig {
    pub fn correlation_columns(&self) -> Vec<&str> {
        self.correlation_columns.iter().map(String::as_str).collect()
    }
}
