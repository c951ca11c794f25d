use serde::Serialize;

use super::aggregate::{n_unique, require_columns, value_counts};
use crate::config::columns::{AGE, GENDER, OCCUPATION};
use crate::data::model::{Dataset, Value};
use crate::error::Result;

/// Headline numbers shown above the demographic tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyIndicators {
    /// Number of rows in the dataset.
    pub total_respondents: usize,
    pub average_age: f64,
    /// Percent of non-null gender values equal to `Male`.
    pub male_percent: f64,
    pub female_percent: f64,
    pub top_occupation: Option<Value>,
    pub unique_occupations: usize,
}

/// Compute the indicator panel from a dataset with normalized column names.
pub fn key_indicators(dataset: &Dataset) -> Result<KeyIndicators> {
    let idx = require_columns(dataset, &[AGE, GENDER, OCCUPATION])?;

    let ages = dataset.numeric_values(idx[0]);
    let average_age = if ages.is_empty() {
        f64::NAN
    } else {
        ages.iter().sum::<f64>() / ages.len() as f64
    };

    let genders = value_counts(dataset, GENDER)?;
    let percent_of = |label: &str| {
        genders
            .iter()
            .find(|vc| matches!(&vc.value, Value::Text(s) if s == label))
            .map_or(0.0, |vc| vc.share * 100.0)
    };

    let occupations = value_counts(dataset, OCCUPATION)?;

    Ok(KeyIndicators {
        total_respondents: dataset.len(),
        average_age,
        male_percent: percent_of("Male"),
        female_percent: percent_of("Female"),
        top_occupation: occupations.first().map(|vc| vc.value.clone()),
        unique_occupations: n_unique(dataset, OCCUPATION)?,
    })
}
