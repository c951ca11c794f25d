use serde::Serialize;

use crate::data::model::{Dataset, ScalarType};

/// count / mean / std / min / quartiles / max of one numeric column.
///
/// Undefined statistics are NaN: an empty column has NaN everywhere, a
/// single value has NaN `std`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Non-null values.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summaries for every column whose inferred type satisfies `select`, in
/// dataset column order.
pub fn describe(dataset: &Dataset, select: impl Fn(ScalarType) -> bool) -> Vec<ColumnSummary> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(idx, _)| select(dataset.column_type(*idx)))
        .map(|(idx, name)| summarize_values(name, &dataset.numeric_values(idx)))
        .collect()
}

/// Summaries for the integer and float columns.
pub fn describe_numeric(dataset: &Dataset) -> Vec<ColumnSummary> {
    describe(dataset, ScalarType::is_numeric)
}

/// Summarize a slice of non-null values.
pub fn summarize_values(name: &str, values: &[f64]) -> ColumnSummary {
    let count = values.len();
    if count == 0 {
        return ColumnSummary {
            name: name.to_string(),
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    ColumnSummary {
        name: name.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Quantile with linear interpolation between the closest ranks.
/// `sorted` must be ascending and non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    (sorted[lo] + (sorted[hi] - sorted[lo]) * frac).clamp(sorted[lo], sorted[hi])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn basic_stats() {
        let s = summarize_values("age", &[30.0, 35.0, 40.0, 45.0, 50.0]);
        assert_eq!(s.count, 5);
        assert!(close(s.mean, 40.0));
        assert!(close(s.std, 62.5_f64.sqrt()));
        assert!(close(s.min, 30.0));
        assert!(close(s.q25, 35.0));
        assert!(close(s.median, 40.0));
        assert!(close(s.q75, 45.0));
        assert!(close(s.max, 50.0));
    }

    #[test]
    fn quartiles_interpolate() {
        let s = summarize_values("x", &[4.0, 1.0, 3.0, 2.0]);
        assert!(close(s.q25, 1.75));
        assert!(close(s.median, 2.5));
        assert!(close(s.q75, 3.25));
    }

    #[test]
    fn single_value_has_nan_std() {
        let s = summarize_values("x", &[7.0]);
        assert_eq!(s.count, 1);
        assert!(s.std.is_nan());
        assert!(close(s.min, 7.0));
        assert!(close(s.max, 7.0));
    }

    #[test]
    fn empty_column_is_all_nan() {
        let s = summarize_values("x", &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan() && s.min.is_nan() && s.max.is_nan());
    }

    #[test]
    fn describe_selects_numeric_columns() {
        let ds = Dataset::new(
            vec!["gender".into(), "age".into(), "sleep duration".into()],
            vec![
                vec![Value::from("Male"), Value::Integer(30), Value::Float(6.1)],
                vec![Value::from("Female"), Value::Integer(40), Value::Null],
            ],
        )
        .unwrap();
        let summaries = describe_numeric(&ds);
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["age", "sleep duration"]);
        assert_eq!(summaries[1].count, 1);
        assert_eq!(ds.len(), 2);
    }

    proptest! {
        #[test]
        fn quartiles_are_bounded(values in prop::collection::vec(-1.0e6f64..1.0e6, 2..64)) {
            let s = summarize_values("x", &values);
            prop_assert!(s.min <= s.q25);
            prop_assert!(s.q25 <= s.median);
            prop_assert!(s.median <= s.q75);
            prop_assert!(s.q75 <= s.max);
        }
    }
}
