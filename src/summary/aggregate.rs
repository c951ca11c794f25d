use std::collections::BTreeMap;

use serde::Serialize;

use super::describe::{summarize_values, ColumnSummary};
use crate::data::model::{Dataset, Value};
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Resolve column names to indices, failing with every missing name at once.
pub fn require_columns(dataset: &Dataset, names: &[&str]) -> Result<Vec<usize>> {
    let indices: Option<Vec<usize>> = names.iter().map(|n| dataset.column_index(n)).collect();
    indices.ok_or_else(|| DataError::missing_columns(names, dataset.columns()))
}

fn require_numeric(dataset: &Dataset, name: &str) -> Result<usize> {
    let idx = require_columns(dataset, &[name])?[0];
    if dataset.column_type(idx).is_numeric() {
        Ok(idx)
    } else {
        Err(DataError::NonNumericColumn {
            column: name.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Category mean
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub key: Value,
    pub mean: f64,
    /// Rows that contributed to the mean.
    pub count: usize,
}

/// Mean of `measure` per distinct value of `group`, ordered by group key.
///
/// Rows with a null key or a null measure are skipped.
pub fn category_mean(dataset: &Dataset, group: &str, measure: &str) -> Result<Vec<CategoryMean>> {
    let g = require_columns(dataset, &[group])?[0];
    let m = require_numeric(dataset, measure)?;

    let mut acc: BTreeMap<&Value, (f64, usize)> = BTreeMap::new();
    for row in dataset.rows() {
        let key = &row[g];
        let Some(value) = row[m].as_f64() else {
            continue;
        };
        if key.is_null() {
            continue;
        }
        let entry = acc.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    Ok(acc
        .into_iter()
        .map(|(key, (sum, count))| CategoryMean {
            key: key.clone(),
            mean: sum / count as f64,
            count,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

/// Fixed-width, left-inclusive / right-exclusive buckets starting at `start`.
///
/// The default covers ages 20 to 59 in decades: `20-29`, `30-39`, `40-49`,
/// `50-59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBuckets {
    pub start: i64,
    pub width: i64,
    pub count: usize,
}

impl Default for AgeBuckets {
    fn default() -> Self {
        Self {
            start: 20,
            width: 10,
            count: 4,
        }
    }
}

impl AgeBuckets {
    /// Exclusive upper bound of the last bucket.
    pub fn end(&self) -> i64 {
        self.start + self.width * self.count as i64
    }

    /// Labels of all buckets, in order.
    pub fn labels(&self) -> Vec<String> {
        (0..self.count).map(|i| self.label_at(i)).collect()
    }

    fn label_at(&self, i: usize) -> String {
        let lo = self.start + self.width * i as i64;
        format!("{lo}-{}", lo + self.width - 1)
    }

    /// Label of the bucket holding `value`, or `None` outside the range.
    pub fn label(&self, value: f64) -> Option<String> {
        if self.width <= 0 || !value.is_finite() {
            return None;
        }
        if value < self.start as f64 || value >= self.end() as f64 {
            return None;
        }
        let i = ((value - self.start as f64) / self.width as f64).floor() as usize;
        Some(self.label_at(i.min(self.count - 1)))
    }
}

/// Return a copy of `dataset` with a `target` column holding the bucket label
/// of `source` (null when the value is missing or out of range).
pub fn with_bucket_column(
    dataset: &Dataset,
    source: &str,
    target: &str,
    buckets: &AgeBuckets,
) -> Result<Dataset> {
    let idx = require_numeric(dataset, source)?;
    Ok(dataset.with_column(target, |row| {
        row[idx]
            .as_f64()
            .and_then(|v| buckets.label(v))
            .map(Value::Text)
            .unwrap_or(Value::Null)
    }))
}

// ---------------------------------------------------------------------------
// Cross-tabulation
// ---------------------------------------------------------------------------

/// Contingency table of counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub row_column: String,
    pub column_column: String,
    /// Distinct values of the row column, ascending.
    pub row_keys: Vec<Value>,
    /// Distinct values of the column column, ascending.
    pub column_keys: Vec<Value>,
    /// `counts[r][c]` rows having `row_keys[r]` and `column_keys[c]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.counts[row][col]
    }

    /// Sum of every cell.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|r| r.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<usize> {
        (0..self.column_keys.len())
            .map(|c| self.counts.iter().map(|r| r[c]).sum())
            .collect()
    }
}

/// Count rows per (`row_column`, `column_column`) pair. Rows with a null in
/// either column are not counted.
pub fn crosstab(dataset: &Dataset, row_column: &str, column_column: &str) -> Result<CrossTab> {
    let idx = require_columns(dataset, &[row_column, column_column])?;
    let (r, c) = (idx[0], idx[1]);

    let mut pairs: BTreeMap<(&Value, &Value), usize> = BTreeMap::new();
    let mut row_keys: BTreeMap<&Value, usize> = BTreeMap::new();
    let mut column_keys: BTreeMap<&Value, usize> = BTreeMap::new();
    for row in dataset.rows() {
        let (a, b) = (&row[r], &row[c]);
        if a.is_null() || b.is_null() {
            continue;
        }
        *pairs.entry((a, b)).or_default() += 1;
        row_keys.insert(a, 0);
        column_keys.insert(b, 0);
    }

    // Assign dense positions in key order.
    for (pos, slot) in row_keys.values_mut().enumerate() {
        *slot = pos;
    }
    for (pos, slot) in column_keys.values_mut().enumerate() {
        *slot = pos;
    }

    let mut counts = vec![vec![0; column_keys.len()]; row_keys.len()];
    for ((a, b), n) in &pairs {
        counts[row_keys[a]][column_keys[b]] = *n;
    }

    Ok(CrossTab {
        row_column: row_column.to_string(),
        column_column: column_column.to_string(),
        row_keys: row_keys.into_keys().cloned().collect(),
        column_keys: column_keys.into_keys().cloned().collect(),
        counts,
    })
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square, symmetric matrix of Pearson coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pairwise Pearson correlation over `columns`.
///
/// Each pair uses the rows where both cells are numeric. A coefficient is NaN
/// when fewer than two such rows exist or either side is constant; the
/// diagonal is exactly 1.0 otherwise. Every requested column must exist.
pub fn correlation_matrix(dataset: &Dataset, columns: &[&str]) -> Result<CorrelationMatrix> {
    let indices = require_columns(dataset, columns)?;
    for (&idx, name) in indices.iter().zip(columns) {
        if !dataset.column_type(idx).is_numeric() {
            return Err(DataError::NonNumericColumn {
                column: name.to_string(),
            });
        }
    }

    let n = indices.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(dataset, indices[i], indices[j]);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

fn pearson(dataset: &Dataset, a: usize, b: usize) -> f64 {
    let pairs: Vec<(f64, f64)> = dataset
        .rows()
        .iter()
        .filter_map(|row| Some((row[a].as_f64()?, row[b].as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: Value,
    pub count: usize,
    /// Fraction of the non-null values.
    pub share: f64,
}

/// Frequency of each non-null value, most frequent first (ties by value).
pub fn value_counts(dataset: &Dataset, column: &str) -> Result<Vec<ValueCount>> {
    let idx = require_columns(dataset, &[column])?[0];

    let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
    for value in dataset.column_values(idx).filter(|v| !v.is_null()) {
        *counts.entry(value).or_default() += 1;
    }
    let total: usize = counts.values().sum();

    let mut out: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.clone(),
            count,
            share: count as f64 / total as f64,
        })
        .collect();
    // Stable sort keeps ascending key order among equal counts.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(out)
}

/// Most frequent non-null value; the smallest one on a tie.
pub fn mode(dataset: &Dataset, column: &str) -> Result<Option<Value>> {
    Ok(value_counts(dataset, column)?
        .into_iter()
        .next()
        .map(|vc| vc.value))
}

/// Number of distinct non-null values.
pub fn n_unique(dataset: &Dataset, column: &str) -> Result<usize> {
    Ok(value_counts(dataset, column)?.len())
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn bin_centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    fn bin_of(&self, value: f64) -> Option<usize> {
        let (first, last) = (*self.edges.first()?, *self.edges.last()?);
        if !(first..=last).contains(&value) {
            return None;
        }
        let width = self.bin_width();
        let bins = self.counts.len();
        Some((((value - first) / width).floor() as usize).min(bins - 1))
    }
}

/// Bin `values` into `bins` equal-width bins spanning [min, max]; the last
/// bin includes its right edge. A constant input is widened to
/// [v - 0.5, v + 0.5].
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if bins == 0 || finite.is_empty() {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
    edges.push(hi);

    let mut hist = Histogram {
        edges,
        counts: vec![0; bins],
    };
    for v in finite {
        if let Some(b) = hist.bin_of(v) {
            hist.counts[b] += 1;
        }
    }
    hist
}

/// Per-group histograms sharing one set of bin edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedHistogram {
    pub edges: Vec<f64>,
    pub groups: Vec<(Value, Vec<usize>)>,
}

/// Histogram of `value_column` split by `group_column` (age by gender).
/// Edges span the values of rows with a non-null group.
pub fn grouped_histogram(
    dataset: &Dataset,
    value_column: &str,
    group_column: &str,
    bins: usize,
) -> Result<GroupedHistogram> {
    let v = require_numeric(dataset, value_column)?;
    let g = require_columns(dataset, &[group_column])?[0];

    let mut by_group: BTreeMap<&Value, Vec<f64>> = BTreeMap::new();
    for row in dataset.rows() {
        if let (false, Some(x)) = (row[g].is_null(), row[v].as_f64()) {
            by_group.entry(&row[g]).or_default().push(x);
        }
    }

    let all: Vec<f64> = by_group.values().flatten().copied().collect();
    let overall = histogram(&all, bins);

    let groups = by_group
        .into_iter()
        .map(|(key, xs)| {
            let mut counts = vec![0; overall.counts.len()];
            for x in xs {
                if let Some(b) = overall.bin_of(x) {
                    counts[b] += 1;
                }
            }
            (key.clone(), counts)
        })
        .collect();

    Ok(GroupedHistogram {
        edges: overall.edges,
        groups,
    })
}

// ---------------------------------------------------------------------------
// Per-group distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: Value,
    pub summary: ColumnSummary,
}

/// Descriptive statistics of `measure` for each value of `group`, ordered by
/// group key. Feeds the box plots.
pub fn group_summary(dataset: &Dataset, group: &str, measure: &str) -> Result<Vec<GroupSummary>> {
    let g = require_columns(dataset, &[group])?[0];
    let m = require_numeric(dataset, measure)?;

    let mut by_group: BTreeMap<&Value, Vec<f64>> = BTreeMap::new();
    for row in dataset.rows() {
        if row[g].is_null() {
            continue;
        }
        if let Some(x) = row[m].as_f64() {
            by_group.entry(&row[g]).or_default().push(x);
        }
    }

    Ok(by_group
        .into_iter()
        .map(|(key, xs)| GroupSummary {
            key: key.clone(),
            summary: summarize_values(measure, &xs),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixture() -> Dataset {
        let genders = ["Male", "Male", "Female", "Female", "Male"];
        let ages = [30, 35, 40, 45, 50];
        let quality = [6, 7, 8, 8, 6];
        let rows = genders
            .iter()
            .zip(ages)
            .zip(quality)
            .map(|((g, a), q)| vec![Value::from(*g), Value::Integer(a), Value::Integer(q)])
            .collect();
        Dataset::new(
            vec!["gender".into(), "age".into(), "quality of sleep".into()],
            rows,
        )
        .unwrap()
    }

    #[test]
    fn category_mean_by_gender() {
        let means = category_mean(&fixture(), "gender", "age").unwrap();
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].key, Value::from("Female"));
        assert!((means[0].mean - 42.5).abs() < 1e-9);
        assert_eq!(means[1].key, Value::from("Male"));
        assert!((means[1].mean - 115.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", means[1].mean), "38.33");
    }

    #[test]
    fn category_mean_rejects_text_measure() {
        assert_eq!(
            category_mean(&fixture(), "age", "gender"),
            Err(DataError::NonNumericColumn {
                column: "gender".into()
            })
        );
    }

    #[test]
    fn age_bucket_boundaries() {
        let b = AgeBuckets::default();
        assert_eq!(b.label(20.0).as_deref(), Some("20-29"));
        assert_eq!(b.label(29.0).as_deref(), Some("20-29"));
        assert_eq!(b.label(30.0).as_deref(), Some("30-39"));
        assert_eq!(b.label(59.0).as_deref(), Some("50-59"));
        assert_eq!(b.label(60.0), None);
        assert_eq!(b.label(19.0), None);
        assert_eq!(b.labels(), ["20-29", "30-39", "40-49", "50-59"]);
    }

    #[test]
    fn crosstab_counts_sum_to_complete_rows() {
        // The last respondent has no age group.
        let ds = fixture().with_column("age group", |row| match row[1] {
            Value::Integer(50) => Value::Null,
            ref age => AgeBuckets::default()
                .label(age.as_f64().unwrap_or(f64::NAN))
                .map(Value::Text)
                .unwrap_or(Value::Null),
        });
        let tab = crosstab(&ds, "age group", "quality of sleep").unwrap();
        assert_eq!(tab.row_keys, [Value::from("30-39"), Value::from("40-49")]);
        assert_eq!(
            tab.column_keys,
            [Value::Integer(6), Value::Integer(7), Value::Integer(8)]
        );
        assert_eq!(tab.counts, vec![vec![1, 1, 0], vec![0, 0, 2]]);
        assert_eq!(tab.total(), 4);
        assert_eq!(tab.row_totals(), [2, 2]);
        assert_eq!(tab.column_totals(), [1, 1, 2]);
    }

    #[test]
    fn bucket_column_nulls_out_of_range() {
        let ds = Dataset::new(
            vec!["age".into()],
            vec![vec![Value::Integer(29)], vec![Value::Integer(60)], vec![Value::Null]],
        )
        .unwrap();
        let ds = with_bucket_column(&ds, "age", "age group", &AgeBuckets::default()).unwrap();
        let labels: Vec<&Value> = ds.column_values(1).collect();
        assert_eq!(labels, [&Value::from("20-29"), &Value::Null, &Value::Null]);
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let ds = Dataset::new(
            vec!["quality of sleep".into(), "systolic".into(), "diastolic".into()],
            vec![
                vec![Value::Integer(6), Value::Integer(126), Value::Integer(83)],
                vec![Value::Integer(8), Value::Integer(120), Value::Integer(80)],
                vec![Value::Integer(7), Value::Integer(125), Value::Integer(80)],
                vec![Value::Integer(9), Value::Integer(118), Value::Integer(76)],
                vec![Value::Integer(5), Value::Integer(140), Value::Integer(95)],
            ],
        )
        .unwrap();
        let cols = ["quality of sleep", "systolic", "diastolic"];
        let m = correlation_matrix(&ds, &cols).unwrap();
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!(m.get(i, j).abs() <= 1.0);
            }
        }
        assert!(m.get(0, 1) < 0.0);
    }

    #[test]
    fn correlation_reports_exactly_the_missing_column() {
        let ds = Dataset::new(
            vec!["quality of sleep".into(), "systolic".into()],
            vec![vec![Value::Integer(6), Value::Integer(120)]],
        )
        .unwrap();
        let err = correlation_matrix(&ds, &["quality of sleep", "systolic", "nonexistent"])
            .unwrap_err();
        match err {
            DataError::MissingColumns {
                missing, found, ..
            } => {
                assert_eq!(missing, ["nonexistent"]);
                assert_eq!(found, ["quality of sleep", "systolic"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn constant_column_has_nan_correlation() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Integer(1), Value::Integer(5)],
                vec![Value::Integer(2), Value::Integer(5)],
            ],
        )
        .unwrap();
        let m = correlation_matrix(&ds, &["a", "b"]).unwrap();
        assert_eq!(m.get(0, 0), 1.0);
        assert!(m.get(1, 1).is_nan());
        assert!(m.get(0, 1).is_nan());
    }

    #[test]
    fn value_counts_order_and_share() {
        let counts = value_counts(&fixture(), "gender").unwrap();
        assert_eq!(counts[0].value, Value::from("Male"));
        assert_eq!(counts[0].count, 3);
        assert!((counts[0].share - 0.6).abs() < 1e-9);
        let total: f64 = counts.iter().map(|c| c.share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mode_breaks_ties_by_smallest_value() {
        let ds = fixture();
        assert_eq!(mode(&ds, "gender").unwrap(), Some(Value::from("Male")));
        // 6 and 8 both appear twice.
        assert_eq!(mode(&ds, "quality of sleep").unwrap(), Some(Value::Integer(6)));
        assert_eq!(n_unique(&ds, "quality of sleep").unwrap(), 3);
    }

    #[test]
    fn histogram_counts_every_value() {
        let h = histogram(&[30.0, 35.0, 40.0, 45.0, 50.0], 4);
        assert_eq!(h.edges, [30.0, 35.0, 40.0, 45.0, 50.0]);
        assert_eq!(h.counts, [1, 1, 1, 2]);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
        assert_eq!(h.bin_centers()[0], 32.5);
    }

    #[test]
    fn histogram_of_constant_values() {
        let h = histogram(&[7.0, 7.0], 2);
        assert_eq!(h.edges, [6.5, 7.0, 7.5]);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn grouped_histogram_shares_edges() {
        let gh = grouped_histogram(&fixture(), "age", "gender", 4).unwrap();
        assert_eq!(gh.edges.len(), 5);
        assert_eq!(gh.groups[0].0, Value::from("Female"));
        assert_eq!(gh.groups[0].1, [0, 0, 1, 1]);
        assert_eq!(gh.groups[1].1, [1, 1, 0, 1]);
    }

    #[test]
    fn group_summary_per_key() {
        let groups = group_summary(&fixture(), "gender", "age").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].key, Value::from("Male"));
        assert_eq!(groups[1].summary.count, 3);
        assert_eq!(groups[1].summary.median, 35.0);
    }

    fn optional_cell() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            (0i64..4).prop_map(Value::Integer),
            "[ab]".prop_map(Value::Text),
        ]
    }

    proptest! {
        #[test]
        fn crosstab_total_matches_complete_rows(
            pairs in prop::collection::vec((optional_cell(), optional_cell()), 0..40)
        ) {
            let complete = pairs.iter().filter(|(a, b)| !a.is_null() && !b.is_null()).count();
            let rows = pairs.into_iter().map(|(a, b)| vec![a, b]).collect();
            let ds = Dataset::new(vec!["x".into(), "y".into()], rows).unwrap();
            let tab = crosstab(&ds, "x", "y").unwrap();
            prop_assert_eq!(tab.total(), complete);
            prop_assert_eq!(tab.row_totals().iter().sum::<usize>(), complete);
        }
    }

    #[test]
    fn missing_group_column() {
        assert!(matches!(
            group_summary(&fixture(), "bmi category", "age"),
            Err(DataError::MissingColumns { .. })
        ));
    }
}
