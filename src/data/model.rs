use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Value – a single cell of the survey table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell covering the usual dataframe dtypes.
/// Grouped aggregates key `BTreeMap`s by `Value`, so it must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Cell text read as a missing value.
const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// -- Manual Eq/Ord so we can put Value in BTreeMap / BTreeSet --
// Equality goes through `cmp` so all four traits agree.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use Value::{Bool, Float, Integer, Null, Text};

        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric keys compare by magnitude; the integer sorts first on a tie.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (Text(a), Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Parse a raw text cell, guessing its type the way a CSV reader would.
    pub fn parse_cell(s: &str) -> Value {
        let s = s.trim();
        if NULL_TOKENS.contains(&s) {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
        if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
            return Value::Bool(s.eq_ignore_ascii_case("true"));
        }
        Value::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// ScalarType – inferred column type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ScalarType {
    /// Infer the type of a column from its non-null cells.
    ///
    /// Follows dataframe dtypes: a column without any non-null cell is
    /// `Float`, an integer column with gaps is `Float`, and a boolean
    /// column with gaps is `Text`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> ScalarType {
        let mut inferred: Option<ScalarType> = None;
        let mut has_null = false;
        for v in values {
            let t = match v {
                Value::Null => {
                    has_null = true;
                    continue;
                }
                Value::Integer(_) => ScalarType::Integer,
                Value::Float(_) => ScalarType::Float,
                Value::Bool(_) => ScalarType::Boolean,
                Value::Text(_) => return ScalarType::Text,
            };
            inferred = Some(match (inferred, t) {
                (None, t) => t,
                (Some(a), b) if a == b => a,
                (Some(ScalarType::Integer), ScalarType::Float)
                | (Some(ScalarType::Float), ScalarType::Integer) => ScalarType::Float,
                _ => return ScalarType::Text,
            });
        }
        match (inferred, has_null) {
            (None, _) => ScalarType::Float,
            (Some(ScalarType::Integer), true) => ScalarType::Float,
            (Some(ScalarType::Boolean), true) => ScalarType::Text,
            (Some(t), _) => t,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Float)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Integer => "int64",
            ScalarType::Float => "float64",
            ScalarType::Boolean => "bool",
            ScalarType::Text => "object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded survey table
// ---------------------------------------------------------------------------

/// Row-major table with a declared column order.
///
/// Every row holds exactly `columns.len()` cells and column names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Build a dataset, rejecting ragged rows and duplicate column names.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> anyhow::Result<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                anyhow::bail!("duplicate column name '{name}'");
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                anyhow::bail!(
                    "row {i} has {} cells but the header declares {} columns",
                    row.len(),
                    columns.len()
                );
            }
        }
        Ok(Dataset { columns, rows })
    }

    /// A dataset with no columns and no rows.
    pub fn empty() -> Self {
        Dataset {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Non-null numeric cells of a column, in row order.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.column_values(idx).filter_map(Value::as_f64).collect()
    }

    pub fn column_type(&self, idx: usize) -> ScalarType {
        ScalarType::infer(self.column_values(idx))
    }

    /// Return a copy with the columns renamed positionally.
    pub(crate) fn with_column_names(&self, columns: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), self.columns.len());
        Dataset {
            columns,
            rows: self.rows.clone(),
        }
    }

    /// Return a copy keeping only the columns for which `keep` holds.
    pub fn retain_columns(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        let kept: Vec<usize> = (0..self.columns.len())
            .filter(|&i| keep(&self.columns[i]))
            .collect();
        Dataset {
            columns: kept.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| kept.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Return a copy with a derived column appended (or replaced, if the
    /// name already exists). `derive` sees each original row.
    pub fn with_column(&self, name: &str, mut derive: impl FnMut(&[Value]) -> Value) -> Self {
        let existing = self.column_index(name);
        let mut columns = self.columns.clone();
        if existing.is_none() {
            columns.push(name.to_string());
        }
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let derived = derive(row);
                let mut out = row.clone();
                match existing {
                    Some(i) => out[i] = derived,
                    None => out.push(derived),
                }
                out
            })
            .collect();
        Dataset { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_guesses_types() {
        assert_eq!(Value::parse_cell("42"), Value::Integer(42));
        assert_eq!(Value::parse_cell("6.1"), Value::Float(6.1));
        assert_eq!(Value::parse_cell("TRUE"), Value::Bool(true));
        assert_eq!(Value::parse_cell(" Nurse "), Value::Text("Nurse".into()));
        assert_eq!(Value::parse_cell(""), Value::Null);
        assert_eq!(Value::parse_cell("NaN"), Value::Null);
    }

    #[test]
    fn missing_value_markers_are_null() {
        for token in ["None", "N/A", "n/a", "<NA>", "#N/A", " None "] {
            assert_eq!(Value::parse_cell(token), Value::Null, "{token:?}");
        }
        assert_eq!(Value::parse_cell("Insomnia"), Value::from("Insomnia"));
        assert_eq!(Value::parse_cell("none"), Value::from("none"));
    }

    #[test]
    fn equality_agrees_with_ordering_and_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(v: &Value) -> u64 {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        }

        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.cmp(&nan.clone()), std::cmp::Ordering::Equal);

        let (zero, neg_zero) = (Value::Float(0.0), Value::Float(-0.0));
        assert_ne!(zero, neg_zero);
        assert_ne!(zero.cmp(&neg_zero), std::cmp::Ordering::Equal);
        assert_ne!(hash_of(&zero), hash_of(&neg_zero));

        assert_ne!(Value::Integer(2), Value::Float(2.0));
        assert_eq!(hash_of(&Value::from("Nurse")), hash_of(&Value::from("Nurse")));
    }

    #[test]
    fn text_orders_lexically() {
        let mut v = vec![Value::from("Nurse"), Value::from("Doctor"), Value::Null];
        v.sort();
        assert_eq!(v, vec![Value::Null, Value::from("Doctor"), Value::from("Nurse")]);
    }

    #[test]
    fn mixed_numeric_orders_by_magnitude() {
        assert!(Value::Integer(2) < Value::Float(2.5));
        assert!(Value::Float(1.5) < Value::Integer(2));
        assert_ne!(Value::Integer(2).cmp(&Value::Float(2.0)), std::cmp::Ordering::Equal);
    }

    #[test]
    fn infer_types() {
        let ints = [Value::Integer(1), Value::Integer(3)];
        assert_eq!(ScalarType::infer(&ints), ScalarType::Integer);
        let ints_with_gap = [Value::Integer(1), Value::Null, Value::Integer(3)];
        assert_eq!(ScalarType::infer(&ints_with_gap), ScalarType::Float);
        let bools_with_gap = [Value::Bool(true), Value::Null];
        assert_eq!(ScalarType::infer(&bools_with_gap), ScalarType::Text);
        assert_eq!(ScalarType::infer(&[Value::Bool(false)]), ScalarType::Boolean);
        let mixed = [Value::Integer(1), Value::Float(2.5)];
        assert_eq!(ScalarType::infer(&mixed), ScalarType::Float);
        let text = [Value::Integer(1), Value::from("x")];
        assert_eq!(ScalarType::infer(&text), ScalarType::Text);
        assert_eq!(ScalarType::infer(&[Value::Null]), ScalarType::Float);
        assert_eq!(ScalarType::Text.to_string(), "object");
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Integer(1)]],
        );
        assert!(err.is_err());
    }

    #[test]
    fn new_rejects_duplicate_names() {
        assert!(Dataset::new(vec!["a".into(), "a".into()], vec![]).is_err());
    }

    #[test]
    fn with_column_appends_and_keeps_input() {
        let ds = Dataset::new(
            vec!["age".into()],
            vec![vec![Value::Integer(30)], vec![Value::Integer(41)]],
        )
        .unwrap();
        let derived = ds.with_column("double", |row| {
            Value::Float(row[0].as_f64().unwrap_or(f64::NAN) * 2.0)
        });
        assert_eq!(derived.columns(), ["age", "double"]);
        assert_eq!(derived.rows()[1][1], Value::Float(82.0));
        assert_eq!(ds.column_count(), 1);
    }

    #[test]
    fn retain_columns_drops_cells() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Integer(1), Value::Integer(2)]],
        )
        .unwrap();
        let kept = ds.retain_columns(|c| c == "b");
        assert_eq!(kept.columns(), ["b"]);
        assert_eq!(kept.rows()[0], vec![Value::Integer(2)]);
    }
}
