use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Value};
use crate::error::{DataError, Result};

/// Column-name prefix left behind when a dataframe index is written to CSV.
const INDEX_ARTIFACT_PREFIX: &str = "Unnamed";

// ---------------------------------------------------------------------------
// Data source
// ---------------------------------------------------------------------------

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Remote CSV fetched over HTTP(S).
    Url(String),
    /// Local file, format chosen by extension.
    Path(PathBuf),
}

impl DataSource {
    /// Classify a locator string: `http://` / `https://` are URLs, anything
    /// else is a filesystem path.
    pub fn parse(locator: &str) -> Self {
        let lower = locator.trim().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(locator.trim().to_string())
        } else {
            DataSource::Path(PathBuf::from(locator))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dataset and strip index-artifact columns.
///
/// Either a fully parsed dataset comes back or `DataUnavailable`; a failed
/// read never yields a partial table.
pub fn load(source: &DataSource, timeout: Duration) -> Result<Dataset> {
    let loaded = match source {
        DataSource::Url(url) => fetch_csv(url, timeout),
        DataSource::Path(path) => load_file(path),
    };

    match loaded {
        Ok(dataset) => {
            let dataset = drop_index_artifacts(&dataset);
            log::info!(
                "Loaded {} rows x {} columns from {source}",
                dataset.len(),
                dataset.column_count()
            );
            Ok(dataset)
        }
        Err(e) => {
            log::error!("Failed to load {source}: {e:#}");
            Err(DataError::DataUnavailable {
                locator: source.to_string(),
                reason: format!("{e:#}"),
            })
        }
    }
}

/// Remove columns whose header marks them as a leftover index
/// (`Unnamed: 0`, or a blank header).
pub fn drop_index_artifacts(dataset: &Dataset) -> Dataset {
    dataset.retain_columns(|name| {
        let artifact = name.starts_with(INDEX_ARTIFACT_PREFIX) || name.trim().is_empty();
        if artifact {
            log::warn!("Dropping index artifact column '{name}'");
        }
        !artifact
    })
}

// ---------------------------------------------------------------------------
// Remote CSV
// ---------------------------------------------------------------------------

fn fetch_csv(url: &str, timeout: Duration) -> anyhow::Result<Dataset> {
    log::debug!("Fetching {url} (timeout {timeout:?})");
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")?;

    let body = client
        .get(url)
        .header(
            reqwest::header::USER_AGENT,
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
        )
        .send()
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .context("server rejected the request")?
        .bytes()
        .context("reading response body")?;

    parse_csv(body.as_ref())
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// Load a dataset from a local file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by records
/// * `.json`    – `[{ "Age": 27, "Gender": "Male", ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> anyhow::Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            parse_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse CSV with a header row. Cell types are guessed per cell; a row with
/// the wrong number of fields fails the whole read.
pub fn parse_csv<R: Read>(input: R) -> anyhow::Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Value::parse_cell).collect());
    }

    Dataset::new(headers, rows)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, one object per respondent):
///
/// ```json
/// [
///   { "Gender": "Male", "Age": 27, "Sleep Duration": 6.1 },
///   ...
/// ]
/// ```
///
/// Columns appear in first-seen order across records (keys within one record
/// come in map order); a key missing from a record is null.
fn load_json(path: &Path) -> anyhow::Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_records(&text)
}

pub(crate) fn parse_json_records(text: &str) -> anyhow::Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut parsed: Vec<BTreeMap<String, Value>> = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let mut row = BTreeMap::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_value(val));
        }
        parsed.push(row);
    }

    let rows = parsed
        .into_iter()
        .map(|mut row| {
            columns
                .iter()
                .map(|c| row.remove(c).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Dataset::new(columns, rows)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per survey field.
///
/// Works with files written by the common dataframe libraries and by the
/// `generate_sample` binary. Nested columns are rendered as text.
fn load_parquet(path: &Path) -> anyhow::Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_value(col, row))
                .collect::<anyhow::Result<Vec<Value>>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(cells);
        }
    }

    Dataset::new(columns, rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> anyhow::Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| Value::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| Value::Text(a.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Value::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Value::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Value::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Value::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| Value::Bool(a.value(row))),
        _ => {
            let text = arrow::util::display::array_value_to_string(col.as_ref(), row)
                .context("formatting parquet cell")?;
            Some(Value::parse_cell(&text))
        }
    };
    value.with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}
