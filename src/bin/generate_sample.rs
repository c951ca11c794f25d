use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const RESPONDENTS: usize = 374;

const OCCUPATIONS: [&str; 8] = [
    "Accountant",
    "Doctor",
    "Engineer",
    "Lawyer",
    "Nurse",
    "Salesperson",
    "Software Engineer",
    "Teacher",
];

const BMI_CATEGORIES: [&str; 3] = ["Normal", "Overweight", "Obese"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One synthetic survey row.
struct Respondent {
    id: i64,
    gender: &'static str,
    age: i64,
    occupation: &'static str,
    sleep_duration: f64,
    quality_of_sleep: i64,
    physical_activity: i64,
    bmi_category: &'static str,
    systolic: i64,
    diastolic: i64,
    sleep_disorder: Option<&'static str>,
}

fn generate(rng: &mut SimpleRng) -> Vec<Respondent> {
    (0..RESPONDENTS)
        .map(|i| {
            let gender = if rng.next_f64() < 0.5 { "Male" } else { "Female" };
            let age = rng.gauss(42.0, 8.5).round().clamp(27.0, 59.0) as i64;
            let occupation = rng.pick(&OCCUPATIONS);
            let bmi_category = rng.pick(&BMI_CATEGORIES);

            let sleep_duration = (rng.gauss(7.1, 0.8).clamp(5.8, 8.5) * 10.0).round() / 10.0;
            // Longer sleep goes with better quality.
            let quality_of_sleep = (rng.gauss(sleep_duration, 0.7).round() as i64).clamp(4, 9);
            let physical_activity = (rng.gauss(59.0, 20.0).round() as i64).clamp(30, 90);

            let bmi_load = match bmi_category {
                "Obese" => 10.0,
                "Overweight" => 5.0,
                _ => 0.0,
            };
            let systolic =
                rng.gauss(118.0 + bmi_load + (age as f64 - 40.0) * 0.4, 5.0).round() as i64;
            let diastolic = (systolic as f64 * 0.66 + rng.gauss(0.0, 3.0)).round() as i64;

            let sleep_disorder = match (bmi_category, rng.next_f64()) {
                ("Obese" | "Overweight", p) if p < 0.55 => Some("Sleep Apnea"),
                (_, p) if p < 0.2 => Some("Insomnia"),
                _ => None,
            };

            Respondent {
                id: i as i64 + 1,
                gender,
                age,
                occupation,
                sleep_duration,
                quality_of_sleep,
                physical_activity,
                bmi_category,
                systolic,
                diastolic,
                sleep_disorder,
            }
        })
        .collect()
}

const HEADER: [&str; 11] = [
    "Person ID",
    "Gender",
    "Age",
    "Occupation",
    "Sleep Duration",
    "Quality of Sleep",
    "Physical Activity Level",
    "BMI Category",
    "Systolic",
    "Diastolic",
    "Sleep Disorder",
];

fn write_csv(path: &Path, rows: &[Respondent]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    // Leading index column, the way a dataframe export leaves it.
    let mut header = vec!["Unnamed: 0"];
    header.extend(HEADER);
    writer.write_record(&header)?;
    for (i, r) in rows.iter().enumerate() {
        writer.write_record([
            i.to_string(),
            r.id.to_string(),
            r.gender.to_string(),
            r.age.to_string(),
            r.occupation.to_string(),
            format!("{:.1}", r.sleep_duration),
            r.quality_of_sleep.to_string(),
            r.physical_activity.to_string(),
            r.bmi_category.to_string(),
            r.systolic.to_string(),
            r.diastolic.to_string(),
            r.sleep_disorder.unwrap_or("").to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Respondent]) -> Result<()> {
    let ints = |f: fn(&Respondent) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let texts = |f: fn(&Respondent) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADER[0], DataType::Int64, false),
        Field::new(HEADER[1], DataType::Utf8, false),
        Field::new(HEADER[2], DataType::Int64, false),
        Field::new(HEADER[3], DataType::Utf8, false),
        Field::new(HEADER[4], DataType::Float64, false),
        Field::new(HEADER[5], DataType::Int64, false),
        Field::new(HEADER[6], DataType::Int64, false),
        Field::new(HEADER[7], DataType::Utf8, false),
        Field::new(HEADER[8], DataType::Int64, false),
        Field::new(HEADER[9], DataType::Int64, false),
        Field::new(HEADER[10], DataType::Utf8, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        ints(|r| r.id),
        texts(|r| r.gender),
        ints(|r| r.age),
        texts(|r| r.occupation),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.sleep_duration).collect::<Vec<_>>(),
        )),
        ints(|r| r.quality_of_sleep),
        ints(|r| r.physical_activity),
        texts(|r| r.bmi_category),
        ints(|r| r.systolic),
        ints(|r| r.diastolic),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.sleep_disorder).collect::<Vec<_>>(),
        )),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_sleep_health.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(path, &rows)?;
    } else {
        write_csv(path, &rows)?;
    }

    log::info!("Wrote {} respondents to {}", rows.len(), path.display());
    println!("Wrote {} respondents to {output}", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleep_dash::data::loader::load_file;
    use sleep_dash::DataSource;

    #[test]
    fn same_seed_same_rows() {
        let a = generate(&mut SimpleRng::new(42));
        let b = generate(&mut SimpleRng::new(42));
        assert_eq!(a.len(), RESPONDENTS);
        assert!(a
            .iter()
            .zip(&b)
            .all(|(x, y)| x.age == y.age && x.occupation == y.occupation));
        assert!(a.iter().all(|r| (27..=59).contains(&r.age)));
        assert!(a.iter().all(|r| (4..=9).contains(&r.quality_of_sleep)));
    }

    #[test]
    fn written_files_load_back() {
        let rows = generate(&mut SimpleRng::new(7));
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("sample.csv");
        write_csv(&csv_path, &rows).unwrap();
        let from_csv = sleep_dash::data::loader::load(
            &DataSource::Path(csv_path),
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(from_csv.len(), RESPONDENTS);
        assert_eq!(from_csv.columns(), HEADER);

        let parquet_path = dir.path().join("sample.parquet");
        write_parquet(&parquet_path, &rows).unwrap();
        let from_parquet = load_file(&parquet_path).unwrap();
        assert_eq!(from_parquet.len(), RESPONDENTS);
        assert_eq!(from_parquet.columns(), HEADER);
    }
}
