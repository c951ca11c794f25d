use std::collections::HashSet;

use super::model::Dataset;

/// Canonical form of a column name: surrounding whitespace trimmed, lowercase.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Return a copy of `dataset` with canonical column names.
///
/// Names that collide after canonicalization get a `_1`, `_2`, ... suffix in
/// column order, so the result still has unique names. Applying this twice
/// gives the same result as applying it once.
pub fn normalize_columns(dataset: &Dataset) -> Dataset {
    let mut taken: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(dataset.column_count());

    for original in dataset.columns() {
        let base = normalize_name(original);
        let mut candidate = base.clone();
        let mut n = 1;
        while taken.contains(&candidate) {
            candidate = format!("{base}_{n}");
            n += 1;
        }
        if candidate != *original {
            log::trace!("Renaming column '{original}' -> '{candidate}'");
        }
        taken.insert(candidate.clone());
        names.push(candidate);
    }

    dataset.with_column_names(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use proptest::prelude::*;

    fn dataset_with(columns: &[&str]) -> Dataset {
        let row = columns.iter().map(|_| Value::Null).collect();
        Dataset::new(columns.iter().map(|c| c.to_string()).collect(), vec![row]).unwrap()
    }

    #[test]
    fn trims_and_lowercases() {
        let ds = normalize_columns(&dataset_with(&[" Quality of Sleep ", "Systolic", "BMI Category"]));
        assert_eq!(ds.columns(), ["quality of sleep", "systolic", "bmi category"]);
    }

    #[test]
    fn collisions_get_suffixes() {
        let ds = normalize_columns(&dataset_with(&["Age", "age ", "AGE"]));
        assert_eq!(ds.columns(), ["age", "age_1", "age_2"]);
    }

    #[test]
    fn rows_are_untouched() {
        let ds = Dataset::new(vec!["Age".into()], vec![vec![Value::Integer(30)]]).unwrap();
        let normalized = normalize_columns(&ds);
        assert_eq!(normalized.rows(), ds.rows());
        assert_eq!(ds.columns(), ["Age"]);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            names in prop::collection::hash_set("[ a-zA-Z_0-9]{0,8}", 1..8)
        ) {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let once = normalize_columns(&dataset_with(&names));
            let twice = normalize_columns(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
