use serde::Serialize;

use crate::data::model::{Dataset, ScalarType};

/// One row of the column information table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub scalar_type: ScalarType,
    pub non_null: usize,
}

/// Name, inferred type and non-null count for each column, in column order.
pub fn column_info(dataset: &Dataset) -> Vec<ColumnInfo> {
    dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| ColumnInfo {
            name: name.clone(),
            scalar_type: dataset.column_type(idx),
            non_null: dataset.column_values(idx).filter(|v| !v.is_null()).count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    #[test]
    fn follows_column_order() {
        let ds = Dataset::new(
            vec!["occupation".into(), "age".into(), "sleep disorder".into()],
            vec![
                vec![Value::from("Nurse"), Value::Integer(30), Value::Null],
                vec![Value::from("Doctor"), Value::Integer(41), Value::from("Insomnia")],
            ],
        )
        .unwrap();
        let info = column_info(&ds);
        assert_eq!(
            info,
            vec![
                ColumnInfo {
                    name: "occupation".into(),
                    scalar_type: ScalarType::Text,
                    non_null: 2
                },
                ColumnInfo {
                    name: "age".into(),
                    scalar_type: ScalarType::Integer,
                    non_null: 2
                },
                ColumnInfo {
                    name: "sleep disorder".into(),
                    scalar_type: ScalarType::Text,
                    non_null: 1
                },
            ]
        );
    }

    #[test]
    fn empty_dataset_has_no_rows() {
        assert!(column_info(&Dataset::empty()).is_empty());
    }
}
