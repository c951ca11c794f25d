use eframe::egui::{self, Grid, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use sleep_dash::summary::aggregate::{CategoryMean, CorrelationMatrix, CrossTab, ValueCount};
use sleep_dash::summary::describe::ColumnSummary;
use sleep_dash::summary::metadata::ColumnInfo;
use sleep_dash::Dataset;

use crate::color::{correlation_color, text_on};

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 320.0;

/// Format a statistic the way the summary table shows it: two decimals,
/// thousands separators, `NaN` for undefined values.
pub fn format_stat(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    let raw = format!("{:.2}", v.abs());
    let (int_part, frac) = raw.split_once('.').unwrap_or((raw.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 && raw != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

// ---------------------------------------------------------------------------
// Generic string table
// ---------------------------------------------------------------------------

/// Render a header + rows of pre-formatted cells. `id` keeps several tables
/// on one page apart.
fn string_table(ui: &mut Ui, id: &str, header: &[String], rows: &[Vec<String>]) {
    ui.push_id(id, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0), header.len())
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .header(20.0, |mut head| {
                for name in header {
                    head.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let cells = &rows[row.index()];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The raw dataset, capped at `limit` rows.
pub fn dataset_table(ui: &mut Ui, dataset: &Dataset, limit: usize) {
    let header = dataset.columns().to_vec();
    let rows: Vec<Vec<String>> = dataset
        .rows()
        .iter()
        .take(limit)
        .map(|r| r.iter().map(|v| v.to_string()).collect())
        .collect();
    string_table(ui, "dataset_table", &header, &rows);
    if dataset.len() > limit {
        ui.label(RichText::new(format!("Showing first {limit} of {} rows.", dataset.len())).weak());
    }
}

pub fn summary_table(ui: &mut Ui, summaries: &[ColumnSummary]) {
    let header: Vec<String> = ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            let mut row = vec![s.name.clone(), format_stat(s.count as f64)];
            row.extend(
                [s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max]
                    .into_iter()
                    .map(format_stat),
            );
            row
        })
        .collect();
    string_table(ui, "summary_table", &header, &rows);
}

pub fn column_info_table(ui: &mut Ui, info: &[ColumnInfo]) {
    let header = vec![
        "Column Name".to_string(),
        "Data Type".to_string(),
        "Non-Null Count".to_string(),
    ];
    let rows: Vec<Vec<String>> = info
        .iter()
        .map(|c| vec![c.name.clone(), c.scalar_type.to_string(), c.non_null.to_string()])
        .collect();
    string_table(ui, "column_info_table", &header, &rows);
}

pub fn value_counts_table(ui: &mut Ui, id: &str, label: &str, counts: &[ValueCount]) {
    let header = vec![label.to_string(), "Count".to_string(), "Share".to_string()];
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|c| {
            vec![
                c.value.to_string(),
                c.count.to_string(),
                format!("{:.1}%", c.share * 100.0),
            ]
        })
        .collect();
    string_table(ui, id, &header, &rows);
}

pub fn category_mean_table(ui: &mut Ui, id: &str, group: &str, measure: &str, means: &[CategoryMean]) {
    let header = vec![group.to_string(), format!("Average {measure}"), "n".to_string()];
    let rows: Vec<Vec<String>> = means
        .iter()
        .map(|m| vec![m.key.to_string(), format_stat(m.mean), m.count.to_string()])
        .collect();
    string_table(ui, id, &header, &rows);
}

/// Contingency table with row and column totals.
pub fn crosstab_table(ui: &mut Ui, id: &str, tab: &CrossTab) {
    let mut header = vec![format!("{} \\ {}", tab.row_column, tab.column_column)];
    header.extend(tab.column_keys.iter().map(|k| k.to_string()));
    header.push("All".to_string());

    let mut rows: Vec<Vec<String>> = tab
        .row_keys
        .iter()
        .zip(&tab.counts)
        .zip(tab.row_totals())
        .map(|((key, counts), total)| {
            let mut row = vec![key.to_string()];
            row.extend(counts.iter().map(|n| n.to_string()));
            row.push(total.to_string());
            row
        })
        .collect();

    let mut totals = vec!["All".to_string()];
    totals.extend(tab.column_totals().iter().map(|n| n.to_string()));
    totals.push(tab.total().to_string());
    rows.push(totals);

    string_table(ui, id, &header, &rows);
}

/// Correlation matrix as an annotated heat grid.
pub fn correlation_grid(ui: &mut Ui, matrix: &CorrelationMatrix) {
    Grid::new("correlation_grid")
        .spacing([6.0, 6.0])
        .min_col_width(90.0)
        .show(ui, |ui| {
            ui.label("");
            for name in &matrix.columns {
                ui.strong(name);
            }
            ui.end_row();

            for (i, name) in matrix.columns.iter().enumerate() {
                ui.strong(name);
                for j in 0..matrix.len() {
                    let r = matrix.get(i, j);
                    let bg = correlation_color(r);
                    let text = if r.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    ui.label(
                        RichText::new(format!("  {text}  "))
                            .monospace()
                            .background_color(bg)
                            .color(text_on(bg)),
                    );
                }
                ui.end_row();
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_format_with_separators() {
        assert_eq!(format_stat(1234567.891), "1,234,567.89");
        assert_eq!(format_stat(42.5), "42.50");
        assert_eq!(format_stat(-1234.0), "-1,234.00");
        assert_eq!(format_stat(-0.001), "0.00");
        assert_eq!(format_stat(f64::NAN), "NaN");
    }
}
