use eframe::egui::{self, RichText, Ui};

use sleep_dash::config::columns::{
    AGE, AGE_GROUP, BMI_CATEGORY, GENDER, OCCUPATION, PHYSICAL_ACTIVITY, QUALITY_OF_SLEEP,
    SLEEP_DISORDER, SLEEP_DURATION,
};
use sleep_dash::config::DashboardConfig;
use sleep_dash::error::Result;
use sleep_dash::summary::aggregate::{
    category_mean, correlation_matrix, crosstab, group_summary, grouped_histogram, histogram,
    require_columns, value_counts, with_bucket_column,
};
use sleep_dash::summary::describe::describe_numeric;
use sleep_dash::summary::indicators::{key_indicators, KeyIndicators};
use sleep_dash::summary::metadata::column_info;
use sleep_dash::Dataset;

use super::{charts, panels, tables};

/// Heading + body; a failed body shows its error and the page carries on.
fn section(ui: &mut Ui, title: &str, body: impl FnOnce(&mut Ui) -> Result<()>) {
    ui.add_space(12.0);
    ui.heading(title);
    if let Err(err) = body(ui) {
        log::warn!("{title}: {err}");
        panels::view_error(ui, &err);
    }
}

fn caption(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).italics().weak());
}

// ---------------------------------------------------------------------------
// Objective 1 – demographics
// ---------------------------------------------------------------------------

pub fn demographics(ui: &mut Ui, ds: &Dataset, config: &DashboardConfig) {
    section(ui, "Key Indicators", |ui| {
        indicator_row(ui, &key_indicators(ds)?);
        Ok(())
    });

    section(ui, "Dataset", |ui| {
        ui.label(format!(
            "The dataset contains {} rows and {} columns.",
            ds.len(),
            ds.column_count()
        ));
        tables::dataset_table(ui, ds, config.table_row_limit);
        Ok(())
    });

    section(ui, "Summary Statistics", |ui| {
        ui.label("Descriptive statistics for all numerical columns in the dataset.");
        tables::summary_table(ui, &describe_numeric(ds));
        Ok(())
    });

    section(ui, "Data Column Information", |ui| {
        ui.label("Column names, their data types and how many values are present.");
        tables::column_info_table(ui, &column_info(ds));
        Ok(())
    });

    section(ui, "Age Distribution by Gender", |ui| {
        let hist = grouped_histogram(ds, AGE, GENDER, config.histogram_bins)?;
        charts::stacked_histogram_chart(ui, "age_by_gender", "Age", &hist);
        caption(ui, "Figure 1. Number of respondents per age bin, stacked by gender.");
        Ok(())
    });

    section(ui, "Distribution of Age", |ui| {
        let age = require_columns(ds, &[AGE])?[0];
        let hist = histogram(&ds.numeric_values(age), config.histogram_bins);
        charts::histogram_chart(ui, "age_distribution", "Age", &hist);
        caption(ui, "Figure 2. Overall age distribution of the respondents.");
        Ok(())
    });

    section(ui, "Distribution of Occupation", |ui| {
        let counts = value_counts(ds, OCCUPATION)?;
        charts::share_chart(ui, "occupation_share", &counts);
        tables::value_counts_table(ui, "occupation_counts", "Occupation", &counts);
        caption(ui, "Figure 3. Share of each occupation among all respondents.");
        Ok(())
    });
}

fn indicator_row(ui: &mut Ui, k: &KeyIndicators) {
    let top_job = k
        .top_occupation
        .as_ref()
        .map_or_else(|| "-".to_string(), |v| v.to_string());
    let cells = [
        ("Total Respondents", k.total_respondents.to_string()),
        ("Average Age", format!("{:.1}", k.average_age)),
        (
            "Gender ♂/♀",
            format!("{:.1}% / {:.1}%", k.male_percent, k.female_percent),
        ),
        ("Top Job", top_job),
        ("Occupations", k.unique_occupations.to_string()),
    ];
    ui.columns(cells.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cells) {
            egui::Frame::group(col.style()).show(col, |ui| {
                ui.label(RichText::new(label).small().weak());
                ui.label(RichText::new(value).size(20.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Objective 2 – attribute comparison
// ---------------------------------------------------------------------------

pub fn comparison(ui: &mut Ui, ds: &Dataset, config: &DashboardConfig) {
    section(ui, "Average Quality of Sleep by Gender", |ui| {
        let means = category_mean(ds, GENDER, QUALITY_OF_SLEEP)?;
        charts::category_bar_chart(ui, "quality_by_gender", "Quality of Sleep", &means);
        tables::category_mean_table(ui, "quality_by_gender_table", "Gender", "Quality of Sleep", &means);
        caption(ui, "Figure 1. Average sleep quality score for male and female respondents.");
        Ok(())
    });

    section(ui, "Distribution of Quality of Sleep by Age Group", |ui| {
        let with_groups = with_bucket_column(ds, AGE, AGE_GROUP, &config.age_buckets)?;
        let tab = crosstab(&with_groups, AGE_GROUP, QUALITY_OF_SLEEP)?;
        charts::crosstab_stacked_chart(ui, "quality_by_age_group", &tab);
        tables::crosstab_table(ui, "quality_by_age_group_table", &tab);
        caption(
            ui,
            &format!(
                "Figure 2. Respondents per quality-of-sleep score within each age group ({}).",
                config.age_buckets.labels().join(", ")
            ),
        );
        Ok(())
    });

    section(ui, "Average Quality of Sleep by Occupation", |ui| {
        let means = category_mean(ds, OCCUPATION, QUALITY_OF_SLEEP)?;
        charts::category_line_chart(ui, "quality_by_occupation", "Average Quality of Sleep", &means);
        tables::category_mean_table(
            ui,
            "quality_by_occupation_table",
            "Occupation",
            "Quality of Sleep",
            &means,
        );
        caption(ui, "Figure 3. Average sleep quality per occupation, sorted by occupation.");
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Objective 3 – correlation
// ---------------------------------------------------------------------------

pub fn correlation(ui: &mut Ui, ds: &Dataset, config: &DashboardConfig) {
    ui.collapsing("Available columns", |ui| {
        ui.label(ds.columns().join(", "));
    });

    section(ui, "Correlation Matrix of Quality of Sleep and Blood Pressure", |ui| {
        let matrix = correlation_matrix(ds, &config.correlation_columns())?;
        tables::correlation_grid(ui, &matrix);
        caption(ui, "Figure 1. Pearson correlation coefficients.");
        Ok(())
    });

    section(ui, "Sleep Duration Distribution by Sleep Disorder", |ui| {
        let groups = group_summary(ds, SLEEP_DISORDER, SLEEP_DURATION)?;
        charts::box_chart(ui, "duration_by_disorder", "Sleep Duration", &groups);
        caption(ui, "Figure 2. Sleep duration quartiles and range for each sleep disorder.");
        Ok(())
    });

    section(ui, "Physical Activity Level Distribution by BMI Category", |ui| {
        let groups = group_summary(ds, BMI_CATEGORY, PHYSICAL_ACTIVITY)?;
        charts::box_chart(ui, "activity_by_bmi", "Physical Activity Level", &groups);
        caption(ui, "Figure 3. Physical activity quartiles and range for each BMI category.");
        Ok(())
    });
}
