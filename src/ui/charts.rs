use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, PlotUi, Points,
};

use sleep_dash::summary::aggregate::{
    CategoryMean, CrossTab, GroupSummary, GroupedHistogram, Histogram, ValueCount,
};

use crate::color::{generate_palette, ColorMap};

const PLOT_HEIGHT: f32 = 260.0;

/// Common frame for every chart; scrolling is left to the page.
fn show_plot(ui: &mut Ui, id: &str, x_label: &str, y_label: &str, add: impl FnOnce(&mut PlotUi)) {
    Plot::new(id)
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_scroll(false)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, add);
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

/// Single-series histogram.
pub fn histogram_chart(ui: &mut Ui, id: &str, x_label: &str, hist: &Histogram) {
    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .bin_centers()
        .into_iter()
        .zip(&hist.counts)
        .map(|(x, &n)| Bar::new(x, n as f64).width(width * 0.95))
        .collect();

    show_plot(ui, id, x_label, "Frequency", |plot_ui| {
        plot_ui.bar_chart(
            BarChart::new(bars)
                .name(x_label)
                .color(Color32::from_rgb(0x8A, 0x2B, 0xE2)),
        );
    });
}

/// Per-group histograms stacked on shared bins.
pub fn stacked_histogram_chart(ui: &mut Ui, id: &str, x_label: &str, hist: &GroupedHistogram) {
    let shared = Histogram {
        edges: hist.edges.clone(),
        counts: vec![0; hist.edges.len().saturating_sub(1)],
    };
    let width = shared.bin_width();
    let centers = shared.bin_centers();
    let colors = ColorMap::new(hist.groups.iter().map(|(k, _)| k));

    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.groups.len());
    for (key, counts) in &hist.groups {
        let bars: Vec<Bar> = centers
            .iter()
            .zip(counts)
            .map(|(&x, &n)| Bar::new(x, n as f64).width(width * 0.95))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(key.to_string())
            .color(colors.color_for(key))
            .stack_on(&below);
        charts.push(chart);
    }

    show_plot(ui, id, x_label, "Count", |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Share of each category as one bar per category.
pub fn share_chart(ui: &mut Ui, id: &str, counts: &[ValueCount]) {
    let colors = generate_palette(counts.len());
    show_plot(ui, id, "", "Share (%)", |plot_ui| {
        for (i, (vc, color)) in counts.iter().zip(colors).enumerate() {
            let bar = Bar::new(i as f64, vc.share * 100.0).width(0.8);
            plot_ui.bar_chart(
                BarChart::new(vec![bar])
                    .name(format!("{} ({:.1}%)", vc.value, vc.share * 100.0))
                    .color(color),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

/// One bar per category, coloured per category so the legend names them.
pub fn category_bar_chart(ui: &mut Ui, id: &str, y_label: &str, means: &[CategoryMean]) {
    let colors = ColorMap::new(means.iter().map(|m| &m.key));
    show_plot(ui, id, "", y_label, |plot_ui| {
        for (i, m) in means.iter().enumerate() {
            plot_ui.bar_chart(
                BarChart::new(vec![Bar::new(i as f64, m.mean).width(0.6)])
                    .name(m.key.to_string())
                    .color(colors.color_for(&m.key)),
            );
        }
    });
}

/// Means per category joined by a line, in category order.
pub fn category_line_chart(ui: &mut Ui, id: &str, y_label: &str, means: &[CategoryMean]) {
    let points: Vec<[f64; 2]> = means
        .iter()
        .enumerate()
        .map(|(i, m)| [i as f64, m.mean])
        .collect();
    let colors = ColorMap::new(means.iter().map(|m| &m.key));

    show_plot(ui, id, "", y_label, |plot_ui| {
        plot_ui.line(
            Line::new(PlotPoints::from(points))
                .color(Color32::from_rgb(0xBA, 0x55, 0xD3))
                .width(2.0),
        );
        for (i, m) in means.iter().enumerate() {
            plot_ui.points(
                Points::new(PlotPoints::from(vec![[i as f64, m.mean]]))
                    .radius(5.0)
                    .name(m.key.to_string())
                    .color(colors.color_for(&m.key)),
            );
        }
    });
}

/// Contingency counts as stacked bars: one bar per row key, one stacked
/// series per column key.
pub fn crosstab_stacked_chart(ui: &mut Ui, id: &str, tab: &CrossTab) {
    let colors = ColorMap::new(&tab.column_keys);
    let mut charts: Vec<BarChart> = Vec::with_capacity(tab.column_keys.len());
    for (c, key) in tab.column_keys.iter().enumerate() {
        let bars: Vec<Bar> = (0..tab.row_keys.len())
            .map(|r| {
                Bar::new(r as f64, tab.get(r, c) as f64)
                    .width(0.7)
                    .name(tab.row_keys[r].to_string())
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(format!("{} = {key}", tab.column_column))
            .color(colors.color_for(key))
            .stack_on(&below);
        charts.push(chart);
    }

    show_plot(ui, id, &tab.row_column, "Count", |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Box per group: whiskers at min/max, box at the quartiles.
pub fn box_chart(ui: &mut Ui, id: &str, y_label: &str, groups: &[GroupSummary]) {
    let colors = ColorMap::new(groups.iter().map(|g| &g.key));
    show_plot(ui, id, "", y_label, |plot_ui| {
        for (i, g) in groups.iter().enumerate() {
            let s = &g.summary;
            let elem = BoxElem::new(i as f64, BoxSpread::new(s.min, s.q25, s.median, s.q75, s.max))
                .box_width(0.5)
                .whisker_width(0.3)
                .name(g.key.to_string());
            plot_ui.box_plot(
                BoxPlot::new(vec![elem])
                    .name(format!("{} (n={})", g.key, s.count))
                    .color(colors.color_for(&g.key)),
            );
        }
    });
}
