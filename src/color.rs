use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use sleep_dash::Value;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting from the dashboard's purple accent.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (270.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            hsl_to_color32(hue, 0.65, 0.6)
        })
        .collect()
}

/// Diverging blue → white → red scale for correlation coefficients.
/// NaN maps to gray.
pub fn correlation_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let r = r.clamp(-1.0, 1.0) as f32;
    let hue = if r < 0.0 { 220.0 } else { 5.0 };
    let lightness = 0.95 - 0.45 * r.abs();
    hsl_to_color32(hue, 0.7, lightness)
}

/// Text colour that stays readable on top of `background`.
pub fn text_on(background: Color32) -> Color32 {
    let luma =
        0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a chart series to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Value, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over the given categories.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a Value>) -> Self {
        let categories: Vec<&Value> = categories.into_iter().collect();
        let palette = generate_palette(categories.len());
        let mapping = categories
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given category.
    pub fn color_for(&self, value: &Value) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(p[i], p[j]);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn correlation_scale_diverges() {
        let neg = correlation_color(-1.0);
        let pos = correlation_color(1.0);
        assert!(neg.b() > neg.r());
        assert!(pos.r() > pos.b());
        assert_eq!(correlation_color(f64::NAN), Color32::GRAY);
        assert_eq!(text_on(correlation_color(0.0)), Color32::BLACK);
    }

    #[test]
    fn unknown_category_is_gray() {
        let genders = [Value::from("Female"), Value::from("Male")];
        let map = ColorMap::new(&genders);
        assert_ne!(map.color_for(&genders[0]), map.color_for(&genders[1]));
        assert_eq!(map.color_for(&Value::from("Other")), Color32::GRAY);
    }
}
