use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Stable colour per category value (platform, content type).
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
}

impl CategoryColors {
    /// Assign colours to `values` in the order given.
    pub fn new(values: &[String]) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();
        CategoryColors { mapping }
    }

    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for the correlation heatmap
// ---------------------------------------------------------------------------

/// Blue → light grey → red, for values in `[-1, 1]`. NaN maps to dark grey.
pub fn coolwarm(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::DARK_GRAY;
    }
    let cold: LinSrgb = Srgb::new(0.230, 0.299, 0.754).into_linear();
    let neutral: LinSrgb = Srgb::new(0.865, 0.865, 0.865).into_linear();
    let warm: LinSrgb = Srgb::new(0.706, 0.016, 0.150).into_linear();

    let t = value.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        neutral.mix(cold, -t)
    } else {
        neutral.mix(warm, t)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let luma = 0.299 * f32::from(background.r())
        + 0.587 * f32::from(background.g())
        + 0.114 * f32::from(background.b());
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colours() {
        let colours = generate_palette(4);
        assert_eq!(colours.len(), 4);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_category_is_grey() {
        let colors = CategoryColors::new(&["Instagram".to_string(), "TikTok".to_string()]);
        assert_ne!(colors.color_for("Instagram"), colors.color_for("TikTok"));
        assert_eq!(colors.color_for("MySpace"), Color32::GRAY);
    }

    #[test]
    fn coolwarm_ends_lean_blue_and_red() {
        let cold = coolwarm(-1.0);
        let warm = coolwarm(1.0);
        assert!(cold.b() > cold.r());
        assert!(warm.r() > warm.b());
        assert_eq!(coolwarm(f64::NAN), Color32::DARK_GRAY);
    }
}
