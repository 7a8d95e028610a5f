use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cohort colours: test-group label → Color32
// ---------------------------------------------------------------------------

/// Maps each cohort label (test group) to a distinct, stable colour so a
/// cohort looks the same across all three charts.
#[derive(Debug, Clone, Default)]
pub struct CohortColors {
    mapping: BTreeMap<String, Color32>,
}

impl CohortColors {
    /// Build the colour map from the dataset's sorted cohort labels.
    pub fn new(cohorts: &[String]) -> Self {
        let palette = generate_palette(cohorts.len());
        let mapping: BTreeMap<String, Color32> = cohorts
            .iter()
            .zip(palette.into_iter())
            .map(|(label, c): (&String, Color32)| (label.clone(), c))
            .collect();

        CohortColors { mapping }
    }

    /// Look up the colour for a cohort label.
    pub fn color_for(&self, cohort: &str) -> Color32 {
        self.mapping.get(cohort).copied().unwrap_or(Color32::GRAY)
    }
}
