use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

use recovery_panel::data::annotate::ProcessKind;

// ---------------------------------------------------------------------------
// Sequential blue scale for value-coded bars
// ---------------------------------------------------------------------------

const LIGHT_BLUE: (f32, f32, f32) = (210.0, 0.70, 0.85);
const DARK_BLUE: (f32, f32, f32) = (218.0, 0.80, 0.30);

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Colour at position `t` in `[0, 1]` of the light → dark blue scale.
pub fn blues(t: f32) -> Color32 {
    let light = Hsl::new(LIGHT_BLUE.0, LIGHT_BLUE.1, LIGHT_BLUE.2);
    let dark = Hsl::new(DARK_BLUE.0, DARK_BLUE.1, DARK_BLUE.2);
    to_color32(light.mix(dark, t.clamp(0.0, 1.0)))
}

/// One colour per value, darker for larger values.
pub fn value_scale(values: &[f64]) -> Vec<Color32> {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let range = max - min;
    values
        .iter()
        .map(|&v| {
            if range.abs() < f64::EPSILON {
                blues(1.0)
            } else {
                blues(((v - min) / range) as f32)
            }
        })
        .collect()
}

/// Histogram bar colour.
pub const HISTOGRAM: Color32 = Color32::from_rgb(0x4F, 0x46, 0xE5);

pub fn kind_color(kind: ProcessKind) -> Color32 {
    match kind {
        ProcessKind::Electronic => Color32::from_rgb(0x25, 0x63, 0xEB),
        ProcessKind::PhysicalOld => Color32::from_rgb(0x64, 0x74, 0x8B),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_gets_darker_with_value() {
        let colors = value_scale(&[10.0, 50.0, 100.0]);
        assert_eq!(colors.len(), 3);
        let brightness = |c: &Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(brightness(&colors[0]) > brightness(&colors[2]));
    }

    #[test]
    fn flat_values_use_the_dark_end() {
        assert_eq!(value_scale(&[5.0, 5.0]), vec![blues(1.0), blues(1.0)]);
        assert!(value_scale(&[]).is_empty());
    }
}
