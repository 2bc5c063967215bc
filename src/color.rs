use eframe::egui::{Color32, Visuals};
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Dashboard theme
// ---------------------------------------------------------------------------

pub const NIGHT_BLACK: Color32 = Color32::from_rgb(0x19, 0x1B, 0x27);
pub const LIGHT_BLUE: Color32 = Color32::from_rgb(0x00, 0x93, 0xFF);
pub const LIGHT_GRAY: Color32 = Color32::from_rgb(0xDC, 0xE4, 0xF2);
pub const DARK_GRAY: Color32 = Color32::from_rgb(0x2D, 0x35, 0x4A);
pub const LIGHT_GREEN: Color32 = Color32::from_rgb(0x22, 0xC7, 0x0C);

/// Dark visuals in the dashboard colours.
pub fn dashboard_visuals() -> Visuals {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = NIGHT_BLACK;
    visuals.window_fill = NIGHT_BLACK;
    visuals.extreme_bg_color = DARK_GRAY;
    visuals.override_text_color = Some(LIGHT_GRAY);
    visuals.selection.bg_fill = LIGHT_BLUE;
    visuals.hyperlink_color = LIGHT_GREEN;
    visuals
}

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
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Slice colours for `n` categories: the two theme accents first, then
/// generated hues for the rest.
pub fn category_colors(n: usize) -> Vec<Color32> {
    let mut colors: Vec<Color32> = [LIGHT_BLUE, LIGHT_GREEN].into_iter().take(n).collect();
    if n > colors.len() {
        colors.extend(generate_palette(n - colors.len()));
    }
    colors
}

/// Blend between two colours, `t` in `[0, 1]`. Used for bar gradients.
pub fn lerp(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color32::from_rgb(mix(from.r(), to.r()), mix(from.g(), to.g()), mix(from.b(), to.b()))
}
