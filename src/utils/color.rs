use eframe::egui::Color32;

/// Drop zone border at rest.
pub const DROP_ZONE_IDLE: &str = "#3498db";
/// Drop zone border while files hover over the window.
pub const DROP_ZONE_HOVER: &str = "#2980b9";

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;

    fn from_hex_or(hex: &str, fallback: Self) -> Self
    where
        Self: Sized,
    {
        Self::from_hex(hex).unwrap_or(fallback)
    }
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}
