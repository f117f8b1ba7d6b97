// File: src/color_utils.rs
use std::hash::{Hash, Hasher};

/// Deterministic pastel (r, g, b) in the 0-255 range for a category key.
/// The same category always gets the same colour across runs and views.
pub fn category_color(key: &str) -> (u8, u8, u8) {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();

    let h = (hash % 360) as f32;
    // S and L come from other bits so they don't track the hue.
    let s = 0.45 + ((hash >> 16) % 41) as f32 / 100.0;
    let l = 0.60 + ((hash >> 32) % 21) as f32 / 100.0;

    let (r, g, b) = hsl_to_rgb(h, s, l);
    (to_byte(r), to_byte(g), to_byte(b))
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0..60 => (c, x, 0.0),
        60..120 => (x, c, 0.0),
        120..180 => (0.0, c, x),
        180..240 => (0.0, x, c),
        240..300 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}
