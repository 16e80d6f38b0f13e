// Colors for priorities and member avatars
use crate::model::{Priority, UserId};
use std::hash::{Hash, Hasher};

/// Fixed RGB per priority: green, yellow, orange, red.
pub fn priority_color(priority: Priority) -> (u8, u8, u8) {
    match priority {
        Priority::Low => (34, 197, 94),
        Priority::Medium => (234, 179, 8),
        Priority::High => (249, 115, 22),
        Priority::Urgent => (239, 68, 68),
    }
}

/// Deterministic avatar color for a member, readable on a dark background.
pub fn member_color(user: UserId) -> (u8, u8, u8) {
    let (r, g, b) = generate_color(&user.to_string());
    (to_byte(r), to_byte(g), to_byte(b))
}

fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Generates a deterministic color tuple (r, g, b) in [0.0, 1.0] range based on the input string.
/// Saturation stays in 40-90% and lightness in 65-90%.
pub fn generate_color(tag: &str) -> (f32, f32, f32) {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    tag.hash(&mut hasher);
    let hash = hasher.finish();

    let h = (hash % 360) as f32;

    let hash_s = hash >> 16;
    let hash_l = hash >> 32;

    let s = 0.40 + ((hash_s % 51) as f32 / 100.0);
    let l = 0.65 + ((hash_l % 26) as f32 / 100.0);

    hsl_to_rgb(h, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_color_is_stable_and_light() {
        let a = member_color(UserId(42));
        assert_eq!(a, member_color(UserId(42)));
        // Lightness floor of 65% keeps every channel sum well above black
        assert!(a.0 as u32 + a.1 as u32 + a.2 as u32 > 255);
    }

    #[test]
    fn test_hsl_primaries() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((r - 1.0).abs() < 1e-5 && g.abs() < 1e-5 && b.abs() < 1e-5);
        let (r, g, b) = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!(r.abs() < 1e-5 && g.abs() < 1e-5 && (b - 1.0).abs() < 1e-5);
    }
}
