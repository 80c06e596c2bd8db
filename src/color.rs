//! Color helpers for particle fields.
//!
//! Colors are plain `Vec3` RGB triples with each channel in `0.0..=1.0`,
//! the same representation the renderer uploads to the GPU.

use glam::Vec3;

/// Parse a `#rrggbb` (or `rrggbb`) hex string into an RGB color.
///
/// Returns `None` for anything that is not exactly six hex digits.
///
/// ```
/// use galaxy_field::color::hex_to_rgb;
///
/// let c = hex_to_rgb("#ff0000").unwrap();
/// assert_eq!(c, glam::Vec3::new(1.0, 0.0, 0.0));
/// ```
pub fn hex_to_rgb(hex: &str) -> Option<Vec3> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };

    Some(Vec3::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Format an RGB color as a lowercase `#rrggbb` string.
///
/// Channels are clamped to `0.0..=1.0` and rounded to the nearest byte.
pub fn rgb_to_hex(color: Vec3) -> String {
    let [r, g, b] = color.to_array().map(to_byte);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Convert a `0.0..=1.0` channel to a byte, clamping out-of-range input.
#[inline]
pub fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Linear interpolation between two colors.
///
/// Computes `inside + (outside - inside) * t`. Equal endpoints give that
/// color for every `t`, and `t = 1` returns `outside` exactly.
#[inline]
pub fn mix(inside: Vec3, outside: Vec3, t: f32) -> Vec3 {
    if t == 1.0 {
        return outside;
    }
    inside + (outside - inside) * t
}

/// Whether every channel lies in `0.0..=1.0`. NaN channels fail.
#[inline]
pub fn in_unit_range(color: Vec3) -> bool {
    color.to_array().iter().all(|c| (0.0..=1.0).contains(c))
}

/// Serde adapter storing colors as `"#rrggbb"` strings.
///
/// Deserialization also accepts a `[r, g, b]` array of floats, which is
/// how `glam` would serialize the vector on its own.
pub mod hex {
    use glam::Vec3;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ColorRepr {
        Hex(String),
        Rgb([f32; 3]),
    }

    pub fn serialize<S: Serializer>(color: &Vec3, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::rgb_to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec3, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Hex(s) => super::hex_to_rgb(&s)
                .ok_or_else(|| de::Error::custom(format!("invalid hex color '{}'", s))),
            ColorRepr::Rgb(rgb) => Ok(Vec3::from_array(rgb)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        let c = hex_to_rgb("#ff6030").unwrap();
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - 96.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 48.0 / 255.0).abs() < 1e-6);

        assert_eq!(hex_to_rgb("1b3984"), hex_to_rgb("#1b3984"));
        assert!(hex_to_rgb("#fff").is_none());
        assert!(hex_to_rgb("#gg0000").is_none());
        assert!(hex_to_rgb("#ff00ff00").is_none());
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(rgb_to_hex(Vec3::new(1.0, 0.0, 0.0)), "#ff0000");
        assert_eq!(rgb_to_hex(Vec3::new(2.0, -1.0, 0.5)), "#ff0080");
        let c = hex_to_rgb("#1b3984").unwrap();
        assert_eq!(rgb_to_hex(c), "#1b3984");
    }

    #[test]
    fn test_mix_endpoints() {
        let inside = Vec3::new(1.0, 0.376, 0.188);
        let outside = Vec3::new(0.105, 0.223, 0.517);
        assert_eq!(mix(inside, outside, 0.0), inside);
        assert_eq!(mix(inside, outside, 1.0), outside);
    }

    #[test]
    fn test_mix_equal_endpoints_is_constant() {
        let c = Vec3::splat(0.7);
        for i in 0..=1000 {
            assert_eq!(mix(c, c, i as f32 / 1000.0), c);
        }
    }

    #[test]
    fn test_mix_interior_is_lerp() {
        let inside = Vec3::new(1.0, 96.0 / 255.0, 48.0 / 255.0);
        let outside = Vec3::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0);
        for t in [0.1_f32, 0.25, 0.3, 0.5, 0.77, 0.999] {
            let expected = inside + (outside - inside) * t;
            assert_eq!(mix(inside, outside, t).to_array(), expected.to_array());
        }
    }

    #[test]
    fn test_unit_range() {
        assert!(in_unit_range(Vec3::ZERO));
        assert!(in_unit_range(Vec3::ONE));
        assert!(!in_unit_range(Vec3::new(1.01, 0.0, 0.0)));
        assert!(!in_unit_range(Vec3::new(0.0, f32::NAN, 0.0)));
    }
}
