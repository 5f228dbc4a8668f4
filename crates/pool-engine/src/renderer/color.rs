use serde::{Deserialize, Serialize};

/// RGBA color for draw calls (components 0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let c = VectorColor::new(0.5, 0.6, 0.7, 0.8);
        assert_eq!(c.a, 0.8);
        assert_eq!(VectorColor::rgb(0.1, 0.2, 0.3).a, 1.0);

        let c8 = VectorColor::rgb8(255, 128, 0);
        assert!((c8.r - 1.0).abs() < 0.01);
        assert!((c8.g - 0.5).abs() < 0.01);
        assert_eq!(c8.b, 0.0);
        assert_eq!(VectorColor::WHITE.with_alpha(0.3).a, 0.3);
    }

    #[test]
    fn alpha_defaults_to_opaque_in_json() {
        let c: VectorColor = serde_json::from_str(r#"{"r":1.0,"g":0.84,"b":0.0}"#).unwrap();
        assert_eq!(c, VectorColor::rgb(1.0, 0.84, 0.0));
    }
}
