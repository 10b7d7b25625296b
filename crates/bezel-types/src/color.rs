//! RGBA color type shared by the device traits and widget drawing code.

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha value.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Multiply the alpha channel by a 0..1 factor.
    ///
    /// Used when compositing a widget's animated alpha onto draw calls.
    /// The factor is clamped, so mid-overshoot twitch values stay valid.
    pub fn scale_alpha(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        self.with_alpha((self.a as f32 * f) as u8)
    }

    /// Multiply the color channels by a 0..1 factor, leaving alpha
    /// alone. Widgets use this to dim their unfocused look.
    pub fn scale_rgb(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
            a: self.a,
        }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::rgb(10, 20, 30).with_alpha(128);
        assert_eq!(c, Color::rgba(10, 20, 30, 128));
    }

    #[test]
    fn scale_alpha_clamps() {
        assert_eq!(Color::WHITE.scale_alpha(0.5).a, 127);
        assert_eq!(Color::WHITE.scale_alpha(2.0).a, 255);
        assert_eq!(Color::WHITE.scale_alpha(-1.0).a, 0);
    }

    #[test]
    fn scale_rgb_leaves_alpha() {
        let c = Color::rgba(200, 100, 50, 77).scale_rgb(0.5);
        assert_eq!(c, Color::rgba(100, 50, 25, 77));
        assert_eq!(Color::WHITE.scale_rgb(2.0), Color::WHITE);
    }
}
