/// Normalised RGBA colour (each channel in `[0.0, 1.0]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK:       Self = Self { r: 0.0,  g: 0.0,  b: 0.0,  a: 1.0 };
    pub const WHITE:       Self = Self { r: 1.0,  g: 1.0,  b: 1.0,  a: 1.0 };
    pub const DARK:        Self = Self { r: 0.118, g: 0.118, b: 0.180, a: 1.0 }; // #1e1e2e
    pub const TRANSPARENT: Self = Self { r: 0.0,  g: 0.0,  b: 0.0,  a: 0.0 };

    /// Grid color used until the palette provides `grid-color`.
    pub const DEFAULT_GRID:  Self = Self { r: 0.34, g: 0.34, b: 0.34, a: 0.6 };
    /// Series color used until the palette provides the series' class.
    pub const DEFAULT_STATS: Self = Self { r: 0.0,  g: 0.74, b: 0.94, a: 1.0 };

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |at: usize| -> Option<f32> {
            let digits = hex.get(at..at + 2)?;
            u8::from_str_radix(digits, 16).ok().map(|v| v as f32 / 255.0)
        };

        match hex.len() {
            6 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: 1.0,
            }),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    /// Convert the raw theme form (channels in `[0, 255]`) to normalised.
    pub fn from_styles(r: f32, g: f32, b: f32, a: f32) -> Self {
        let n = |c: f32| (c / 255.0).clamp(0.0, 1.0);
        Self { r: n(r), g: n(g), b: n(b), a: n(a) }
    }

    /// Convert to an [`iced::Color`] for use in Iced widgets.
    #[inline]
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgba(self.r, self.g, self.b, self.a)
    }

    /// Return a copy with the alpha channel set to `alpha`.
    #[inline]
    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha.clamp(0.0, 1.0);
        self
    }

    /// Return a copy with the alpha channel multiplied by `factor`.
    #[inline]
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_alpha() {
        let c = Color::from_hex("#57575799").unwrap();
        assert!((c.r - 0.341).abs() < 0.001);
        assert!((c.a - 0.6).abs() < 0.001);
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        assert_eq!(Color::from_hex("#aébcd"), None);
        assert_eq!(Color::from_hex("#ffé0000"), None);
        assert_eq!(Color::from_hex("#12345g"), None);
        assert_eq!(Color::from_hex("#+f+f+f"), None);
    }

    #[test]
    fn raw_theme_form_is_normalised() {
        let c = Color::from_styles(0.0, 190.0, 240.0, 255.0);
        assert_eq!(c.r, 0.0);
        assert!((c.g - 0.745).abs() < 0.001);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn fade_scales_alpha() {
        assert!((Color::DEFAULT_GRID.fade(0.2).a - 0.12).abs() < 1e-6);
    }
}
