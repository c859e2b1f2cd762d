//! Colour palettes and per-instance colour assignment

use crate::constants::LIGHTNESS_JITTER;
use crate::layout::random_range_f32;
use rand::Rng;

/// sRGB colour with channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }

    /// Shift HSL lightness by `delta`, keeping hue and saturation.
    pub fn offset_lightness(self, delta: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l + delta).clamp(0.0, 1.0))
    }

    pub fn to_hsl(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };

        (h / 6.0, s, l)
    }

    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s == 0.0 {
            return Self::rgb(l, l, l);
        }

        fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
            let t = t.rem_euclid(1.0);
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Linear-space RGBA for GPU upload
    pub fn to_linear_rgba(self) -> [f32; 4] {
        fn srgb_to_linear(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }

        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            1.0,
        ]
    }
}

pub const WHITE: Color = Color::from_hex(0xFFFFFF);
pub const MISTY_ROSE: Color = Color::from_hex(0xFFE4E1);
pub const LIGHT_PINK: Color = Color::from_hex(0xFFB7C5);
pub const HOT_PINK: Color = Color::from_hex(0xFF69B4);
pub const DEEP_PINK: Color = Color::from_hex(0xFF1493);

/// A fixed colour set and the rule used to draw from it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub colors: &'static [Color],
    /// Always use `colors[0]` with no jitter
    pub solid: bool,
}

pub const RIBBON_PALETTE: Palette = Palette {
    colors: &[WHITE],
    solid: true,
};

pub const DECOR_PALETTE: Palette = Palette {
    colors: &[WHITE, MISTY_ROSE],
    solid: false,
};

pub const LEAF_PALETTE: Palette = Palette {
    colors: &[WHITE, LIGHT_PINK, HOT_PINK, DEEP_PINK],
    solid: false,
};

impl Palette {
    /// Draw one instance colour: the first entry for solid palettes,
    /// otherwise a random entry with a small lightness jitter.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        let Some(first) = self.colors.first().copied() else {
            return WHITE;
        };

        if self.solid {
            return first;
        }

        let color = self.colors[rng.random_range(0..self.colors.len())];
        color.offset_lightness(random_range_f32(
            rng,
            -LIGHTNESS_JITTER,
            LIGHTNESS_JITTER,
        ))
    }
}
