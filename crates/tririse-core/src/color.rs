//! RGB and HSL color triples.

use std::fmt;

use ratatui::style::Color;

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to hue/saturation/lightness.
    ///
    /// The hue is rounded to the nearest whole degree. Grays (`r == g == b`)
    /// come out with hue and saturation both zero.
    pub fn to_hsl(self) -> HslColor {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return HslColor::new(0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        HslColor::new((h * 60.0).round() as i32, s, l)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

/// A hue/saturation/lightness color.
///
/// Hue is a whole number of degrees in `0..360`; saturation and lightness are
/// fractions clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    hue: u16,
    saturation: f64,
    lightness: f64,
}

impl HslColor {
    /// Create a color, wrapping the hue into `0..360` and clamping the
    /// saturation and lightness into `[0, 1]`.
    pub fn new(hue: i32, saturation: f64, lightness: f64) -> Self {
        Self {
            hue: hue.rem_euclid(360) as u16,
            saturation: saturation.clamp(0.0, 1.0),
            lightness: lightness.clamp(0.0, 1.0),
        }
    }

    pub fn hue(self) -> u16 {
        self.hue
    }

    pub fn saturation(self) -> f64 {
        self.saturation
    }

    pub fn lightness(self) -> f64 {
        self.lightness
    }

    /// The same hue and saturation at a different lightness.
    pub fn with_lightness(self, lightness: f64) -> Self {
        Self::new(i32::from(self.hue), self.saturation, lightness)
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(f64::from(self.hue), self.saturation, self.lightness)
    }
}

impl fmt::Display for HslColor {
    /// Formats as a CSS `hsl()` string, e.g. `hsl(210, 47.5%, 58.8%)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue,
            self.saturation * 100.0,
            self.lightness * 100.0
        )
    }
}

impl From<HslColor> for Color {
    fn from(hsl: HslColor) -> Self {
        hsl.to_rgb().into()
    }
}

/// Convert HSL to RGB, rounding each channel to the nearest integer.
///
/// `h` is in degrees and may lie outside `0..360`; `s` and `l` are fractions.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let to_channel = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;

    if s == 0.0 {
        let v = to_channel(l);
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h.rem_euclid(360.0) / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
