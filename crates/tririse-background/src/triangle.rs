//! A single rising triangle.

use tririse_core::{HslColor, Point, Surface};

/// Fraction of its own height a triangle rises each tick.
///
/// Rise speed scales with size, so large triangles overtake small ones.
pub const RISE_RATE: f64 = 0.001;

/// An upward-pointing equilateral triangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// Fill color.
    pub color: HslColor,
    /// Length of the base.
    pub width: f64,
    /// Distance from apex to base, always `width * √3 / 2`.
    pub height: f64,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Apex position; decreases as the triangle rises.
    pub y: f64,
}

impl Triangle {
    /// Create an equilateral triangle with the given base width.
    pub fn new(color: HslColor, width: f64, x: f64, y: f64) -> Self {
        Self {
            color,
            width,
            height: width * 3f64.sqrt() / 2.0,
            x,
            y,
        }
    }

    /// Apex, bottom-left and bottom-right corners.
    pub fn vertices(&self) -> [Point; 3] {
        [
            (self.x + self.width / 2.0, self.y),
            (self.x, self.y + self.height),
            (self.x + self.width, self.y + self.height),
        ]
    }

    /// Whether the triangle has fully left the top of the surface.
    pub fn is_expired(&self) -> bool {
        self.y < -self.height
    }

    /// Move up by one tick's worth, scaled by `multiplier`.
    pub fn rise(&mut self, multiplier: f64) {
        self.y -= self.height * RISE_RATE * multiplier;
    }

    /// Paint the triangle as a solid closed path.
    pub fn draw<S: Surface>(&self, surface: &mut S) {
        surface.fill_path(&self.vertices(), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(y: f64) -> Triangle {
        Triangle::new(HslColor::new(200, 0.5, 0.5), 20.0, 10.0, y)
    }

    #[test]
    fn test_equilateral() {
        let t = triangle(0.0);
        assert!((t.height - 20.0 * 0.866_025_403_784_438_6).abs() < 1e-9);
    }

    #[test]
    fn test_vertices() {
        let t = triangle(5.0);
        let [apex, left, right] = t.vertices();
        assert_eq!(apex, (20.0, 5.0));
        assert_eq!(left, (10.0, 5.0 + t.height));
        assert_eq!(right, (30.0, 5.0 + t.height));
    }

    #[test]
    fn test_expiry_boundary() {
        let t = triangle(0.0);
        assert!(!triangle(-t.height).is_expired());
        assert!(triangle(-t.height - 0.01).is_expired());
    }

    #[test]
    fn test_rise() {
        let mut t = triangle(100.0);
        t.rise(1.0);
        assert!((t.y - (100.0 - t.height * RISE_RATE)).abs() < 1e-12);
        t.rise(2.0);
        assert!((t.y - (100.0 - t.height * RISE_RATE * 3.0)).abs() < 1e-12);
    }
}
