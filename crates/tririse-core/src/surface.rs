//! Drawing surface abstraction.

use crate::HslColor;

/// A point on a surface, in pixels.
pub type Point = (f64, f64);

/// A 2D drawing target with mutable pixel dimensions.
///
/// Coordinates are in pixels with the origin at the top-left corner. Shapes
/// may extend past the edges; implementations clip them.
pub trait Surface {
    /// Current `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Change the pixel dimensions. Existing contents need not be preserved.
    fn resize(&mut self, width: u32, height: u32);

    /// Fill an axis-aligned rectangle with a solid color.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: HslColor);

    /// Fill the closed path through `points` with a solid color.
    fn fill_path(&mut self, points: &[Point], color: HslColor);
}
