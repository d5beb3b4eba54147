//! In-memory pixel surface rendered with half-block characters.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tririse_core::{HslColor, Point, Rgb, Surface};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';

/// An RGB raster.
///
/// Shapes are sampled at pixel centers and clipped to the canvas. As a
/// ratatui widget it packs two pixel rows into every terminal row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelCanvas {
    pixels: Vec<Rgb>,
    width: u32,
    height: u32,
}

impl PixelCanvas {
    /// Create a black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![Rgb::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Canvas size that exactly covers a terminal area of `columns` x `rows`.
    pub fn size_for_cells(columns: u16, rows: u16) -> (u32, u32) {
        (u32::from(columns), u32::from(rows) * 2)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at `(x, y)`, if inside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Fill pixels `x0..x1` of row `y`, clipped to the canvas.
    fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Rgb) {
        if y < 0 || y >= i64::from(self.height) {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(i64::from(self.width));
        if x0 >= x1 {
            return;
        }

        let row = y as usize * self.width as usize;
        self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
    }
}

/// First pixel index whose center lies at or after `edge`.
fn pixel_edge(edge: f64) -> i64 {
    (edge - 0.5).ceil() as i64
}

impl Surface for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgb::default());
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: HslColor) {
        let rgb = color.to_rgb();
        let (x0, x1) = (pixel_edge(x), pixel_edge(x + width));
        for row in pixel_edge(y)..pixel_edge(y + height) {
            self.hline(x0, x1, row, rgb);
        }
    }

    fn fill_path(&mut self, points: &[Point], color: HslColor) {
        if points.len() < 3 {
            return;
        }
        let rgb = color.to_rgb();

        let (min_y, max_y) = points
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        let first_row = pixel_edge(min_y).max(0);
        let last_row = pixel_edge(max_y).min(i64::from(self.height));

        let mut crossings = Vec::with_capacity(points.len());
        for row in first_row..last_row {
            let yc = row as f64 + 0.5;
            crossings.clear();

            for (i, &(x1, y1)) in points.iter().enumerate() {
                let (x2, y2) = points[(i + 1) % points.len()];
                if (y1 <= yc && y2 > yc) || (y2 <= yc && y1 > yc) {
                    crossings.push(x1 + (yc - y1) / (y2 - y1) * (x2 - x1));
                }
            }

            crossings.sort_unstable_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                self.hline(pixel_edge(pair[0]), pixel_edge(pair[1]), row, rgb);
            }
        }
    }
}

impl Widget for &PixelCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = u32::from(col);
                let top_y = u32::from(row) * 2;
                let Some(top) = self.pixel(x, top_y) else {
                    continue;
                };
                let bottom = self.pixel(x, top_y + 1).unwrap_or(top);

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(HALF_BLOCK)
                        .set_fg(top.into())
                        .set_bg(bottom.into());
                }
            }
        }
    }
}
