//! The fixed-size set of live triangles.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, trace};
use tririse_core::HslColor;

use crate::triangle::Triangle;

/// Smallest triangle base, as a fraction of the surface width.
const MIN_WIDTH_RATIO: f64 = 0.03;
/// Largest triangle base, as a fraction of the surface width.
const MAX_WIDTH_RATIO: f64 = 0.25;
/// Half-width of the lightness band around the base color.
const LIGHTNESS_WAVE: f64 = 0.05;
/// Slack for float noise when snapping bounds to integers.
const EPSILON: f64 = 1e-9;

/// Owns exactly `density` triangles and keeps them cycling.
#[derive(Debug)]
pub struct Population<R = StdRng> {
    triangles: Vec<Triangle>,
    density: usize,
    base_color: HslColor,
    width: f64,
    height: f64,
    speed: f64,
    rng: R,
}

impl<R: Rng> Population<R> {
    /// Create a population drawing from `rng`, already scattered across a
    /// `width` x `height` surface.
    pub fn with_rng(
        density: usize,
        base_color: HslColor,
        width: u32,
        height: u32,
        rng: R,
    ) -> Self {
        let mut population = Self {
            triangles: Vec::with_capacity(density),
            density,
            base_color,
            width: f64::from(width),
            height: f64::from(height),
            speed: 1.0,
            rng,
        };
        population.reset(width, height);
        population
    }

    /// Discard every triangle and scatter `density` new ones over the surface,
    /// including a one-triangle margin above and below.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);

        let (w, h) = (self.width, self.height);
        let triangles = (0..self.density)
            .map(|_| self.create_triangle(w, h, false))
            .collect();
        self.triangles = triangles;

        debug!(width, height, density = self.density, "population reset");
    }

    /// Generate a triangle sized relative to a `width` x `height` surface.
    ///
    /// With `from_bottom` the apex sits exactly on the bottom edge; otherwise
    /// it lands anywhere from one triangle-height above the top to one below
    /// the bottom.
    pub fn create_triangle(&mut self, width: f64, height: f64, from_bottom: bool) -> Triangle {
        let side = random_int(
            &mut self.rng,
            width * MIN_WIDTH_RATIO,
            width * MAX_WIDTH_RATIO,
        );
        let mut triangle = Triangle::new(self.random_color(), side, 0.0, height);

        triangle.x = random_int(&mut self.rng, -side / 2.0, width + side / 2.0);
        if !from_bottom {
            triangle.y = random_int(
                &mut self.rng,
                -triangle.height,
                height + triangle.height,
            );
        }
        triangle
    }

    /// Pick a color near the base: same hue and saturation, lightness within
    /// ±0.05 (clamped to `[0, 1]`) in steps of 0.01.
    pub fn random_color(&mut self) -> HslColor {
        let base = self.base_color.lightness();
        let min = (base - LIGHTNESS_WAVE).max(0.0);
        let max = (base + LIGHTNESS_WAVE).min(1.0);

        let lightness = random_int(&mut self.rng, min * 100.0, max * 100.0) / 100.0;
        self.base_color.with_lightness(lightness)
    }

    /// Age the population by one tick.
    ///
    /// Expired triangles are swapped in place for fresh ones entering at the
    /// bottom, then every triangle rises, including the fresh ones. Returns
    /// how many triangles were recycled.
    pub fn advance(&mut self) -> usize {
        let (width, height) = (self.width, self.height);
        let mut recycled = 0;

        let current = std::mem::take(&mut self.triangles);
        let next: Vec<Triangle> = current
            .into_iter()
            .map(|triangle| {
                let mut triangle = if triangle.is_expired() {
                    recycled += 1;
                    self.create_triangle(width, height, true)
                } else {
                    triangle
                };
                triangle.rise(self.speed);
                triangle
            })
            .collect();
        self.triangles = next;

        if recycled > 0 {
            trace!(recycled, "recycled expired triangles");
        }
        recycled
    }

    /// Replace the base color used for new triangles. Existing triangles keep
    /// their colors until the next reset.
    pub fn set_base_color(&mut self, base_color: HslColor) {
        self.base_color = base_color;
    }

    /// Scale every triangle's rise per tick.
    pub fn set_speed(&mut self, multiplier: f64) {
        self.speed = multiplier;
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn density(&self) -> usize {
        self.density
    }

    pub fn base_color(&self) -> HslColor {
        self.base_color
    }

    /// Surface size the population was last reset for.
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// A uniformly random integer in `[min, max]`, as `f64`.
///
/// An empty range (a degenerate surface) yields `floor(max)`.
fn random_int<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    let lo = (min - EPSILON).ceil() as i64;
    let hi = (max + EPSILON).floor() as i64;
    if hi <= lo {
        return hi as f64;
    }
    rng.gen_range(lo..=hi) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    const SQRT3_2: f64 = 0.866_025_403_784_438_6;

    fn base() -> HslColor {
        HslColor::new(210, 0.5, 0.5)
    }

    fn seeded(density: usize, width: u32, height: u32, seed: u64) -> Population {
        Population::with_rng(density, base(), width, height, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_reset_fills_to_density() {
        let mut population = seeded(150, 800, 600, 1);
        assert_eq!(population.len(), 150);
        assert_eq!(population.density(), 150);
        assert_eq!(population.base_color(), base());
        population.reset(400, 300);
        assert_eq!(population.len(), 150);
        assert_eq!(population.bounds(), (400.0, 300.0));
    }

    #[test]
    fn test_reset_scatters_within_margin() {
        let population = seeded(200, 800, 600, 2);
        for t in population.triangles() {
            assert!(t.y >= -t.height - 1.0 && t.y <= 600.0 + t.height + 1.0);
            assert!(t.x >= -t.width / 2.0 - 1.0 && t.x <= 800.0 + t.width / 2.0 + 1.0);
        }
    }

    #[test]
    fn test_create_from_bottom() {
        let mut population = seeded(1, 200, 100, 3);
        for _ in 0..50 {
            let t = population.create_triangle(200.0, 100.0, true);
            assert_eq!(t.y, 100.0);
            assert!((6.0..=50.0).contains(&t.width));
            assert_eq!(t.width.fract(), 0.0);
            assert_eq!(t.x.fract(), 0.0);
        }
    }

    #[test]
    fn test_random_color_stays_in_band() {
        let mut population = seeded(1, 100, 100, 4);
        for _ in 0..200 {
            let color = population.random_color();
            assert_eq!(color.hue(), 210);
            assert_eq!(color.saturation(), 0.5);
            assert!(color.lightness() >= 0.45 - 1e-9 && color.lightness() <= 0.55 + 1e-9);
            let steps = color.lightness() * 100.0;
            assert!((steps - steps.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_color_band_is_clamped() {
        let mut population = seeded(1, 100, 100, 5);
        population.set_base_color(HslColor::new(0, 1.0, 0.98));
        for _ in 0..200 {
            let l = population.random_color().lightness();
            assert!((0.93 - 1e-9..=1.0).contains(&l));
        }
        population.set_base_color(HslColor::new(0, 1.0, 0.0));
        for _ in 0..200 {
            assert!(population.random_color().lightness() <= 0.05 + 1e-9);
        }
    }

    #[test]
    fn test_advance_rises_by_own_height() {
        let mut population = seeded(10, 400, 400, 6);
        // push everything well on screen so nothing recycles
        for t in &mut population.triangles {
            t.y = 200.0;
        }
        let before = population.triangles().to_vec();
        assert_eq!(population.advance(), 0);
        for (old, new) in before.iter().zip(population.triangles()) {
            assert!((old.y - new.y - old.height * 0.001).abs() < 1e-12);
            assert_eq!(old.x, new.x);
        }
    }

    #[test]
    fn test_advance_recycles_in_place() {
        let mut population = seeded(3, 200, 100, 7);
        for t in &mut population.triangles {
            t.y = 50.0;
        }
        let expired_height = population.triangles[1].height;
        population.triangles[1].y = -expired_height - 0.5;
        let kept = population.triangles[0].clone();

        assert_eq!(population.advance(), 1);
        assert_eq!(population.len(), 3);

        let fresh = &population.triangles()[1];
        // spawned flush with the bottom, then risen once in the same tick
        assert!((fresh.y + fresh.height * 0.001 - 100.0).abs() < 1e-9);
        assert_eq!(population.triangles()[0].x, kept.x);
    }

    #[test]
    fn test_speed_scales_rise() {
        let mut population = seeded(1, 400, 400, 8);
        population.triangles[0].y = 200.0;
        population.set_speed(2.0);
        population.advance();
        let t = &population.triangles()[0];
        assert!((200.0 - t.y - t.height * 0.002).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_surface() {
        let mut population = seeded(5, 0, 0, 9);
        assert_eq!(population.len(), 5);
        for t in population.triangles() {
            assert_eq!(t.width, 0.0);
            assert_eq!(t.height, 0.0);
        }
        population.advance();
        assert_eq!(population.len(), 5);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut population = seeded(3, 200, 100, 10);
        assert_eq!(population.len(), 3);
        for t in population.triangles() {
            assert!((6.0..=50.0).contains(&t.width));
            assert!((t.height - t.width * SQRT3_2).abs() < 1e-9);
        }

        // run until something wraps around the top
        let mut recycled = 0;
        for _ in 0..200_000 {
            recycled += population.advance();
            assert_eq!(population.len(), 3);
            if recycled > 0 {
                break;
            }
        }
        assert!(recycled > 0);
        assert!(population.triangles().iter().any(|t| t.y > 99.0));
    }

    proptest! {
        #[test]
        fn prop_population_invariants(
            density in 1usize..40,
            width in 1u32..2000,
            height in 1u32..2000,
            seed in any::<u64>(),
            ticks in 0usize..50,
        ) {
            let mut population = seeded(density, width, height, seed);
            for _ in 0..ticks {
                population.advance();
            }
            prop_assert_eq!(population.len(), density);
            for t in population.triangles() {
                prop_assert!((t.height - t.width * SQRT3_2).abs() < 1e-9);
                prop_assert!(t.width <= f64::from(width) * 0.25 + 1e-9);
            }
        }
    }
}
