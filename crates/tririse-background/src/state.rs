//! The per-frame render loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use tririse_core::{AnimationSpeed, HslColor, InvalidColorError, Surface};

pub use tririse_core::DEFAULT_DENSITY;

use crate::color;
use crate::population::Population;

/// Whether the loop is drawing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule another tick for the next frame.
    Continue,
    /// The loop is stopped; nothing was drawn.
    Stopped,
}

/// Cancellation token for a [`TriangleField`].
///
/// Clones share the same flag and may be moved to other threads.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the loop to stop before its next frame.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Animated field of triangles rising over a solid background.
///
/// Construction resolves the base color, seeds the population and starts the
/// loop. The host then calls [`tick`](Self::tick) once per displayed frame
/// for as long as it returns [`TickOutcome::Continue`].
#[derive(Debug)]
pub struct TriangleField<S, R = StdRng> {
    surface: S,
    base_color: HslColor,
    population: Population<R>,
    state: LoopState,
    stop: StopHandle,
}

impl<S: Surface> TriangleField<S> {
    /// Create a running field over `surface`, seeded from system entropy.
    pub fn new(surface: S, base_color: &str, density: usize) -> Result<Self, InvalidColorError> {
        Self::with_rng(surface, base_color, density, StdRng::from_entropy())
    }
}

impl<S: Surface, R: Rng> TriangleField<S, R> {
    /// Create a running field whose randomness comes from `rng`.
    pub fn with_rng(
        surface: S,
        base_color: &str,
        density: usize,
        rng: R,
    ) -> Result<Self, InvalidColorError> {
        let base = color::resolve(base_color)?;
        let (width, height) = surface.size();

        let mut field = Self {
            surface,
            base_color: base,
            population: Population::with_rng(density, base, width, height, rng),
            state: LoopState::Running,
            stop: StopHandle::default(),
        };
        field.clear_frame();

        debug!(base = %base, density, width, height, "triangle field started");
        Ok(field)
    }

    /// Draw one frame and advance the animation.
    ///
    /// Paints the background, draws every triangle in order, then ages the
    /// population. A stop requested through [`stop`](Self::stop) or a
    /// [`StopHandle`] takes effect here, before anything is drawn.
    pub fn tick(&mut self) -> TickOutcome {
        if self.stop.is_stopped() {
            if self.state == LoopState::Running {
                debug!("triangle field stopped");
            }
            self.state = LoopState::Stopped;
        }
        if self.state == LoopState::Stopped {
            return TickOutcome::Stopped;
        }

        self.clear_frame();
        for triangle in self.population.triangles() {
            triangle.draw(&mut self.surface);
        }
        self.population.advance();

        TickOutcome::Continue
    }

    /// Switch to a new base color and restart the animation around it.
    ///
    /// On error nothing changes.
    pub fn change_color(&mut self, spec: &str) -> Result<(), InvalidColorError> {
        let base = color::resolve(spec)?;
        self.base_color = base;
        self.population.set_base_color(base);

        debug!(base = %base, "base color changed");
        self.reset();
        Ok(())
    }

    /// Resize the surface and restart the animation at the new size.
    ///
    /// Triangle sizes depend on the surface width, so the old population is
    /// discarded rather than repositioned.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!(width, height, "surface resized");
        self.surface.resize(width, height);
        self.reset();
    }

    /// Re-seed the population at the current surface size and repaint the
    /// background.
    pub fn reset(&mut self) {
        let (width, height) = self.surface.size();
        self.population.reset(width, height);
        self.clear_frame();
    }

    /// Stop drawing frames until [`start`](Self::start) is called.
    pub fn stop(&mut self) {
        self.stop.stop();
        if self.state == LoopState::Running {
            debug!("triangle field stopped");
        }
        self.state = LoopState::Stopped;
    }

    /// Resume a stopped loop. The population picks up where it left off.
    pub fn start(&mut self) {
        self.stop.clear();
        if self.state == LoopState::Stopped {
            debug!("triangle field started");
        }
        self.state = LoopState::Running;
    }

    /// A token that stops this field from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running && !self.stop.is_stopped()
    }

    pub fn base_color(&self) -> HslColor {
        self.base_color
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn population(&self) -> &Population<R> {
        &self.population
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.population.set_speed(speed.rise_multiplier());
    }

    fn clear_frame(&mut self) {
        let (width, height) = self.surface.size();
        self.surface.fill_rect(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
            self.base_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tririse_core::Point;

    /// A surface that records every draw call.
    #[derive(Debug, Default)]
    struct Recorder {
        width: u32,
        height: u32,
        rects: Vec<(f64, f64, f64, f64, HslColor)>,
        paths: Vec<(Vec<Point>, HslColor)>,
    }

    impl Recorder {
        fn sized(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ..Default::default()
            }
        }

        fn clear(&mut self) {
            self.rects.clear();
            self.paths.clear();
        }
    }

    impl Surface for Recorder {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.width = width;
            self.height = height;
        }

        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: HslColor) {
            self.rects.push((x, y, width, height, color));
        }

        fn fill_path(&mut self, points: &[Point], color: HslColor) {
            self.paths.push((points.to_vec(), color));
        }
    }

    fn field(spec: &str, density: usize) -> TriangleField<Recorder> {
        TriangleField::with_rng(
            Recorder::sized(200, 100),
            spec,
            density,
            StdRng::seed_from_u64(42),
        )
        .unwrap()
    }

    #[test]
    fn test_new_starts_running_and_paints_background() {
        let field = field("rgb(100, 150, 200)", 3);
        assert_eq!(field.state(), LoopState::Running);
        assert_eq!(field.population().len(), 3);
        let base = field.base_color();
        assert_eq!(field.surface().rects, vec![(0.0, 0.0, 200.0, 100.0, base)]);
    }

    #[test]
    fn test_new_rejects_bad_color() {
        let err = TriangleField::new(Recorder::sized(10, 10), "nope", 5).unwrap_err();
        assert_eq!(err.input(), "nope");
    }

    #[test]
    fn test_default_density() {
        let field = field("teal", DEFAULT_DENSITY);
        assert_eq!(field.population().len(), 150);
    }

    #[test]
    fn test_tick_clears_draws_then_advances() {
        let mut field = field("rgb(100, 150, 200)", 3);
        field.surface.clear();
        let before = field.population().triangles().to_vec();

        assert_eq!(field.tick(), TickOutcome::Continue);

        let surface = field.surface();
        assert_eq!(surface.rects.len(), 1);
        assert_eq!(surface.rects[0].4, field.base_color());
        assert_eq!(surface.paths.len(), 3);
        for (triangle, (points, color)) in before.iter().zip(&surface.paths) {
            assert_eq!(points.as_slice(), triangle.vertices().as_slice());
            assert_eq!(*color, triangle.color);
        }
        for (old, new) in before.iter().zip(field.population().triangles()) {
            if !old.is_expired() {
                assert!(new.y < old.y);
            }
        }
    }

    #[test]
    fn test_change_color_recenters_band() {
        let mut field = field("hsl(0, 50%, 20%)", 40);
        field.change_color("hsl(120, 50%, 80%)").unwrap();

        let base = field.base_color();
        assert_eq!(base.hue(), 120);
        for t in field.population().triangles() {
            assert_eq!(t.color.hue(), 120);
            assert!((t.color.lightness() - base.lightness()).abs() <= 0.05 + 1e-9);
        }
        assert_eq!(field.surface().rects.last().map(|r| r.4), Some(base));
    }

    #[test]
    fn test_change_color_error_keeps_state() {
        let mut field = field("red", 5);
        let before = field.population().triangles().to_vec();
        assert!(field.change_color("rgb(nope)").is_err());
        assert_eq!(field.base_color().hue(), 0);
        assert_eq!(field.population().triangles(), before.as_slice());
    }

    #[test]
    fn test_resize_resets_population() {
        let mut field = field("navy", 20);
        field.resize(1000, 50);
        assert_eq!(field.surface().size(), (1000, 50));
        assert_eq!(field.population().bounds(), (1000.0, 50.0));
        assert_eq!(field.population().len(), 20);
        assert!(field.population().triangles().iter().all(|t| t.width >= 30.0));
    }

    #[test]
    fn test_stop_and_start() {
        let mut field = field("olive", 4);
        field.stop();
        field.surface.clear();
        assert_eq!(field.tick(), TickOutcome::Stopped);
        assert!(field.surface().rects.is_empty());
        assert!(!field.is_running());

        field.start();
        assert_eq!(field.tick(), TickOutcome::Continue);
        assert_eq!(field.surface().rects.len(), 1);
    }

    #[test]
    fn test_stop_handle_from_another_thread() {
        let mut field = field("olive", 4);
        let handle = field.stop_handle();
        std::thread::spawn(move || handle.stop()).join().unwrap();

        assert!(!field.is_running());
        assert_eq!(field.tick(), TickOutcome::Stopped);
        assert_eq!(field.state(), LoopState::Stopped);

        field.start();
        assert!(field.is_running());
        assert!(!field.stop_handle().is_stopped());
    }

    #[test]
    fn test_set_speed() {
        let mut field = field("olive", 1);
        field.set_speed(AnimationSpeed::Fast);
        let before = field.population().triangles()[0].clone();
        field.tick();
        let after = &field.population().triangles()[0];
        if !before.is_expired() {
            assert!((before.y - after.y - before.height * 0.002).abs() < 1e-12);
        }
    }
}
