//! Rising triangle field for tririse.
//!
//! This crate turns a single base color into an animated field of triangles
//! drifting upward: [`color::resolve`] derives the HSL base from any CSS color
//! string, [`Population`] owns and recycles the triangles, and
//! [`TriangleField`] drives the per-frame clear/draw/advance cycle on any
//! [`Surface`](tririse_core::Surface). [`PixelCanvas`] is an in-memory surface
//! that renders onto a ratatui buffer.

mod canvas;
pub mod color;
mod names;
mod population;
mod state;
mod triangle;

pub use canvas::PixelCanvas;
pub use population::Population;
pub use state::{DEFAULT_DENSITY, LoopState, StopHandle, TickOutcome, TriangleField};
pub use triangle::{RISE_RATE, Triangle};
