//! Core types shared by the tririse crates.
//!
//! Holds the color model (RGB and HSL triples plus the conversions between
//! them), the drawing [`Surface`] abstraction the triangle field paints onto,
//! and the small enums the host and configuration layers agree on.

mod color;
mod error;
mod speed;
mod surface;

pub use color::{HslColor, Rgb, hsl_to_rgb};
pub use error::InvalidColorError;
pub use speed::AnimationSpeed;
pub use surface::{Point, Surface};

/// Number of live triangles when the caller has no preference.
pub const DEFAULT_DENSITY: usize = 150;
