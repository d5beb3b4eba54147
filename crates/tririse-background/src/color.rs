//! Resolving CSS color strings to HSL.
//!
//! Accepts named colors, `#rgb`/`#rgba`/`#rrggbb`/`#rrggbbaa` hex, and the
//! `rgb()`/`rgba()`/`hsl()`/`hsla()` functions in both the legacy comma form
//! and the space-separated form with an optional `/ alpha`. Alpha is parsed
//! and then dropped. Channel values come out exactly as a browser computes
//! them: clamped, then rounded to the nearest integer.

use std::f64::consts::PI;

use lazy_static::lazy_static;
use regex::Regex;
use tririse_core::{HslColor, InvalidColorError, Rgb, hsl_to_rgb};

use crate::names;

lazy_static! {
    static ref FUNCTION_REGEX: Regex =
        Regex::new(r"(?i)^(rgba?|hsla?)\(\s*(.*?)\s*\)$").unwrap();
    static ref COMPONENT_REGEX: Regex =
        Regex::new(r"(?i)^([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:e[+-]?\d+)?)(%|deg|rad|grad|turn)?$")
            .unwrap();
}

/// One numeric argument of a color function.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Component {
    Number(f64),
    Percent(f64),
    /// An angle with an explicit unit, normalized to degrees.
    Degrees(f64),
}

/// Resolve a color string to its hue/saturation/lightness.
pub fn resolve(spec: &str) -> Result<HslColor, InvalidColorError> {
    parse_rgb(spec).map(Rgb::to_hsl)
}

/// Resolve a color string to 8-bit RGB channels.
pub fn parse_rgb(spec: &str) -> Result<Rgb, InvalidColorError> {
    let invalid = || InvalidColorError::new(spec);
    let trimmed = spec.trim();

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(invalid);
    }

    if let Some(rgb) = names::lookup(&trimmed.to_ascii_lowercase()) {
        return Ok(rgb);
    }

    let caps = FUNCTION_REGEX.captures(trimmed).ok_or_else(invalid)?;
    let function = caps[1].to_ascii_lowercase();
    let body = &caps[2];
    let channels = parse_arguments(body).ok_or_else(invalid)?;
    let legacy = body.contains(',');

    let rgb = if function.starts_with("rgb") {
        rgb_from_components(channels, legacy)
    } else {
        hsl_from_components(channels, legacy)
    };
    rgb.ok_or_else(invalid)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 | 4 => Some(Rgb::new(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 | 8 => Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

/// Split a function body into its three channel components.
///
/// The alpha argument, when present, must be a number or percentage but is
/// otherwise ignored.
fn parse_arguments(body: &str) -> Option<[Component; 3]> {
    let (channels, alpha): (Vec<&str>, Option<&str>) = if body.contains(',') {
        let mut parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let alpha = match parts.len() {
            3 => None,
            4 => parts.pop(),
            _ => return None,
        };
        (parts, alpha)
    } else {
        let mut halves = body.splitn(2, '/');
        let channels = halves.next()?.split_whitespace().collect();
        let alpha = halves.next().map(str::trim);
        (channels, alpha)
    };

    if let Some(alpha) = alpha {
        match parse_component(alpha)? {
            Component::Number(_) | Component::Percent(_) => {}
            Component::Degrees(_) => return None,
        }
    }

    match channels.as_slice() {
        [a, b, c] => Some([parse_component(a)?, parse_component(b)?, parse_component(c)?]),
        _ => None,
    }
}

fn parse_component(token: &str) -> Option<Component> {
    let caps = COMPONENT_REGEX.captures(token)?;
    let value: f64 = caps[1].parse().ok()?;
    let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());

    let component = match unit.as_deref() {
        None => Component::Number(value),
        Some("%") => Component::Percent(value),
        Some("deg") => Component::Degrees(value),
        Some("rad") => Component::Degrees(value * 180.0 / PI),
        Some("grad") => Component::Degrees(value * 0.9),
        Some("turn") => Component::Degrees(value * 360.0),
        Some(_) => return None,
    };
    Some(component)
}

/// Legacy comma syntax needs all three channels to be numbers or all three
/// to be percentages; the space syntax allows mixing.
fn rgb_from_components(channels: [Component; 3], legacy: bool) -> Option<Rgb> {
    if legacy {
        let numbers = channels.iter().all(|c| matches!(c, Component::Number(_)));
        let percents = channels.iter().all(|c| matches!(c, Component::Percent(_)));
        if !numbers && !percents {
            return None;
        }
    }

    let channel = |c: Component| {
        let value = match c {
            Component::Number(n) => n,
            Component::Percent(p) => p * 255.0 / 100.0,
            Component::Degrees(_) => return None,
        };
        Some(value.clamp(0.0, 255.0).round() as u8)
    };

    let [r, g, b] = channels;
    Some(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
}

/// Saturation and lightness must be percentages in the legacy comma syntax.
fn hsl_from_components(channels: [Component; 3], legacy: bool) -> Option<Rgb> {
    let [h, s, l] = channels;
    if legacy && !matches!((s, l), (Component::Percent(_), Component::Percent(_))) {
        return None;
    }

    let hue = match h {
        Component::Number(deg) | Component::Degrees(deg) => deg,
        Component::Percent(_) => return None,
    };
    let fraction = |c: Component| match c {
        Component::Number(v) | Component::Percent(v) => Some((v / 100.0).clamp(0.0, 1.0)),
        Component::Degrees(_) => None,
    };

    Some(hsl_to_rgb(hue, fraction(s)?, fraction(l)?))
}
