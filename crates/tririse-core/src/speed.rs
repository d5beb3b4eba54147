//! Animation speed presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How fast triangles rise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl AnimationSpeed {
    /// Multiplier applied to each triangle's per-tick rise.
    pub fn rise_multiplier(self) -> f64 {
        match self {
            AnimationSpeed::Slow => 0.5,
            AnimationSpeed::Medium => 1.0,
            AnimationSpeed::Fast => 2.0,
        }
    }

    /// Cycle to the next faster speed, wrapping around.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Medium,
            AnimationSpeed::Medium => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }

    /// Cycle to the next slower speed, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Fast,
            AnimationSpeed::Medium => AnimationSpeed::Slow,
            AnimationSpeed::Fast => AnimationSpeed::Medium,
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Medium => "medium",
            AnimationSpeed::Fast => "fast",
        };
        f.write_str(name)
    }
}

impl FromStr for AnimationSpeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "medium" => Ok(AnimationSpeed::Medium),
            "fast" => Ok(AnimationSpeed::Fast),
            other => Err(format!("unknown speed {other:?} (expected slow, medium or fast)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_base_rate() {
        assert_eq!(AnimationSpeed::default().rise_multiplier(), 1.0);
    }

    #[test]
    fn test_cycle() {
        let mut speed = AnimationSpeed::Slow;
        for _ in 0..3 {
            speed = speed.next();
        }
        assert_eq!(speed, AnimationSpeed::Slow);
        assert_eq!(AnimationSpeed::Slow.prev(), AnimationSpeed::Fast);
        assert_eq!(AnimationSpeed::Fast.next().prev(), AnimationSpeed::Fast);
    }

    #[test]
    fn test_parse_round_trip() {
        for speed in [AnimationSpeed::Slow, AnimationSpeed::Medium, AnimationSpeed::Fast] {
            assert_eq!(speed.to_string().parse::<AnimationSpeed>(), Ok(speed));
        }
        assert_eq!("FAST".parse::<AnimationSpeed>(), Ok(AnimationSpeed::Fast));
        assert!("warp".parse::<AnimationSpeed>().is_err());
    }
}
