//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use tririse_config::{Config, ConfigError};
use tririse_core::AnimationSpeed;

/// Colored triangles rising through your terminal.
///
/// Flags override the config file for this run only.
#[derive(Debug, Parser)]
#[command(name = "tririse", version, about)]
pub struct Cli {
    /// Base color: a CSS name, #hex, rgb() or hsl()
    #[arg(short, long)]
    pub color: Option<String>,

    /// Number of triangles on screen
    #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub density: Option<usize>,

    /// Frames per second
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: Option<u32>,

    /// Rise speed: slow, medium or fast
    #[arg(short, long)]
    pub speed: Option<AnimationSpeed>,

    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append tracing output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Hide the status line
    #[arg(long)]
    pub no_status: bool,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Load the config file and apply the flags on top.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(color) = &self.color {
            config.color = color.clone();
        }
        if let Some(density) = self.density {
            config.density = density;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = Some(log_file.clone());
        }
        if self.no_status {
            config.show_status = false;
        }
    }
}
