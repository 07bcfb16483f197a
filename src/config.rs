use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use iced::Color;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const PARAMETERS_FILE: &str = "parameters.json";

pub const PARTICLE_COUNT: i32 = 80;
pub const ATTRACTION_RADIUS: f32 = 200.0;
pub const ATTRACTION_GAIN: f32 = 0.00005;
pub const DAMPING: f32 = 0.999;
pub const CONNECTION_RADIUS: f32 = 150.0;
pub const MAX_EDGE_ALPHA: f32 = 0.15;

/// Tunables of the particle network. Every field falls back to its default
/// when missing from `parameters.json`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub particle_count: i32,
    pub attraction_radius: f32,
    pub attraction_gain: f32,
    pub damping: f32,
    pub connection_radius: f32,
    pub max_edge_alpha: f32,
    pub edge_width: f32,
    pub color: [u8; 3],
    pub background: [u8; 3],
    pub frame_interval_ms: u64,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            particle_count: PARTICLE_COUNT,
            attraction_radius: ATTRACTION_RADIUS,
            attraction_gain: ATTRACTION_GAIN,
            damping: DAMPING,
            connection_radius: CONNECTION_RADIUS,
            max_edge_alpha: MAX_EDGE_ALPHA,
            edge_width: 0.5,
            color: [0, 229, 199],
            background: [10, 10, 15],
            frame_interval_ms: 16,
        }
    }
}

impl Parameters {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Dot and edge color at the given opacity.
    pub fn color(&self, alpha: f32) -> Color {
        let [r, g, b] = self.color;
        Color::from_rgba8(r, g, b, alpha)
    }

    pub fn background(&self) -> Color {
        let [r, g, b] = self.background;
        Color::from_rgb8(r, g, b)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

async fn read(path: &Path) -> Result<Parameters> {
    let text = tokio::fs::read_to_string(path).await?;
    Parameters::parse(&text)
}

/// Loads parameters from `path`, falling back to the defaults when the file
/// is absent or unusable.
pub async fn load(path: PathBuf) -> Parameters {
    match read(&path).await {
        Ok(parameters) => {
            tracing::info!("Loaded parameters from {}", path.display());
            parameters
        }
        Err(Error::Io(err)) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("No {} found, using defaults", path.display());
            Parameters::default()
        }
        Err(err) => {
            tracing::warn!("Ignoring {}: {}", path.display(), err);
            Parameters::default()
        }
    }
}
