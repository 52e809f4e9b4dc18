use config::{Config, ConfigError, File, FileFormat};
use raceline_navigation::TrackConfig;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Top-level application configuration, loaded from `config/default.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub track: TrackSection,
    #[serde(default)]
    pub engine: TrackConfig,
    #[serde(default)]
    pub cars: CarsSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackSection {
    /// Path to the track image the engine is built from.
    pub image: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarsSection {
    /// Number of AI cars to run.
    pub count: usize,
    /// Movement ticks per second.
    pub tick_hz: u64,
    /// How many ticks the demo runs before reporting.
    pub ticks: u64,
    /// Top speed in pixels per tick.
    pub max_speed: f32,
}

impl Default for CarsSection {
    fn default() -> Self {
        CarsSection {
            count: 2,
            tick_hz: 20,
            ticks: 600,
            max_speed: 2.6,
        }
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .build()
        .and_then(|config| config.try_deserialize::<AppConfig>());

    match settings {
        Ok(config) => {
            info!("Successfully loaded configuration: {:?}", config);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
