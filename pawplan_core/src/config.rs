//! Configuration file support for PawPlan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/pawplan/config.toml`.
//! Every section and field is optional.

use crate::pricing::{PricingInput, PricingStrategy, DEFAULT_ROUNDING_STEP};
use crate::tally::Band;
use crate::types::Placement;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tally: TallyConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub program: ProgramConfig,
}

/// Estimation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(default = "default_session_duration")]
    pub session_duration_minutes: u32,

    #[serde(default)]
    pub band: Band,

    #[serde(default = "default_placements")]
    pub placements: Vec<Placement>,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            session_duration_minutes: default_session_duration(),
            band: Band::default(),
            placements: default_placements(),
        }
    }
}

/// Quote settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub strategy: PricingStrategy,

    #[serde(default = "default_midpoint_margin")]
    pub midpoint_margin_percent: f64,

    #[serde(default = "default_high_weight")]
    pub weighted_high_weight_percent: f64,

    #[serde(default)]
    pub weighted_margin_percent: f64,

    #[serde(default = "default_session_rate")]
    pub session_rate: f64,

    #[serde(default)]
    pub home_sessions: f64,

    #[serde(default)]
    pub travel_distance_km: f64,

    #[serde(default = "default_travel_rate")]
    pub travel_rate_per_km: f64,

    #[serde(default = "default_rounding_step")]
    pub rounding_step: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            strategy: PricingStrategy::default(),
            midpoint_margin_percent: default_midpoint_margin(),
            weighted_high_weight_percent: default_high_weight(),
            weighted_margin_percent: 0.0,
            session_rate: default_session_rate(),
            home_sessions: 0.0,
            travel_distance_km: 0.0,
            travel_rate_per_km: default_travel_rate(),
            rounding_step: default_rounding_step(),
        }
    }
}

impl PricingConfig {
    /// Pricing input for an estimated session range
    pub fn input_for(&self, band_low: f64, band_high: f64) -> PricingInput {
        PricingInput {
            band_low,
            band_high,
            strategy: self.strategy,
            midpoint_margin_percent: self.midpoint_margin_percent,
            weighted_high_weight_percent: self.weighted_high_weight_percent,
            weighted_margin_percent: self.weighted_margin_percent,
            session_rate: self.session_rate,
            home_sessions: self.home_sessions,
            travel_distance_km: self.travel_distance_km,
            travel_rate_per_km: self.travel_rate_per_km,
        }
    }
}

/// Export document settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub include_price_in_program: bool,

    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_price_in_program: true,
            date_format: default_date_format(),
            output_dir: default_output_dir(),
        }
    }
}

/// Working program document
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ProgramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<PathBuf>,
}

// Default value functions
fn default_session_duration() -> u32 {
    60
}

fn default_placements() -> Vec<Placement> {
    vec![Placement::Elementary]
}

fn default_midpoint_margin() -> f64 {
    15.0
}

fn default_high_weight() -> f64 {
    65.0
}

fn default_session_rate() -> f64 {
    85.0
}

fn default_travel_rate() -> f64 {
    0.23
}

fn default_rounding_step() -> f64 {
    DEFAULT_ROUNDING_STEP
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%d-%m-%Y".into()
}

fn home_dir_fallback(relative: &str) -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(relative))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_output_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| home_dir_fallback(".local/share"));
    base.join("pawplan")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings that would make every estimate meaningless
    pub fn validate(&self) -> Result<()> {
        if self.tally.session_duration_minutes == 0 {
            return Err(Error::Config(
                "tally.session_duration_minutes must be at least 1".into(),
            ));
        }
        if self.tally.placements.is_empty() {
            return Err(Error::Config(
                "tally.placements must name at least one placement".into(),
            ));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| home_dir_fallback(".config"));
        base.join("pawplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
