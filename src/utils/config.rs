use crate::presentation::TextChart;
use crate::volume::{AccumulationStrategy, Quadrature, VolumeAggregator};
use crate::volume::quadrature::{DEFAULT_SUBDIVISION_LIMIT, DEFAULT_TOLERANCE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "FLOOD_MONITOR_CONFIG";

/// Config path used when the environment variable is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main configuration structure
///
/// Covers how the pipeline runs and reports, never the flow model itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub integration: IntegrationConfig,
    pub chart: ChartConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub output: String,
    /// Empty for stderr
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            output: "pretty".to_string(),
            file_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub strategy: AccumulationStrategy,
    pub tolerance: f64,
    pub subdivision_limit: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            strategy: AccumulationStrategy::Direct,
            tolerance: DEFAULT_TOLERANCE,
            subdivision_limit: DEFAULT_SUBDIVISION_LIMIT,
        }
    }
}

impl IntegrationConfig {
    pub fn aggregator(&self) -> VolumeAggregator {
        VolumeAggregator::new(
            Quadrature::new(self.tolerance, self.subdivision_limit),
            self.strategy,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        let chart = TextChart::default();
        Self {
            width: chart.width(),
            height: chart.height(),
        }
    }
}

impl ChartConfig {
    pub fn chart(&self) -> TextChart {
        TextChart::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variable or default path
    ///
    /// A missing default file yields built-in defaults; a missing file named
    /// by the environment variable is an error.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.integration.tolerance > 0.0 && self.integration.tolerance.is_finite()) {
            anyhow::bail!("integration.tolerance must be positive, got {}", self.integration.tolerance);
        }
        if self.integration.subdivision_limit == 0 {
            anyhow::bail!("integration.subdivision_limit must be at least 1");
        }
        match self.logging.output.as_str() {
            "pretty" | "json" => Ok(()),
            other => anyhow::bail!("logging.output must be \"pretty\" or \"json\", got {other:?}"),
        }
    }
}
