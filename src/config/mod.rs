// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Configuration module

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use crate::environment::EnvironmentParams;
use crate::error::{ForestError, ForestResult};
use crate::export::ExportFormat;
use crate::sensors::SensorParams;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level used when no CLI flag overrides it
    pub log_level: String,

    /// Run layout
    pub simulation: SimulationConfig,

    /// Series export
    pub export: ExportConfig,

    /// Ground-truth model parameters, shared by every node
    pub environment: EnvironmentParams,

    /// Sensor parameters, shared by every node
    pub sensor: SensorParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationConfig::default(),
            export: ExportConfig::default(),
            environment: EnvironmentParams::default(),
            sensor: SensorParams::default(),
        }
    }
}

impl Config {
    /// Load and validate a run configuration. Errors name the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Malformed configuration {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration {:?}", path))?;
        info!(nodes = config.simulation.nodes, "Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write the configuration as TOML, creating missing parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration {:?}", path))?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load `path`, or write the defaults there on first run.
    ///
    /// The flag is true when the file was just created.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            Ok((Self::load(path)?, false))
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok((config, true))
        }
    }

    /// Per-user directory holding `config.toml`; `./config` when the
    /// platform has no config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(crate::NAME))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Configured log level, `None` when `log_level` is not a tracing level
    pub fn parsed_log_level(&self) -> Option<Level> {
        self.log_level.parse().ok()
    }

    /// Check every section before a run starts
    pub fn validate(&self) -> ForestResult<()> {
        self.simulation.validate()?;
        self.environment.validate()?;
        self.sensor.validate()
    }
}

/// Upper bound on ticks per node
pub const MAX_TICKS_PER_NODE: u64 = u32::MAX as u64;

/// Run layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of independent nodes
    pub nodes: usize,

    /// Simulated span in hours
    pub duration_hours: f64,

    /// Simulated minutes between ticks
    pub tick_minutes: f64,

    /// Run seed; every node derives its own seeds from it. Unset means entropy.
    pub seed: Option<u64>,

    /// Risk at or above which a fire is considered present / alerted
    pub alert_threshold: f64,

    /// Keep every tick record in the report (needed for export)
    pub keep_records: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            nodes: 1,
            duration_hours: 168.0,
            tick_minutes: 6.0,
            seed: None,
            alert_threshold: 0.5,
            keep_records: true,
        }
    }
}

impl SimulationConfig {
    pub fn tick_hours(&self) -> f64 {
        self.tick_minutes / 60.0
    }

    /// Ticks in a run, counting the one at time zero. Saturates at
    /// [`MAX_TICKS_PER_NODE`]; `validate` rejects runs that would reach it.
    pub fn tick_count(&self) -> u64 {
        match self.tick_intervals() {
            Some(intervals) if intervals < MAX_TICKS_PER_NODE as f64 => intervals as u64 + 1,
            _ => MAX_TICKS_PER_NODE,
        }
    }

    /// Whole tick intervals in the run, `None` when not finite
    fn tick_intervals(&self) -> Option<f64> {
        // Nudge so float error does not drop the last tick
        let intervals = (self.duration_hours / self.tick_hours() + 1e-9).floor();
        intervals.is_finite().then_some(intervals)
    }

    pub fn validate(&self) -> ForestResult<()> {
        if self.nodes == 0 {
            return Err(ForestError::InvalidConfig("simulation: nodes must be > 0".into()));
        }
        if !(self.tick_minutes > 0.0) || !self.tick_minutes.is_finite() {
            return Err(ForestError::InvalidConfig("simulation: tick_minutes must be > 0".into()));
        }
        if !(self.duration_hours >= 0.0) || !self.duration_hours.is_finite() {
            return Err(ForestError::InvalidConfig("simulation: duration_hours must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&self.alert_threshold) {
            return Err(ForestError::InvalidConfig(
                "simulation: alert_threshold must be within [0, 1]".into(),
            ));
        }
        match self.tick_intervals() {
            Some(intervals) if intervals < MAX_TICKS_PER_NODE as f64 => Ok(()),
            _ => Err(ForestError::InvalidConfig(format!(
                "simulation: duration_hours / tick_minutes gives more than {} ticks per node",
                MAX_TICKS_PER_NODE
            ))),
        }
    }
}

/// Series export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the tick series after the run
    pub enabled: bool,

    /// Series output file
    pub path: PathBuf,

    pub format: ExportFormat,

    /// Optional JSON run report
    pub report_path: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("./data/series.csv"),
            format: ExportFormat::Csv,
            report_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.tick_count(), 1681);
        assert!((config.simulation.tick_hours() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.simulation.seed = Some(7);
        config.simulation.nodes = 4;
        config.export.format = ExportFormat::JsonLines;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let text = r#"
            [simulation]
            nodes = 3
            seed = 11

            [environment]
            rain_probability = 0.5
        "#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.simulation.nodes, 3);
        assert_eq!(config.simulation.seed, Some(11));
        assert_eq!(config.simulation.tick_minutes, 6.0);
        assert_eq!(config.environment.rain_probability, 0.5);
        assert_eq!(config.environment.base_temperature, 25.0);
        assert_eq!(config.sensor, SensorParams::default());
    }

    #[test]
    fn test_rejects_invalid_simulation() {
        let mut config = Config::default();
        config.simulation.tick_minutes = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.alert_threshold = 1.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.nodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parsed_log_level() {
        let mut config = Config::default();
        assert_eq!(config.parsed_log_level(), Some(Level::INFO));
        config.log_level = "debug".into();
        assert_eq!(config.parsed_log_level(), Some(Level::DEBUG));
        config.log_level = "chatty".into();
        assert_eq!(config.parsed_log_level(), None);
    }

    #[test]
    fn test_rejects_runaway_tick_count() {
        let sim = SimulationConfig { duration_hours: 1.0, tick_minutes: 1e-300, ..Default::default() };
        assert!(sim.validate().is_err());
        assert_eq!(sim.tick_count(), MAX_TICKS_PER_NODE);

        // Finite but far too many ticks
        let sim = SimulationConfig { duration_hours: 1e9, tick_minutes: 0.001, ..Default::default() };
        assert!(sim.validate().is_err());
        assert_eq!(sim.tick_count(), MAX_TICKS_PER_NODE);

        let sim = SimulationConfig { duration_hours: 24.0, tick_minutes: 1.0, ..Default::default() };
        assert!(sim.validate().is_ok());
        assert_eq!(sim.tick_count(), 1441);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let (created, fresh) = Config::load_or_create(&path).unwrap();
        assert!(fresh);
        assert!(path.exists());
        let (loaded, fresh) = Config::load_or_create(&path).unwrap();
        assert!(!fresh);
        assert_eq!(created, loaded);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[simulation]\nalert_threshold = 2.0\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("alert_threshold"));
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_load_names_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[simulation\nnodes = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Malformed configuration"));
        assert!(err.to_string().contains("broken.toml"));
    }
}
