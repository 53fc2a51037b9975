// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Ground-truth model parameters

use serde::{Deserialize, Serialize};

use crate::error::{ForestError, ForestResult};
use crate::risk::FireRiskModel;

/// Tunable constants of the ground-truth weather model.
///
/// `Default` reproduces the reference forest node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentParams {
    /// Baseline air temperature in °C
    pub base_temperature: f64,

    /// Baseline relative humidity in %
    pub base_humidity: f64,

    /// Soil moisture at the start of the run (%)
    pub initial_soil_moisture: f64,

    /// Fraction of soil moisture evaporated per humidity update while dry
    pub evaporation_rate: f64,

    /// Chance that a rain check starts (or continues) rain
    pub rain_probability: f64,

    /// Inclusive range rain intensity is drawn from
    pub rain_intensity_range: (f64, f64),

    /// Rain is re-rolled when `time_of_day % period < window`
    pub rain_check_period_hours: f64,
    pub rain_check_window_hours: f64,

    /// Std-dev of the temperature weather noise (°C)
    pub temperature_noise: f64,

    /// Std-dev of the humidity weather noise (%)
    pub humidity_noise: f64,

    /// Cooling at full rain intensity (°C)
    pub rain_cooling: f64,

    /// Cooling from evaporation of saturated soil (°C)
    pub soil_cooling: f64,

    /// Soil moisture above which evaporative cooling starts (%)
    pub soil_cooling_onset: f64,

    pub daily_temperature_amplitude: f64,
    pub seasonal_temperature_amplitude: f64,
    pub daily_humidity_amplitude: f64,

    /// Humidity drop per °C above the baseline temperature
    pub humidity_temperature_coupling: f64,

    /// Humidity added at full rain intensity (%)
    pub rain_humidity_boost: f64,

    /// Soil moisture added per humidity update at full rain intensity (%)
    pub rain_soil_gain: f64,

    /// Share of soil moisture that shows up as air humidity
    pub soil_humidity_factor: f64,

    /// Ground-truth fire-risk estimator
    pub fire_risk: FireRiskModel,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            base_temperature: 25.0,
            base_humidity: 70.0,
            initial_soil_moisture: 50.0,
            evaporation_rate: 0.1,
            rain_probability: 0.3,
            rain_intensity_range: (0.1, 1.0),
            rain_check_period_hours: 3.0,
            rain_check_window_hours: 0.1,
            temperature_noise: 0.5,
            humidity_noise: 1.0,
            rain_cooling: 8.0,
            soil_cooling: 3.0,
            soil_cooling_onset: 50.0,
            daily_temperature_amplitude: 5.0,
            seasonal_temperature_amplitude: 3.0,
            daily_humidity_amplitude: 10.0,
            humidity_temperature_coupling: 0.5,
            rain_humidity_boost: 20.0,
            rain_soil_gain: 10.0,
            soil_humidity_factor: 0.2,
            fire_risk: FireRiskModel::ground_truth(),
        }
    }
}

impl EnvironmentParams {
    /// Reject parameter sets the model cannot evaluate
    pub fn validate(&self) -> ForestResult<()> {
        let invalid = |msg: &str| Err(ForestError::InvalidConfig(format!("environment: {}", msg)));

        if !(0.0..=100.0).contains(&self.initial_soil_moisture) {
            return invalid("initial_soil_moisture must be within [0, 100]");
        }
        if !(0.0..=1.0).contains(&self.evaporation_rate) {
            return invalid("evaporation_rate must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.rain_probability) {
            return invalid("rain_probability must be within [0, 1]");
        }
        let (low, high) = self.rain_intensity_range;
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low > high {
            return invalid("rain_intensity_range must be an ordered range within [0, 1]");
        }
        if !(self.rain_check_period_hours > 0.0) || self.rain_check_window_hours < 0.0 {
            return invalid("rain check period must be > 0 and window >= 0");
        }
        if self.temperature_noise < 0.0 || self.humidity_noise < 0.0 {
            return invalid("noise standard deviations must be >= 0");
        }
        if !(0.0..100.0).contains(&self.soil_cooling_onset) {
            return invalid("soil_cooling_onset must be within [0, 100)");
        }
        self.fire_risk
            .validate()
            .map_err(|msg| ForestError::InvalidConfig(format!("environment: {}", msg)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EnvironmentParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_probability() {
        let params = EnvironmentParams { rain_probability: 1.5, ..Default::default() };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("rain_probability"));
    }

    #[test]
    fn test_rejects_inverted_intensity_range() {
        let params = EnvironmentParams { rain_intensity_range: (0.9, 0.2), ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_check_period() {
        let params = EnvironmentParams { rain_check_period_hours: 0.0, ..Default::default() };
        assert!(params.validate().is_err());
    }
}
