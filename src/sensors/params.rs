// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Sensor characteristics

use serde::{Deserialize, Serialize};

use crate::error::{ForestError, ForestResult};
use crate::risk::FireRiskModel;

/// Accuracy, drift and rain-response constants of the temperature/humidity probe.
///
/// Accuracies are ± figures; the Gaussian noise std-dev is half of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorParams {
    /// ±°C when dry
    pub temperature_accuracy: f64,
    /// ±% RH when dry
    pub humidity_accuracy: f64,
    /// ±°C when wet
    pub wet_temperature_accuracy: f64,
    /// ±% RH when wet or condensating
    pub wet_humidity_accuracy: f64,

    /// Relative humidity above which the probe condensates (%)
    pub condensation_threshold: f64,

    /// Drift step scale when dry
    pub drift_rate: f64,
    /// Drift step scale at full rain intensity
    pub wet_drift_rate: f64,
    /// Share of `wet_drift_rate` applied while condensating without rain
    pub condensation_drift_factor: f64,

    /// Wet-probe cooling bias at full intensity (°C)
    pub wet_cooling_bias: f64,
    /// Response-lag offset at full intensity (°C)
    pub sensor_lag: f64,
    /// Evaporative cooling at full intensity (°C)
    pub evaporative_cooling: f64,

    /// Rain intensity above which the humidity element saturates
    pub saturation_onset: f64,
    /// Humidity overshoot per unit of intensity above the onset (%)
    pub saturation_gain: f64,

    /// Sensor-side fire-risk estimator
    pub fire_risk: FireRiskModel,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            temperature_accuracy: 0.5,
            humidity_accuracy: 2.0,
            wet_temperature_accuracy: 1.0,
            wet_humidity_accuracy: 4.0,
            condensation_threshold: 85.0,
            drift_rate: 0.0001,
            wet_drift_rate: 0.0005,
            condensation_drift_factor: 0.5,
            wet_cooling_bias: 2.0,
            sensor_lag: 1.0,
            evaporative_cooling: 3.0,
            saturation_onset: 0.7,
            saturation_gain: 5.0,
            fire_risk: FireRiskModel::perceived(),
        }
    }
}

impl SensorParams {
    pub fn validate(&self) -> ForestResult<()> {
        let accuracies = [
            self.temperature_accuracy,
            self.humidity_accuracy,
            self.wet_temperature_accuracy,
            self.wet_humidity_accuracy,
        ];
        if accuracies.iter().any(|a| !(*a >= 0.0)) {
            return Err(ForestError::InvalidConfig("sensor: accuracies must be >= 0".into()));
        }
        if self.drift_rate < 0.0 || self.wet_drift_rate < 0.0 || self.condensation_drift_factor < 0.0 {
            return Err(ForestError::InvalidConfig("sensor: drift rates must be >= 0".into()));
        }
        self.fire_risk
            .validate()
            .map_err(|msg| ForestError::InvalidConfig(format!("sensor: {}", msg)))
    }
}
