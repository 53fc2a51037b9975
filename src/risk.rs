// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Heuristic fire-risk scoring shared by the ground-truth and sensor paths
//!
//! Both estimators turn a temperature/humidity pair into z-scores against a
//! reference "fire weather" mean, map them through linear ramps and keep the
//! larger of the two. Rain raises the reference temperature, lowers the
//! reference humidity and attenuates the score; heavy rain zeroes it.

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

use crate::environment::RainState;

/// Linear ramp: 0 at or below `low`, 1 at or above `high`, linear between
pub fn linear_ramp(z: f64, low: f64, high: f64) -> f64 {
    if z <= low {
        return 0.0;
    }
    if z >= high {
        return 1.0;
    }
    (z - low) / (high - low)
}

/// Standard normal cumulative distribution function.
///
/// Not used by [`FireRiskModel::assess`], which scores with [`linear_ramp`].
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// Inputs to one risk evaluation
#[derive(Debug, Clone, Copy)]
pub struct RiskInput {
    pub temperature: f64,
    pub humidity: f64,
    pub rain: RainState,
    /// Only consulted when soil suppression is enabled
    pub soil_moisture: f64,
}

/// Parameterized fire-risk estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireRiskModel {
    pub mean_temperature: f64,
    pub temperature_std_dev: f64,
    pub mean_humidity: f64,
    pub humidity_std_dev: f64,
    /// Rain heavier than this forces a zero score
    pub heavy_rain_cutoff: f64,
    pub rain_temperature_shift: f64,
    pub rain_humidity_shift: f64,
    /// Fraction of the score removed at full rain intensity
    pub rain_attenuation: f64,
    pub temperature_ramp: (f64, f64),
    pub dryness_ramp: (f64, f64),
    /// Soil moisture above which the score is damped; `None` disables damping
    pub soil_suppression_threshold: Option<f64>,
}

impl FireRiskModel {
    /// Estimator applied to ground-truth values
    pub fn ground_truth() -> Self {
        Self {
            mean_temperature: 40.0,
            temperature_std_dev: 5.0,
            mean_humidity: 60.0,
            humidity_std_dev: 5.0,
            heavy_rain_cutoff: 0.8,
            rain_temperature_shift: 15.0,
            rain_humidity_shift: 10.0,
            rain_attenuation: 0.8,
            temperature_ramp: (0.0, 4.0),
            dryness_ramp: (0.0, 3.0),
            soil_suppression_threshold: Some(70.0),
        }
    }

    /// Estimator applied to sensor-perceived values
    pub fn perceived() -> Self {
        Self {
            mean_humidity: 58.0,
            soil_suppression_threshold: None,
            ..Self::ground_truth()
        }
    }

    /// Check that the estimator cannot divide by zero or invert its ramps
    pub fn validate(&self) -> Result<(), String> {
        if !(self.temperature_std_dev > 0.0) || !(self.humidity_std_dev > 0.0) {
            return Err("fire risk standard deviations must be > 0".into());
        }
        if self.temperature_ramp.0 > self.temperature_ramp.1
            || self.dryness_ramp.0 > self.dryness_ramp.1
        {
            return Err("fire risk ramp bounds must be ordered low <= high".into());
        }
        if !(0.0..=1.0).contains(&self.rain_attenuation) {
            return Err("rain_attenuation must be within [0, 1]".into());
        }
        Ok(())
    }

    /// Score a temperature/humidity pair in [0, 1].
    ///
    /// `jitter` is called at most once, and only while it is raining below
    /// the heavy-rain cutoff; it returns offsets added to the temperature and
    /// humidity z-scores.
    pub fn assess(&self, input: &RiskInput, jitter: Option<&mut dyn FnMut() -> (f64, f64)>) -> f64 {
        let rain = input.rain;
        if rain.is_raining && rain.intensity > self.heavy_rain_cutoff {
            return 0.0;
        }

        let mut mean_temperature = self.mean_temperature;
        let mut mean_humidity = self.mean_humidity;
        if rain.is_raining {
            mean_temperature += self.rain_temperature_shift * rain.intensity;
            mean_humidity -= self.rain_humidity_shift * rain.intensity;
        }

        let mut temp_z = (input.temperature - mean_temperature) / self.temperature_std_dev;
        let mut humid_z = (input.humidity - mean_humidity) / self.humidity_std_dev;

        if rain.is_raining {
            if let Some(jitter) = jitter {
                let (dt, dh) = jitter();
                temp_z += dt;
                humid_z += dh;
            }
        }

        let temp_risk = linear_ramp(temp_z, self.temperature_ramp.0, self.temperature_ramp.1);
        // Low humidity is the risky side, so the ramp runs on the negated z-score
        let dryness_risk = linear_ramp(-humid_z, self.dryness_ramp.0, self.dryness_ramp.1);
        let mut risk = temp_risk.max(dryness_risk);

        if rain.is_raining {
            risk *= 1.0 - self.rain_attenuation * rain.intensity;
        }

        if let Some(threshold) = self.soil_suppression_threshold {
            if input.soil_moisture > threshold {
                risk *= 1.0 - (input.soil_moisture - threshold) / 100.0;
            }
        }

        risk.clamp(0.0, 1.0)
    }
}
