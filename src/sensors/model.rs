// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Perceived readings derived from ground truth

use tracing::trace;

use super::SensorParams;
use crate::environment::RainState;
use crate::error::ForestResult;
use crate::risk::RiskInput;
use crate::rng::{gaussian, rng_from_seed, SimRng};

/// Simulated temperature/humidity probe of one node.
///
/// Holds no ground truth. Every read takes the true value plus the rain
/// flag and intensity the caller got from the node's environment model in
/// the same tick; nothing checks that they belong together. In debug builds
/// an intensity outside [0, 1], or a non-zero intensity without rain, trips
/// an assertion.
///
/// Drift accumulates over the whole run and is never reset.
pub struct SensorModel {
    params: SensorParams,
    rng: SimRng,
    condensating: bool,
    temperature_drift: f64,
    humidity_drift: f64,
}

impl SensorModel {
    pub fn new() -> Self {
        Self::build(SensorParams::default(), None)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(SensorParams::default(), Some(seed))
    }

    pub fn with_params(params: SensorParams, seed: Option<u64>) -> ForestResult<Self> {
        params.validate()?;
        Ok(Self::build(params, seed))
    }

    fn build(params: SensorParams, seed: Option<u64>) -> Self {
        Self {
            params,
            rng: rng_from_seed(seed),
            condensating: false,
            temperature_drift: 0.0,
            humidity_drift: 0.0,
        }
    }

    /// Perceived temperature (°C), not clamped
    pub fn read_temperature(&mut self, real_temperature: f64, is_raining: bool, intensity: f64) -> f64 {
        debug_check_rain(is_raining, intensity);
        let p = &self.params;
        let dry_sd = p.temperature_accuracy / 2.0;

        let (noise, drift_rate, real_temperature) = if is_raining {
            let noise = gaussian(&mut self.rng, p.wet_temperature_accuracy / 2.0) * (1.0 + intensity);
            // A wet probe reads cold
            (noise, p.wet_drift_rate * intensity, real_temperature - p.wet_cooling_bias * intensity)
        } else {
            (gaussian(&mut self.rng, dry_sd), p.drift_rate, real_temperature)
        };

        let increment = drift_rate * gaussian(&mut self.rng, dry_sd);
        self.temperature_drift += increment;

        let (lag, evaporative_cooling) = if is_raining {
            (p.sensor_lag * intensity, p.evaporative_cooling * intensity)
        } else {
            (0.0, 0.0)
        };

        trace!(increment, drift = self.temperature_drift, "Temperature drift step");
        real_temperature + noise + self.temperature_drift + lag - evaporative_cooling
    }

    /// Perceived relative humidity (%), clamped to [0, 100].
    ///
    /// Also recomputes the condensation flag from this call's inputs alone.
    pub fn read_humidity(&mut self, real_humidity: f64, is_raining: bool, intensity: f64) -> f64 {
        debug_check_rain(is_raining, intensity);
        let p = &self.params;
        let dry_sd = p.humidity_accuracy / 2.0;

        self.condensating = real_humidity > p.condensation_threshold || is_raining;

        let (noise, drift_rate) = if self.condensating {
            let noise = gaussian(&mut self.rng, p.wet_humidity_accuracy / 2.0) * (1.0 + intensity);
            let exposure = if is_raining { intensity } else { p.condensation_drift_factor };
            (noise, p.wet_drift_rate * exposure)
        } else {
            (gaussian(&mut self.rng, dry_sd), p.drift_rate)
        };

        let increment = drift_rate * gaussian(&mut self.rng, dry_sd);
        self.humidity_drift += increment;

        let saturation = if is_raining && intensity > p.saturation_onset {
            p.saturation_gain * (intensity - p.saturation_onset)
        } else {
            0.0
        };

        trace!(increment, drift = self.humidity_drift, condensating = self.condensating, "Humidity drift step");
        (real_humidity + noise + self.humidity_drift + saturation).clamp(0.0, 100.0)
    }

    /// Fire risk in [0, 1] as the node itself would judge it from its readings.
    ///
    /// While raining the z-scores pick up extra wet-probe noise scaled by the
    /// intensity; soil moisture is unknown to the sensor and plays no part.
    pub fn detect_potential_fire(&mut self, temperature: f64, humidity: f64, is_raining: bool, intensity: f64) -> f64 {
        debug_check_rain(is_raining, intensity);
        let input = RiskInput {
            temperature,
            humidity,
            rain: RainState { is_raining, intensity },
            soil_moisture: 0.0,
        };

        let temp_sd = self.params.wet_temperature_accuracy / 2.0;
        let humid_sd = self.params.wet_humidity_accuracy / 2.0;
        let rng = &mut self.rng;
        let mut jitter = || {
            let temp = gaussian(rng, temp_sd) * intensity;
            let humid = gaussian(rng, humid_sd) * intensity;
            (temp, humid)
        };

        self.params.fire_risk.assess(&input, Some(&mut jitter))
    }

    pub fn is_condensating(&self) -> bool { self.condensating }
    pub fn temperature_drift(&self) -> f64 { self.temperature_drift }
    pub fn humidity_drift(&self) -> f64 { self.humidity_drift }
    pub fn params(&self) -> &SensorParams { &self.params }
}

impl Default for SensorModel {
    fn default() -> Self {
        Self::new()
    }
}

fn debug_check_rain(is_raining: bool, intensity: f64) {
    debug_assert!(
        (0.0..=1.0).contains(&intensity),
        "rain intensity must be within [0, 1], got {}",
        intensity
    );
    debug_assert!(
        is_raining || intensity == 0.0,
        "rain intensity {} given without rain",
        intensity
    );
}
