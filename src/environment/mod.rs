// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Ground-truth forest weather for one node
//!
//! The model keeps the node's clock, rain state and soil moisture, and
//! produces the "true" temperature, humidity and fire risk the sensor model
//! later perturbs.

mod params;

pub use params::EnvironmentParams;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, trace};

use crate::error::ForestResult;
use crate::risk::RiskInput;
use crate::rng::{gaussian, rng_from_seed, SimRng};

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_YEAR: f64 = 365.0;
/// Hour at which the daily sinusoid crosses zero on its way up
const DAILY_PHASE_HOURS: f64 = 6.0;

/// Current rain condition; intensity is 0 whenever it is not raining
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RainState {
    pub is_raining: bool,
    pub intensity: f64,
}

impl RainState {
    pub fn dry() -> Self {
        Self { is_raining: false, intensity: 0.0 }
    }

    /// Rain at the given intensity, clamped to [0, 1]
    pub fn raining(intensity: f64) -> Self {
        Self { is_raining: true, intensity: intensity.clamp(0.0, 1.0) }
    }
}

/// Ground-truth environment of a single forest node
pub struct EnvironmentModel {
    params: EnvironmentParams,
    rng: SimRng,
    time_of_day: f64,
    day_number: u64,
    last_time: f64,
    soil_moisture: f64,
    rain: RainState,
}

impl EnvironmentModel {
    /// Reference parameters with an entropy-seeded generator
    pub fn new() -> Self {
        Self::build(EnvironmentParams::default(), None)
    }

    /// Reference parameters with a deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        Self::build(EnvironmentParams::default(), Some(seed))
    }

    /// Custom parameters, validated before use
    pub fn with_params(params: EnvironmentParams, seed: Option<u64>) -> ForestResult<Self> {
        params.validate()?;
        Ok(Self::build(params, seed))
    }

    fn build(params: EnvironmentParams, seed: Option<u64>) -> Self {
        Self {
            soil_moisture: params.initial_soil_moisture,
            params,
            rng: rng_from_seed(seed),
            time_of_day: 0.0,
            day_number: 0,
            last_time: 0.0,
            rain: RainState::dry(),
        }
    }

    /// Move the node clock to `time_hours` and run the periodic rain check.
    ///
    /// Time must be non-negative and must not go backwards between calls.
    pub fn advance(&mut self, time_hours: f64) {
        debug_assert!(
            time_hours.is_finite() && time_hours >= 0.0,
            "simulation time must be finite and non-negative, got {}",
            time_hours
        );
        debug_assert!(
            time_hours >= self.last_time,
            "simulation time went backwards: {} -> {}",
            self.last_time,
            time_hours
        );
        self.last_time = time_hours;
        self.time_of_day = time_hours % HOURS_PER_DAY;
        self.day_number = (time_hours / HOURS_PER_DAY).floor() as u64;
        self.update_rain();
    }

    fn update_rain(&mut self) {
        // Tied to the driver's tick size: coarse ticks can skip a window,
        // fine ticks can hit it twice.
        if self.time_of_day % self.params.rain_check_period_hours >= self.params.rain_check_window_hours {
            return;
        }

        let previous = self.rain;
        self.rain = if self.rng.gen::<f64>() < self.params.rain_probability {
            let (low, high) = self.params.rain_intensity_range;
            RainState::raining(self.rng.gen_range(low..=high))
        } else {
            RainState::dry()
        };

        if previous.is_raining != self.rain.is_raining {
            debug!(
                day = self.day_number,
                hour = self.time_of_day,
                intensity = self.rain.intensity,
                "Rain {}",
                if self.rain.is_raining { "started" } else { "stopped" }
            );
        } else {
            trace!(intensity = self.rain.intensity, "Rain re-rolled");
        }
    }

    /// Position in the daily cycle, zero at 06:00 and 18:00
    fn daily_cycle(&self) -> f64 {
        (2.0 * PI * (self.time_of_day - DAILY_PHASE_HOURS) / HOURS_PER_DAY).sin()
    }

    /// Deterministic part of the ground-truth temperature (°C)
    pub fn expected_temperature(&self) -> f64 {
        let p = &self.params;
        let mut temperature = p.base_temperature;

        if self.rain.is_raining {
            temperature -= p.rain_cooling * self.rain.intensity;
        } else if self.soil_moisture > p.soil_cooling_onset {
            let wetness = (self.soil_moisture - p.soil_cooling_onset) / (100.0 - p.soil_cooling_onset);
            temperature -= p.soil_cooling * wetness;
        }

        let daily_amplitude = if self.rain.is_raining {
            p.daily_temperature_amplitude * (1.0 - self.rain.intensity)
        } else {
            p.daily_temperature_amplitude
        };
        let daily = daily_amplitude * self.daily_cycle();
        let seasonal =
            p.seasonal_temperature_amplitude * (2.0 * PI * self.day_number as f64 / DAYS_PER_YEAR).sin();

        temperature + daily + seasonal
    }

    /// Ground-truth temperature (°C) with one fresh weather-noise draw
    pub fn real_temperature(&mut self) -> f64 {
        self.expected_temperature() + gaussian(&mut self.rng, self.params.temperature_noise)
    }

    /// Ground-truth relative humidity (%), clamped to [0, 100].
    ///
    /// Updates soil moisture first: rain soaks the soil, dry weather
    /// evaporates it into the air.
    pub fn real_humidity(&mut self) -> f64 {
        let p = self.params.clone();
        let mut baseline = p.base_humidity;

        if self.rain.is_raining {
            baseline += p.rain_humidity_boost * self.rain.intensity;
            self.soil_moisture = (self.soil_moisture + p.rain_soil_gain * self.rain.intensity).min(100.0);
        } else {
            let evaporation = self.soil_moisture * p.evaporation_rate;
            baseline += evaporation;
            self.soil_moisture = (self.soil_moisture - evaporation).max(0.0);
        }

        let temperature = self.real_temperature();
        let coupling = -p.humidity_temperature_coupling * (temperature - p.base_temperature);
        let daily = -p.daily_humidity_amplitude * self.daily_cycle();
        let weather = gaussian(&mut self.rng, p.humidity_noise);
        let soil = p.soil_humidity_factor * self.soil_moisture;

        (baseline + coupling + daily + weather + soil).clamp(0.0, 100.0)
    }

    /// Fire risk in [0, 1] judged from ground-truth values
    pub fn fire_risk_from_ground_truth(&self, temperature: f64, humidity: f64) -> f64 {
        let input = RiskInput {
            temperature,
            humidity,
            rain: self.rain,
            soil_moisture: self.soil_moisture,
        };
        self.params.fire_risk.assess(&input, None)
    }

    /// Force the rain state, e.g. to stage a scenario between ticks
    pub fn set_rain(&mut self, rain: RainState) {
        self.rain = if rain.is_raining { RainState::raining(rain.intensity) } else { RainState::dry() };
    }

    /// Force soil moisture, clamped to [0, 100]
    pub fn set_soil_moisture(&mut self, soil_moisture: f64) {
        self.soil_moisture = soil_moisture.clamp(0.0, 100.0);
    }

    pub fn time_of_day(&self) -> f64 { self.time_of_day }
    pub fn day_number(&self) -> u64 { self.day_number }
    pub fn soil_moisture(&self) -> f64 { self.soil_moisture }
    pub fn is_raining(&self) -> bool { self.rain.is_raining }
    pub fn rain_intensity(&self) -> f64 { self.rain.intensity }
    pub fn rain(&self) -> RainState { self.rain }
    pub fn params(&self) -> &EnvironmentParams { &self.params }
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal(day: u64) -> f64 {
        3.0 * (2.0 * PI * day as f64 / 365.0).sin()
    }

    #[test]
    fn test_advance_splits_time() {
        let mut env = EnvironmentModel::with_seed(1);
        env.advance(26.0);
        assert_eq!(env.time_of_day(), 2.0);
        assert_eq!(env.day_number(), 1);

        env.advance(24.0 * 400.0 + 13.5);
        assert_eq!(env.time_of_day(), 13.5);
        assert_eq!(env.day_number(), 400);
    }

    #[test]
    fn test_time_laws_hold() {
        let mut env = EnvironmentModel::with_seed(2);
        for step in 0..500 {
            let t = step as f64 * 0.37;
            env.advance(t);
            assert!((0.0..24.0).contains(&env.time_of_day()));
            assert_eq!(env.day_number(), (t / 24.0).floor() as u64);
            assert!((env.time_of_day() - (t - 24.0 * env.day_number() as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rain_kept_outside_check_window() {
        let mut env = EnvironmentModel::with_seed(3);
        env.set_rain(RainState::raining(0.5));
        env.advance(1.0);
        env.advance(2.5);
        // 3.1 % 3 is a hair above 0.1, so the window is missed
        env.advance(3.1);
        assert_eq!(env.rain(), RainState::raining(0.5));
    }

    #[test]
    fn test_rain_rerolled_inside_check_window() {
        let mut changed = 0;
        for seed in 0..50 {
            let mut env = EnvironmentModel::with_seed(seed);
            env.set_rain(RainState::raining(0.5));
            env.advance(3.05);
            let rain = env.rain();
            if rain.is_raining {
                assert!((0.1..=1.0).contains(&rain.intensity));
            } else {
                assert_eq!(rain.intensity, 0.0);
            }
            if rain != RainState::raining(0.5) {
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_rain_probability() {
        let mut env = EnvironmentModel::with_seed(4);
        let checks = 4000;
        let mut rainy = 0;
        for i in 0..checks {
            env.advance(i as f64 * 3.0);
            if env.is_raining() {
                rainy += 1;
            }
        }
        let share = rainy as f64 / checks as f64;
        assert!((share - 0.3).abs() < 0.04, "rain share {}", share);
    }

    #[test]
    fn test_soil_rises_while_raining() {
        let mut env = EnvironmentModel::with_seed(5);
        env.set_rain(RainState::raining(0.3));
        let mut last = env.soil_moisture();
        for _ in 0..40 {
            env.real_humidity();
            assert!(env.soil_moisture() >= last);
            assert!(env.soil_moisture() <= 100.0);
            last = env.soil_moisture();
        }
        assert_eq!(env.soil_moisture(), 100.0);
    }

    #[test]
    fn test_soil_dries_without_rain() {
        let mut env = EnvironmentModel::with_seed(6);
        env.set_rain(RainState::dry());
        env.set_soil_moisture(100.0);
        let mut last = env.soil_moisture();
        for _ in 0..200 {
            env.real_humidity();
            assert!(env.soil_moisture() <= last);
            assert!(env.soil_moisture() >= 0.0);
            last = env.soil_moisture();
        }
        assert!(env.soil_moisture() < 1.0);
    }

    #[test]
    fn test_humidity_in_range() {
        let mut env = EnvironmentModel::with_seed(7);
        for step in 0..2000 {
            env.advance(step as f64 * 0.25);
            let h = env.real_humidity();
            assert!((0.0..=100.0).contains(&h), "humidity {}", h);
        }
    }

    #[test]
    fn test_rain_cooling_is_exact() {
        let mut env = EnvironmentModel::with_seed(8);
        env.advance(30.0);
        env.set_soil_moisture(50.0);

        env.set_rain(RainState::dry());
        let dry = env.expected_temperature();
        assert!((dry - (25.0 + seasonal(1))).abs() < 1e-12);

        env.set_rain(RainState::raining(1.0));
        let wet = env.expected_temperature();
        // Full intensity also flattens the daily cycle, which is zero at 06:00 anyway
        assert!((wet - (17.0 + seasonal(1))).abs() < 1e-12);
        assert!((wet - dry + 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_wet_soil_cools() {
        let mut env = EnvironmentModel::with_seed(9);
        env.advance(30.0);
        env.set_rain(RainState::dry());
        env.set_soil_moisture(100.0);
        assert!((env.expected_temperature() - (22.0 + seasonal(1))).abs() < 1e-12);
        env.set_soil_moisture(75.0);
        assert!((env.expected_temperature() - (23.5 + seasonal(1))).abs() < 1e-12);
    }

    #[test]
    fn test_daily_cycle_peaks_at_noon() {
        let mut env = EnvironmentModel::with_seed(10);
        env.advance(18.0);
        env.set_rain(RainState::dry());
        let evening = env.expected_temperature();
        let mut noon_env = EnvironmentModel::with_seed(10);
        noon_env.advance(12.0);
        noon_env.set_rain(RainState::dry());
        assert!((noon_env.expected_temperature() - 30.0).abs() < 1e-12);
        assert!((evening - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_noise_matches_draw() {
        let mut env = EnvironmentModel::with_seed(11);
        env.advance(31.0);
        let expected = env.expected_temperature();
        let real = env.real_temperature();
        let noise = gaussian(&mut rng_from_seed(Some(11)), 0.5);
        assert!((real - expected - noise).abs() < 1e-9);
    }

    #[test]
    fn test_dry_morning_temperature_spread() {
        let mut env = EnvironmentModel::with_seed(12);
        env.advance(6.0);
        env.set_rain(RainState::dry());
        env.set_soil_moisture(50.0);
        let trials = 2000;
        let within = (0..trials)
            .filter(|_| (env.real_temperature() - 25.0).abs() <= 1.5)
            .count();
        assert!(within as f64 / trials as f64 > 0.99, "{} of {}", within, trials);
    }

    #[test]
    fn test_ground_truth_risk_zero_in_heavy_rain() {
        let mut env = EnvironmentModel::with_seed(13);
        env.set_rain(RainState::raining(0.9));
        assert_eq!(env.fire_risk_from_ground_truth(70.0, 0.0), 0.0);
        env.set_rain(RainState::dry());
        assert!(env.fire_risk_from_ground_truth(70.0, 0.0) > 0.0);
    }

    #[test]
    fn test_seeded_models_agree() {
        let mut a = EnvironmentModel::with_seed(99);
        let mut b = EnvironmentModel::with_seed(99);
        for step in 0..300 {
            let t = step as f64 * 0.1;
            a.advance(t);
            b.advance(t);
            assert_eq!(a.real_humidity(), b.real_humidity());
            assert_eq!(a.rain(), b.rain());
        }
    }

    #[test]
    fn test_with_params_rejects_invalid() {
        let params = EnvironmentParams { evaporation_rate: -0.5, ..Default::default() };
        assert!(EnvironmentModel::with_params(params, Some(1)).is_err());
    }

    #[test]
    fn test_set_rain_normalizes() {
        let mut env = EnvironmentModel::with_seed(14);
        env.set_rain(RainState { is_raining: false, intensity: 0.7 });
        assert_eq!(env.rain_intensity(), 0.0);
        env.set_rain(RainState { is_raining: true, intensity: 1.7 });
        assert_eq!(env.rain_intensity(), 1.0);
    }
}
