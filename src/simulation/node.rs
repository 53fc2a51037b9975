// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Per-node driver: one environment, one sensor, one tick at a time

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::analysis::{DetectionTally, ErrorSummary, Histogram};
use crate::config::Config;
use crate::environment::EnvironmentModel;
use crate::error::ForestResult;
use crate::rng::{derive_seed, ENVIRONMENT_STREAM, SENSOR_STREAM};
use crate::sensors::SensorModel;

/// Everything observed at one node in one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub node: usize,
    pub tick: u64,
    pub time_hours: f64,
    pub time_of_day: f64,
    pub day: u64,
    pub raining: bool,
    pub rain_intensity: f64,
    pub soil_moisture: f64,

    // Ground truth
    pub real_temperature: f64,
    pub real_humidity: f64,

    // Perceived
    pub sensor_temperature: f64,
    pub sensor_humidity: f64,
    pub temperature_error: f64,
    pub humidity_error: f64,
    pub condensating: bool,
    pub temperature_drift: f64,
    pub humidity_drift: f64,

    // Fire
    pub true_fire_risk: f64,
    pub detected_fire_risk: f64,
    pub fire_present: bool,
    pub fire_alert: bool,
}

/// End-of-run summary of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub node: usize,
    pub ticks: u64,
    pub rainy_ticks: u64,
    pub condensation_ticks: u64,
    pub alerts: u64,
    pub temperature_error: ErrorSummary,
    pub humidity_error: ErrorSummary,
    /// Distribution of perceived temperature
    pub temperature_histogram: Histogram,
    /// Distribution of perceived humidity
    pub humidity_histogram: Histogram,
    pub detection: DetectionTally,
    pub final_temperature_drift: f64,
    pub final_humidity_drift: f64,
    pub final_soil_moisture: f64,
}

/// Drives one node's models in the required order and keeps the score
pub struct NodeSimulation {
    node_id: usize,
    environment: EnvironmentModel,
    sensor: SensorModel,
    alert_threshold: f64,
    ticks: u64,
    rainy_ticks: u64,
    condensation_ticks: u64,
    alerts: u64,
    alert_active: bool,
    detection: DetectionTally,
    temperature_histogram: Histogram,
    humidity_histogram: Histogram,
    // Full error series, one entry per tick each, for the median and
    // percentiles of the summary. Kept even when tick records are not.
    temperature_errors: Vec<f64>,
    humidity_errors: Vec<f64>,
}

impl NodeSimulation {
    pub fn new(node_id: usize, environment: EnvironmentModel, sensor: SensorModel, alert_threshold: f64) -> Self {
        Self {
            node_id,
            environment,
            sensor,
            alert_threshold,
            ticks: 0,
            rainy_ticks: 0,
            condensation_ticks: 0,
            alerts: 0,
            alert_active: false,
            detection: DetectionTally::default(),
            temperature_histogram: Histogram::temperature(),
            humidity_histogram: Histogram::humidity(),
            temperature_errors: Vec::new(),
            humidity_errors: Vec::new(),
        }
    }

    /// Build node `node_id` of a run, deriving its seeds from the run seed
    pub fn from_config(node_id: usize, config: &Config) -> ForestResult<Self> {
        let seed_for = |stream| config.simulation.seed.map(|seed| derive_seed(seed, node_id as u64, stream));
        let environment = EnvironmentModel::with_params(config.environment.clone(), seed_for(ENVIRONMENT_STREAM))?;
        let sensor = SensorModel::with_params(config.sensor.clone(), seed_for(SENSOR_STREAM))?;
        Ok(Self::new(node_id, environment, sensor, config.simulation.alert_threshold))
    }

    /// Run one tick at `time_hours`; time must not go backwards
    pub fn step(&mut self, time_hours: f64) -> TickRecord {
        self.environment.advance(time_hours);
        let rain = self.environment.rain();

        let real_temperature = self.environment.real_temperature();
        let real_humidity = self.environment.real_humidity();

        let sensor_temperature = self.sensor.read_temperature(real_temperature, rain.is_raining, rain.intensity);
        let sensor_humidity = self.sensor.read_humidity(real_humidity, rain.is_raining, rain.intensity);

        let true_fire_risk = self.environment.fire_risk_from_ground_truth(real_temperature, real_humidity);
        let detected_fire_risk =
            self.sensor.detect_potential_fire(sensor_temperature, sensor_humidity, rain.is_raining, rain.intensity);

        let fire_present = true_fire_risk >= self.alert_threshold;
        let fire_alert = detected_fire_risk >= self.alert_threshold;

        let record = TickRecord {
            node: self.node_id,
            tick: self.ticks,
            time_hours,
            time_of_day: self.environment.time_of_day(),
            day: self.environment.day_number(),
            raining: rain.is_raining,
            rain_intensity: rain.intensity,
            soil_moisture: self.environment.soil_moisture(),
            real_temperature,
            real_humidity,
            sensor_temperature,
            sensor_humidity,
            temperature_error: sensor_temperature - real_temperature,
            humidity_error: sensor_humidity - real_humidity,
            condensating: self.sensor.is_condensating(),
            temperature_drift: self.sensor.temperature_drift(),
            humidity_drift: self.sensor.humidity_drift(),
            true_fire_risk,
            detected_fire_risk,
            fire_present,
            fire_alert,
        };

        self.tally(&record);
        trace!(
            node = self.node_id,
            time = time_hours,
            temp = sensor_temperature,
            humidity = sensor_humidity,
            risk = detected_fire_risk,
            "Tick"
        );
        record
    }

    fn tally(&mut self, record: &TickRecord) {
        self.ticks += 1;
        if record.raining {
            self.rainy_ticks += 1;
        }
        if record.condensating {
            self.condensation_ticks += 1;
        }
        self.temperature_errors.push(record.temperature_error);
        self.humidity_errors.push(record.humidity_error);
        self.temperature_histogram.record(record.sensor_temperature);
        self.humidity_histogram.record(record.sensor_humidity);
        self.detection.record(record.fire_present, record.fire_alert);

        if record.fire_alert {
            self.alerts += 1;
        }
        if record.fire_alert && !self.alert_active {
            info!(
                node = self.node_id,
                time = record.time_hours,
                risk = record.detected_fire_risk,
                true_risk = record.true_fire_risk,
                "Fire alert raised"
            );
        } else if !record.fire_alert && self.alert_active {
            debug!(node = self.node_id, time = record.time_hours, "Fire alert cleared");
        }
        self.alert_active = record.fire_alert;
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            node: self.node_id,
            ticks: self.ticks,
            rainy_ticks: self.rainy_ticks,
            condensation_ticks: self.condensation_ticks,
            alerts: self.alerts,
            temperature_error: ErrorSummary::from_errors(&self.temperature_errors),
            humidity_error: ErrorSummary::from_errors(&self.humidity_errors),
            temperature_histogram: self.temperature_histogram.clone(),
            humidity_histogram: self.humidity_histogram.clone(),
            detection: self.detection,
            final_temperature_drift: self.sensor.temperature_drift(),
            final_humidity_drift: self.sensor.humidity_drift(),
            final_soil_moisture: self.environment.soil_moisture(),
        }
    }

    pub fn node_id(&self) -> usize { self.node_id }
    pub fn environment(&self) -> &EnvironmentModel { &self.environment }
    pub fn environment_mut(&mut self) -> &mut EnvironmentModel { &mut self.environment }
    pub fn sensor(&self) -> &SensorModel { &self.sensor }
}
