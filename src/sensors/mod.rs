//! Sensor module - perceived readings, drift and condensation

mod model;
mod params;

pub use model::SensorModel;
pub use params::SensorParams;
