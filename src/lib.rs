// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! forestsim - Forest Sensor Node Simulator
//!
//! Simulates IoT nodes deployed in a forest. Each node pairs:
//! - a ground-truth environment (daily and seasonal temperature cycles,
//!   periodic rain, soil moisture with memory, coupled humidity)
//! - an imperfect sensor (noise, random-walk drift, condensation bias,
//!   evaporative cooling, saturation)
//! - a fire-risk estimate computed both from the true values and from
//!   what the sensor perceives
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────── Simulation (rayon) ───────────────────────┐
//! │  NodeSimulation × N                                               │
//! │  ┌─────────────┐ rain ┌─────────────┐                             │
//! │  │ Environment │────→ │   Sensor    │                             │
//! │  └─────────────┘      └─────────────┘                             │
//! │        │ true risk          │ detected risk                       │
//! │        └──────→ TickRecord ←┘ ──→ Analysis ──→ SimulationReport   │
//! └───────────────────────────────────────────────────────────────────┘
//!                                         │
//!                                      Export (CSV / JSON lines)
//! ```

pub mod analysis;
pub mod config;
pub mod environment;
pub mod error;
pub mod export;
pub mod risk;
pub mod rng;
pub mod sensors;
pub mod simulation;

// Re-exports for convenience
pub use config::Config;
pub use environment::{EnvironmentModel, EnvironmentParams, RainState};
pub use error::{ForestError, ForestResult};
pub use export::{ExportFormat, SeriesExporter};
pub use risk::FireRiskModel;
pub use sensors::{SensorModel, SensorParams};
pub use simulation::{NodeSimulation, Simulation, SimulationReport, TickRecord};

/// forestsim version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// forestsim name
pub const NAME: &str = "forestsim";
