// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Simulation module - drives many independent nodes and gathers the results

mod node;

pub use node::{NodeSimulation, NodeSummary, TickRecord};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use crate::analysis::DetectionTally;
use crate::config::{Config, SimulationConfig};
use crate::error::ForestResult;

/// Records reserved up front per node; longer runs grow the buffer as they go
const RECORD_PREALLOC: u64 = 1 << 16;

/// Outcome of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub generated_at: DateTime<Utc>,
    /// Run layout the report was produced with
    pub config: SimulationConfig,
    pub ticks_per_node: u64,
    pub nodes: Vec<NodeSummary>,
    /// Detection tally summed over every node
    pub overall: DetectionTally,
    /// Every tick of every node, ordered by node then tick. Empty unless
    /// `keep_records` is set; not part of the JSON report.
    #[serde(skip)]
    pub records: Vec<TickRecord>,
}

impl SimulationReport {
    pub fn total_alerts(&self) -> u64 {
        self.nodes.iter().map(|n| n.alerts).sum()
    }

    pub fn total_ticks(&self) -> u64 {
        self.nodes.iter().map(|n| n.ticks).sum()
    }
}

/// Runs every node of a configuration
pub struct Simulation {
    config: Config,
}

impl Simulation {
    pub fn new(config: Config) -> ForestResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Simulate all nodes in parallel. Nodes share nothing, so the result
    /// only depends on the seed, never on scheduling.
    pub fn run(&self) -> ForestResult<SimulationReport> {
        let sim = &self.config.simulation;
        let ticks = sim.tick_count();
        info!(
            nodes = sim.nodes,
            ticks_per_node = ticks,
            tick_minutes = sim.tick_minutes,
            seeded = sim.seed.is_some(),
            "Starting simulation"
        );
        let started = Instant::now();

        let runs = (0..sim.nodes)
            .into_par_iter()
            .map(|node_id| self.run_node(node_id, ticks))
            .collect::<ForestResult<Vec<_>>>()?;

        let mut nodes = Vec::with_capacity(runs.len());
        let mut records = Vec::new();
        let mut overall = DetectionTally::default();
        for (summary, node_records) in runs {
            overall += summary.detection;
            nodes.push(summary);
            records.extend(node_records);
        }

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            accuracy = overall.accuracy(),
            "Simulation finished"
        );

        Ok(SimulationReport {
            generated_at: Utc::now(),
            config: sim.clone(),
            ticks_per_node: ticks,
            nodes,
            overall,
            records,
        })
    }

    fn run_node(&self, node_id: usize, ticks: u64) -> ForestResult<(NodeSummary, Vec<TickRecord>)> {
        let sim = &self.config.simulation;
        let tick_hours = sim.tick_hours();
        let mut node = NodeSimulation::from_config(node_id, &self.config)?;

        let mut records = if sim.keep_records {
            Vec::with_capacity(ticks.min(RECORD_PREALLOC) as usize)
        } else {
            Vec::new()
        };
        for tick in 0..ticks {
            let record = node.step(tick as f64 * tick_hours);
            if sim.keep_records {
                records.push(record);
            }
        }

        let summary = node.summary();
        debug!(
            node = node_id,
            rainy_ticks = summary.rainy_ticks,
            alerts = summary.alerts,
            temp_rmse = summary.temperature_error.rmse,
            humidity_rmse = summary.humidity_error.rmse,
            "Node finished"
        );
        Ok((summary, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(nodes: usize, hours: f64, seed: Option<u64>) -> Config {
        let mut config = Config::default();
        config.simulation.nodes = nodes;
        config.simulation.duration_hours = hours;
        config.simulation.seed = seed;
        config
    }

    #[test]
    fn test_run_layout() {
        let report = Simulation::new(config(3, 24.0, Some(1))).unwrap().run().unwrap();
        assert_eq!(report.ticks_per_node, 241);
        assert_eq!(report.nodes.len(), 3);
        assert_eq!(report.records.len(), 3 * 241);
        assert_eq!(report.total_ticks(), 3 * 241);
        assert_eq!(report.overall.total(), 3 * 241);

        for (i, summary) in report.nodes.iter().enumerate() {
            assert_eq!(summary.node, i);
        }
        let first = &report.records[0];
        assert_eq!((first.node, first.tick, first.time_hours), (0, 0, 0.0));
        let last = &report.records[report.records.len() - 1];
        assert_eq!((last.node, last.tick), (2, 240));
        assert!((last.time_hours - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = Simulation::new(config(4, 12.0, Some(99))).unwrap().run().unwrap();
        let b = Simulation::new(config(4, 12.0, Some(99))).unwrap().run().unwrap();
        assert_eq!(a.records, b.records);
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.overall, b.overall);
    }

    #[test]
    fn test_records_can_be_dropped() {
        let mut cfg = config(2, 6.0, Some(3));
        cfg.simulation.keep_records = false;
        let report = Simulation::new(cfg).unwrap().run().unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.total_ticks(), 2 * 61);
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Simulation::new(config(0, 6.0, None)).is_err());

        let mut runaway = config(1, 1.0, None);
        runaway.simulation.tick_minutes = 1e-300;
        assert!(Simulation::new(runaway).is_err());
    }

    #[test]
    fn test_report_json_omits_records() {
        let report = Simulation::new(config(1, 1.0, Some(8))).unwrap().run().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("records").is_none());
        assert_eq!(json["nodes"].as_array().map(|n| n.len()), Some(1));
        assert_eq!(json["config"]["seed"], 8);
    }
}
