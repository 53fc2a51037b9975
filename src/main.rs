// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! forestsim - Forest Sensor Node Simulator
//!
//! Runs a batch of simulated forest nodes, logs how far the sensors strayed
//! from ground truth and how well they called fire risk, and optionally
//! exports the tick series and a JSON report.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use forestsim::export::{write_report, ExportFormat, SeriesExporter};
use forestsim::{Config, Simulation, SimulationReport, VERSION};

/// forestsim - Forest Sensor Node Simulator
#[derive(Parser, Debug)]
#[command(name = "forestsim")]
#[command(author = "bad-antics")]
#[command(version = VERSION)]
#[command(about = "Simulate forest sensor nodes: ground truth, perceived readings and fire risk")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of nodes
    #[arg(short, long)]
    nodes: Option<usize>,

    /// Simulated duration in hours
    #[arg(long)]
    hours: Option<f64>,

    /// Simulated minutes between ticks
    #[arg(long)]
    tick_minutes: Option<f64>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the tick series to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Series format
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Write a JSON run report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load or create configuration
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let (mut config, created) = Config::load_or_create(&config_path)?;

    // Initialize logging
    let configured_level = config.parsed_log_level();
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        configured_level.unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🌲 forestsim v{} - Forest Sensor Node Simulator", VERSION);
    if created {
        info!("Wrote default configuration to {:?}", config_path);
    } else {
        info!("Configuration loaded from {:?}", config_path);
    }
    if configured_level.is_none() {
        warn!("Unknown log_level {:?} in configuration, using {}", config.log_level, log_level);
    }

    // Override with command line args
    if let Some(nodes) = args.nodes {
        config.simulation.nodes = nodes;
    }
    if let Some(hours) = args.hours {
        config.simulation.duration_hours = hours;
    }
    if let Some(tick_minutes) = args.tick_minutes {
        config.simulation.tick_minutes = tick_minutes;
    }
    if args.seed.is_some() {
        config.simulation.seed = args.seed;
    }
    if let Some(format) = args.format {
        config.export.format = format;
    }
    if let Some(output) = args.output {
        config.export.enabled = true;
        config.export.path = output;
    }
    if args.report.is_some() {
        config.export.report_path = args.report;
    }
    if !config.export.enabled {
        // Tick records are only needed for export. The per-tick error
        // series behind the summary are kept either way.
        config.simulation.keep_records = false;
    }

    let simulation = Simulation::new(config.clone())?;
    let report = simulation.run()?;
    log_summary(&report);

    if config.export.enabled {
        if config.simulation.keep_records {
            let mut exporter = SeriesExporter::create(&config.export.path, config.export.format)?;
            exporter.export_all(&report.records)?;
            exporter.finish()?;
        } else {
            warn!("Export enabled but keep_records is off; no series written");
        }
    }
    if let Some(path) = &config.export.report_path {
        write_report(path, &report)?;
    }

    Ok(())
}

fn log_summary(report: &SimulationReport) {
    for node in &report.nodes {
        info!(
            "Node {}: {} ticks, {} rainy, {} condensating, {} alerts",
            node.node, node.ticks, node.rainy_ticks, node.condensation_ticks, node.alerts
        );
        info!(
            "   temperature error: mean {:+.3} °C, rmse {:.3}, p95 |err| {:.3}, drift {:+.4} (bias p={:.3})",
            node.temperature_error.mean,
            node.temperature_error.rmse,
            node.temperature_error.p95_abs,
            node.final_temperature_drift,
            node.temperature_error.bias_p_value()
        );
        info!(
            "   humidity error:    mean {:+.3} %,  rmse {:.3}, p95 |err| {:.3}, drift {:+.4} (bias p={:.3})",
            node.humidity_error.mean,
            node.humidity_error.rmse,
            node.humidity_error.p95_abs,
            node.final_humidity_drift,
            node.humidity_error.bias_p_value()
        );
    }

    let overall = &report.overall;
    info!(
        "Fire detection over {} ticks: accuracy {:.1}%, precision {:.1}%, recall {:.1}% ({} missed, {} false alarms)",
        overall.total(),
        overall.accuracy() * 100.0,
        overall.precision() * 100.0,
        overall.recall() * 100.0,
        overall.false_negatives,
        overall.false_positives
    );
}
