// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Data export - tick series as CSV or JSON lines, run report as JSON

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::simulation::{SimulationReport, TickRecord};

/// Series export format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    /// One JSON object per line
    #[serde(rename = "jsonl")]
    #[value(name = "jsonl")]
    JsonLines,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::JsonLines => "jsonl",
        }
    }
}

const CSV_HEADER: &str = "node,tick,time_hours,time_of_day,day,raining,rain_intensity,soil_moisture,\
real_temperature,real_humidity,sensor_temperature,sensor_humidity,temperature_error,humidity_error,\
condensating,temperature_drift,humidity_drift,true_fire_risk,detected_fire_risk,fire_present,fire_alert";

/// Streams tick records to one file
pub struct SeriesExporter {
    path: PathBuf,
    format: ExportFormat,
    writer: BufWriter<File>,
    count: usize,
}

impl SeriesExporter {
    /// Create (or truncate) `path`, creating missing parent directories
    pub fn create(path: &Path, format: ExportFormat) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = open_export_file(path)?;
        let mut writer = BufWriter::new(file);
        if format == ExportFormat::Csv {
            writeln!(writer, "{}", CSV_HEADER)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            format,
            writer,
            count: 0,
        })
    }

    pub fn export_record(&mut self, record: &TickRecord) -> Result<()> {
        match self.format {
            ExportFormat::JsonLines => {
                let json = serde_json::to_string(record)?;
                writeln!(self.writer, "{}", json)?;
            }
            ExportFormat::Csv => {
                writeln!(
                    self.writer,
                    "{},{},{:.4},{:.4},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{},{:.6},{:.6},{:.4},{:.4},{},{}",
                    record.node,
                    record.tick,
                    record.time_hours,
                    record.time_of_day,
                    record.day,
                    record.raining,
                    record.rain_intensity,
                    record.soil_moisture,
                    record.real_temperature,
                    record.real_humidity,
                    record.sensor_temperature,
                    record.sensor_humidity,
                    record.temperature_error,
                    record.humidity_error,
                    record.condensating,
                    record.temperature_drift,
                    record.humidity_drift,
                    record.true_fire_risk,
                    record.detected_fire_risk,
                    record.fire_present,
                    record.fire_alert,
                )?;
            }
        }
        self.count += 1;
        Ok(())
    }

    pub fn export_all<'a>(&mut self, records: impl IntoIterator<Item = &'a TickRecord>) -> Result<()> {
        for record in records {
            self.export_record(record)?;
        }
        Ok(())
    }

    pub fn count(&self) -> usize { self.count }
    pub fn path(&self) -> &Path { &self.path }

    /// Flush and close; returns the number of records written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        info!("Exported {} records to {:?}", self.count, self.path);
        Ok(self.count)
    }
}

/// Write the run report as pretty JSON
pub fn write_report(path: &Path, report: &SimulationReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|e| anyhow!("Failed to write report {:?}: {}", path, e))?;
    info!("Wrote report to {:?}", path);
    Ok(())
}

fn open_export_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| anyhow!("Failed to open export file {:?}: {}", path, e))
}
