// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Fixed-range histograms of perceived readings

use serde::{Deserialize, Serialize};

/// Equal-width bins over `[low, high)`; values outside land in `underflow`
/// or `overflow`. `high` itself counts in the last bin so a clamped 100 %
/// humidity reading is not lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub low: f64,
    pub high: f64,
    pub counts: Vec<u64>,
    pub underflow: u64,
    pub overflow: u64,
}

impl Histogram {
    pub fn new(low: f64, high: f64, bins: usize) -> Self {
        debug_assert!(high > low && bins > 0, "histogram needs low < high and at least one bin");
        Self {
            low,
            high,
            counts: vec![0; bins.max(1)],
            underflow: 0,
            overflow: 0,
        }
    }

    /// Perceived temperature: 1 °C bins from -10 to 50
    pub fn temperature() -> Self {
        Self::new(-10.0, 50.0, 60)
    }

    /// Perceived relative humidity: 2 % bins over [0, 100]
    pub fn humidity() -> Self {
        Self::new(0.0, 100.0, 50)
    }

    pub fn record(&mut self, value: f64) {
        if value.is_nan() || value < self.low {
            self.underflow += 1;
            return;
        }
        if value > self.high {
            self.overflow += 1;
            return;
        }
        let bins = self.counts.len();
        let normalized = (value - self.low) / (self.high - self.low);
        let bin = ((normalized * bins as f64) as usize).min(bins - 1);
        self.counts[bin] += 1;
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.counts.len() as f64
    }

    /// `[start, end)` of bin `index`
    pub fn bin_range(&self, index: usize) -> (f64, f64) {
        let width = self.bin_width();
        let start = self.low + width * index as f64;
        (start, start + width)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.underflow + self.overflow
    }

    /// Center of the fullest bin, `None` while no in-range value was seen
    pub fn mode(&self) -> Option<f64> {
        let (index, &count) = self
            .counts
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))?;
        if count == 0 {
            return None;
        }
        let (start, end) = self.bin_range(index);
        Some((start + end) / 2.0)
    }
}
