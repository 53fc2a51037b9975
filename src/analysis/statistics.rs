// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Summary statistics of sensing-error series

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Summary of an error series (perceived minus true)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Root mean square error
    pub rmse: f64,
    /// 95th percentile of the absolute error
    pub p95_abs: f64,
}

impl ErrorSummary {
    pub fn from_errors(errors: &[f64]) -> Self {
        if errors.is_empty() {
            return Self::default();
        }

        let count = errors.len();
        let n = count as f64;
        let mean = errors.iter().sum::<f64>() / n;

        let mut sorted = errors.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = percentile(&sorted, 50.0);

        let variance = if count > 1 {
            errors.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let rmse = (errors.iter().map(|&x| x * x).sum::<f64>() / n).sqrt();

        let mut abs_sorted: Vec<f64> = errors.iter().map(|x| x.abs()).collect();
        abs_sorted.sort_by(|a, b| a.total_cmp(b));

        Self {
            count,
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            rmse,
            p95_abs: percentile(&abs_sorted, 95.0),
        }
    }

    /// Two-sided p-value of a one-sample t-test that the mean error is zero.
    ///
    /// Small values mean the sensor is systematically biased.
    pub fn bias_p_value(&self) -> f64 {
        if self.count < 2 {
            return 1.0;
        }
        let se = self.std_dev / (self.count as f64).sqrt();
        if se < 1e-12 {
            return if self.mean.abs() < 1e-12 { 1.0 } else { 0.0 };
        }
        let t = self.mean / se;
        match StudentsT::new(0.0, 1.0, (self.count - 1) as f64) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
            Err(_) => 1.0,
        }
    }
}

/// Linear-interpolated percentile of an already sorted slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let k = p / 100.0 * (sorted.len() - 1) as f64;
    let f = k.floor() as usize;
    let c = k.ceil() as usize;

    if f == c || c >= sorted.len() {
        sorted[f.min(sorted.len() - 1)]
    } else {
        sorted[f] + (sorted[c] - sorted[f]) * (k - f as f64)
    }
}
