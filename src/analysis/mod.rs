//! Analysis module - sensing error statistics, reading distributions and alert accuracy

mod detection;
mod histogram;
mod statistics;

pub use detection::DetectionTally;
pub use histogram::Histogram;
pub use statistics::ErrorSummary;
