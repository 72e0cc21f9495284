//! Stats module - descriptive statistics, correlation and density estimation

mod calculator;

pub use calculator::{ColumnSummary, CorrelationMatrix, HistogramBin, StatsCalculator};
