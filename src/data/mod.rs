//! Data module - CSV loading, cleaning and column access

mod dataset;
mod loader;
mod processor;

pub use dataset::{format_number, ColumnError, Dataset};
pub use loader::DatasetStore;
pub use processor::DataProcessor;
