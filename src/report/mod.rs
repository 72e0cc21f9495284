//! Report module - plain-text analysis report and its sinks

mod exporter;
mod table;

pub use exporter::{ReportError, ReportExporter};
pub use table::TextTable;
