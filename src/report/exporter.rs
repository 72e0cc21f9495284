//! Report Exporter Module
//! Builds the three-section analysis report and writes it out.

use super::TextTable;
use crate::data::{ColumnError, Dataset};
use crate::stats::{ColumnSummary, StatsCalculator};
use log::info;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const TOP_WORDS: usize = 10;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("no dataset loaded")]
    NoDataset,
    #[error("operation failed: {0}")]
    Column(#[from] ColumnError),
    #[error("operation failed: could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Produces the describe / correlation / word-count report.
pub struct ReportExporter;

impl ReportExporter {
    /// Render the full report text.
    pub fn generate(dataset: Option<&Dataset>) -> Result<String, ReportError> {
        let dataset = match dataset {
            Some(ds) if !ds.is_empty() => ds,
            _ => return Err(ReportError::NoDataset),
        };

        let words = Self::word_counts(&dataset.column_names(), TOP_WORDS)
            .into_iter()
            .map(|(word, count)| format!("{}: {}", word, count))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "Dataset Description:\n{}\n\nCorrelation Matrix:\n{}\n\nTop 10 Most Common Words:\n{}\n\n",
            Self::describe_table(dataset)?,
            Self::correlation_table(dataset)?,
            words
        ))
    }

    /// Write the report to `path`, replacing any previous file.
    pub fn export_to_file(
        dataset: Option<&Dataset>,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, ReportError> {
        let path = path.as_ref();
        let text = Self::generate(dataset)?;

        fs::write(path, text).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Report exported to {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Report text for the read-only analysis panel.
    pub fn view(dataset: Option<&Dataset>) -> Result<String, ReportError> {
        Self::generate(dataset)
    }

    /// Per-column summary. Falls back to count/unique/top/freq when no
    /// column is numeric.
    pub fn describe_table(dataset: &Dataset) -> Result<String, ReportError> {
        let numeric = dataset.numeric_columns();
        if numeric.is_empty() {
            return Self::categorical_table(dataset);
        }

        let columns = numeric
            .iter()
            .map(|name| dataset.numeric_values(name))
            .collect::<Result<Vec<_>, _>>()?;
        let summaries: Vec<ColumnSummary> = columns
            .par_iter()
            .map(|values| StatsCalculator::describe(values))
            .collect();

        let rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
            ("count", |s| s.count as f64),
            ("mean", |s| s.mean),
            ("std", |s| s.std),
            ("min", |s| s.min),
            ("25%", |s| s.q25),
            ("50%", |s| s.median),
            ("75%", |s| s.q75),
            ("max", |s| s.max),
        ];

        let mut table = TextTable::new(numeric);
        for (label, field) in rows {
            table.push_row(label, summaries.iter().map(|s| fmt_value(field(s))).collect());
        }

        Ok(table.render())
    }

    fn categorical_table(dataset: &Dataset) -> Result<String, ReportError> {
        let names = dataset.column_names();
        if names.is_empty() {
            return Ok(empty_frame());
        }

        let columns = names
            .iter()
            .map(|name| dataset.text_values(name))
            .collect::<Result<Vec<_>, _>>()?;
        let summaries: Vec<[String; 4]> = columns
            .par_iter()
            .map(|values| categorical_summary(values))
            .collect();

        let mut table = TextTable::new(names);
        for (i, label) in ["count", "unique", "top", "freq"].into_iter().enumerate() {
            table.push_row(label, summaries.iter().map(|s| s[i].clone()).collect());
        }

        Ok(table.render())
    }

    /// Pearson matrix over the numeric columns.
    pub fn correlation_table(dataset: &Dataset) -> Result<String, ReportError> {
        let columns = dataset
            .numeric_columns()
            .into_iter()
            .map(|name| {
                let values = dataset.numeric_values(&name)?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>, ColumnError>>()?;

        let matrix = StatsCalculator::correlation_matrix(&columns);
        if matrix.is_empty() {
            return Ok(empty_frame());
        }

        let mut table = TextTable::new(matrix.labels.clone());
        for (label, row) in matrix.labels.iter().zip(&matrix.values) {
            table.push_row(label.clone(), row.iter().map(|v| fmt_value(*v)).collect());
        }

        Ok(table.render())
    }

    /// Most frequent whitespace tokens of the space-joined column names.
    ///
    /// Ties keep first-seen order.
    pub fn word_counts(names: &[String], limit: usize) -> Vec<(String, usize)> {
        let joined = names.join(" ");
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();

        for word in joined.split_whitespace() {
            let slot = *index.entry(word).or_insert_with(|| {
                counts.push((word.to_string(), 0));
                counts.len() - 1
            });
            counts[slot].1 += 1;
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(limit);
        counts
    }
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", v)
    }
}

fn empty_frame() -> String {
    "Empty DataFrame\nColumns: []\nIndex: []".to_string()
}

/// count, unique, top, freq over present cells. Ties for top take the
/// lexically smallest value.
fn categorical_summary(values: &[Option<String>]) -> [String; 4] {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        *freq.entry(v.as_str()).or_default() += 1;
    }

    let count: usize = freq.values().sum();
    let top = freq
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(word, n)| (word.to_string(), *n));

    match top {
        Some((word, n)) => [
            count.to_string(),
            freq.len().to_string(),
            word,
            n.to_string(),
        ],
        None => [
            "0".to_string(),
            "0".to_string(),
            "NaN".to_string(),
            "NaN".to_string(),
        ],
    }
}
