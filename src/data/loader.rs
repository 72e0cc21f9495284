//! CSV Data Loader Module
//! Handles CSV file loading with Polars and keeps the current dataset.

use super::Dataset;
use log::{info, warn};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Cell tokens read as missing, matching the pandas defaults.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("load failed: file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("load failed: {0}")]
    CsvError(#[from] PolarsError),
}

/// Loads CSV files and holds the most recent successful load.
pub struct DatasetStore {
    current: Option<Arc<Dataset>>,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Load a CSV file, replacing the current dataset on success.
    ///
    /// A failed load leaves the previous dataset in place.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Arc<Dataset>, LoadError> {
        let path = path.as_ref();
        match Self::read_csv(path) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                self.current = Some(Arc::clone(&dataset));
                Ok(dataset)
            }
            Err(e) => {
                warn!("{}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Read and clean a CSV file without touching the store.
    pub fn read_csv(path: &Path) -> Result<Dataset, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let null_values = NullValues::AllColumns(NA_TOKENS.iter().map(|t| (*t).into()).collect());

        // Infer over every row so a stray text cell keeps its column as text
        // instead of being nulled and then imputed.
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(None)
            .with_null_values(Some(null_values))
            .finish()?
            .collect()?;

        let dataset = Dataset::from_frame(df, path)?;
        info!(
            "Loaded {}: {} rows, {} columns, imputed {:?}",
            path.display(),
            dataset.height(),
            dataset.column_names().len(),
            dataset.imputed_columns()
        );

        Ok(dataset)
    }

    /// The dataset from the last successful load.
    pub fn current(&self) -> Option<&Arc<Dataset>> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_imputes_missing_scores() {
        let file = csv_file(&["age,score", "20,5", "40,NaN", "60,9"]);
        let mut store = DatasetStore::new();

        let ds = store.load(file.path()).unwrap();

        assert_eq!(ds.height(), 3);
        assert_eq!(ds.numeric_values("score").unwrap(), vec![5.0, 7.0, 9.0]);
        assert_eq!(ds.numeric_values("age").unwrap(), vec![20.0, 40.0, 60.0]);
        assert!(store.current().is_some());
    }

    #[test]
    fn test_load_empty_field_is_missing() {
        let file = csv_file(&["a,b", "1,", "3,4", "5,8"]);

        let ds = DatasetStore::read_csv(file.path()).unwrap();

        assert_eq!(ds.numeric_values("b").unwrap(), vec![6.0, 4.0, 8.0]);
    }

    #[test]
    fn test_load_text_columns_are_categorical() {
        let file = csv_file(&["name,age", "ann,31", "bob,45"]);

        let ds = DatasetStore::read_csv(file.path()).unwrap();

        assert!(!ds.is_numeric("name").unwrap());
        assert_eq!(ds.labels("name").unwrap(), vec!["ann", "bob"]);
        assert_eq!(ds.numeric_columns(), vec!["age".to_string()]);
    }

    #[test]
    fn test_late_text_cell_keeps_column_as_text() {
        let mut lines = vec!["id,score".to_string()];
        lines.extend((0..12_000).map(|i| format!("{},10", i)));
        lines.push("12000,oops".to_string());
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        let file = csv_file(&lines);

        let ds = DatasetStore::read_csv(file.path()).unwrap();

        assert!(!ds.is_numeric("score").unwrap());
        assert!(ds.imputed_columns().is_empty());
        assert_eq!(ds.labels("score").unwrap().last().unwrap(), "oops");
        assert_eq!(ds.numeric_columns(), vec!["id".to_string()]);
    }

    #[test]
    fn test_ragged_row_fails_to_load() {
        let file = csv_file(&["a,b", "1,2", "3,4,5,6"]);

        let err = DatasetStore::read_csv(file.path()).unwrap_err();

        assert!(matches!(err, LoadError::CsvError(_)));
        assert!(err.to_string().starts_with("load failed"));
    }

    #[test]
    fn test_missing_file_keeps_previous_dataset() {
        let file = csv_file(&["x", "1", "2"]);
        let mut store = DatasetStore::new();
        store.load(file.path()).unwrap();

        let err = store.load("/definitely/not/here.csv").unwrap_err();

        assert!(err.to_string().starts_with("load failed"));
        assert_eq!(store.current().unwrap().height(), 2);
    }
}
