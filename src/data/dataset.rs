//! Loaded dataset value and typed column access.

use super::DataProcessor;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("column '{0}' not found")]
    NotFound(String),
    #[error("column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("{0}")]
    Polars(#[from] PolarsError),
}

/// A cleaned table: numeric gaps imputed, text columns categorical.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    source: PathBuf,
    imputed: Vec<String>,
}

impl Dataset {
    /// Clean a raw frame and wrap it.
    pub fn from_frame(mut df: DataFrame, source: impl Into<PathBuf>) -> PolarsResult<Self> {
        let imputed = DataProcessor::impute_numeric_means(&mut df)?;
        DataProcessor::categorize_text_columns(&mut df)?;

        Ok(Self {
            df,
            source: source.into(),
            imputed,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Columns whose missing values were filled at load time.
    pub fn imputed_columns(&self) -> &[String] {
        &self.imputed
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn numeric_columns(&self) -> Vec<String> {
        DataProcessor::numeric_columns(&self.df)
    }

    fn column(&self, name: &str) -> Result<&Column, ColumnError> {
        self.df
            .column(name)
            .map_err(|_| ColumnError::NotFound(name.to_string()))
    }

    pub fn is_numeric(&self, name: &str) -> Result<bool, ColumnError> {
        Ok(DataProcessor::is_numeric_dtype(self.column(name)?.dtype()))
    }

    /// Values of a numeric column as `f64`; nulls come back as NaN.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>, ColumnError> {
        let column = self.column(name)?;
        if !DataProcessor::is_numeric_dtype(column.dtype()) {
            return Err(ColumnError::NotNumeric(name.to_string()));
        }

        let as_f64 = column.cast(&DataType::Float64)?;
        Ok(as_f64
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Any column rendered as text, `None` for missing cells.
    pub fn text_values(&self, name: &str) -> Result<Vec<Option<String>>, ColumnError> {
        if self.is_numeric(name)? {
            return Ok(self
                .numeric_values(name)?
                .into_iter()
                .map(|v| (!v.is_nan()).then(|| format_number(v)))
                .collect());
        }

        let as_text = self.column(name)?.cast(&DataType::String)?;
        let series = as_text.as_materialized_series();
        Ok(series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    /// Cell labels for grouping and legends; missing cells read `NaN`.
    pub fn labels(&self, name: &str) -> Result<Vec<String>, ColumnError> {
        Ok(self
            .text_values(name)?
            .into_iter()
            .map(|v| v.unwrap_or_else(|| "NaN".to_string()))
            .collect())
    }
}

/// Integral values print without a fractional part (`40`, not `40.0`).
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df!(
            "age" => [20i64, 40, 60],
            "score" => [Some(5.0), None, Some(9.0)],
            "team" => [Some("red"), None, Some("blue")]
        )
        .unwrap();
        Dataset::from_frame(df, "sample.csv").unwrap()
    }

    #[test]
    fn test_numeric_values_after_imputation() {
        let ds = sample();
        assert_eq!(ds.numeric_values("score").unwrap(), vec![5.0, 7.0, 9.0]);
        assert_eq!(ds.imputed_columns(), ["score".to_string()]);
    }

    #[test]
    fn test_numeric_access_rejects_text_column() {
        let ds = sample();
        let err = ds.numeric_values("team").unwrap_err();
        assert!(matches!(err, ColumnError::NotNumeric(ref c) if c == "team"));
    }

    #[test]
    fn test_unknown_column() {
        let ds = sample();
        let err = ds.labels("height").unwrap_err();
        assert_eq!(err.to_string(), "column 'height' not found");
    }

    #[test]
    fn test_labels_for_numeric_and_categorical() {
        let ds = sample();
        assert_eq!(ds.labels("age").unwrap(), vec!["20", "40", "60"]);
        assert_eq!(ds.labels("team").unwrap(), vec!["red", "NaN", "blue"]);
        assert_eq!(
            ds.text_values("team").unwrap(),
            vec![Some("red".to_string()), None, Some("blue".to_string())]
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(40.0), "40");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
