//! Data Processor Module
//! Cleans freshly loaded frames: mean imputation and categorical tagging.

use crate::stats::StatsCalculator;
use polars::prelude::*;

/// Handles data cleaning operations applied once at load time.
pub struct DataProcessor;

impl DataProcessor {
    /// Whether a dtype takes part in numeric summaries.
    pub fn is_numeric_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Names of the numeric columns, in frame order.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| Self::is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Replace nulls and NaNs in every numeric column with that column's mean.
    ///
    /// Columns that needed filling are rewritten as `Float64`. Returns the
    /// names of the rewritten columns.
    pub fn impute_numeric_means(df: &mut DataFrame) -> PolarsResult<Vec<String>> {
        let mut imputed = Vec::new();

        for name in Self::numeric_columns(df) {
            let as_f64 = df.column(&name)?.cast(&DataType::Float64)?;
            let ca = as_f64.f64()?;

            let values: Vec<f64> = ca
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            if !values.iter().any(|v| v.is_nan()) {
                continue;
            }

            let fill = StatsCalculator::mean(&StatsCalculator::present(&values));
            let filled: Vec<f64> = values
                .into_iter()
                .map(|v| if v.is_nan() { fill } else { v })
                .collect();

            df.with_column(Column::new(name.as_str().into(), filled))?;
            imputed.push(name);
        }

        Ok(imputed)
    }

    /// Cast every string column to `Categorical`. Returns the cast column names.
    pub fn categorize_text_columns(df: &mut DataFrame) -> PolarsResult<Vec<String>> {
        let text_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| matches!(col.dtype(), DataType::String))
            .map(|col| col.name().to_string())
            .collect();

        for name in &text_columns {
            let categorical = df.column(name)?.cast(&DataType::Categorical(
                None,
                CategoricalOrdering::Physical,
            ))?;
            df.with_column(categorical)?;
        }

        Ok(text_columns)
    }

    /// Human-friendly column label: underscores become spaces, words are
    /// title-cased (`total_sales` -> `Total Sales`).
    pub fn display_name(column: &str) -> String {
        let mut out = String::with_capacity(column.len());
        let mut prev_alpha = false;

        for ch in column.chars() {
            let ch = if ch == '_' { ' ' } else { ch };
            if ch.is_alphabetic() {
                if prev_alpha {
                    out.extend(ch.to_lowercase());
                } else {
                    out.extend(ch.to_uppercase());
                }
                prev_alpha = true;
            } else {
                out.push(ch);
                prev_alpha = false;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect()
    }

    #[test]
    fn test_impute_fills_nulls_with_column_mean() {
        let mut df = df!(
            "age" => [20i64, 40, 60],
            "score" => [Some(5.0), None, Some(9.0)]
        )
        .unwrap();

        let imputed = DataProcessor::impute_numeric_means(&mut df).unwrap();

        assert_eq!(imputed, vec!["score".to_string()]);
        assert_eq!(f64_values(&df, "score"), vec![5.0, 7.0, 9.0]);
        // Untouched columns keep their dtype
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_impute_treats_nan_as_missing() {
        let mut df = df!("x" => [1.0, f64::NAN, 2.0, f64::NAN]).unwrap();

        DataProcessor::impute_numeric_means(&mut df).unwrap();

        let values = f64_values(&df, "x");
        assert_relative_eq!(values[1], 1.5);
        assert_relative_eq!(values[3], 1.5);
    }

    #[test]
    fn test_impute_all_missing_column_stays_nan() {
        let mut df = df!("x" => [None::<f64>, None]).unwrap();

        DataProcessor::impute_numeric_means(&mut df).unwrap();

        assert!(f64_values(&df, "x").iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_text_columns_become_categorical() {
        let mut df = df!(
            "city" => ["Oslo", "Lima", "Oslo"],
            "n" => [1i64, 2, 3]
        )
        .unwrap();

        let cast = DataProcessor::categorize_text_columns(&mut df).unwrap();

        assert_eq!(cast, vec!["city".to_string()]);
        assert!(matches!(
            df.column("city").unwrap().dtype(),
            DataType::Categorical(_, _)
        ));
        assert_eq!(DataProcessor::numeric_columns(&df), vec!["n".to_string()]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(DataProcessor::display_name("total_sales"), "Total Sales");
        assert_eq!(DataProcessor::display_name("AGE"), "Age");
        assert_eq!(DataProcessor::display_name("q1_2024value"), "Q1 2024Value");
    }
}
