//! Statistics Calculator Module
//! Handles descriptive stats, correlation, binning and kernel density estimates.

use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Summary of one numeric column, pandas `describe()` semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Square matrix of pairwise Pearson coefficients.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }
}

/// One histogram bar: `[start, end)`, the last bin closed on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Upper bound on automatic histogram bins.
const MAX_BINS: usize = 1000;

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Values with NaNs dropped.
    pub fn present(values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|v| !v.is_nan()).collect()
    }

    /// Arithmetic mean, NaN for an empty slice.
    pub fn mean(values: &[f64]) -> f64 {
        values.iter().mean()
    }

    /// Sample standard deviation (n - 1), NaN below two values.
    pub fn std_dev(values: &[f64]) -> f64 {
        values.iter().std_dev()
    }

    /// Compute descriptive statistics, skipping NaNs.
    pub fn describe(values: &[f64]) -> ColumnSummary {
        let mut sorted = Self::present(values);
        if sorted.is_empty() {
            return ColumnSummary::default();
        }
        sorted.sort_by(f64::total_cmp);

        ColumnSummary {
            count: sorted.len(),
            mean: Self::mean(&sorted),
            std: Self::std_dev(&sorted),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[sorted.len() - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Median of the non-NaN values.
    pub fn median(values: &[f64]) -> f64 {
        let mut sorted = Self::present(values);
        sorted.sort_by(f64::total_cmp);
        Self::percentile(&sorted, 50.0)
    }

    /// Pearson correlation over rows where both values are present.
    ///
    /// NaN with fewer than two complete pairs or a constant input.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y.iter())
            .filter(|(a, b)| !a.is_nan() && !b.is_nan())
            .map(|(a, b)| (*a, *b))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = Self::std_dev(&xs);
        let sy = Self::std_dev(&ys);
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        let r = xs.iter().covariance(ys.iter()) / (sx * sy);
        r.clamp(-1.0, 1.0)
    }

    /// Pairwise correlation of named columns; rows are computed in parallel.
    pub fn correlation_matrix(columns: &[(String, Vec<f64>)]) -> CorrelationMatrix {
        let values = columns
            .par_iter()
            .map(|(_, a)| {
                columns
                    .iter()
                    .map(|(_, b)| Self::pearson(a, b))
                    .collect::<Vec<f64>>()
            })
            .collect();

        CorrelationMatrix {
            labels: columns.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    /// Mean of `values` per distinct key, ascending by key.
    pub fn grouped_mean(keys: &[f64], values: &[f64]) -> Vec<[f64; 2]> {
        let mut pairs: Vec<(f64, f64)> = keys
            .iter()
            .zip(values.iter())
            .filter(|(k, v)| !k.is_nan() && !v.is_nan())
            .map(|(k, v)| (*k, *v))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut grouped: Vec<[f64; 2]> = Vec::new();
        let mut run: Vec<f64> = Vec::new();
        let mut current_key = f64::NAN;

        for (key, value) in pairs {
            if !run.is_empty() && key != current_key {
                grouped.push([current_key, Self::mean(&run)]);
                run.clear();
            }
            current_key = key;
            run.push(value);
        }
        if !run.is_empty() {
            grouped.push([current_key, Self::mean(&run)]);
        }

        grouped
    }

    /// Sum of `values` per distinct label, in first-seen label order.
    pub fn grouped_sum(labels: &[String], values: &[f64]) -> Vec<(String, f64)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut sums: Vec<(String, f64)> = Vec::new();

        for (label, value) in labels.iter().zip(values.iter()) {
            let slot = *index.entry(label.as_str()).or_insert_with(|| {
                sums.push((label.clone(), 0.0));
                sums.len() - 1
            });
            if !value.is_nan() {
                sums[slot].1 += value;
            }
        }

        sums
    }

    /// Count values per right-closed interval `(edges[i], edges[i + 1]]`.
    ///
    /// Values outside `(first, last]` are not counted.
    pub fn bin_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
        let mut counts = vec![0; edges.len().saturating_sub(1)];

        for &v in values.iter().filter(|v| !v.is_nan()) {
            if let Some(i) = edges.windows(2).position(|w| v > w[0] && v <= w[1]) {
                counts[i] += 1;
            }
        }

        counts
    }

    /// Equal-width histogram using NumPy's `auto` rule: the smaller of the
    /// Sturges and Freedman-Diaconis bin widths.
    pub fn histogram_bins(values: &[f64]) -> Vec<HistogramBin> {
        let mut sorted = Self::present(values);
        if sorted.is_empty() {
            return Vec::new();
        }
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mut lo = sorted[0];
        let mut hi = sorted[n - 1];
        let range = hi - lo;

        let n_bins = if range == 0.0 {
            lo -= 0.5;
            hi += 0.5;
            1
        } else {
            let sturges = range / ((n as f64).log2() + 1.0);
            let iqr = Self::percentile(&sorted, 75.0) - Self::percentile(&sorted, 25.0);
            let fd = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);
            let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
            ((range / width).ceil() as usize).clamp(1, MAX_BINS)
        };

        let width = (hi - lo) / n_bins as f64;
        let mut bins: Vec<HistogramBin> = (0..n_bins)
            .map(|i| HistogramBin {
                start: lo + i as f64 * width,
                end: if i + 1 == n_bins {
                    hi
                } else {
                    lo + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();

        for v in sorted {
            let idx = (((v - lo) / width).floor() as usize).min(n_bins - 1);
            bins[idx].count += 1;
        }

        bins
    }

    /// Gaussian kernel density over `[min, max]` with Scott's bandwidth.
    ///
    /// Empty when there are fewer than two values or no spread.
    pub fn gaussian_kde(values: &[f64], grid_points: usize) -> Vec<[f64; 2]> {
        let data = Self::present(values);
        let n = data.len();
        if n < 2 || grid_points < 2 {
            return Vec::new();
        }

        let std = Self::std_dev(&data);
        if !(std > 0.0) {
            return Vec::new();
        }
        let bandwidth = std * (n as f64).powf(-0.2);

        let Ok(kernel) = Normal::new(0.0, 1.0) else {
            return Vec::new();
        };

        let lo = data.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = (hi - lo) / (grid_points - 1) as f64;

        (0..grid_points)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density = data
                    .iter()
                    .map(|xi| kernel.pdf((x - xi) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                [x, density]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_describe_matches_pandas() {
        let s = StatsCalculator::describe(&[5.0, 7.0, 9.0]);
        assert_eq!(s.count, 3);
        assert_relative_eq!(s.mean, 7.0);
        assert_relative_eq!(s.std, 2.0);
        assert_relative_eq!(s.min, 5.0);
        assert_relative_eq!(s.q25, 6.0);
        assert_relative_eq!(s.median, 7.0);
        assert_relative_eq!(s.q75, 8.0);
        assert_relative_eq!(s.max, 9.0);
    }

    #[test]
    fn test_describe_skips_nan_and_handles_empty() {
        let s = StatsCalculator::describe(&[1.0, f64::NAN, 3.0]);
        assert_eq!(s.count, 2);
        assert_relative_eq!(s.mean, 2.0);

        let empty = StatsCalculator::describe(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn test_single_value_has_nan_std() {
        let s = StatsCalculator::describe(&[4.0]);
        assert!(s.std.is_nan());
        assert_relative_eq!(s.q75, 4.0);
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(StatsCalculator::pearson(&x, &[2.0, 4.0, 6.0, 8.0]), 1.0);
        assert_relative_eq!(StatsCalculator::pearson(&x, &[8.0, 6.0, 4.0, 2.0]), -1.0);
        assert!(StatsCalculator::pearson(&x, &[1.0, 1.0, 1.0, 1.0]).is_nan());
        // Incomplete pairs are dropped
        assert_relative_eq!(
            StatsCalculator::pearson(&[1.0, 2.0, f64::NAN, 3.0], &[1.0, 2.0, 9.0, 3.0]),
            1.0
        );
    }

    #[test]
    fn test_correlation_matrix_is_symmetric_with_unit_diagonal() {
        let columns = vec![
            ("a".to_string(), vec![1.0, 2.0, 3.0, 5.0]),
            ("b".to_string(), vec![2.0, 1.0, 4.0, 3.0]),
        ];
        let m = StatsCalculator::correlation_matrix(&columns);

        assert_eq!(m.labels, vec!["a", "b"]);
        assert_relative_eq!(m.values[0][0], 1.0);
        assert_relative_eq!(m.values[1][1], 1.0);
        assert_relative_eq!(m.values[0][1], m.values[1][0]);
        assert!(StatsCalculator::correlation_matrix(&[]).is_empty());
    }

    #[test]
    fn test_grouped_mean_sorted_by_key() {
        let keys = [40.0, 20.0, 40.0, 60.0];
        let values = [6.0, 5.0, 8.0, 9.0];
        assert_eq!(
            StatsCalculator::grouped_mean(&keys, &values),
            vec![[20.0, 5.0], [40.0, 7.0], [60.0, 9.0]]
        );
    }

    #[test]
    fn test_grouped_sum_first_seen_order() {
        let labels: Vec<String> = ["b", "a", "b"].iter().map(|s| s.to_string()).collect();
        let sums = StatsCalculator::grouped_sum(&labels, &[1.0, 2.0, f64::NAN]);
        assert_eq!(sums, vec![("b".to_string(), 1.0), ("a".to_string(), 2.0)]);
    }

    #[test]
    fn test_bin_counts_are_right_closed() {
        let edges = [0.0, 20.0, 40.0, 60.0, 80.0];
        let counts = StatsCalculator::bin_counts(&[0.0, 10.0, 20.0, 21.0, 80.0, 81.0], &edges);
        assert_eq!(counts, vec![2, 1, 0, 1]);
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = StatsCalculator::histogram_bins(&values);

        assert!(bins.len() > 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_relative_eq!(bins[0].start, 0.0);
        assert_relative_eq!(bins[bins.len() - 1].end, 99.0);
    }

    #[test]
    fn test_histogram_constant_values_single_bin() {
        let bins = StatsCalculator::histogram_bins(&[3.0, 3.0]);
        assert_eq!(bins.len(), 1);
        assert_relative_eq!(bins[0].start, 2.5);
        assert_relative_eq!(bins[0].end, 3.5);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn test_kde_integrates_to_roughly_one_over_wide_data() {
        let values: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        let curve = StatsCalculator::gaussian_kde(&values, 400);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();

        assert!(area > 0.8 && area <= 1.0, "area was {}", area);
        assert!(StatsCalculator::gaussian_kde(&[1.0], 10).is_empty());
    }
}
