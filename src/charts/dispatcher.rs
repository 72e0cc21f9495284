//! Chart Dispatcher Module
//! Maps a chart request onto a figure and hands it to a render backend.

use super::figure::{
    BarFigure, Figure, FigureBody, HeatmapFigure, HistogramFigure, HueGroup, LineFigure,
    PieFigure, PieSlice, ReferenceLines, ScatterFigure,
};
use super::palette;
use super::ChartRequest;
use crate::data::{format_number, ColumnError, Dataset};
use crate::state::Selection;
use crate::stats::StatsCalculator;
use log::{debug, info};
use thiserror::Error;

/// Right-closed pie bins: (0, 20], (20, 40], (40, 60], (60, 80].
pub const AGE_BIN_EDGES: [f64; 5] = [0.0, 20.0, 40.0, 60.0, 80.0];
pub const KDE_GRID_POINTS: usize = 200;
pub const BAR_LABEL_ROTATION: f64 = 45.0;
pub const NO_CORRELATIONS: &str = "No correlations to plot.";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("no dataset loaded")]
    NoDataset,
    #[error("operation failed: no {0} selected")]
    MissingSelection(&'static str),
    #[error("operation failed: {0}")]
    Column(#[from] ColumnError),
    #[error("operation failed: no plottable values in {0}")]
    EmptyData(String),
    #[error("operation failed: no values of '{0}' fall in any bin")]
    EmptyBins(String),
    #[error("operation failed: {0}")]
    Render(String),
}

/// Drawing surface for finished figures.
pub trait RenderBackend {
    fn render(&mut self, figure: &Figure) -> Result<(), ChartError>;
}

/// Result of a dispatch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    Warning(String),
}

/// Builds figures from the current dataset and selection.
pub struct ChartDispatcher;

impl ChartDispatcher {
    /// Validate, build and render one chart.
    ///
    /// The backend is called exactly once when the outcome is `Rendered` and
    /// never otherwise.
    pub fn visualize(
        dataset: Option<&Dataset>,
        selection: &Selection,
        backend: &mut dyn RenderBackend,
    ) -> Result<RenderOutcome, ChartError> {
        let dataset = match dataset {
            Some(ds) if !ds.is_empty() => ds,
            _ => return Err(ChartError::NoDataset),
        };

        let request = selection.to_request()?;
        debug!("Dispatching {} chart: {:?}", request.kind(), request);

        match Self::build_figure(dataset, &request, &selection.title)? {
            Some(figure) => {
                backend.render(&figure)?;
                info!("Rendered {} chart '{}'", figure.kind(), figure.title);
                Ok(RenderOutcome::Rendered)
            }
            None => Ok(RenderOutcome::Warning(NO_CORRELATIONS.to_string())),
        }
    }

    /// Build the figure for a request. `None` means there is nothing to draw.
    pub fn build_figure(
        dataset: &Dataset,
        request: &ChartRequest,
        title: &str,
    ) -> Result<Option<Figure>, ChartError> {
        let figure = match request {
            ChartRequest::Line { x, y, marker } => {
                let xs = dataset.numeric_values(x)?;
                let ys = dataset.numeric_values(y)?;
                let points = StatsCalculator::grouped_mean(&xs, &ys);
                if points.is_empty() {
                    return Err(ChartError::EmptyData(format!("'{}' / '{}'", x, y)));
                }
                let x_bounds = (points[0][0], points[points.len() - 1][0]);
                debug!("Line chart: {} groups over {:?}", points.len(), x_bounds);

                Figure {
                    title: title.to_string(),
                    x_label: x.clone(),
                    y_label: y.clone(),
                    body: FigureBody::Line(LineFigure {
                        points,
                        marker: *marker,
                        x_bounds,
                    }),
                }
            }
            ChartRequest::Bar { x, y } => {
                let bars = Self::bar_totals(dataset, x, y)?;
                if bars.is_empty() {
                    return Err(ChartError::EmptyData(format!("'{}' / '{}'", x, y)));
                }
                debug!("Bar chart: {} categories", bars.len());

                Figure {
                    title: title.to_string(),
                    x_label: x.clone(),
                    y_label: y.clone(),
                    body: FigureBody::Bar(BarFigure {
                        bars,
                        label_rotation: BAR_LABEL_ROTATION,
                    }),
                }
            }
            ChartRequest::Scatter { x, y, hue } => {
                let groups = Self::hue_groups(dataset, x, y, hue)?;
                if groups.is_empty() {
                    return Err(ChartError::EmptyData(format!("'{}' / '{}'", x, y)));
                }
                debug!("Scatter chart: {} hue groups by '{}'", groups.len(), hue);

                Figure {
                    title: title.to_string(),
                    x_label: x.clone(),
                    y_label: y.clone(),
                    body: FigureBody::Scatter(ScatterFigure {
                        hue_column: hue.clone(),
                        groups,
                    }),
                }
            }
            ChartRequest::Pie { x } => {
                let slices = Self::pie_slices(&dataset.numeric_values(x)?);
                if slices.is_empty() {
                    return Err(ChartError::EmptyBins(x.clone()));
                }

                Figure {
                    title: title.to_string(),
                    x_label: String::new(),
                    y_label: String::new(),
                    body: FigureBody::Pie(PieFigure { slices }),
                }
            }
            ChartRequest::Histogram { x } => {
                let values = StatsCalculator::present(&dataset.numeric_values(x)?);
                if values.is_empty() {
                    return Err(ChartError::EmptyData(format!("'{}'", x)));
                }

                let bins = StatsCalculator::histogram_bins(&values);
                let bin_width = bins.first().map(|b| b.width()).unwrap_or(1.0);
                let scale = values.len() as f64 * bin_width;
                let density = StatsCalculator::gaussian_kde(&values, KDE_GRID_POINTS)
                    .into_iter()
                    .map(|[gx, d]| [gx, d * scale])
                    .collect();
                let reference = ReferenceLines {
                    mean: StatsCalculator::mean(&values),
                    median: StatsCalculator::median(&values),
                    std_dev: StatsCalculator::std_dev(&values),
                };
                debug!("Histogram: {} bins, {:?}", bins.len(), reference);

                Figure {
                    title: title.to_string(),
                    x_label: x.clone(),
                    y_label: "Frequency".to_string(),
                    body: FigureBody::Histogram(HistogramFigure {
                        bins,
                        density,
                        reference,
                    }),
                }
            }
            ChartRequest::Heatmap => {
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
                    debug!("Heatmap skipped: no numeric columns");
                    return Ok(None);
                }

                Figure {
                    title: title.to_string(),
                    x_label: String::new(),
                    y_label: String::new(),
                    body: FigureBody::Heatmap(HeatmapFigure { matrix }),
                }
            }
        };

        Ok(Some(figure))
    }

    /// Sum of y per distinct x. Numeric x sorts numerically, text x lexically.
    fn bar_totals(dataset: &Dataset, x: &str, y: &str) -> Result<Vec<(String, f64)>, ChartError> {
        let ys = dataset.numeric_values(y)?;
        let numeric_x = dataset.is_numeric(x)?;

        let (labels, values): (Vec<String>, Vec<f64>) = dataset
            .text_values(x)?
            .into_iter()
            .zip(ys)
            .filter_map(|(label, v)| label.map(|l| (l, v)))
            .unzip();

        let mut bars = StatsCalculator::grouped_sum(&labels, &values);
        if numeric_x {
            bars.sort_by(|a, b| {
                let ka = a.0.parse::<f64>().unwrap_or(f64::NAN);
                let kb = b.0.parse::<f64>().unwrap_or(f64::NAN);
                ka.total_cmp(&kb)
            });
        } else {
            bars.sort_by(|a, b| a.0.cmp(&b.0));
        }

        Ok(bars)
    }

    /// One point series per distinct hue value, viridis-colored in hue order.
    fn hue_groups(
        dataset: &Dataset,
        x: &str,
        y: &str,
        hue: &str,
    ) -> Result<Vec<HueGroup>, ChartError> {
        let xs = dataset.numeric_values(x)?;
        let ys = dataset.numeric_values(y)?;
        let hues = dataset.labels(hue)?;

        let order = distinct_sorted(&hues, dataset.is_numeric(hue)?);
        let colors = palette::viridis_samples(order.len());

        let groups = order
            .into_iter()
            .zip(colors)
            .map(|(label, color)| {
                let points = hues
                    .iter()
                    .zip(xs.iter().zip(ys.iter()))
                    .filter(|(h, (px, py))| **h == label && !px.is_nan() && !py.is_nan())
                    .map(|(_, (px, py))| [*px, *py])
                    .collect();
                HueGroup {
                    label,
                    points,
                    color,
                }
            })
            .filter(|g: &HueGroup| !g.points.is_empty())
            .collect();

        Ok(groups)
    }

    /// Non-empty age bins, largest first.
    fn pie_slices(values: &[f64]) -> Vec<PieSlice> {
        let counts = StatsCalculator::bin_counts(values, &AGE_BIN_EDGES);
        let total: usize = counts.iter().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut slices: Vec<PieSlice> = AGE_BIN_EDGES
            .windows(2)
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(edges, count)| PieSlice {
                label: format!("({}, {}]", format_number(edges[0]), format_number(edges[1])),
                count,
                fraction: count as f64 / total as f64,
            })
            .collect();
        slices.sort_by(|a, b| b.count.cmp(&a.count));

        slices
    }
}

/// Distinct labels in ascending order, numerically when `numeric` is set.
fn distinct_sorted(labels: &[String], numeric: bool) -> Vec<String> {
    let mut distinct: Vec<String> = labels.to_vec();
    if numeric {
        distinct.sort_by(|a, b| {
            let ka = a.parse::<f64>().unwrap_or(f64::NAN);
            let kb = b.parse::<f64>().unwrap_or(f64::NAN);
            ka.total_cmp(&kb)
        });
    } else {
        distinct.sort();
    }
    distinct.dedup();
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartKind, Marker};
    use crate::data::DatasetStore;
    use approx::assert_relative_eq;
    use polars::prelude::*;
    use std::io::Write;

    #[derive(Default)]
    struct RecordingBackend {
        figures: Vec<Figure>,
    }

    impl RenderBackend for RecordingBackend {
        fn render(&mut self, figure: &Figure) -> Result<(), ChartError> {
            self.figures.push(figure.clone());
            Ok(())
        }
    }

    struct FailingBackend;

    impl RenderBackend for FailingBackend {
        fn render(&mut self, _figure: &Figure) -> Result<(), ChartError> {
            Err(ChartError::Render("surface lost".to_string()))
        }
    }

    fn people() -> Dataset {
        let df = df!(
            "age" => [20i64, 20, 40, 60, 35, 75],
            "score" => [4.0, 6.0, 7.0, 9.0, 5.0, 8.0],
            "team" => ["b", "a", "b", "c", "a", "c"]
        )
        .unwrap();
        Dataset::from_frame(df, "people.csv").unwrap()
    }

    fn select(kind: ChartKind, x: &str, y: &str) -> Selection {
        Selection {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
            hue: Some("team".to_string()),
            title: "Title".to_string(),
            kind,
            marker: Marker::Circle,
        }
    }

    #[test]
    fn test_every_kind_renders_once() {
        let ds = people();
        for kind in ChartKind::ALL {
            let mut backend = RecordingBackend::default();
            let outcome =
                ChartDispatcher::visualize(Some(&ds), &select(kind, "age", "score"), &mut backend)
                    .unwrap();

            assert_eq!(outcome, RenderOutcome::Rendered);
            assert_eq!(backend.figures.len(), 1);
            assert_eq!(backend.figures[0].kind(), kind);
            assert_eq!(backend.figures[0].title, "Title");
        }
    }

    #[test]
    fn test_no_dataset_skips_backend() {
        let mut backend = RecordingBackend::default();
        let err = ChartDispatcher::visualize(
            None,
            &select(ChartKind::Line, "age", "score"),
            &mut backend,
        )
        .unwrap_err();

        assert!(matches!(err, ChartError::NoDataset));
        assert_eq!(err.to_string(), "no dataset loaded");
        assert!(backend.figures.is_empty());
    }

    #[test]
    fn test_zero_row_dataset_counts_as_missing() {
        let df = df!("age" => Vec::<f64>::new(), "score" => Vec::<f64>::new()).unwrap();
        let ds = Dataset::from_frame(df, "empty.csv").unwrap();
        let mut backend = RecordingBackend::default();

        let err = ChartDispatcher::visualize(
            Some(&ds),
            &select(ChartKind::Histogram, "age", "score"),
            &mut backend,
        )
        .unwrap_err();

        assert!(matches!(err, ChartError::NoDataset));
        assert!(backend.figures.is_empty());
    }

    #[test]
    fn test_line_groups_mean_by_x() {
        let ds = people();
        let mut backend = RecordingBackend::default();

        ChartDispatcher::visualize(
            Some(&ds),
            &select(ChartKind::Line, "age", "score"),
            &mut backend,
        )
        .unwrap();

        let FigureBody::Line(line) = &backend.figures[0].body else {
            panic!("expected a line figure");
        };
        assert_eq!(
            line.points,
            vec![[20.0, 5.0], [35.0, 5.0], [40.0, 7.0], [60.0, 9.0], [75.0, 8.0]]
        );
        assert_eq!(line.x_bounds, (20.0, 75.0));
        assert_eq!(line.marker, Marker::Circle);
        assert_eq!(backend.figures[0].x_label, "age");
        assert_eq!(backend.figures[0].y_label, "score");
    }

    #[test]
    fn test_loaded_csv_line_uses_imputed_means() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "age,score\n20,5\n40,NaN\n60,9").unwrap();
        file.flush().unwrap();
        let mut store = DatasetStore::new();
        let ds = store.load(file.path()).unwrap();
        let mut backend = RecordingBackend::default();

        let outcome = ChartDispatcher::visualize(
            Some(&ds),
            &select(ChartKind::Line, "age", "score"),
            &mut backend,
        )
        .unwrap();

        assert_eq!(outcome, RenderOutcome::Rendered);
        assert_eq!(backend.figures.len(), 1);
        let FigureBody::Line(line) = &backend.figures[0].body else {
            panic!("expected a line figure");
        };
        assert_eq!(line.points, vec![[20.0, 5.0], [40.0, 7.0], [60.0, 9.0]]);
        assert_eq!(line.x_bounds, (20.0, 60.0));
    }

    #[test]
    fn test_line_requires_numeric_x() {
        let ds = people();
        let mut backend = RecordingBackend::default();

        let err = ChartDispatcher::visualize(
            Some(&ds),
            &select(ChartKind::Line, "team", "score"),
            &mut backend,
        )
        .unwrap_err();

        assert!(matches!(err, ChartError::Column(ColumnError::NotNumeric(_))));
        assert!(err.to_string().starts_with("operation failed"));
    }

    #[test]
    fn test_missing_column() {
        let ds = people();
        let mut backend = RecordingBackend::default();

        let err = ChartDispatcher::visualize(
            Some(&ds),
            &select(ChartKind::Bar, "height", "score"),
            &mut backend,
        )
        .unwrap_err();

        assert!(matches!(err, ChartError::Column(ColumnError::NotFound(_))));
        assert!(backend.figures.is_empty());
    }

    #[test]
    fn test_missing_selection() {
        let ds = people();
        let mut selection = select(ChartKind::Line, "age", "score");
        selection.y = None;

        let err = ChartDispatcher::visualize(Some(&ds), &selection, &mut RecordingBackend::default())
            .unwrap_err();

        assert!(matches!(err, ChartError::MissingSelection(_)));
    }

    #[test]
    fn test_bar_sums_and_sorts() {
        let ds = people();

        let text = ChartDispatcher::build_figure(
            &ds,
            &ChartRequest::Bar {
                x: "team".into(),
                y: "score".into(),
            },
            "",
        )
        .unwrap()
        .unwrap();
        let FigureBody::Bar(bar) = text.body else {
            panic!("expected a bar figure");
        };
        assert_eq!(
            bar.bars,
            vec![
                ("a".to_string(), 11.0),
                ("b".to_string(), 11.0),
                ("c".to_string(), 17.0)
            ]
        );
        assert_relative_eq!(bar.label_rotation, 45.0);

        let numeric = ChartDispatcher::build_figure(
            &ds,
            &ChartRequest::Bar {
                x: "age".into(),
                y: "score".into(),
            },
            "",
        )
        .unwrap()
        .unwrap();
        let FigureBody::Bar(bar) = numeric.body else {
            panic!("expected a bar figure");
        };
        let labels: Vec<&str> = bar.bars.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["20", "35", "40", "60", "75"]);
        assert_relative_eq!(bar.bars[0].1, 10.0);
    }

    #[test]
    fn test_scatter_groups_by_hue() {
        let ds = people();

        let figure = ChartDispatcher::build_figure(
            &ds,
            &ChartRequest::Scatter {
                x: "age".into(),
                y: "score".into(),
                hue: "team".into(),
            },
            "",
        )
        .unwrap()
        .unwrap();

        let FigureBody::Scatter(scatter) = figure.body else {
            panic!("expected a scatter figure");
        };
        let labels: Vec<&str> = scatter.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(scatter.groups[0].points, vec![[20.0, 6.0], [35.0, 5.0]]);
        assert_eq!(scatter.groups[0].color, palette::viridis(0.0));
        assert_eq!(scatter.groups[2].color, palette::viridis(1.0));
        assert_eq!(scatter.hue_column, "team");
    }

    #[test]
    fn test_pie_bins_by_count() {
        let ds = people();

        let figure = ChartDispatcher::build_figure(&ds, &ChartRequest::Pie { x: "age".into() }, "")
            .unwrap()
            .unwrap();

        let FigureBody::Pie(pie) = figure.body else {
            panic!("expected a pie figure");
        };
        let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
        // 20, 20 -> (0, 20]; 35, 40 -> (20, 40]; 60 -> (40, 60]; 75 -> (60, 80]
        assert_eq!(labels, vec!["(0, 20]", "(20, 40]", "(40, 60]", "(60, 80]"]);
        assert_eq!(pie.slices[0].count, 2);
        assert_eq!(pie.slices[0].percent_label(), "33.3%");
        assert_relative_eq!(pie.slices.iter().map(|s| s.fraction).sum::<f64>(), 1.0);
    }

    #[test]
    fn test_pie_without_binned_values() {
        let df = df!("age" => [90.0, 120.0, -3.0]).unwrap();
        let ds = Dataset::from_frame(df, "old.csv").unwrap();
        let mut selection = select(ChartKind::Pie, "age", "age");
        selection.hue = None;

        let err = ChartDispatcher::visualize(Some(&ds), &selection, &mut RecordingBackend::default())
            .unwrap_err();

        assert!(matches!(err, ChartError::EmptyBins(_)));
    }

    #[test]
    fn test_histogram_reference_lines() {
        let df = df!("score" => [5.0, 7.0, 9.0, 7.0]).unwrap();
        let ds = Dataset::from_frame(df, "scores.csv").unwrap();

        let figure =
            ChartDispatcher::build_figure(&ds, &ChartRequest::Histogram { x: "score".into() }, "")
                .unwrap()
                .unwrap();

        let FigureBody::Histogram(hist) = figure.body else {
            panic!("expected a histogram figure");
        };
        assert_relative_eq!(hist.reference.mean, 7.0);
        assert_relative_eq!(hist.reference.median, 7.0);
        assert_relative_eq!(hist.reference.lower(), 7.0 - hist.reference.std_dev);
        assert_relative_eq!(hist.reference.std_dev, (8.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(hist.density.len(), KDE_GRID_POINTS);
        assert_eq!(figure.y_label, "Frequency");
    }

    #[test]
    fn test_heatmap_without_numeric_columns_warns() {
        let df = df!("name" => ["ann", "bob"], "city" => ["x", "y"]).unwrap();
        let ds = Dataset::from_frame(df, "names.csv").unwrap();
        let mut backend = RecordingBackend::default();
        let selection = Selection {
            kind: ChartKind::Heatmap,
            ..Selection::default()
        };

        let outcome = ChartDispatcher::visualize(Some(&ds), &selection, &mut backend).unwrap();

        assert_eq!(outcome, RenderOutcome::Warning(NO_CORRELATIONS.to_string()));
        assert!(backend.figures.is_empty());
    }

    #[test]
    fn test_heatmap_matrix_over_numeric_columns() {
        let ds = people();

        let figure = ChartDispatcher::build_figure(&ds, &ChartRequest::Heatmap, "")
            .unwrap()
            .unwrap();

        let FigureBody::Heatmap(heatmap) = figure.body else {
            panic!("expected a heatmap figure");
        };
        assert_eq!(heatmap.matrix.labels, vec!["age", "score"]);
        assert_relative_eq!(heatmap.matrix.values[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            heatmap.matrix.values[0][1],
            heatmap.matrix.values[1][0],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_backend_failure_propagates() {
        let ds = people();

        let err = ChartDispatcher::visualize(
            Some(&ds),
            &select(ChartKind::Histogram, "age", "score"),
            &mut FailingBackend,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "operation failed: surface lost");
    }

    #[test]
    fn test_distinct_sorted_numeric() {
        let labels: Vec<String> = ["10", "2", "10", "1.5"].iter().map(|s| s.to_string()).collect();
        assert_eq!(distinct_sorted(&labels, true), vec!["1.5", "2", "10"]);
        assert_eq!(distinct_sorted(&labels, false), vec!["1.5", "10", "2"]);
    }
}
