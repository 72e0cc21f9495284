//! Static Chart Renderer
//! Draws a figure into a PNG with plotters, for snapshots of plot windows.
//!
//! Layout follows the interactive view: title on top, axes with the column
//! names, legend in the upper right where the chart has one.

use super::figure::{
    heatmap_annotation, wedge_outline, BarFigure, Figure, FigureBody, HeatmapFigure,
    HistogramFigure, LineFigure, PieFigure, ScatterFigure,
};
use super::palette::{self, Rgb};
use super::{ChartError, Marker};
use image::{ImageFormat, RgbImage};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const FONT: &str = "sans-serif";

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render a figure to PNG bytes.
    pub fn render_png(figure: &Figure, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            let area = if figure.title.is_empty() {
                root
            } else {
                root.titled(&figure.title, (FONT, 24)).map_err(render_error)?
            };

            match &figure.body {
                FigureBody::Line(line) => Self::draw_line(&area, figure, line)?,
                FigureBody::Bar(bar) => Self::draw_bar(&area, figure, bar)?,
                FigureBody::Scatter(scatter) => Self::draw_scatter(&area, figure, scatter)?,
                FigureBody::Pie(pie) => Self::draw_pie(&area, pie)?,
                FigureBody::Histogram(hist) => Self::draw_histogram(&area, figure, hist)?,
                FigureBody::Heatmap(heatmap) => Self::draw_heatmap(&area, heatmap)?,
            }

            area.present().map_err(render_error)?;
        }

        encode_png(buffer, width, height)
    }

    /// Render and write a PNG, returning the written path.
    pub fn save_png(
        figure: &Figure,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
    ) -> Result<PathBuf, ChartError> {
        let path = path.as_ref();
        let bytes = Self::render_png(figure, width, height)?;
        fs::write(path, bytes).map_err(render_error)?;
        info!("Saved {} chart snapshot to {}", figure.kind(), path.display());
        Ok(path.to_path_buf())
    }

    fn draw_line(area: &Area, figure: &Figure, line: &LineFigure) -> Result<(), ChartError> {
        let (x0, x1) = widen(line.x_bounds.0, line.x_bounds.1);
        let (y0, y1) = padded_range(line.points.iter().map(|p| p[1]));
        let color = rgb(palette::LINE_COLOR);

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        let points: Vec<(f64, f64)> = line.points.iter().map(|p| (p[0], p[1])).collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(render_error)?;

        let filled = color.filled();
        let stroke = color.stroke_width(2);
        match line.marker {
            Marker::None => {}
            Marker::Point => {
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 2, filled)))
                    .map_err(render_error)?;
            }
            Marker::Circle => {
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 4, filled)))
                    .map_err(render_error)?;
            }
            Marker::Cross => {
                chart
                    .draw_series(points.iter().map(|&p| Cross::new(p, 4, stroke)))
                    .map_err(render_error)?;
            }
            Marker::Plus => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p)
                            + PathElement::new(vec![(-5, 0), (5, 0)], stroke)
                            + PathElement::new(vec![(0, -5), (0, 5)], stroke)
                    }))
                    .map_err(render_error)?;
            }
            Marker::Star => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p)
                            + Cross::new((0, 0), 4, stroke)
                            + PathElement::new(vec![(-5, 0), (5, 0)], stroke)
                            + PathElement::new(vec![(0, -5), (0, 5)], stroke)
                    }))
                    .map_err(render_error)?;
            }
            Marker::Square => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], filled)
                    }))
                    .map_err(render_error)?;
            }
            Marker::Diamond => {
                chart
                    .draw_series(points.iter().map(|&p| {
                        EmptyElement::at(p)
                            + Polygon::new(vec![(0, -5), (5, 0), (0, 5), (-5, 0)], filled)
                    }))
                    .map_err(render_error)?;
            }
        }

        Ok(())
    }

    fn draw_bar(area: &Area, figure: &Figure, bar: &BarFigure) -> Result<(), ChartError> {
        let n = bar.bars.len();
        let (lo, hi) = padded_range(bar.bars.iter().map(|(_, v)| *v).chain([0.0]));
        let y0 = if bar.bars.iter().any(|(_, v)| *v < 0.0) {
            lo
        } else {
            0.0
        };
        let fill = rgb(palette::BAR_COLOR);
        let labels: Vec<&str> = bar.bars.iter().map(|(l, _)| l.as_str()).collect();

        // plotters only rotates text in quarter turns.
        let label_font = (FONT, 13).into_font().transform(FontTransform::Rotate90);

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(110)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), y0..hi)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_style(label_font)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => {
                    labels.get(*i).map(|s| s.to_string()).unwrap_or_default()
                }
                _ => String::new(),
            })
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(bar.bars.iter().enumerate().map(|(i, (_, value))| {
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), *value),
                    ],
                    fill.filled(),
                );
                rect.set_margin(0, 0, 6, 6);
                rect
            }))
            .map_err(render_error)?;

        Ok(())
    }

    fn draw_scatter(
        area: &Area,
        figure: &Figure,
        scatter: &ScatterFigure,
    ) -> Result<(), ChartError> {
        let all = || scatter.groups.iter().flat_map(|g| g.points.iter());
        let (x0, x1) = padded_range(all().map(|p| p[0]));
        let (y0, y1) = padded_range(all().map(|p| p[1]));

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        for group in &scatter.groups {
            let color = rgb(group.color);
            chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(move |p| Circle::new((p[0], p[1]), 4, color.filled())),
                )
                .map_err(render_error)?
                .label(group.label.clone())
                .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        Ok(())
    }

    fn draw_pie(area: &Area, pie: &PieFigure) -> Result<(), ChartError> {
        let (w, h) = area.dim_in_pixel();
        let center = (w as f64 / 2.0, h as f64 / 2.0);
        let radius = w.min(h) as f64 * 0.35;
        let to_pixel = |x: f64, y: f64| {
            (
                (center.0 + x * radius).round() as i32,
                (center.1 - y * radius).round() as i32,
            )
        };

        let percent_style = TextStyle::from((FONT, 16).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let label_style = TextStyle::from((FONT, 15).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (i, (slice, wedge)) in pie.slices.iter().zip(pie.wedges()).enumerate() {
            let outline: Vec<(i32, i32)> = wedge_outline([0.0, 0.0], 1.0, wedge)
                .into_iter()
                .map(|[x, y]| to_pixel(x, y))
                .collect();
            area.draw(&Polygon::new(outline.clone(), rgb(palette::category(i)).filled()))
                .map_err(render_error)?;
            area.draw(&PathElement::new(outline, WHITE.stroke_width(1)))
                .map_err(render_error)?;

            let mid = wedge.mid();
            area.draw(&Text::new(
                slice.percent_label(),
                to_pixel(0.6 * mid.cos(), 0.6 * mid.sin()),
                percent_style.clone(),
            ))
            .map_err(render_error)?;
            area.draw(&Text::new(
                slice.label.clone(),
                to_pixel(1.15 * mid.cos(), 1.15 * mid.sin()),
                label_style.clone(),
            ))
            .map_err(render_error)?;
        }

        Ok(())
    }

    fn draw_histogram(
        area: &Area,
        figure: &Figure,
        hist: &HistogramFigure,
    ) -> Result<(), ChartError> {
        let r = hist.reference;
        let x_values = hist
            .bins
            .iter()
            .flat_map(|b| [b.start, b.end])
            .chain([r.lower(), r.upper(), r.mean, r.median]);
        let (x0, x1) = padded_range(x_values);
        let y_top = hist
            .bins
            .iter()
            .map(|b| b.count as f64)
            .chain(hist.density.iter().map(|p| p[1]))
            .fold(1.0, f64::max)
            * 1.1;

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, 0.0..y_top)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc(figure.x_label.as_str())
            .y_desc(figure.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        let bin_rect = |b: &crate::stats::HistogramBin| [(b.start, 0.0), (b.end, b.count as f64)];
        chart
            .draw_series(
                hist.bins
                    .iter()
                    .map(|b| Rectangle::new(bin_rect(b), rgb(palette::HIST_FILL).filled())),
            )
            .map_err(render_error)?;
        chart
            .draw_series(
                hist.bins
                    .iter()
                    .map(|b| Rectangle::new(bin_rect(b), rgb(palette::HIST_EDGE).stroke_width(2))),
            )
            .map_err(render_error)?;

        if !hist.density.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    hist.density.iter().map(|p| (p[0], p[1])),
                    rgb(palette::KDE_COLOR).stroke_width(2),
                ))
                .map_err(render_error)?;
        }

        let mut references = vec![
            (r.mean, palette::MEAN_COLOR, Some(r.mean_label())),
            (r.median, palette::MEDIAN_COLOR, Some(r.median_label())),
        ];
        if !r.std_dev.is_nan() {
            references.push((r.upper(), palette::STD_COLOR, Some(r.std_label())));
            references.push((r.lower(), palette::STD_COLOR, None));
        }

        for (x, color, label) in references {
            let style = rgb(color).stroke_width(2);
            let series = chart
                .draw_series(DashedLineSeries::new(vec![(x, 0.0), (x, y_top)], 8, 5, style))
                .map_err(render_error)?;
            if let Some(label) = label {
                series
                    .label(label)
                    .legend(move |(lx, ly)| PathElement::new(vec![(lx, ly), (lx + 20, ly)], style));
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        Ok(())
    }

    fn draw_heatmap(area: &Area, heatmap: &HeatmapFigure) -> Result<(), ChartError> {
        let matrix = &heatmap.matrix;
        let n = matrix.len();
        let labels = &matrix.labels;

        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            // First row on top.
            .y_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) if *i < n => labels[n - 1 - *i].clone(),
                _ => String::new(),
            })
            .draw()
            .map_err(render_error)?;

        let cells = matrix.values.iter().enumerate().flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(col, &value)| (col, n - 1 - row, value))
        });

        chart
            .draw_series(cells.clone().map(|(x, y, value)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                    ],
                    rgb(palette::coolwarm(value)).filled(),
                )
            }))
            .map_err(render_error)?;

        let annotation_style = TextStyle::from((FONT, 14).into_font())
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(cells.map(|(x, y, value)| {
                Text::new(
                    heatmap_annotation(value),
                    (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                    annotation_style.clone(),
                )
            }))
            .map_err(render_error)?;

        Ok(())
    }
}

fn rgb((r, g, b): Rgb) -> RGBColor {
    RGBColor(r, g, b)
}

fn render_error<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Axis range over the finite values with 5% padding on both ends.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return widen(lo, hi);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Give a degenerate range some width.
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Render("image buffer size mismatch".to_string()))?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(render_error)?;
    Ok(bytes)
}
