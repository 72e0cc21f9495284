//! Chart Plotter Module
//! Draws figures interactively using egui_plot.

use super::figure::{
    heatmap_annotation, wedge_outline, BarFigure, Figure, FigureBody, HeatmapFigure,
    HistogramFigure, LineFigure, PieFigure, ScatterFigure,
};
use super::palette::{self, Rgb};
use super::Marker;
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text, VLine,
};

const PLOT_HEIGHT: f32 = 360.0;

pub fn to_color32((r, g, b): Rgb) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw any figure. `id` keeps plot memory apart between windows.
    pub fn draw_figure(ui: &mut egui::Ui, id: usize, figure: &Figure) {
        if !figure.title.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(&figure.title).size(15.0).strong());
            });
        }

        let plot = Plot::new(format!("figure_{}", id))
            .height(PLOT_HEIGHT)
            .x_axis_label(figure.x_label.clone())
            .y_axis_label(figure.y_label.clone());

        match &figure.body {
            FigureBody::Line(line) => Self::draw_line(ui, plot, line),
            FigureBody::Bar(bar) => Self::draw_bar(ui, plot, bar),
            FigureBody::Scatter(scatter) => Self::draw_scatter(ui, plot, scatter),
            FigureBody::Pie(pie) => Self::draw_pie(ui, plot, pie),
            FigureBody::Histogram(hist) => Self::draw_histogram(ui, plot, hist),
            FigureBody::Heatmap(heatmap) => Self::draw_heatmap(ui, plot, heatmap),
        }
    }

    fn marker_shape(marker: Marker) -> Option<(MarkerShape, f32)> {
        match marker {
            Marker::None => None,
            Marker::Point => Some((MarkerShape::Circle, 2.0)),
            Marker::Circle => Some((MarkerShape::Circle, 4.0)),
            Marker::Cross => Some((MarkerShape::Cross, 4.0)),
            Marker::Plus => Some((MarkerShape::Plus, 4.0)),
            Marker::Star => Some((MarkerShape::Asterisk, 5.0)),
            Marker::Square => Some((MarkerShape::Square, 4.0)),
            Marker::Diamond => Some((MarkerShape::Diamond, 4.0)),
        }
    }

    fn draw_line(ui: &mut egui::Ui, plot: Plot, line: &LineFigure) {
        let color = to_color32(palette::LINE_COLOR);
        let (x_min, x_max) = line.x_bounds;

        plot.include_x(x_min)
            .include_x(x_max)
            .set_margin_fraction(egui::Vec2::new(0.0, 0.05))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(line.points.iter().copied()))
                        .color(color)
                        .width(1.5),
                );

                if let Some((shape, radius)) = Self::marker_shape(line.marker) {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(line.points.iter().copied()))
                            .shape(shape)
                            .radius(radius)
                            .filled(true)
                            .color(color),
                    );
                }
            });
    }

    fn draw_bar(ui: &mut egui::Ui, plot: Plot, bar: &BarFigure) {
        let labels: Vec<String> = bar.bars.iter().map(|(label, _)| label.clone()).collect();
        let count = labels.len();
        let fill = to_color32(palette::BAR_COLOR);

        let bars: Vec<Bar> = bar
            .bars
            .iter()
            .enumerate()
            .map(|(i, (label, value))| Bar::new(i as f64, *value).width(0.8).name(label).fill(fill))
            .collect();

        plot.allow_scroll(false)
            .x_grid_spacer(move |_input| {
                (0..count)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx >= 0.0 && (idx as usize) < labels.len() && (mark.value - idx).abs() < 1e-6 {
                    labels[idx as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(fill));
            });
    }

    fn draw_scatter(ui: &mut egui::Ui, plot: Plot, scatter: &ScatterFigure) {
        plot.legend(Legend::default().position(egui_plot::Corner::RightTop))
            .show(ui, |plot_ui| {
                for group in &scatter.groups {
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(group.points.iter().copied()))
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(3.5)
                            .color(to_color32(group.color))
                            .name(format!("{} = {}", scatter.hue_column, group.label)),
                    );
                }
            });
    }

    fn draw_pie(ui: &mut egui::Ui, plot: Plot, pie: &PieFigure) {
        let wedges = pie.wedges();

        plot.data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .include_x(-1.3)
            .include_x(1.3)
            .include_y(-1.2)
            .include_y(1.2)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for (i, (slice, wedge)) in pie.slices.iter().zip(&wedges).enumerate() {
                    let color = to_color32(palette::category(i));
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(wedge_outline([0.0, 0.0], 1.0, *wedge)))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&slice.label),
                    );

                    let mid = wedge.mid();
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                            RichText::new(slice.percent_label()).strong(),
                        )
                        .color(Color32::BLACK),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(1.15 * mid.cos(), 1.15 * mid.sin()),
                        slice.label.clone(),
                    ));
                }
            });
    }

    fn draw_histogram(ui: &mut egui::Ui, plot: Plot, hist: &HistogramFigure) {
        let bars: Vec<Bar> = hist
            .bins
            .iter()
            .map(|b| {
                Bar::new((b.start + b.end) / 2.0, b.count as f64)
                    .width(b.width())
                    .fill(to_color32(palette::HIST_FILL))
                    .stroke(Stroke::new(1.5, to_color32(palette::HIST_EDGE)))
            })
            .collect();
        let r = hist.reference;
        let dashed = LineStyle::Dashed { length: 8.0 };

        plot.legend(Legend::default()).show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(to_color32(palette::HIST_FILL)));

            if !hist.density.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(hist.density.iter().copied()))
                        .color(to_color32(palette::KDE_COLOR))
                        .width(2.0),
                );
            }

            plot_ui.vline(
                VLine::new(r.mean)
                    .color(to_color32(palette::MEAN_COLOR))
                    .style(dashed)
                    .name(r.mean_label()),
            );
            plot_ui.vline(
                VLine::new(r.median)
                    .color(to_color32(palette::MEDIAN_COLOR))
                    .style(dashed)
                    .name(r.median_label()),
            );
            if !r.std_dev.is_nan() {
                plot_ui.vline(
                    VLine::new(r.upper())
                        .color(to_color32(palette::STD_COLOR))
                        .style(dashed)
                        .name(r.std_label()),
                );
                plot_ui.vline(
                    VLine::new(r.lower())
                        .color(to_color32(palette::STD_COLOR))
                        .style(dashed),
                );
            }
        });
    }

    fn draw_heatmap(ui: &mut egui::Ui, plot: Plot, heatmap: &HeatmapFigure) {
        let matrix = &heatmap.matrix;
        let n = matrix.len();
        let x_labels = matrix.labels.clone();
        let y_labels = matrix.labels.clone();

        let ticks = move |_input: egui_plot::GridInput| -> Vec<GridMark> {
            (0..n)
                .map(|i| GridMark {
                    value: i as f64,
                    step_size: 1.0,
                })
                .collect()
        };

        plot.data_aspect(1.0)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .x_grid_spacer(ticks.clone())
            .y_grid_spacer(ticks)
            .x_axis_formatter(move |mark, _range| axis_label(&x_labels, mark.value, false))
            .y_axis_formatter(move |mark, _range| axis_label(&y_labels, mark.value, true))
            .show(ui, |plot_ui| {
                for (row, values) in matrix.values.iter().enumerate() {
                    // First row on top.
                    let y = (n - 1 - row) as f64;
                    for (col, &value) in values.iter().enumerate() {
                        let x = col as f64;
                        let cell = vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ];
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::new(cell))
                                .fill_color(to_color32(palette::coolwarm(value)))
                                .stroke(Stroke::new(0.5, Color32::WHITE)),
                        );
                        plot_ui.text(
                            Text::new(PlotPoint::new(x, y), heatmap_annotation(value))
                                .color(Color32::BLACK),
                        );
                    }
                }
            });
    }
}

/// Tick label for the matrix axes; `flipped` maps the top row to index 0.
fn axis_label(labels: &[String], value: f64, flipped: bool) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 || idx as usize >= labels.len() {
        return String::new();
    }
    let idx = idx as usize;
    let idx = if flipped { labels.len() - 1 - idx } else { idx };
    labels[idx].clone()
}
