//! Backend-neutral figure description.
//!
//! The dispatcher turns a request into a [`Figure`]; the egui plotter and the
//! static PNG renderer both draw from it.

use super::palette::Rgb;
use super::{ChartKind, Marker};
use crate::stats::{CorrelationMatrix, HistogramBin};
use std::f64::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: FigureBody,
}

impl Figure {
    pub fn kind(&self) -> ChartKind {
        match self.body {
            FigureBody::Line(_) => ChartKind::Line,
            FigureBody::Bar(_) => ChartKind::Bar,
            FigureBody::Scatter(_) => ChartKind::Scatter,
            FigureBody::Pie(_) => ChartKind::Pie,
            FigureBody::Histogram(_) => ChartKind::Histogram,
            FigureBody::Heatmap(_) => ChartKind::Heatmap,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FigureBody {
    Line(LineFigure),
    Bar(BarFigure),
    Scatter(ScatterFigure),
    Pie(PieFigure),
    Histogram(HistogramFigure),
    Heatmap(HeatmapFigure),
}

/// Mean of y per distinct x, sorted by x.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFigure {
    pub points: Vec<[f64; 2]>,
    pub marker: Marker,
    /// `(min, max)` of the grouped x values; the axis is clamped to it.
    pub x_bounds: (f64, f64),
}

/// Summed y per category, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct BarFigure {
    pub bars: Vec<(String, f64)>,
    /// Tick label rotation in degrees.
    pub label_rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HueGroup {
    pub label: String,
    pub points: Vec<[f64; 2]>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFigure {
    pub hue_column: String,
    pub groups: Vec<HueGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
}

impl PieSlice {
    /// Percentage label drawn inside the wedge.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

/// One slice placed on the circle, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub end: f64,
}

impl Wedge {
    pub fn mid(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieFigure {
    pub slices: Vec<PieSlice>,
}

impl PieFigure {
    /// Wedges laid out counter-clockwise from 12 o'clock.
    pub fn wedges(&self) -> Vec<Wedge> {
        let mut angle = FRAC_PI_2;
        self.slices
            .iter()
            .map(|slice| {
                let start = angle;
                angle += slice.fraction * TAU;
                Wedge { start, end: angle }
            })
            .collect()
    }
}

/// Closed outline of a wedge: center, then the arc from `start` to `end`.
pub fn wedge_outline(center: [f64; 2], radius: f64, wedge: Wedge) -> Vec<[f64; 2]> {
    let steps = (((wedge.end - wedge.start) / TAU) * 120.0).ceil().max(2.0) as usize;
    let mut outline = Vec::with_capacity(steps + 2);
    outline.push(center);
    for i in 0..=steps {
        let a = wedge.start + (wedge.end - wedge.start) * i as f64 / steps as f64;
        outline.push([center[0] + radius * a.cos(), center[1] + radius * a.sin()]);
    }
    outline
}

/// Mean, median and one standard deviation either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLines {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl ReferenceLines {
    pub fn lower(&self) -> f64 {
        self.mean - self.std_dev
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.std_dev
    }

    pub fn mean_label(&self) -> String {
        format!("Mean: {:.2}", self.mean)
    }

    pub fn median_label(&self) -> String {
        format!("Median: {:.2}", self.median)
    }

    pub fn std_label(&self) -> String {
        format!("Std Dev: {:.2}", self.std_dev)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramFigure {
    pub bins: Vec<HistogramBin>,
    /// KDE curve scaled to histogram counts.
    pub density: Vec<[f64; 2]>,
    pub reference: ReferenceLines,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapFigure {
    pub matrix: CorrelationMatrix,
}

/// Cell annotation, two decimals.
pub fn heatmap_annotation(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wedges_cover_full_circle() {
        let pie = PieFigure {
            slices: vec![
                PieSlice {
                    label: "(20, 40]".into(),
                    count: 3,
                    fraction: 0.75,
                },
                PieSlice {
                    label: "(0, 20]".into(),
                    count: 1,
                    fraction: 0.25,
                },
            ],
        };

        let wedges = pie.wedges();

        assert_relative_eq!(wedges[0].start, FRAC_PI_2);
        assert_relative_eq!(wedges[1].end - wedges[0].start, TAU);
        assert_eq!(pie.slices[0].percent_label(), "75.0%");
    }

    #[test]
    fn test_wedge_outline_starts_at_center() {
        let outline = wedge_outline([0.0, 0.0], 1.0, Wedge { start: 0.0, end: FRAC_PI_2 });
        assert_eq!(outline[0], [0.0, 0.0]);
        let last = outline[outline.len() - 1];
        assert_relative_eq!(last[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(last[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reference_labels() {
        let r = ReferenceLines {
            mean: 7.0,
            median: 6.5,
            std_dev: 2.0,
        };
        assert_eq!(r.mean_label(), "Mean: 7.00");
        assert_eq!(r.median_label(), "Median: 6.50");
        assert_eq!(r.std_label(), "Std Dev: 2.00");
        assert_relative_eq!(r.lower(), 5.0);
        assert_relative_eq!(r.upper(), 9.0);
        assert_eq!(heatmap_annotation(f64::NAN), "nan");
        assert_eq!(heatmap_annotation(0.5), "0.50");
    }
}
