//! Chart kinds, line markers and the per-kind render request.

use std::fmt;

/// The six supported visualizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Scatter,
    Pie,
    Histogram,
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Pie,
        ChartKind::Histogram,
        ChartKind::Heatmap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Pie => "pie",
            ChartKind::Histogram => "histogram",
            ChartKind::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point glyph drawn on line charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    #[default]
    None,
    Point,
    Circle,
    Cross,
    Plus,
    Star,
    Square,
    Diamond,
}

impl Marker {
    pub const ALL: [Marker; 8] = [
        Marker::None,
        Marker::Point,
        Marker::Circle,
        Marker::Cross,
        Marker::Plus,
        Marker::Star,
        Marker::Square,
        Marker::Diamond,
    ];

    /// Matplotlib-style glyph shown in the marker picker.
    pub fn glyph(self) -> &'static str {
        match self {
            Marker::None => "",
            Marker::Point => ".",
            Marker::Circle => "o",
            Marker::Cross => "x",
            Marker::Plus => "+",
            Marker::Star => "*",
            Marker::Square => "s",
            Marker::Diamond => "D",
        }
    }
}

/// A validated render request. Each variant carries only what its kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartRequest {
    Line {
        x: String,
        y: String,
        marker: Marker,
    },
    Bar {
        x: String,
        y: String,
    },
    Scatter {
        x: String,
        y: String,
        hue: String,
    },
    Pie {
        x: String,
    },
    Histogram {
        x: String,
    },
    Heatmap,
}

impl ChartRequest {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartRequest::Line { .. } => ChartKind::Line,
            ChartRequest::Bar { .. } => ChartKind::Bar,
            ChartRequest::Scatter { .. } => ChartKind::Scatter,
            ChartRequest::Pie { .. } => ChartKind::Pie,
            ChartRequest::Histogram { .. } => ChartKind::Histogram,
            ChartRequest::Heatmap => ChartKind::Heatmap,
        }
    }
}
