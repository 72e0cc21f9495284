//! Application state: the loaded dataset plus the form selection.
//!
//! Both are immutable values; every UI event produces a new `AppState`.

use crate::charts::{ChartError, ChartKind, ChartRequest, Marker};
use crate::data::Dataset;
use std::sync::Arc;

/// What the user picked in the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub x: Option<String>,
    pub y: Option<String>,
    pub hue: Option<String>,
    pub title: String,
    pub kind: ChartKind,
    pub marker: Marker,
}

impl Selection {
    pub fn with_hue(&self, hue: impl Into<String>) -> Self {
        Self {
            hue: Some(hue.into()),
            ..self.clone()
        }
    }

    /// Validate the fields the chosen kind needs.
    pub fn to_request(&self) -> Result<ChartRequest, ChartError> {
        let x = || required(&self.x, "X column");
        let y = || required(&self.y, "Y column");

        Ok(match self.kind {
            ChartKind::Line => ChartRequest::Line {
                x: x()?,
                y: y()?,
                marker: self.marker,
            },
            ChartKind::Bar => ChartRequest::Bar { x: x()?, y: y()? },
            ChartKind::Scatter => ChartRequest::Scatter {
                x: x()?,
                y: y()?,
                hue: required(&self.hue, "hue column")?,
            },
            ChartKind::Pie => ChartRequest::Pie { x: x()? },
            ChartKind::Histogram => ChartRequest::Histogram { x: x()? },
            ChartKind::Heatmap => ChartRequest::Heatmap,
        })
    }
}

fn required(field: &Option<String>, what: &'static str) -> Result<String, ChartError> {
    field
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(ChartError::MissingSelection(what))
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub dataset: Option<Arc<Dataset>>,
    pub selection: Selection,
}

impl AppState {
    /// Swap in a freshly loaded dataset; column picks from the old one are dropped.
    pub fn with_dataset(&self, dataset: Arc<Dataset>) -> Self {
        Self {
            dataset: Some(dataset),
            selection: Selection {
                x: None,
                y: None,
                hue: None,
                ..self.selection.clone()
            },
        }
    }

    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            dataset: self.dataset.clone(),
            selection,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }
}
