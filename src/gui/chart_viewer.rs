//! Chart Viewer Widget
//! Floating plot windows, one per rendered figure, plus the analysis view.

use crate::charts::{ChartError, ChartPlotter, Figure, RenderBackend, StaticChartRenderer};
use crate::config::AppConfig;
use egui::{RichText, ScrollArea};
use log::warn;
use std::path::PathBuf;

const WINDOW_WIDTH: f32 = 640.0;

struct PlotWindow {
    id: usize,
    figure: Figure,
    open: bool,
}

/// Something the app should tell the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SnapshotSaved(PathBuf),
    SnapshotFailed(String),
}

/// Non-modal plot windows. Each window keeps its own figure, so later form
/// edits never change a chart that is already open.
pub struct ChartViewer {
    windows: Vec<PlotWindow>,
    next_id: usize,
    analysis: Option<String>,
    snapshot_size: (u32, u32),
    open_after_save: bool,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl RenderBackend for ChartViewer {
    fn render(&mut self, figure: &Figure) -> Result<(), ChartError> {
        self.windows.push(PlotWindow {
            id: self.next_id,
            figure: figure.clone(),
            open: true,
        });
        self.next_id += 1;
        Ok(())
    }
}

impl ChartViewer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            windows: Vec::new(),
            next_id: 0,
            analysis: None,
            snapshot_size: (config.snapshot_width, config.snapshot_height),
            open_after_save: config.open_after_save,
        }
    }

    /// Show report text in the read-only analysis window.
    pub fn show_analysis(&mut self, text: String) {
        self.analysis = Some(text);
    }

    /// Draw every open window; closed ones are dropped.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ViewerEvent> {
        let mut event = None;
        let (width, height) = self.snapshot_size;
        let open_after_save = self.open_after_save;

        for window in &mut self.windows {
            let title = if window.figure.title.is_empty() {
                format!("Figure {}", window.id + 1)
            } else {
                window.figure.title.clone()
            };
            let figure = &window.figure;
            let id = window.id;

            egui::Window::new(title)
                .id(egui::Id::new(("plot_window", id)))
                .open(&mut window.open)
                .default_width(WINDOW_WIDTH)
                .resizable(true)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("💾 Save PNG").clicked() {
                            event = Self::save_snapshot(figure, width, height, open_after_save);
                        }
                    });
                    ui.separator();
                    ChartPlotter::draw_figure(ui, id, figure);
                });
        }
        self.windows.retain(|w| w.open);

        if let Some(text) = &self.analysis {
            let mut open = true;
            egui::Window::new("Analysis View")
                .id(egui::Id::new("analysis_view"))
                .open(&mut open)
                .default_size([560.0, 480.0])
                .show(ctx, |ui| {
                    ScrollArea::both().show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut text.as_str())
                                .font(egui::TextStyle::Monospace)
                                .desired_width(f32::INFINITY),
                        );
                    });
                });
            if !open {
                self.analysis = None;
            }
        }

        event
    }

    fn save_snapshot(
        figure: &Figure,
        width: u32,
        height: u32,
        open_after_save: bool,
    ) -> Option<ViewerEvent> {
        let path = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("{}.png", figure.kind()))
            .save_file()?;

        match StaticChartRenderer::save_png(figure, &path, width, height) {
            Ok(path) => {
                if open_after_save {
                    if let Err(e) = open::that(&path) {
                        warn!("Could not open {}: {}", path.display(), e);
                    }
                }
                Some(ViewerEvent::SnapshotSaved(path))
            }
            Err(e) => Some(ViewerEvent::SnapshotFailed(e.to_string())),
        }
    }

    /// Empty-state hint for the central panel.
    pub fn show_placeholder(&self, ui: &mut egui::Ui, has_dataset: bool) {
        let hint = if has_dataset {
            "Pick columns and a plot type, then Visualize"
        } else {
            "Load a CSV file to begin"
        };
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(hint).size(18.0));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::{FigureBody, HeatmapFigure};
    use crate::stats::CorrelationMatrix;

    fn figure(title: &str) -> Figure {
        Figure {
            title: title.to_string(),
            x_label: String::new(),
            y_label: String::new(),
            body: FigureBody::Heatmap(HeatmapFigure {
                matrix: CorrelationMatrix::default(),
            }),
        }
    }

    #[test]
    fn test_each_render_opens_a_window() {
        let mut viewer = ChartViewer::default();

        viewer.render(&figure("a")).unwrap();
        viewer.render(&figure("b")).unwrap();

        assert_eq!(viewer.windows.len(), 2);
        assert_eq!(viewer.windows[1].id, 1);
        assert_eq!(viewer.windows[1].figure.title, "b");
    }
}
