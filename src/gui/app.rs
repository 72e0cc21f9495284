//! QuickPlot Main Application
//! Main window with the control panel, plot windows and analysis menu.

use super::{dialogs, ChartViewer, ControlPanel, ControlPanelAction, HuePrompt, ViewerEvent};
use crate::charts::{ChartDispatcher, ChartError, ChartKind, RenderOutcome};
use crate::config::AppConfig;
use crate::data::DatasetStore;
use crate::report::{ReportError, ReportExporter};
use crate::state::{AppState, Selection};
use egui::SidePanel;
use log::{info, warn};
use std::path::PathBuf;

const NO_DATASET: &str = "Please load a dataset first.";

/// Main application window.
pub struct QuickPlotApp {
    config: AppConfig,
    store: DatasetStore,
    state: AppState,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    hue_prompt: HuePrompt,
    /// Form snapshot waiting on the hue prompt.
    pending_scatter: Option<Selection>,
}

impl QuickPlotApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        Self {
            chart_viewer: ChartViewer::new(&config),
            config,
            store: DatasetStore::new(),
            state: AppState::default(),
            control_panel: ControlPanel::new(),
            hue_prompt: HuePrompt::default(),
            pending_scatter: None,
        }
    }

    /// Handle the "Load Data" button.
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.control_panel.data_path = path.to_string_lossy().to_string();
            self.load_dataset(path);
        }
    }

    fn load_dataset(&mut self, path: PathBuf) {
        self.control_panel.set_status("Loading CSV file...");

        match self.store.load(&path) {
            Ok(dataset) => {
                let columns = dataset.column_names();
                self.control_panel.set_status(format!(
                    "Loaded {} rows, {} columns from {}",
                    dataset.height(),
                    columns.len(),
                    dataset.source().display()
                ));
                self.control_panel.update_columns(columns);
                self.state = self.state.with_dataset(dataset);
            }
            Err(e) => {
                let status = match self.store.current() {
                    Some(previous) => {
                        format!("{} (still using {})", e, previous.source().display())
                    }
                    None => e.to_string(),
                };
                self.control_panel.set_status(status);
                dialogs::error(&e.to_string());
            }
        }
    }

    fn handle_visualize(&mut self) {
        let selection = self.control_panel.selection(None);

        if selection.kind == ChartKind::Scatter {
            match self.state.dataset() {
                Some(dataset) if !dataset.is_empty() => {
                    self.hue_prompt.open_for(dataset.column_names());
                    self.pending_scatter = Some(selection);
                }
                _ => self.report_chart_error(ChartError::NoDataset),
            }
            return;
        }

        self.visualize(selection);
    }

    fn visualize(&mut self, selection: Selection) {
        self.state = self.state.with_selection(selection);

        match ChartDispatcher::visualize(
            self.state.dataset(),
            &self.state.selection,
            &mut self.chart_viewer,
        ) {
            Ok(RenderOutcome::Rendered) => {
                self.control_panel
                    .set_status(format!("Plotted {}", self.state.selection.kind));
            }
            Ok(RenderOutcome::Warning(message)) => {
                self.control_panel.set_status(message.clone());
                dialogs::warning(&message);
            }
            Err(e) => self.report_chart_error(e),
        }
    }

    fn report_chart_error(&mut self, error: ChartError) {
        warn!("{}", error);
        self.control_panel.set_status(error.to_string());
        match error {
            ChartError::NoDataset => dialogs::error(NO_DATASET),
            other => dialogs::error(&other.to_string()),
        }
    }

    fn handle_export(&mut self) {
        match ReportExporter::export_to_file(self.state.dataset(), &self.config.report_file) {
            Ok(path) => {
                let message = format!("Data exported to {}", path.display());
                self.control_panel.set_status(format!("Report: {}", message));
                dialogs::info("Export Data", &message);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn handle_view_analysis(&mut self) {
        match ReportExporter::view(self.state.dataset()) {
            Ok(text) => {
                info!("Showing analysis view");
                self.chart_viewer.show_analysis(text);
            }
            Err(e) => self.report_error(e),
        }
    }

    fn report_error(&mut self, error: ReportError) {
        warn!("{}", error);
        self.control_panel.set_status(error.to_string());
        match error {
            ReportError::NoDataset => dialogs::error(NO_DATASET),
            other => dialogs::error(&other.to_string()),
        }
    }
}

impl eframe::App for QuickPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Analysis Parameters", |ui| {
                    if ui.button("Export Data").clicked() {
                        ui.close_menu();
                        self.handle_export();
                    }
                    if ui.button("View Analysis").clicked() {
                        ui.close_menu();
                        self.handle_view_analysis();
                    }
                });
            });
        });

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(340.0)
            .max_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::LoadPath => {
                            let path = PathBuf::from(self.control_panel.data_path.trim());
                            self.load_dataset(path);
                        }
                        ControlPanelAction::Visualize => self.handle_visualize(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - hint behind the floating plot windows
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer
                .show_placeholder(ui, self.state.dataset().is_some());
        });

        if let Some(hue) = self.hue_prompt.show(ctx) {
            if let Some(selection) = self.pending_scatter.take() {
                self.visualize(selection.with_hue(hue));
            }
        } else if !self.hue_prompt.is_open() {
            self.pending_scatter = None;
        }

        match self.chart_viewer.show(ctx) {
            Some(ViewerEvent::SnapshotSaved(path)) => {
                self.control_panel
                    .set_status(format!("Saved {}", path.display()));
            }
            Some(ViewerEvent::SnapshotFailed(message)) => {
                self.control_panel.set_status(message.clone());
                dialogs::error(&message);
            }
            None => {}
        }
    }
}
