//! Control Panel Widget
//! Left side panel with the data source, column pickers and plot options.

use crate::charts::{ChartKind, Marker};
use crate::data::DataProcessor;
use crate::state::Selection;
use egui::{Color32, ComboBox, RichText};

/// Left side control panel. Holds the draft form; the app turns it into a
/// `Selection` when the user asks for a plot.
pub struct ControlPanel {
    pub data_path: String,
    /// Real column names, in file order.
    pub columns: Vec<String>,
    /// Cleaned names shown in the pickers, parallel to `columns`.
    pub display_names: Vec<String>,
    pub x: Option<String>,
    pub y: Option<String>,
    pub title: String,
    pub kind: ChartKind,
    pub marker: Marker,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_path: String::new(),
            columns: Vec::new(),
            display_names: Vec::new(),
            x: None,
            y: None,
            title: String::new(),
            kind: ChartKind::Line,
            marker: Marker::None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the picker contents after a successful load.
    pub fn update_columns(&mut self, columns: Vec<String>) {
        self.display_names = columns
            .iter()
            .map(|c| DataProcessor::display_name(c))
            .collect();
        self.columns = columns;
        self.x = None;
        self.y = None;
    }

    /// Snapshot of the form. `hue` comes from the scatter prompt.
    pub fn selection(&self, hue: Option<String>) -> Selection {
        Selection {
            x: self.x.clone(),
            y: self.y.clone(),
            hue,
            title: self.title.clone(),
            kind: self.kind,
            marker: self.marker,
        }
    }

    fn display_for(&self, column: &Option<String>) -> String {
        column
            .as_ref()
            .and_then(|c| self.columns.iter().position(|col| col == c))
            .map(|i| self.display_names[i].clone())
            .unwrap_or_default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 QuickPlot")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        let label_width = 90.0;
        let combo_width = 200.0;

        // ===== Data Source Section =====
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add_sized([label_width, 20.0], egui::Label::new("Data:"));
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.data_path)
                            .desired_width(combo_width)
                            .hint_text("path/to/data.csv"),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        action = ControlPanelAction::LoadPath;
                    }
                    if ui.button("📂 Load Data").clicked() {
                        action = ControlPanelAction::BrowseCsv;
                    }
                });
            });

        ui.add_space(10.0);

        // ===== Column Pickers =====
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("X Label:"));
            let selected = self.display_for(&self.x);
            ComboBox::from_id_salt("x_column")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (col, name) in self.columns.iter().zip(&self.display_names) {
                        if ui
                            .selectable_label(self.x.as_ref() == Some(col), name)
                            .clicked()
                        {
                            self.x = Some(col.clone());
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Y Label:"));
            let selected = self.display_for(&self.y);
            ComboBox::from_id_salt("y_column")
                .width(combo_width)
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (col, name) in self.columns.iter().zip(&self.display_names) {
                        if ui
                            .selectable_label(self.y.as_ref() == Some(col), name)
                            .clicked()
                        {
                            self.y = Some(col.clone());
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Title:"));
            ui.add(egui::TextEdit::singleline(&mut self.title).desired_width(combo_width));
        });

        ui.add_space(5.0);

        // ===== Plot Options =====
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Plot Type:"));
            ComboBox::from_id_salt("plot_type")
                .width(combo_width)
                .selected_text(self.kind.as_str())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut self.kind, kind, kind.as_str());
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Marker:"));
            ComboBox::from_id_salt("marker")
                .width(combo_width)
                .selected_text(self.marker.glyph())
                .show_ui(ui, |ui| {
                    for marker in Marker::ALL {
                        ui.selectable_value(&mut self.marker, marker, marker.glyph());
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("▶ Visualize").size(16.0))
                .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Visualize;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("failed") || self.status.contains("no ") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Report") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    LoadPath,
    Visualize,
}
