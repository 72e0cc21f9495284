//! Scatter hue prompt: pick the column that colors the points.

use egui::ComboBox;

#[derive(Default)]
pub struct HuePrompt {
    columns: Vec<String>,
    choice: String,
    open: bool,
}

impl HuePrompt {
    /// Open the prompt, preselecting the first column.
    pub fn open_for(&mut self, columns: Vec<String>) {
        self.choice = columns.first().cloned().unwrap_or_default();
        self.columns = columns;
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the chosen column once "Plot" is pressed.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<String> {
        if !self.open {
            return None;
        }

        let mut chosen = None;
        let mut open = self.open;
        egui::Window::new("Select Other Column")
            .id(egui::Id::new("hue_prompt"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Other Column:");
                    ComboBox::from_id_salt("hue_column")
                        .width(180.0)
                        .selected_text(&self.choice)
                        .show_ui(ui, |ui| {
                            for col in &self.columns {
                                ui.selectable_value(&mut self.choice, col.clone(), col);
                            }
                        });
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("Plot").clicked() && !self.choice.is_empty() {
                        chosen = Some(self.choice.clone());
                    }
                });
            });

        self.open = open && chosen.is_none();
        chosen
    }
}
