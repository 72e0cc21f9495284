//! GUI module - main window, control panel, plot windows and prompts

mod app;
mod chart_viewer;
mod control_panel;
mod dialogs;
mod hue_prompt;

pub use app::QuickPlotApp;
pub use chart_viewer::{ChartViewer, ViewerEvent};
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use hue_prompt::HuePrompt;
