//! Charts module - chart requests, dispatch, figures and renderers

mod dispatcher;
pub mod figure;
mod kind;
pub mod palette;
mod plotter;
mod renderer;

pub use dispatcher::{ChartDispatcher, ChartError, RenderBackend, RenderOutcome};
pub use figure::Figure;
pub use kind::{ChartKind, ChartRequest, Marker};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
