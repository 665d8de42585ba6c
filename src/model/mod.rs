pub mod flow;
pub mod grid;

pub use flow::{FlowModel, FlowParams};
pub use grid::TimeGrid;
