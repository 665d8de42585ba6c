//! Terminal stand-ins for the monitoring window: dialogs, charts and a
//! machine-readable dump of the charted series.

pub mod chart;
pub mod export;

pub use chart::TextChart;
pub use export::SeriesExport;
