pub mod constants;
pub mod error;
pub mod model;
pub mod volume;
pub mod risk;
pub mod monitor;
pub mod presentation;
pub mod utils;

// Re-export commonly used types
pub use error::{IntegrationError, MonitorError};
pub use model::{FlowModel, FlowParams, TimeGrid};
pub use volume::{AccumulationStrategy, ExceedanceInterval, Quadrature, VolumeAggregator, VolumeSeries};
pub use risk::{AlertSeverity, AlertThresholds, FlowTrend, VolumeStatus};
pub use monitor::{ChartSeries, DerivativeReport, MonitorContext, SeriesSummary, VolumeReport};
pub use presentation::{SeriesExport, TextChart};
pub use utils::Config;
