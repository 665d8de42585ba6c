pub mod context;
pub mod report;
pub mod summary;

pub use context::{ChartSeries, MonitorContext};
pub use report::{DerivativeReport, VolumeReport};
pub use summary::SeriesSummary;
