pub mod alerts;

pub use alerts::{AlertSeverity, AlertThresholds, FlowTrend, VolumeStatus};
