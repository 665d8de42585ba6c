pub mod aggregator;
pub mod quadrature;

pub use aggregator::{AccumulationStrategy, ExceedanceInterval, VolumeAggregator, VolumeSeries};
pub use quadrature::{Quadrature, QuadratureResult};
