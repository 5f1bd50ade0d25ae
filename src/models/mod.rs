// Domain models

mod event;
mod metric;
mod resource;
mod window;

pub use event::{ProviderTarget, ResourceEvent};
pub use metric::{
    DEFAULT_METRICS, INSTANCE_DIMENSION, METRIC_NAMESPACE, MetricSample, Statistic,
};
pub use resource::{FleetSummary, ResourceSnapshot, STATUS_AVAILABLE};
pub use window::TimeWindow;
