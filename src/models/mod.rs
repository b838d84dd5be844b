// Domain models: platform entities and emitted records

mod app;
mod record;

pub use app::{AppEvent, AppState, Application, RawInstanceStats, RawUsage, Space};
pub use record::{
    ContainerStats, EventInfo, EventRecord, InstanceSnapshot, MetricRecord, RecordType, Usage,
    calculate_usage,
};
