pub mod monitor;
pub mod probe;

pub use monitor::{MetricsSummary, MonitorState, MonitorStatus, StartOutcome, StopOutcome};
pub use probe::{ProbeOutcome, ProbeRecord};
