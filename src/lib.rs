//! Single-target HTTP uptime and latency monitor
//!
//! A background loop probes one URL on a fixed interval for a bounded time,
//! appends every outcome to an in-memory series, and an actix-web surface
//! exposes start/stop controls, the series and a small dashboard.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use errors::{MonitorError, Result};
pub use models::{MonitorState, ProbeOutcome, ProbeRecord};
pub use services::monitor::MonitorController;
pub use services::prober::{HttpProber, Probe};
pub use state::AppState;
pub use store::MetricsStore;
