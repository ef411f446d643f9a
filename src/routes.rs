use actix_web::web;

use crate::controllers::{dashboard, metrics, monitoring};
use crate::services::health;

/// Register every HTTP route of the monitor
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(dashboard::dashboard))
        .route("/health", web::get().to(health::health_check))
        .route("/start-monitoring", web::get().to(monitoring::start_monitoring))
        .route("/stop-monitoring", web::get().to(monitoring::stop_monitoring))
        .route("/status", web::get().to(monitoring::monitoring_status))
        .route("/metrics", web::get().to(metrics::get_metrics));
}
