use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use tracing::info;

use crate::models::{StartOutcome, StopOutcome};
use crate::state::AppState;

// Start (or keep) the monitoring loop
pub async fn start_monitoring(data: web::Data<AppState>) -> impl Responder {
    info!("Request to start monitoring");

    match data.monitor.start().await {
        StartOutcome::Started { run_id } => HttpResponse::Ok().json(json!({
            "message": "Monitoring started.",
            "run_id": run_id,
        })),
        StartOutcome::AlreadyRunning { run_id } => HttpResponse::Ok().json(json!({
            "message": "Monitoring is already running.",
            "run_id": run_id,
        })),
    }
}

// Ask the monitoring loop to stop after its current iteration
pub async fn stop_monitoring(data: web::Data<AppState>) -> impl Responder {
    info!("Request to stop monitoring");

    match data.monitor.stop().await {
        StopOutcome::Stopped { run_id } => HttpResponse::Ok().json(json!({
            "message": "Monitoring stopped.",
            "run_id": run_id,
        })),
        StopOutcome::NotRunning => HttpResponse::Ok().json(json!({
            "message": "Monitoring is not running.",
        })),
    }
}

// Controller state plus aggregates over the recorded series
pub async fn monitoring_status(data: web::Data<AppState>) -> impl Responder {
    let status = data.monitor.status().await;
    let summary = data.monitor.store().summary().await;

    HttpResponse::Ok().json(json!({
        "monitor": status,
        "summary": summary,
    }))
}
