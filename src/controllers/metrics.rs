use actix_web::{web, HttpResponse, Responder};
use tracing::debug;

use crate::state::AppState;

// Full probe series in chronological order
pub async fn get_metrics(data: web::Data<AppState>) -> impl Responder {
    let records = data.monitor.snapshot().await;
    debug!("Returning {} probe records", records.len());

    HttpResponse::Ok().json(records.as_slice())
}
