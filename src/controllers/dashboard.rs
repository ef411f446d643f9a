use actix_web::{http::header::ContentType, HttpResponse, Responder};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

pub async fn dashboard() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(DASHBOARD_HTML)
}
