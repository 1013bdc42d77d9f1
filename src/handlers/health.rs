use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::models::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub data_file: String,
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let health = HealthStatus {
        status: "healthy",
        data_file: state.cache.path().display().to_string(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(health)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
