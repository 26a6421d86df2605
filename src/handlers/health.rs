use crate::models::HealthResponse;
use actix_web::{HttpResponse, Result};

/// Health check handler
///
/// # Errors
/// This handler does not fail
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: format!("Login exchange gateway {} is running", crate::VERSION),
    };
    Ok(HttpResponse::Ok().json(response))
}
