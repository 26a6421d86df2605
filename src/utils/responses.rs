//! HTTP response handling for result-carrying API responses
//!
//! Bridges [`ApiResponse::serve`] onto actix-web: the status code comes from
//! the response contract, the JSON body from the response itself. Anything
//! that fails the contract is answered with a generic 500.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder};
use log::error;

use crate::models::{ApiError, ApiResponse, ApiResult, StatusSink};

/// Status sink that remembers the code written by `serve`
#[derive(Debug, Default)]
pub struct ActixStatusSink {
    status: Option<u16>,
}

impl ActixStatusSink {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl StatusSink for ActixStatusSink {
    fn write_status(&mut self, code: u16) {
        self.status = Some(code);
    }
}

/// Unified response builder for API outcomes
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Serve `response` and build the matching actix response
    #[must_use]
    pub fn api_response(response: &ApiResponse) -> HttpResponse {
        let mut sink = ActixStatusSink::default();
        if let Err(e) = response.serve(&mut sink) {
            error!("Refusing to send malformed API response {response:?}: {e}");
            return Self::internal_error();
        }

        let status = sink.status().and_then(|code| StatusCode::from_u16(code).ok());
        match status {
            Some(status) => HttpResponse::build(status).json(response),
            None => {
                error!("API response carries an invalid HTTP status: {response:?}");
                Self::internal_error()
            }
        }
    }

    /// Generic 500 in the API response shape
    #[must_use]
    pub fn internal_error() -> HttpResponse {
        let body = ApiResponse::from(ApiResult::Failure(ApiError::internal()));
        HttpResponse::InternalServerError().json(body)
    }
}

impl Responder for ApiResponse {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        ResponseBuilder::api_response(&self)
    }
}

impl Responder for ApiResult {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        ResponseBuilder::api_response(&ApiResponse::from(self))
    }
}
