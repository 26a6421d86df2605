//! Data types shared by the exchange pipeline and the HTTP layer

pub mod claims;
pub mod response;

pub use claims::IdentityClaims;
pub use response::{
    ApiError, ApiResponse, ApiResult, ResponseValidationError, ResultStatus, StatusSink,
};

use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
