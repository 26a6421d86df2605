//! Result-carrying API responses
//!
//! Every operation of the gateway answers with either a success or a
//! classified failure, never both. [`ApiResult`] is the sum type handlers
//! build; [`ApiResponse`] is its wire shape and re-checks the
//! success/failure invariant when it is served onto a [`StatusSink`].

use serde::Serialize;
use thiserror::Error;

/// Outcome tag carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Success,
    Fail,
}

/// Machine readable failure description
///
/// `http_code` is the status emitted on the wire and is not repeated in the
/// JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    id: String,
    message: String,
    #[serde(skip)]
    http_code: u16,
}

impl ApiError {
    #[must_use]
    pub fn new(id: impl Into<String>, message: impl Into<String>, http_code: u16) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            http_code,
        }
    }

    /// Generic 500 error used when a response could not be produced
    #[must_use]
    pub fn internal() -> Self {
        Self::new("internal_error", "Internal Error", 500)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn http_code(&self) -> u16 {
        self.http_code
    }
}

/// Invariant violations detected while serving an [`ApiResponse`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseValidationError {
    #[error("If response status is SUCCESS then an error can not be provided.")]
    SuccessWithError,
    #[error("If response status is FAIL then an error must be provided.")]
    FailWithoutError,
}

/// Anything that can receive an HTTP status code
pub trait StatusSink {
    fn write_status(&mut self, code: u16);
}

/// Wire representation of an API outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    pub status: ResultStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: ResultStatus, error: Option<ApiError>) -> Self {
        Self { status, error }
    }

    /// Write this response's status code to `sink`
    ///
    /// The sink is written to at most once, and only when the status and
    /// error agree. `SUCCESS` maps to 200, `FAIL` to the error's own code.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponseValidationError`] without touching the sink if a
    /// `SUCCESS` response carries an error or a `FAIL` response does not.
    pub fn serve<S: StatusSink + ?Sized>(&self, sink: &mut S) -> Result<(), ResponseValidationError> {
        match (self.status, &self.error) {
            (ResultStatus::Success, Some(_)) => Err(ResponseValidationError::SuccessWithError),
            (ResultStatus::Success, None) => {
                sink.write_status(200);
                Ok(())
            }
            (ResultStatus::Fail, None) => Err(ResponseValidationError::FailWithoutError),
            (ResultStatus::Fail, Some(error)) => {
                sink.write_status(error.http_code);
                Ok(())
            }
        }
    }
}

/// Success or failure of an operation, with the failure payload attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult {
    Success,
    Failure(ApiError),
}

impl ApiResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    #[must_use]
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Success => None,
            Self::Failure(error) => Some(error),
        }
    }
}

impl From<ApiResult> for ApiResponse {
    fn from(result: ApiResult) -> Self {
        match result {
            ApiResult::Success => Self::new(ResultStatus::Success, None),
            ApiResult::Failure(error) => Self::new(ResultStatus::Fail, Some(error)),
        }
    }
}
