//! Assertion helpers for API responses

use crate::models::{ApiResponse, ResultStatus};

/// Assert `response` is a failure with the given id and HTTP code
///
/// # Panics
///
/// Panics if the response is a success or carries a different error.
pub fn assert_api_failure(response: &ApiResponse, id: &str, http_code: u16) {
    assert_eq!(response.status, ResultStatus::Fail, "expected FAIL: {response:?}");
    let error = response
        .error
        .as_ref()
        .unwrap_or_else(|| panic!("FAIL response without error: {response:?}"));
    assert_eq!(error.id(), id, "unexpected error id");
    assert_eq!(error.http_code(), http_code, "unexpected HTTP code");
}

/// Assert `response` is a success without an error payload
///
/// # Panics
///
/// Panics if the response is not a clean success.
pub fn assert_api_success(response: &ApiResponse) {
    assert_eq!(response.status, ResultStatus::Success, "expected SUCCESS: {response:?}");
    assert!(response.error.is_none(), "SUCCESS response with error: {response:?}");
}
