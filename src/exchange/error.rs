//! Failure classes of the token exchange pipeline
//!
//! Each variant maps to exactly one [`ApiError`]. Upstream causes are kept
//! as sources for logging and never appear in the response body.

use super::verifier::VerifierError;
use crate::models::ApiError;
use thiserror::Error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal Error";
const INVALID_TOKEN_MESSAGE: &str = "Invalid id token";

#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("`id_token` must be provided as a post parameter")]
    MissingParameter,

    #[error("identity verifier unavailable")]
    VerifierUnavailable(#[source] VerifierError),

    #[error("identity verifier returned an unreadable answer")]
    VerifierProtocol(#[source] VerifierError),

    #[error("identity verifier rejected the token")]
    RejectedToken(#[source] VerifierError),

    #[error("token audience `{actual}` does not match the configured client id")]
    UntrustedAudience { actual: String },

    #[error("email address of the token subject is not verified")]
    UnverifiedEmail,
}

impl ExchangeError {
    /// Stable machine readable identifier
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::VerifierUnavailable(_) => "verifier_unavailable",
            Self::VerifierProtocol(_) => "verifier_protocol",
            Self::RejectedToken(_) => "invalid_token",
            Self::UntrustedAudience { .. } => "untrusted_audience",
            Self::UnverifiedEmail => "unverified_email",
        }
    }

    #[must_use]
    pub fn http_code(&self) -> u16 {
        match self {
            Self::MissingParameter => 422,
            Self::VerifierUnavailable(_) | Self::VerifierProtocol(_) => 500,
            Self::RejectedToken(_) | Self::UntrustedAudience { .. } | Self::UnverifiedEmail => 401,
        }
    }

    /// Message safe to show to the caller
    #[must_use]
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingParameter => "`id_token` must be provided as a post parameter",
            Self::VerifierUnavailable(_) | Self::VerifierProtocol(_) => INTERNAL_ERROR_MESSAGE,
            Self::RejectedToken(_) | Self::UntrustedAudience { .. } => INVALID_TOKEN_MESSAGE,
            Self::UnverifiedEmail => "Email not verified",
        }
    }

    /// Server side failure, as opposed to a rejected caller
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.http_code() >= 500
    }
}

impl From<VerifierError> for ExchangeError {
    fn from(err: VerifierError) -> Self {
        match err {
            VerifierError::Transport(_) | VerifierError::Upstream { .. } => {
                Self::VerifierUnavailable(err)
            }
            VerifierError::Rejected { .. } => Self::RejectedToken(err),
            VerifierError::Malformed(_) => Self::VerifierProtocol(err),
        }
    }
}

impl From<&ExchangeError> for ApiError {
    fn from(err: &ExchangeError) -> Self {
        ApiError::new(err.id(), err.public_message(), err.http_code())
    }
}

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        Self::from(&err)
    }
}
