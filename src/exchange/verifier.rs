//! Capability interface for the external identity provider

use crate::models::IdentityClaims;
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a [`TokenVerifier`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// The provider could not be reached or did not answer in time
    #[error("verifier transport failure: {0}")]
    Transport(String),

    /// The provider answered and refused the token
    #[error("verifier rejected the token with status {status}")]
    Rejected { status: u16 },

    /// The provider answered with a server error
    #[error("verifier failed with status {status}")]
    Upstream { status: u16 },

    /// The provider's answer could not be decoded into claims
    #[error("verifier returned a malformed body: {0}")]
    Malformed(String),
}

/// Given a token, return its claims or an error
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Ask the provider to verify `token`
    ///
    /// # Errors
    ///
    /// Returns a [`VerifierError`] classifying why no claims are available
    async fn verify(&self, token: &str) -> Result<IdentityClaims, VerifierError>;
}
