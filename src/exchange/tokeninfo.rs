//! reqwest-backed verifier for Google's tokeninfo endpoint

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error, warn};
use url::Url;

use super::verifier::{TokenVerifier, VerifierError};
use crate::models::IdentityClaims;
use crate::settings::VerifierSettings;

/// Delegates token verification to the provider's introspection endpoint
///
/// The provider checks the token signature and expiry and returns the
/// decoded claims.
pub struct TokenInfoVerifier {
    client: reqwest::Client,
    endpoint: Url,
}

impl TokenInfoVerifier {
    /// Create a verifier for `endpoint` with bounded request time
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not an absolute URL or the HTTP
    /// client cannot be built
    pub fn new(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid tokeninfo endpoint: {endpoint}"))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .context("failed to build tokeninfo HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Build a verifier from the `[verifier]` settings section
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is invalid
    pub fn from_settings(settings: &VerifierSettings) -> Result<Self> {
        Self::new(
            &settings.tokeninfo_url,
            Duration::from_secs(settings.timeout_seconds),
            Duration::from_secs(settings.connect_timeout_seconds),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl TokenVerifier for TokenInfoVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, VerifierError> {
        debug!("Sending id token to {}", self.endpoint);

        // The token travels in the query string, so errors are logged without the URL
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Error sending HTTP request to verify id token: {e}");
                VerifierError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_client_error() {
            warn!("Identity provider rejected id token with status {status}");
            return Err(VerifierError::Rejected {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            error!("Identity provider failed with status {status}");
            return Err(VerifierError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Error reading body of response to verify id token: {e}");
            VerifierError::Transport(e.to_string())
        })?;

        IdentityClaims::from_json(&body).map_err(|e| {
            error!("Error decoding tokeninfo response: {e}");
            VerifierError::Malformed(e.to_string())
        })
    }
}
