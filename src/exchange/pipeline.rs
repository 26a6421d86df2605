//! The verify → validate → accept pipeline

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::error::ExchangeError;
use super::verifier::{TokenVerifier, VerifierError};
use crate::models::IdentityClaims;

/// Accepted terminal state of an exchange
#[derive(Debug, Clone)]
pub struct TrustDecision {
    pub claims: IdentityClaims,
    pub accepted_at: DateTime<Utc>,
}

/// Validates provider ID tokens against a configured client id
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct TokenExchange {
    verifier: Arc<dyn TokenVerifier>,
    client_id: String,
    verify_timeout: Duration,
}

impl TokenExchange {
    #[must_use]
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        client_id: impl Into<String>,
        verify_timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            client_id: client_id.into(),
            verify_timeout,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Run the whole pipeline for one request
    ///
    /// Dropping the returned future abandons the verifier call.
    ///
    /// # Errors
    ///
    /// Returns the [`ExchangeError`] of the first step that failed:
    /// - `MissingParameter` if `id_token` is absent or empty
    /// - `VerifierUnavailable` if the provider could not be reached in time
    /// - `VerifierProtocol` if the provider's answer was unreadable
    /// - `RejectedToken` if the provider refused the token
    /// - `UntrustedAudience` or `UnverifiedEmail` if a claim check fails
    pub async fn exchange(&self, id_token: Option<&str>) -> Result<TrustDecision, ExchangeError> {
        let token = Self::extract(id_token)?;
        let claims = self.verify(token).await?;
        self.validate_claims(&claims)?;

        Ok(TrustDecision {
            claims,
            accepted_at: Utc::now(),
        })
    }

    fn extract(id_token: Option<&str>) -> Result<&str, ExchangeError> {
        match id_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ExchangeError::MissingParameter),
        }
    }

    async fn verify(&self, token: &str) -> Result<IdentityClaims, ExchangeError> {
        debug!("Verifying id token ({} chars) with identity provider", token.len());

        let claims = tokio::time::timeout(self.verify_timeout, self.verifier.verify(token))
            .await
            .map_err(|_| {
                warn!(
                    "Identity provider did not answer within {:?}",
                    self.verify_timeout
                );
                VerifierError::Transport(format!(
                    "no answer within {}ms",
                    self.verify_timeout.as_millis()
                ))
            })??;

        Ok(claims)
    }

    /// Apply the trust checks, audience first
    ///
    /// # Errors
    ///
    /// Returns `UntrustedAudience` if `aud` is empty or not our client id, then
    /// `UnverifiedEmail` if the provider has not verified the email address
    pub fn validate_claims(&self, claims: &IdentityClaims) -> Result<(), ExchangeError> {
        if claims.aud.is_empty() || claims.aud != self.client_id {
            return Err(ExchangeError::UntrustedAudience {
                actual: claims.aud.clone(),
            });
        }

        if !claims.email_verified {
            return Err(ExchangeError::UnverifiedEmail);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::constants::{TEST_CLIENT_ID, TEST_ID_TOKEN};
    use crate::testing::{MockVerifier, TestFixtures};

    fn exchange_with(verifier: MockVerifier) -> (TokenExchange, Arc<MockVerifier>) {
        let verifier = Arc::new(verifier);
        let exchange = TokenExchange::new(
            verifier.clone(),
            TEST_CLIENT_ID,
            Duration::from_millis(200),
        );
        (exchange, verifier)
    }

    #[tokio::test]
    async fn test_missing_token_skips_verifier() {
        let (exchange, verifier) =
            exchange_with(MockVerifier::returning(TestFixtures::verified_claims()));

        for token in [None, Some("")] {
            let err = exchange.exchange(token).await.unwrap_err();
            assert!(matches!(err, ExchangeError::MissingParameter));
            assert_eq!(err.http_code(), 422);
        }
        assert_eq!(verifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_accepts_matching_audience_and_verified_email() {
        let (exchange, verifier) =
            exchange_with(MockVerifier::returning(TestFixtures::verified_claims()));

        let decision = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap();

        assert_eq!(decision.claims, TestFixtures::verified_claims());
        assert_eq!(verifier.calls(), 1);
        assert_eq!(verifier.last_token().as_deref(), Some(TEST_ID_TOKEN));
    }

    #[tokio::test]
    async fn test_rejects_foreign_audience() {
        let (exchange, _) = exchange_with(MockVerifier::returning(
            TestFixtures::claims_for_audience("someone-else.apps.googleusercontent.com"),
        ));

        let err = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();

        assert!(matches!(err, ExchangeError::UntrustedAudience { .. }));
        assert_eq!(err.http_code(), 401);
    }

    #[tokio::test]
    async fn test_rejects_unverified_email() {
        let (exchange, _) =
            exchange_with(MockVerifier::returning(TestFixtures::unverified_claims()));

        let err = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();

        assert!(matches!(err, ExchangeError::UnverifiedEmail));
        assert_eq!(err.http_code(), 401);
    }

    #[tokio::test]
    async fn test_audience_is_checked_before_email() {
        let mut claims = TestFixtures::unverified_claims();
        claims.aud = "someone-else".to_string();
        let (exchange, _) = exchange_with(MockVerifier::returning(claims));

        let err = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();

        assert!(matches!(err, ExchangeError::UntrustedAudience { .. }));
    }

    #[tokio::test]
    async fn test_verifier_failures_are_classified() {
        let cases = [
            (VerifierError::Transport("connection refused".into()), 500),
            (VerifierError::Upstream { status: 503 }, 500),
            (VerifierError::Malformed("expected value".into()), 500),
            (VerifierError::Rejected { status: 400 }, 401),
        ];

        for (verifier_error, code) in cases {
            let (exchange, _) = exchange_with(MockVerifier::failing(verifier_error));
            let err = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();
            assert_eq!(err.http_code(), code, "{err:?}");
        }
    }

    #[tokio::test]
    async fn test_slow_verifier_times_out() {
        let (exchange, _) = exchange_with(
            MockVerifier::returning(TestFixtures::verified_claims())
                .with_delay(Duration::from_secs(5)),
        );

        let err = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::VerifierUnavailable(VerifierError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_exchange_is_repeatable() {
        let (exchange, verifier) =
            exchange_with(MockVerifier::returning(TestFixtures::unverified_claims()));

        let first = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();
        let second = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();

        assert_eq!(first.id(), second.id());
        assert_eq!(verifier.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_audience_is_never_trusted() {
        let claims = IdentityClaims::from_json(r#"{"email_verified":"true"}"#).unwrap();
        let exchange = TokenExchange::new(
            Arc::new(MockVerifier::returning(claims)),
            "",
            Duration::from_secs(1),
        );
        assert_eq!(exchange.client_id(), "");

        let err = exchange.exchange(Some(TEST_ID_TOKEN)).await.unwrap_err();

        assert!(matches!(err, ExchangeError::UntrustedAudience { .. }));
    }

    #[tokio::test]
    async fn test_dropped_exchange_abandons_verifier_call() {
        let (exchange, verifier) = exchange_with(
            MockVerifier::returning(TestFixtures::verified_claims())
                .with_delay(Duration::from_secs(5)),
        );

        let outcome = tokio::time::timeout(
            Duration::from_millis(20),
            exchange.exchange(Some(TEST_ID_TOKEN)),
        )
        .await;

        assert!(outcome.is_err(), "exchange finished despite cancellation");
        assert_eq!(verifier.calls(), 1);
        assert_eq!(verifier.completed(), 0);
    }
}
