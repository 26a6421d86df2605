// Centralized logging for token exchanges
use crate::exchange::{ExchangeError, TrustDecision};
use log::{debug, error, info, warn};
use std::error::Error as _;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log an accepted exchange without any token material
    pub fn log_exchange_accepted(decision: &TrustDecision) {
        info!("{}", Self::accepted_message(decision));
        debug!("Accepted subject {} has email {}", decision.claims.sub, decision.claims.email);
    }

    /// Info line for an accepted exchange; carries no personal data besides `sub`
    #[must_use]
    pub fn accepted_message(decision: &TrustDecision) -> String {
        format!(
            "Token exchange accepted for subject {} at {}",
            decision.claims.sub,
            decision.accepted_at.to_rfc3339()
        )
    }

    /// Log a failed exchange, with the upstream cause for server side failures
    pub fn log_exchange_failed(err: &ExchangeError) {
        if err.is_internal() {
            match err.source() {
                Some(cause) => error!("Token exchange failed ({}): {err}: {cause}", err.id()),
                None => error!("Token exchange failed ({}): {err}", err.id()),
            }
        } else {
            warn!("Token exchange rejected ({}): {err}", err.id());
        }
    }

    /// Log verifier configuration at startup
    pub fn log_verifier_configured(endpoint: &str, client_id: &str, timeout_seconds: u64) {
        info!("✅ Identity verifier configured: {endpoint} (client id {client_id}, timeout {timeout_seconds}s)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::constants::{TEST_EMAIL, TEST_SUBJECT};
    use crate::testing::TestFixtures;

    #[test]
    fn test_accepted_message_omits_email() {
        let decision = TrustDecision {
            claims: TestFixtures::verified_claims(),
            accepted_at: chrono::Utc::now(),
        };

        let message = LoggingHelper::accepted_message(&decision);

        assert!(message.contains(TEST_SUBJECT));
        assert!(!message.contains(TEST_EMAIL));
    }
}
