//! Pre-built test data

use crate::models::IdentityClaims;
use crate::settings::ExchangeSettings;

use super::constants::{TEST_CLIENT_ID, TEST_EMAIL, TEST_SUBJECT};

pub struct TestFixtures;

impl TestFixtures {
    /// Claims that pass every trust check for [`TEST_CLIENT_ID`]
    #[must_use]
    pub fn verified_claims() -> IdentityClaims {
        IdentityClaims {
            aud: TEST_CLIENT_ID.to_string(),
            sub: TEST_SUBJECT.to_string(),
            email: TEST_EMAIL.to_string(),
            email_verified: true,
            picture: "https://example.com/avatar.png".to_string(),
            given_name: "Test".to_string(),
            family_name: "User".to_string(),
            locale: "en".to_string(),
        }
    }

    /// Verified claims issued for a different application
    #[must_use]
    pub fn claims_for_audience(aud: &str) -> IdentityClaims {
        IdentityClaims {
            aud: aud.to_string(),
            ..Self::verified_claims()
        }
    }

    /// Claims for our audience whose email is not verified
    #[must_use]
    pub fn unverified_claims() -> IdentityClaims {
        IdentityClaims {
            email_verified: false,
            ..Self::verified_claims()
        }
    }

    /// Settings pointing at `tokeninfo_url` with the test client id
    #[must_use]
    pub fn settings(tokeninfo_url: &str) -> ExchangeSettings {
        let mut settings = ExchangeSettings::default();
        settings.verifier.tokeninfo_url = tokeninfo_url.to_string();
        settings.verifier.client_id = Some(TEST_CLIENT_ID.to_string());
        settings.verifier.timeout_seconds = 2;
        settings.verifier.connect_timeout_seconds = 1;
        settings
    }
}
