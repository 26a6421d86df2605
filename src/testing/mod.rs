//! Testing utilities for the login exchange gateway
//!
//! - [`fixtures`] - Pre-built claims and settings
//! - [`mock`] - Test doubles for the identity provider and status sinks
//! - [`assertions`] - Assertion helpers for API responses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use login_exchange::exchange::TokenExchange;
//! use login_exchange::testing::{constants::TEST_CLIENT_ID, MockVerifier, TestFixtures};
//!
//! let verifier = Arc::new(MockVerifier::returning(TestFixtures::verified_claims()));
//! let exchange = TokenExchange::new(verifier, TEST_CLIENT_ID, Duration::from_secs(1));
//! assert_eq!(exchange.client_id(), TEST_CLIENT_ID);
//! ```

pub mod assertions;
pub mod fixtures;
pub mod mock;

pub use assertions::*;
pub use fixtures::TestFixtures;
pub use mock::{MockVerifier, RecordingSink};

/// Common test constants
pub mod constants {
    /// Client id the test exchange is configured with
    pub const TEST_CLIENT_ID: &str = "1234567890-test.apps.googleusercontent.com";

    /// Opaque token sent by test callers
    pub const TEST_ID_TOKEN: &str = "eyJhbGciOiJSUzI1NiJ9.test-payload.test-signature";

    /// Provider user id of the test subject
    pub const TEST_SUBJECT: &str = "110169484474386276334";

    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";
}
