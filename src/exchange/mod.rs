//! Token exchange: trade a provider ID token for a trust decision
//!
//! The pipeline runs extract → verify → decode → validate → accept. The
//! network call is hidden behind [`TokenVerifier`] so [`TokenExchange`] never
//! depends on a concrete HTTP client.

pub mod error;
pub mod pipeline;
pub mod tokeninfo;
pub mod verifier;

pub use error::ExchangeError;
pub use pipeline::{TokenExchange, TrustDecision};
pub use tokeninfo::TokenInfoVerifier;
pub use verifier::{TokenVerifier, VerifierError};
