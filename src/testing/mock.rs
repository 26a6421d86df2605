//! Mock objects and fake implementations for testing
//!
//! This module provides test doubles for the identity provider and the
//! response status sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::exchange::{TokenVerifier, VerifierError};
use crate::models::{IdentityClaims, StatusSink};

/// Verifier returning a canned answer and recording how it was called
pub struct MockVerifier {
    outcome: Result<IdentityClaims, VerifierError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    completed: AtomicUsize,
    last_token: Mutex<Option<String>>,
}

impl MockVerifier {
    /// Verifier that always answers with `claims`
    #[must_use]
    pub fn returning(claims: IdentityClaims) -> Self {
        Self::with_outcome(Ok(claims))
    }

    /// Verifier that always fails with `error`
    #[must_use]
    pub fn failing(error: VerifierError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<IdentityClaims, VerifierError>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            last_token: Mutex::new(None),
        }
    }

    /// Wait `delay` before answering, to simulate a slow provider
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `verify` calls so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `verify` calls that ran to completion
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Token passed to the most recent `verify` call
    ///
    /// # Panics
    ///
    /// Panics if a previous caller panicked while holding the lock.
    #[must_use]
    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenVerifier for MockVerifier {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_token.lock() {
            *last = Some(token.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Status sink recording every code written to it
#[derive(Debug, Default)]
pub struct RecordingSink {
    codes: Vec<u16>,
}

impl RecordingSink {
    #[must_use]
    pub fn codes(&self) -> &[u16] {
        &self.codes
    }
}

impl StatusSink for RecordingSink {
    fn write_status(&mut self, code: u16) {
        self.codes.push(code);
    }
}
