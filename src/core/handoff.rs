//! # Results Hand-off
//!
//! Passes a finished prediction from the analyze route to the results route.
//! The payload is deposited under a one-time token and claimed (removed) by
//! the route that renders it. A token that was never issued, or was already
//! claimed, resolves to nothing and the caller redirects.

use std::collections::HashMap;
use std::fmt;

use crate::api::PredictionResult;

/// Opaque one-time key for a deposited result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandoffToken(String);

impl HandoffToken {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps an externally supplied token (e.g. a route restored after reload).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandoffToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct HandoffStore {
    pending: HashMap<HandoffToken, PredictionResult>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&mut self, result: PredictionResult) -> HandoffToken {
        let token = HandoffToken::generate();
        self.pending.insert(token.clone(), result);
        token
    }

    /// Takes the payload out of the store. Second claims return `None`.
    pub fn claim(&mut self, token: &HandoffToken) -> Option<PredictionResult> {
        self.pending.remove(token)
    }

    /// Drops anything deposited but never claimed.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_one_time() {
        let mut store = HandoffStore::new();
        let token = store.deposit(PredictionResult {
            success: true,
            ..Default::default()
        });
        assert_eq!(store.len(), 1);
        assert!(store.claim(&token).is_some());
        assert!(store.claim(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_token_resolves_to_nothing() {
        let mut store = HandoffStore::new();
        store.deposit(PredictionResult::default());
        assert!(store.claim(&HandoffToken::from_raw("not-a-token")).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut store = HandoffStore::new();
        let a = store.deposit(PredictionResult::default());
        let b = store.deposit(PredictionResult::default());
        assert_ne!(a, b);
    }
}
