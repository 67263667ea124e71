//! Correlation registry: pending response handlers keyed by one-shot tokens.
//!
//! Every asynchronous getter registers a handler here and sends the returned
//! token to the widget; the eventual inbound response carries the token back
//! and resolves the handler. Resolution is one-shot: a token is removed the
//! instant it is matched, so duplicate or spoofed responses fail.
//!
//! There is no expiry and no cancellation. A pending call whose response
//! never arrives stays registered for the host's lifetime; [`PendingCalls::len`]
//! exposes the count so embedders can watch for leaks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use uuid::Uuid;

/// Opaque identifier pairing one asynchronous request with its response.
///
/// Tokens are generated fresh per registration and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationToken(Uuid);

impl CorrelationToken {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the boundary string form of a token.
    pub fn parse(s: &str) -> Result<Self, InvalidToken> {
        Uuid::parse_str(s).map(Self).map_err(|_| InvalidToken)
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The token string did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidToken;

impl fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a valid correlation token")
    }
}

impl std::error::Error for InvalidToken {}

/// The token has no pending call: never registered, or already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownToken;

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no pending call for token")
    }
}

impl std::error::Error for UnknownToken {}

/// Handler invoked with the decoded response value.
pub type ResponseHandler<T> = Box<dyn FnOnce(T) + Send>;

/// One-shot map from correlation token to pending response handler.
///
/// One registry exists per response shape. Guarded by a mutex: the host's
/// outbound and inbound paths may run on different threads in the embedding
/// runtime.
pub struct PendingCalls<T> {
    inner: Mutex<HashMap<Uuid, ResponseHandler<T>>>,
}

impl<T> PendingCalls<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Store `handler` under a fresh token and return the token.
    pub fn register(&self, handler: impl FnOnce(T) + Send + 'static) -> CorrelationToken {
        let token = CorrelationToken::generate();
        self.inner.lock().unwrap().insert(token.0, Box::new(handler));
        token
    }

    /// Atomically look up and remove the handler for `token`.
    ///
    /// Each token resolves exactly once; a second resolve of the same token
    /// fails with [`UnknownToken`].
    pub fn resolve(&self, token: &CorrelationToken) -> Result<ResponseHandler<T>, UnknownToken> {
        self.inner.lock().unwrap().remove(&token.0).ok_or(UnknownToken)
    }

    /// Number of calls still awaiting a response.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for PendingCalls<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_resolve_succeeds_exactly_once() {
        let pending: PendingCalls<u32> = PendingCalls::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits2 = hits.clone();
        let token = pending.register(move |v| {
            assert_eq!(v, 7);
            hits2.fetch_add(1, Ordering::SeqCst);
        });

        let handler = pending.resolve(&token).unwrap();
        handler(7);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Second resolve of the same token fails.
        assert!(matches!(pending.resolve(&token), Err(UnknownToken)));
    }

    #[test]
    fn test_unregistered_token_fails() {
        let pending: PendingCalls<String> = PendingCalls::new();
        let never_registered = CorrelationToken::generate();
        assert!(matches!(pending.resolve(&never_registered), Err(UnknownToken)));
    }

    #[test]
    fn test_tokens_are_distinct() {
        let pending: PendingCalls<()> = PendingCalls::new();
        let a = pending.register(|_| {});
        let b = pending.register(|_| {});
        assert_ne!(a, b);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_token_parse_round_trip() {
        let token = CorrelationToken::generate();
        let parsed = CorrelationToken::parse(&token.to_string()).unwrap();
        assert_eq!(parsed, token);

        assert!(CorrelationToken::parse("not-a-token").is_err());
    }

    #[test]
    fn test_unmatched_call_stays_pending() {
        // No expiry: an unanswered call is never reclaimed.
        let pending: PendingCalls<()> = PendingCalls::new();
        let _token = pending.register(|_| {});
        assert_eq!(pending.len(), 1);
    }
}
