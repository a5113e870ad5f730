//! Cache entry lifecycle

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use super::cipher::EncodedValue;

/// An encrypted, optionally time-bounded record of one resolved secret
///
/// Entries without a TTL never expire by time; they leave the cache only
/// through invalidation or a reset.
#[derive(Clone)]
pub struct CacheEntry {
    pub(crate) encoded: EncodedValue,
    pub(crate) source: String,
    pub(crate) stored_at: Instant,
    pub(crate) ttl: Option<Duration>,
}

impl CacheEntry {
    /// Create an entry stored now
    pub fn new(encoded: EncodedValue, source: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            encoded,
            source: source.into(),
            stored_at: Instant::now(),
            ttl,
        }
    }

    pub fn encoded(&self) -> &EncodedValue {
        &self.encoded
    }

    /// The provider that originally supplied the value
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn stored_at(&self) -> Instant {
        self.stored_at
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Whether the entry is expired at `now`
    ///
    /// Expired means strictly more than `ttl` has elapsed since it was stored.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.stored_at) > ttl,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("encoded", &self.encoded)
            .field("source", &self.source)
            .field("stored_at", &self.stored_at)
            .field("ttl", &self.ttl)
            .finish()
    }
}
