//! In-memory session token store.
//!
//! Logging in is the only way to mint a token; there is no logout. A token
//! stays valid while it is present in the store and younger than
//! [`TOKEN_TIMEOUT`]. Expired entries are swept lazily on every `issue`,
//! which bounds the store to the number of logins in one timeout window.

use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Session lifetime: 10 hours.
pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(10 * 60 * 60);

struct SessionInfo {
    issued_at: Instant,
}

/// Thread-safe in-memory session store.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionInfo>>,
    timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_timeout(TOKEN_TIMEOUT)
    }

    /// A store with a custom token lifetime. Production uses [`TOKEN_TIMEOUT`].
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    /// Issue a new session token (64-char hex string) and record its issue
    /// time. Expired entries are evicted first, keeping the store bounded.
    pub fn issue(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let token = hex::encode(bytes);

        let mut sessions = self.sessions.write();
        sessions.retain(|_, info| info.issued_at.elapsed() < self.timeout);
        sessions.insert(
            token.clone(),
            SessionInfo {
                issued_at: Instant::now(),
            },
        );

        token
    }

    /// Check whether a token exists and has not expired.
    ///
    /// Read-only: a token that was never issued and one that has expired are
    /// indistinguishable to the caller.
    pub fn is_valid(&self, token: &str) -> bool {
        self.sessions
            .read()
            .get(token)
            .map(|info| info.issued_at.elapsed() < self.timeout)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn issued_token_is_valid() {
        let store = SessionStore::new();
        let token = store.issue();
        assert_eq!(token.len(), 64);
        assert!(store.is_valid(&token));
    }

    #[test]
    fn unknown_token_is_invalid() {
        let store = SessionStore::new();
        assert!(!store.is_valid("nonexistent"));
    }

    #[test]
    fn tokens_are_unique() {
        let store = SessionStore::new();
        assert_ne!(store.issue(), store.issue());
    }

    #[test]
    fn token_expires_and_stays_expired() {
        let store = SessionStore::with_timeout(Duration::from_millis(20));
        let token = store.issue();
        assert!(store.is_valid(&token));

        sleep(Duration::from_millis(30));
        assert!(!store.is_valid(&token));
        // Repeated queries keep returning false.
        assert!(!store.is_valid(&token));
    }

    #[test]
    fn issue_sweeps_expired_entries() {
        let store = SessionStore::with_timeout(Duration::from_millis(20));
        let _stale = store.issue();
        sleep(Duration::from_millis(30));

        store.issue();
        assert_eq!(store.sessions.read().len(), 1);
    }
}
