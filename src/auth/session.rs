use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

pub const SESSION_COOKIE: &str = "session";

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct SessionEntry {
    username: String,
    expires_at: Instant,
}

/// In-process map from an opaque session token to the owning username.
/// Expired entries are dropped the next time their token is presented.
/// Concurrent logins for the same account may each hold a token; that race
/// is accepted.
#[derive(Debug)]
pub struct SessionCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, SessionEntry>>,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl SessionCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Mint a fresh token bound to `username`.
    pub fn issue(&self, username: &str) -> String {
        let token = generate_token();
        let entry = SessionEntry {
            username: username.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(token.clone(), entry);
        debug!(username, ttl_secs = self.ttl.as_secs(), "session issued");
        token
    }

    /// Resolve a token to its username, pruning it if expired.
    pub fn resolve(&self, token: &str) -> Option<String> {
        let now = Instant::now();
        let mut stale = false;
        let out = {
            let entries = self.entries.read();
            match entries.get(token) {
                Some(entry) if entry.expires_at > now => Some(entry.username.clone()),
                Some(_) => {
                    stale = true;
                    None
                }
                None => None,
            }
        };
        if stale {
            self.entries.write().remove(token);
        }
        out
    }

    /// Destroy a token (logout). Returns whether it was live.
    pub fn remove(&self, token: &str) -> bool {
        self.entries.write().remove(token).is_some()
    }
}

// 256-bit random token, base64url without padding.
fn generate_token() -> String {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_resolve_returns_the_owner() {
        let cache = SessionCache::default();
        let token = cache.issue("alice");
        assert_eq!(cache.resolve(&token), Some("alice".to_string()));
    }

    #[test]
    fn unknown_tokens_do_not_resolve() {
        let cache = SessionCache::default();
        assert_eq!(cache.resolve("no-such-token"), None);
    }

    #[test]
    fn expired_tokens_are_pruned_on_resolve() {
        let cache = SessionCache::with_ttl(Duration::ZERO);
        let token = cache.issue("alice");
        assert_eq!(cache.resolve(&token), None);
        // gone entirely, not just filtered
        assert!(!cache.remove(&token));
    }

    #[test]
    fn remove_destroys_a_live_session() {
        let cache = SessionCache::default();
        let token = cache.issue("alice");
        assert!(cache.remove(&token));
        assert_eq!(cache.resolve(&token), None);
        assert!(!cache.remove(&token));
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let cache = SessionCache::default();
        let a = cache.issue("alice");
        let b = cache.issue("alice");
        assert_ne!(a, b);
        assert_eq!(cache.resolve(&a), Some("alice".to_string()));
        assert_eq!(cache.resolve(&b), Some("alice".to_string()));
    }
}
