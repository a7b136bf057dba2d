//! In-memory user sessions.
//!
//! A session maps an unguessable token, handed to the browser in a cookie, to
//! the id of the logged-in user. Sessions expire after a fixed TTL and do not
//! survive a restart.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use potbot_domain::id::UserId;
use potbot_domain::time::{Timestamp, now};

/// Default lifetime of a session (one day).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

/// Longest accepted session lifetime (ten years).
pub const MAX_SESSION_TTL_SECS: i64 = 315_360_000;

/// Opaque session handle stored in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.as_simple().fmt(f)
    }
}

impl FromStr for SessionToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    user_id: UserId,
    expires_at: Timestamp,
}

/// Thread-safe token → user map with expiry.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<SessionToken, Session>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    /// Build a store whose sessions live for `ttl`, capped at
    /// [`MAX_SESSION_TTL_SECS`].
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: ttl.min(Duration::seconds(MAX_SESSION_TTL_SECS)),
            sessions: Mutex::default(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Open a session for `user_id` and return its token.
    pub fn create(&self, user_id: UserId) -> SessionToken {
        let token = SessionToken::generate();
        let session = Session {
            user_id,
            expires_at: now()
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.lock().insert(token, session);
        tracing::debug!(%user_id, "session opened");
        token
    }

    /// Resolve `token` to its user, dropping it if it has expired.
    pub fn resolve(&self, token: &SessionToken) -> Option<UserId> {
        let mut sessions = self.lock();
        let session = *sessions.get(token)?;
        if session.expires_at <= now() {
            sessions.remove(token);
            return None;
        }
        Some(session.user_id)
    }

    /// Close a session. Unknown tokens are ignored.
    pub fn revoke(&self, token: &SessionToken) {
        self.lock().remove(token);
    }

    /// Drop every expired session and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let current = now();
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > current);
        before - sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionToken, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
