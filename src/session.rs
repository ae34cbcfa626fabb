use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::backend::LoginSuccess;

/// Context of a logged-in member. Opened on successful login and dropped on
/// logout or once older than the store's max age.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub identifier: String,
    pub logged_in_at: DateTime<Utc>,
    pub profile_photo: Option<String>,
}

pub const DEFAULT_MAX_AGE_MINUTES: i64 = 12 * 60;

impl Session {
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.logged_in_at > max_age
    }
}

/// Expired sessions are dropped when looked up and swept on every login, so
/// members who never log out do not accumulate.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    max_age: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_max_age(Duration::minutes(DEFAULT_MAX_AGE_MINUTES))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_age(max_age: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            max_age,
        }
    }

    pub fn open(&self, identifier: &str, login: LoginSuccess) -> Session {
        let session = Session {
            token: login.token,
            identifier: identifier.to_string(),
            logged_in_at: Utc::now(),
            profile_photo: login.profile_photo,
        };
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.max_age, now));
        if sessions.len() < before {
            debug!(pruned = before - sessions.len(), "expired sessions pruned");
        }
        if sessions
            .insert(session.token.clone(), session.clone())
            .is_some()
        {
            debug!("replaced existing session for reissued token");
        }
        info!(identifier = %session.identifier, "session opened");
        session
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        let session = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()?;
        if session.is_expired(self.max_age, Utc::now()) {
            self.close(token);
            debug!(identifier = %session.identifier, "session expired");
            return None;
        }
        Some(session)
    }

    pub fn close(&self, token: &str) -> Option<Session> {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
        if let Some(session) = &removed {
            info!(identifier = %session.identifier, "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
