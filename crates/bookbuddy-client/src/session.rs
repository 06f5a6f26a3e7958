use std::sync::{Arc, PoisonError, RwLock};

use bookbuddy_types::{User, UserProfile};
use tracing::{debug, warn};

use crate::claims;
use crate::error::{ClientError, Result};
use crate::storage::{SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY};

/// The signed-in user plus the tokens behind it.
///
/// Cloning is cheap and every clone sees the same state, so the UI and the
/// book client can share one session.
pub struct Session<S> {
    inner: Arc<SessionInner<S>>,
}

struct SessionInner<S> {
    store: S,
    user: RwLock<Option<User>>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store,
                user: RwLock::new(None),
            }),
        }
    }

    /// Rebuilds the session from storage at startup.
    ///
    /// A stored token that no longer decodes, or a stored user that no longer
    /// parses, wipes everything.
    pub fn restore(&self) -> Option<User> {
        let token = self.inner.store.get(ACCESS_TOKEN_KEY)?;

        let restored = claims::decode(&token).and_then(|tokenClaims| {
            match self.inner.store.get(USER_KEY) {
                Some(raw) => serde_json::from_str::<User>(&raw)
                    .map_err(|e| ClientError::Storage(format!("stored user is corrupt: {e}"))),
                None => tokenClaims.to_user(&UserProfile::default()),
            }
        });

        match restored {
            Ok(user) => {
                debug!(user_id = %user.user_id, "restored session");
                self.set_user(Some(user.clone()));
                Some(user)
            }
            Err(e) => {
                warn!("failed to restore session: {e}");
                self.logout();
                None
            }
        }
    }

    /// Persists both tokens and derives the user from the access token.
    ///
    /// On a decode failure the tokens stay stored but the current user is
    /// left as it was.
    pub fn login(
        &self,
        accessToken: &str,
        refreshToken: &str,
        profile: &UserProfile,
    ) -> Result<User> {
        self.inner.store.set(ACCESS_TOKEN_KEY, accessToken)?;
        self.inner.store.set(REFRESH_TOKEN_KEY, refreshToken)?;

        let user = claims::decode(accessToken)
            .and_then(|tokenClaims| tokenClaims.to_user(profile))
            .inspect_err(|e| warn!("failed to decode access token: {e}"))?;

        let serialized = serde_json::to_string(&user)
            .map_err(|e| ClientError::Storage(format!("failed to serialize user: {e}")))?;
        self.inner.store.set(USER_KEY, &serialized)?;
        self.set_user(Some(user.clone()));

        Ok(user)
    }

    pub fn logout(&self) {
        self.inner.store.remove(ACCESS_TOKEN_KEY);
        self.inner.store.remove(REFRESH_TOKEN_KEY);
        self.inner.store.remove(USER_KEY);
        self.set_user(None);
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.inner.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn user(&self) -> Option<User> {
        self.inner
            .user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn set_user(&self, user: Option<User>) {
        *self
            .inner
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner) = user;
    }
}
