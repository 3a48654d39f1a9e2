//! Cached authentication state.
//!
//! The backend owns accounts and token issuance; this module only keeps
//! the session the UI handed us, durable across reloads, and clears it
//! when the gateway reports the session expired.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::StoreResult;
use crate::store::{atomic_write_json, read_json_or_default};

const SESSION_FILE: &str = "auth_session.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    #[serde(default)]
    pub account: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

/// Holder of the cached session. A 401 anywhere in the sync or
/// generation paths calls [`AuthState::sign_out`] before the error
/// surfaces, so a dead token is never retried.
pub struct AuthState {
    path: PathBuf,
    session: Mutex<Option<AuthSession>>,
}

impl AuthState {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SESSION_FILE);
        let session = read_json_or_default::<Option<AuthSession>>(&path).unwrap_or_else(|err| {
            warn!("cached auth session is unreadable, discarding: {}", err);
            None
        });
        Self {
            path,
            session: Mutex::new(session),
        }
    }

    pub fn sign_in(
        &self,
        token: impl Into<String>,
        account: Option<String>,
    ) -> StoreResult<AuthSession> {
        let session = AuthSession {
            token: token.into(),
            account,
            signed_in_at: Utc::now(),
        };
        atomic_write_json(&self.path, &Some(session.clone()))?;
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    /// Clear the cached session. Returns whether a session was present.
    pub fn sign_out(&self) -> bool {
        let had_session = self.session.lock().unwrap().take().is_some();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to remove cached auth session: {}", err),
        }
        if had_session {
            info!("signed out, cached session cleared");
        }
        had_session
    }

    pub fn token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.session.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sign_in_persists_across_reload() {
        let dir = tempdir().unwrap();

        let auth = AuthState::load(dir.path());
        assert!(!auth.is_authenticated());
        auth.sign_in("token-123", Some("dev@example.com".to_string()))
            .unwrap();

        let reloaded = AuthState::load(dir.path());
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token().as_deref(), Some("token-123"));
        assert_eq!(
            reloaded.session().unwrap().account.as_deref(),
            Some("dev@example.com")
        );
    }

    #[test]
    fn test_sign_out_clears_cache_and_file() {
        let dir = tempdir().unwrap();

        let auth = AuthState::load(dir.path());
        auth.sign_in("token-123", None).unwrap();
        assert!(auth.sign_out());
        assert!(!auth.is_authenticated());
        assert!(!auth.sign_out());

        let reloaded = AuthState::load(dir.path());
        assert!(!reloaded.is_authenticated());
    }

    #[test]
    fn test_corrupt_session_file_discarded() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "][").unwrap();

        let auth = AuthState::load(dir.path());
        assert!(!auth.is_authenticated());
    }
}
