use super::keys::SessionKeys;
use super::SessionError;
use crate::oauth::claims::{claim_key, decode_claims};
use crate::storage::{KeyValueStore, StorageError};
use crate::utils::logging::LoggingHelper;
use std::fmt;
use std::sync::Arc;

/// One persisted session as the API client sees it
#[derive(Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub client_id: String,
    pub subject: String,
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredSession")
            .field("client_id", &self.client_id)
            .field("subject", &self.subject)
            .field("id_token", &format_args!("<{} chars>", self.id_token.len()))
            .field(
                "access_token",
                &format_args!("<{} chars>", self.access_token.len()),
            )
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<present>"))
            .finish()
    }
}

/// Writes and reads session entries in a [`KeyValueStore`]
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist a freshly issued token bundle
    ///
    /// The subject comes from the id token's `sub`, the namespace from the
    /// access token's `client_id`. Both are checked before anything is
    /// written. A repeat login overwrites every field: an absent refresh token
    /// removes the stored one, and a change of subject removes the previous
    /// subject's tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either token cannot be decoded or lacks its claim
    /// - The storage medium rejects a write
    pub fn store_session(
        &self,
        id_token: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<StoredSession, SessionError> {
        let subject = decode_claims(id_token)
            .as_ref()
            .and_then(|claims| claim_key(claims, "sub"))
            .ok_or(SessionError::MissingClaim {
                token: "id_token",
                claim: "sub",
            })?;
        let client_id = decode_claims(access_token)
            .as_ref()
            .and_then(|claims| claim_key(claims, "client_id"))
            .ok_or(SessionError::MissingClaim {
                token: "access_token",
                claim: "client_id",
            })?;

        let keys = SessionKeys::new(&client_id);
        let previous = self.store.get(&keys.last_auth_user())?;

        self.store.set(&keys.last_auth_user(), &subject)?;
        self.store.set(&keys.access_token(&subject), access_token)?;
        self.store.set(&keys.id_token(&subject), id_token)?;
        match refresh_token {
            Some(token) => self.store.set(&keys.refresh_token(&subject), token)?,
            None => self.store.remove(&keys.refresh_token(&subject))?,
        }

        if let Some(previous) = previous.filter(|p| !p.is_empty() && *p != subject) {
            LoggingHelper::log_previous_session_replaced(&client_id, &previous);
            for key in keys.token_keys(&previous) {
                self.store.remove(&key)?;
            }
        }

        LoggingHelper::log_session_stored(&client_id, &subject);

        Ok(StoredSession {
            client_id,
            subject,
            id_token: id_token.to_string(),
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(ToString::to_string),
        })
    }

    /// Read back the session last stored for `client_id`
    ///
    /// Returns `None` when no subject is recorded or its tokens are missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage medium cannot be read
    pub fn load_session(&self, client_id: &str) -> Result<Option<StoredSession>, StorageError> {
        let keys = SessionKeys::new(client_id);
        let Some(subject) = self
            .store
            .get(&keys.last_auth_user())?
            .filter(|s| !s.is_empty())
        else {
            return Ok(None);
        };

        let id_token = self.store.get(&keys.id_token(&subject))?;
        let access_token = self.store.get(&keys.access_token(&subject))?;
        let refresh_token = self.store.get(&keys.refresh_token(&subject))?;

        Ok(match (id_token, access_token) {
            (Some(id_token), Some(access_token)) => Some(StoredSession {
                client_id: client_id.to_string(),
                subject,
                id_token,
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    /// `Authorization` header value the API client attaches, `Bearer <idToken>`
    ///
    /// # Errors
    ///
    /// Returns an error if the storage medium cannot be read
    pub fn authorization_header(&self, client_id: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .load_session(client_id)?
            .map(|session| format!("Bearer {}", session.id_token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use base64::{engine::general_purpose, Engine as _};
    use serde_json::{json, Value};

    fn jwt(payload: &Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","kid":"k"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{body}.sig")
    }

    fn setup() -> (Arc<MemoryStore>, SessionStore) {
        let memory = Arc::new(MemoryStore::new());
        let store = SessionStore::new(memory.clone());
        (memory, store)
    }

    #[test]
    fn test_store_writes_four_entries() {
        let (memory, store) = setup();
        let id = jwt(&json!({"sub": "user-1"}));
        let access = jwt(&json!({"sub": "user-1", "client_id": "app"}));

        let session = store.store_session(&id, &access, Some("refresh-1")).unwrap();
        assert_eq!(session.subject, "user-1");
        assert_eq!(session.client_id, "app");

        let ns = "CognitoIdentityServiceProvider.app";
        assert_eq!(
            memory.entries(),
            vec![
                (format!("{ns}.LastAuthUser"), "user-1".to_string()),
                (format!("{ns}.user-1.accessToken"), access.clone()),
                (format!("{ns}.user-1.idToken"), id.clone()),
                (format!("{ns}.user-1.refreshToken"), "refresh-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_sub_writes_nothing() {
        let (memory, store) = setup();
        let access = jwt(&json!({"client_id": "app"}));

        let err = store
            .store_session("not-a-jwt", &access, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::MissingClaim {
                token: "id_token",
                claim: "sub"
            }
        ));
        assert!(memory.entries().is_empty());
    }

    #[test]
    fn test_missing_client_id_writes_nothing() {
        let (memory, store) = setup();
        let id = jwt(&json!({"sub": "user-1"}));
        let access = jwt(&json!({"sub": "user-1"}));

        let err = store.store_session(&id, &access, None).unwrap_err();
        assert_eq!(err.to_string(), "access_token is missing the 'client_id' claim");
        assert!(memory.entries().is_empty());
    }

    #[test]
    fn test_missing_refresh_token_clears_previous_one() {
        let (memory, store) = setup();
        let id = jwt(&json!({"sub": "user-1"}));
        let access = jwt(&json!({"client_id": "app"}));

        store.store_session(&id, &access, Some("old-refresh")).unwrap();
        store.store_session(&id, &access, None).unwrap();

        assert_eq!(
            memory
                .get("CognitoIdentityServiceProvider.app.user-1.refreshToken")
                .unwrap(),
            None
        );
        assert_eq!(memory.entries().len(), 3);
    }

    #[test]
    fn test_load_and_authorization_header() {
        let (_memory, store) = setup();
        assert!(store.load_session("app").unwrap().is_none());
        assert!(store.authorization_header("app").unwrap().is_none());

        let id = jwt(&json!({"sub": "user-1"}));
        let access = jwt(&json!({"client_id": "app"}));
        let stored = store.store_session(&id, &access, None).unwrap();

        let loaded = store.load_session("app").unwrap().unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(
            store.authorization_header("app").unwrap(),
            Some(format!("Bearer {id}"))
        );
        assert!(store.load_session("other-app").unwrap().is_none());
    }

    #[test]
    fn test_debug_does_not_leak_tokens() {
        let session = StoredSession {
            client_id: "app".to_string(),
            subject: "user-1".to_string(),
            id_token: "secret-id-token".to_string(),
            access_token: "secret-access-token".to_string(),
            refresh_token: Some("secret-refresh".to_string()),
        };
        let debug = format!("{session:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("user-1"));
    }
}
