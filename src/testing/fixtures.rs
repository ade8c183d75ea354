//! Test fixtures providing pre-built test objects

use crate::flow::LoginPage;
use crate::oauth::{TokenBundle, TokenClient};
use crate::session::SessionStore;
use crate::settings::LoginConfig;
use crate::storage::{KeyValueStore, MemoryStore};
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;

use super::constants::{
    TEST_CALLBACK_URI, TEST_CLIENT_ID, TEST_DOMAIN, TEST_PROVIDER, TEST_TITLE,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Configuration with a default identity provider
    #[must_use]
    pub fn login_config() -> LoginConfig {
        LoginConfig {
            domain: TEST_DOMAIN.to_string(),
            client_id: TEST_CLIENT_ID.to_string(),
            callback_uri: TEST_CALLBACK_URI.to_string(),
            identity_provider: Some(TEST_PROVIDER.to_string()),
            title: TEST_TITLE.to_string(),
            scope: crate::settings::DEFAULT_SCOPE.to_string(),
            dark_mode: false,
            root_route: "/".to_string(),
        }
    }

    /// Configuration with no identity provider
    #[must_use]
    pub fn login_config_without_provider() -> LoginConfig {
        LoginConfig {
            identity_provider: None,
            ..Self::login_config()
        }
    }

    /// Unsigned compact JWT carrying `payload`
    #[must_use]
    pub fn jwt(payload: &Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","kid":"test"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        let signature = general_purpose::URL_SAFE_NO_PAD.encode(b"not-a-real-signature");
        format!("{header}.{body}.{signature}")
    }

    /// Id token for `subject`
    #[must_use]
    pub fn id_token(subject: &str) -> String {
        Self::jwt(&json!({
            "sub": subject,
            "aud": TEST_CLIENT_ID,
            "iss": format!("https://{TEST_DOMAIN}"),
            "token_use": "id",
            "email": "test@example.com",
        }))
    }

    /// Access token for `subject` issued to the fixture client
    #[must_use]
    pub fn access_token(subject: &str) -> String {
        Self::jwt(&json!({
            "sub": subject,
            "client_id": TEST_CLIENT_ID,
            "token_use": "access",
            "scope": "openid profile email",
            "exp": 1_893_456_000,
        }))
    }

    /// Complete bundle for `subject`, including a refresh token
    #[must_use]
    pub fn token_bundle(subject: &str) -> TokenBundle {
        TokenBundle {
            id_token: Self::id_token(subject),
            access_token: Self::access_token(subject),
            refresh_token: Some(format!("refresh-{subject}")),
        }
    }

    /// Login page over an in-memory store, using the default configuration
    #[must_use]
    pub fn login_page(token_client: impl TokenClient + 'static) -> (LoginPage, Arc<MemoryStore>) {
        Self::login_page_with(Self::login_config(), token_client)
    }

    /// Login page over an in-memory store
    #[must_use]
    pub fn login_page_with(
        config: LoginConfig,
        token_client: impl TokenClient + 'static,
    ) -> (LoginPage, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let page = Self::login_page_over(config, token_client, store.clone());
        (page, store)
    }

    /// Login page over a caller-provided store
    #[must_use]
    pub fn login_page_over(
        config: LoginConfig,
        token_client: impl TokenClient + 'static,
        store: Arc<dyn KeyValueStore>,
    ) -> LoginPage {
        LoginPage::new(config, Arc::new(token_client), SessionStore::new(store))
    }
}
