//! Storage key naming shared with the API client that reads the session.
//!
//! `CognitoIdentityServiceProvider.{clientId}.LastAuthUser`
//! `CognitoIdentityServiceProvider.{clientId}.{sub}.accessToken`
//! `CognitoIdentityServiceProvider.{clientId}.{sub}.idToken`
//! `CognitoIdentityServiceProvider.{clientId}.{sub}.refreshToken`

pub const SESSION_NAMESPACE: &str = "CognitoIdentityServiceProvider";

/// Keys for one app client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    prefix: String,
}

impl SessionKeys {
    #[must_use]
    pub fn new(client_id: &str) -> Self {
        Self {
            prefix: format!("{SESSION_NAMESPACE}.{client_id}"),
        }
    }

    /// Namespace prefix, `CognitoIdentityServiceProvider.{clientId}`
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn last_auth_user(&self) -> String {
        format!("{}.LastAuthUser", self.prefix)
    }

    #[must_use]
    pub fn access_token(&self, subject: &str) -> String {
        format!("{}.{subject}.accessToken", self.prefix)
    }

    #[must_use]
    pub fn id_token(&self, subject: &str) -> String {
        format!("{}.{subject}.idToken", self.prefix)
    }

    #[must_use]
    pub fn refresh_token(&self, subject: &str) -> String {
        format!("{}.{subject}.refreshToken", self.prefix)
    }

    /// The three per-subject token keys
    #[must_use]
    pub fn token_keys(&self, subject: &str) -> [String; 3] {
        [
            self.access_token(subject),
            self.id_token(subject),
            self.refresh_token(subject),
        ]
    }
}
