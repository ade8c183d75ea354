//! Authorization code exchange
//!
//! A single form-encoded POST to the token endpoint. No retry: the code is
//! consumed by the first attempt whatever the outcome.

use crate::errors::LoginError;
use crate::settings::LoginConfig;
use crate::utils::logging::LoggingHelper;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// Bearer artifacts returned by the token endpoint
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenBundle {
    pub id_token: String,
    pub access_token: String,
    /// Absent when the app client does not issue refresh tokens
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBundle")
            .field("id_token", &format_args!("<{} chars>", self.id_token.len()))
            .field(
                "access_token",
                &format_args!("<{} chars>", self.access_token.len()),
            )
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<present>"))
            .finish()
    }
}

/// Form fields of an `authorization_code` grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub token_url: String,
    pub code: String,
    pub redirect_uri: String,
    pub client_id: String,
}

impl TokenRequest {
    #[must_use]
    pub fn new(config: &LoginConfig, code: &str) -> Self {
        Self {
            token_url: config.token_endpoint(),
            code: code.to_string(),
            redirect_uri: config.callback_uri.clone(),
            client_id: config.client_id.clone(),
        }
    }

    /// Body fields in wire order
    #[must_use]
    pub fn form(&self) -> [(&'static str, &str); 4] {
        [
            ("code", self.code.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
        ]
    }
}

/// Token endpoint client
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Exchange an authorization code for a token bundle
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The endpoint cannot be reached
    /// - The endpoint answers with a non-success status
    /// - The response body is not a usable token response
    async fn exchange_code(&self, request: &TokenRequest) -> Result<TokenBundle, LoginError>;
}

/// `reqwest` backed token client
#[derive(Debug, Clone, Default)]
pub struct HttpTokenClient {
    http_client: reqwest::Client,
}

impl HttpTokenClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl TokenClient for HttpTokenClient {
    async fn exchange_code(&self, request: &TokenRequest) -> Result<TokenBundle, LoginError> {
        LoggingHelper::log_token_exchange_start(&request.token_url);

        let response = self
            .http_client
            .post(&request.token_url)
            .form(&request.form())
            .send()
            .await
            .map_err(|e| LoginError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LoginError::Network(format!("Failed to read token response: {e}")))?;

        parse_token_response(status, &body)
    }
}

/// Interpret a token endpoint response
///
/// # Errors
///
/// Returns `TokenExchange` for a non-2xx status and `InvalidResponse` when the
/// body lacks `id_token` or `access_token`.
pub fn parse_token_response(status: u16, body: &str) -> Result<TokenBundle, LoginError> {
    if !(200..300).contains(&status) {
        LoggingHelper::log_token_exchange_failure(status, body);
        return Err(LoginError::TokenExchange {
            status,
            body: body.to_string(),
        });
    }

    let mut bundle: TokenBundle = serde_json::from_str(body)
        .map_err(|e| LoginError::InvalidResponse(format!("Failed to parse token response: {e}")))?;

    if bundle.refresh_token.as_deref() == Some("") {
        bundle.refresh_token = None;
    }

    LoggingHelper::log_token_exchange_summary(
        &bundle.id_token,
        &bundle.access_token,
        bundle.refresh_token.as_ref(),
    );

    Ok(bundle)
}
