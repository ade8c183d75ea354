//! Authorization request construction and the login redirect

use crate::navigation::Navigator;
use crate::settings::LoginConfig;
use crate::utils::logging::LoggingHelper;

/// The only response type this flow requests
pub const RESPONSE_TYPE_CODE: &str = "code";

/// One login attempt's authorization request. Built fresh, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub domain: String,
    pub identity_provider: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl AuthorizationRequest {
    #[must_use]
    pub fn new(config: &LoginConfig, identity_provider: &str) -> Self {
        Self {
            domain: config.domain.clone(),
            identity_provider: identity_provider.to_string(),
            client_id: config.client_id.clone(),
            redirect_uri: config.callback_uri.clone(),
            scope: config.scope.clone(),
        }
    }

    /// `https://{domain}/oauth2/authorize?identity_provider=..&redirect_uri=..&response_type=code&client_id=..&scope=..`
    #[must_use]
    pub fn to_url(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("identity_provider", &self.identity_provider)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", RESPONSE_TYPE_CODE)
            .append_pair("client_id", &self.client_id)
            .append_pair("scope", &self.scope)
            .finish();

        format!("https://{}/oauth2/authorize?{query}", self.domain)
    }
}

/// Send the browsing context to the identity provider
///
/// Performs no validation of `identity_provider`; callers must not invoke this
/// without a usable provider name.
pub fn start_login(navigator: &mut dyn Navigator, config: &LoginConfig, identity_provider: &str) {
    let url = AuthorizationRequest::new(config, identity_provider).to_url();
    LoggingHelper::log_authorization_redirect(identity_provider, &url);
    navigator.redirect_to(&url);
}
