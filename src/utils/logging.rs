// Centralized logging for the login flow. Tokens are never logged verbatim.
use log::{debug, error, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log which branch the login page took for this visit
    pub fn log_page_entry(state: &str) {
        debug!("Login page entered, state: {state}");
    }

    /// Log the authorization redirect
    pub fn log_authorization_redirect(identity_provider: &str, url: &str) {
        info!("🔍 Redirecting to identity provider {identity_provider}: {url}");
    }

    /// Log that no identity provider could be resolved
    pub fn log_unknown_provider() {
        warn!("❌ No identity provider configured or requested, showing error state");
    }

    /// Log token exchange start
    pub fn log_token_exchange_start(token_url: &str) {
        info!("🔄 Exchanging authorization code for tokens at {token_url}");
    }

    /// Log a rejected exchange
    pub fn log_token_exchange_failure(status: u16, body: &str) {
        error!("Token exchange failed with status {status}: {body}");
    }

    /// Log token exchange summary
    pub fn log_token_exchange_summary(
        id_token: &str,
        access_token: &str,
        refresh_token: Option<&String>,
    ) {
        info!(
            "🔍 Token exchange summary: id_token={} chars, access_token={} chars, refresh_token={}",
            id_token.len(),
            access_token.len(),
            refresh_token.map_or("missing", |_| "present")
        );
    }

    /// Log a token whose claims could not be read
    pub fn log_token_decode_failure(reason: &str) {
        warn!("Failed to decode token claims: {reason}");
    }

    /// Log session persistence
    pub fn log_session_stored(client_id: &str, subject: &str) {
        info!("Stored session for subject {subject} under client {client_id}");
    }

    /// Log removal of a previous subject's tokens
    pub fn log_previous_session_replaced(client_id: &str, previous: &str) {
        debug!("Replacing previous session of {previous} under client {client_id}");
    }

    /// Log an exchange abandoned because the page went away
    pub fn log_exchange_cancelled() {
        warn!("Token exchange abandoned: login page was left before completion");
    }
}
