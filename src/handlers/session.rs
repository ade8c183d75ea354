// Session summary and health endpoints
use crate::flow::LoginPage;
use crate::oauth::decode_claims;
use actix_web::{web, HttpResponse, Result};
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, error};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

/// Token-free view of the stored session
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub authenticated: bool,
    pub client_id: String,
    pub subject: Option<String>,
    pub has_refresh_token: bool,
    pub access_token_expires_at: Option<DateTime<Utc>>,
}

/// Health check endpoint
///
/// # Errors
/// Never fails; the `Result` matches the other handlers
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        message: "Login bootstrap is running",
    }))
}

/// Summary of the session stored for the configured client
///
/// # Errors
/// Never fails; storage errors are answered with 500
pub async fn session_summary(page: web::Data<LoginPage>) -> Result<HttpResponse> {
    let client_id = page.config().client_id.clone();

    match page.sessions().load_session(&client_id) {
        Ok(Some(session)) => {
            let expires_at = decode_claims(&session.access_token)
                .and_then(|claims| claims.get("exp").and_then(serde_json::Value::as_i64))
                .and_then(|exp| Utc.timestamp_opt(exp, 0).single());

            Ok(HttpResponse::Ok().json(SessionSummary {
                authenticated: true,
                client_id,
                subject: Some(session.subject),
                has_refresh_token: session.refresh_token.is_some(),
                access_token_expires_at: expires_at,
            }))
        }
        Ok(None) => {
            debug!("No stored session for client {client_id}");
            Ok(HttpResponse::Ok().json(SessionSummary {
                authenticated: false,
                client_id,
                subject: None,
                has_refresh_token: false,
                access_token_expires_at: None,
            }))
        }
        Err(e) => {
            error!("Failed to read session store: {e}");
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "storage_unavailable",
                "message": e.to_string(),
            })))
        }
    }
}
