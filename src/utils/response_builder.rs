// HTTP responses for the login page
use crate::errors::LoginError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;

/// Rewrites the address bar to the bare path without a navigation
const REPLACE_HISTORY_SCRIPT: &str =
    "<script>history.replaceState(null, '', window.location.pathname);</script>";

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Full-page redirect
    #[must_use]
    pub fn redirect(location: &str) -> HttpResponse {
        HttpResponse::Found()
            .append_header(("Location", location))
            .append_header(("Cache-Control", "no-store"))
            .finish()
    }

    /// Idle view: a single sign-in link that auto-initiates the login
    #[must_use]
    pub fn sign_in_page(
        provider: &str,
        title: &str,
        dark_mode: bool,
        callback_path: &str,
        replace_history: bool,
    ) -> HttpResponse {
        let href = format!(
            "{callback_path}?provider={}&go=1",
            urlencoding::encode(provider)
        );
        let body = format!(
            r#"<a class="sign-in" href="{}">{}</a>"#,
            html_escape(&href),
            html_escape(title)
        );
        Self::page(StatusCode::OK, &body, dark_mode, replace_history)
    }

    /// Error view. `UnknownProvider` is inline and non-fatal; anything else
    /// offers a way back to the idle state.
    #[must_use]
    pub fn error_page(
        error: &LoginError,
        dark_mode: bool,
        callback_path: &str,
        replace_history: bool,
    ) -> HttpResponse {
        let mut body = format!(r#"<p class="error">{}</p>"#, html_escape(&error.to_string()));
        if error.is_fatal() {
            body.push_str(&format!(
                r#"<a class="retry" href="{}">Try again</a>"#,
                html_escape(callback_path)
            ));
        }
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::page(status, &body, dark_mode, replace_history)
    }

    fn page(status: StatusCode, body: &str, dark_mode: bool, replace_history: bool) -> HttpResponse {
        let class = if dark_mode { "dark" } else { "light" };
        let script = if replace_history {
            REPLACE_HISTORY_SCRIPT
        } else {
            ""
        };
        let html = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Sign in</title></head>\
             <body class=\"{class}\">{body}{script}</body></html>"
        );

        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .append_header(("Cache-Control", "no-store"))
            .body(html)
    }
}

/// Minimal HTML escaping for text and attribute values
#[must_use]
pub fn html_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
