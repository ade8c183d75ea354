// HTTP request handlers for the login bootstrap
pub mod login;
pub mod session;

#[cfg(test)]
mod tests;

// Re-export the main handler functions
pub use login::login_page;
pub use session::{health, session_summary, SessionSummary};

use crate::flow::LoginPage;
use actix_web::web;

/// Mount the login page at its callback path plus the auxiliary endpoints
pub fn configure_services(cfg: &mut web::ServiceConfig, callback_path: &str) {
    cfg.route(callback_path, web::get().to(login_page))
        .route("/auth/session", web::get().to(session_summary))
        .route("/ping", web::get().to(health));
}

/// Shared page state for `App::app_data`
#[must_use]
pub fn page_data(page: LoginPage) -> web::Data<LoginPage> {
    web::Data::new(page)
}
