#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, App, HttpServer};
use hostlogin::{
    configure_services, page_data, FileStore, HttpTokenClient, LoginConfig, LoginPage,
    LoginSettings, SessionStore,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = LoginSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let config = settings
        .login_config()
        .map_err(|e| std::io::Error::other(format!("Invalid identity settings: {e}")))?;

    let store = FileStore::open(&settings.storage.session_path)
        .map_err(|e| std::io::Error::other(format!("Failed to open session store: {e}")))?;

    let page = LoginPage::new(
        config,
        Arc::new(HttpTokenClient::new()),
        SessionStore::new(Arc::new(store)),
    );

    start_server(page, &settings).await
}

/// Start the server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(page: LoginPage, settings: &LoginSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    let callback_path = page.config().callback_path();
    print_startup_info(&bind_address, page.config(), settings);

    let page = page_data(page);

    HttpServer::new(move || {
        let callback_path = callback_path.clone();
        App::new()
            .app_data(page.clone())
            .wrap(Logger::default())
            .configure(move |cfg| configure_services(cfg, &callback_path))
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, config: &LoginConfig, settings: &LoginSettings) {
    println!(
        "Starting hostlogin {} on http://{bind_address}",
        hostlogin::VERSION
    );
    println!("Session store: {}", settings.storage.session_path);
    println!();
    println!("Login endpoints:");
    println!("  GET  {}  - Login page and OAuth callback", config.callback_path());
    println!("  GET  /auth/session - Stored session summary");
    println!();
    println!("Identity provider:");
    println!("  Authorize endpoint: {}", config.authorize_endpoint());
    println!("  Token endpoint:     {}", config.token_endpoint());
    println!(
        "  Default provider:   {}",
        config.identity_provider.as_deref().unwrap_or("(none)")
    );
    println!("  Callback URI:       {}", config.callback_uri);
    println!();
    println!("System endpoints:");
    println!("  GET  /ping         - Health check");
}
