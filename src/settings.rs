use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Scope requested when none is configured
pub const DEFAULT_SCOPE: &str = "openid profile email aws.cognito.signin.user.admin";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoginSettings {
    pub application: ApplicationSettings,
    pub identity: IdentitySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Where the browser lands once a session is stored
    pub root_route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    /// Issuer host, e.g. `auth.example.com`
    pub domain: String,

    // Direct value (can be overridden by the environment variable named below)
    pub client_id: Option<String>,
    pub client_id_env: Option<String>,

    /// Identity provider used when the page is opened without `provider`
    pub provider: Option<String>,
    /// Title shown on the sign-in button
    pub title: String,
    /// Absolute URI the identity provider sends the browser back to
    pub callback_uri: String,
    pub scope: String,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// JSON file holding the session entries
    pub session_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            root_route: "/".to_string(),
        }
    }
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            client_id: None,
            client_id_env: None,
            provider: None,
            title: "Sign in".to_string(),
            callback_uri: "http://localhost:8080/login".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            dark_mode: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            session_path: "session.json".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Everything the login components need, passed explicitly at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginConfig {
    pub domain: String,
    pub client_id: String,
    pub callback_uri: String,
    pub identity_provider: Option<String>,
    pub title: String,
    pub scope: String,
    pub dark_mode: bool,
    pub root_route: String,
}

impl LoginConfig {
    /// `https://{domain}/oauth2/authorize`
    #[must_use]
    pub fn authorize_endpoint(&self) -> String {
        format!("https://{}/oauth2/authorize", self.domain)
    }

    /// `https://{domain}/oauth2/token`
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("https://{}/oauth2/token", self.domain)
    }

    /// Path component of the callback URI, used to mount the login page
    #[must_use]
    pub fn callback_path(&self) -> String {
        url::Url::parse(&self.callback_uri)
            .map_or_else(|_| "/login".to_string(), |u| u.path().to_string())
    }
}

impl LoginSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - A settings file cannot be read or parsed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        env_logger::Builder::new()
            .parse_filters(&settings.logging.level)
            .try_init()?;

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `HOSTLOGIN_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    fn load_base_settings() -> anyhow::Result<Self> {
        let mut settings = Self::default();

        let default_config_path = PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(config_dir) = std::env::var("HOSTLOGIN_CONFIG_DIR") {
            let config_path = Path::new(&config_dir).join("Settings.toml");
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
                println!("✓ Overriding settings from {}", config_path.display());
            } else {
                println!(
                    "ℹ HOSTLOGIN_CONFIG_DIR set but no Settings.toml found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a TOML settings file; missing sections fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML for these settings
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(basic_toml::from_str(content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_identity_env_overrides(&mut settings.identity);
        if let Ok(path) = std::env::var("SESSION_STORE_PATH") {
            settings.storage.session_path = path;
        }
        if let Ok(level) = std::env::var("RUST_LOG") {
            settings.logging.level = level;
        }
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(root_route) = std::env::var("ROOT_ROUTE") {
            app_settings.root_route = root_route;
        }
    }

    fn apply_identity_env_overrides(identity: &mut IdentitySettings) {
        if let Ok(domain) = std::env::var("IDP_DOMAIN") {
            identity.domain = domain;
        }
        if let Ok(client_id) = std::env::var("IDP_CLIENT_ID") {
            identity.client_id = Some(client_id);
        }
        if let Ok(provider) = std::env::var("IDP_PROVIDER") {
            identity.provider = Some(provider).filter(|p| !p.is_empty());
        }
        if let Ok(title) = std::env::var("IDP_TITLE") {
            identity.title = title;
        }
        if let Ok(callback_uri) = std::env::var("IDP_CALLBACK_URI") {
            identity.callback_uri = callback_uri;
        }
        if let Ok(scope) = std::env::var("IDP_SCOPE") {
            identity.scope = scope;
        }
        if let Ok(dark_mode) = std::env::var("DARK_MODE") {
            if let Ok(dark_mode) = dark_mode.parse::<bool>() {
                identity.dark_mode = dark_mode;
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Build the explicit component configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the issuer domain or client id is missing
    pub fn login_config(&self) -> anyhow::Result<LoginConfig> {
        let domain = self.identity.domain.trim();
        if domain.is_empty() {
            anyhow::bail!("identity.domain is not configured (set IDP_DOMAIN)");
        }
        let client_id = self
            .identity
            .get_client_id()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow::anyhow!("identity.client_id is not configured (set IDP_CLIENT_ID)"))?;

        Ok(LoginConfig {
            domain: domain.to_string(),
            client_id,
            callback_uri: self.identity.callback_uri.clone(),
            identity_provider: self.identity.provider.clone().filter(|p| !p.is_empty()),
            title: self.identity.title.clone(),
            scope: self.identity.scope.clone(),
            dark_mode: self.identity.dark_mode,
            root_route: self.application.root_route.clone(),
        })
    }
}

impl IdentitySettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        if let Some(env_var) = &self.client_id_env {
            if let Ok(value) = std::env::var(env_var) {
                return Some(value);
            }
        }
        self.client_id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clean_env_vars() {
        for var in [
            "HOST",
            "PORT",
            "ROOT_ROUTE",
            "IDP_DOMAIN",
            "IDP_CLIENT_ID",
            "IDP_PROVIDER",
            "IDP_TITLE",
            "IDP_CALLBACK_URI",
            "IDP_SCOPE",
            "DARK_MODE",
            "SESSION_STORE_PATH",
            "TEST_HOSTLOGIN_CLIENT_ID",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let settings = LoginSettings::default();
        assert_eq!(settings.get_bind_address(), "127.0.0.1:8080");
        assert_eq!(settings.identity.scope, DEFAULT_SCOPE);
        assert_eq!(settings.application.root_route, "/");
        assert!(settings.identity.provider.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = LoginSettings::from_toml(
            r#"
            [identity]
            domain = "auth.example.com"
            client_id = "abc123"
            provider = "okta"
            dark_mode = true
            "#,
        )
        .unwrap();

        assert_eq!(settings.identity.domain, "auth.example.com");
        assert_eq!(settings.identity.provider.as_deref(), Some("okta"));
        assert!(settings.identity.dark_mode);
        assert_eq!(settings.identity.title, "Sign in");
        assert_eq!(settings.application.port, 8080);
    }

    #[test]
    fn test_login_config_requires_domain_and_client() {
        let mut settings = LoginSettings::default();
        assert!(settings.login_config().is_err());

        settings.identity.domain = "auth.example.com".to_string();
        assert!(settings.login_config().is_err());

        settings.identity.client_id = Some("abc123".to_string());
        let config = settings.login_config().unwrap();
        assert_eq!(config.client_id, "abc123");
        assert_eq!(
            config.authorize_endpoint(),
            "https://auth.example.com/oauth2/authorize"
        );
        assert_eq!(config.token_endpoint(), "https://auth.example.com/oauth2/token");
        assert_eq!(config.callback_path(), "/login");
    }

    #[test]
    #[serial]
    fn test_identity_env_overrides() {
        clean_env_vars();

        std::env::set_var("IDP_DOMAIN", "login.example.org");
        std::env::set_var("IDP_PROVIDER", "cognito-okta");
        std::env::set_var("DARK_MODE", "true");
        std::env::set_var("PORT", "9090");

        let mut settings = LoginSettings::default();
        LoginSettings::apply_env_overrides(&mut settings);

        assert_eq!(settings.identity.domain, "login.example.org");
        assert_eq!(settings.identity.provider.as_deref(), Some("cognito-okta"));
        assert!(settings.identity.dark_mode);
        assert_eq!(settings.application.port, 9090);

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_empty_provider_env_clears_provider() {
        clean_env_vars();

        let mut settings = LoginSettings::default();
        settings.identity.provider = Some("okta".to_string());
        std::env::set_var("IDP_PROVIDER", "");
        LoginSettings::apply_env_overrides(&mut settings);

        assert!(settings.identity.provider.is_none());

        clean_env_vars();
    }

    #[test]
    #[serial]
    fn test_client_id_env_takes_precedence() {
        clean_env_vars();

        let identity = IdentitySettings {
            client_id: Some("from-file".to_string()),
            client_id_env: Some("TEST_HOSTLOGIN_CLIENT_ID".to_string()),
            ..Default::default()
        };
        assert_eq!(identity.get_client_id().as_deref(), Some("from-file"));

        std::env::set_var("TEST_HOSTLOGIN_CLIENT_ID", "from-env");
        assert_eq!(identity.get_client_id().as_deref(), Some("from-env"));

        clean_env_vars();
    }

    #[test]
    fn test_callback_path_falls_back_for_invalid_uri() {
        let mut settings = LoginSettings::default();
        settings.identity.domain = "auth.example.com".to_string();
        settings.identity.client_id = Some("abc".to_string());
        settings.identity.callback_uri = "https://app.example.com/auth/callback".to_string();
        assert_eq!(settings.login_config().unwrap().callback_path(), "/auth/callback");

        settings.identity.callback_uri = "not a uri".to_string();
        assert_eq!(settings.login_config().unwrap().callback_path(), "/login");
    }
}
