//! Login page state machine
//!
//! Each visit runs once: strip the visible query, then pick exactly one of
//! completion (`code`), auto-initiation (`provider` + `go`) or idle.

use crate::errors::LoginError;
use crate::lifetime::PageLifetime;
use crate::navigation::{Navigator, QueryParams};
use crate::oauth::{start_login, TokenClient, TokenRequest};
use crate::session::{SessionStore, StoredSession};
use crate::settings::LoginConfig;
use crate::utils::logging::LoggingHelper;
use std::sync::Arc;

/// Branch selected from the query of one visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    /// The identity provider sent back an authorization code
    Complete { code: String },
    /// Go straight to the identity provider without showing a button
    AutoInitiate { provider: String },
    /// Nothing to do yet; `provider` is the one named in the query, if any
    Idle { provider: Option<String> },
}

impl PageState {
    /// Evaluated in priority order: `code`, then `provider` with `go`, then idle.
    /// Empty values count as absent.
    #[must_use]
    pub fn from_query(params: &QueryParams) -> Self {
        if let Some(code) = params.get_present("code") {
            return PageState::Complete {
                code: code.to_string(),
            };
        }

        let provider = params.get_present("provider");
        match (provider, params.get_present("go")) {
            (Some(provider), Some(_)) => PageState::AutoInitiate {
                provider: provider.to_string(),
            },
            (provider, _) => PageState::Idle {
                provider: provider.map(ToString::to_string),
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PageState::Complete { .. } => "complete",
            PageState::AutoInitiate { .. } => "auto-initiate",
            PageState::Idle { .. } => "idle",
        }
    }
}

/// What the visitor ends up seeing
#[derive(Debug)]
pub enum PageView {
    /// The navigator was sent elsewhere
    Redirected,
    /// Sign-in button for `provider`
    SignIn {
        provider: String,
        title: String,
        dark_mode: bool,
    },
    /// Inline, non-fatal error; always `LoginError::UnknownProvider`
    Unavailable(LoginError),
}

/// The login page: authorization initiator, callback handler and session write
#[derive(Clone)]
pub struct LoginPage {
    config: LoginConfig,
    token_client: Arc<dyn TokenClient>,
    sessions: SessionStore,
}

impl LoginPage {
    #[must_use]
    pub fn new(config: LoginConfig, token_client: Arc<dyn TokenClient>, sessions: SessionStore) -> Self {
        Self {
            config,
            token_client,
            sessions,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run the page for one visit
    ///
    /// The query is stripped before branching so a refresh or back-navigation
    /// cannot replay a spent code.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion branch fails: token exchange,
    /// session persistence, or the page being left mid-exchange.
    pub async fn enter(
        &self,
        navigator: &mut dyn Navigator,
        lifetime: &PageLifetime,
    ) -> Result<PageView, LoginError> {
        let params = navigator.current_query_params();
        navigator.replace_query_params(&QueryParams::new());

        let state = PageState::from_query(&params);
        LoggingHelper::log_page_entry(state.name());

        match state {
            PageState::Complete { code } => {
                self.end_login(navigator, &code, lifetime).await?;
                Ok(PageView::Redirected)
            }
            PageState::AutoInitiate { provider } => {
                start_login(navigator, &self.config, &provider);
                Ok(PageView::Redirected)
            }
            PageState::Idle { provider } => Ok(self.idle_view(provider)),
        }
    }

    fn idle_view(&self, requested: Option<String>) -> PageView {
        match requested.or_else(|| self.config.identity_provider.clone()) {
            Some(provider) => PageView::SignIn {
                provider,
                title: self.config.title.clone(),
                dark_mode: self.config.dark_mode,
            },
            None => {
                LoggingHelper::log_unknown_provider();
                PageView::Unavailable(LoginError::UnknownProvider(
                    "no identity provider is configured for this application".to_string(),
                ))
            }
        }
    }

    /// Send the visitor to the identity provider
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` without navigating when `provider` is empty
    pub fn start_login(&self, navigator: &mut dyn Navigator, provider: &str) -> Result<(), LoginError> {
        if provider.trim().is_empty() {
            LoggingHelper::log_unknown_provider();
            return Err(LoginError::UnknownProvider(
                "identity provider name is empty".to_string(),
            ));
        }
        start_login(navigator, &self.config, provider);
        Ok(())
    }

    /// Exchange `code`, store the session, then send the visitor to the app root
    ///
    /// Nothing is stored unless the exchange succeeds, and nothing is stored
    /// if the page is left while the exchange is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token endpoint rejects the code or cannot be reached
    /// - The tokens lack the claims the session keys need
    /// - Storage rejects a write
    /// - The page is left before the exchange completes
    pub async fn end_login(
        &self,
        navigator: &mut dyn Navigator,
        code: &str,
        lifetime: &PageLifetime,
    ) -> Result<StoredSession, LoginError> {
        let request = TokenRequest::new(&self.config, code);

        let Some(exchanged) = lifetime.run(self.token_client.exchange_code(&request)).await else {
            LoggingHelper::log_exchange_cancelled();
            return Err(LoginError::Cancelled);
        };
        let bundle = exchanged?;

        let session = self.sessions.store_session(
            &bundle.id_token,
            &bundle.access_token,
            bundle.refresh_token.as_deref(),
        )?;

        navigator.redirect_to(&self.config.root_route);
        Ok(session)
    }
}
