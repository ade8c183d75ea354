//! Testing utilities for the login flow
//!
//! Available to unit tests and, behind the `testing` feature, to the
//! integration tests in `tests/`.
//!
//! - [`fixtures`] - Pre-built configuration, tokens and wired login pages
//! - [`mock`] - Scripted token client, recording navigator, failing storage
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hostlogin::testing::{fixtures::TestFixtures, mock::MockTokenClient};
//!
//! let client = MockTokenClient::success(TestFixtures::token_bundle("user-1"));
//! let (page, store) = TestFixtures::login_page(client);
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{FailingStore, MockTokenClient, RecordingNavigator};

/// Common test constants
pub mod constants {
    /// Issuer domain used by fixtures
    pub const TEST_DOMAIN: &str = "auth.example.com";

    /// App client id carried in fixture access tokens
    pub const TEST_CLIENT_ID: &str = "3n4b5urk1ft4fl3mg5e62d9ado";

    /// Callback URI registered for the fixture client
    pub const TEST_CALLBACK_URI: &str = "https://app.example.com/login";

    /// Identity provider configured by default
    pub const TEST_PROVIDER: &str = "okta";

    /// Sign-in button title
    pub const TEST_TITLE: &str = "Sign in with Okta";

    /// Default subject
    pub const TEST_SUBJECT: &str = "0f6a1d2e-7c55-4d6b-9a43-5e8c1b2f3a4d";
}
