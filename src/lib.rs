#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the hostlogin application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod errors;
pub mod flow;
pub mod handlers;
pub mod lifetime;
pub mod navigation;
pub mod oauth;
pub mod session;
pub mod settings;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use errors::LoginError;
pub use flow::{LoginPage, PageState, PageView};
pub use handlers::{configure_services, health, login_page, page_data, session_summary};
pub use lifetime::{PageExit, PageLifetime};
pub use navigation::{Navigator, QueryParams, RequestNavigator};
pub use oauth::{decode_claims, start_login, HttpTokenClient, TokenBundle, TokenClient};
pub use session::{SessionError, SessionStore, StoredSession};
pub use settings::{LoginConfig, LoginSettings};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
