//! Login flow error types
//!
//! Every failure the login page can surface. Decode failures never appear here:
//! they are logged and turned into missing claims by the decoder.

use crate::session::SessionError;
use crate::storage::StorageError;
use std::fmt;

#[derive(Debug)]
pub enum LoginError {
    /// No usable identity provider; shown inline, the page stays usable
    UnknownProvider(String),
    /// The token endpoint answered with a non-success status. The code is spent.
    TokenExchange { status: u16, body: String },
    /// The token endpoint could not be reached
    Network(String),
    /// The token endpoint answered 2xx with a body we cannot use
    InvalidResponse(String),
    /// Session persistence failed
    Session(SessionError),
    /// The page was left while the exchange was in flight
    Cancelled,
}

impl LoginError {
    /// Whether the page can still offer a sign-in button after this error
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LoginError::UnknownProvider(_))
    }

    /// HTTP status used when the error is rendered as a page
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            LoginError::UnknownProvider(_) => 200,
            LoginError::TokenExchange { .. }
            | LoginError::Network(_)
            | LoginError::InvalidResponse(_) => 502,
            LoginError::Session(_) => 500,
            LoginError::Cancelled => 499,
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::UnknownProvider(msg) => write!(f, "Unknown identity provider: {msg}"),
            LoginError::TokenExchange { status, .. } => {
                write!(f, "Token exchange failed with status {status}")
            }
            LoginError::Network(msg) => write!(f, "Token endpoint unreachable: {msg}"),
            LoginError::InvalidResponse(msg) => write!(f, "Invalid token response: {msg}"),
            LoginError::Session(err) => write!(f, "Session error: {err}"),
            LoginError::Cancelled => write!(f, "Login cancelled before completion"),
        }
    }
}

impl std::error::Error for LoginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoginError::Session(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SessionError> for LoginError {
    fn from(err: SessionError) -> Self {
        LoginError::Session(err)
    }
}

impl From<StorageError> for LoginError {
    fn from(err: StorageError) -> Self {
        LoginError::Session(SessionError::Storage(err))
    }
}
