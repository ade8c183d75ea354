//! Mock objects and fake implementations for testing
//!
//! This module provides mock implementations of the login page's
//! collaborators for isolated testing.

use crate::errors::LoginError;
use crate::navigation::{Navigator, QueryParams};
use crate::oauth::{TokenBundle, TokenClient, TokenRequest};
use crate::storage::{KeyValueStore, MemoryStore, StorageError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone)]
enum MockOutcome {
    Success(TokenBundle),
    Status(u16, String),
    Pending,
}

/// Token client answering every exchange with a scripted outcome
#[derive(Debug, Clone)]
pub struct MockTokenClient {
    outcome: MockOutcome,
    requests: Arc<Mutex<Vec<TokenRequest>>>,
}

impl MockTokenClient {
    /// Every exchange returns `bundle`
    #[must_use]
    pub fn success(bundle: TokenBundle) -> Self {
        Self::with_outcome(MockOutcome::Success(bundle))
    }

    /// Every exchange fails as if the endpoint answered `status`
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        Self::with_outcome(MockOutcome::Status(status, body.to_string()))
    }

    /// Every exchange hangs until dropped
    #[must_use]
    pub fn pending() -> Self {
        Self::with_outcome(MockOutcome::Pending)
    }

    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests seen so far, shared between clones
    #[must_use]
    pub fn requests(&self) -> Vec<TokenRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TokenClient for MockTokenClient {
    async fn exchange_code(&self, request: &TokenRequest) -> Result<TokenBundle, LoginError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match &self.outcome {
            MockOutcome::Success(bundle) => Ok(bundle.clone()),
            MockOutcome::Status(status, body) => crate::oauth::parse_token_response(*status, body),
            MockOutcome::Pending => std::future::pending().await,
        }
    }
}

/// Navigator that remembers every call
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    pub query: QueryParams,
    pub redirects: Vec<String>,
    pub replacements: Vec<QueryParams>,
}

impl RecordingNavigator {
    /// Navigator whose visible URL carries `query`
    #[must_use]
    pub fn at(query: &str) -> Self {
        Self {
            query: QueryParams::parse(query),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn last_redirect(&self) -> Option<&str> {
        self.redirects.last().map(String::as_str)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to(&mut self, url: &str) {
        self.redirects.push(url.to_string());
    }

    fn current_query_params(&self) -> QueryParams {
        self.query.clone()
    }

    fn replace_query_params(&mut self, params: &QueryParams) {
        self.replacements.push(params.clone());
        self.query = params.clone();
    }
}

/// Storage that starts rejecting writes after a number of successful ones,
/// or rejects every read
#[derive(Debug)]
pub struct FailingStore {
    inner: MemoryStore,
    writes_allowed: usize,
    writes: AtomicUsize,
    reads_fail: bool,
}

impl FailingStore {
    /// Accept `writes_allowed` writes (set or remove), then fail every write
    #[must_use]
    pub fn after(writes_allowed: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            writes_allowed,
            writes: AtomicUsize::new(0),
            reads_fail: false,
        }
    }

    /// Accept every write, fail every read
    #[must_use]
    pub fn unreadable() -> Self {
        Self {
            reads_fail: true,
            ..Self::after(usize::MAX)
        }
    }

    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        self.inner.entries()
    }

    fn check_write(&self, key: &str) -> Result<(), StorageError> {
        if self.writes.fetch_add(1, Ordering::SeqCst) >= self.writes_allowed {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.reads_fail {
            return Err(StorageError::Read {
                reason: "storage is disabled".to_string(),
            });
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_write(key)?;
        self.inner.remove(key)
    }
}
