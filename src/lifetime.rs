//! Page lifetime tracking
//!
//! A `PageLifetime` is handed to the login page for one visit; the matching
//! `PageExit` is triggered when the visitor navigates away. Work raced against
//! the lifetime is dropped at that point, which aborts an in-flight token
//! request.

use std::future::Future;
use tokio::sync::watch;

/// Receiving side, held by the page
#[derive(Debug, Clone)]
pub struct PageLifetime {
    left: watch::Receiver<bool>,
}

/// Triggering side, held by whoever observes navigation
#[derive(Debug)]
pub struct PageExit {
    left: watch::Sender<bool>,
}

impl PageLifetime {
    #[must_use]
    pub fn new() -> (Self, PageExit) {
        let (tx, rx) = watch::channel(false);
        (Self { left: rx }, PageExit { left: tx })
    }

    #[must_use]
    pub fn has_left(&self) -> bool {
        *self.left.borrow()
    }

    /// Resolves once the page is left. Dropping the `PageExit` without calling
    /// `leave` keeps the page alive forever.
    pub async fn left(&self) {
        let mut left = self.left.clone();
        let outcome = left.wait_for(|left| *left).await.map(|_| ());
        if outcome.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Run `work` unless the page is left first
    pub async fn run<F: Future>(&self, work: F) -> Option<F::Output> {
        tokio::select! {
            output = work => Some(output),
            () = self.left() => None,
        }
    }
}

impl PageExit {
    /// Mark the page as left
    pub fn leave(&self) {
        self.left.send_replace(true);
    }
}
