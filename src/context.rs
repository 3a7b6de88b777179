//! Cancellation and deadlines for a single dispatch.
//!
//! Every network-facing call on [`crate::Client`] takes a [`Context`]. The
//! context is checked before any work starts (an already-expired deadline
//! never touches the network or the destination path) and raced against the
//! whole operation: document reads, the POST, and the response-body stream.
//! When the context wins, the in-flight future is dropped, which aborts the
//! connection and removes any temporary output file.
//!
//! ```rust
//! use gotenberg_client::Context;
//! use std::time::Duration;
//!
//! let ctx = Context::with_timeout(Duration::from_secs(30));
//! let (cancellable, handle) = Context::cancellable();
//! handle.cancel();
//! assert!(cancellable.is_cancelled());
//! # let _ = ctx;
//! ```

use crate::error::GotenbergError;
use std::future::{pending, Future};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Deadline and cancellation signal for one or more dispatches.
///
/// Cloning is cheap; clones share the same cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every [`Context`] created alongside it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// No deadline, never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::with_deadline(deadline),
            None => Self::background(),
        }
    }

    /// Expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    /// A context that is cancelled when the returned handle says so.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (
            Self {
                deadline: None,
                cancel: Some(rx),
            },
            CancelHandle { tx },
        )
    }

    /// Add (or tighten) a deadline on an existing context.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let Some(candidate) = Instant::now().checked_add(timeout) else {
            return self;
        };
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// `Err` when the context is already cancelled or past its deadline.
    pub fn check(&self) -> Result<(), GotenbergError> {
        if self.is_cancelled() {
            return Err(GotenbergError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(GotenbergError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Run `fut` to completion unless the context finishes first.
    ///
    /// On cancellation `fut` is dropped in place, releasing whatever it held.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, GotenbergError> {
        self.check()?;

        let cancelled = wait_cancelled(self.cancel.clone());
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(GotenbergError::Cancelled),
            _ = expired => Err(GotenbergError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

/// Resolves once cancellation is signalled; never resolves otherwise,
/// including when the handle is dropped without cancelling.
async fn wait_cancelled(rx: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = rx else {
        return pending().await;
    };
    let signalled = rx.wait_for(|cancelled| *cancelled).await.map(|_| ());
    if signalled.is_err() {
        pending::<()>().await;
    }
}
