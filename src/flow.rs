// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Observable request state shared by the login, course and upload flows.
//!
//! A flow moves Idle -> Pending -> Fulfilled | Rejected | Cancelled on every
//! invocation. Overlapping invocations are sequenced by a generation counter:
//! only the most recent invocation may write the visible state.

use crate::error::ClientError;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Where a flow is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
    Cancelled,
}

/// Snapshot of a flow's caller-visible state.
#[derive(Debug, Clone)]
pub struct FlowState<T> {
    pub status: FlowStatus,
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for FlowState<T> {
    fn default() -> Self {
        Self {
            status: FlowStatus::Idle,
            loading: false,
            error: None,
            data: None,
        }
    }
}

/// Abort handle for in-flight requests.
///
/// Clones share the same signal. Once aborted it stays aborted.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal that never fires.
    pub fn never() -> Self {
        Self::new()
    }

    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `abort` has been called.
    pub async fn aborted(&self) {
        let mut rx = self.tx.subscribe();
        let waited = rx.wait_for(|aborted| *aborted).await.map(|_| ());
        // The sender lives in `self`, so this only errors if it is dropped mid-wait
        if waited.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Loading/error/data holder wrapped around one kind of request.
pub struct Flow<T> {
    name: &'static str,
    generation: AtomicU64,
    state: Mutex<FlowState<T>>,
}

impl<T: Clone> Flow<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: AtomicU64::new(0),
            state: Mutex::new(FlowState::default()),
        }
    }

    pub fn snapshot(&self) -> FlowState<T> {
        self.lock().clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.lock().data.clone()
    }

    pub fn status(&self) -> FlowStatus {
        self.lock().status
    }

    /// Run one invocation and record its outcome.
    ///
    /// Never returns the error itself: on failure the message lands in the
    /// error slot and `None` is returned. A result from an invocation that has
    /// since been superseded is still returned to its own caller but does not
    /// touch the shared state.
    pub async fn run<F>(&self, request: F) -> Option<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock();
            state.status = FlowStatus::Pending;
            state.loading = true;
            state.error = None;
        }

        let outcome = request.await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                flow = self.name,
                generation,
                "Dropping result of superseded invocation"
            );
            return outcome.ok();
        }

        let mut state = self.lock();
        state.loading = false;
        match outcome {
            Ok(value) => {
                state.status = FlowStatus::Fulfilled;
                state.data = Some(value.clone());
                Some(value)
            }
            Err(err) => {
                state.status = if err.is_cancelled() {
                    FlowStatus::Cancelled
                } else {
                    FlowStatus::Rejected
                };
                tracing::warn!(flow = self.name, error = %err, "Request failed");
                state.error = Some(err.message());
                None
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FlowState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
