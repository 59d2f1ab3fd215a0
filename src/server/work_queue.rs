//! Work queue — bounded background execution for agent invocations.
//!
//! A [`WorkQueue`] is a fixed-capacity `tokio::mpsc` channel fronting a pool
//! of [`BackgroundWorker`] loops. `submit` never blocks the caller past the
//! point the channel is full: it returns `false` immediately rather than
//! applying backpressure, so a request handler under load can fail fast
//! (`InternalError`, "server busy") instead of queueing unboundedly.
//!
//! Grounded in the same worker-pool idiom [`EventQueue`](super::event_queue::EventQueue)
//! uses for its broadcast channel — a bounded `tokio::sync` primitive wrapped
//! in a small struct with explicit lifecycle methods (`new`, `shutdown`).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::warn;

/// A unit of background work: a boxed, owned future producing no value.
///
/// Job bodies are expected to report their own outcome (e.g. via a
/// [`super::response_relay::ResponseRelay`] sender captured in the closure,
/// or by publishing to an [`super::event_queue::EventQueue`]); the queue
/// itself only guarantees that a submitted job eventually runs, or is
/// abandoned at shutdown.
pub type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Bounded queue of [`Job`]s awaiting execution by a [`BackgroundWorker`] pool.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::Sender<Job>,
}

impl WorkQueue {
    /// Create a queue with the given bounded capacity. Pair with
    /// [`BackgroundWorker::spawn_pool`] to start workers draining it.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Enqueue a job.
    ///
    /// Returns `false` without running the job if the queue is at capacity
    /// or every worker has shut down (the receiver was dropped).
    pub fn submit(&self, job: Job) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Work queue full — rejecting submission");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Work queue closed — rejecting submission");
                false
            }
        }
    }
}

/// A fixed pool of tokio tasks draining a shared [`WorkQueue`] receiver.
pub struct BackgroundWorker {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundWorker {
    /// Spawn `worker_count` loops, each pulling jobs from `rx` and running
    /// them to completion before pulling the next. Workers share one
    /// `Mutex`-guarded receiver, so jobs are distributed across whichever
    /// worker is free rather than statically partitioned.
    pub fn spawn_pool(rx: mpsc::Receiver<Job>, worker_count: usize) -> Self {
        let rx = Arc::new(Mutex::new(rx));
        let handles = (0..worker_count.max(1))
            .map(|id| {
                let rx = Arc::clone(&rx);
                tokio::spawn(async move {
                    loop {
                        let job = {
                            let mut rx = rx.lock().await;
                            rx.recv().await
                        };
                        match job {
                            Some(job) => job.await,
                            None => {
                                tracing::debug!(worker_id = id, "Work queue closed, worker exiting");
                                break;
                            }
                        }
                    }
                })
            })
            .collect();

        Self { handles }
    }

    /// Wait up to `timeout` for all workers to drain and exit after their
    /// sender has been dropped/closed. Stragglers are abandoned (not
    /// aborted) and logged — they finish their in-flight job but the caller
    /// does not wait on them further.
    pub async fn shutdown(self, timeout: Duration) {
        let join_all = futures::future::join_all(self.handles);
        if tokio::time::timeout(timeout, join_all).await.is_err() {
            warn!(
                timeout_secs = timeout.as_secs(),
                "Work queue shutdown timed out — abandoning stragglers"
            );
        }
    }
}
