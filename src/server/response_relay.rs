//! Response relay — single-producer/single-consumer delivery for one request.
//!
//! [`EventQueue`](super::event_queue::EventQueue) is a broadcast channel: it
//! exists so that several independent readers (an SSE subscriber, a
//! `tasks/resubscribe` caller, the store-persisting background task) can all
//! observe the same stream of events. A [`ResponseRelay`] is the opposite
//! shape — exactly one reader waiting on exactly one request's result — and
//! is used by [`super::work_queue::WorkQueue`] to hand a background worker's
//! outcome back to whichever request thread is awaiting it.

use tokio::sync::mpsc;
use tracing::warn;

use crate::error::{A2AError, A2AResult};
use crate::types::SendMessageResponse;

/// The producing half of a [`ResponseRelay`] pair, held by a background
/// worker for the duration of one request.
#[derive(Debug)]
pub struct RelaySender {
    tx: mpsc::UnboundedSender<A2AResult<SendMessageResponse>>,
}

impl RelaySender {
    /// Deliver the final result for this request.
    ///
    /// Silently dropped if the awaiting receiver has already gone away
    /// (the caller disconnected or timed out).
    pub fn send(self, result: A2AResult<SendMessageResponse>) {
        if self.tx.send(result).is_err() {
            warn!("Response relay receiver dropped before result delivery");
        }
    }
}

/// The consuming half of a [`ResponseRelay`] pair, held by the request
/// handler awaiting a background worker's outcome.
#[derive(Debug)]
pub struct RelayReceiver {
    rx: mpsc::UnboundedReceiver<A2AResult<SendMessageResponse>>,
}

impl RelayReceiver {
    /// Wait for the single result this relay carries.
    ///
    /// Resolves to `InternalError` if the sending side was dropped without
    /// delivering a result (e.g. the worker panicked or was aborted).
    pub async fn recv(mut self) -> A2AResult<SendMessageResponse> {
        self.rx.recv().await.unwrap_or_else(|| {
            Err(A2AError::InternalError {
                message: "Response relay closed without a result".to_string(),
                data: None,
            })
        })
    }
}

/// Creates a fresh single-producer/single-consumer relay pair for one
/// request's response.
pub struct ResponseRelay;

impl ResponseRelay {
    /// Create a new relay pair. The sender is given to the worker that will
    /// produce the result; the receiver is given to whoever is waiting on it.
    pub fn pair() -> (RelaySender, RelayReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RelaySender { tx }, RelayReceiver { rx })
    }
}
