//! In-memory transport for tests and local development.
//!
//! Frames are injected with [`MockTransport::push_frame`];
//! [`MockTransport::drop_connection`] simulates the server closing the
//! stream, which drives the reconnect path.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::domain::session::Credentials;
use crate::ports::{RealtimeStream, RealtimeTransport, TransportError};

/// Scriptable transport whose streams are fed by the test.
#[derive(Debug, Default)]
pub struct MockTransport {
    opens: AtomicUsize,
    fail_budget: AtomicU32,
    senders: Mutex<Vec<mpsc::UnboundedSender<String>>>,
}

impl MockTransport {
    /// Creates a transport whose opens always succeed.
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::default())
    }

    /// Creates a transport that refuses the first `n` opens.
    pub fn failing_times(n: u32) -> std::sync::Arc<Self> {
        let transport = Self::default();
        transport.fail_budget.store(n, Ordering::SeqCst);
        std::sync::Arc::new(transport)
    }

    /// How many times `open` was called, including refused attempts.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Delivers a raw text frame to the most recently opened stream.
    ///
    /// Returns `false` when no live stream exists to receive it.
    pub fn push_frame(&self, text: impl Into<String>) -> bool {
        let senders = self
            .senders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match senders.last() {
            Some(sender) => sender.send(text.into()).is_ok(),
            None => false,
        }
    }

    /// Severs every open stream, as a server-side close would.
    pub fn drop_connection(&self) {
        self.senders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl RealtimeTransport for MockTransport {
    async fn open(
        &self,
        _endpoint: &Url,
        _credentials: &Credentials,
    ) -> Result<Box<dyn RealtimeStream>, TransportError> {
        self.opens.fetch_add(1, Ordering::SeqCst);

        let remaining = self.fail_budget.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_budget.store(remaining - 1, Ordering::SeqCst);
            return Err(TransportError::connect("mock transport refused open"));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(tx);
        Ok(Box::new(MockStream { rx }))
    }
}

struct MockStream {
    rx: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl RealtimeStream for MockStream {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        self.rx.recv().await.map(Ok)
    }

    async fn close(&mut self) {
        self.rx.close();
    }
}
