//! Connection manager for the realtime channel.
//!
//! Owns at most one live stream per session. `connect` is idempotent for
//! identical credentials; different credentials tear down the old stream
//! before opening a new one. Shop sessions are gated on their moderation
//! flags: an unapproved or deactivated shop gets no realtime channel at all.
//!
//! The transport is opened outside the session lock. Each teardown advances
//! an epoch counter, and a connect that finds the epoch moved while it was
//! retrying discards its freshly opened stream instead of installing it, so
//! `disconnect` never waits out another caller's backoff sleeps.
//!
//! A spawned read loop decodes frames and dispatches them through the
//! subscription registry. When the stream breaks, the loop re-establishes it
//! under the backoff policy and then dispatches the synthetic
//! [`CHANNEL_RECONNECTED`](crate::domain::foundation::CHANNEL_RECONNECTED)
//! event; events missed while disconnected are never replayed. Teardown is
//! signalled to the loop so the stream gets a proper close instead of being
//! dropped mid-handshake.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

use crate::domain::foundation::{RealtimeEvent, SyncError};
use crate::domain::session::Credentials;
use crate::ports::{RealtimeStream, RealtimeTransport};

use super::messages::WireFrame;
use super::reconnect::BackoffPolicy;
use super::registry::SubscriptionRegistry;

/// Result of a `connect` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new stream was opened.
    Established,

    /// The same credentials already hold a live stream; nothing was done.
    AlreadyConnected,

    /// The principal is not allowed a realtime channel (gated shop).
    Skipped,

    /// A concurrent `disconnect` or `connect` intervened while the stream
    /// was being opened; the opened stream was closed and discarded.
    Superseded,
}

struct ActiveConnection {
    credentials: Credentials,
    task: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

impl ActiveConnection {
    /// Tells the read loop to close its stream and exit.
    fn stop(self) {
        let _ = self.shutdown.send(());
    }
}

#[derive(Default)]
struct ConnectionState {
    /// Bumped on every teardown and every accepted connect; a connect whose
    /// epoch is stale must not install its stream.
    epoch: u64,
    active: Option<ActiveConnection>,
}

/// Manages the single realtime connection of a session.
pub struct ConnectionManager {
    transport: Arc<dyn RealtimeTransport>,
    registry: SubscriptionRegistry,
    endpoint: Url,
    backoff: BackoffPolicy,
    state: tokio::sync::Mutex<ConnectionState>,
}

impl ConnectionManager {
    /// Creates a manager in the disconnected state.
    pub fn new(
        transport: Arc<dyn RealtimeTransport>,
        registry: SubscriptionRegistry,
        endpoint: Url,
        backoff: BackoffPolicy,
    ) -> Self {
        Self {
            transport,
            registry,
            endpoint,
            backoff,
            state: tokio::sync::Mutex::new(ConnectionState::default()),
        }
    }

    /// Establishes the realtime channel for the given credentials.
    ///
    /// Idempotent: identical credentials with a live stream return
    /// [`ConnectOutcome::AlreadyConnected`] without opening anything.
    /// Different credentials stop the existing stream first. If a
    /// `disconnect` or another `connect` lands while the transport is still
    /// retrying, the late stream is discarded and the call returns
    /// [`ConnectOutcome::Superseded`].
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ConnectExhausted` once the backoff budget is
    /// spent without an open stream.
    pub async fn connect(&self, credentials: Credentials) -> Result<ConnectOutcome, SyncError> {
        let epoch = {
            let mut state = self.state.lock().await;

            if let Some(current) = state.active.as_ref() {
                if current.credentials == credentials && !current.task.is_finished() {
                    tracing::debug!("connect called with identical credentials, keeping stream");
                    return Ok(ConnectOutcome::AlreadyConnected);
                }
            }
            if let Some(old) = state.active.take() {
                tracing::info!("credentials changed, closing previous stream");
                old.stop();
            }

            if !credentials.channel_allowed() {
                tracing::info!(role = %credentials.role, "realtime channel skipped for gated shop");
                return Ok(ConnectOutcome::Skipped);
            }

            state.epoch += 1;
            state.epoch
        };

        // The lock is released across the retries; teardown stays responsive
        // and announces itself through the epoch.
        let mut stream =
            open_with_retry(&*self.transport, &self.endpoint, &credentials, self.backoff).await?;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            drop(state);
            tracing::info!("connect superseded while opening, discarding stream");
            stream.close().await;
            return Ok(ConnectOutcome::Superseded);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(read_loop(
            Arc::clone(&self.transport),
            self.registry.clone(),
            self.endpoint.clone(),
            credentials.clone(),
            self.backoff,
            stream,
            shutdown_rx,
        ));

        state.active = Some(ActiveConnection {
            credentials,
            task,
            shutdown: shutdown_tx,
        });
        tracing::info!("realtime channel established");
        Ok(ConnectOutcome::Established)
    }

    /// Releases the stream and clears all registered listeners.
    ///
    /// Safe to call when not connected, and never blocked by a connect that
    /// is still retrying.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        state.epoch += 1;
        if let Some(conn) = state.active.take() {
            conn.stop();
            tracing::info!("realtime channel disconnected");
        }
        self.registry.clear();
    }

    /// Whether a stream task is currently alive.
    pub async fn is_connected(&self) -> bool {
        self.state
            .lock()
            .await
            .active
            .as_ref()
            .map_or(false, |c| !c.task.is_finished())
    }
}

/// Opens a stream, retrying under the backoff policy.
async fn open_with_retry(
    transport: &dyn RealtimeTransport,
    endpoint: &Url,
    credentials: &Credentials,
    backoff: BackoffPolicy,
) -> Result<Box<dyn RealtimeStream>, SyncError> {
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match transport.open(endpoint, credentials).await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                if attempt >= backoff.max_attempts() {
                    return Err(SyncError::ConnectExhausted {
                        attempts: attempt,
                        last_error: err.to_string(),
                    });
                }
                if let Some(delay) = backoff.delay_for(attempt - 1) {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "realtime open failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Drives one stream until it ends or teardown is signalled, reconnecting as
/// long as the backoff budget allows.
async fn read_loop(
    transport: Arc<dyn RealtimeTransport>,
    registry: SubscriptionRegistry,
    endpoint: Url,
    credentials: Credentials,
    backoff: BackoffPolicy,
    mut stream: Box<dyn RealtimeStream>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        // Biased so a pending shutdown wins over the next inbound frame.
        let frame = tokio::select! {
            biased;
            _ = &mut shutdown => {
                stream.close().await;
                tracing::debug!("read loop stopped");
                return;
            }
            frame = stream.next_frame() => frame,
        };

        match frame {
            Some(Ok(text)) => {
                match WireFrame::decode(&text) {
                    Ok(frame) => registry.dispatch(frame.into_event()).await,
                    Err(err) => {
                        // Undecodable frames are dropped, consistent with the
                        // channel's silent-loss delivery model.
                        tracing::warn!(error = %err, "dropping undecodable frame");
                    }
                }
                continue;
            }
            Some(Err(err)) => tracing::warn!(error = %err, "realtime stream error"),
            None => {}
        }

        tracing::info!("realtime stream ended, attempting to reconnect");
        let reopened = tokio::select! {
            biased;
            _ = &mut shutdown => {
                stream.close().await;
                return;
            }
            result = open_with_retry(&*transport, &endpoint, &credentials, backoff) => result,
        };
        match reopened {
            Ok(new_stream) => {
                stream = new_stream;
                // Bridges react by invalidating their root keys; anything
                // missed while disconnected reconciles on the next read.
                registry.dispatch(RealtimeEvent::reconnected()).await;
                tracing::info!("realtime stream re-established");
            }
            Err(err) => {
                tracing::error!(error = %err, "abandoning realtime channel");
                return;
            }
        }
    }
}
