//! Backend connectivity tracking
//!
//! A background task probes `GET /health` on a fixed interval and flips the
//! shared connection state. Probe failures are never reported to the user.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::ChatBackend;

/// Connection state as seen by the chat interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No probe has run yet
    Unknown,
    /// First probe in flight
    Checking,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }

    /// Short status line for the header
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Unknown => "Not checked",
            ConnectionState::Checking => "Connecting...",
            ConnectionState::Connected => "Connected to server",
            ConnectionState::Disconnected => "Working offline",
        }
    }
}

/// Shared, cloneable view of the connection state
#[derive(Clone)]
pub struct ConnectivityMonitor {
    state: Arc<watch::Sender<ConnectionState>>,
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityMonitor {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ConnectionState::Unknown);
        Self { state: Arc::new(tx) }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Watch for state changes
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// Force a state, e.g. from tests or a manual override
    pub fn set(&self, next: ConnectionState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            info!("Backend connectivity: {:?} -> {:?}", current, next);
            *current = next;
            true
        });
    }

    /// Run one health probe and update the state
    pub async fn probe(&self, backend: &dyn ChatBackend) -> ConnectionState {
        if self.state() == ConnectionState::Unknown {
            self.set(ConnectionState::Checking);
        }

        let next = match backend.health().await {
            Ok(()) => ConnectionState::Connected,
            Err(e) => {
                debug!("Health probe failed: {}", e);
                ConnectionState::Disconnected
            }
        };

        self.set(next);
        next
    }

    /// Start probing every `interval` until the returned handle is stopped
    pub fn start(&self, backend: Arc<dyn ChatBackend>, interval: Duration) -> ConnectivityHandle {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        let monitor = self.clone();

        let handle = tokio::spawn(async move {
            info!("Connectivity probe started (every {:?})", interval);
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        monitor.probe(backend.as_ref()).await;
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Connectivity probe received shutdown");
                        break;
                    }
                }
            }

            info!("Connectivity probe stopped");
        });

        ConnectivityHandle { shutdown_tx, handle }
    }
}

/// Handle to the background probe task
pub struct ConnectivityHandle {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl ConnectivityHandle {
    /// Stop the probe task and wait for it to finish
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}
