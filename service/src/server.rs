//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Streaming server
//!
//! The StreamServer owns the listener and the shared source file. Its accept
//! loop hands every socket to its own [`StreamConnection`] task, isolated so
//! that an error or panic in one session never reaches the loop or any other
//! session.

use crate::{
    ConnectionId, Result, ServerConfig, ServerMetrics, StreamConnection, StreamError,
};
use blinken_mjpeg::{ReadAt, SharedSource};
use futures::FutureExt;
use std::any::Any;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Pause after a failed accept before listening again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// How long shutdown waits for the accept loop and the sessions.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Streams one MJPEG file to every telnet client that connects.
///
/// # Example
///
/// ```no_run
/// use blinken_service::{ServerConfig, StreamServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ServerConfig::default().with_input_path("video.mjpeg");
///     let server = StreamServer::new(config).await?;
///     server.start().await?;
///
///     tokio::signal::ctrl_c().await?;
///     server.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct StreamServer {
    /// Server configuration
    config: Arc<ServerConfig>,
    /// The file every connection plays
    source: SharedSource,
    /// Server metrics
    metrics: Arc<ServerMetrics>,
    /// Listener, moved into the accept loop on start
    listener: Mutex<Option<TcpListener>>,
    /// Actual bind address
    bind_address: SocketAddr,
    /// Server start time
    started_at: Instant,
    /// Running flag
    running: AtomicBool,
    /// Parent of every connection token
    shutdown: CancellationToken,
    /// Running sessions
    sessions: TaskTracker,
    /// Accept loop task handle
    accept_handle: Mutex<Option<JoinHandle<()>>>,
}

impl StreamServer {
    /// Create a new server with the given configuration
    ///
    /// This validates the configuration, opens the input file and binds the
    /// listener, but does not accept connections until `start()`.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let source = SharedSource::open(&config.input_path)?;
        let listener = TcpListener::bind(config.bind_address).await?;
        let bind_address = listener.local_addr()?;

        info!(
            bind_address = %bind_address,
            input = %config.input_path.display(),
            start_seconds = config.start_seconds,
            frames_per_second = config.frames_per_second,
            "Stream server bound"
        );

        Ok(Self {
            config: Arc::new(config),
            source,
            metrics: Arc::new(ServerMetrics::new()),
            listener: Mutex::new(Some(listener)),
            bind_address,
            started_at: Instant::now(),
            running: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
            sessions: TaskTracker::new(),
            accept_handle: Mutex::new(None),
        })
    }

    /// Start accepting connections
    ///
    /// The accept loop runs on its own task until `shutdown()` is called.
    pub async fn start(&self) -> Result<()> {
        let Some(listener) = self.listener.lock().await.take() else {
            return Err(StreamError::Other("Server already started".to_string()));
        };
        self.running.store(true, Ordering::SeqCst);

        info!(bind_address = %self.bind_address, "Starting stream server");
        let accept_loop = AcceptLoop {
            listener,
            config: self.config.clone(),
            source: self.source.clone(),
            metrics: self.metrics.clone(),
            shutdown: self.shutdown.clone(),
            sessions: self.sessions.clone(),
            next_id: AtomicU64::new(1),
        };
        *self.accept_handle.lock().await = Some(tokio::spawn(accept_loop.run()));

        Ok(())
    }

    /// Shutdown the server
    ///
    /// Stops accepting, cancels every session and waits a bounded time for
    /// them to restore their clients' terminals and close.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(StreamError::ServerNotRunning);
        }

        info!("Shutting down stream server");
        self.shutdown.cancel();

        if let Some(handle) = self.accept_handle.lock().await.take() {
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await.is_err() {
                warn!("Accept loop did not stop in time");
            }
        }

        self.sessions.close();
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, self.sessions.wait())
            .await
            .is_err()
        {
            warn!(
                remaining = self.sessions.len(),
                "Sessions still running after shutdown timeout"
            );
        }

        info!("Stream server shutdown complete");
        Ok(())
    }

    /// Check if the server is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the server's bind address
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Get the number of sessions currently streaming
    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }

    /// Time since the server was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Get the server metrics
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for StreamServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamServer")
            .field("bind_address", &self.bind_address())
            .field("running", &self.is_running())
            .field("connection_count", &self.connection_count())
            .field("uptime", &self.uptime())
            .finish()
    }
}

impl Drop for StreamServer {
    fn drop(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            warn!("StreamServer dropped while still running");
        }
        self.shutdown.cancel();
    }
}

/// State moved onto the accept loop task.
struct AcceptLoop {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    source: SharedSource,
    metrics: Arc<ServerMetrics>,
    shutdown: CancellationToken,
    sessions: TaskTracker,
    next_id: AtomicU64,
}

impl AcceptLoop {
    async fn run(self) {
        loop {
            let accepted = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((socket, peer_addr)) => {
                    let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                    info!(connection_id = %id, peer_addr = %peer_addr, "Accepted connection");
                    let connection = StreamConnection::new(
                        id,
                        socket,
                        self.config.clone(),
                        self.source.clone(),
                        self.metrics.clone(),
                        self.shutdown.child_token(),
                    );
                    self.sessions
                        .spawn(supervise(connection, self.metrics.clone()));
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    self.metrics.accept_error();
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }

        info!("Accept loop terminated");
    }
}

/// Runs one session, containing any error or panic to that session.
pub async fn supervise<S, F>(connection: StreamConnection<S, F>, metrics: Arc<ServerMetrics>)
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    F: ReadAt + ?Sized + 'static,
{
    let id = connection.id();
    let started = Instant::now();
    metrics.connection_opened();

    match AssertUnwindSafe(connection.run()).catch_unwind().await {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => debug!(connection_id = %id, error = %err, "Session ended with error"),
        Err(panic) => {
            metrics.panic();
            error!(
                connection_id = %id,
                panic = panic_message(panic.as_ref()),
                "Session panicked"
            );
        }
    }

    metrics.connection_closed(started.elapsed());
    info!(connection_id = %id, "Connection closed");
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}
