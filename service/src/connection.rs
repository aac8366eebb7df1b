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


//! One client's streaming session
//!
//! A session negotiates the terminal, then runs three cooperating parts
//! under one cancellation token: the Ctrl-C watcher on the read half, the
//! playback scheduler producing frames, and the print task writing them to
//! the escaped write half. Ctrl-C, a disconnect or an error cancels the
//! token and the others follow. At end of stream the scheduler only closes
//! the hand-off, so the last frame is written in full before the terminal
//! is restored.

use crate::handoff::handoff;
use crate::print::PrintTask;
use crate::scheduler::{PlaybackScheduler, StopReason};
use crate::watcher::{WatchOutcome, watch};
use crate::{Result, ServerConfig, ServerMetrics, StreamError};
use blinken_mjpeg::{FrameStream, ReadAt, SharedSource};
use blinken_render::RenderPipeline;
use blinken_render::ansi::{RESTORE_TERMINAL, SETUP_TERMINAL};
use blinken_telnetcodec::{IacWriter, WindowSize, negotiate};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a connection (monotonically increasing, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Create a new connection ID
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the underlying u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// What happened during a completed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// The negotiated terminal size
    pub window_size: WindowSize,
    /// Why playback stopped
    pub stop_reason: StopReason,
    /// How the input watcher finished
    pub watch_outcome: WatchOutcome,
    /// Frames written to the client
    pub frames_printed: u64,
}

/// A single client connection and everything needed to stream to it.
pub struct StreamConnection<S, F: ?Sized = std::fs::File> {
    id: ConnectionId,
    stream: S,
    config: Arc<ServerConfig>,
    source: SharedSource<F>,
    metrics: Arc<ServerMetrics>,
    token: CancellationToken,
}

impl<S, F> StreamConnection<S, F>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    F: ReadAt + ?Sized + 'static,
{
    /// Wrap an accepted stream.
    ///
    /// `token` should be a child of the server's shutdown token; the
    /// session cancels it when it ends.
    pub fn new(
        id: ConnectionId,
        stream: S,
        config: Arc<ServerConfig>,
        source: SharedSource<F>,
        metrics: Arc<ServerMetrics>,
        token: CancellationToken,
    ) -> Self {
        Self {
            id,
            stream,
            config,
            source,
            metrics,
            token,
        }
    }

    /// Get the connection ID
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The token that stops this session
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Runs the session until playback stops, then closes the stream.
    #[instrument(skip(self), fields(connection_id = %self.id))]
    pub async fn run(self) -> Result<SessionSummary> {
        let Self {
            mut stream,
            config,
            source,
            metrics,
            token,
            ..
        } = self;
        let _cancel_on_exit = token.clone().drop_guard();

        let negotiated = match config.negotiation_timeout {
            Some(limit) => tokio::time::timeout(limit, negotiate(&mut stream))
                .await
                .map_err(|_| StreamError::Timeout)
                .and_then(|result| result.map_err(StreamError::from)),
            None => negotiate(&mut stream).await.map_err(StreamError::from),
        };
        let window_size = match negotiated {
            Ok(size) => size,
            Err(err) => {
                metrics.negotiation_failure();
                warn!(error = %err, "Negotiation failed, closing connection");
                return Err(err);
            }
        };

        let (reader, writer) = tokio::io::split(stream);
        let watcher = tokio::spawn(watch(reader, token.clone()));

        let mut writer = IacWriter::new(writer);
        writer.write_all(SETUP_TERMINAL).await?;
        writer.flush().await?;

        let (frames_tx, frames_rx) = handoff();
        let scheduler = PlaybackScheduler::new(
            FrameStream::from_reader(source.reader()),
            frames_tx,
            token.clone(),
            metrics.clone(),
        )
        .with_start_seconds(config.start_seconds);
        let printer = PrintTask::new(
            writer,
            RenderPipeline::new(config.filter, window_size.cols, window_size.rows),
            frames_rx,
            token.clone(),
            metrics.clone(),
        );

        info!(%window_size, start_seconds = config.start_seconds, "Starting playback");
        let (stopped, (mut writer, printed)) = tokio::join!(scheduler.run(), printer.run());
        token.cancel();

        let restored = async {
            writer.write_all(RESTORE_TERMINAL).await?;
            writer.flush().await?;
            writer.shutdown().await
        }
        .await;
        if let Err(err) = restored {
            debug!(error = %err, "Could not restore client terminal");
        }
        drop(writer);

        let watch_outcome = watcher.await.unwrap_or(WatchOutcome::Cancelled);

        let outcome = stopped.and_then(|stop_reason| {
            printed.map(|frames_printed| SessionSummary {
                window_size,
                stop_reason,
                watch_outcome,
                frames_printed,
            })
        });
        match &outcome {
            Ok(summary) => info!(
                stop_reason = ?summary.stop_reason,
                watch_outcome = ?summary.watch_outcome,
                frames_printed = summary.frames_printed,
                "Playback finished"
            ),
            Err(err) => {
                metrics.playback_error();
                warn!(error = %err, "Playback failed");
            }
        }
        outcome
    }
}

impl<S, F: ?Sized> fmt::Debug for StreamConnection<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamConnection")
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}
