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


//! Playback scheduler
//!
//! Paces frame reads for one connection. After skipping the configured
//! start offset it reads one frame per 40 ms tick, drops every second frame
//! and hands the rest, decoded, to the print task. The hand-off only
//! completes when the print task is ready, so a slow client slows the
//! reads down instead of queueing frames.

use crate::handoff::HandoffSender;
use crate::{Result, ServerMetrics};
use blinken_mjpeg::FrameStream;
use blinken_render::decode_jpeg;
use image::DynamicImage;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Nominal frame rate of every source file.
pub const SOURCE_FRAMES_PER_SECOND: u32 = 25;

/// Interval between frame reads.
pub const TICK_PERIOD: Duration = Duration::from_millis(40);

/// Where a scheduler is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Discarding frames up to the start offset
    Skipping,
    /// Reading, decimating and handing off frames
    Streaming,
    /// Finished; terminal
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipping => write!(f, "skipping"),
            Self::Streaming => write!(f, "streaming"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Why playback stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The connection token fired
    Cancelled,
    /// The source has no more frames
    EndOfStream,
    /// The print task went away
    ConsumerClosed,
}

/// Per-connection frame producer.
pub struct PlaybackScheduler<R> {
    frames: FrameStream<R>,
    handoff: HandoffSender<DynamicImage>,
    token: CancellationToken,
    metrics: Arc<ServerMetrics>,
    start_seconds: u32,
    counter: u64,
    state: PlaybackState,
}

impl<R> PlaybackScheduler<R>
where
    R: Read + Send + 'static,
{
    /// Create a scheduler reading from `frames` and feeding `handoff`
    pub fn new(
        frames: FrameStream<R>,
        handoff: HandoffSender<DynamicImage>,
        token: CancellationToken,
        metrics: Arc<ServerMetrics>,
    ) -> Self {
        Self {
            frames,
            handoff,
            token,
            metrics,
            start_seconds: 0,
            counter: 0,
            state: PlaybackState::Skipping,
        }
    }

    /// Set the start offset in seconds of source video
    pub fn with_start_seconds(mut self, seconds: u32) -> Self {
        self.start_seconds = seconds;
        self
    }

    /// The current lifecycle state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Frames extracted since streaming started
    pub fn frame_counter(&self) -> u64 {
        self.counter
    }

    /// Runs playback to completion.
    ///
    /// A clean stop only drops the hand-off sender, so the print task
    /// finishes the frame it holds and then sees the channel close. An error
    /// cancels the connection token.
    pub async fn run(mut self) -> Result<StopReason> {
        let outcome = self.play().await;
        if outcome.is_err() {
            self.token.cancel();
        }
        self.state = PlaybackState::Stopped;
        debug!(
            frames = self.counter,
            outcome = ?outcome.as_ref().map_err(ToString::to_string),
            "Playback stopped"
        );
        outcome
    }

    async fn play(&mut self) -> Result<StopReason> {
        self.state = PlaybackState::Skipping;
        if self.start_seconds > 0 {
            debug!(seconds = self.start_seconds, "Skipping to start offset");
        }
        // One second of source frames per blocking call, so cancellation is
        // seen between seconds.
        for _ in 0..self.start_seconds {
            select! {
                biased;
                () = self.token.cancelled() => return Ok(StopReason::Cancelled),
                skipped = self.frames.skip(u64::from(SOURCE_FRAMES_PER_SECOND)) => match skipped {
                    Ok(()) => {}
                    Err(err) if err.is_end_of_stream() => return Ok(StopReason::EndOfStream),
                    Err(err) => return Err(err.into()),
                },
            }
        }

        self.state = PlaybackState::Streaming;
        let mut ticker = interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            select! {
                biased;
                () = self.token.cancelled() => return Ok(StopReason::Cancelled),
                _ = ticker.tick() => {}
            }

            let frame = select! {
                biased;
                () = self.token.cancelled() => return Ok(StopReason::Cancelled),
                frame = self.frames.next_frame() => match frame {
                    Ok(frame) => frame,
                    Err(err) if err.is_end_of_stream() => return Ok(StopReason::EndOfStream),
                    Err(err) => return Err(err.into()),
                },
            };

            self.counter += 1;
            self.metrics.frame_read();
            if self.counter % 2 == 0 {
                trace!(frame = self.counter, "Dropping frame");
                self.metrics.frame_decimated();
                continue;
            }

            let image = tokio::task::spawn_blocking(move || decode_jpeg(&frame)).await??;
            trace!(
                frame = self.counter,
                width = image.width(),
                height = image.height(),
                "Handing off frame"
            );

            select! {
                biased;
                () = self.token.cancelled() => return Ok(StopReason::Cancelled),
                sent = self.handoff.send(image) => {
                    if sent.is_err() {
                        return Ok(StopReason::ConsumerClosed);
                    }
                }
            }
        }
    }
}

impl<R> fmt::Debug for PlaybackScheduler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackScheduler")
            .field("state", &self.state)
            .field("counter", &self.counter)
            .field("start_seconds", &self.start_seconds)
            .finish_non_exhaustive()
    }
}
