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


//! Lock-free metrics for the streaming server
//!
//! Every event is counted twice: in the atomics below, which back
//! [`ServerMetrics::snapshot`], and through the `metrics` facade under the
//! `blinken.*` prefix for whichever recorder the binary installs.

use metrics::{counter, gauge, histogram};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock-free server metrics
///
/// All metrics are stored as atomics and can be accessed concurrently
/// without locks. Use the `snapshot()` method to get a view of all metrics
/// at a point in time.
#[derive(Debug)]
pub struct ServerMetrics {
    // Connection counts
    total_connections: AtomicU64,
    active_connections: AtomicU64,

    // Playback
    frames_read: AtomicU64,
    frames_decimated: AtomicU64,
    frames_printed: AtomicU64,
    bytes_sent: AtomicU64,

    // Errors
    accept_errors: AtomicU64,
    negotiation_failures: AtomicU64,
    playback_errors: AtomicU64,
    panics: AtomicU64,

    // Timing (stored as nanoseconds)
    total_connection_duration_ns: AtomicU64,

    // Server start time
    started_at: Instant,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_connections: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            frames_read: AtomicU64::new(0),
            frames_decimated: AtomicU64::new(0),
            frames_printed: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            accept_errors: AtomicU64::new(0),
            negotiation_failures: AtomicU64::new(0),
            playback_errors: AtomicU64::new(0),
            panics: AtomicU64::new(0),
            total_connection_duration_ns: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    // Connection tracking

    /// Record a new connection being opened
    pub fn connection_opened(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.connections.total").increment(1);
        gauge!("blinken.connections.active").increment(1.0);
    }

    /// Record a connection being closed
    pub fn connection_closed(&self, duration: Duration) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_connection_duration_ns
            .fetch_add(nanos, Ordering::Relaxed);
        gauge!("blinken.connections.active").decrement(1.0);
        histogram!("blinken.connection.duration").record(duration.as_secs_f64());
    }

    /// Get the current number of active connections
    pub fn active_connections(&self) -> u64 {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Get the total number of connections since server start
    pub fn total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    // Playback tracking

    /// Record a frame pulled from the source during playback
    pub fn frame_read(&self) {
        self.frames_read.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.frames.read").increment(1);
    }

    /// Record a frame dropped by decimation
    pub fn frame_decimated(&self) {
        self.frames_decimated.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.frames.decimated").increment(1);
    }

    /// Record a frame written to a client
    pub fn frame_printed(&self, bytes: u64) {
        self.frames_printed.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
        counter!("blinken.frames.printed").increment(1);
        counter!("blinken.bytes.sent").increment(bytes);
    }

    /// Get the number of frames written to clients
    pub fn frames_printed(&self) -> u64 {
        self.frames_printed.load(Ordering::Relaxed)
    }

    // Error tracking

    /// Record a failed accept
    pub fn accept_error(&self) {
        self.accept_errors.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.errors.accept").increment(1);
    }

    /// Record a connection that failed the telnet handshake
    pub fn negotiation_failure(&self) {
        self.negotiation_failures.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.errors.negotiation").increment(1);
    }

    /// Record playback that ended with an error
    pub fn playback_error(&self) {
        self.playback_errors.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.errors.playback").increment(1);
    }

    /// Record a connection task that panicked
    pub fn panic(&self) {
        self.panics.fetch_add(1, Ordering::Relaxed);
        counter!("blinken.errors.panic").increment(1);
    }

    // Snapshot

    /// Get a snapshot of all metrics
    ///
    /// Counters are loaded one by one, so a snapshot taken while connections
    /// are streaming may be slightly skewed between fields.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            frames_read: self.frames_read.load(Ordering::Relaxed),
            frames_decimated: self.frames_decimated.load(Ordering::Relaxed),
            frames_printed: self.frames_printed.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            accept_errors: self.accept_errors.load(Ordering::Relaxed),
            negotiation_failures: self.negotiation_failures.load(Ordering::Relaxed),
            playback_errors: self.playback_errors.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
            avg_connection_duration: self.average_connection_duration(),
        }
    }

    fn average_connection_duration(&self) -> Duration {
        let closed = self
            .total_connections
            .load(Ordering::Relaxed)
            .saturating_sub(self.active_connections.load(Ordering::Relaxed));
        if closed == 0 {
            return Duration::ZERO;
        }
        let total_ns = self.total_connection_duration_ns.load(Ordering::Relaxed);
        Duration::from_nanos(total_ns / closed)
    }
}

/// A snapshot of server metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Total connections since server start
    pub total_connections: u64,
    /// Current active connections
    pub active_connections: u64,
    /// Frames pulled from the source during playback
    pub frames_read: u64,
    /// Frames dropped by decimation
    pub frames_decimated: u64,
    /// Frames written to clients
    pub frames_printed: u64,
    /// Total bytes of rendered output
    pub bytes_sent: u64,
    /// Failed accepts
    pub accept_errors: u64,
    /// Failed telnet handshakes
    pub negotiation_failures: u64,
    /// Playback sessions that ended with an error
    pub playback_errors: u64,
    /// Connection tasks that panicked
    pub panics: u64,
    /// Server uptime
    pub uptime: Duration,
    /// Average duration of closed connections
    pub avg_connection_duration: Duration,
}

impl MetricsSnapshot {
    /// Calculate frames per second written across all clients
    #[allow(clippy::cast_precision_loss)]
    pub fn frames_printed_per_sec(&self) -> f64 {
        if self.uptime.is_zero() {
            return 0.0;
        }
        self.frames_printed as f64 / self.uptime.as_secs_f64()
    }

    /// Calculate total error count
    pub fn total_errors(&self) -> u64 {
        self.accept_errors + self.negotiation_failures + self.playback_errors + self.panics
    }
}
