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


//! # Blinken Streaming Service
//!
//! Streams one MJPEG file to any number of telnet clients, each seeing the
//! video as braille art sized to its own terminal.
//!
//! # Architecture
//!
//! ```text
//! StreamServer (accept loop)
//!     ↓  one task per client, panics contained
//! StreamConnection
//!     ├─ negotiate (character mode + window size)
//!     ├─ watch           Ctrl-C / disconnect → cancel
//!     ├─ PlaybackScheduler   skip, 25 Hz ticks, 2:1 decimation, decode
//!     │      ↓  single-slot hand-off
//!     └─ PrintTask       filter, braille, IAC-escaped write
//! ```
//!
//! Every session reads the shared file through its own positioned reader,
//! so sessions never contend on a file cursor. All parts of a session share
//! one cancellation token, a child of the server's shutdown token.
//!
//! # Example
//!
//! ```no_run
//! use blinken_service::{ServerConfig, StreamServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default()
//!         .with_input_path("video.mjpeg")
//!         .with_start_seconds(0);
//!     let server = StreamServer::new(config).await?;
//!     server.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown().await?;
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod config;
mod connection;
mod error;
mod handoff;
mod metrics;
mod print;
mod scheduler;
mod server;
mod watcher;

pub use self::config::{DEFAULT_PORT, ServerConfig};
pub use self::connection::{ConnectionId, SessionSummary, StreamConnection};
pub use self::error::{Result, StreamError};
pub use self::handoff::{HandoffClosed, HandoffReceiver, HandoffSender, handoff};
pub use self::metrics::{MetricsSnapshot, ServerMetrics};
pub use self::print::PrintTask;
pub use self::scheduler::{
    PlaybackScheduler, PlaybackState, SOURCE_FRAMES_PER_SECOND, StopReason, TICK_PERIOD,
};
pub use self::server::{StreamServer, supervise};
pub use self::watcher::{WatchOutcome, watch};
