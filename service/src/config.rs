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


//! Server configuration

use crate::{Result, StreamError};
use blinken_render::FilterConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Port the server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration
///
/// Read once at startup and shared by every connection. Use the builder
/// methods to customize it.
///
/// # Example
///
/// ```
/// use blinken_service::ServerConfig;
/// use std::time::Duration;
///
/// let config = ServerConfig::new("127.0.0.1:3000".parse().unwrap(), "video.mjpeg")
///     .with_start_seconds(0)
///     .with_negotiation_timeout(Some(Duration::from_secs(10)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// The MJPEG file every connection plays
    pub input_path: PathBuf,

    /// Seconds of video skipped before playback starts
    ///
    /// The source is assumed to run at 25 frames per second, so this skips
    /// `start_seconds * 25` frames.
    pub start_seconds: u32,

    /// Requested playback rate
    ///
    /// Validated and reported, but playback always ticks at 25 Hz and shows
    /// every other frame.
    pub frames_per_second: u32,

    /// Upper bound on the telnet handshake, `None` waits forever
    pub negotiation_timeout: Option<Duration>,

    /// Image filter settings applied to every frame
    pub filter: FilterConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            input_path: PathBuf::new(),
            start_seconds: 120,
            frames_per_second: 12,
            negotiation_timeout: None,
            filter: FilterConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration serving `input_path` on `bind_address`
    ///
    /// All other settings will use their default values.
    pub fn new(bind_address: SocketAddr, input_path: impl Into<PathBuf>) -> Self {
        Self {
            bind_address,
            input_path: input_path.into(),
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.bind_address = bind_address;
        self
    }

    /// Set the input file
    pub fn with_input_path(mut self, input_path: impl Into<PathBuf>) -> Self {
        self.input_path = input_path.into();
        self
    }

    /// Set the start offset in seconds
    pub fn with_start_seconds(mut self, seconds: u32) -> Self {
        self.start_seconds = seconds;
        self
    }

    /// Set the requested playback rate
    pub fn with_frames_per_second(mut self, fps: u32) -> Self {
        self.frames_per_second = fps;
        self
    }

    /// Set the negotiation timeout
    pub fn with_negotiation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.negotiation_timeout = timeout;
        self
    }

    /// Set the image filter
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Validate the configuration
    ///
    /// Returns [`StreamError::Config`] describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(invalid("input_path must not be empty"));
        }

        if self.frames_per_second == 0 {
            return Err(invalid("frames_per_second must be greater than 0"));
        }

        if self.negotiation_timeout.is_some_and(|t| t.is_zero()) {
            return Err(invalid("negotiation_timeout must be greater than 0"));
        }

        let filter = &self.filter;
        if !filter.gamma.is_finite() || filter.gamma <= -1.0 {
            return Err(invalid("gamma must be greater than -1"));
        }

        if !(-100.0..=100.0).contains(&filter.brightness) {
            return Err(invalid("brightness must be between -100 and 100"));
        }

        if !filter.sharpen.is_finite() || filter.sharpen < 0.0 {
            return Err(invalid("sharpen must not be negative"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> StreamError {
    StreamError::Config(message.to_string())
}
