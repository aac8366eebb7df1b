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


//! Error types for the streaming service

use blinken_mjpeg::FrameError;
use blinken_render::RenderError;
use blinken_telnetcodec::NegotiationError;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Streaming service error types
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from the client socket or the listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The telnet handshake failed
    #[error("Negotiation error: {0}")]
    Negotiation(#[from] NegotiationError),

    /// Reading a frame from the source failed
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// A frame could not be decoded
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// A blocking render or decode job panicked or was aborted
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The client did not complete negotiation in time
    #[error("Negotiation timed out")]
    Timeout,

    /// The configuration was rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Server is not running
    #[error("Server not running")]
    ServerNotRunning,

    /// Generic error with a message
    #[error("{0}")]
    Other(String),
}

impl StreamError {
    /// Check if the error came from the client connection itself
    pub fn is_connection_error(&self) -> bool {
        match self {
            StreamError::Io(_) | StreamError::Timeout => true,
            StreamError::Negotiation(err) => err.is_io(),
            _ => false,
        }
    }

    /// Check if the error only means the source ran out of frames
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, StreamError::Frame(err) if err.is_end_of_stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_connection_error() {
        assert!(StreamError::Timeout.is_connection_error());
        let broken = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
        assert!(StreamError::from(broken).is_connection_error());
        assert!(StreamError::from(NegotiationError::Closed).is_connection_error());
        assert!(!StreamError::from(FrameError::EndOfStream).is_connection_error());
        assert!(!StreamError::Config("bad".to_string()).is_connection_error());
    }

    #[test]
    fn test_error_is_end_of_stream() {
        assert!(StreamError::from(FrameError::EndOfStream).is_end_of_stream());
        assert!(!StreamError::from(FrameError::Truncated { len: 3 }).is_end_of_stream());
        assert!(!StreamError::Timeout.is_end_of_stream());
    }

    #[test]
    fn test_error_display() {
        let err = StreamError::Config("frames_per_second must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: frames_per_second must be positive"
        );
    }
}
