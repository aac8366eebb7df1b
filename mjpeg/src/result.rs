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

/// Result Type for Frame Operations
pub type FrameResult<T> = Result<T, FrameError>;

/// Errors raised while pulling frames out of an MJPEG source.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The underlying source failed.
    #[error("I/O error reading frame: {0}")]
    Io(#[from] std::io::Error),

    /// The source has no more bytes at the current position.
    #[error("end of stream")]
    EndOfStream,

    /// The source ended part way through a frame.
    #[error("stream ended {len} bytes into a frame without an end-of-image marker")]
    Truncated {
        /// Bytes accumulated before the source ran dry
        len: usize,
    },

    /// A previous blocking read was lost, so the stream position is unknown.
    #[error("frame reader is no longer available")]
    Unavailable,
}

impl FrameError {
    /// Check whether the source simply ran out of frames.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, FrameError::EndOfStream)
    }
}
