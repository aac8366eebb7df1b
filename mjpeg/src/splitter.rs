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

//! End-of-image delimited frame extraction
//!
//! The input is a bare concatenation of JPEG images. Frames are delimited by
//! scanning for the two byte end-of-image marker `FF D9`; everything up to and
//! including the marker is one frame.

use crate::{FrameError, FrameResult};
use bytes::Bytes;
use std::io::{BufRead, BufReader, Read};
use tracing::trace;

/// JPEG end-of-image marker.
pub const END_OF_IMAGE: [u8; 2] = [0xFF, 0xD9];

/// Splits a byte stream into JPEG frames.
#[derive(Debug)]
pub struct FrameSplitter<R> {
    reader: BufReader<R>,
    extracted: u64,
}

impl<R: Read> FrameSplitter<R> {
    /// Creates a splitter over `reader` with the default buffer size.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            extracted: 0,
        }
    }

    /// Creates a splitter over `reader` with a buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            extracted: 0,
        }
    }

    /// Number of frames extracted so far, including skipped ones.
    pub fn frames_extracted(&self) -> u64 {
        self.extracted
    }

    /// Reads the next complete frame.
    ///
    /// # Errors
    /// `EndOfStream` when the source is exhausted exactly at a frame boundary,
    /// `Truncated` when it ends inside a frame, `Io` for source failures.
    pub fn next_frame(&mut self) -> FrameResult<Bytes> {
        let mut frame = Vec::new();
        loop {
            let n = self.reader.read_until(END_OF_IMAGE[1], &mut frame)?;
            if n == 0 {
                return Err(if frame.is_empty() {
                    FrameError::EndOfStream
                } else {
                    FrameError::Truncated { len: frame.len() }
                });
            }
            if frame.ends_with(&END_OF_IMAGE) {
                self.extracted += 1;
                trace!(frame = self.extracted, len = frame.len(), "Extracted frame");
                return Ok(Bytes::from(frame));
            }
        }
    }

    /// Reads and discards `count` frames.
    pub fn skip(&mut self, count: u64) -> FrameResult<()> {
        for _ in 0..count {
            self.next_frame()?;
        }
        Ok(())
    }

    /// Unwraps the splitter, discarding any buffered bytes.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read> Iterator for FrameSplitter<R> {
    type Item = FrameResult<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_frame() {
            Err(FrameError::EndOfStream) => None,
            other => Some(other),
        }
    }
}
