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

//! Async access to a [`FrameSplitter`]
//!
//! File reads block, so each request moves the splitter onto tokio's blocking
//! pool and takes it back once the frame is extracted.

use crate::{FrameError, FrameResult, FrameSplitter};
use bytes::Bytes;
use std::io::Read;

/// A frame source usable from async tasks.
///
/// Each call owns the splitter for its duration. Dropping a pending call
/// loses the splitter and every later call fails with
/// [`FrameError::Unavailable`].
#[derive(Debug)]
pub struct FrameStream<R> {
    splitter: Option<FrameSplitter<R>>,
}

impl<R> FrameStream<R>
where
    R: Read + Send + 'static,
{
    /// Wraps a splitter.
    pub fn new(splitter: FrameSplitter<R>) -> Self {
        Self {
            splitter: Some(splitter),
        }
    }

    /// Convenience constructor that builds the splitter as well.
    pub fn from_reader(reader: R) -> Self {
        Self::new(FrameSplitter::new(reader))
    }

    /// Number of frames extracted so far.
    pub fn frames_extracted(&self) -> u64 {
        self.splitter
            .as_ref()
            .map_or(0, FrameSplitter::frames_extracted)
    }

    /// Reads the next frame on the blocking pool.
    pub async fn next_frame(&mut self) -> FrameResult<Bytes> {
        self.with_splitter(FrameSplitter::next_frame).await
    }

    /// Discards `count` frames on the blocking pool.
    pub async fn skip(&mut self, count: u64) -> FrameResult<()> {
        self.with_splitter(move |splitter| splitter.skip(count)).await
    }

    async fn with_splitter<T, F>(&mut self, op: F) -> FrameResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut FrameSplitter<R>) -> FrameResult<T> + Send + 'static,
    {
        let mut splitter = self.splitter.take().ok_or(FrameError::Unavailable)?;
        let (splitter, result) = tokio::task::spawn_blocking(move || {
            let result = op(&mut splitter);
            (splitter, result)
        })
        .await
        .map_err(|_| FrameError::Unavailable)?;
        self.splitter = Some(splitter);
        result
    }
}
