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

//! Shared, positioned access to the MJPEG source
//!
//! One file handle is opened at startup and shared by every connection. Each
//! connection reads through its own [`PositionedReader`], which carries a
//! private byte offset and issues offset-explicit reads, so no connection ever
//! observes or disturbs another connection's position and no lock is needed.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

/// A byte source that can be read at an explicit offset through a shared reference.
pub trait ReadAt: Send + Sync {
    /// Reads into `buf` starting at `offset`, returning how many bytes were read.
    ///
    /// Returns `Ok(0)` once `offset` is at or beyond the end of the source.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;
}

impl ReadAt for File {
    #[cfg(unix)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }
}

impl ReadAt for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= self.len() {
            return Ok(0);
        }
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.as_slice().read_at(buf, offset)
    }
}

/// A read-only source shared between all connections.
pub struct SharedSource<S: ?Sized = File> {
    inner: Arc<S>,
}

impl SharedSource<File> {
    /// Opens `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            inner: Arc::new(file),
        })
    }
}

impl<S: ReadAt + ?Sized> SharedSource<S> {
    /// Shares an already opened source.
    pub fn new(inner: Arc<S>) -> Self {
        Self { inner }
    }

    /// Creates a reader positioned at the start of the source.
    pub fn reader(&self) -> PositionedReader<S> {
        PositionedReader {
            source: Arc::clone(&self.inner),
            position: 0,
        }
    }
}

impl<S: ?Sized> Clone for SharedSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ?Sized> fmt::Debug for SharedSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSource")
            .field("readers", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// A private cursor over a [`SharedSource`].
///
/// The position only ever moves forward, by exactly the number of bytes each
/// read returned.
pub struct PositionedReader<S: ?Sized = File> {
    source: Arc<S>,
    position: u64,
}

impl<S: ?Sized> PositionedReader<S> {
    /// Current byte offset into the source.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<S: ReadAt + ?Sized> Read for PositionedReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.source.read_at(buf, self.position)?;
        self.position += n as u64;
        Ok(n)
    }
}

impl<S: ?Sized> fmt::Debug for PositionedReader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionedReader")
            .field("position", &self.position)
            .finish()
    }
}
