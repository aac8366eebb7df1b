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

//! IAC escaping output stream
//!
//! Any `0xFF` byte in client-bound data would otherwise be read by the client
//! as the start of a telnet command. [`IacWriter`] doubles every such byte on
//! its way to the wrapped writer and reports write counts in terms of the
//! caller's bytes, so it can be used anywhere an [`AsyncWrite`] is expected.

use crate::consts;
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::AsyncWrite;

/// Caller bytes escaped per `poll_write`; the rest waits for the next call.
const MAX_CHUNK: usize = 8 * 1024;

/// Appends `src` to `dst` with every IAC byte doubled.
///
/// Returns the number of IAC bytes that were duplicated.
///
/// # Example
/// ```
/// let mut out = Vec::new();
/// let added = blinken_telnetcodec::escape_iac(&[1, 255, 2], &mut out);
/// assert_eq!(added, 1);
/// assert_eq!(out, vec![1, 255, 255, 2]);
/// ```
pub fn escape_iac(src: &[u8], dst: &mut Vec<u8>) -> usize {
    let specials = src.iter().filter(|&&b| b == consts::IAC).count();
    dst.reserve(src.len() + specials);
    for &byte in src {
        if byte == consts::IAC {
            dst.push(consts::IAC);
        }
        dst.push(byte);
    }
    specials
}

/// Counts how many source bytes are fully represented by an escaped prefix.
///
/// A prefix that stops between the two halves of an IAC pair still counts the
/// IAC; the second half is reported through the returned flag and must be sent
/// before anything else.
fn consumed(escaped_prefix: &[u8]) -> (usize, bool) {
    let mut count = 0;
    let mut index = 0;
    while index < escaped_prefix.len() {
        if escaped_prefix[index] == consts::IAC {
            count += 1;
            if index + 1 == escaped_prefix.len() {
                return (count, true);
            }
            index += 2;
        } else {
            count += 1;
            index += 1;
        }
    }
    (count, false)
}

pin_project! {
    /// An [`AsyncWrite`] adapter that escapes telnet IAC bytes.
    ///
    /// Writes report the number of *caller* bytes accepted, never counting the
    /// synthetic duplicates. When the wrapped writer accepts only part of an
    /// escaped chunk, the count covers exactly the source bytes whose escaped
    /// form was written; a write that fails before any byte lands reports the
    /// error and zero progress.
    ///
    /// # Example
    /// ```
    /// use blinken_telnetcodec::IacWriter;
    /// use tokio::io::AsyncWriteExt;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> std::io::Result<()> {
    /// let mut writer = IacWriter::new(Vec::new());
    /// let n = writer.write(&[0x41, 0xFF, 0x42]).await?;
    /// assert_eq!(n, 3);
    /// assert_eq!(writer.into_inner(), vec![0x41, 0xFF, 0xFF, 0x42]);
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug)]
    pub struct IacWriter<W> {
        #[pin]
        inner: W,
        scratch: Vec<u8>,
        // Second half of an IAC pair whose first half was already written.
        carry: bool,
    }
}

impl<W> IacWriter<W>
where
    W: AsyncWrite,
{
    /// Wraps `inner` so that every write is IAC escaped.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            scratch: Vec::new(),
            carry: false,
        }
    }

    /// Returns a reference to the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwraps the adapter, discarding any unsent IAC half.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn poll_carry(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let mut this = self.project();
        while *this.carry {
            let n = ready!(this.inner.as_mut().poll_write(cx, &[consts::IAC]))?;
            if n == 0 {
                return Poll::Ready(Err(io::ErrorKind::WriteZero.into()));
            }
            *this.carry = false;
        }
        Poll::Ready(Ok(()))
    }
}

impl<W> AsyncWrite for IacWriter<W>
where
    W: AsyncWrite,
{
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        ready!(self.as_mut().poll_carry(cx))?;
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let this = self.project();
        this.scratch.clear();
        escape_iac(&buf[..buf.len().min(MAX_CHUNK)], this.scratch);

        let written = ready!(this.inner.poll_write(cx, this.scratch))?;
        let (count, carry) = consumed(&this.scratch[..written]);
        *this.carry = carry;
        Poll::Ready(Ok(count))
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        ready!(self.as_mut().poll_carry(cx))?;
        self.project().inner.poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), io::Error>> {
        ready!(self.as_mut().poll_carry(cx))?;
        self.project().inner.poll_shutdown(cx)
    }
}
