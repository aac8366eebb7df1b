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


//! Helpers shared by the service integration tests

#![allow(dead_code)]

use blinken_telnetcodec::WindowSize;
use blinken_telnetcodec::consts::{DO, IAC, WILL, option};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Encodes a grey `width` x `height` JPEG.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([96])));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
        .unwrap();
    out
}

/// A source whose n-th frame (1-based) is n pixels wide.
pub fn numbered_frames(count: u32) -> Vec<u8> {
    (1..=count).flat_map(|width| jpeg(width, 8)).collect()
}

/// A source of `count` identical frames.
pub fn repeated_frames(count: usize) -> Vec<u8> {
    jpeg(16, 16).repeat(count)
}

/// Plays the client side of a successful handshake.
pub async fn accept_negotiation<S>(client: &mut S, size: WindowSize)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut command = [0u8; 3];

    client.read_exact(&mut command).await.unwrap();
    assert_eq!(command, [IAC, WILL, option::SUPPRESS_GO_AHEAD]);
    client
        .write_all(&[IAC, DO, option::SUPPRESS_GO_AHEAD])
        .await
        .unwrap();

    client.read_exact(&mut command).await.unwrap();
    assert_eq!(command, [IAC, WILL, option::ECHO]);
    client.write_all(&[IAC, DO, option::ECHO]).await.unwrap();

    client.read_exact(&mut command).await.unwrap();
    assert_eq!(command, [IAC, DO, option::NAWS]);
    client.write_all(&size.to_reply()).await.unwrap();
}

/// Reads from `client` until `needle` has appeared `times` times in the
/// accumulated output.
pub async fn read_until_count<S>(client: &mut S, out: &mut Vec<u8>, needle: &[u8], times: usize)
where
    S: AsyncRead + Unpin,
{
    let mut buf = [0u8; 4096];
    tokio::time::timeout(Duration::from_secs(10), async {
        while count(out, needle) < times {
            let n = client.read(&mut buf).await.unwrap();
            assert!(n > 0, "stream closed after {} bytes", out.len());
            out.extend_from_slice(&buf[..n]);
        }
    })
    .await
    .expect("timed out waiting for output");
}

/// Occurrences of `needle` in `haystack`.
pub fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Polls `condition` every few milliseconds for up to five seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached");
}
