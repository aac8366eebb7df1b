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


//! Playback pacing, decimation and hand-off backpressure

mod common;

use blinken_mjpeg::FrameStream;
use blinken_service::{PlaybackScheduler, ServerMetrics, StopReason, handoff};
use common::{numbered_frames, wait_until};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn scheduler(
    source: Vec<u8>,
    token: &CancellationToken,
    metrics: &Arc<ServerMetrics>,
) -> (
    PlaybackScheduler<Cursor<Vec<u8>>>,
    blinken_service::HandoffReceiver<image::DynamicImage>,
) {
    let (tx, rx) = handoff();
    let scheduler = PlaybackScheduler::new(
        FrameStream::from_reader(Cursor::new(source)),
        tx,
        token.clone(),
        metrics.clone(),
    );
    (scheduler, rx)
}

#[tokio::test]
async fn test_every_other_frame_is_forwarded() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, mut rx) = scheduler(numbered_frames(10), &token, &metrics);
    let playback = tokio::spawn(scheduler.run());

    let mut widths = Vec::new();
    while let Some(image) = rx.recv().await {
        widths.push(image.width());
    }

    assert_eq!(widths, vec![1, 3, 5, 7, 9]);
    assert_eq!(playback.await.unwrap().unwrap(), StopReason::EndOfStream);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.frames_read, 10);
    assert_eq!(snapshot.frames_decimated, 5);
    // a clean end of stream closes the hand-off without cancelling
    assert!(!token.is_cancelled());
}

#[tokio::test]
async fn test_odd_frame_count_forwards_the_last_frame() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, mut rx) = scheduler(numbered_frames(7), &token, &metrics);
    let playback = tokio::spawn(scheduler.run());

    let mut widths = Vec::new();
    while let Some(image) = rx.recv().await {
        widths.push(image.width());
    }

    // ceil(7 / 2) frames survive
    assert_eq!(widths, vec![1, 3, 5, 7]);
    assert_eq!(playback.await.unwrap().unwrap(), StopReason::EndOfStream);
}

#[tokio::test]
async fn test_start_offset_skips_whole_seconds() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, mut rx) = scheduler(numbered_frames(60), &token, &metrics);
    let playback = tokio::spawn(scheduler.with_start_seconds(2).run());

    let mut widths = Vec::new();
    while let Some(image) = rx.recv().await {
        widths.push(image.width());
    }

    assert_eq!(widths, vec![51, 53, 55, 57, 59]);
    assert_eq!(playback.await.unwrap().unwrap(), StopReason::EndOfStream);
    // skipped frames are not playback reads
    assert_eq!(metrics.snapshot().frames_read, 10);
}

#[tokio::test]
async fn test_start_offset_past_the_end() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, mut rx) = scheduler(numbered_frames(10), &token, &metrics);
    let playback = tokio::spawn(scheduler.with_start_seconds(1).run());

    assert!(rx.recv().await.is_none());
    assert_eq!(playback.await.unwrap().unwrap(), StopReason::EndOfStream);
}

#[tokio::test]
async fn test_stalled_consumer_blocks_producer() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, mut rx) = scheduler(numbered_frames(10), &token, &metrics);
    let playback = tokio::spawn(scheduler.run());

    // The first frame is read, decoded and then held at the hand-off.
    wait_until(|| metrics.snapshot().frames_read == 1).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(metrics.snapshot().frames_read, 1);

    // Accepting it releases exactly that frame; the producer then reads on
    // to frame 3 and blocks again.
    assert_eq!(rx.recv().await.unwrap().width(), 1);
    wait_until(|| metrics.snapshot().frames_read == 3).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(metrics.snapshot().frames_read, 3);
    assert_eq!(rx.recv().await.unwrap().width(), 3);

    token.cancel();
    assert_eq!(playback.await.unwrap().unwrap(), StopReason::Cancelled);
}

#[tokio::test]
async fn test_dropped_consumer_stops_playback() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, rx) = scheduler(numbered_frames(10), &token, &metrics);
    drop(rx);

    let stopped = scheduler.run().await.unwrap();
    assert_eq!(stopped, StopReason::ConsumerClosed);
}

#[tokio::test]
async fn test_corrupt_frame_is_an_error() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let (scheduler, _rx) = scheduler(vec![0xFF, 0xD8, 0x01, 0x02, 0xFF, 0xD9], &token, &metrics);

    let err = scheduler.run().await.unwrap_err();
    assert!(matches!(err, blinken_service::StreamError::Render(_)));
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn test_truncated_source_is_an_error() {
    let metrics = Arc::new(ServerMetrics::new());
    let token = CancellationToken::new();
    let mut source = numbered_frames(1);
    source.extend_from_slice(&[0xFF, 0xD8, 0x00]);
    let (scheduler, mut rx) = scheduler(source, &token, &metrics);
    let playback = tokio::spawn(scheduler.run());

    assert_eq!(rx.recv().await.unwrap().width(), 1);
    let err = playback.await.unwrap().unwrap_err();
    assert!(!err.is_end_of_stream());
    assert!(matches!(err, blinken_service::StreamError::Frame(_)));
}
