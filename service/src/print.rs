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


//! Print task: renders handed-off frames onto the client's terminal

use crate::handoff::HandoffReceiver;
use crate::{Result, ServerMetrics};
use blinken_render::RenderPipeline;
use blinken_telnetcodec::IacWriter;
use image::DynamicImage;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Consumer side of a connection's playback.
///
/// Owns the escaping writer and the render pipeline. The writer is handed
/// back when the task ends so the connection can restore the terminal.
pub struct PrintTask<W> {
    writer: IacWriter<W>,
    pipeline: RenderPipeline,
    frames: HandoffReceiver<DynamicImage>,
    token: CancellationToken,
    metrics: Arc<ServerMetrics>,
}

impl<W> PrintTask<W>
where
    W: AsyncWrite + Unpin,
{
    /// Create a print task writing through `writer`
    pub fn new(
        writer: IacWriter<W>,
        pipeline: RenderPipeline,
        frames: HandoffReceiver<DynamicImage>,
        token: CancellationToken,
        metrics: Arc<ServerMetrics>,
    ) -> Self {
        Self {
            writer,
            pipeline,
            frames,
            token,
            metrics,
        }
    }

    /// Prints frames until the scheduler stops or the token fires.
    ///
    /// Returns the writer along with the number of frames printed. A write
    /// or render failure cancels the connection token.
    pub async fn run(self) -> (IacWriter<W>, Result<u64>) {
        let Self {
            mut writer,
            pipeline,
            mut frames,
            token,
            metrics,
        } = self;

        let result = print_frames(&mut writer, pipeline, &mut frames, &token, &metrics).await;
        if result.is_err() {
            token.cancel();
        }
        (writer, result)
    }
}

async fn print_frames<W>(
    writer: &mut IacWriter<W>,
    mut pipeline: RenderPipeline,
    frames: &mut HandoffReceiver<DynamicImage>,
    token: &CancellationToken,
    metrics: &ServerMetrics,
) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut printed = 0;
    loop {
        let image = select! {
            biased;
            () = token.cancelled() => return Ok(printed),
            image = frames.recv() => match image {
                Some(image) => image,
                None => return Ok(printed),
            },
        };

        let (returned, frame) = tokio::task::spawn_blocking(move || {
            let frame = pipeline.render(image);
            (pipeline, frame)
        })
        .await?;
        pipeline = returned;

        select! {
            biased;
            () = token.cancelled() => return Ok(printed),
            written = async {
                writer.write_all(&frame.bytes).await?;
                writer.flush().await
            } => written?,
        }

        printed += 1;
        metrics.frame_printed(frame.bytes.len() as u64);
        trace!(frame = printed, rows = frame.rows, "Printed frame");
    }
}
