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


//! Frame rendering pipeline: decode, filter, print.

use crate::ansi::cursor_reposition;
use crate::braille::BraillePrinter;
use crate::filter::{Filter, FilterConfig};
use crate::result::RenderResult;
use bytes::{BufMut, Bytes, BytesMut};
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::trace;

/// Decodes one JPEG frame.
pub fn decode_jpeg(frame: &[u8]) -> RenderResult<DynamicImage> {
    Ok(image::load_from_memory_with_format(frame, ImageFormat::Jpeg)?)
}

/// Terminal output for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Braille rows followed by the cursor repositioning sequence.
    pub bytes: Bytes,
    /// Terminal rows the frame occupies.
    pub rows: u32,
}

/// Owns the per-connection filter state and turns images into terminal
/// output.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    filter: Filter,
    printer: BraillePrinter,
}

impl RenderPipeline {
    /// Creates a pipeline for a `cols` x `rows` terminal.
    pub fn new(config: FilterConfig, cols: u16, rows: u16) -> Self {
        Self {
            filter: Filter::new(config, cols, rows),
            printer: BraillePrinter::new(),
        }
    }

    /// The filter state, mostly useful to inspect the cached scale.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Filters and prints an already decoded image.
    pub fn render(&mut self, img: DynamicImage) -> RenderedFrame {
        let img = self.filter.apply(img);
        let (width, height) = img.dimensions();
        let rows = BraillePrinter::rows_for(height);

        let glyphs = self.printer.render(&img);
        let reposition = cursor_reposition(rows);
        let mut bytes = BytesMut::with_capacity(glyphs.len() + reposition.len());
        bytes.put_slice(&glyphs);
        bytes.put_slice(reposition.as_bytes());
        trace!(width, height, rows, len = bytes.len(), "Rendered frame");

        RenderedFrame {
            bytes: bytes.freeze(),
            rows,
        }
    }

    /// Decodes, filters and prints one JPEG frame.
    pub fn render_jpeg(&mut self, frame: &[u8]) -> RenderResult<RenderedFrame> {
        let img = decode_jpeg(frame)?;
        Ok(self.render(img))
    }
}
