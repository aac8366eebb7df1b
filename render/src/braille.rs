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

//! Braille dot-matrix printing
//!
//! Each Unicode braille glyph (U+2800..U+28FF) is a 2x4 grid of dots, so a
//! terminal cell can show eight pixels. The image is reduced to two levels
//! with Floyd-Steinberg dithering and a dot is raised for every black pixel.

use crate::filter::{DOTS_PER_COLUMN, DOTS_PER_ROW};
use image::imageops::{BiLevel, dither};
use image::{DynamicImage, GrayImage};

/// First code point of the braille patterns block.
const BRAILLE_BASE: u32 = 0x2800;

/// Dot bit for each `(x, y)` offset inside a 2x4 cell.
const DOT_BITS: [[u32; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// Line terminator written after every row of glyphs.
const LINE_END: &[u8] = b"\r\n";

/// Renders images as rows of braille glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraillePrinter;

impl BraillePrinter {
    /// Creates a printer.
    pub fn new() -> Self {
        Self
    }

    /// Number of terminal rows `height` image pixels occupy.
    pub fn rows_for(height: u32) -> u32 {
        height.div_ceil(DOTS_PER_ROW)
    }

    /// Renders `img` as UTF-8 braille lines, each ending in CR LF.
    pub fn render(&self, img: &DynamicImage) -> Vec<u8> {
        let mut gray = img.to_luma8();
        dither(&mut gray, &BiLevel);
        self.render_bilevel(&gray)
    }

    /// Renders an image that is already reduced to black (0) and white.
    pub fn render_bilevel(&self, gray: &GrayImage) -> Vec<u8> {
        let (width, height) = gray.dimensions();
        let cols = width.div_ceil(DOTS_PER_COLUMN);
        let rows = Self::rows_for(height);

        let mut out = Vec::with_capacity((rows * (cols * 3 + 2)) as usize);
        let mut glyph = [0u8; 4];
        for row in 0..rows {
            for col in 0..cols {
                let mut bits = 0;
                for (dx, column) in DOT_BITS.iter().enumerate() {
                    for (dy, bit) in column.iter().enumerate() {
                        let x = col * DOTS_PER_COLUMN + dx as u32;
                        let y = row * DOTS_PER_ROW + dy as u32;
                        if x < width && y < height && gray.get_pixel(x, y).0[0] < 128 {
                            bits |= bit;
                        }
                    }
                }
                let ch = char::from_u32(BRAILLE_BASE + bits).unwrap_or(' ');
                out.extend_from_slice(ch.encode_utf8(&mut glyph).as_bytes());
            }
            out.extend_from_slice(LINE_END);
        }
        out
    }
}
