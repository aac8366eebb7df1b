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


//! # Blinken Render
//!
//! Turns decoded JPEG frames into text a telnet client can display. A frame
//! goes through a [`Filter`] (gamma, brightness, sharpen, mirror, invert,
//! contrast and a fit-to-terminal resize) and is then printed as Unicode
//! braille glyphs, each covering a 2x4 block of pixels, by the
//! [`BraillePrinter`]. [`RenderPipeline`] ties both together and appends
//! the cursor movement that makes the next frame overwrite this one.
//!
//! ```rust
//! use blinken_render::{FilterConfig, RenderPipeline};
//! use image::{DynamicImage, RgbImage};
//!
//! let mut pipeline = RenderPipeline::new(FilterConfig::default(), 80, 24);
//! let frame = pipeline.render(DynamicImage::ImageRgb8(RgbImage::new(320, 240)));
//! assert_eq!(frame.rows, 24);
//! ```

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod ansi;
mod braille;
mod filter;
mod pipeline;
mod result;

pub use self::braille::BraillePrinter;
pub use self::filter::{
    AUTO_CONTRAST, DOTS_PER_COLUMN, DOTS_PER_ROW, Filter, FilterConfig, luminance, scalar,
};
pub use self::pipeline::{RenderPipeline, RenderedFrame, decode_jpeg};
pub use self::result::{RenderError, RenderResult};
